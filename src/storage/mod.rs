pub mod gateway;
pub mod kv;

use thiserror::Error;

pub use gateway::Gateway;
pub use kv::{FileStore, KeyValueStore, MemoryStore, SharedStore};

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("storage lock poisoned")]
    Poisoned,
    #[error("could not resolve a data directory")]
    NoDataDir,
}

/// Fixed keys, one per persisted collection.
pub mod keys {
    pub const PLANTS: &str = "plants";
    pub const PLANT_TASKS: &str = "plant_tasks";
    pub const PLANT_INSTRUCTIONS: &str = "plant_instructions";
    pub const STORAGE_LOCATIONS: &str = "storage_locations";
    pub const CRAFT_IDEAS: &str = "craft_ideas";
    pub const CRAFT_NOTES: &str = "craft_notes";
    pub const CRAFT_MATERIALS: &str = "craft_materials";
    pub const CRAFT_INSPIRATIONS: &str = "craft_inspirations";
}
