//! Local-first record keeping for three small home trackers: plant care,
//! a cosmetics organizer and craft ideas. Each tracker keeps typed records
//! in memory, persists whole collections as JSON and answers list queries
//! through a shared search/filter/sort facade.

pub mod category;
pub mod config;
pub mod cosmetics;
pub mod crafts;
pub mod error;
pub mod metadata;
pub mod plants;
pub mod query;
pub mod record;
pub mod storage;

pub use category::Category;
pub use config::Settings;
pub use cosmetics::CosmeticsViewModel;
pub use crafts::CraftViewModel;
pub use error::{AppError, AppResult};
pub use plants::PlantViewModel;
pub use query::{ArchiveFilter, ListQuery, Listable, SortMode};
pub use record::{Record, RecordId, RecordStore};
pub use storage::{FileStore, KeyValueStore, MemoryStore, SharedStore, StorageError};
