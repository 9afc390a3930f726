pub mod models;
pub mod view_model;

pub use models::{CraftStep, CraftType, Difficulty, Idea, Inspiration, Material, Note};
pub use view_model::CraftViewModel;
