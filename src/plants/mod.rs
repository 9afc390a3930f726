pub mod models;
pub mod view_model;

pub use models::{CareSchedule, Instruction, Plant, PlantCategory, SunlightLevel, Task, TaskType};
pub use view_model::PlantViewModel;
