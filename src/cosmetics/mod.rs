pub mod models;
pub mod view_model;

pub use models::{Product, ProductCategory, StorageLocation};
pub use view_model::CosmeticsViewModel;
