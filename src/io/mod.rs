pub mod catalog;
pub mod input;
pub mod output;

pub use catalog::{CatalogLoader, CatalogSource, DirCatalogSource};
pub use input::CoilRecord;
