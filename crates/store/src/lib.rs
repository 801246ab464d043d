pub mod repositories;

pub use repositories::{CatalogStore, InMemoryCatalogStore};
