pub mod config;
pub mod domain;
pub mod errors;

pub use domain::product::{NewProduct, Product, ProductId};
pub use errors::{CatalogError, InterfaceError};
