use async_trait::async_trait;

use catalog_core::domain::product::{NewProduct, Product, ProductId};
use catalog_core::errors::CatalogError;

pub mod memory;

pub use memory::InMemoryCatalogStore;

/// Exclusive owner of catalog records.
///
/// Writes (`add`, `update_quantity`, `delete`) are applied atomically; reads
/// observe the state left by the last completed write and never a partial one.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Validates and stores a product, returning its freshly assigned id.
    /// Ids start at 1 and are never reused, even after deletion.
    async fn add(&self, product: NewProduct) -> Result<ProductId, CatalogError>;

    async fn get(&self, id: ProductId) -> Result<Product, CatalogError>;

    /// Snapshot of every stored product. Callers own the returned copies.
    async fn list(&self) -> Vec<Product>;

    async fn update_quantity(&self, id: ProductId, quantity: i64) -> Result<(), CatalogError>;

    async fn delete(&self, id: ProductId) -> Result<(), CatalogError>;

    async fn len(&self) -> usize;

    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
