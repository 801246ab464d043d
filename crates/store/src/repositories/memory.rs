use std::collections::HashMap;

use tokio::sync::RwLock;
use tracing::debug;

use catalog_core::domain::product::{NewProduct, Product, ProductId};
use catalog_core::errors::CatalogError;

use super::CatalogStore;

/// Records and the id counter move together under one lock.
#[derive(Debug)]
struct Catalog {
    products: HashMap<ProductId, Product>,
    next_id: i64,
}

impl Default for Catalog {
    fn default() -> Self {
        Self { products: HashMap::new(), next_id: 1 }
    }
}

#[derive(Debug, Default)]
pub struct InMemoryCatalogStore {
    catalog: RwLock<Catalog>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn add(&self, product: NewProduct) -> Result<ProductId, CatalogError> {
        let quantity = validate_new_product(&product)?;

        let id = {
            let mut catalog = self.catalog.write().await;
            let id = ProductId(catalog.next_id);
            catalog.products.insert(
                id,
                Product { id, name: product.name, price: product.price, quantity },
            );
            catalog.next_id += 1;
            id
        };

        debug!(event_name = "catalog.product.added", product_id = %id, "product added");
        Ok(id)
    }

    async fn get(&self, id: ProductId) -> Result<Product, CatalogError> {
        let catalog = self.catalog.read().await;
        catalog.products.get(&id).cloned().ok_or(CatalogError::NotFound(id))
    }

    async fn list(&self) -> Vec<Product> {
        let catalog = self.catalog.read().await;
        let mut products: Vec<Product> = catalog.products.values().cloned().collect();
        products.sort_by_key(|product| product.id);
        products
    }

    async fn update_quantity(&self, id: ProductId, quantity: i64) -> Result<(), CatalogError> {
        let quantity = validate_quantity(quantity)?;

        {
            let mut catalog = self.catalog.write().await;
            let product = catalog.products.get_mut(&id).ok_or(CatalogError::NotFound(id))?;
            product.quantity = quantity;
        }

        debug!(
            event_name = "catalog.product.quantity_updated",
            product_id = %id,
            quantity,
            "product quantity updated"
        );
        Ok(())
    }

    async fn delete(&self, id: ProductId) -> Result<(), CatalogError> {
        {
            let mut catalog = self.catalog.write().await;
            catalog.products.remove(&id).ok_or(CatalogError::NotFound(id))?;
        }

        debug!(event_name = "catalog.product.deleted", product_id = %id, "product deleted");
        Ok(())
    }

    async fn len(&self) -> usize {
        self.catalog.read().await.products.len()
    }
}

fn validate_new_product(product: &NewProduct) -> Result<u64, CatalogError> {
    if product.name.is_empty() {
        return Err(CatalogError::invalid("name must not be empty"));
    }
    if product.price.is_nan() || product.price < 0.0 {
        return Err(CatalogError::invalid("price must be a non-negative number"));
    }
    validate_quantity(product.quantity)
}

fn validate_quantity(quantity: i64) -> Result<u64, CatalogError> {
    u64::try_from(quantity).map_err(|_| CatalogError::invalid("quantity must not be negative"))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use catalog_core::domain::product::{NewProduct, Product, ProductId};
    use catalog_core::errors::CatalogError;

    use crate::repositories::{CatalogStore, InMemoryCatalogStore};

    fn apple() -> NewProduct {
        NewProduct::new("Apple", 1.50, 100)
    }

    #[tokio::test]
    async fn add_assigns_sequential_ids_from_one() {
        let store = InMemoryCatalogStore::new();

        let first = store.add(apple()).await.expect("add apple");
        let second = store.add(NewProduct::new("Banana", 2.00, 50)).await.expect("add banana");

        assert_eq!(first, ProductId(1));
        assert_eq!(second, ProductId(2));
    }

    #[tokio::test]
    async fn add_accepts_zero_price_and_zero_quantity() {
        let store = InMemoryCatalogStore::new();

        let id = store.add(NewProduct::new("Sample", 0.0, 0)).await.expect("add sample");
        let product = store.get(id).await.expect("get sample");

        assert_eq!(product.price, 0.0);
        assert_eq!(product.quantity, 0);
        assert!(!product.is_available());
    }

    #[tokio::test]
    async fn add_rejects_invalid_fields_without_consuming_an_id() {
        let store = InMemoryCatalogStore::new();
        let cases = [
            ("empty name", NewProduct::new("", 1.00, 10)),
            ("negative price", NewProduct::new("Test", -1.00, 10)),
            ("nan price", NewProduct::new("Test", f64::NAN, 10)),
            ("negative quantity", NewProduct::new("Test", 1.00, -1)),
        ];

        for (label, input) in cases {
            let result = store.add(input).await;
            assert!(
                matches!(result, Err(CatalogError::InvalidInput { .. })),
                "{label} should be rejected, got {result:?}"
            );
        }

        assert!(store.is_empty().await);
        assert_eq!(store.add(apple()).await.expect("add apple"), ProductId(1));
    }

    #[tokio::test]
    async fn quantities_beyond_32_bits_are_stored_as_given() {
        let store = InMemoryCatalogStore::new();

        let id = store.add(NewProduct::new("Bulk", 1.0, 5_000_000_000)).await.expect("add bulk");
        assert_eq!(store.get(id).await.expect("get bulk").quantity, 5_000_000_000);

        store.update_quantity(id, i64::MAX).await.expect("update to i64::MAX");
        assert_eq!(store.get(id).await.expect("get bulk").quantity, i64::MAX as u64);
    }

    #[tokio::test]
    async fn get_returns_the_stored_record() {
        let store = InMemoryCatalogStore::new();
        let id = store.add(apple()).await.expect("add apple");

        let product = store.get(id).await.expect("get apple");

        assert_eq!(
            product,
            Product { id: ProductId(1), name: "Apple".to_string(), price: 1.5, quantity: 100 }
        );
    }

    #[tokio::test]
    async fn missing_ids_are_not_found() {
        let store = InMemoryCatalogStore::new();
        let missing = ProductId(999);

        assert_eq!(store.get(missing).await, Err(CatalogError::NotFound(missing)));
        assert_eq!(store.update_quantity(missing, 10).await, Err(CatalogError::NotFound(missing)));
        assert_eq!(store.delete(missing).await, Err(CatalogError::NotFound(missing)));
    }

    #[tokio::test]
    async fn non_positive_ids_never_match_a_product() {
        let store = InMemoryCatalogStore::new();
        let first = store.add(apple()).await.expect("valid product");
        assert_eq!(first, ProductId(1));

        for id in [ProductId(0), ProductId(-1), ProductId(i64::MIN)] {
            assert_eq!(store.get(id).await, Err(CatalogError::NotFound(id)));
            assert_eq!(store.delete(id).await, Err(CatalogError::NotFound(id)));
        }
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn list_tracks_added_and_deleted_products() {
        let store = InMemoryCatalogStore::new();
        assert!(store.list().await.is_empty());

        let apple_id = store.add(apple()).await.expect("add apple");
        store.add(NewProduct::new("Banana", 2.00, 50)).await.expect("add banana");
        assert_eq!(store.list().await.len(), 2);

        store.delete(apple_id).await.expect("delete apple");
        let remaining = store.list().await;

        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].name, "Banana");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn list_returns_copies_that_do_not_alias_the_catalog() {
        let store = InMemoryCatalogStore::new();
        let id = store.add(apple()).await.expect("add apple");

        let mut snapshot = store.list().await;
        snapshot[0].quantity = 0;
        snapshot[0].name.push_str(" (edited)");

        let stored = store.get(id).await.expect("get apple");
        assert_eq!(stored.quantity, 100);
        assert_eq!(stored.name, "Apple");
    }

    #[tokio::test]
    async fn update_quantity_overwrites_only_quantity() {
        let store = InMemoryCatalogStore::new();
        let id = store.add(apple()).await.expect("add apple");

        store.update_quantity(id, 200).await.expect("update quantity");
        let product = store.get(id).await.expect("get apple");

        assert_eq!(product.quantity, 200);
        assert_eq!(product.name, "Apple");
        assert_eq!(product.price, 1.5);
    }

    #[tokio::test]
    async fn negative_quantity_update_leaves_record_unchanged() {
        let store = InMemoryCatalogStore::new();
        let id = store.add(apple()).await.expect("add apple");

        let result = store.update_quantity(id, -5).await;

        assert!(matches!(result, Err(CatalogError::InvalidInput { .. })));
        assert_eq!(store.get(id).await.expect("get apple").quantity, 100);
    }

    #[tokio::test]
    async fn deleted_ids_are_never_reassigned() {
        let store = InMemoryCatalogStore::new();
        let id = store.add(apple()).await.expect("add apple");

        store.delete(id).await.expect("delete apple");
        assert_eq!(store.get(id).await, Err(CatalogError::NotFound(id)));
        assert_eq!(store.delete(id).await, Err(CatalogError::NotFound(id)));

        let next = store.add(apple()).await.expect("re-add apple");
        assert_eq!(next, ProductId(2));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_adds_receive_distinct_ids() {
        let store = Arc::new(InMemoryCatalogStore::new());
        let mut writers = Vec::new();
        let mut readers = Vec::new();

        for index in 0..50 {
            let writer_store = Arc::clone(&store);
            writers.push(tokio::spawn(async move {
                writer_store.add(NewProduct::new(format!("Concurrent-{index}"), 9.99, 10)).await
            }));
            let reader_store = Arc::clone(&store);
            readers.push(tokio::spawn(async move { reader_store.list().await.len() }));
        }

        let mut ids = HashSet::new();
        for writer in writers {
            let id = writer.await.expect("writer task").expect("add should succeed");
            assert!(ids.insert(id), "id {id} was assigned twice");
        }
        for reader in readers {
            assert!(reader.await.expect("reader task") <= 50);
        }

        assert_eq!(ids.len(), 50);
        assert_eq!(store.list().await.len(), 50);
        assert!(ids.iter().all(|id| (1..=50).contains(&id.0)));
    }
}
