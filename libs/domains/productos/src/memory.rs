//! In-memory implementation of ProductRepository
//!
//! Backs the hermetic tests and `PRODUCTOS_STORE=memory`. Nothing survives a restart.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{ProductError, ProductResult};
use crate::models::{NewProduct, Product, ProductChanges, ProductId};
use crate::repository::ProductRepository;

#[derive(Clone, Default)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<HashMap<ProductId, Product>>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn code_taken(products: &HashMap<ProductId, Product>, code: i64, except: Option<ProductId>) -> bool {
    products
        .values()
        .any(|p| p.code == code && Some(p.id) != except)
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, input: NewProduct) -> ProductResult<Product> {
        let mut products = self.products.write().await;

        if code_taken(&products, input.code, None) {
            return Err(ProductError::DuplicateCode(input.code));
        }

        let product = Product::new(input);
        products.insert(product.id, product.clone());

        tracing::info!(product_id = %product.id, code = product.code, "Created product");
        Ok(product)
    }

    async fn get_by_id(&self, id: ProductId) -> ProductResult<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.get(&id).cloned())
    }

    async fn find_by_code(&self, code: i64) -> ProductResult<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.values().find(|p| p.code == code).cloned())
    }

    async fn list(&self) -> ProductResult<Vec<Product>> {
        let products = self.products.read().await;

        let mut result: Vec<Product> = products.values().cloned().collect();
        // ObjectIds grow with creation time, so they break timestamp ties.
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(result)
    }

    async fn update(&self, id: ProductId, changes: ProductChanges) -> ProductResult<Product> {
        let mut products = self.products.write().await;

        if !products.contains_key(&id) {
            return Err(ProductError::NotFound(id));
        }
        if let Some(code) = changes.code {
            if code_taken(&products, code, Some(id)) {
                return Err(ProductError::DuplicateCode(code));
            }
        }

        let product = products.get_mut(&id).ok_or(ProductError::NotFound(id))?;
        product.apply_changes(changes);

        tracing::info!(product_id = %id, "Updated product");
        Ok(product.clone())
    }

    async fn delete(&self, id: ProductId) -> ProductResult<bool> {
        let mut products = self.products.write().await;
        let removed = products.remove(&id).is_some();

        if removed {
            tracing::info!(product_id = %id, "Deleted product");
        }
        Ok(removed)
    }
}
