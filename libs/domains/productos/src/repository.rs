use async_trait::async_trait;

use crate::error::ProductResult;
use crate::models::{NewProduct, Product, ProductChanges, ProductId};

/// Repository trait for Product persistence
///
/// Implementations must keep `code` unique: `create` and `update` return
/// `ProductError::DuplicateCode` rather than store a second product with the
/// same code, even when two requests race past the service pre-check.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Store a new product, assigning its id and timestamps
    async fn create(&self, input: NewProduct) -> ProductResult<Product>;

    async fn get_by_id(&self, id: ProductId) -> ProductResult<Option<Product>>;

    async fn find_by_code(&self, code: i64) -> ProductResult<Option<Product>>;

    /// All products, newest first
    async fn list(&self) -> ProductResult<Vec<Product>>;

    /// Apply `changes` and return the stored result, or `NotFound`
    async fn update(&self, id: ProductId, changes: ProductChanges) -> ProductResult<Product>;

    /// Hard delete; `false` when nothing had that id
    async fn delete(&self, id: ProductId) -> ProductResult<bool>;
}
