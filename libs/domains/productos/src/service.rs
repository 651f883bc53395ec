//! Product Service - Business logic layer

use std::sync::Arc;
use tracing::instrument;

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, Product, ProductId, UpdateProduct};
use crate::repository::ProductRepository;

/// Product service providing business logic operations
///
/// Validates requests in a fixed order and checks code uniqueness before
/// touching the repository, which enforces uniqueness again on write.
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create a new product
    ///
    /// Order of checks: required fields, field constraints, category, code.
    #[instrument(skip(self, input), fields(code = ?input.codigo))]
    pub async fn create_product(&self, input: CreateProduct) -> ProductResult<Product> {
        let new_product = input.into_new_product()?;

        if self
            .repository
            .find_by_code(new_product.code)
            .await?
            .is_some()
        {
            return Err(ProductError::DuplicateCode(new_product.code));
        }

        self.repository.create(new_product).await
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: ProductId) -> ProductResult<Product> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    /// All products, newest first
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> ProductResult<Vec<Product>> {
        self.repository.list().await
    }

    /// Update an existing product
    ///
    /// An unknown id is reported before any validation of the body.
    #[instrument(skip(self, input))]
    pub async fn update_product(&self, id: ProductId, input: UpdateProduct) -> ProductResult<Product> {
        let existing = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))?;

        let changes = input.into_changes()?;

        if let Some(code) = changes.code.filter(|code| *code != existing.code) {
            if self.repository.find_by_code(code).await?.is_some() {
                return Err(ProductError::DuplicateCode(code));
            }
        }

        self.repository.update(id, changes).await
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: ProductId) -> ProductResult<()> {
        if !self.repository.delete(id).await? {
            return Err(ProductError::NotFound(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewProduct, ProductCategory};
    use crate::repository::MockProductRepository;
    use mockall::predicate::eq;

    fn stored(code: i64) -> Product {
        Product::new(NewProduct {
            code,
            name: "Bolso".into(),
            price: 35.0,
            category: ProductCategory::Accesorios,
        })
    }

    fn create_input(code: i64, categoria: &str) -> CreateProduct {
        CreateProduct {
            codigo: Some(code),
            nombre: Some("Bolso".into()),
            precio: Some(35.0),
            categoria: Some(categoria.into()),
        }
    }

    #[tokio::test]
    async fn test_create_product_success() {
        let mut mock_repo = MockProductRepository::new();

        mock_repo
            .expect_find_by_code()
            .with(eq(10))
            .times(1)
            .returning(|_| Ok(None));
        mock_repo
            .expect_create()
            .times(1)
            .returning(|input| Ok(Product::new(input)));

        let service = ProductService::new(mock_repo);
        let product = service
            .create_product(create_input(10, "Accesorios"))
            .await
            .unwrap();

        assert_eq!(product.code, 10);
        assert_eq!(product.category, ProductCategory::Accesorios);
    }

    #[tokio::test]
    async fn test_create_product_duplicate_code() {
        let mut mock_repo = MockProductRepository::new();

        mock_repo
            .expect_find_by_code()
            .with(eq(10))
            .returning(|code| Ok(Some(stored(code))));
        mock_repo.expect_create().never();

        let service = ProductService::new(mock_repo);
        let result = service.create_product(create_input(10, "Ropa")).await;

        assert!(matches!(result, Err(ProductError::DuplicateCode(10))));
    }

    #[tokio::test]
    async fn test_create_product_invalid_category_skips_repository() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_find_by_code().never();
        mock_repo.expect_create().never();

        let service = ProductService::new(mock_repo);
        let result = service.create_product(create_input(10, "Juguetes")).await;

        assert!(matches!(result, Err(ProductError::InvalidCategory(_))));
    }

    #[tokio::test]
    async fn test_create_product_missing_fields() {
        let mock_repo = MockProductRepository::new();
        let service = ProductService::new(mock_repo);

        let result = service.create_product(CreateProduct::default()).await;
        match result {
            Err(ProductError::MissingFields(fields)) => assert_eq!(fields.len(), 4),
            other => panic!("expected MissingFields, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_product_not_found() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_get_by_id().returning(|_| Ok(None));

        let service = ProductService::new(mock_repo);
        let result = service.get_product(ProductId::new()).await;

        assert!(matches!(result, Err(ProductError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_unknown_id_wins_over_bad_body() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_get_by_id().returning(|_| Ok(None));
        mock_repo.expect_update().never();

        let service = ProductService::new(mock_repo);
        let update = UpdateProduct {
            categoria: Some("Juguetes".into()),
            ..Default::default()
        };
        let result = service.update_product(ProductId::new(), update).await;

        assert!(matches!(result, Err(ProductError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_code_taken_by_other_product() {
        let existing = stored(1);
        let id = existing.id;

        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_get_by_id()
            .with(eq(id))
            .returning(move |_| Ok(Some(existing.clone())));
        mock_repo
            .expect_find_by_code()
            .with(eq(2))
            .returning(|code| Ok(Some(stored(code))));
        mock_repo.expect_update().never();

        let service = ProductService::new(mock_repo);
        let update = UpdateProduct {
            codigo: Some(2),
            ..Default::default()
        };
        let result = service.update_product(id, update).await;

        assert!(matches!(result, Err(ProductError::DuplicateCode(2))));
    }

    #[tokio::test]
    async fn test_update_same_code_skips_uniqueness_lookup() {
        let existing = stored(1);
        let id = existing.id;

        let mut mock_repo = MockProductRepository::new();
        let current = existing.clone();
        mock_repo
            .expect_get_by_id()
            .returning(move |_| Ok(Some(current.clone())));
        mock_repo.expect_find_by_code().never();
        mock_repo.expect_update().times(1).returning(move |_, changes| {
            let mut updated = existing.clone();
            updated.apply_changes(changes);
            Ok(updated)
        });

        let service = ProductService::new(mock_repo);
        let update = UpdateProduct {
            codigo: Some(1),
            nombre: Some("Bolso grande".into()),
            ..Default::default()
        };
        let product = service.update_product(id, update).await.unwrap();

        assert_eq!(product.name, "Bolso grande");
    }

    #[tokio::test]
    async fn test_delete_product_not_found() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_delete().returning(|_| Ok(false));

        let service = ProductService::new(mock_repo);
        let result = service.delete_product(ProductId::new()).await;

        assert!(matches!(result, Err(ProductError::NotFound(_))));
    }
}
