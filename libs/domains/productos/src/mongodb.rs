//! MongoDB implementation of ProductRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use database::mongodb::{Collection, Database};
use futures_util::TryStreamExt;
use mongodb::{
    IndexModel,
    bson::{Document, doc, oid::ObjectId, to_bson},
    options::{IndexOptions, ReturnDocument},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{ProductError, ProductResult, is_duplicate_key};
use crate::models::{NewProduct, Product, ProductCategory, ProductChanges, ProductId};
use crate::repository::ProductRepository;

/// Default collection name
pub const DEFAULT_COLLECTION: &str = "productos";

/// Name of the unique index on `codigo`
pub const CODE_INDEX_NAME: &str = "idx_codigo_unique";

/// Stored shape of a product: same fields as [`Product`] with a native ObjectId `_id`
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProductDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    codigo: i64,
    nombre: String,
    precio: f64,
    categoria: ProductCategory,
    #[serde(rename = "createdAt")]
    created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    updated_at: DateTime<Utc>,
}

impl From<Product> for ProductDocument {
    fn from(p: Product) -> Self {
        Self {
            id: p.id.as_object_id(),
            codigo: p.code,
            nombre: p.name,
            precio: p.price,
            categoria: p.category,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

impl From<ProductDocument> for Product {
    fn from(d: ProductDocument) -> Self {
        Self {
            id: d.id.into(),
            code: d.codigo,
            name: d.nombre,
            price: d.precio,
            category: d.categoria,
            created_at: d.created_at,
            updated_at: d.updated_at,
        }
    }
}

/// MongoDB implementation of the ProductRepository
pub struct MongoProductRepository {
    collection: Collection<ProductDocument>,
}

impl MongoProductRepository {
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, DEFAULT_COLLECTION)
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        let collection = db.collection::<ProductDocument>(collection_name);
        Self { collection }
    }

    /// Create the unique index on `codigo`. Idempotent.
    pub async fn init_indexes(&self) -> ProductResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { "codigo": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name(CODE_INDEX_NAME.to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(index).await?;
        tracing::info!(index = CODE_INDEX_NAME, "Product indexes created successfully");
        Ok(())
    }

    fn by_id(id: ProductId) -> Document {
        doc! { "_id": id.as_object_id() }
    }

    /// `$set` document for the fields present in `changes`, plus `updatedAt`
    fn build_update(changes: &ProductChanges) -> ProductResult<Document> {
        let mut set = doc! {};

        if let Some(code) = changes.code {
            set.insert("codigo", code);
        }
        if let Some(ref name) = changes.name {
            set.insert("nombre", name);
        }
        if let Some(price) = changes.price {
            set.insert("precio", price);
        }
        if let Some(category) = changes.category {
            set.insert("categoria", category.to_string());
        }
        let updated_at =
            to_bson(&Utc::now()).map_err(|e| ProductError::Internal(e.to_string()))?;
        set.insert("updatedAt", updated_at);

        Ok(doc! { "$set": set })
    }
}

/// Map a write failure, turning unique index violations into `DuplicateCode`
fn write_error(err: mongodb::error::Error, code: i64) -> ProductError {
    if is_duplicate_key(&err) {
        ProductError::DuplicateCode(code)
    } else {
        err.into()
    }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    #[instrument(skip(self, input), fields(code = input.code))]
    async fn create(&self, input: NewProduct) -> ProductResult<Product> {
        let code = input.code;
        let product = Product::new(input);

        self.collection
            .insert_one(ProductDocument::from(product.clone()))
            .await
            .map_err(|e| write_error(e, code))?;

        tracing::info!(product_id = %product.id, "Product created successfully");
        Ok(product)
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn get_by_id(&self, id: ProductId) -> ProductResult<Option<Product>> {
        let document = self.collection.find_one(Self::by_id(id)).await?;
        Ok(document.map(Product::from))
    }

    #[instrument(skip(self))]
    async fn find_by_code(&self, code: i64) -> ProductResult<Option<Product>> {
        let document = self.collection.find_one(doc! { "codigo": code }).await?;
        Ok(document.map(Product::from))
    }

    #[instrument(skip(self))]
    async fn list(&self) -> ProductResult<Vec<Product>> {
        // ObjectIds embed their creation time, so `_id` descending is newest first.
        let cursor = self.collection.find(doc! {}).sort(doc! { "_id": -1 }).await?;
        let documents: Vec<ProductDocument> = cursor.try_collect().await?;

        Ok(documents.into_iter().map(Product::from).collect())
    }

    #[instrument(skip(self, changes), fields(product_id = %id))]
    async fn update(&self, id: ProductId, changes: ProductChanges) -> ProductResult<Product> {
        let update = Self::build_update(&changes)?;

        let updated = self
            .collection
            .find_one_and_update(Self::by_id(id), update)
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| write_error(e, changes.code.unwrap_or_default()))?
            .ok_or(ProductError::NotFound(id))?;

        tracing::info!(product_id = %id, "Product updated successfully");
        Ok(updated.into())
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn delete(&self, id: ProductId) -> ProductResult<bool> {
        let result = self.collection.delete_one(Self::by_id(id)).await?;

        if result.deleted_count > 0 {
            tracing::info!(product_id = %id, "Product deleted successfully");
        }
        Ok(result.deleted_count > 0)
    }
}
