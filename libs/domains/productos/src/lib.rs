//! Productos Domain
//!
//! Catalogue of products with a unique integer code and a category from a
//! closed allow-list, backed by MongoDB or an in-memory store.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints under /api/productos
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Validation order, code uniqueness pre-check
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Trait + MongoDB and in-memory implementations
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, DTOs
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_productos::{handlers, mongodb::MongoProductRepository, service::ProductService};
//! use mongodb::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let db = client.database("tienda");
//!
//! let repository = MongoProductRepository::new(&db);
//! repository.init_indexes().await?;
//!
//! let router = handlers::router(ProductService::new(repository));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use error::{ProductError, ProductResult};
pub use handlers::ApiDoc;
pub use memory::InMemoryProductRepository;
pub use models::{
    CreateProduct, NewProduct, Product, ProductCategory, ProductChanges, ProductDeleted,
    ProductId, ProductUpdated, UpdateProduct,
};
pub use mongodb::MongoProductRepository;
pub use repository::ProductRepository;
pub use service::ProductService;
