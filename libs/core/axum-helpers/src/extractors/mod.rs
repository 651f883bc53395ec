//! Custom extractors for Axum handlers.
//!
//! Both extractors reject with [`AppError`](crate::errors::AppError) so every
//! failure leaves the API with the same `{ "error": ... }` body.

pub mod object_id_path;
pub mod json_body;

pub use object_id_path::ObjectIdPath;
pub use json_body::JsonBody;
