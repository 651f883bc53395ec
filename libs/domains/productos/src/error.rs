use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use mongodb::error::{ErrorKind, WriteFailure};
use thiserror::Error;
use validator::ValidationErrors;

use crate::models::{ProductCategory, ProductId};

/// MongoDB server code for a unique index violation
const DUPLICATE_KEY_CODE: i32 = 11000;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Producto no encontrado")]
    NotFound(ProductId),

    #[error("Ya existe un producto con el código {0}")]
    DuplicateCode(i64),

    #[error("Categoría no permitida: {0}. Valores permitidos: {allowed}", allowed = ProductCategory::allowed())]
    InvalidCategory(String),

    #[error("Faltan campos obligatorios: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Datos inválidos: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ProductResult<T> = Result<T, ProductError>;

/// Convert ProductError to AppError for standardized error responses
impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(_) => AppError::NotFound(err.to_string()),
            ProductError::DuplicateCode(_)
            | ProductError::InvalidCategory(_)
            | ProductError::MissingFields(_) => AppError::BadRequest(err.to_string()),
            ProductError::Validation(errors) => AppError::ValidationError(errors),
            ProductError::Database(msg) => AppError::InternalServerError(msg),
            ProductError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for ProductError {
    fn from(err: mongodb::error::Error) -> Self {
        ProductError::Database(err.to_string())
    }
}

/// Whether a driver error is a unique index violation
pub fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) => e.code == DUPLICATE_KEY_CODE,
        ErrorKind::Command(e) => e.code == DUPLICATE_KEY_CODE,
        _ => false,
    }
}
