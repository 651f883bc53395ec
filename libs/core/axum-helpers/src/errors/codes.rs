//! Type-safe error codes for API responses.
//!
//! Each code has a machine identifier for clients (e.g. `"VALIDATION_ERROR"`)
//! and an integer for logs and dashboards (e.g. `1001`).
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::ValidationError;
//! assert_eq!(code.as_str(), "VALIDATION_ERROR");
//! assert_eq!(code.code(), 1001);
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000-1999)
    /// Request validation failed
    ValidationError,

    /// Path identifier is not a valid ObjectId
    InvalidId,

    /// Request body is not valid JSON for the target type
    InvalidJson,

    NotFound,

    // Server errors (1500-1999)
    InternalError,
}

impl ErrorCode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidId => "INVALID_ID",
            Self::InvalidJson => "INVALID_JSON",
            Self::NotFound => "NOT_FOUND",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    pub const fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::InvalidId => 1002,
            Self::InvalidJson => 1003,
            Self::NotFound => 1004,
            Self::InternalError => 1500,
        }
    }

    /// Message used when the caller has nothing more specific to say
    pub const fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "La solicitud no es válida",
            Self::InvalidId => "Identificador inválido",
            Self::InvalidJson => "El cuerpo de la solicitud no es JSON válido",
            Self::NotFound => "Recurso no encontrado",
            Self::InternalError => "Error interno del servidor",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
