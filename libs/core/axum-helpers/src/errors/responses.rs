//! Reusable OpenAPI response types for consistent API documentation.

use super::ErrorResponse;
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToResponse;

#[derive(ToResponse)]
#[response(
    description = "Internal Server Error",
    content_type = "application/json",
    example = json!({
        "error": "Error interno del servidor",
        "code": "INTERNAL_ERROR"
    })
)]
pub struct InternalServerErrorResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - missing fields, invalid values or duplicate code",
    content_type = "application/json",
    example = json!({
        "error": "Faltan campos obligatorios: codigo, nombre, precio, categoria",
        "code": "VALIDATION_ERROR"
    })
)]
pub struct BadRequestResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - malformed identifier",
    content_type = "application/json",
    example = json!({
        "error": "Identificador inválido: abc",
        "code": "INVALID_ID"
    })
)]
pub struct BadRequestIdResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Resource not found",
    content_type = "application/json",
    example = json!({
        "error": "Producto no encontrado",
        "code": "NOT_FOUND"
    })
)]
pub struct NotFoundResponse(pub ErrorResponse);
