//! JSON body extractor that rejects with [`AppError`].

use crate::errors::AppError;
use axum::extract::{FromRequest, Json, Request};
use serde::de::DeserializeOwned;

/// Drop-in for [`axum::Json`] whose rejections render as 400 `{ "error": ... }`.
///
/// Only deserialization happens here. Field validation is left to the
/// service layer, which decides the order of its checks.
///
/// # Example
/// ```ignore
/// use axum_helpers::extractors::JsonBody;
///
/// async fn create_item(JsonBody(payload): JsonBody<CreateItem>) -> ProductResult<Json<Item>> {
///     service.create(payload).await.map(Json)
/// }
/// ```
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state).await?;
        Ok(JsonBody(data))
    }
}
