/// Request extractors
///
/// Axum's stock `Json` extractor rejects undecodable bodies with 422.
/// The API contract treats every malformed body as a validation problem,
/// so `ApiJson` wraps `Json` and downgrades the rejection to a 400 with
/// the standard error envelope.

use crate::error::ApiError;
use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

/// JSON body extractor that rejects with 400 instead of 415/422
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(ApiError::BadRequest(rejection.body_text())),
        }
    }
}
