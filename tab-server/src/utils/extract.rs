//! Request extractors
//!
//! [`ApiJson`] behaves like `axum::Json` but rejects with [`AppError`], so a
//! malformed body gets the same `{code, message}` envelope as every other
//! validation failure.

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};

use super::AppError;

/// JSON body extractor rejecting with [`AppError::Validation`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::validation(rejection.body_text())
    }
}
