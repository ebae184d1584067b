// src/web/extractors.rs
use crate::error::AppError;
use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// Corpo JSON desserializado e validado com `validator`.
/// Qualquer falha vira um 400 com `{"detail": ...}`.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|e| match e {
            JsonRejection::JsonDataError(e) => AppError::bad_request(e.body_text()),
            JsonRejection::JsonSyntaxError(e) => AppError::bad_request(e.body_text()),
            JsonRejection::MissingJsonContentType(e) => AppError::bad_request(e.body_text()),
            other => AppError::bad_request(other.body_text()),
        })?;

        value.validate()?;
        Ok(ValidatedJson(value))
    }
}
