//! API handlers for Alexandria REST endpoints

pub mod authors;
pub mod books;
pub mod categories;
pub mod health;
pub mod openapi;

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// JSON body extractor that reports deserialization failures through the
/// application error taxonomy (400) instead of axum's default rejection
pub struct AppJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::validation("body", &e.body_text()))?;
        Ok(AppJson(value))
    }
}

/// Query string extractor with the same error mapping as [`AppJson`]
pub struct AppQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for AppQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::validation("query", &e.body_text()))?;
        Ok(AppQuery(value))
    }
}
