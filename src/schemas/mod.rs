//! Request/response schemas
//!
//! Every request body and query string is validated at the boundary with
//! `validator` before a handler sees it. Handlers take
//! [`ValidatedJson`] / [`ValidatedQuery`] instead of the plain axum
//! extractors; failures become a 422 with per-field details.

pub mod admin;
pub mod auth;
pub mod listings;
pub mod profiles;
pub mod users;

pub use admin::*;
pub use auth::*;
pub use listings::*;
pub use profiles::*;
pub use users::*;

use axum::{
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::types::AppError;

/// JSON body that has passed [`Validate`].
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::InvalidRequest(rejection.body_text()))?;
        value.validate()?;
        Ok(Self(value))
    }
}

/// Query string that has passed [`Validate`].
#[derive(Debug, Clone)]
pub struct ValidatedQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::InvalidRequest(rejection.body_text()))?;
        value.validate()?;
        Ok(Self(value))
    }
}
