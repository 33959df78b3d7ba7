//! HTTP request handlers for all API endpoints.
//!
//! Handlers decode the request, check that Basic credentials match the username in the path,
//! and hand off to the services in [`crate::services`]. Synchronous service calls run through
//! [`crate::services::blocking`].
//!
//! # Handler Modules
//!
//! - [`auth`]: login and password changes
//! - [`trainees`]: trainee registration, profile management and trainee trainings
//! - [`trainers`]: trainer registration, profile management and trainer trainings
//! - [`training_types`]: the training type catalogue
//! - [`trainings`]: adding and deleting trainings
//!
//! # Error Handling
//!
//! Handlers return [`crate::errors::Error`], which converts to the matching HTTP status code
//! and a JSON body.

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};
use uuid::Uuid;

use crate::services::trainings::Propagation;

pub mod auth;
pub mod trainees;
pub mod trainers;
pub mod training_types;
pub mod trainings;

/// Header carrying the id used to correlate a request across services.
pub const TRANSACTION_ID_HEADER: &str = "x-transaction-id";

/// Request-scoped values forwarded to downstream services.
///
/// The transaction id is taken from `X-Transaction-Id` or generated. Only a `Bearer` token is
/// forwarded from the `Authorization` header; Basic credentials carry the caller's password and
/// never leave this service.
#[derive(Debug, Clone)]
pub struct RequestContext(pub Propagation);

impl RequestContext {
    fn from_headers(headers: &HeaderMap) -> Self {
        let transaction_id = headers
            .get(TRANSACTION_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let authorization = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .filter(|value| is_bearer(value))
            .map(str::to_string);

        Self(Propagation {
            transaction_id,
            authorization,
        })
    }
}

fn is_bearer(value: &str) -> bool {
    value
        .split_once(' ')
        .is_some_and(|(scheme, token)| scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty())
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}
