use crate::db::errors::DbError;
use axum::{
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    /// Credentials were not provided or could not be read
    #[error("Not authenticated")]
    Unauthenticated { message: Option<String> },

    /// Username and password did not match a stored profile
    #[error("Authentication failed for {username}")]
    FailedAuthentication { username: String },

    /// Required attributes were absent or blank
    #[error("Missing required attributes: {}", .attributes.join(", "))]
    MissingAttributes { attributes: Vec<String> },

    /// A new password did not meet the password policy
    #[error("{message}")]
    InvalidPassword { message: String },

    /// Invalid request data or business rule violation
    #[error("{message}")]
    BadRequest { message: String },

    /// Requested resource not found
    #[error("{resource} {id} not found")]
    NotFound { resource: String, id: String },

    /// Generic internal service error
    #[error("Failed to {operation}")]
    Internal { operation: String },

    /// Store operation error
    #[error(transparent)]
    Database(#[from] DbError),

    /// Unexpected error with full context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),

    /// Conflict error, e.g., for unique constraint violations
    #[error("Conflict: {message}")]
    Conflict { message: String },
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Unauthenticated { .. } | Error::FailedAuthentication { .. } => StatusCode::UNAUTHORIZED,
            Error::MissingAttributes { .. } | Error::InvalidPassword { .. } | Error::BadRequest { .. } => {
                StatusCode::BAD_REQUEST
            }
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Database(db_err) => match db_err {
                DbError::NotFound => StatusCode::NOT_FOUND,
                DbError::UniqueViolation { .. } => StatusCode::CONFLICT,
                DbError::ForeignKeyViolation { .. } => StatusCode::BAD_REQUEST,
                DbError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Conflict { .. } => StatusCode::CONFLICT,
        }
    }

    /// Returns a user-safe error message, without leaking internal implementation details
    pub fn user_message(&self) -> String {
        match self {
            Error::Unauthenticated { message } => message.clone().unwrap_or_else(|| "Authentication required".to_string()),
            // Same text whether the username or the password was wrong
            Error::FailedAuthentication { .. } => "Invalid username or password".to_string(),
            Error::MissingAttributes { attributes } if attributes.is_empty() => "No attributes provided".to_string(),
            Error::MissingAttributes { attributes } => format!("Missing required attributes: {}", attributes.join(", ")),
            Error::InvalidPassword { message } | Error::BadRequest { message } => message.clone(),
            Error::NotFound { resource, id } => format!("{resource} {id} not found"),
            Error::Internal { .. } => "Internal server error".to_string(),
            Error::Database(db_err) => match db_err {
                DbError::NotFound => "Resource not found".to_string(),
                DbError::UniqueViolation { table, .. } => match *table {
                    "users" => "This username is already taken".to_string(),
                    "training_types" => "A training type with this name already exists".to_string(),
                    _ => "Resource already exists".to_string(),
                },
                DbError::ForeignKeyViolation { .. } => "Invalid reference to related resource".to_string(),
                DbError::Other(_) => "Database error occurred".to_string(),
            },
            Error::Other(_) => "Internal server error".to_string(),
            Error::Conflict { message } => message.clone(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Log full error details for debugging - different log levels based on severity
        match &self {
            Error::Database(DbError::Other(_)) | Error::Internal { .. } | Error::Other(_) => {
                tracing::error!("Internal service error: {:#}", self);
            }
            Error::Database(_) => {
                tracing::warn!("Database constraint error: {}", self);
            }
            Error::Unauthenticated { .. } | Error::FailedAuthentication { .. } => {
                tracing::info!("Authentication error: {}", self);
            }
            Error::MissingAttributes { .. } | Error::InvalidPassword { .. } | Error::BadRequest { .. } | Error::NotFound { .. } => {
                tracing::debug!("Client error: {}", self);
            }
            Error::Conflict { .. } => {
                tracing::warn!("Conflict error: {}", self);
            }
        }

        let status = self.status_code();

        match &self {
            Error::MissingAttributes { attributes } => {
                use serde_json::json;
                let body = json!({
                    "message": self.user_message(),
                    "missing": attributes,
                });
                (status, axum::response::Json(body)).into_response()
            }
            Error::Conflict { message } => {
                use serde_json::json;
                (status, axum::response::Json(json!({ "message": message }))).into_response()
            }
            Error::Database(DbError::UniqueViolation { table, .. }) => {
                use serde_json::json;
                let resource = match *table {
                    "users" => "user",
                    "training_types" => "training_type",
                    "trainees" => "trainee",
                    "trainers" => "trainer",
                    _ => "unknown",
                };
                let body = json!({
                    "message": self.user_message(),
                    "resource": resource
                });
                (status, axum::response::Json(body)).into_response()
            }
            Error::Unauthenticated { .. } | Error::FailedAuthentication { .. } => {
                let mut response = (status, self.user_message()).into_response();
                response
                    .headers_mut()
                    .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Basic realm=\"gymctl\""));
                response
            }
            _ => (status, self.user_message()).into_response(),
        }
    }
}

/// Convert from String errors (e.g., from external functions)
/// Type alias for service operation results
pub type Result<T> = std::result::Result<T, Error>;
