//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application.
//! Every service operation returns it, and the HTTP layer turns it into a response through
//! `actix_web::error::ResponseError`.
//!
//! The client only ever sees a short, fixed message per category. Details of store and
//! internal failures are logged server-side and never serialized into a response body.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use validator::ValidationErrors;

use crate::store::StoreError;

/// Represents all possible errors that can occur within the application.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Missing or malformed input (HTTP 400).
    #[error("Validation error: {0}")]
    Validation(String),
    /// A unique key is already taken (HTTP 409).
    #[error("Conflict: {0}")]
    Conflict(String),
    /// Credentials were rejected at login (HTTP 401).
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    /// A protected route was reached without a valid token (HTTP 403).
    #[error("Forbidden: {0}")]
    Forbidden(String),
    /// No row matches the requested id for this caller (HTTP 404).
    #[error("Not found: {0}")]
    NotFound(String),
    /// The store could not be reached in time (HTTP 503). The message is logged, not returned.
    #[error("Unavailable: {0}")]
    Unavailable(String),
    /// Anything unexpected (HTTP 500). The message is logged, not returned.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// The text placed in the `message` field of the response body.
    pub fn client_message(&self) -> &str {
        match self {
            AppError::Validation(msg)
            | AppError::Conflict(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg) => msg,
            AppError::Unavailable(_) => "Service temporarily unavailable",
            AppError::Internal(_) => "Internal server error",
        }
    }
}

/// Converts `AppError` variants into `HttpResponse` objects.
///
/// Server-side failures are logged here, at the single point where they leave the application.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Unavailable(detail) => log::error!("store unavailable: {}", detail),
            AppError::Internal(detail) => log::error!("internal error: {}", detail),
            _ => {}
        }
        HttpResponse::build(self.status_code()).json(json!({
            "message": self.client_message()
        }))
    }
}

impl From<StoreError> for AppError {
    fn from(error: StoreError) -> AppError {
        match error {
            StoreError::Conflict(msg) => AppError::Conflict(msg),
            StoreError::Unavailable(msg) => AppError::Unavailable(msg),
            StoreError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// Converts `validator::ValidationErrors` into `AppError::Validation`.
///
/// One message is kept: the struct-level rule wins, then fields in name order, so a
/// payload breaking several rules always gets the same text.
impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> AppError {
        let errors = errors.errors();
        let mut fields: Vec<&&'static str> = errors.keys().collect();
        fields.sort_by_key(|field| (**field != STRUCT_LEVEL, **field));
        let message = fields
            .into_iter()
            .find_map(|field| match &errors[*field] {
                validator::ValidationErrorsKind::Field(list) => {
                    list.iter().find_map(|e| e.message.as_ref().map(|m| m.to_string()))
                }
                _ => None,
            })
            .unwrap_or_else(|| "Invalid input".to_string());
        AppError::Validation(message)
    }
}

/// Key under which `validator` files errors from `#[validate(schema(...))]`.
const STRUCT_LEVEL: &str = "__all__";

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        log::debug!("token rejected: {}", error);
        AppError::Forbidden("Invalid or expired token".into())
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::Internal(format!("bcrypt: {}", error))
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(error: tokio::task::JoinError) -> AppError {
        AppError::Internal(format!("blocking task failed: {}", error))
    }
}
