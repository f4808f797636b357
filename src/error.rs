//! Error types for the Shelfmark server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;

/// Per-field validation messages, in insertion order.
///
/// Serializes as a plain `{"field": ["message", ...]}` map so clients can
/// attach each message to the offending input. Cross-field violations go
/// under [`NON_FIELD_ERRORS`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, utoipa::ToSchema)]
#[schema(value_type = Object)]
pub struct FieldErrors(pub IndexMap<String, Vec<String>>);

/// Key used for object-level (cross-field) validation messages.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message to a field, keeping earlier messages for that field.
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Fold accumulated violations into a result.
    pub fn into_result(self) -> Result<(), AppError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self))
        }
    }

    /// Merge errors produced by `validator` derives, sorted by field name so
    /// the output is deterministic.
    pub fn extend_from_validator(&mut self, errors: validator::ValidationErrors) {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by_key(|(field, _)| *field);
        for (field, violations) in fields {
            for violation in violations {
                let message = violation
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value ({}).", violation.code));
                self.push(field.to_string(), message);
            }
        }
    }
}

impl From<validator::ValidationErrors> for FieldErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut map = FieldErrors::new();
        map.extend_from_validator(errors);
        map
    }
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation failed")]
    Validation(FieldErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Response body for non-validation errors
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorDetail {
    pub detail: String,
}

impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        // Uniqueness and referential violations at the storage layer are
        // surfaced to the caller as validation-style errors keyed by field.
        if let sqlx::Error::Database(ref db) = err {
            if let Some(constraint) = db.constraint() {
                let mut errors = FieldErrors::new();
                match constraint {
                    "books_isbn_key" => {
                        errors.push("isbn", "A book with this ISBN already exists.");
                    }
                    "books_title_author_id_key" => {
                        errors.push(
                            NON_FIELD_ERRORS,
                            "A book with this title already exists for this author.",
                        );
                    }
                    "books_author_id_fkey" => {
                        errors.push("author", "Referenced author does not exist.");
                    }
                    "authors_name_key" => {
                        errors.push("name", "An author with this name already exists.");
                    }
                    "users_username_key" => {
                        errors.push("username", "A user with this username already exists.");
                    }
                    _ => return AppError::Database(err),
                }
                return AppError::Validation(errors);
            }
        }
        AppError::Database(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, Json(errors)).into_response()
            }
            AppError::Authentication(msg) => detail(StatusCode::UNAUTHORIZED, msg),
            AppError::PermissionDenied(msg) => detail(StatusCode::FORBIDDEN, msg),
            AppError::NotFound(msg) => detail(StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => detail(StatusCode::BAD_REQUEST, msg),
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                detail(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                detail(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        }
    }
}

fn detail(status: StatusCode, message: String) -> Response {
    (status, Json(ErrorDetail { detail: message })).into_response()
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
