//! Unified error handling for the catalog API.

use std::collections::BTreeMap;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::db::RepositoryError;
use crate::db::variants::VariantWriteError;
use crate::models::ForeignAttribute;
use crate::services::AccountError;
use crate::services::media::MediaError;

/// Message attached to a foreign key that points at nothing.
pub const INVALID_REFERENCE: &str = "Invalid pk - object does not exist.";

/// Application-level error type returned by every handler.
#[derive(Debug, Error)]
pub enum AppError {
    /// One or more input fields failed validation.
    #[error("Invalid input: {0:?}")]
    Validation(FieldErrors),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(RepositoryError),

    /// Reading or writing stored media failed.
    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A unique value is already taken.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Request body exceeds `MAX_BODY_SIZE`.
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// A 404 for `resource` with the given id.
    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("{resource} {id} not found"))
    }

    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Database(_) | Self::Media(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors.into())
    }
}

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound("Not found.".to_string()),
            RepositoryError::Conflict(field) => {
                Self::Conflict(format!("A record with this {field} already exists."))
            }
            RepositoryError::InvalidReference(field) => {
                Self::Validation(FieldErrors::single(field, INVALID_REFERENCE))
            }
            other => Self::Database(other),
        }
    }
}

impl From<ForeignAttribute> for AppError {
    fn from(err: ForeignAttribute) -> Self {
        Self::NotFound(err.to_string())
    }
}

impl From<VariantWriteError> for AppError {
    fn from(err: VariantWriteError) -> Self {
        match err {
            VariantWriteError::Repository(e) => e.into(),
            VariantWriteError::ForeignAttribute(e) => e.into(),
        }
    }
}

impl From<AccountError> for AppError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::Validation(e) => e.into(),
            AccountError::Repository(e) => e.into(),
            AccountError::PasswordHash => Self::Internal("password hashing failed".to_string()),
        }
    }
}

/// Validation failures as sent to clients: `{"field": ["message", ...]}`.
///
/// Nested list failures are keyed `parent[index].field`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    /// One failure not produced by a `Validate` derive.
    #[must_use]
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self(BTreeMap::from([(field.into(), vec![message.into()])]))
    }

    #[cfg(test)]
    pub fn field(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    fn collect(&mut self, prefix: &str, errors: &ValidationErrors) {
        for (field, kind) in errors.errors() {
            let key = if prefix.is_empty() {
                field.to_string()
            } else {
                format!("{prefix}.{field}")
            };
            match kind {
                ValidationErrorsKind::Field(list) => {
                    self.0
                        .entry(key)
                        .or_default()
                        .extend(list.iter().map(describe));
                }
                ValidationErrorsKind::Struct(nested) => self.collect(&key, nested),
                ValidationErrorsKind::List(items) => {
                    for (index, nested) in items {
                        self.collect(&format!("{key}[{index}]"), nested);
                    }
                }
            }
        }
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields = Self::default();
        fields.collect("", &errors);
        fields
    }
}

/// Client-facing text for a single failed rule.
fn describe(error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }
    let param = |name: &str| {
        error
            .params
            .get(name)
            .and_then(serde_json::Value::as_f64)
            .map(|bound| bound.to_string())
    };
    match error.code.as_ref() {
        "length" => match (param("min"), param("max")) {
            (_, Some(max)) => format!("Ensure this field has no more than {max} characters."),
            (Some(min), None) => format!("Ensure this field has at least {min} characters."),
            (None, None) => "Ensure this field has a valid length.".to_string(),
        },
        "range" => param("min").map_or_else(
            || "Ensure this value is within range.".to_string(),
            |min| format!("Ensure this value is greater than or equal to {min}."),
        ),
        code => format!("Invalid value ({code})."),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Log server errors with Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Catalog request error"
            );
        }

        // Don't expose internal error details to clients
        let body = match self {
            Self::Validation(errors) => json!({
                "message": "Invalid input.",
                "errors": errors,
            }),
            Self::NotFound(message)
            | Self::BadRequest(message)
            | Self::Conflict(message)
            | Self::PayloadTooLarge(message) => json!({ "message": message }),
            Self::Database(_) | Self::Media(_) | Self::Internal(_) => {
                json!({ "message": "Internal server error" })
            }
        };

        (status, Json(body)).into_response()
    }
}
