//! Request extractors that reject with [`AppError`].
//!
//! - [`ValidJson`] deserializes and validates a body before the handler runs.
//! - [`ValidQuery`] turns malformed query strings into validation errors.
//! - [`IdPath`] treats an unparsable id like an unknown one (404).

use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts, Path, Query, Request,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, request::Parts},
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::{AppError, FieldErrors};

/// Key used for errors that are not tied to one field.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// JSON body that has passed [`Validate`].
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection)?;
        value.validate()?;
        Ok(Self(value))
    }
}

fn json_rejection(rejection: JsonRejection) -> AppError {
    match rejection {
        JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => {
            AppError::Validation(FieldErrors::single(
                NON_FIELD_ERRORS,
                rejection.body_text(),
            ))
        }
        other if other.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            AppError::PayloadTooLarge(other.body_text())
        }
        other => AppError::BadRequest(other.body_text()),
    }
}

/// Query string parameters; unknown keys are ignored.
#[derive(Debug, Clone, Default)]
pub struct ValidQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection: QueryRejection| {
                AppError::Validation(FieldErrors::single(
                    NON_FIELD_ERRORS,
                    rejection.body_text(),
                ))
            })?;
        Ok(Self(value))
    }
}

/// A detail route's `{id}` segment.
#[derive(Debug, Clone, Copy)]
pub struct IdPath<T>(pub T);

impl<T, S> FromRequestParts<S> for IdPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::NotFound("Not found.".to_string()))?;
        Ok(Self(id))
    }
}
