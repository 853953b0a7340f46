//! Customer signup and user lookup.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use tracing::instrument;

use catalog_core::UserId;

use crate::db::UserRepository;
use crate::error::AppError;
use crate::extract::{IdPath, ValidJson};
use crate::models::{UserData, UserSignup};
use crate::services::accounts;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users/signup", post(signup))
        .route("/users/{id}", get(retrieve))
}

/// `POST /users/signup`
#[instrument(skip_all, fields(username = %input.username))]
pub async fn signup(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<UserSignup>,
) -> Result<(StatusCode, Json<UserData>), AppError> {
    let user = accounts::signup(state.pool(), &input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// `GET /users/{id}`
#[instrument(skip(state))]
pub async fn retrieve(
    State(state): State<AppState>,
    IdPath(id): IdPath<UserId>,
) -> Result<Json<UserData>, AppError> {
    UserRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found("User", id))
        .map(Json)
}
