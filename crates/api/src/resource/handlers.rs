//! Generic CRUD handlers.
//!
//! ```text
//! GET    {path}        list::<R>
//! POST   {path}        create::<R>
//! GET    {path}/{id}   retrieve::<R>
//! PUT    {path}/{id}   update::<R>
//! PATCH  {path}/{id}   partial_update::<R>
//! DELETE {path}/{id}   destroy::<R>
//! ```

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use super::fields::project_fields;
use super::list::{ListParams, Page, fetch_page};
use super::{Resource, Written, finish_write};
use crate::error::AppError;
use crate::extract::{IdPath, ValidJson, ValidQuery};
use crate::state::AppState;

/// Query parameters accepted by detail routes.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct DetailParams {
    #[serde(default)]
    pub expand: bool,
}

/// Wire all six generic handlers for `R` under `path`.
pub fn crud_router<R: Resource>(path: &str) -> Router<AppState> {
    Router::new()
        .route(path, get(list::<R>).post(create::<R>))
        .route(
            &format!("{path}/{{id}}"),
            get(retrieve::<R>)
                .put(update::<R>)
                .patch(partial_update::<R>)
                .delete(destroy::<R>),
        )
}

/// `GET {path}`
#[instrument(skip_all, fields(resource = R::NAME))]
pub async fn list<R: Resource>(
    State(state): State<AppState>,
    ValidQuery(params): ValidQuery<ListParams>,
    ValidQuery(filter): ValidQuery<R::Filter>,
) -> Result<Json<Page<Value>>, AppError> {
    let window = params.window(state.config().pagination)?;
    let page = fetch_page::<R>(state.pool(), &params, &filter, window).await?;

    let default_fields = R::config().default_fields;
    let results = page
        .results
        .into_iter()
        .map(|row| {
            let value = to_json(&R::present(&state, row))?;
            Ok(if params.expand {
                value
            } else {
                project_fields(value, default_fields)
            })
        })
        .collect::<Result<Vec<_>, AppError>>()?;

    Ok(Json(Page {
        count: page.count,
        page: page.page,
        page_size: page.page_size,
        results,
    }))
}

/// `GET {path}/{id}`
#[instrument(skip_all, fields(resource = R::NAME, id = %id))]
pub async fn retrieve<R: Resource>(
    State(state): State<AppState>,
    IdPath(id): IdPath<R::Id>,
    ValidQuery(params): ValidQuery<DetailParams>,
) -> Result<Json<Value>, AppError> {
    let detail = R::retrieve(&state, id).await?;
    let value = to_json(&detail)?;
    if params.expand {
        Ok(Json(value))
    } else {
        Ok(Json(project_fields(value, R::config().default_fields)))
    }
}

/// `POST {path}`
#[instrument(skip_all, fields(resource = R::NAME))]
pub async fn create<R: Resource>(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<R::Write>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let id = R::create(&state, &input).await?;
    tracing::info!(resource = R::NAME, id = %id, "Created");
    let row = finish_write::<R>(&state, id, Written::Created(&input)).await?;
    Ok((StatusCode::CREATED, Json(to_json(&R::present(&state, row))?)))
}

/// `PUT {path}/{id}`
#[instrument(skip_all, fields(resource = R::NAME, id = %id))]
pub async fn update<R: Resource>(
    State(state): State<AppState>,
    IdPath(id): IdPath<R::Id>,
    ValidJson(input): ValidJson<R::Write>,
) -> Result<Json<Value>, AppError> {
    R::update(&state, id, &input).await?;
    let row = finish_write::<R>(&state, id, Written::Replaced(&input)).await?;
    Ok(Json(to_json(&R::present(&state, row))?))
}

/// `PATCH {path}/{id}`
#[instrument(skip_all, fields(resource = R::NAME, id = %id))]
pub async fn partial_update<R: Resource>(
    State(state): State<AppState>,
    IdPath(id): IdPath<R::Id>,
    ValidJson(input): ValidJson<R::Patch>,
) -> Result<Json<Value>, AppError> {
    R::partial_update(&state, id, &input).await?;
    let row = finish_write::<R>(&state, id, Written::Patched(&input)).await?;
    Ok(Json(to_json(&R::present(&state, row))?))
}

/// `DELETE {path}/{id}`
#[instrument(skip_all, fields(resource = R::NAME, id = %id))]
pub async fn destroy<R: Resource>(
    State(state): State<AppState>,
    IdPath(id): IdPath<R::Id>,
) -> Result<StatusCode, AppError> {
    R::delete(&state, id).await?;
    tracing::info!(resource = R::NAME, id = %id, "Deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Serialize a response value, treating failure as a server error.
pub fn to_json<T: Serialize>(value: &T) -> Result<Value, AppError> {
    serde_json::to_value(value)
        .map_err(|e| AppError::Internal(format!("failed to serialize response: {e}")))
}
