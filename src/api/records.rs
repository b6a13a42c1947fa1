//! Collection endpoints shared by the users, threads and posts services

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::Value;

use crate::api::types::{ApiError, Json};
use crate::domain::Record;

use super::state::AppState;

/// List the whole collection
pub async fn list_records(State(state): State<AppState>) -> Result<Json<Vec<Record>>, ApiError> {
    let records = state.forum.list().await.map_err(|e| state.error(e))?;
    Ok(Json(records))
}

/// Fetch one record, 404 when absent
pub async fn get_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Record>, ApiError> {
    let record = state
        .forum
        .get_required(&id)
        .await
        .map_err(|e| state.error(e))?;

    Ok(Json(record))
}

/// Create a post or thread; the body is passed through unvalidated
pub async fn create_record(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let created = state.forum.create(body).await.map_err(|e| state.error(e))?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn posts_in_thread(
    State(state): State<AppState>,
    Path(thread_id): Path<String>,
) -> Result<Json<Vec<Record>>, ApiError> {
    let posts = state
        .forum
        .posts_in_thread(&thread_id)
        .await
        .map_err(|e| state.error(e))?;

    Ok(Json(posts))
}

pub async fn posts_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Record>>, ApiError> {
    let posts = state
        .forum
        .posts_by_user(&user_id)
        .await
        .map_err(|e| state.error(e))?;

    Ok(Json(posts))
}
