use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use models::todo::{Todo, TodoInput};
use serde::Deserialize;
use service::pagination::ListOptions;

use crate::{errors::ApiError, routes::AppState};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Maximum number of todos (default 500)
    pub limit: Option<u32>,
    /// Newest first (default true)
    pub reverse: Option<bool>,
}

impl From<ListQuery> for ListOptions {
    fn from(q: ListQuery) -> Self { ListOptions { limit: q.limit, reverse: q.reverse } }
}

#[utoipa::path(
    get, path = "/todos", tag = "todos",
    params(ListQuery),
    responses(
        (status = 200, description = "Todos in key order", body = [crate::openapi::TodoDoc]),
        (status = 500, description = "Store Failure")
    )
)]
pub async fn list(State(state): State<AppState>, Query(q): Query<ListQuery>) -> Result<Json<Vec<Todo>>, ApiError> {
    Ok(Json(state.todos.list(q.into()).await?))
}

#[utoipa::path(
    get, path = "/todos/{key}", tag = "todos",
    params(("key" = u64, Path, description = "Todo key (creation epoch millis)")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::TodoDoc),
        (status = 404, description = "Not Found")
    )
)]
pub async fn find(State(state): State<AppState>, Path(key): Path<u64>) -> Result<Json<Todo>, ApiError> {
    Ok(Json(state.todos.find(key).await?))
}

#[utoipa::path(
    post, path = "/todos", tag = "todos",
    request_body = crate::openapi::TodoInputDoc,
    responses(
        (status = 200, description = "Created with generated key", body = crate::openapi::TodoDoc),
        (status = 500, description = "Store Failure")
    )
)]
pub async fn insert(State(state): State<AppState>, Json(input): Json<TodoInput>) -> Result<Json<Todo>, ApiError> {
    Ok(Json(state.todos.insert(input).await?))
}

#[utoipa::path(
    put, path = "/todos/{key}", tag = "todos",
    params(("key" = u64, Path, description = "Todo key (creation epoch millis)")),
    request_body = crate::openapi::TodoInputDoc,
    responses(
        (status = 200, description = "Overwritten", body = crate::openapi::TodoDoc),
        (status = 500, description = "Store Failure")
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(key): Path<u64>,
    Json(input): Json<TodoInput>,
) -> Result<Json<Todo>, ApiError> {
    Ok(Json(state.todos.update(key, input).await?))
}

#[utoipa::path(
    delete, path = "/todos/{key}", tag = "todos",
    params(("key" = u64, Path, description = "Todo key (creation epoch millis)")),
    responses(
        (status = 204, description = "Deleted or already absent"),
        (status = 500, description = "Store Failure")
    )
)]
pub async fn delete(State(state): State<AppState>, Path(key): Path<u64>) -> Result<StatusCode, ApiError> {
    state.todos.delete(key).await?;
    Ok(StatusCode::NO_CONTENT)
}
