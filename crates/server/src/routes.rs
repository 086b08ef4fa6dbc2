use std::sync::Arc;

use axum::{routing::get, Json, Router};
use models::db::{StoreHandle, TODOS};
use models::todo::Todo;
use service::storage::json_kv_store::JsonKvStore;
use service::todo::repository::{KvTodoRepository, TodoRepository};
use service::todo::service::TodoService;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use crate::openapi::ApiDoc;

pub mod todos;

/// Shared handler state: the todo access layer over one store handle.
#[derive(Clone)]
pub struct AppState {
    pub todos: Arc<TodoService<dyn TodoRepository>>,
}

impl AppState {
    /// Wire the redb-backed repository over an opened store.
    pub fn from_store(db: StoreHandle) -> Self {
        // typed JSON view over the todos table
        let store = JsonKvStore::<Todo>::new(db, TODOS);
        Self::with_repository(Arc::new(KvTodoRepository::new(store)))
    }

    /// Any repository; tests pass the in-memory mock or a temp-file store here.
    pub fn with_repository(repo: Arc<dyn TodoRepository>) -> Self {
        Self { todos: Arc::new(TodoService::new(repo)) }
    }
}

#[utoipa::path(get, path = "/status", tag = "health", responses((status = 200, description = "ONLINE")))]
pub async fn status() -> &'static str {
    common::types::ONLINE
}

/// Raw OpenAPI JSON; no bundled UI.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router: liveness, todo CRUD, and the OpenAPI document
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        // liveness
        .route("/status", get(status))
        // todo CRUD; `:key` must parse as u64 or axum answers 400
        .route("/todos", get(todos::list).post(todos::insert))
        .route(
            "/todos/:key",
            get(todos::find).put(todos::update).delete(todos::delete),
        )
        .route("/api-docs/openapi.json", get(openapi_json))
        .with_state(state)
        .layer(cors)
        // one span per request; headers are left out of the logs
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 5xx
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
