use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::ErrorBody;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::error;

/// HTTP face of a failed todo operation.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        let status = match &e {
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => {
                error!(err = %e, "todo operation failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self { status, message: e.to_string() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { error: self.message })).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("cannot open store: {0}")]
    Store(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        let err = ApiError::from(ServiceError::not_found("todo 1"));
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.message, "not found: todo 1 not found");
    }

    #[test]
    fn store_failures_map_to_500() {
        let err = ApiError::from(ServiceError::store("disk full"));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        let err = ApiError::from(ServiceError::codec("bad bytes"));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
