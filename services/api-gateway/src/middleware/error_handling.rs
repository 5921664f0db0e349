use axum::{
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use tracing::{error, warn};

use insight_utils::{ErrorResponse, InsightError};

/// Handler error type: an [`InsightError`] rendered as an `ErrorResponse` body.
#[derive(Debug)]
pub struct ApiError(pub InsightError);

pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            error!(code = self.0.error_code(), "{}", self.0);
        }
        (status, Json(ErrorResponse::from(self.0))).into_response()
    }
}

impl From<InsightError> for ApiError {
    fn from(error: InsightError) -> Self {
        Self(error)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(error: anyhow::Error) -> Self {
        Self(error.into())
    }
}

impl From<insight_utils::report::ExtractionError> for ApiError {
    fn from(error: insight_utils::report::ExtractionError) -> Self {
        Self(error.into())
    }
}

pub async fn error_handling_middleware(
    request: Request<axum::body::Body>,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    let status = response.status();
    if status.is_server_error() {
        error!(%method, %uri, status = status.as_u16(), "Request failed");
    } else if status == StatusCode::PAYLOAD_TOO_LARGE {
        warn!(%method, %uri, "Request body rejected as too large");
    }

    response
}
