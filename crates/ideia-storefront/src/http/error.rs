//! HTTP error mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use ideia_common::IdeiaError;
use serde_json::json;
use tracing::error;

/// Error returned by every handler
#[derive(Debug)]
pub struct ApiError(pub IdeiaError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            IdeiaError::Unauthorized => StatusCode::UNAUTHORIZED,
            IdeiaError::NotFound(_) => StatusCode::NOT_FOUND,
            IdeiaError::Pricing(_)
            | IdeiaError::Checkout(_)
            | IdeiaError::Order(_)
            | IdeiaError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl<E> From<E> for ApiError
where
    E: Into<IdeiaError>,
{
    fn from(err: E) -> Self {
        ApiError(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self.0, "Request failed");
        }
        let body = Json(json!({ "ok": false, "message": self.0.to_string() }));
        (status, body).into_response()
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
