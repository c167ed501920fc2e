//! Admin key guard

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use ideia_common::{IdeiaError, ADMIN_KEY_HEADER};
use tracing::warn;

use super::{error::ApiError, AppState};

/// Reject requests whose admin key header does not match the configured secret
///
/// With no secret configured every admin request is rejected.
pub async fn require_admin_key(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let presented = req
        .headers()
        .get(ADMIN_KEY_HEADER)
        .and_then(|v| v.to_str().ok());

    let authorized = match (state.admin_key(), presented) {
        (Some(expected), Some(given)) => constant_time_eq(expected.as_bytes(), given.as_bytes()),
        _ => false,
    };

    if authorized {
        next.run(req).await
    } else {
        warn!(path = %req.uri().path(), "Rejected admin request");
        ApiError(IdeiaError::Unauthorized).into_response()
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
