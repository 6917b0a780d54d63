// HTTP routes
pub mod auth;
pub mod health;

pub use auth::*;
pub use health::*;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use crate::domains::auth::AuthError;

/// Map the error taxonomy onto HTTP status codes; messages pass through
/// unmodified.
impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match &self {
            AuthError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            AuthError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            AuthError::NotFound(_) => StatusCode::NOT_FOUND,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if let AuthError::Internal(e) = &self {
            error!("request failed: {e:#}");
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
