use axum::extract::Extension;
use axum::http::StatusCode;
use axum::{middleware::Next, response::Response};
use tracing::debug;

use crate::domains::auth::Claims;
use crate::server::app::AppState;

/// Verified session attached to guarded requests.
#[derive(Clone, Debug)]
pub struct AuthSession {
    pub claims: Claims,
}

/// Session token middleware for guarded routes.
///
/// Extracts the bearer token, verifies signature/expiry/issuer, and adds
/// AuthSession to request extensions. Requests without a valid token are
/// rejected; the per-account guards (existence, blocked, deletion) run in
/// the handlers via `accounts::account_view`.
pub async fn token_auth_middleware(
    Extension(state): Extension<AppState>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(claims) = extract_claims(&request, &state) else {
        debug!("No valid session token");
        return Err(StatusCode::UNAUTHORIZED);
    };

    debug!(tenant = %claims.tenant, "Authenticated session");
    request.extensions_mut().insert(AuthSession { claims });

    Ok(next.run(request).await)
}

/// Extract and verify the session token from the request.
fn extract_claims(
    request: &axum::http::Request<axum::body::Body>,
    state: &AppState,
) -> Option<Claims> {
    let auth_header = request.headers().get("authorization")?;
    let auth_str = auth_header.to_str().ok()?;

    // Accept both "Bearer <token>" and a raw token
    let token = auth_str.strip_prefix("Bearer ").unwrap_or(auth_str);

    state.deps.jwt_service.verify_token(token).ok()
}
