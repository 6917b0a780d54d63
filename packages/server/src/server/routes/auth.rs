//! Login endpoints.
//!
//! Thin JSON adapters over the login flow; all decisions live in
//! `domains::auth`.

use axum::extract::Extension;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::domains::auth::{accounts, login, AuthError, VerifiedLogin};
use crate::domains::profile::ProfileView;
use crate::domains::tenant::Tenant;
use crate::server::app::AppState;
use crate::server::middleware::AuthSession;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub domain: String,
    pub email_or_phone: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub status: &'static str,
}

/// `POST /auth/login` - resolve the tenant and send an OTP.
pub async fn login_handler(
    Extension(state): Extension<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthError> {
    login::login(&state.deps, &request.domain, &request.email_or_phone).await?;
    Ok(Json(LoginResponse { status: "success" }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    pub domain: String,
    pub email_or_phone: String,
    pub otp: String,
}

/// `POST /auth/verify` - validate the code and open a session.
pub async fn verify_handler(
    Extension(state): Extension<AppState>,
    Json(request): Json<VerifyRequest>,
) -> Result<Json<VerifiedLogin>, AuthError> {
    let verified = login::verify(
        &state.deps,
        &request.domain,
        &request.email_or_phone,
        &request.otp,
    )
    .await?;
    Ok(Json(verified))
}

/// `GET /auth/me` - merged account view for the session's account.
///
/// Runs the full account guard: the record must exist and must be neither
/// blocked nor marked for deletion.
pub async fn me_handler(
    Extension(state): Extension<AppState>,
    Extension(session): Extension<AuthSession>,
) -> Result<Json<ProfileView>, AuthError> {
    let tenant = Tenant::find_by_name(&state.deps, &session.claims.tenant)
        .await?
        .ok_or_else(|| AuthError::denied("unknown tenant"))?;

    let view = accounts::account_view(&state.deps, &tenant, &session.claims.sub).await?;
    Ok(Json(view))
}
