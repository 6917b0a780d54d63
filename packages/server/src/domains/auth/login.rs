//! Login flow - the two-step Login -> Verify state machine.
//!
//! No state is held between the steps beyond what the login record
//! persists. Login resolves the tenant, guards deletion, and delegates the
//! send; Verify validates the code, decorates with the profile, and issues
//! the session token.

use tracing::info;

use crate::common::account_id;
use crate::domains::auth::errors::AuthError;
use crate::domains::auth::models::DeletionRequest;
use crate::domains::auth::otp;
use crate::domains::auth::types::VerifiedLogin;
use crate::domains::profile::{Profile, ProfileView};
use crate::domains::tenant::Tenant;
use crate::kernel::ServerDeps;

/// Step one: trigger an OTP send for the contact.
///
/// The deletion guard runs strictly before any send; an account with a
/// pending deletion request never receives a code.
pub async fn login(
    deps: &ServerDeps,
    domain_token: &str,
    contact: &str,
) -> Result<(), AuthError> {
    let tenant = resolve_tenant(deps, domain_token).await?;

    if DeletionRequest::pending(deps, &tenant, &account_id(contact)).await? {
        return Err(AuthError::denied("account marked for deletion"));
    }

    otp::send_otp(deps, &tenant, contact).await
}

/// Step two: check the submitted code and open a session.
pub async fn verify(
    deps: &ServerDeps,
    domain_token: &str,
    contact: &str,
    code: &str,
) -> Result<VerifiedLogin, AuthError> {
    let tenant = resolve_tenant(deps, domain_token).await?;

    // A contact that never completed a send has nothing to verify against
    let record = otp::login_info(deps, &tenant, contact)
        .await?
        .filter(|r| r.is_persisted());
    let Some(record) = record else {
        return Err(AuthError::denied("wrong otp"));
    };

    if !otp::validate_otp(deps, &tenant, contact, code).await? {
        return Err(AuthError::denied("wrong otp"));
    }

    // First-time verified users have no profile yet; proceed with empty data
    let profile = Profile::fetch(deps, &tenant, &record.account_id)
        .join()
        .await?;
    let view = ProfileView::merged(profile, &record);

    let token = deps
        .jwt_service
        .sign(&tenant.name, &record.account_id, &record.user_type)?;

    info!(tenant = %tenant.name, "login verified");

    Ok(VerifiedLogin {
        token,
        user_type: record.user_type,
        profile: view,
    })
}

/// Shared domain-token validation for both steps.
async fn resolve_tenant(deps: &ServerDeps, domain_token: &str) -> Result<Tenant, AuthError> {
    if domain_token.is_empty() {
        return Err(AuthError::invalid("domain token required"));
    }

    Tenant::find_by_access_token(deps, domain_token)
        .await?
        .ok_or_else(|| AuthError::denied("invalid domain token"))
}
