//! OTP coordination - channel selection, resend rate limiting, identity
//! unification.
//!
//! Behavior shared by every channel lives here exactly once: the resend
//! window and the account-id assignment must not diverge between the email
//! and phone paths.

use chrono::Utc;
use tracing::{info, warn};

use crate::common::account_id;
use crate::domains::auth::channel::Channel;
use crate::domains::auth::errors::AuthError;
use crate::domains::auth::models::LoginRecord;
use crate::domains::tenant::Tenant;
use crate::kernel::ServerDeps;

/// Minimum gap between two OTP sends for the same contact.
pub const OTP_RESEND_WINDOW_SECS: i64 = 60;

/// Send an OTP to the contact over the first matching channel.
///
/// Persists the send bookkeeping; a brand-new contact gets its unified
/// account id here so the value is identical whichever channel created it.
pub async fn send_otp(
    deps: &ServerDeps,
    tenant: &Tenant,
    contact: &str,
) -> Result<(), AuthError> {
    let channel = Channel::select(contact)
        .ok_or_else(|| AuthError::invalid("incorrect contact"))?;

    let mut record = channel.login_info(deps, tenant, contact).await?;

    // The window only applies to records that have actually been persisted;
    // a fresh default record has never been sent anything.
    let now = Utc::now().timestamp();
    if record.is_persisted() && now - record.last_otp_sent_epoch < OTP_RESEND_WINDOW_SECS {
        return Err(AuthError::denied("rate limited"));
    }

    record.last_otp_sent_epoch = now;

    if let Err(e) = channel.send(deps, contact).await {
        warn!(tenant = %tenant.name, "OTP send failed: {e:#}");
        return Err(AuthError::Internal(e.context("send failed")));
    }

    if record.account_id.is_empty() {
        record.account_id = account_id(contact);
    }

    channel.save_login_info(deps, tenant, record).await?;

    info!(tenant = %tenant.name, channel = ?channel, "OTP sent");
    Ok(())
}

/// Validate a submitted code.
///
/// Fails closed: unmatched contacts, provider misses, and provider check
/// failures all come back `false`. A successful check stamps the
/// verification fields on the record.
pub async fn validate_otp(
    deps: &ServerDeps,
    tenant: &Tenant,
    contact: &str,
    code: &str,
) -> Result<bool, AuthError> {
    let Some(channel) = Channel::select(contact) else {
        return Ok(false);
    };

    let approved = match channel.verify(deps, contact, code).await {
        Ok(approved) => approved,
        Err(e) => {
            warn!(tenant = %tenant.name, "verification check failed: {e:#}");
            false
        }
    };
    if !approved {
        return Ok(false);
    }

    let mut record = channel.login_info(deps, tenant, contact).await?;
    let now = Utc::now().timestamp();
    record.otp = code.to_string();
    record.otp_verified_epoch = now;
    record.last_active_epoch = now;
    if record.account_id.is_empty() {
        record.account_id = account_id(contact);
    }
    channel.save_login_info(deps, tenant, record).await?;

    Ok(true)
}

/// Read the login record for a contact, if any channel matches it.
pub async fn login_info(
    deps: &ServerDeps,
    tenant: &Tenant,
    contact: &str,
) -> Result<Option<LoginRecord>, AuthError> {
    let Some(channel) = Channel::select(contact) else {
        return Ok(None);
    };
    Ok(Some(channel.login_info(deps, tenant, contact).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::auth::models::LOGIN_COLLECTION;
    use crate::kernel::test_dependencies::{MockMailer, MockTwilioService, TestDependencies};
    use crate::kernel::traits::BaseStore;
    use serde_json::json;

    fn tenant() -> Tenant {
        Tenant {
            name: "acme".to_string(),
            access_token: "valid_domain".to_string(),
            stage: "test".to_string(),
        }
    }

    #[tokio::test]
    async fn test_send_rejects_unrecognized_contact() {
        let harness = TestDependencies::new();
        let deps = harness.deps();

        let err = send_otp(&deps, &tenant(), "not-a-contact").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidArgument(_)), "got: {err}");
        assert_eq!(harness.twilio.send_count(), 0);
        assert_eq!(harness.mailer.send_count(), 0);
    }

    #[tokio::test]
    async fn test_first_send_assigns_unified_account_id() {
        let harness = TestDependencies::new();
        let deps = harness.deps();

        send_otp(&deps, &tenant(), "9970378011").await.unwrap();

        assert_eq!(harness.twilio.sends(), vec!["9970378011"]);

        let doc = harness
            .store
            .find_one("acme", LOGIN_COLLECTION, json!({"phone": "9970378011"}))
            .await
            .unwrap()
            .expect("record should be persisted");
        assert_eq!(doc["accountId"], account_id("9970378011"));
        assert_eq!(doc["userType"], "default");
        assert!(doc["createdEpoch"].as_i64().unwrap() > 0);
    }

    #[tokio::test]
    async fn test_email_contact_goes_through_mailer() {
        let harness = TestDependencies::new();
        let deps = harness.deps();

        send_otp(&deps, &tenant(), "user@example.com").await.unwrap();

        assert_eq!(harness.mailer.sends(), vec!["user@example.com"]);
        assert_eq!(harness.twilio.send_count(), 0);
    }

    #[tokio::test]
    async fn test_resend_within_window_is_rate_limited() {
        let harness = TestDependencies::new();
        let deps = harness.deps();

        send_otp(&deps, &tenant(), "9970378011").await.unwrap();
        let err = send_otp(&deps, &tenant(), "9970378011").await.unwrap_err();

        assert!(matches!(err, AuthError::PermissionDenied(_)), "got: {err}");
        assert_eq!(harness.twilio.send_count(), 1, "no second provider call");
    }

    #[tokio::test]
    async fn test_resend_after_window_succeeds() {
        let harness = TestDependencies::new();
        let deps = harness.deps();

        send_otp(&deps, &tenant(), "9970378011").await.unwrap();

        // Age the stored record past the resend window
        let key = account_id("9970378011");
        let mut doc = harness
            .store
            .find_one("acme", LOGIN_COLLECTION, json!({"accountId": key}))
            .await
            .unwrap()
            .unwrap();
        doc["lastOtpSentEpoch"] =
            json!(Utc::now().timestamp() - OTP_RESEND_WINDOW_SECS - 1);
        harness
            .store
            .save("acme", LOGIN_COLLECTION, &key, doc)
            .await
            .unwrap();

        send_otp(&deps, &tenant(), "9970378011").await.unwrap();
        assert_eq!(harness.twilio.send_count(), 2);
    }

    #[tokio::test]
    async fn test_provider_failure_persists_nothing() {
        let harness = TestDependencies::new().mock_twilio(MockTwilioService::failing());
        let deps = harness.deps();

        let err = send_otp(&deps, &tenant(), "9970378011").await.unwrap_err();
        assert!(matches!(err, AuthError::Internal(_)), "got: {err}");

        let doc = harness
            .store
            .find_one("acme", LOGIN_COLLECTION, json!({"phone": "9970378011"}))
            .await
            .unwrap();
        assert!(doc.is_none(), "failed send must not persist a record");
    }

    #[tokio::test]
    async fn test_validate_wrong_code_mutates_nothing() {
        let harness = TestDependencies::new();
        let deps = harness.deps();

        send_otp(&deps, &tenant(), "9970378011").await.unwrap();

        let ok = validate_otp(&deps, &tenant(), "9970378011", "000000")
            .await
            .unwrap();
        assert!(!ok);

        let doc = harness
            .store
            .find_one("acme", LOGIN_COLLECTION, json!({"phone": "9970378011"}))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(doc["otpVerifiedEpoch"], 0);
        assert_eq!(doc["otp"], "");
    }

    #[tokio::test]
    async fn test_validate_correct_code_stamps_verification() {
        let harness = TestDependencies::new();
        let deps = harness.deps();

        send_otp(&deps, &tenant(), "9970378011").await.unwrap();

        let ok = validate_otp(&deps, &tenant(), "9970378011", "123456")
            .await
            .unwrap();
        assert!(ok);

        let doc = harness
            .store
            .find_one("acme", LOGIN_COLLECTION, json!({"phone": "9970378011"}))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(doc["otp"], "123456");
        assert!(doc["otpVerifiedEpoch"].as_i64().unwrap() > 0);
        assert!(doc["lastActiveEpoch"].as_i64().unwrap() > 0);
    }

    #[tokio::test]
    async fn test_validate_unmatched_contact_fails_closed() {
        let harness = TestDependencies::new();
        let deps = harness.deps();

        let ok = validate_otp(&deps, &tenant(), "???", "123456").await.unwrap();
        assert!(!ok);
    }

    #[tokio::test]
    async fn test_account_id_matches_codec_for_both_channels() {
        let harness = TestDependencies::new().mock_mailer(MockMailer::new());
        let deps = harness.deps();

        send_otp(&deps, &tenant(), "user@example.com").await.unwrap();
        send_otp(&deps, &tenant(), "9970378011").await.unwrap();

        for contact in ["user@example.com", "9970378011"] {
            let record = login_info(&deps, &tenant(), contact)
                .await
                .unwrap()
                .unwrap();
            // Same derivation regardless of which channel created the record
            assert_eq!(record.account_id, account_id(contact));
        }
    }
}
