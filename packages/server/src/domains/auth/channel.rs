//! Login channels - the media an OTP travels over.
//!
//! A channel owns the provider calls (send, verification check) and the
//! login-record reads/writes keyed by its contact field. Rate limiting and
//! account-id assignment deliberately do NOT live here; they are identical
//! across channels and belong to the coordinator (`otp`).

use anyhow::Result;
use chrono::Utc;
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::json;

use crate::domains::auth::models::{LoginRecord, DEFAULT_USER_TYPE, LOGIN_COLLECTION};
use crate::domains::tenant::Tenant;
use crate::kernel::ServerDeps;

lazy_static! {
    static ref EMAIL_PATTERN: Regex = Regex::new(r"^.+@.+$").unwrap();
    static ref PHONE_PATTERN: Regex = Regex::new(r"^[0-9]{10}$").unwrap();
}

/// Delivery channels, in selection priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Email,
    Phone,
}

/// Selection priority: email syntax is checked before phone syntax.
pub const CHANNELS: [Channel; 2] = [Channel::Email, Channel::Phone];

impl Channel {
    /// Pick the first channel whose syntax matches the contact.
    /// Unmatched contacts select nothing; callers decide how to fail.
    pub fn select(contact: &str) -> Option<Channel> {
        CHANNELS.into_iter().find(|c| c.is_valid(contact))
    }

    pub fn is_valid(&self, contact: &str) -> bool {
        match self {
            Channel::Email => EMAIL_PATTERN.is_match(contact),
            Channel::Phone => PHONE_PATTERN.is_match(contact),
        }
    }

    /// Dispatch the OTP through the channel provider. Provider failure is a
    /// hard stop; any retry policy belongs to the provider.
    pub async fn send(&self, deps: &ServerDeps, contact: &str) -> Result<()> {
        match self {
            Channel::Email => deps.mailer.send_otp(contact).await,
            Channel::Phone => deps.twilio.send_otp(contact).await,
        }
    }

    /// Check a submitted code with the channel's verification authority.
    /// Never touches login records.
    pub async fn verify(&self, deps: &ServerDeps, contact: &str, code: &str) -> Result<bool> {
        match self {
            Channel::Email => deps.mailer.verify_otp(contact, code).await,
            Channel::Phone => deps.twilio.verify_otp(contact, code).await,
        }
    }

    /// The login-record field this channel keys on.
    fn contact_field(&self) -> &'static str {
        match self {
            Channel::Email => "email",
            Channel::Phone => "phone",
        }
    }

    /// Read the login record keyed by this channel's contact field.
    ///
    /// Absent records come back as an un-persisted default carrying only the
    /// contact and the default user type.
    pub async fn login_info(
        &self,
        deps: &ServerDeps,
        tenant: &Tenant,
        contact: &str,
    ) -> Result<LoginRecord> {
        let field = self.contact_field();
        let filter = json!({ field: contact });
        let doc = deps
            .find_one(&tenant.name, LOGIN_COLLECTION, filter)
            .join()
            .await?;

        match doc {
            Some(doc) => serde_json::from_value(doc).map_err(Into::into),
            None => Ok(self.default_record(contact)),
        }
    }

    fn default_record(&self, contact: &str) -> LoginRecord {
        let mut record = LoginRecord {
            user_type: DEFAULT_USER_TYPE.to_string(),
            ..Default::default()
        };
        match self {
            Channel::Email => record.email = Some(contact.to_string()),
            Channel::Phone => record.phone = Some(contact.to_string()),
        }
        record
    }

    /// Persist a login record and return the stored form.
    ///
    /// Normalizes a blank user type to the default and stamps
    /// `created_epoch` on first persist.
    pub async fn save_login_info(
        &self,
        deps: &ServerDeps,
        tenant: &Tenant,
        mut record: LoginRecord,
    ) -> Result<LoginRecord> {
        if record.user_type.is_empty() {
            record.user_type = DEFAULT_USER_TYPE.to_string();
        }
        if record.created_epoch == 0 {
            record.created_epoch = Utc::now().timestamp();
        }

        deps.save(
            &tenant.name,
            LOGIN_COLLECTION,
            &record.account_id,
            serde_json::to_value(&record)?,
        )
        .await?;

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_shapes_select_email_channel() {
        assert_eq!(Channel::select("user@example.com"), Some(Channel::Email));
        assert_eq!(Channel::select("a@b"), Some(Channel::Email));
        assert_eq!(Channel::select("first.last@corp.example.org"), Some(Channel::Email));
    }

    #[test]
    fn test_ten_digit_numbers_select_phone_channel() {
        assert_eq!(Channel::select("9970378011"), Some(Channel::Phone));
        assert_eq!(Channel::select("0000000000"), Some(Channel::Phone));
    }

    #[test]
    fn test_unmatched_contacts_select_nothing() {
        assert_eq!(Channel::select(""), None);
        assert_eq!(Channel::select("not-a-contact"), None);
        assert_eq!(Channel::select("12345"), None); // too short for phone
        assert_eq!(Channel::select("99703780111"), None); // too long for phone
        assert_eq!(Channel::select("997037801a"), None); // non-digit
    }

    #[test]
    fn test_validity_is_mutually_exclusive() {
        // No contact should satisfy both channels
        for contact in ["user@example.com", "9970378011", "a@1234567890"] {
            let both = Channel::Email.is_valid(contact) && Channel::Phone.is_valid(contact);
            assert!(!both, "{contact} matched both channels");
        }
    }

    #[test]
    fn test_email_wins_priority_order() {
        // An @ anywhere makes the contact email-shaped, never phone-shaped
        assert_eq!(Channel::select("12345@6789"), Some(Channel::Email));
    }
}
