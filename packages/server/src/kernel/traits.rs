// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Business logic (channel selection, rate limiting) lives in domain code
// that uses these traits.
//
// Naming convention: Base* for trait names (e.g., BaseStore, BaseMailer)

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

// =============================================================================
// Store Trait (Infrastructure - tenant-scoped document store)
// =============================================================================

/// Tenant-scoped key/document store.
///
/// Each tenant owns a namespace; collections within it hold JSON documents
/// keyed by a caller-chosen primary key. Writes are last-writer-wins.
#[async_trait]
pub trait BaseStore: Send + Sync {
    /// Find a single document whose fields contain the filter.
    async fn find_one(
        &self,
        namespace: &str,
        collection: &str,
        filter: Value,
    ) -> Result<Option<Value>>;

    /// Upsert a document under the given key.
    async fn save(
        &self,
        namespace: &str,
        collection: &str,
        key: &str,
        document: Value,
    ) -> Result<()>;
}

// =============================================================================
// Twilio Service Trait (Infrastructure - SMS OTP)
// =============================================================================

#[async_trait]
pub trait BaseTwilioService: Send + Sync {
    /// Start an OTP verification for a phone number (Twilio generates the code)
    async fn send_otp(&self, phone_number: &str) -> Result<()>;

    /// Check an OTP code for a phone number.
    /// Ok(false) means the code did not match; Err means the check itself failed.
    async fn verify_otp(&self, phone_number: &str, code: &str) -> Result<bool>;
}

// =============================================================================
// Mailer Trait (Infrastructure - email OTP)
// =============================================================================

#[async_trait]
pub trait BaseMailer: Send + Sync {
    /// Fire-and-forget OTP mail send
    async fn send_otp(&self, email: &str) -> Result<()>;

    /// Check a submitted code. Email has no provider-side verification
    /// authority; implementations decide which codes are acceptable.
    async fn verify_otp(&self, email: &str, code: &str) -> Result<bool>;
}
