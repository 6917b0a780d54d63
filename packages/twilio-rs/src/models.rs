//! Response shapes for the Twilio Verify v2 API.
//!
//! Only the fields we read are modeled; Twilio sends many more.

use serde::Deserialize;

/// Response to creating a verification (`POST .../Verifications`).
#[derive(Debug, Clone, Deserialize)]
pub struct VerificationResponse {
    pub sid: String,
    pub status: String,
    pub to: String,
    pub channel: String,
}

/// Response to checking a code (`POST .../VerificationCheck`).
///
/// `status` is `"approved"` when the code matched.
#[derive(Debug, Clone, Deserialize)]
pub struct VerificationCheckResponse {
    pub status: String,
    pub to: Option<String>,
}
