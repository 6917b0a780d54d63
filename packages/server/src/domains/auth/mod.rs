//! Auth domain - tenant-scoped OTP login.
//!
//! Responsibilities:
//! - Channel-polymorphic OTP issuance and verification (email, SMS)
//! - Resend rate limiting and cross-channel identity unification
//! - Session token issuance (JWT) and guarded account views

pub mod accounts;
pub mod channel;
pub mod errors;
pub mod jwt;
pub mod login;
pub mod models;
pub mod otp;
pub mod types;

pub use channel::Channel;
pub use errors::AuthError;
pub use jwt::{Claims, JwtService};
pub use types::VerifiedLogin;
