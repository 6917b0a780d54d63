//! Environment-driven configuration.
//!
//! Loaded once at startup; missing required variables fail fast with a
//! message naming the variable.

use anyhow::{Context, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,

    pub jwt_secret: String,
    pub jwt_issuer: String,

    pub twilio_account_sid: String,
    pub twilio_auth_token: String,
    pub twilio_service_id: String,

    pub mail_gateway_url: String,
    pub mail_gateway_token: Option<String>,
    /// Codes the email channel accepts. Email delivery has no provider-side
    /// verification, so acceptance is driven by this list (dev default
    /// `123456`).
    pub mail_accepted_codes: Vec<String>,

    /// Deadline for a single store query before the flow fails `Internal`.
    pub store_query_timeout_ms: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a number")?,
            database_url: env::var("DATABASE_URL").context("DATABASE_URL is required")?,

            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET is required")?,
            jwt_issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "gatehouse".to_string()),

            twilio_account_sid: env::var("TWILIO_ACCOUNT_SID")
                .context("TWILIO_ACCOUNT_SID is required")?,
            twilio_auth_token: env::var("TWILIO_AUTH_TOKEN")
                .context("TWILIO_AUTH_TOKEN is required")?,
            twilio_service_id: env::var("TWILIO_SERVICE_ID")
                .context("TWILIO_SERVICE_ID is required")?,

            mail_gateway_url: env::var("MAIL_GATEWAY_URL")
                .context("MAIL_GATEWAY_URL is required")?,
            mail_gateway_token: env::var("MAIL_GATEWAY_TOKEN").ok(),
            mail_accepted_codes: env::var("MAIL_ACCEPTED_CODES")
                .unwrap_or_else(|_| "123456".to_string())
                .split(',')
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect(),

            store_query_timeout_ms: env::var("STORE_QUERY_TIMEOUT_MS")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .context("STORE_QUERY_TIMEOUT_MS must be a number")?,
        })
    }
}
