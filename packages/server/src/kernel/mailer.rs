//! Mail gateway client for the email channel.
//!
//! The gateway renders and delivers the OTP mail; delivery is
//! fire-and-forget. There is no provider-side verification for email, so
//! code acceptance is driven by the configured accepted-code list.

use anyhow::{bail, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::info;

use super::traits::BaseMailer;

pub struct MailGateway {
    client: Client,
    endpoint: String,
    token: Option<String>,
    accepted_codes: Vec<String>,
}

#[derive(Debug, Serialize)]
struct OtpMailRequest {
    to: String,
    template: &'static str,
}

impl MailGateway {
    pub fn new(endpoint: String, token: Option<String>, accepted_codes: Vec<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            token,
            accepted_codes,
        }
    }
}

#[async_trait]
impl BaseMailer for MailGateway {
    async fn send_otp(&self, email: &str) -> Result<()> {
        let message = OtpMailRequest {
            to: email.to_string(),
            template: "otp",
        };

        let mut request = self.client.post(&self.endpoint).json(&message);
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        info!("Sending OTP mail to: {}", email);

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            bail!("mail gateway returned an error ({}): {}", status, body);
        }

        Ok(())
    }

    async fn verify_otp(&self, _email: &str, code: &str) -> Result<bool> {
        Ok(self.accepted_codes.iter().any(|c| c == code))
    }
}
