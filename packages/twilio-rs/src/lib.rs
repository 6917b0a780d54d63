//! Minimal Twilio Verify v2 client.
//!
//! Covers the two calls the login service needs: starting a verification
//! (Twilio generates and delivers the code) and checking a submitted code
//! against it. Both run against a fixed Verify service id.

use std::collections::HashMap;

pub mod models;

use reqwest::{header, Client};
use thiserror::Error;
use tracing::warn;

use crate::models::{VerificationCheckResponse, VerificationResponse};

const VERIFY_BASE_URL: &str = "https://verify.twilio.com/v2/Services";

#[derive(Debug, Error)]
pub enum TwilioError {
    #[error("request to Twilio failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Twilio returned an error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("verification was not approved (status: {0})")]
    NotApproved(String),
}

#[derive(Debug, Clone)]
pub struct TwilioOptions {
    pub account_sid: String,
    pub auth_token: String,
    pub service_id: String,
}

#[derive(Debug, Clone)]
pub struct TwilioService {
    options: TwilioOptions,
    client: Client,
}

impl TwilioService {
    pub fn new(options: TwilioOptions) -> Self {
        Self {
            options,
            client: Client::new(),
        }
    }

    /// Start a verification for the given phone number.
    ///
    /// Twilio generates the code and delivers it over SMS; we never see it.
    pub async fn create_verification(
        &self,
        to: &str,
    ) -> Result<VerificationResponse, TwilioError> {
        let url = format!("{}/{}/Verifications", VERIFY_BASE_URL, self.options.service_id);

        let mut form_body: HashMap<&str, &str> = HashMap::new();
        form_body.insert("To", to);
        form_body.insert("Channel", "sms");

        let response = self
            .client
            .post(url)
            .basic_auth(&self.options.account_sid, Some(&self.options.auth_token))
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .form(&form_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Twilio verification create failed");
            return Err(TwilioError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<VerificationResponse>().await?)
    }

    /// Check a submitted code against the pending verification.
    ///
    /// Ok(()) only when Twilio reports the check as approved.
    pub async fn check_verification(&self, to: &str, code: &str) -> Result<(), TwilioError> {
        let url = format!(
            "{}/{}/VerificationCheck",
            VERIFY_BASE_URL, self.options.service_id
        );

        let mut form_body: HashMap<&str, &str> = HashMap::new();
        form_body.insert("To", to);
        form_body.insert("Code", code);

        let response = self
            .client
            .post(url)
            .basic_auth(&self.options.account_sid, Some(&self.options.auth_token))
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .form(&form_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TwilioError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let check = response.json::<VerificationCheckResponse>().await?;
        if check.status == "approved" {
            Ok(())
        } else {
            Err(TwilioError::NotApproved(check.status))
        }
    }
}
