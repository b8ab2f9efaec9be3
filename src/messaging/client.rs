//! Twilio REST client module
//!
//! Covers the two calls the reminder lambda needs: an account fetch used as a
//! credential probe, and message creation.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{error, info};

use crate::core::config::TwilioConfig;
use crate::errors::RemediError;

const TWILIO_API_BASE: &str = "https://api.twilio.com/2010-04-01";

#[derive(Debug, Clone, Deserialize)]
pub struct AccountRecord {
    pub sid: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SentMessage {
    pub sid: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// Error body returned by the Twilio REST API.
#[derive(Debug, Deserialize)]
struct TwilioErrorBody {
    #[serde(default)]
    code: Option<u32>,
    message: String,
}

/// The external SMS delivery service.
#[async_trait]
pub trait MessagingProvider: Send + Sync {
    /// Fetches the configured account; rejects when credentials are invalid.
    async fn fetch_account(&self) -> Result<AccountRecord, RemediError>;

    async fn send_message(&self, from: &str, to: &str, body: &str)
    -> Result<SentMessage, RemediError>;
}

pub struct TwilioClient {
    http: Client,
    account_sid: String,
    auth_token: String,
}

impl TwilioClient {
    #[must_use]
    pub fn new(config: &TwilioConfig) -> Self {
        Self {
            http: Client::new(),
            account_sid: config.account_sid.clone(),
            auth_token: config.auth_token.clone(),
        }
    }

    fn account_url(&self) -> String {
        format!("{TWILIO_API_BASE}/Accounts/{}.json", self.account_sid)
    }

    fn messages_url(&self) -> String {
        format!("{TWILIO_API_BASE}/Accounts/{}/Messages.json", self.account_sid)
    }
}

#[async_trait]
impl MessagingProvider for TwilioClient {
    async fn fetch_account(&self) -> Result<AccountRecord, RemediError> {
        let response = self
            .http
            .get(self.account_url())
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(rest_error(response).await);
        }

        let account: AccountRecord = response.json().await?;
        info!(account_status = ?account.status, "Twilio credentials verified");
        Ok(account)
    }

    async fn send_message(
        &self,
        from: &str,
        to: &str,
        body: &str,
    ) -> Result<SentMessage, RemediError> {
        let response = self
            .http
            .post(self.messages_url())
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[("To", to), ("From", from), ("Body", body)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(rest_error(response).await);
        }

        Ok(response.json().await?)
    }
}

async fn rest_error(response: reqwest::Response) -> RemediError {
    let status = response.status();
    let text = response
        .text()
        .await
        .unwrap_or_else(|_| "<failed to read body>".to_string());
    error!("Twilio request failed: status={} body={}", status, text);
    twilio_error(status.as_u16(), &text)
}

/// Maps a non-success Twilio response to `RemediError::TwilioError`.
pub(crate) fn twilio_error(status: u16, body: &str) -> RemediError {
    let message = match serde_json::from_str::<TwilioErrorBody>(body) {
        Ok(parsed) => match parsed.code {
            Some(code) => format!("{} (code {code})", parsed.message),
            None => parsed.message,
        },
        Err(_) if body.trim().is_empty() => format!("HTTP {status}"),
        Err(_) => body.trim().to_string(),
    };
    RemediError::TwilioError { status, message }
}
