// src/services/notifier.rs

//! Outbound messaging.
//!
//! The [`Notifier`] trait is the seam between a pass and the messaging sink.
//! [`TelegramNotifier`] delivers through the Telegram Bot API `sendMessage`
//! method and treats a message as delivered only when Telegram acknowledges
//! it with `"ok": true`.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::error::{Result, error_chain};
use crate::models::{Credentials, HttpConfig, NotifyConfig};

/// Why a message was not delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryFailure {
    /// The sink could not be reached
    Transport,
    /// The sink was reached but declined the message
    Rejected,
}

/// Outcome of one delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationResult {
    pub delivered: bool,
    pub detail: Option<String>,
    pub failure: Option<DeliveryFailure>,
}

impl NotificationResult {
    pub fn delivered() -> Self {
        Self {
            delivered: true,
            detail: None,
            failure: None,
        }
    }

    pub fn transport(detail: impl Into<String>) -> Self {
        Self::failed(DeliveryFailure::Transport, detail)
    }

    pub fn rejected(detail: impl Into<String>) -> Self {
        Self::failed(DeliveryFailure::Rejected, detail)
    }

    fn failed(kind: DeliveryFailure, detail: impl Into<String>) -> Self {
        Self {
            delivered: false,
            detail: Some(detail.into()),
            failure: Some(kind),
        }
    }
}

/// Delivers a formatted message to the single configured recipient.
pub trait Notifier {
    fn notify(&self, message: &str) -> NotificationResult;
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
    disable_web_page_preview: bool,
}

#[derive(Deserialize)]
struct TelegramAck {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Telegram Bot API notifier.
pub struct TelegramNotifier {
    client: Client,
    endpoint: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(http: &HttpConfig, notify: &NotifyConfig, credentials: &Credentials) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(http.timeout_secs))
            .build()?;
        let endpoint = format!(
            "{}/bot{}/sendMessage",
            notify.api_base.trim_end_matches('/'),
            credentials.token
        );
        Ok(Self {
            client,
            endpoint,
            chat_id: credentials.chat_id.clone(),
        })
    }
}

impl Notifier for TelegramNotifier {
    fn notify(&self, message: &str) -> NotificationResult {
        let payload = SendMessage {
            chat_id: &self.chat_id,
            text: message,
            parse_mode: "HTML",
            disable_web_page_preview: true,
        };

        // reqwest errors embed the request URL, which contains the bot token.
        let response = match self.client.post(&self.endpoint).json(&payload).send() {
            Ok(response) => response,
            Err(e) => return NotificationResult::transport(error_chain(&e.without_url())),
        };

        let status = response.status();
        let body = match response.text() {
            Ok(body) => body,
            Err(e) => return NotificationResult::transport(error_chain(&e.without_url())),
        };

        match serde_json::from_str::<TelegramAck>(&body) {
            Ok(ack) if ack.ok && status.is_success() => NotificationResult::delivered(),
            Ok(ack) => NotificationResult::rejected(format!(
                "HTTP {}: {}",
                status.as_u16(),
                ack.description.unwrap_or_else(|| "no description".into())
            )),
            Err(_) => NotificationResult::rejected(format!(
                "HTTP {}: unrecognised acknowledgement",
                status.as_u16()
            )),
        }
    }
}
