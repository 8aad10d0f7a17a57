use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use traty_core::config::TelegramConfig;
use traty_core::{Reply, SessionId};

use crate::keyboard::{markup_for, ReplyMarkup};
use crate::updates::{Update, UpdatesResponse};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("transport request failed: {0}")]
    Request(String),
    #[error("bot api rejected the call: {0}")]
    Api(String),
}

/// Seam between the long-poll loop and the Bot API, mockable in tests.
/// `next_updates` returning `None` means the stream is closed.
#[async_trait]
pub trait UpdateTransport: Send + Sync {
    async fn next_updates(&self) -> Result<Option<Vec<Update>>, TransportError>;
    async fn send_reply(&self, session_id: SessionId, reply: &Reply)
        -> Result<(), TransportError>;
}

#[derive(Debug, Serialize)]
struct GetUpdatesRequest {
    offset: i64,
    timeout: u64,
    allowed_updates: [&'static str; 1],
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: i64,
    text: &'a str,
    reply_markup: ReplyMarkup,
}

#[derive(Debug, Deserialize)]
struct SendMessageResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Long-poll client for the Telegram Bot API. Tracks the confirmed update
/// offset internally so each update is delivered once per process.
pub struct HttpTelegramApi {
    http: reqwest::Client,
    api_base: String,
    bot_token: SecretString,
    poll_timeout_secs: u64,
    offset: AtomicI64,
}

impl HttpTelegramApi {
    pub fn new(config: &TelegramConfig) -> Result<Self, TransportError> {
        // The HTTP timeout must outlive the server-side long-poll window.
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.poll_timeout_secs + 10))
            .build()
            .map_err(|error| TransportError::Request(error.to_string()))?;

        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            bot_token: config.bot_token.clone(),
            poll_timeout_secs: config.poll_timeout_secs,
            offset: AtomicI64::new(0),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{method}", self.api_base, self.bot_token.expose_secret())
    }
}

#[async_trait]
impl UpdateTransport for HttpTelegramApi {
    async fn next_updates(&self) -> Result<Option<Vec<Update>>, TransportError> {
        let request = GetUpdatesRequest {
            offset: self.offset.load(Ordering::Acquire),
            timeout: self.poll_timeout_secs,
            allowed_updates: ["message"],
        };

        let response = self
            .http
            .post(self.method_url("getUpdates"))
            .json(&request)
            .send()
            .await
            .map_err(|error| TransportError::Request(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Api(format!("getUpdates returned {status}")));
        }

        let payload: UpdatesResponse = response
            .json()
            .await
            .map_err(|error| TransportError::Api(error.to_string()))?;
        if !payload.ok {
            return Err(TransportError::Api("getUpdates returned ok=false".to_string()));
        }

        if let Some(max_id) = payload.result.iter().map(|update| update.update_id).max() {
            self.offset.store(max_id + 1, Ordering::Release);
        }

        debug!(count = payload.result.len(), "received update batch");
        Ok(Some(payload.result))
    }

    async fn send_reply(
        &self,
        session_id: SessionId,
        reply: &Reply,
    ) -> Result<(), TransportError> {
        let request = SendMessageRequest {
            chat_id: session_id.0,
            text: &reply.text,
            reply_markup: markup_for(reply),
        };

        let response = self
            .http
            .post(self.method_url("sendMessage"))
            .json(&request)
            .send()
            .await
            .map_err(|error| TransportError::Request(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Api(format!("sendMessage returned {status}")));
        }

        let payload: SendMessageResponse = response
            .json()
            .await
            .map_err(|error| TransportError::Api(error.to_string()))?;
        if !payload.ok {
            return Err(TransportError::Api(
                payload.description.unwrap_or_else(|| "sendMessage returned ok=false".to_string()),
            ));
        }

        Ok(())
    }
}
