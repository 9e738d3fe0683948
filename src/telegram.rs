use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::TelegramConfig;
use crate::error::{LeaderboardError, LeaderboardResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParseMode {
    Markdown,
}

#[async_trait]
pub trait ChatSender: Send + Sync {
    async fn send_message(&self, text: &str, parse_mode: Option<ParseMode>) -> LeaderboardResult<()>;
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<ParseMode>,
}

/// Bot API client bound to a single chat.
pub struct TelegramBot {
    pub http: Client,
    pub cfg: TelegramConfig,
}

impl TelegramBot {
    pub fn new(cfg: TelegramConfig) -> Self {
        Self {
            http: Client::new(),
            cfg,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/bot{}/sendMessage", self.cfg.api_url, self.cfg.bot_token)
    }
}

#[async_trait]
impl ChatSender for TelegramBot {
    async fn send_message(&self, text: &str, parse_mode: Option<ParseMode>) -> LeaderboardResult<()> {
        let body = SendMessage {
            chat_id: &self.cfg.chat_id,
            text,
            parse_mode,
        };

        // The token is part of the URL, keep it out of error text
        let response = self
            .http
            .post(self.endpoint())
            .json(&body)
            .send()
            .await
            .map_err(|e| LeaderboardError::Notification(format!("Failed to reach Telegram: {}", e.without_url())))?;

        let status = response.status();
        let reply = response
            .json::<Value>()
            .await
            .map_err(|e| LeaderboardError::Notification(format!("Unreadable Telegram reply ({}): {}", status, e.without_url())))?;

        if !status.is_success() || reply.get("ok").and_then(Value::as_bool) != Some(true) {
            let description = reply
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or("no description");
            return Err(LeaderboardError::Notification(format!(
                "Telegram rejected the message ({}): {}",
                status, description
            )));
        }

        debug!("Sent Telegram message (length={})", text.len());
        Ok(())
    }
}
