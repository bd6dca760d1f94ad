//! Reminder delivery.
//!
//! The scheduler only knows the [`NotificationSender`] trait. Telegram is the
//! delivery channel used by the `watch` daemon; the console sender is used
//! when no bot token is configured.

use crate::libs::messages::Message;
use crate::libs::period::UserId;
use crate::msg_print;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const TELEGRAM_API_URL: &str = "https://api.telegram.org";

#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send(&self, user_id: UserId, text: &str) -> Result<()>;
}

/// Resolves the chat a user's reminders go to.
pub trait ChatDirectory: Send + Sync {
    fn chat_id(&self, user_id: UserId) -> Result<Option<i64>>;
}

/// Prints reminders to stdout.
#[derive(Debug, Default, Clone)]
pub struct ConsoleSender;

#[async_trait]
impl NotificationSender for ConsoleSender {
    async fn send(&self, user_id: UserId, text: &str) -> Result<()> {
        msg_print!(Message::ConsoleReminder(user_id, text.to_string()));
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: i64,
    text: &'a str,
}

/// Sends reminders through the Telegram Bot API.
pub struct TelegramSender {
    client: Client,
    token: String,
    directory: Arc<dyn ChatDirectory>,
}

impl TelegramSender {
    pub fn new(token: impl Into<String>, directory: Arc<dyn ChatDirectory>) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            client,
            token: token.into(),
            directory,
        })
    }
}

#[async_trait]
impl NotificationSender for TelegramSender {
    async fn send(&self, user_id: UserId, text: &str) -> Result<()> {
        let chat_id = self
            .directory
            .chat_id(user_id)?
            .ok_or_else(|| anyhow::anyhow!(Message::UserHasNoChat(user_id)))?;

        let url = format!("{}/bot{}/sendMessage", TELEGRAM_API_URL, self.token);
        let response = self
            .client
            .post(&url)
            .json(&SendMessage { chat_id, text })
            .send()
            .await
            .context("telegram request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!(Message::TelegramSendFailed(status.as_u16(), body));
        }

        debug!(user_id, chat_id, "reminder delivered");
        Ok(())
    }
}
