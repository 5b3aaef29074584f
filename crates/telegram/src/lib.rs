//! Telegram crate: delivering notifications to a chat.
#![allow(clippy::uninlined_format_args)]
use async_trait::async_trait;
use tracing::error;

/// Telegram Bot API client
pub mod client;

pub use client::TelegramNotifier;

/// Outcome of a single delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The message was accepted by the messaging service.
    Sent,
    /// The message was not delivered; the failure has already been logged.
    Failed,
}

impl Delivery {
    /// Whether the message went through.
    pub const fn is_sent(self) -> bool {
        matches!(self, Self::Sent)
    }
}

/// Delivers messages to a fixed destination. Never fails past this boundary.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Attempt to deliver `message` once.
    async fn notify(&self, message: &str) -> Delivery;
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, message: &str) -> Delivery {
        match self.send_message(message).await {
            Ok(()) => Delivery::Sent,
            Err(e) => {
                error!(chat_id = %self.chat_id(), error = %e, "Failed to deliver notification");
                Delivery::Failed
            }
        }
    }
}
