use std::time::Duration;

use eyre::{Result, WrapErr, bail};
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

/// Telegram `sendMessage` text limit (UTF-8 characters).
pub const TELEGRAM_MESSAGE_LIMIT: usize = 4096;

const TRUNCATED_SUFFIX: &str = "\n\n[truncated]";

/// Client sending plain-text messages to one Telegram chat.
#[derive(Debug, Clone)]
pub struct TelegramNotifier {
    http: HttpClient,
    token: String,
    chat_id: String,
    api_url: Url,
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

impl TelegramNotifier {
    /// Create a new Telegram client. Every request is bounded by `timeout`.
    pub fn new(token: String, chat_id: String, api_url: Url, timeout: Duration) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .wrap_err("failed to build Telegram HTTP client")?;
        Ok(Self { http, token, chat_id, api_url })
    }

    /// Chat the messages are sent to.
    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }

    fn send_message_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_url.as_str().trim_end_matches('/'), self.token)
    }

    /// Send `text` to the configured chat.
    ///
    /// Transport errors have the request URL stripped since it embeds the bot token.
    pub async fn send_message(&self, text: &str) -> Result<()> {
        let text = truncate_message(text, TELEGRAM_MESSAGE_LIMIT);
        let payload = SendMessage { chat_id: &self.chat_id, text: &text };

        let resp = self
            .http
            .post(self.send_message_url())
            .json(&payload)
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .wrap_err("Telegram request failed")?;

        let status = resp.status();
        let body = resp.text().await.map_err(reqwest::Error::without_url)?;
        let parsed = serde_json::from_str::<ApiResponse>(&body).ok();

        if !status.is_success() {
            let reason = parsed.and_then(|r| r.description).unwrap_or(body);
            bail!("Telegram sendMessage failed: {} - {}", status, reason);
        }

        match parsed {
            Some(ApiResponse { ok: true, .. }) => {
                debug!(chat_id = %self.chat_id, "Telegram message sent");
                Ok(())
            }
            Some(ApiResponse { description, .. }) => {
                bail!(
                    "Telegram sendMessage rejected: {}",
                    description.as_deref().unwrap_or("no description")
                )
            }
            None => bail!("Telegram sendMessage returned an unreadable body: {}", body),
        }
    }
}

/// Truncate a message to fit within the Telegram character limit.
fn truncate_message(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_owned();
    }
    let budget = limit - TRUNCATED_SUFFIX.chars().count();
    let truncated: String = text.chars().take(budget).collect();
    format!("{truncated}{TRUNCATED_SUFFIX}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Delivery, Notifier};

    use mockito::{Matcher, Server, ServerGuard};
    use serde_json::json;

    const SEND_PATH: &str = "/bot123:abc/sendMessage";

    fn client_for(server: &ServerGuard) -> TelegramNotifier {
        TelegramNotifier::new(
            "123:abc".to_owned(),
            "42".to_owned(),
            server.url().parse().unwrap(),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn sends_text_to_chat() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", SEND_PATH)
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({"chat_id": "42", "text": "hello"})))
            .with_status(200)
            .with_body(r#"{"ok":true,"result":{"message_id":1}}"#)
            .expect(1)
            .create_async()
            .await;

        let delivery = client_for(&server).notify("hello").await;

        assert_eq!(delivery, Delivery::Sent);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn error_status_is_a_failed_delivery() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", SEND_PATH)
            .with_status(400)
            .with_body(r#"{"ok":false,"error_code":400,"description":"Bad Request: chat not found"}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client.send_message("hello").await.unwrap_err();
        assert!(err.to_string().contains("chat not found"));
        assert_eq!(client.notify("hello").await, Delivery::Failed);
    }

    #[tokio::test]
    async fn ok_false_is_a_failed_delivery() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", SEND_PATH)
            .with_status(200)
            .with_body(r#"{"ok":false,"description":"flood control"}"#)
            .create_async()
            .await;

        assert_eq!(client_for(&server).notify("hello").await, Delivery::Failed);
    }

    #[tokio::test]
    async fn connect_error_does_not_leak_token() {
        let client = TelegramNotifier::new(
            "123:secret".to_owned(),
            "42".to_owned(),
            "http://127.0.0.1:9".parse().unwrap(),
            Duration::from_millis(500),
        )
        .unwrap();

        let err = client.send_message("hello").await.unwrap_err();
        assert!(!format!("{err:?}").contains("secret"));
        assert_eq!(client.notify("hello").await, Delivery::Failed);
    }

    #[test]
    fn api_url_with_trailing_slash() {
        let client = TelegramNotifier::new(
            "t".to_owned(),
            "1".to_owned(),
            "https://api.telegram.org/".parse().unwrap(),
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(client.send_message_url(), "https://api.telegram.org/bott/sendMessage");
    }

    #[test]
    fn short_messages_are_untouched() {
        assert_eq!(truncate_message("hi", TELEGRAM_MESSAGE_LIMIT), "hi");
    }

    #[test]
    fn long_messages_are_truncated() {
        let text = "é".repeat(TELEGRAM_MESSAGE_LIMIT + 10);
        let truncated = truncate_message(&text, TELEGRAM_MESSAGE_LIMIT);
        assert_eq!(truncated.chars().count(), TELEGRAM_MESSAGE_LIMIT);
        assert!(truncated.ends_with("[truncated]"));
    }
}
