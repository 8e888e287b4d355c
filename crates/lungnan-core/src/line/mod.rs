//! LINE Messaging API client
//!
//! Covers the two things the bot needs from LINE: replying to a webhook event
//! and provisioning the rich menu. Webhook payload types live in `webhook`.

mod rich_menu;
pub mod webhook;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};

pub use rich_menu::{
    default_rich_menu, image_content_type, RichMenu, RichMenuAction, RichMenuArea, RichMenuBounds,
    RichMenuInfo, RichMenuSize, RICH_MENU_NAME,
};

/// Environment variable holding the channel access token
pub const ACCESS_TOKEN_ENV: &str = "LINE_CHANNEL_ACCESS_TOKEN";

/// Environment variable overriding the API base URL (tests, proxies)
pub const API_BASE_ENV: &str = "LINE_API_BASE";

pub const DEFAULT_API_BASE: &str = "https://api.line.me";
pub const DEFAULT_DATA_API_BASE: &str = "https://api-data.line.me";

/// LINE rejects text messages longer than this many characters
pub const MAX_TEXT_CHARS: usize = 5000;

const REPLY_TIMEOUT: Duration = Duration::from_secs(10);

/// Something that can answer a webhook event with a text message
///
/// Delivery is fire-and-forget from the bot's point of view: callers log a
/// failure and move on.
#[async_trait]
pub trait ReplySender: Send + Sync {
    async fn reply(&self, reply_token: &str, text: &str) -> Result<()>;
}

/// HTTP client for the LINE Messaging API
#[derive(Clone)]
pub struct LineClient {
    http_client: Client,
    api_base: String,
    data_api_base: String,
    access_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplyRequest<'a> {
    reply_token: &'a str,
    messages: Vec<TextMessage>,
}

#[derive(Debug, Serialize)]
struct TextMessage {
    #[serde(rename = "type")]
    kind: &'static str,
    text: String,
}

impl LineClient {
    pub fn new(access_token: &str) -> Self {
        Self::with_base_urls(DEFAULT_API_BASE, DEFAULT_DATA_API_BASE, access_token)
    }

    /// Point the client at other hosts, e.g. a mock server
    pub fn with_base_urls(api_base: &str, data_api_base: &str, access_token: &str) -> Self {
        let http_client = Client::builder()
            .timeout(REPLY_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            http_client,
            api_base: api_base.trim_end_matches('/').to_string(),
            data_api_base: data_api_base.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
        }
    }

    /// Build from `LINE_CHANNEL_ACCESS_TOKEN` (and optional `LINE_API_BASE`)
    ///
    /// When `LINE_API_BASE` is set it is used for both API hosts.
    pub fn from_env() -> Option<Self> {
        let token = std::env::var(ACCESS_TOKEN_ENV)
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())?;

        match std::env::var(API_BASE_ENV).ok().filter(|b| !b.is_empty()) {
            Some(base) => Some(Self::with_base_urls(&base, &base, &token)),
            None => Some(Self::new(&token)),
        }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }

    /// Turn a non-success response into an error carrying LINE's message
    pub(crate) async fn check(response: reqwest::Response, action: &str) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(Error::Line(format!("{} failed [{}]: {}", action, status.as_u16(), body)))
    }
}

#[async_trait]
impl ReplySender for LineClient {
    async fn reply(&self, reply_token: &str, text: &str) -> Result<()> {
        let request = ReplyRequest {
            reply_token,
            messages: vec![TextMessage {
                kind: "text",
                text: truncate_text(text),
            }],
        };

        let response = self
            .http_client
            .post(format!("{}/v2/bot/message/reply", self.api_base))
            .header(reqwest::header::AUTHORIZATION, self.bearer())
            .json(&request)
            .send()
            .await?;

        Self::check(response, "reply message").await?;
        debug!(chars = text.chars().count(), "Sent LINE reply");
        Ok(())
    }
}

fn truncate_text(text: &str) -> String {
    if text.chars().count() <= MAX_TEXT_CHARS {
        text.to_string()
    } else {
        text.chars().take(MAX_TEXT_CHARS).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockLineServer;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("hello"), "hello");
        let long = "ก".repeat(MAX_TEXT_CHARS + 10);
        assert_eq!(truncate_text(&long).chars().count(), MAX_TEXT_CHARS);
    }

    #[test]
    fn test_reply_payload_shape() {
        let request = ReplyRequest {
            reply_token: "token-1",
            messages: vec![TextMessage {
                kind: "text",
                text: "hi".to_string(),
            }],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "replyToken": "token-1",
                "messages": [{"type": "text", "text": "hi"}]
            })
        );
    }

    #[tokio::test]
    async fn test_reply_reaches_server() {
        let server = MockLineServer::start().await;
        let client = LineClient::with_base_urls(&server.url(), &server.url(), "secret-token");

        client.reply("reply-abc", "Recorded").await.unwrap();

        let replies = server.replies();
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].reply_token, "reply-abc");
        assert_eq!(replies[0].text, "Recorded");
        assert_eq!(replies[0].authorization, "Bearer secret-token");
    }

    #[tokio::test]
    async fn test_reply_error_status() {
        let server = MockLineServer::start().await;
        let client = LineClient::with_base_urls(&server.url(), &server.url(), "secret-token");

        let result = client.reply(MockLineServer::REJECTED_TOKEN, "hi").await;
        assert!(matches!(result, Err(Error::Line(_))));
    }
}
