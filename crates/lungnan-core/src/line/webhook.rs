//! Webhook payload types
//!
//! Only the fields the bot reads are modelled; everything else LINE sends is
//! ignored during deserialization.

use serde::Deserialize;
use tracing::warn;

/// User id used when an event has no user source (e.g. some group events)
pub const ANONYMOUS_USER: &str = "anonymous";

/// A webhook delivery
///
/// Events are kept as raw JSON and read one at a time, so an event with an
/// unexpected shape does not cost its siblings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookBody {
    #[serde(default)]
    events: Vec<serde_json::Value>,
}

impl WebhookBody {
    /// The events that could be read, in delivery order
    pub fn events(&self) -> Vec<WebhookEvent> {
        self.events
            .iter()
            .filter_map(|raw| match WebhookEvent::deserialize(raw) {
                Ok(event) => Some(event),
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable webhook event");
                    None
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub reply_token: Option<String>,
    #[serde(default)]
    pub source: Option<EventSource>,
    #[serde(default)]
    pub message: Option<EventMessage>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSource {
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventMessage {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub text: Option<String>,
}

/// What the bot should do with one event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotEvent<'a> {
    /// The user added the bot as a friend
    Follow { reply_token: &'a str },
    /// The user sent a text message; it is recorded even when there is no
    /// token to reply with
    Text {
        reply_token: Option<&'a str>,
        user_id: &'a str,
        text: &'a str,
    },
}

impl WebhookEvent {
    /// Classify the event, or `None` when the bot has nothing to do
    pub fn as_bot_event(&self) -> Option<BotEvent<'_>> {
        let reply_token = self.reply_token.as_deref().filter(|t| !t.is_empty());

        match self.kind.as_str() {
            "follow" => Some(BotEvent::Follow {
                reply_token: reply_token?,
            }),
            "message" => {
                let message = self.message.as_ref()?;
                if message.kind != "text" {
                    return None;
                }
                Some(BotEvent::Text {
                    reply_token,
                    user_id: self.user_id(),
                    text: message.text.as_deref().unwrap_or_default(),
                })
            }
            _ => None,
        }
    }

    pub fn user_id(&self) -> &str {
        self.source
            .as_ref()
            .and_then(|s| s.user_id.as_deref())
            .filter(|id| !id.is_empty())
            .unwrap_or(ANONYMOUS_USER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: serde_json::Value) -> WebhookBody {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_text_message_event() {
        let body = parse(serde_json::json!({
            "destination": "Uxxx",
            "events": [{
                "type": "message",
                "replyToken": "r1",
                "source": {"type": "user", "userId": "U123"},
                "message": {"type": "text", "id": "1", "text": "rice 50"}
            }]
        }));

        assert_eq!(
            body.events()[0].as_bot_event(),
            Some(BotEvent::Text {
                reply_token: Some("r1"),
                user_id: "U123",
                text: "rice 50"
            })
        );
    }

    #[test]
    fn test_follow_event() {
        let body = parse(serde_json::json!({
            "events": [{"type": "follow", "replyToken": "r2", "source": {"userId": "U1"}}]
        }));
        assert_eq!(
            body.events()[0].as_bot_event(),
            Some(BotEvent::Follow { reply_token: "r2" })
        );
    }

    #[test]
    fn test_missing_user_is_anonymous() {
        let body = parse(serde_json::json!({
            "events": [{
                "type": "message",
                "replyToken": "r3",
                "message": {"type": "text", "text": "summary"}
            }]
        }));
        assert_eq!(body.events()[0].user_id(), ANONYMOUS_USER);
    }

    #[test]
    fn test_ignored_events() {
        let body = parse(serde_json::json!({
            "events": [
                {"type": "message", "replyToken": "r4", "message": {"type": "sticker"}},
                {"type": "unfollow", "source": {"userId": "U1"}},
                {"type": "follow", "source": {"userId": "U1"}},
                {"type": "postback", "replyToken": "r5"}
            ]
        }));
        assert!(body.events().iter().all(|e| e.as_bot_event().is_none()));
    }

    #[test]
    fn test_text_without_reply_token_is_still_handled() {
        let body = parse(serde_json::json!({
            "events": [{
                "type": "message",
                "source": {"userId": "U9"},
                "message": {"type": "text", "text": "rice 50"}
            }]
        }));
        assert_eq!(
            body.events()[0].as_bot_event(),
            Some(BotEvent::Text {
                reply_token: None,
                user_id: "U9",
                text: "rice 50"
            })
        );
    }

    #[test]
    fn test_odd_event_does_not_hide_siblings() {
        let body = parse(serde_json::json!({
            "events": [
                {"type": "message", "replyToken": "r0", "message": {"id": "x"}},
                {"type": 7, "replyToken": "r1"},
                "not an object",
                {
                    "type": "message",
                    "replyToken": "r2",
                    "message": {"type": "text", "text": "rice 50"}
                }
            ]
        }));

        let events = body.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].as_bot_event(), None);
        assert!(matches!(
            events[1].as_bot_event(),
            Some(BotEvent::Text { text: "rice 50", .. })
        ));
    }

    #[test]
    fn test_empty_body() {
        let body = parse(serde_json::json!({}));
        assert!(body.events().is_empty());
    }
}
