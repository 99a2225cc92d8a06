use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One chat message as it appears on the wire:
/// `{from, to, message, timestamp, auto?}`.
///
/// `auto` marks synthesized replies and is omitted from the JSON entirely
/// for ordinary user messages. Messages are immutable once appended to a
/// conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub from: String,
    pub to: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub auto: bool,
}

fn is_false(v: &bool) -> bool {
    !*v
}

impl ChatMessage {
    /// A user-authored message stamped with the current time.
    pub fn now(from: impl Into<String>, to: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            message: message.into(),
            timestamp: Utc::now(),
            auto: false,
        }
    }

    /// A synthesized reply stamped with the current time.
    pub fn auto_now(
        from: impl Into<String>,
        to: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            auto: true,
            ..Self::now(from, to, message)
        }
    }
}
