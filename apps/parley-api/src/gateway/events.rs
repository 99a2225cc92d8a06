//! Server→client framed events for the chat websocket.

use serde::Serialize;

use parley_common::ChatMessage;

/// A framed event sent to a connected client.
///
/// Exactly one `History` frame is emitted per connection, immediately after
/// the handshake; everything after that is a `Message` frame carrying a
/// single delivery (echo or automatic reply).
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerEvent {
    History { items: Vec<ChatMessage> },
    Message { item: ChatMessage },
}
