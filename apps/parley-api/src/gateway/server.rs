//! WebSocket chat endpoint and per-connection session loop.
//!
//! Each accepted connection runs its own tokio task: a reader loop that
//! owns the protocol plus a writer task draining the connection's outbound
//! queue into the socket. Sessions are unrelated and never block each
//! other; all shared state lives in [`crate::AppState`].

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;

use parley_common::{ChatMessage, ConversationKey};

use crate::AppState;

use super::events::ServerEvent;
use super::registry::ConnId;

/// Handshake identifiers, supplied as query parameters. Kept as raw
/// strings so a malformed value refuses the session instead of failing
/// extraction with an HTTP error.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConnectParams {
    #[serde(rename = "userId")]
    user_id: String,
    #[serde(rename = "withId")]
    with_id: String,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/ws/chat", get(ws_upgrade))
}

async fn ws_upgrade(
    ws: WebSocketUpgrade,
    Query(params): Query<ConnectParams>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_connection(socket, params, state))
}

async fn handle_connection(socket: WebSocket, params: ConnectParams, state: AppState) {
    let user_id: i64 = params.user_id.parse().unwrap_or(0);
    let peer_id: i64 = params.with_id.parse().unwrap_or(0);

    // Silent refusal: both ids must be positive. Nothing is registered and
    // no frame is emitted; the socket just drops.
    if user_id <= 0 || peer_id <= 0 {
        tracing::debug!(
            user_id = %params.user_id,
            with_id = %params.with_id,
            "refusing chat session: invalid handshake ids"
        );
        return;
    }

    let (mut ws_tx, mut ws_rx) = socket.split();

    let (conn_id, mut outbound) = state.registry.add(user_id);
    state.presence.set_online(user_id, true);

    let key = ConversationKey::new(user_id, peer_id);
    let items = state.history.get_or_seed(
        key,
        &state.directory.display_name(user_id),
        &state.directory.display_name(peer_id),
    );

    tracing::info!(user_id, peer_id, conn_id, "chat session established");

    // Writer task: serialize outbound events and push them to the socket.
    // Ends when every sender for this queue is gone or the socket rejects
    // a write.
    let writer = tokio::spawn(async move {
        while let Some(event) = outbound.recv().await {
            let json = match serde_json::to_string(event.as_ref()) {
                Ok(json) => json,
                Err(_) => continue,
            };
            if ws_tx.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    // The history replay goes to this handle only.
    state
        .registry
        .send_to(user_id, conn_id, Arc::new(ServerEvent::History { items }));

    while let Some(frame) = ws_rx.next().await {
        let text = match frame {
            Ok(Message::Text(text)) => text.to_string(),
            // No structured inbound schema: binary is coerced to text.
            Ok(Message::Binary(bytes)) => String::from_utf8_lossy(&bytes).into_owned(),
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => continue,
            Ok(Message::Close(_)) => break,
            Err(e) => {
                tracing::debug!(?e, user_id, conn_id, "ws read error");
                break;
            }
        };
        handle_inbound(&state, key, user_id, peer_id, conn_id, text);
    }

    // Transport closure is a normal terminal transition: release the
    // handle, and the last handle out clears the manual-online override.
    if state.registry.remove(user_id, conn_id) {
        state.presence.set_online(user_id, false);
    }
    let _ = writer.await;

    tracing::info!(user_id, conn_id, "chat session ended");
}

/// One inbound text frame while ACTIVE: append + echo, then a canned reply
/// if the peer is online right now.
fn handle_inbound(
    state: &AppState,
    key: ConversationKey,
    user_id: i64,
    peer_id: i64,
    conn_id: ConnId,
    text: String,
) {
    // Names reflect the directory at delivery time, not handshake time.
    let my_name = state.directory.display_name(user_id);
    let peer_name = state.directory.display_name(peer_id);

    let echo = ChatMessage::now(&my_name, &peer_name, text);
    state.history.append(key, echo.clone());
    state
        .registry
        .send_to(user_id, conn_id, Arc::new(ServerEvent::Message { item: echo }));

    // An online peer answers with the next canned phrase; the reply goes to
    // every live handle on both sides. An offline peer stays silent.
    if state.presence.is_online(peer_id) {
        let reply = ChatMessage::auto_now(&peer_name, &my_name, state.replies.next());
        state.history.append(key, reply.clone());

        let event = Arc::new(ServerEvent::Message { item: reply });
        state.registry.fanout(peer_id, event.clone());
        state.registry.fanout(user_id, event);
    }
}
