//! Per-user live connection handles and best-effort fanout.
//!
//! Uses `DashMap` for shard-level concurrency: add/remove/fanout for one
//! user id are atomic with respect to each other, and unrelated users
//! never contend.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::mpsc;

use super::events::ServerEvent;

/// Identifies one live connection within the registry.
pub type ConnId = u64;

/// Outbound queue handle for one connection. The connection's writer task
/// drains the receiving end into the websocket.
pub type EventSender = mpsc::UnboundedSender<Arc<ServerEvent>>;

/// Tracks every live connection per user id. A user may hold several
/// handles at once; a user with none is simply absent.
pub struct ConnectionRegistry {
    connections: DashMap<i64, HashMap<ConnId, EventSender>>,
    next_conn_id: AtomicU64,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
            next_conn_id: AtomicU64::new(1),
        }
    }

    /// Register a new connection under `user_id`. Returns the handle id and
    /// the receiving end of its outbound queue.
    pub fn add(&self, user_id: i64) -> (ConnId, mpsc::UnboundedReceiver<Arc<ServerEvent>>) {
        let conn_id = self.next_conn_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();
        self.connections.entry(user_id).or_default().insert(conn_id, tx);
        (conn_id, rx)
    }

    /// Remove one handle. Returns true when the user has no handles left.
    pub fn remove(&self, user_id: i64, conn_id: ConnId) -> bool {
        let empty = match self.connections.get_mut(&user_id) {
            Some(mut entry) => {
                entry.remove(&conn_id);
                entry.is_empty()
            }
            None => true,
        };
        if empty {
            self.connections.remove_if(&user_id, |_, handles| handles.is_empty());
        }
        empty
    }

    /// Deliver an event to one specific handle. A missing or dead handle is
    /// ignored.
    pub fn send_to(&self, user_id: i64, conn_id: ConnId, event: Arc<ServerEvent>) {
        if let Some(entry) = self.connections.get(&user_id) {
            if let Some(tx) = entry.get(&conn_id) {
                let _ = tx.send(event);
            }
        }
    }

    /// Deliver an event to every live handle of `user_id`.
    ///
    /// The handle set is snapshotted before sending so a concurrent
    /// add/remove cannot disturb iteration. A failed send is skipped and
    /// never aborts delivery to the remaining handles.
    pub fn fanout(&self, user_id: i64, event: Arc<ServerEvent>) {
        let senders: Vec<EventSender> = match self.connections.get(&user_id) {
            Some(entry) => entry.values().cloned().collect(),
            None => return,
        };
        for tx in senders {
            let _ = tx.send(event.clone());
        }
    }

    /// Number of live handles for a user.
    pub fn handle_count(&self, user_id: i64) -> usize {
        self.connections.get(&user_id).map_or(0, |e| e.len())
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use parley_common::ChatMessage;

    fn message_event(text: &str) -> Arc<ServerEvent> {
        Arc::new(ServerEvent::Message {
            item: ChatMessage::now("a", "b", text),
        })
    }

    #[test]
    fn remove_last_handle_reports_empty() {
        let reg = ConnectionRegistry::new();
        let (c1, _rx1) = reg.add(7);
        let (c2, _rx2) = reg.add(7);

        assert!(!reg.remove(7, c1));
        assert!(reg.remove(7, c2));
        assert_eq!(reg.handle_count(7), 0);
    }

    #[test]
    fn remove_unknown_user_reports_empty() {
        let reg = ConnectionRegistry::new();
        assert!(reg.remove(42, 1));
    }

    #[test]
    fn fanout_reaches_every_handle() {
        let reg = ConnectionRegistry::new();
        let (_c1, mut rx1) = reg.add(7);
        let (_c2, mut rx2) = reg.add(7);

        reg.fanout(7, message_event("x"));

        assert!(rx1.try_recv().is_ok());
        assert!(rx2.try_recv().is_ok());
    }

    #[test]
    fn fanout_survives_a_dead_handle() {
        let reg = ConnectionRegistry::new();
        let (_c1, rx1) = reg.add(7);
        let (_c2, mut rx2) = reg.add(7);

        // First receiver gone: its send fails and is skipped.
        drop(rx1);
        reg.fanout(7, message_event("x"));

        assert!(rx2.try_recv().is_ok());
    }

    #[test]
    fn fanout_to_unknown_user_is_a_no_op() {
        let reg = ConnectionRegistry::new();
        reg.fanout(999, message_event("x"));
    }

    #[test]
    fn send_to_targets_a_single_handle() {
        let reg = ConnectionRegistry::new();
        let (c1, mut rx1) = reg.add(7);
        let (_c2, mut rx2) = reg.add(7);

        reg.send_to(7, c1, message_event("x"));

        assert!(rx1.try_recv().is_ok());
        assert!(rx2.try_recv().is_err());
    }

    #[test]
    fn conn_ids_are_unique_across_users() {
        let reg = ConnectionRegistry::new();
        let (c1, _rx1) = reg.add(1);
        let (c2, _rx2) = reg.add(2);
        assert_ne!(c1, c2);
    }
}
