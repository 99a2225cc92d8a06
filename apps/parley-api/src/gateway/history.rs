//! Per-pair conversation logs.
//!
//! Each unordered user-id pair owns one append-only log. Entries use
//! `DashMap` sharding plus a per-conversation `parking_lot::Mutex`, so
//! appends are atomic and total-ordered per pair while independent pairs
//! never contend.

use dashmap::DashMap;
use parking_lot::Mutex;

use parley_common::{ChatMessage, ConversationKey};

pub struct ConversationStore {
    conversations: DashMap<ConversationKey, Mutex<Vec<ChatMessage>>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self {
            conversations: DashMap::new(),
        }
    }

    /// Fetch the log for a pair, creating and seeding it on first access.
    ///
    /// Seeding happens at most once per key, even under racing sessions:
    /// two bootstrap messages (peer greets first, then the reply), both
    /// stamped at seed time with whatever display names are current.
    /// Returns a point-in-time snapshot; later appends are not visible
    /// through it.
    pub fn get_or_seed(
        &self,
        key: ConversationKey,
        my_name: &str,
        peer_name: &str,
    ) -> Vec<ChatMessage> {
        let entry = self.conversations.entry(key).or_insert_with(|| {
            Mutex::new(vec![
                ChatMessage::now(peer_name, my_name, "Hi there!"),
                ChatMessage::now(my_name, peer_name, "Hello!"),
            ])
        });
        let log = entry.lock();
        log.clone()
    }

    /// Append one message to the end of a pair's log. Never reorders or
    /// deletes.
    pub fn append(&self, key: ConversationKey, message: ChatMessage) {
        self.conversations
            .entry(key)
            .or_default()
            .lock()
            .push(message);
    }

    /// Point-in-time copy of a pair's log; empty if the pair has no log.
    pub fn snapshot(&self, key: ConversationKey) -> Vec<ChatMessage> {
        self.conversations
            .get(&key)
            .map(|entry| entry.lock().clone())
            .unwrap_or_default()
    }
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}
