//! Fixed user roster with presence-classified lookups.
//!
//! The roster is immutable and baked in at startup; only the computed
//! online flag varies between reads.

use std::sync::Arc;

use serde::Serialize;

use crate::gateway::presence::PresenceStore;

/// Roster entries, ids assigned 1-based in order.
const ROSTER: &[(&str, Option<&str>)] = &[
    ("Frodo Baggins", Some("lost again")),
    ("Samwise Gamgee", Some("boiling potatoes")),
    ("Gandalf", Some("sending fireworks")),
    ("Aragorn", Some("on the road")),
    ("Legolas", Some("counting arrows")),
    ("Gimli", Some("needs more ale")),
    ("Boromir", Some("arguing with Frodo")),
    ("Galadriel", Some("swimming")),
    ("Elrond", Some("writing elvish letters")),
    ("Saruman", Some("open to help")),
    ("Gollum", Some("precious time")),
    ("Eowyn", Some("cooking soup")),
    ("Faramir", None),
    ("Bilbo Baggins", Some("missing the Shire")),
    ("Sauron", Some("just watching")),
];

/// A roster entry as served by the directory endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct DirectoryUser {
    pub id: i64,
    pub name: String,
    pub status: Option<String>,
    #[serde(rename = "isOnline")]
    pub is_online: bool,
}

pub struct UserDirectory {
    presence: Arc<PresenceStore>,
}

impl UserDirectory {
    pub fn new(presence: Arc<PresenceStore>) -> Self {
        Self { presence }
    }

    /// The full roster with presence computed against one fresh random
    /// snapshot, so every row in a single listing agrees.
    pub fn list_users(&self) -> Vec<DirectoryUser> {
        self.presence.resample();
        ROSTER
            .iter()
            .enumerate()
            .map(|(idx, (name, status))| self.entry(idx as i64 + 1, name, *status))
            .collect()
    }

    /// Single lookup against the current random snapshot; no bucket-wide
    /// resample. Unknown ids yield `None`.
    pub fn get_user(&self, id: i64) -> Option<DirectoryUser> {
        if id < 1 || id as usize > ROSTER.len() {
            return None;
        }
        let (name, status) = ROSTER[id as usize - 1];
        Some(self.entry(id, name, status))
    }

    /// Display name for a user, falling back to the id's string form for
    /// ids that are off the roster.
    pub fn display_name(&self, id: i64) -> String {
        if id >= 1 && (id as usize) <= ROSTER.len() {
            ROSTER[id as usize - 1].0.to_string()
        } else {
            id.to_string()
        }
    }

    fn entry(&self, id: i64, name: &str, status: Option<&str>) -> DirectoryUser {
        DirectoryUser {
            id,
            name: name.to_string(),
            status: status.map(str::to_string),
            is_online: self.presence.snapshot_online(id),
        }
    }
}
