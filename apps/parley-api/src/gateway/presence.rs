//! Presence partitions and the manual-override set.
//!
//! Every roster id belongs to exactly one fixed partition: always-online,
//! random-bucket, always-offline, or unclassified (offline). On top of that
//! sits a mutable manual-override set maintained by the chat gateway: an id
//! present there is online no matter which partition it is in. Evaluation
//! order is manual override, always-online, always-offline, random roll —
//! and must not be reordered.

use std::collections::HashSet;

use parking_lot::RwLock;
use rand::Rng;

/// Probability that a random-bucket member comes up online on one roll.
const RANDOM_ONLINE_PROBABILITY: f64 = 0.2;

/// Source of presence rolls. Injected so tests can pin outcomes.
pub trait Dice: Send + Sync {
    /// Returns true with probability `p`.
    fn roll(&self, p: f64) -> bool;
}

/// Production dice backed by the thread-local RNG.
pub struct ThreadRngDice;

impl Dice for ThreadRngDice {
    fn roll(&self, p: f64) -> bool {
        rand::thread_rng().gen_bool(p)
    }
}

/// Presence state shared by the user directory and the chat gateway.
pub struct PresenceStore {
    always_online: HashSet<i64>,
    random_bucket: HashSet<i64>,
    always_offline: HashSet<i64>,
    /// Ids forced online by the gateway; cleared when their last
    /// connection closes.
    manual_online: RwLock<HashSet<i64>>,
    /// Bucket members that came up online on the last `resample` call.
    rolled_online: RwLock<HashSet<i64>>,
    dice: Box<dyn Dice>,
}

impl PresenceStore {
    /// Build the store with the fixed roster partitions.
    pub fn new(dice: Box<dyn Dice>) -> Self {
        Self::with_partitions(dice, [1, 2, 3], 4..=10, 11..=15)
    }

    pub fn with_partitions(
        dice: Box<dyn Dice>,
        always_online: impl IntoIterator<Item = i64>,
        random_bucket: impl IntoIterator<Item = i64>,
        always_offline: impl IntoIterator<Item = i64>,
    ) -> Self {
        let store = Self {
            always_online: always_online.into_iter().collect(),
            random_bucket: random_bucket.into_iter().collect(),
            always_offline: always_offline.into_iter().collect(),
            manual_online: RwLock::new(HashSet::new()),
            rolled_online: RwLock::new(HashSet::new()),
            dice,
        };
        store.resample();
        store
    }

    /// Add or remove an id from the manual-override set. Idempotent.
    pub fn set_online(&self, id: i64, online: bool) {
        let mut manual = self.manual_online.write();
        if online {
            manual.insert(id);
        } else {
            manual.remove(&id);
        }
    }

    /// Presence check used by the chat engine. Random-bucket members get a
    /// fresh independent roll on every call; nothing is memoized here.
    pub fn is_online(&self, id: i64) -> bool {
        if self.manual_online.read().contains(&id) {
            return true;
        }
        if self.always_online.contains(&id) {
            return true;
        }
        if self.always_offline.contains(&id) {
            return false;
        }
        self.random_bucket.contains(&id) && self.dice.roll(RANDOM_ONLINE_PROBABILITY)
    }

    /// Re-roll the whole random bucket as one snapshot. The directory calls
    /// this once per listing so every row in a listing agrees.
    pub fn resample(&self) {
        let rolled = self
            .random_bucket
            .iter()
            .copied()
            .filter(|_| self.dice.roll(RANDOM_ONLINE_PROBABILITY))
            .collect();
        *self.rolled_online.write() = rolled;
    }

    /// Presence check against the last `resample` snapshot, used for
    /// directory reads. Same precedence as `is_online`.
    pub fn snapshot_online(&self, id: i64) -> bool {
        if self.manual_online.read().contains(&id) {
            return true;
        }
        if self.always_online.contains(&id) {
            return true;
        }
        if self.always_offline.contains(&id) {
            return false;
        }
        self.rolled_online.read().contains(&id)
    }
}
