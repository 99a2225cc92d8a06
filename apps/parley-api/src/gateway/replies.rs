//! Rotating canned replies served from one global cursor.

use std::sync::atomic::{AtomicUsize, Ordering};

const PHRASES: &[&str] = &[
    "Lorem ipsum dolor sit amet.",
    "Consectetur adipiscing elit.",
    "Sed do eiusmod tempor incididunt.",
    "Ut labore et dolore magna aliqua.",
    "Duis aute irure dolor in reprehenderit.",
    "Excepteur sint occaecat cupidatat non proident.",
];

/// Finite ordered phrase list with a single shared cursor. The cursor is
/// global across all conversations: successive calls anywhere advance the
/// same rotation, wrapping indefinitely.
pub struct CannedReplies {
    phrases: Vec<String>,
    cursor: AtomicUsize,
}

impl CannedReplies {
    pub fn new() -> Self {
        Self::with_phrases(PHRASES.iter().map(|p| p.to_string()).collect())
    }

    pub fn with_phrases(phrases: Vec<String>) -> Self {
        Self {
            phrases,
            cursor: AtomicUsize::new(0),
        }
    }

    /// The phrase at the cursor; advances exactly once per call, even under
    /// concurrent callers. An empty list yields an empty string without
    /// advancing.
    pub fn next(&self) -> String {
        if self.phrases.is_empty() {
            return String::new();
        }
        let idx = self.cursor.fetch_add(1, Ordering::Relaxed);
        self.phrases[idx % self.phrases.len()].clone()
    }
}

impl Default for CannedReplies {
    fn default() -> Self {
        Self::new()
    }
}
