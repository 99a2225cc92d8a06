/// Identifies the single shared conversation between two users.
///
/// The pair is stored as `(min, max)`, so the key for `(a, b)` and `(b, a)`
/// is the same value and both directions land in one history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConversationKey {
    lo: i64,
    hi: i64,
}

impl ConversationKey {
    pub fn new(a: i64, b: i64) -> Self {
        if a <= b {
            Self { lo: a, hi: b }
        } else {
            Self { lo: b, hi: a }
        }
    }

    pub fn participants(&self) -> (i64, i64) {
        (self.lo, self.hi)
    }
}
