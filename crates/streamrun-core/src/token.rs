//! Uniqueness tokens for task instance IDs.

use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Source of tokens that disambiguate launch attempts.
///
/// Implementations must never hand out the same token twice, including under
/// concurrent calls from different threads.
pub trait TokenSource: Send + Sync {
    /// Produce the next token.
    fn next_token(&self) -> String;
}

/// Random v4 UUID per call. The production default.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidTokens;

impl TokenSource for UuidTokens {
    fn next_token(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Deterministic tokens for tests and replays.
///
/// Renders `{seed:08x}-{n:06}` where `n` counts up from zero.
#[derive(Debug, Default)]
pub struct SequenceTokens {
    seed: u64,
    counter: AtomicU64,
}

impl SequenceTokens {
    /// Create a generator starting at zero for the given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed,
            counter: AtomicU64::new(0),
        }
    }
}

impl TokenSource for SequenceTokens {
    fn next_token(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        format!("{:08x}-{:06}", self.seed, n)
    }
}
