//! Message id generation.
//!
//! Ids are millisecond-scale numbers so they stay compatible with documents
//! written by earlier versions, but they come from a monotonic counter: two
//! messages created in the same millisecond still get distinct, increasing ids.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

use parley_types::message::MessageId;

/// Hands out strictly increasing [`MessageId`]s.
#[derive(Debug, Default)]
pub struct MessageIdGenerator {
    last: AtomicU64,
}

impl MessageIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure future ids are greater than `id` (e.g. ids loaded from disk).
    pub fn observe(&self, id: MessageId) {
        self.last.fetch_max(id.0, Ordering::SeqCst);
    }

    /// Next id, based on the current wall clock.
    pub fn next_id(&self) -> MessageId {
        let now_ms = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        self.next_at(now_ms)
    }

    /// Next id given a clock reading of `now_ms`.
    ///
    /// Returns `max(now_ms, last + 1)` and records it.
    pub fn next_at(&self, now_ms: u64) -> MessageId {
        let mut current = self.last.load(Ordering::SeqCst);
        loop {
            let candidate = now_ms.max(current.saturating_add(1));
            match self.last.compare_exchange(
                current,
                candidate,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => return MessageId(candidate),
                Err(actual) => current = actual,
            }
        }
    }
}
