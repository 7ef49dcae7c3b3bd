//! In-memory transcript store.
//!
//! Used by tests and by `--ephemeral` runs. Failures can be switched on to
//! exercise the orchestrator's best-effort storage policy.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parley_types::error::StorageError;
use parley_types::message::Transcript;

use super::TranscriptStore;

/// Transcript store backed by a mutex-guarded value.
#[derive(Debug, Default)]
pub struct InMemoryTranscriptStore {
    document: Mutex<Option<Transcript>>,
    fail_loads: AtomicBool,
    fail_saves: AtomicBool,
    saves: AtomicUsize,
}

impl InMemoryTranscriptStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an already-persisted transcript.
    pub fn with_transcript(transcript: Transcript) -> Self {
        Self {
            document: Mutex::new(Some(transcript)),
            ..Self::default()
        }
    }

    pub fn set_fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Current durable contents, without bootstrapping.
    pub fn snapshot(&self) -> Option<Transcript> {
        self.document
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl TranscriptStore for InMemoryTranscriptStore {
    async fn load(&self) -> Result<Transcript, StorageError> {
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(StorageError::Io("simulated read failure".to_string()));
        }
        let mut document = self
            .document
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(document.get_or_insert_with(Transcript::new).clone())
    }

    async fn save(&self, transcript: &Transcript) -> Result<(), StorageError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StorageError::Io("simulated write failure".to_string()));
        }
        *self
            .document
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(transcript.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
