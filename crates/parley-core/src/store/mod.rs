//! Transcript store abstraction.
//!
//! Defines the whole-document load/save interface for the conversation
//! transcript. The durable implementation lives in parley-infra; an
//! in-memory double lives in [`memory`].

pub mod memory;

use parley_types::error::StorageError;
use parley_types::message::Transcript;

/// Durable home of the transcript.
///
/// Both operations act on the entire document; there is no partial access.
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
pub trait TranscriptStore: Send + Sync {
    /// Load the full persisted transcript.
    ///
    /// When nothing has been persisted yet, implementations initialize and
    /// persist an empty transcript and return it.
    fn load(&self) -> impl std::future::Future<Output = Result<Transcript, StorageError>> + Send;

    /// Replace the persisted transcript with `transcript`.
    fn save(
        &self,
        transcript: &Transcript,
    ) -> impl std::future::Future<Output = Result<(), StorageError>> + Send;
}
