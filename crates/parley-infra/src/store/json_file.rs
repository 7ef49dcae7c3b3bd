//! JSON file implementation of [`TranscriptStore`].
//!
//! The whole transcript lives in one pretty-printed JSON array
//! (`{data_dir}/messages.json`). Writes go to a temporary file in the same
//! directory which is then renamed over the target, so readers only ever see
//! a complete document.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;

use parley_core::store::TranscriptStore;
use parley_types::error::StorageError;
use parley_types::message::Transcript;

use crate::filesystem::messages_path;

/// Transcript store backed by a single JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonFileTranscriptStore {
    path: PathBuf,
}

impl JsonFileTranscriptStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `{data_dir}/messages.json`.
    pub fn in_data_dir(data_dir: &Path) -> Self {
        Self::new(messages_path(data_dir))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn ensure_parent_dir(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Move an unparsable document out of the way so it is never overwritten.
    async fn quarantine(&self, reason: &str) -> Result<PathBuf, StorageError> {
        let mut target = self.path.clone().into_os_string();
        target.push(format!(".corrupt-{}", Utc::now().timestamp_millis()));
        let target = PathBuf::from(target);

        tokio::fs::rename(&self.path, &target).await?;
        tracing::warn!(
            path = %self.path.display(),
            moved_to = %target.display(),
            reason,
            "Transcript document is corrupt; moved aside and starting empty"
        );
        Ok(target)
    }

    async fn bootstrap(&self) -> Result<Transcript, StorageError> {
        let empty = Transcript::new();
        self.save(&empty).await?;
        Ok(empty)
    }
}

impl TranscriptStore for JsonFileTranscriptStore {
    async fn load(&self) -> Result<Transcript, StorageError> {
        self.ensure_parent_dir().await?;

        // Raw bytes: invalid UTF-8 is a corrupt document, not an I/O failure
        let content = match tokio::fs::read(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No transcript yet, creating empty one");
                return self.bootstrap().await;
            }
            Err(err) => return Err(err.into()),
        };

        match serde_json::from_slice::<Transcript>(&content) {
            Ok(transcript) => Ok(transcript),
            Err(err) => {
                let err = StorageError::Corrupt(err.to_string());
                self.quarantine(&err.to_string()).await?;
                self.bootstrap().await
            }
        }
    }

    async fn save(&self, transcript: &Transcript) -> Result<(), StorageError> {
        self.ensure_parent_dir().await?;

        let json = serde_json::to_string_pretty(transcript)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || write_atomically(&path, json.as_bytes()))
            .await
            .map_err(|e| StorageError::Io(format!("write task failed: {e}")))?
    }
}

/// Write `bytes` to a sibling temp file, sync it, and rename it over `path`.
fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| StorageError::Io(e.error.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_types::message::{Message, MessageId, MessageRole};
    use tempfile::TempDir;

    fn message(id: u64, role: MessageRole, text: &str) -> Message {
        Message {
            id: MessageId(id),
            role,
            text: text.to_string(),
            timestamp: Utc::now(),
        }
    }

    fn corrupt_siblings(dir: &Path) -> Vec<PathBuf> {
        std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().path())
            .filter(|p| p.to_string_lossy().contains(".corrupt-"))
            .collect()
    }

    #[tokio::test]
    async fn test_load_bootstraps_empty_document() {
        let tmp = TempDir::new().unwrap();
        let store = JsonFileTranscriptStore::in_data_dir(&tmp.path().join("nested"));

        let transcript = store.load().await.unwrap();
        assert!(transcript.is_empty());

        let on_disk = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(on_disk.trim(), "[]");
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let tmp = TempDir::new().unwrap();
        let store = JsonFileTranscriptStore::in_data_dir(tmp.path());

        let transcript = Transcript::from(vec![
            message(1, MessageRole::User, "hello"),
            message(2, MessageRole::Assistant, "Hi!"),
        ]);
        store.save(&transcript).await.unwrap();

        assert_eq!(store.load().await.unwrap(), transcript);
    }

    #[tokio::test]
    async fn test_load_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let store = JsonFileTranscriptStore::in_data_dir(tmp.path());
        store
            .save(&Transcript::from(vec![message(7, MessageRole::User, "x")]))
            .await
            .unwrap();

        let first = store.load().await.unwrap();
        let second = store.load().await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_document_is_pretty_printed_array() {
        let tmp = TempDir::new().unwrap();
        let store = JsonFileTranscriptStore::in_data_dir(tmp.path());
        store
            .save(&Transcript::from(vec![message(1, MessageRole::User, "hello")]))
            .await
            .unwrap();

        let on_disk = std::fs::read_to_string(store.path()).unwrap();
        assert!(on_disk.starts_with("[\n"));
        let value: serde_json::Value = serde_json::from_str(&on_disk).unwrap();
        assert_eq!(value[0]["role"], "user");
        assert_eq!(value[0]["text"], "hello");
        assert_eq!(value[0]["id"], 1);
    }

    #[tokio::test]
    async fn test_reads_document_written_by_other_tools() {
        let tmp = TempDir::new().unwrap();
        let store = JsonFileTranscriptStore::in_data_dir(tmp.path());
        std::fs::write(
            store.path(),
            r#"[{"id":1718000000000,"role":"user","text":"hi","timestamp":"2024-06-10T06:13:20.000Z"}]"#,
        )
        .unwrap();

        let transcript = store.load().await.unwrap();
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.messages()[0].id, MessageId(1_718_000_000_000));
    }

    #[tokio::test]
    async fn test_corrupt_document_is_moved_aside() {
        let tmp = TempDir::new().unwrap();
        let store = JsonFileTranscriptStore::in_data_dir(tmp.path());
        std::fs::write(store.path(), "{ not json").unwrap();

        let transcript = store.load().await.unwrap();
        assert!(transcript.is_empty());

        let moved = corrupt_siblings(tmp.path());
        assert_eq!(moved.len(), 1);
        assert_eq!(std::fs::read_to_string(&moved[0]).unwrap(), "{ not json");
        assert_eq!(std::fs::read_to_string(store.path()).unwrap().trim(), "[]");
    }

    #[tokio::test]
    async fn test_non_utf8_document_is_moved_aside() {
        let tmp = TempDir::new().unwrap();
        let store = JsonFileTranscriptStore::in_data_dir(tmp.path());
        let mut raw = br#"[{"id":1,"role":"user","text":"precious "#.to_vec();
        raw.extend_from_slice(&[0xff, 0xfe]);
        raw.extend_from_slice(br#"","timestamp":"2024-06-10T06:13:20.000Z"}]"#);
        std::fs::write(store.path(), &raw).unwrap();

        let transcript = store.load().await.unwrap();
        assert!(transcript.is_empty());

        let moved = corrupt_siblings(tmp.path());
        assert_eq!(moved.len(), 1);
        assert_eq!(std::fs::read(&moved[0]).unwrap(), raw);
    }

    #[tokio::test]
    async fn test_send_over_non_utf8_document_keeps_original_bytes() {
        use parley_core::chat::service::ChatService;
        use parley_core::context::ContextBuilder;
        use parley_core::llm::retry::RetryPolicy;
        use parley_types::config::ProviderSettings;

        let tmp = TempDir::new().unwrap();
        let store = JsonFileTranscriptStore::in_data_dir(tmp.path());
        let mut raw = br#"[{"id":1,"role":"user","text":"precious "#.to_vec();
        raw.extend_from_slice(&[0xff, 0xfe]);
        raw.extend_from_slice(br#"","timestamp":"2024-06-10T06:13:20.000Z"}]"#);
        std::fs::write(store.path(), &raw).unwrap();

        // No credential: the turn completes with a fallback reply, offline
        let provider = crate::llm::create_provider(&ProviderSettings::default(), None).unwrap();
        let service = ChatService::new(store.clone(), provider, ContextBuilder::new("sys"), "m")
            .with_retry_policy(RetryPolicy::no_retry());

        let transcript = service.send(Some("hello")).await.unwrap();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.messages()[0].text, "hello");

        let moved = corrupt_siblings(tmp.path());
        assert_eq!(moved.len(), 1);
        assert_eq!(std::fs::read(&moved[0]).unwrap(), raw);
        assert_eq!(store.load().await.unwrap(), transcript);
    }

    #[tokio::test]
    async fn test_save_replaces_whole_document() {
        let tmp = TempDir::new().unwrap();
        let store = JsonFileTranscriptStore::in_data_dir(tmp.path());
        store
            .save(&Transcript::from(vec![
                message(1, MessageRole::User, "a"),
                message(2, MessageRole::Assistant, "b"),
            ]))
            .await
            .unwrap();
        store
            .save(&Transcript::from(vec![message(3, MessageRole::User, "c")]))
            .await
            .unwrap();

        let transcript = store.load().await.unwrap();
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.messages()[0].text, "c");
        // No temp files left behind
        let entries = std::fs::read_dir(tmp.path()).unwrap().count();
        assert_eq!(entries, 1);
    }
}
