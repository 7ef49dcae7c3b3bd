//! Application state wiring the chat service together.
//!
//! AppState holds the service instance used by both CLI commands and REST
//! handlers. `ChatService` is generic over its transcript store; AppState
//! pins it to [`AppStore`], which is either the JSON file or, for
//! `--ephemeral` runs, memory.

use std::path::PathBuf;
use std::sync::Arc;

use secrecy::SecretString;

use parley_core::chat::service::ChatService;
use parley_core::context::ContextBuilder;
use parley_core::llm::retry::RetryPolicy;
use parley_core::store::TranscriptStore;
use parley_core::store::memory::InMemoryTranscriptStore;
use parley_infra::config::load_config;
use parley_infra::filesystem::resolve_data_dir;
use parley_infra::llm::create_provider;
use parley_infra::store::JsonFileTranscriptStore;
use parley_types::error::StorageError;
use parley_types::message::Transcript;

/// Transcript store selected at startup.
#[derive(Debug)]
pub enum AppStore {
    File(JsonFileTranscriptStore),
    Memory(InMemoryTranscriptStore),
}

impl AppStore {
    pub fn describe(&self) -> String {
        match self {
            AppStore::File(store) => store.path().display().to_string(),
            AppStore::Memory(_) => "memory".to_string(),
        }
    }
}

impl TranscriptStore for AppStore {
    async fn load(&self) -> Result<Transcript, StorageError> {
        match self {
            AppStore::File(store) => store.load().await,
            AppStore::Memory(store) => store.load().await,
        }
    }

    async fn save(&self, transcript: &Transcript) -> Result<(), StorageError> {
        match self {
            AppStore::File(store) => store.save(transcript).await,
            AppStore::Memory(store) => store.save(transcript).await,
        }
    }
}

pub type ConcreteChatService = ChatService<AppStore>;

/// Startup overrides gathered from the command line and environment.
#[derive(Default)]
pub struct StartupOptions {
    pub api_key: Option<SecretString>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub ephemeral: bool,
}

/// Shared application state.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
    pub data_dir: PathBuf,
    pub has_credential: bool,
}

impl AppState {
    /// Initialize the application state: load config, wire provider and store.
    pub async fn init(options: StartupOptions) -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir).await?;

        let mut config = load_config(&data_dir).await;
        if let Some(model) = options.model.filter(|m| !m.trim().is_empty()) {
            config.provider.model = model;
        }
        if let Some(base_url) = options.base_url.filter(|u| !u.trim().is_empty()) {
            config.provider.base_url = base_url;
        }

        let api_key = options.api_key;
        let has_credential = api_key.is_some();
        let provider = create_provider(&config.provider, api_key)?;

        let store = if options.ephemeral {
            AppStore::Memory(InMemoryTranscriptStore::new())
        } else {
            AppStore::File(JsonFileTranscriptStore::in_data_dir(&data_dir))
        };

        let chat_service = ChatService::new(
            store,
            provider,
            ContextBuilder::from_settings(&config.chat),
            config.provider.model.clone(),
        )
        .with_retry_policy(RetryPolicy::from_settings(&config.provider));

        tracing::debug!(
            data_dir = %data_dir.display(),
            provider = chat_service.provider_name(),
            model = chat_service.model(),
            "Application state initialized"
        );

        Ok(Self {
            chat_service: Arc::new(chat_service),
            data_dir,
            has_credential,
        })
    }
}
