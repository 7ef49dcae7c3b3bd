//! Configuration loader for Parley.
//!
//! Reads `config.toml` from the data directory (`~/.parley/` by default)
//! and deserializes it into [`ParleyConfig`]. Falls back to defaults when
//! the file is missing or malformed.

use std::path::Path;

use parley_types::config::ParleyConfig;
use parley_types::error::ConfigError;

use crate::filesystem::config_path;

/// Load configuration from `{data_dir}/config.toml`.
///
/// - Missing file: [`ParleyConfig::default()`].
/// - Unreadable or invalid file: logs a warning and returns the default.
pub async fn load_config(data_dir: &Path) -> ParleyConfig {
    let path = config_path(data_dir);

    let content = match tokio::fs::read_to_string(&path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", path.display());
            return ParleyConfig::default();
        }
        Err(err) => {
            let err = ConfigError::Read(err.to_string());
            tracing::warn!("{}: {err}, using defaults", path.display());
            return ParleyConfig::default();
        }
    };

    match parse_config(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("{}: {err}, using defaults", path.display());
            ParleyConfig::default()
        }
    }
}

/// Parse configuration file contents.
pub fn parse_config(content: &str) -> Result<ParleyConfig, ConfigError> {
    toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).await;
        assert_eq!(config, ParleyConfig::default());
        assert_eq!(config.provider.model, "gpt-4.1-mini");
    }

    #[tokio::test]
    async fn load_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
[provider]
model = "gpt-4o"
max_attempts = 3

[chat]
system_prompt = "Answer in one sentence."
max_history_messages = 20
"#,
        )
        .await
        .unwrap();

        let config = load_config(tmp.path()).await;
        assert_eq!(config.provider.model, "gpt-4o");
        assert_eq!(config.provider.max_attempts, 3);
        // Unset fields keep their defaults
        assert_eq!(config.provider.base_url, "https://api.openai.com/v1");
        assert_eq!(config.chat.system_prompt, "Answer in one sentence.");
        assert_eq!(config.chat.max_history_messages, Some(20));
    }

    #[tokio::test]
    async fn load_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_config(tmp.path()).await;
        assert_eq!(config, ParleyConfig::default());
    }

    #[test]
    fn parse_config_reports_parse_error() {
        let err = parse_config("[provider]\nmax_attempts = \"many\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
