//! `.env` loading for the `parley` binary.
//!
//! Candidates, first hit wins: `./.env`, then the data directory's `.env`
//! (`$PARLEY_DATA_DIR/.env`, else `~/.parley/.env`). A file that exists but
//! does not parse is skipped and reported. Loading happens before argument
//! parsing and before tracing is up, so the outcome is returned as a
//! [`DotenvReport`] for `main` to log once the subscriber exists.

use std::env;
use std::path::{Path, PathBuf};

/// What `.env` loading did.
#[derive(Debug, Default)]
pub struct DotenvReport {
    /// The file whose variables were applied, if any.
    pub loaded: Option<PathBuf>,
    /// Files that exist but could not be read or parsed.
    pub skipped: Vec<(PathBuf, dotenvy::Error)>,
}

impl DotenvReport {
    pub fn log(&self) {
        for (path, error) in &self.skipped {
            tracing::warn!(
                path = %path.display(),
                %error,
                "Ignoring malformed .env file"
            );
        }
        match &self.loaded {
            Some(path) => tracing::debug!(path = %path.display(), "Loaded .env"),
            None => tracing::debug!("No .env file found"),
        }
    }
}

fn fallback_dotenv_path(data_dir: Option<PathBuf>, home_dir: Option<PathBuf>) -> Option<PathBuf> {
    let base = data_dir.or_else(|| home_dir.map(|home| home.join(".parley")))?;
    Some(base.join(".env"))
}

/// `Ok(false)` when the file does not exist.
fn apply_file(path: &Path) -> Result<bool, dotenvy::Error> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(true),
        Err(err) if err.not_found() => Ok(false),
        Err(err) => Err(err),
    }
}

fn load_first(candidates: impl IntoIterator<Item = PathBuf>) -> DotenvReport {
    let mut report = DotenvReport::default();
    for path in candidates {
        match apply_file(&path) {
            Ok(true) => {
                report.loaded = Some(path);
                break;
            }
            Ok(false) => {}
            Err(err) => report.skipped.push((path, err)),
        }
    }
    report
}

/// Apply the first usable `.env`. Variables already set in the process win.
pub fn load_dotenv() -> DotenvReport {
    let fallback = fallback_dotenv_path(
        env::var_os("PARLEY_DATA_DIR").map(PathBuf::from),
        dirs::home_dir(),
    );
    load_first(std::iter::once(PathBuf::from(".env")).chain(fallback))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn fallback_prefers_data_dir() {
        let path = fallback_dotenv_path(
            Some(PathBuf::from("/srv/parley")),
            Some(PathBuf::from("/home/user")),
        );
        assert_eq!(path, Some(PathBuf::from("/srv/parley/.env")));
    }

    #[test]
    fn fallback_uses_home_when_data_dir_unset() {
        let path = fallback_dotenv_path(None, Some(PathBuf::from("/home/user")));
        assert_eq!(path, Some(PathBuf::from("/home/user/.parley/.env")));
    }

    #[test]
    fn fallback_none_without_any_base() {
        assert_eq!(fallback_dotenv_path(None, None), None);
    }

    #[test]
    fn missing_files_are_not_reported() {
        let tmp = TempDir::new().unwrap();
        let report = load_first([tmp.path().join(".env"), tmp.path().join("data/.env")]);
        assert!(report.loaded.is_none());
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn malformed_file_is_reported_and_next_candidate_loads() {
        let tmp = TempDir::new().unwrap();
        let broken = tmp.path().join("broken.env");
        let data = tmp.path().join("data.env");
        std::fs::write(&broken, "this line is not an assignment\n").unwrap();
        std::fs::write(&data, "PARLEY_ENV_LOADER_TEST_FALLBACK=from-data-dir\n").unwrap();

        let report = load_first([broken.clone(), data.clone()]);

        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].0, broken);
        assert!(!report.skipped[0].1.not_found());
        assert_eq!(report.loaded, Some(data));
        assert_eq!(
            env::var("PARLEY_ENV_LOADER_TEST_FALLBACK").as_deref(),
            Ok("from-data-dir")
        );
    }

    #[test]
    fn first_usable_file_wins() {
        let tmp = TempDir::new().unwrap();
        let local = tmp.path().join("local.env");
        let data = tmp.path().join("data.env");
        std::fs::write(&local, "PARLEY_ENV_LOADER_TEST_LOCAL=1\n").unwrap();
        std::fs::write(&data, "PARLEY_ENV_LOADER_TEST_SHADOWED=1\n").unwrap();

        let report = load_first([local.clone(), data]);

        assert_eq!(report.loaded, Some(local));
        assert!(report.skipped.is_empty());
        assert!(env::var("PARLEY_ENV_LOADER_TEST_LOCAL").is_ok());
        assert!(env::var("PARLEY_ENV_LOADER_TEST_SHADOWED").is_err());
    }
}
