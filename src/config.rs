use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::{Error, Result};
use crate::highlight::DEFAULT_HIGHLIGHT_MS;
use crate::texts::Difficulty;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub difficulty: Difficulty,
    pub highlight_ms: u64,
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Easy,
            highlight_ms: DEFAULT_HIGHLIGHT_MS,
            log_level: "info".to_string(),
        }
    }
}

/// Overrides given on the command line; `None` keeps the file value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub difficulty: Option<Difficulty>,
    pub highlight_ms: Option<u64>,
    pub log_level: Option<String>,
}

impl Config {
    pub fn merged(mut self, overrides: Overrides) -> Self {
        if let Some(difficulty) = overrides.difficulty {
            self.difficulty = difficulty;
        }
        if let Some(highlight_ms) = overrides.highlight_ms {
            self.highlight_ms = highlight_ms;
        }
        if let Some(log_level) = overrides.log_level {
            self.log_level = log_level;
        }
        self
    }
}

/// Read-only source of preferences
pub trait ConfigStore {
    fn load(&self) -> Config;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "wordrace") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("wordrace_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Strict read: `Ok(None)` when the file does not exist
    pub fn try_load(&self) -> Result<Option<Config>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(Error::ConfigRead {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        serde_json::from_slice::<Config>(&bytes)
            .map(Some)
            .map_err(|source| Error::ConfigParse {
                path: self.path.clone(),
                source,
            })
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        match self.try_load() {
            Ok(Some(cfg)) => cfg,
            Ok(None) => Config::default(),
            Err(err) => {
                warn!(target: "config", %err, "falling back to default config");
                Config::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("config.json"));
        assert_matches!(store.try_load(), Ok(None));
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn load_custom_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{ "difficulty": "hard", "highlight_ms": 250, "log_level": "debug" }"#,
        )
        .unwrap();
        let loaded = FileConfigStore::with_path(&path).load();
        assert_eq!(
            loaded,
            Config {
                difficulty: Difficulty::Hard,
                highlight_ms: 250,
                log_level: "debug".to_string(),
            }
        );
    }

    #[test]
    fn partial_config_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "difficulty": "medium" }"#).unwrap();
        let loaded = FileConfigStore::with_path(&path).load();
        assert_eq!(loaded.difficulty, Difficulty::Medium);
        assert_eq!(loaded.highlight_ms, DEFAULT_HIGHLIGHT_MS);
    }

    #[test]
    fn invalid_config_is_an_error_but_load_falls_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();
        let store = FileConfigStore::with_path(&path);
        assert_matches!(store.try_load(), Err(Error::ConfigParse { .. }));
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn overrides_take_precedence() {
        let cfg = Config::default().merged(Overrides {
            difficulty: Some(Difficulty::Hard),
            highlight_ms: None,
            log_level: Some("trace".to_string()),
        });
        assert_eq!(cfg.difficulty, Difficulty::Hard);
        assert_eq!(cfg.highlight_ms, DEFAULT_HIGHLIGHT_MS);
        assert_eq!(cfg.log_level, "trace");
    }
}
