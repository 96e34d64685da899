use crate::error::{BoardError, BoardResult};
use crate::seed::Seed;
use crate::storage::DEFAULT_STORAGE_KEY;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

const APP_DIR: &str = "taskboard";

/// Runtime settings, read from `config.toml`. Every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub storage_dir: PathBuf,
    pub storage_key: String,
    pub seed_file: Option<PathBuf>,
    pub log_dir: PathBuf,
    /// `tracing` filter directive; `RUST_LOG` takes precedence.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR);
        Self {
            storage_dir: data_dir.clone(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            seed_file: None,
            log_dir: data_dir.join("logs"),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
    }

    /// Reads `path` if given (it must exist), else the default location if a
    /// file is there, else falls back to defaults.
    pub fn load(path: Option<&Path>) -> BoardResult<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => Self::from_file(&path),
                None => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> BoardResult<Self> {
        let raw = fs::read_to_string(path).map_err(|source| BoardError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| BoardError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn seed(&self) -> Seed {
        match &self.seed_file {
            Some(path) => Seed::File(path.clone()),
            None => Seed::Builtin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "storage_dir = \"/tmp/board\"\nlog_level = \"debug\"").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.storage_dir, PathBuf::from("/tmp/board"));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
        assert_eq!(config.seed(), Seed::Builtin);
    }

    #[test]
    fn seed_file_selects_file_seed() {
        let config: Config = toml::from_str("seed_file = \"seed.json\"").unwrap();
        assert_eq!(config.seed(), Seed::File(PathBuf::from("seed.json")));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "storage = 1").unwrap();

        let err = Config::from_file(file.path()).unwrap_err();
        assert!(matches!(err, BoardError::ConfigParse { .. }));
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let err = Config::load(Some(Path::new("/nonexistent/taskboard.toml"))).unwrap_err();
        assert!(matches!(err, BoardError::ConfigRead { .. }));
    }
}
