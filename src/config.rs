use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::AppResult;
use crate::metadata::PKG_NAME;
use crate::query::SortMode;
use crate::storage::StorageError;

pub const SETTINGS_FILE: &str = "settings.json";
pub const DATA_DIR_ENV: &str = "HOMESHELF_DATA_DIR";
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// User settings persisted as `<config_dir>/homeshelf/settings.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Overrides the platform data directory when set.
    pub data_dir: Option<PathBuf>,
    pub log_level: String,
    pub default_sort: SortMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            default_sort: SortMode::default(),
        }
    }
}

impl Settings {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(PKG_NAME).join(SETTINGS_FILE))
    }

    /// Loads settings from the default location, falling back to defaults.
    pub fn load() -> Self {
        Self::default_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    /// Reads `path`; a missing or unreadable file yields the defaults.
    pub fn load_from(path: &Path) -> Self {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no settings file, using defaults");
                return Self::default();
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to read settings");
                return Self::default();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|err| {
            warn!(path = %path.display(), error = %err, "invalid settings, using defaults");
            Self::default()
        })
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        let tmp = path.with_extension("tmp");
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Data directory in priority order: explicit override (flag or
    /// environment), the settings file, then the platform data directory.
    pub fn resolve_data_dir(&self, override_dir: Option<&Path>) -> AppResult<PathBuf> {
        if let Some(dir) = override_dir {
            return Ok(dir.to_path_buf());
        }
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join(PKG_NAME))
            .ok_or_else(|| StorageError::NoDataDir.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join(SETTINGS_FILE));
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.log_level, "warn");
    }

    #[test]
    fn invalid_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(Settings::load_from(&path), Settings::default());
    }

    #[test]
    fn partial_file_fills_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(&path, r#"{"defaultSort":"date"}"#).unwrap();
        let settings = Settings::load_from(&path);
        assert_eq!(settings.default_sort, SortMode::Date);
        assert_eq!(settings.log_level, DEFAULT_LOG_LEVEL);
        assert!(settings.data_dir.is_none());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(SETTINGS_FILE);
        let settings = Settings {
            data_dir: Some(dir.path().join("data")),
            log_level: "debug".into(),
            default_sort: SortMode::Category,
        };
        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path), settings);
    }

    #[test]
    fn override_beats_settings_file() {
        let settings = Settings {
            data_dir: Some(PathBuf::from("/from/settings")),
            ..Settings::default()
        };
        let flag = PathBuf::from("/from/flag");
        assert_eq!(settings.resolve_data_dir(Some(&flag)).unwrap(), flag);
        assert_eq!(
            settings.resolve_data_dir(None).unwrap(),
            PathBuf::from("/from/settings")
        );
    }
}
