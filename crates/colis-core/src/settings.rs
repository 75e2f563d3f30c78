// SPDX-License-Identifier: AGPL-3.0
// Colis Core - Settings persistence
//
// Settings are stored in a local JSON file under the platform config dir.

use crate::types::{AppError, AppSettings};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

/// In-memory cache of settings, persisted to disk on changes
pub struct SettingsStore {
    settings: RwLock<AppSettings>,
    file_path: PathBuf,
}

impl SettingsStore {
    /// Open the store at the default location
    pub fn new() -> Result<Self, AppError> {
        Self::open(Self::default_path()?)
    }

    /// Open the store backed by `file_path`, creating it with defaults if missing
    pub fn open(file_path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let file_path = file_path.into();
        tracing::info!("Settings file path: {:?}", file_path);

        let settings = if file_path.exists() {
            let content = fs::read_to_string(&file_path)
                .map_err(|e| AppError::FileIo(format!("Failed to read settings: {}", e)))?;

            serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse settings, using defaults: {}", e);
                AppSettings::default()
            })
        } else {
            tracing::info!("No settings file found, using defaults");
            AppSettings::default()
        };

        let store = Self {
            settings: RwLock::new(settings),
            file_path,
        };

        if !store.file_path.exists() {
            store.persist()?;
        }

        Ok(store)
    }

    pub fn default_path() -> Result<PathBuf, AppError> {
        let config_dir = directories::ProjectDirs::from("gn", "colis", "colis")
            .ok_or_else(|| AppError::FileIo("Could not determine config directory".to_string()))?
            .config_dir()
            .to_path_buf();

        Ok(config_dir.join("settings.json"))
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn persist(&self) -> Result<(), AppError> {
        if let Some(dir) = self.file_path.parent() {
            fs::create_dir_all(dir)
                .map_err(|e| AppError::FileIo(format!("Failed to create config dir: {}", e)))?;
        }

        let content = serde_json::to_string_pretty(&self.get())
            .map_err(|e| AppError::Serialization(format!("Failed to serialize settings: {}", e)))?;

        fs::write(&self.file_path, content)
            .map_err(|e| AppError::FileIo(format!("Failed to write settings: {}", e)))?;

        Ok(())
    }

    pub fn get(&self) -> AppSettings {
        self.settings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Validate, store and persist new settings
    pub fn update(&self, new_settings: AppSettings) -> Result<(), AppError> {
        new_settings.validate()?;
        tracing::info!("Updating settings, backend: {}", new_settings.api_base_url);
        *self
            .settings
            .write()
            .unwrap_or_else(PoisonError::into_inner) = new_settings;

        let result = self.persist();
        if let Err(e) = &result {
            tracing::error!("Failed to persist settings: {}", e);
        }
        result
    }

    pub fn set_api_base_url(&self, url: &str) -> Result<(), AppError> {
        let settings = AppSettings {
            api_base_url: url.trim().to_string(),
            ..self.get()
        };
        self.update(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::RangeKind;

    #[test]
    fn test_first_open_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let store = SettingsStore::open(&path).unwrap();
        assert!(path.exists());
        assert_eq!(store.get(), AppSettings::default());
    }

    #[test]
    fn test_update_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let store = SettingsStore::open(&path).unwrap();
        store.set_api_base_url(" https://api.colis.gn ").unwrap();
        store
            .update(AppSettings {
                default_range: RangeKind::Month,
                ..store.get()
            })
            .unwrap();

        let reopened = SettingsStore::open(&path).unwrap();
        assert_eq!(reopened.get().api_base_url, "https://api.colis.gn");
        assert_eq!(reopened.get().default_range, RangeKind::Month);
    }

    #[test]
    fn test_invalid_url_is_rejected_and_not_stored() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::open(dir.path().join("settings.json")).unwrap();

        assert!(matches!(
            store.set_api_base_url("ftp://example.com"),
            Err(AppError::InvalidConfig(_))
        ));
        assert_eq!(store.get().api_base_url, AppSettings::default().api_base_url);
    }

    #[test]
    fn test_unparsable_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();

        let store = SettingsStore::open(&path).unwrap();
        assert_eq!(store.get(), AppSettings::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "apiBaseUrl": "https://api.colis.gn" }"#).unwrap();

        let store = SettingsStore::open(&path).unwrap();
        let settings = store.get();
        assert_eq!(settings.api_base_url, "https://api.colis.gn");
        assert_eq!(settings.request_timeout_secs, 30);
        assert_eq!(settings.default_range, RangeKind::Day);
    }
}
