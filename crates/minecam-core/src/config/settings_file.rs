//! JSON file implementation of the `SettingsRepository` trait.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::paths;
use crate::ports::{RepositoryError, SettingsRepository};
use crate::settings::SystemSettings;

use super::ConfigError;

/// Stores system settings as a pretty-printed JSON document.
///
/// A missing file reads as defaults.
pub struct JsonSettingsRepository {
    path: PathBuf,
}

impl JsonSettingsRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Repository backed by the resolved `system_settings.json`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(paths::settings_file()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl SettingsRepository for JsonSettingsRepository {
    async fn load(&self) -> Result<SystemSettings, RepositoryError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => serde_json::from_str(&text)
                .map_err(|e| RepositoryError::Serialization(e.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(SystemSettings::default()),
            Err(e) => Err(RepositoryError::Storage(e.to_string())),
        }
    }

    async fn save(&self, settings: &SystemSettings) -> Result<(), RepositoryError> {
        let json = serde_json::to_string_pretty(settings)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| RepositoryError::Storage(e.to_string()))?;
        }
        // Write beside the target and rename so readers never see half a file
        let staging = self.staging_path();
        tokio::fs::write(&staging, json)
            .await
            .map_err(|e| RepositoryError::Storage(e.to_string()))?;
        if let Err(e) = tokio::fs::rename(&staging, &self.path).await {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(RepositoryError::Storage(e.to_string()));
        }

        tracing::info!(path = %self.path.display(), "System settings saved");
        Ok(())
    }
}
