//! Settings service - orchestrates settings operations.

use crate::ports::{CoreError, SettingsRepository};
use crate::settings::SystemSettings;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Service for settings operations.
pub struct SettingsService {
    repo: Arc<dyn SettingsRepository>,
}

impl SettingsService {
    /// Create a new settings service.
    pub fn new(repo: Arc<dyn SettingsRepository>) -> Self {
        Self { repo }
    }

    /// Get current settings.
    pub async fn get(&self) -> Result<SystemSettings, CoreError> {
        self.repo.load().await.map_err(CoreError::from)
    }

    /// Merge a JSON patch into the stored settings and persist the result.
    pub async fn update(&self, patch: &Map<String, Value>) -> Result<SystemSettings, CoreError> {
        let current = self.repo.load().await?;
        let updated = current.merged(patch)?;
        self.repo.save(&updated).await?;
        Ok(updated)
    }

    /// Overwrite the stored settings with defaults.
    pub async fn reset(&self) -> Result<SystemSettings, CoreError> {
        let defaults = SystemSettings::default();
        self.repo.save(&defaults).await?;
        Ok(defaults)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::RepositoryError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    struct MockSettingsRepo {
        settings: Mutex<SystemSettings>,
        saves: Mutex<usize>,
    }

    impl MockSettingsRepo {
        fn new() -> Self {
            Self {
                settings: Mutex::new(SystemSettings::default()),
                saves: Mutex::new(0),
            }
        }
    }

    #[async_trait]
    impl SettingsRepository for MockSettingsRepo {
        async fn load(&self) -> Result<SystemSettings, RepositoryError> {
            Ok(self.settings.lock().unwrap().clone())
        }

        async fn save(&self, settings: &SystemSettings) -> Result<(), RepositoryError> {
            *self.settings.lock().unwrap() = settings.clone();
            *self.saves.lock().unwrap() += 1;
            Ok(())
        }
    }

    fn as_map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[tokio::test]
    async fn test_get_default_settings() {
        let repo = Arc::new(MockSettingsRepo::new());
        let service = SettingsService::new(repo);

        let settings = service.get().await.unwrap();
        assert!((settings.enhancement.gamma - 1.2).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_update_settings() {
        let repo = Arc::new(MockSettingsRepo::new());
        let service = SettingsService::new(repo.clone());

        let patch = as_map(json!({"system": {"log_level": "debug"}}));
        let updated = service.update(&patch).await.unwrap();
        assert_eq!(updated.system.as_ref().unwrap()["log_level"], "debug");

        // Verify persisted
        let fetched = service.get().await.unwrap();
        assert_eq!(fetched, updated);
        assert_eq!(*repo.saves.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_invalid_update_is_not_saved() {
        let repo = Arc::new(MockSettingsRepo::new());
        let service = SettingsService::new(repo.clone());

        let patch = as_map(json!({"enhancement": {"gamma": 9.0}}));
        let err = service.update(&patch).await.unwrap_err();
        assert!(matches!(err, CoreError::Settings(_)));
        assert_eq!(*repo.saves.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_reset_writes_defaults() {
        let repo = Arc::new(MockSettingsRepo::new());
        let service = SettingsService::new(repo.clone());

        service
            .update(&as_map(json!({"video": {"quality": "low"}})))
            .await
            .unwrap();
        let reset = service.reset().await.unwrap();
        assert_eq!(reset, SystemSettings::default());
        assert_eq!(service.get().await.unwrap(), SystemSettings::default());
    }
}
