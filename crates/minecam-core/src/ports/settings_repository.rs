//! Settings repository trait definition.
//!
//! This port defines the interface for system settings persistence.
//! Implementations handle all storage details internally.

use async_trait::async_trait;

use super::RepositoryError;
use crate::settings::SystemSettings;

/// Repository for system settings persistence.
///
/// This trait defines operations for storing and retrieving the settings
/// document as a whole. The implementation handles serialization.
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Load system settings.
    ///
    /// Returns default settings if none are stored.
    async fn load(&self) -> Result<SystemSettings, RepositoryError>;

    /// Save system settings.
    async fn save(&self, settings: &SystemSettings) -> Result<(), RepositoryError>;
}
