//! Operator-provided configuration files.
//!
//! These files are never bundled with the binary. They are re-read on every
//! call so edits take effect without a restart.

mod cameras;
mod settings_file;
mod users;

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::paths::PathError;

pub use cameras::{CameraCatalog, placeholder_rtsp_url};
pub use settings_file::JsonSettingsRepository;
pub use users::UserStore;

/// File names inside the configuration and data directories.
pub const CAMERA_INFO_FILE: &str = "camera_info.json";
pub const RTSP_FILE: &str = "rtsp.json";
pub const USERS_FILE: &str = "users.json";

/// Errors raised while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required file does not exist.
    #[error(
        "Required configuration file is missing: {0}. Provide it in the config/data directory next to the executable."
    )]
    Missing(PathBuf),

    /// A file exists but could not be read or parsed.
    #[error("Failed to read configuration file {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    /// The configuration directory could not be resolved.
    #[error(transparent)]
    Path(#[from] PathError),
}

/// Read and deserialize a JSON file, distinguishing "missing" from "broken".
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::Missing(path.to_path_buf()));
    }
    let text = fs::read_to_string(path).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    tracing::debug!(path = %path.display(), "Reading configuration file");
    serde_json::from_str(&text).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
