//! Configuration, data and LUT directories.

use std::env;
use std::path::PathBuf;

use super::error::PathError;
use super::platform::resolve_dir;

/// Directory holding `camera_info.json`, `rtsp.json` and `system_settings.json`.
///
/// Resolution order:
/// 1. `MINECAM_CONFIG_DIR` environment variable
/// 2. `<base>/config`
pub fn config_dir() -> Result<PathBuf, PathError> {
    resolve_dir("MINECAM_CONFIG_DIR", "config")
}

/// Directory holding `users.json`.
///
/// Resolution order:
/// 1. `MINECAM_DATA_DIR` environment variable
/// 2. `<base>/data`
pub fn data_dir() -> Result<PathBuf, PathError> {
    resolve_dir("MINECAM_DATA_DIR", "data")
}

/// Directory holding per-camera `.npy` LUT files.
pub fn lut_dir() -> Result<PathBuf, PathError> {
    resolve_dir("MINECAM_LUT_DIR", "lut")
}

/// Location of the persisted system settings.
///
/// `MINECAM_SETTINGS_FILE` overrides `<config_dir>/system_settings.json`.
pub fn settings_file() -> Result<PathBuf, PathError> {
    if let Ok(path) = env::var("MINECAM_SETTINGS_FILE") {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }
    Ok(config_dir()?.join("system_settings.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::test_utils::{ENV_LOCK, EnvVarGuard};
    use tempfile::tempdir;

    #[test]
    fn env_overrides_win() {
        let _guard = ENV_LOCK.lock().unwrap();
        let temp = tempdir().unwrap();
        let cfg = temp.path().join("cfg");
        let _env = EnvVarGuard::set("MINECAM_CONFIG_DIR", cfg.to_string_lossy().as_ref());
        let _settings = EnvVarGuard::unset("MINECAM_SETTINGS_FILE");

        assert_eq!(config_dir().unwrap(), cfg);
        assert_eq!(settings_file().unwrap(), cfg.join("system_settings.json"));
    }

    #[test]
    fn settings_file_override() {
        let _guard = ENV_LOCK.lock().unwrap();
        let _env = EnvVarGuard::set("MINECAM_SETTINGS_FILE", "/tmp/minecam-settings.json");
        assert_eq!(
            settings_file().unwrap(),
            PathBuf::from("/tmp/minecam-settings.json")
        );
    }

    #[test]
    fn default_dirs_share_a_base() {
        let _guard = ENV_LOCK.lock().unwrap();
        let _a = EnvVarGuard::unset("MINECAM_CONFIG_DIR");
        let _b = EnvVarGuard::unset("MINECAM_DATA_DIR");
        let _c = EnvVarGuard::unset("MINECAM_LUT_DIR");

        let config = config_dir().unwrap();
        let data = data_dir().unwrap();
        let lut = lut_dir().unwrap();
        assert!(config.ends_with("config"));
        assert!(data.ends_with("data"));
        assert!(lut.ends_with("lut"));
        assert_eq!(config.parent(), data.parent());
        assert_eq!(data.parent(), lut.parent());
    }
}
