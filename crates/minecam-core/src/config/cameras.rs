//! Camera catalog built from `camera_info.json` and `rtsp.json`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::warn;

use super::{CAMERA_INFO_FILE, ConfigError, RTSP_FILE, read_json};
use crate::domain::Camera;
use crate::paths;

/// Address used for cameras that have no entry in `rtsp.json`.
pub fn placeholder_rtsp_url(camera_id: &str) -> String {
    format!("rtsp://localhost:8554/{camera_id}")
}

/// Reads camera definitions from the configuration directory.
///
/// Nothing is cached: every call goes back to disk.
#[derive(Debug, Clone)]
pub struct CameraCatalog {
    config_dir: PathBuf,
    lut_dir: PathBuf,
}

impl CameraCatalog {
    pub fn new(config_dir: impl Into<PathBuf>, lut_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
            lut_dir: lut_dir.into(),
        }
    }

    /// Catalog rooted at the resolved `config/` and `lut/` directories.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(paths::config_dir()?, paths::lut_dir()?))
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Raw `camera_id -> rtsp_url` map from `rtsp.json`.
    pub fn rtsp_map(&self) -> Result<HashMap<String, String>, ConfigError> {
        read_json(&self.config_dir.join(RTSP_FILE))
    }

    /// Camera entries from `camera_info.json`, as written.
    pub fn camera_info(&self) -> Result<Vec<Camera>, ConfigError> {
        read_json(&self.config_dir.join(CAMERA_INFO_FILE))
    }

    /// All cameras with RTSP addresses and LUT paths resolved.
    pub fn cameras(&self) -> Result<Vec<Camera>, ConfigError> {
        let info = self.camera_info()?;
        let rtsp = self.rtsp_map()?;

        Ok(info
            .into_iter()
            .map(|mut camera| {
                camera.rtsp_url = rtsp.get(&camera.camera_id).cloned().unwrap_or_else(|| {
                    warn!(
                        camera_id = %camera.camera_id,
                        "rtsp.json has no entry for camera, using placeholder address"
                    );
                    placeholder_rtsp_url(&camera.camera_id)
                });
                camera.lut_path = camera
                    .lut_path
                    .as_deref()
                    .filter(|p| !p.is_empty())
                    .and_then(|p| self.resolve_lut(p));
                camera
            })
            .collect())
    }

    /// Like [`cameras`](Self::cameras), but logs failures and yields nothing.
    pub fn cameras_or_empty(&self) -> Vec<Camera> {
        self.cameras().unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load camera configuration");
            Vec::new()
        })
    }

    /// Look up a single camera by id.
    pub fn find(&self, camera_id: &str) -> Result<Option<Camera>, ConfigError> {
        Ok(self
            .cameras()?
            .into_iter()
            .find(|c| c.camera_id == camera_id))
    }

    /// Only the file name of a configured LUT path is kept; it is looked up
    /// in the LUT directory.
    fn resolve_lut(&self, configured: &str) -> Option<String> {
        let file_name = Path::new(configured).file_name()?;
        let resolved = self.lut_dir.join(file_name);
        if !resolved.exists() {
            warn!(path = %resolved.display(), "LUT file not found");
        }
        Some(resolved.to_string_lossy().into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(dir: &Path, info: &str, rtsp: &str) {
        fs::write(dir.join(CAMERA_INFO_FILE), info).unwrap();
        fs::write(dir.join(RTSP_FILE), rtsp).unwrap();
    }

    #[test]
    fn merges_rtsp_and_resolves_lut() {
        let temp = TempDir::new().unwrap();
        write_config(
            temp.path(),
            r#"[
                {"camera_id": "camera-1", "name": "Face 1", "location": "North", "lut_path": "some/where/mapping_lut_1.npy"},
                {"camera_id": "camera-2", "zone": 7}
            ]"#,
            r#"{"camera-1": "rtsp://10.0.0.5:554/stream1"}"#,
        );
        let catalog = CameraCatalog::new(temp.path(), temp.path().join("lut"));

        let cameras = catalog.cameras().unwrap();
        assert_eq!(cameras.len(), 2);

        assert_eq!(cameras[0].rtsp_url, "rtsp://10.0.0.5:554/stream1");
        assert_eq!(
            cameras[0].lut_path.as_deref(),
            Some(
                temp.path()
                    .join("lut")
                    .join("mapping_lut_1.npy")
                    .to_string_lossy()
                    .as_ref()
            )
        );

        assert_eq!(cameras[1].rtsp_url, "rtsp://localhost:8554/camera-2");
        assert_eq!(cameras[1].extra.get("zone"), Some(&serde_json::json!(7)));
        assert!(cameras[1].lut_path.is_none());
    }

    #[test]
    fn rereads_on_every_call() {
        let temp = TempDir::new().unwrap();
        write_config(temp.path(), r#"[{"camera_id": "camera-1"}]"#, "{}");
        let catalog = CameraCatalog::new(temp.path(), temp.path());
        assert_eq!(catalog.cameras().unwrap().len(), 1);

        write_config(
            temp.path(),
            r#"[{"camera_id": "camera-1"}, {"camera_id": "camera-2"}]"#,
            "{}",
        );
        assert_eq!(catalog.cameras().unwrap().len(), 2);
        assert!(catalog.find("camera-2").unwrap().is_some());
        assert!(catalog.find("camera-9").unwrap().is_none());
    }

    #[test]
    fn missing_and_malformed_files() {
        let temp = TempDir::new().unwrap();
        let catalog = CameraCatalog::new(temp.path(), temp.path());
        assert!(matches!(catalog.cameras(), Err(ConfigError::Missing(_))));
        assert!(catalog.cameras_or_empty().is_empty());

        write_config(temp.path(), "not json", "{}");
        assert!(matches!(catalog.cameras(), Err(ConfigError::Parse { .. })));
        assert!(catalog.cameras_or_empty().is_empty());
    }
}
