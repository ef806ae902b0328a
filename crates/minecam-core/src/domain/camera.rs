//! Camera domain types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Online state of a camera as reported to the frontend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraStatus {
    Online,
    Offline,
}

impl CameraStatus {
    /// Map a processor running flag to a status.
    #[must_use]
    pub const fn from_running(running: bool) -> Self {
        if running { Self::Online } else { Self::Offline }
    }
}

/// A registered camera.
///
/// Built by merging an entry of `camera_info.json` with its RTSP address
/// from `rtsp.json`. Fields the backend does not know about are preserved
/// in `extra` and written back out unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub camera_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Absolute path of the resolved LUT file, if the camera has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lut_path: Option<String>,

    /// RTSP source address. Empty until merged with `rtsp.json`.
    #[serde(default)]
    pub rtsp_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<CameraStatus>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Camera {
    /// Create a camera with only an id and RTSP address.
    pub fn new(camera_id: impl Into<String>, rtsp_url: impl Into<String>) -> Self {
        Self {
            camera_id: camera_id.into(),
            name: None,
            location: None,
            lut_path: None,
            rtsp_url: rtsp_url.into(),
            status: None,
            extra: Map::new(),
        }
    }

    /// Display name, falling back to `Camera <id>`.
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("Camera {}", self.camera_id))
    }

    /// Location, falling back to `Unknown location`.
    pub fn display_location(&self) -> String {
        self.location
            .clone()
            .unwrap_or_else(|| "Unknown location".to_string())
    }

    /// Return a copy annotated with the given status.
    #[must_use]
    pub fn with_status(mut self, status: CameraStatus) -> Self {
        self.status = Some(status);
        self
    }
}
