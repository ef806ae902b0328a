//! Video stream DTOs.

use serde::{Deserialize, Serialize};

use crate::enhance::EnhanceParams;

/// Which of the two published streams a client wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamKind {
    Raw,
    #[default]
    Enhanced,
}

impl StreamKind {
    /// Parse a query value. Anything other than `raw` selects the enhanced stream.
    pub fn from_query(value: &str) -> Self {
        if value == "raw" { Self::Raw } else { Self::Enhanced }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Enhanced => "enhanced",
        }
    }
}

/// Stream addresses for one camera.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoStreamUrl {
    pub camera_id: String,
    pub camera_name: String,
    pub camera_location: String,
    pub original_stream_url: String,
    pub enhanced_stream_url: String,
}

impl VideoStreamUrl {
    /// Build the frame URLs for `camera_id` under `base_url` (scheme + host).
    ///
    /// The id is percent-encoded in the query; `camera_id` itself stays as given.
    pub fn build(
        base_url: &str,
        camera_id: &str,
        camera_name: String,
        camera_location: String,
    ) -> Self {
        let encoded = urlencoding::encode(camera_id);
        let frame = |kind: StreamKind| {
            format!(
                "{base_url}/api/video/frame?camera_id={encoded}&type={}",
                kind.as_str()
            )
        };
        Self {
            camera_id: camera_id.to_string(),
            camera_name,
            camera_location,
            original_stream_url: frame(StreamKind::Raw),
            enhanced_stream_url: frame(StreamKind::Enhanced),
        }
    }
}

/// Enhancement status polled by the frontend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancementStatus {
    pub is_running: bool,
    pub camera_id: String,
    pub fps: f64,
    /// Current parameters; only present while the camera is running.
    pub params: Option<EnhanceParams>,
}

/// Round an FPS value to two decimals for display.
pub fn round_fps(fps: f64) -> f64 {
    (fps * 100.0).round() / 100.0
}
