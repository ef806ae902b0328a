//! Registry of per-camera stream processors.

use std::collections::HashMap;
use std::sync::Arc;

use minecam_core::{Camera, EnhanceParams, EnhanceParamsStore, EnhanceParamsUpdate, SettingsError};
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::processor::{SharedFrame, StreamSettings, VideoStreamProcessor};
use crate::logs::StreamLogEntry;

/// Owns every camera's processor and the shared enhancement parameters.
pub struct VideoStreamManager {
    processors: RwLock<HashMap<String, Arc<VideoStreamProcessor>>>,
    settings: StreamSettings,
    params: EnhanceParamsStore,
}

impl VideoStreamManager {
    pub fn new(settings: StreamSettings, params: EnhanceParamsStore) -> Self {
        info!("Video stream manager initialized");
        Self {
            processors: RwLock::new(HashMap::new()),
            settings,
            params,
        }
    }

    pub const fn params(&self) -> &EnhanceParamsStore {
        &self.params
    }

    pub const fn settings(&self) -> &StreamSettings {
        &self.settings
    }

    /// Start a processor for `camera`. Already registered ids are skipped.
    pub async fn register_camera(&self, camera: &Camera) {
        if self.processors.read().await.contains_key(&camera.camera_id) {
            warn!(camera_id = %camera.camera_id, "Camera already registered, skipping");
            return;
        }

        let processor = Arc::new(
            VideoStreamProcessor::start(
                &camera.camera_id,
                &camera.rtsp_url,
                camera.lut_path.as_deref(),
                &self.settings,
                self.params.clone(),
            )
            .await,
        );

        let duplicate = {
            let mut processors = self.processors.write().await;
            if processors.contains_key(&camera.camera_id) {
                true
            } else {
                processors.insert(camera.camera_id.clone(), Arc::clone(&processor));
                false
            }
        };

        if duplicate {
            warn!(camera_id = %camera.camera_id, "Camera registered concurrently, discarding");
            processor.stop().await;
        } else {
            info!(
                camera_id = %camera.camera_id,
                running = processor.is_running(),
                "Camera registered"
            );
        }
    }

    pub async fn get_processor(&self, camera_id: &str) -> Option<Arc<VideoStreamProcessor>> {
        self.processors.read().await.get(camera_id).cloned()
    }

    pub async fn original_frame(&self, camera_id: &str) -> SharedFrame {
        self.get_processor(camera_id)
            .await
            .and_then(|p| p.original_frame())
    }

    pub async fn enhanced_frame(&self, camera_id: &str) -> SharedFrame {
        self.get_processor(camera_id)
            .await
            .and_then(|p| p.enhanced_frame())
    }

    pub async fn is_running(&self, camera_id: &str) -> bool {
        self.get_processor(camera_id)
            .await
            .is_some_and(|p| p.is_running())
    }

    /// Current frame rate, 0.0 for unknown cameras.
    pub async fn fps(&self, camera_id: &str) -> f64 {
        self.get_processor(camera_id)
            .await
            .map_or(0.0, |p| p.fps())
    }

    /// Recent decoder output, `None` for unknown cameras.
    pub async fn logs(&self, camera_id: &str) -> Option<Vec<StreamLogEntry>> {
        self.get_processor(camera_id)
            .await
            .map(|p| p.logs().entries())
    }

    /// Apply a parameter update.
    ///
    /// Parameters are shared, so the update reaches every processor whether
    /// or not a camera is named.
    pub fn update_enhance_params(
        &self,
        camera_id: Option<&str>,
        update: &EnhanceParamsUpdate,
    ) -> Result<EnhanceParams, SettingsError> {
        let params = self.params.update(update).inspect_err(|e| {
            warn!(camera = camera_id.unwrap_or("all"), error = %e, "Rejected parameter update");
        })?;
        info!(
            camera = camera_id.unwrap_or("all"),
            lut_strength = params.lut_strength,
            gamma = params.effective_gamma(),
            clahe_clip_limit = params.clahe_clip_limit,
            "Enhancement parameters updated"
        );
        Ok(params)
    }

    /// Stop and unregister one camera.
    pub async fn stop_processor(&self, camera_id: &str) -> bool {
        let removed = self.processors.write().await.remove(camera_id);
        match removed {
            Some(processor) => {
                processor.stop().await;
                info!(camera_id, "Camera stopped");
                true
            }
            None => false,
        }
    }

    /// Stop and unregister every camera.
    pub async fn stop_all(&self) {
        let drained: Vec<_> = self.processors.write().await.drain().collect();
        for (_, processor) in drained {
            processor.stop().await;
        }
        info!("All cameras stopped");
    }

    /// Registered camera ids, sorted.
    pub async fn camera_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.processors.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> VideoStreamManager {
        VideoStreamManager::new(StreamSettings::default(), EnhanceParamsStore::new())
    }

    fn placeholder(id: &str) -> Camera {
        Camera::new(id, format!("rtsp://localhost:8554/{id}"))
    }

    #[tokio::test]
    async fn registers_offline_cameras_once() {
        let manager = manager();
        manager.register_camera(&placeholder("camera-1")).await;
        manager.register_camera(&placeholder("camera-1")).await;
        manager.register_camera(&placeholder("camera-2")).await;

        assert_eq!(manager.camera_ids().await, vec!["camera-1", "camera-2"]);
        assert!(manager.get_processor("camera-1").await.is_some());
        assert!(!manager.is_running("camera-1").await);
        assert!(manager.original_frame("camera-1").await.is_none());
        assert!(manager.logs("camera-1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_cameras_have_neutral_values() {
        let manager = manager();
        assert!(!manager.is_running("nope").await);
        assert!(manager.fps("nope").await.abs() < f64::EPSILON);
        assert!(manager.enhanced_frame("nope").await.is_none());
        assert!(manager.logs("nope").await.is_none());
        assert!(!manager.stop_processor("nope").await);
    }

    #[tokio::test]
    async fn params_update_is_shared() {
        let manager = manager();
        let update = EnhanceParamsUpdate {
            gamma: Some(1.4),
            ..EnhanceParamsUpdate::default()
        };
        let params = manager
            .update_enhance_params(Some("camera-1"), &update)
            .unwrap();
        assert_eq!(params.gamma, Some(1.4));
        assert_eq!(manager.params().get().gamma, Some(1.4));

        let rejected = EnhanceParamsUpdate {
            lut_strength: Some(f64::NAN),
            ..EnhanceParamsUpdate::default()
        };
        assert!(manager.update_enhance_params(None, &rejected).is_err());
        assert!((manager.params().get().lut_strength - 1.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn stop_removes_processors() {
        let manager = manager();
        manager.register_camera(&placeholder("camera-1")).await;
        manager.register_camera(&placeholder("camera-2")).await;

        assert!(manager.stop_processor("camera-1").await);
        assert_eq!(manager.camera_ids().await, vec!["camera-2"]);

        manager.stop_all().await;
        assert!(manager.camera_ids().await.is_empty());
    }
}
