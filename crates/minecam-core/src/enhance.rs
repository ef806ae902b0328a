//! Live enhancement parameters.
//!
//! One parameter set is shared by every camera. Handlers update it, frame
//! processors read a snapshot of it for every frame they enhance, so updates
//! take effect on the next processed frame without restarting anything.

use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use crate::settings::{
    CLAHE_CLIP_LIMIT_RANGE, GAMMA_RANGE, LUT_STRENGTH_RANGE, SettingsError, check_range,
};

/// Enhancement parameters applied to every processed frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnhanceParams {
    pub lut_enabled: bool,
    pub lut_strength: f64,
    pub lut_gamma: f64,
    pub lut_brightness: i32,
    pub lut_contrast: f64,
    pub clahe_enabled: bool,
    pub clahe_clip_limit: f64,
    pub clahe_tile_grid_size: (u32, u32),
    pub defogging_enabled: bool,
    pub defogging_strength: f64,
    /// Output gamma. Unset means no gamma correction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gamma: Option<f64>,
}

impl Default for EnhanceParams {
    fn default() -> Self {
        Self {
            lut_enabled: true,
            lut_strength: 1.0,
            lut_gamma: 0.85,
            lut_brightness: 20,
            lut_contrast: 1.2,
            clahe_enabled: true,
            clahe_clip_limit: 1.8,
            clahe_tile_grid_size: (16, 16),
            defogging_enabled: false,
            defogging_strength: 0.0,
            gamma: None,
        }
    }
}

impl EnhanceParams {
    /// Gamma actually applied (1.0 when unset).
    pub fn effective_gamma(&self) -> f64 {
        self.gamma.unwrap_or(1.0)
    }

    /// Apply a partial update; absent fields are left alone.
    pub fn apply(&mut self, update: &EnhanceParamsUpdate) {
        if let Some(strength) = update.lut_strength {
            self.lut_strength = strength;
        }
        if let Some(gamma) = update.gamma {
            self.gamma = Some(gamma);
        }
        if let Some(clip) = update.clahe_clip_limit {
            self.clahe_clip_limit = clip;
        }
    }
}

/// Partial parameter update accepted by the HTTP API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EnhanceParamsUpdate {
    #[serde(default)]
    pub lut_strength: Option<f64>,
    #[serde(default)]
    pub gamma: Option<f64>,
    #[serde(default)]
    pub clahe_clip_limit: Option<f64>,
}

impl EnhanceParamsUpdate {
    /// True when no field is set.
    pub const fn is_empty(&self) -> bool {
        self.lut_strength.is_none() && self.gamma.is_none() && self.clahe_clip_limit.is_none()
    }

    /// Reject values outside the settings-page ranges, NaN and infinities included.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if let Some(strength) = self.lut_strength {
            check_range("lut_strength", strength, LUT_STRENGTH_RANGE)?;
        }
        if let Some(gamma) = self.gamma {
            check_range("gamma", gamma, GAMMA_RANGE)?;
        }
        if let Some(clip) = self.clahe_clip_limit {
            check_range("clahe_clip_limit", clip, CLAHE_CLIP_LIMIT_RANGE)?;
        }
        Ok(())
    }
}

/// Shared, thread-safe holder of the current parameters.
///
/// Cloning the store clones the handle, not the parameters.
#[derive(Debug, Clone, Default)]
pub struct EnhanceParamsStore {
    inner: Arc<RwLock<EnhanceParams>>,
}

impl EnhanceParamsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current parameters.
    pub fn get(&self) -> EnhanceParams {
        self.inner
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Apply a partial update and return the resulting parameters.
    ///
    /// An invalid update is rejected as a whole and nothing changes.
    pub fn update(&self, update: &EnhanceParamsUpdate) -> Result<EnhanceParams, SettingsError> {
        update.validate()?;
        let mut guard = self
            .inner
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        guard.apply(update);
        Ok(guard.clone())
    }

    /// Restore defaults and return them.
    pub fn reset(&self) -> EnhanceParams {
        let mut guard = self
            .inner
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *guard = EnhanceParams::default();
        guard.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_omit_gamma() {
        let json = serde_json::to_value(EnhanceParams::default()).unwrap();
        assert!(json.get("gamma").is_none());
        assert_eq!(json["clahe_tile_grid_size"], serde_json::json!([16, 16]));
        assert!((EnhanceParams::default().effective_gamma() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn partial_update_touches_only_given_fields() {
        let store = EnhanceParamsStore::new();
        let updated = store
            .update(&EnhanceParamsUpdate {
                gamma: Some(1.4),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(updated.gamma, Some(1.4));
        assert!((updated.lut_strength - 1.0).abs() < f64::EPSILON);
        assert!((updated.clahe_clip_limit - 1.8).abs() < f64::EPSILON);
    }

    #[test]
    fn clones_share_state_and_reset_restores_defaults() {
        let store = EnhanceParamsStore::new();
        let other = store.clone();
        other
            .update(&EnhanceParamsUpdate {
                lut_strength: Some(0.3),
                ..Default::default()
            })
            .unwrap();
        assert!((store.get().lut_strength - 0.3).abs() < f64::EPSILON);

        assert_eq!(store.reset(), EnhanceParams::default());
        assert_eq!(other.get(), EnhanceParams::default());
    }

    #[test]
    fn empty_update() {
        assert!(EnhanceParamsUpdate::default().is_empty());
        assert!(
            !EnhanceParamsUpdate {
                clahe_clip_limit: Some(3.0),
                ..Default::default()
            }
            .is_empty()
        );
    }

    #[test]
    fn non_finite_and_out_of_range_updates_are_rejected() {
        let store = EnhanceParamsStore::new();
        for update in [
            EnhanceParamsUpdate {
                lut_strength: Some(f64::NAN),
                ..Default::default()
            },
            EnhanceParamsUpdate {
                gamma: Some(f64::INFINITY),
                ..Default::default()
            },
            EnhanceParamsUpdate {
                lut_strength: Some(0.5),
                clahe_clip_limit: Some(42.0),
                ..Default::default()
            },
        ] {
            assert!(store.update(&update).is_err());
        }
        // Nothing from the rejected updates stuck
        assert_eq!(store.get(), EnhanceParams::default());

        let err = store
            .update(&EnhanceParamsUpdate {
                gamma: Some(0.0),
                ..Default::default()
            })
            .unwrap_err();
        assert!(err.to_string().starts_with("gamma must be between 0.1 and 3"));
        assert!(serde_json::to_value(store.get()).unwrap()["lut_strength"].is_number());
    }
}
