//! System settings domain types and validation.
//!
//! These are the settings shown on the frontend's settings page and stored
//! in `system_settings.json`. They are pure domain types; persistence lives
//! behind the [`SettingsRepository`](crate::ports::SettingsRepository) port.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Enhancement defaults shown on the settings page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnhancementSettings {
    /// LUT strength, 0.0 to 1.0.
    pub lut_strength: f64,
    /// Gamma, 0.1 to 3.0.
    pub gamma: f64,
    /// CLAHE contrast limit, 1.0 to 10.0.
    pub clahe_clip_limit: f64,
    pub clahe_tile_grid_size: Option<(u32, u32)>,
}

impl Default for EnhancementSettings {
    fn default() -> Self {
        Self {
            lut_strength: 0.8,
            gamma: 1.2,
            clahe_clip_limit: 2.0,
            clahe_tile_grid_size: Some((8, 8)),
        }
    }
}

/// Complete system settings document.
///
/// `video`, `system` and `notification` are free-form sections; only
/// `enhancement` is typed and validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemSettings {
    pub enhancement: EnhancementSettings,
    pub video: Option<Map<String, Value>>,
    pub system: Option<Map<String, Value>>,
    pub notification: Option<Map<String, Value>>,
}

fn section(value: Value) -> Option<Map<String, Value>> {
    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

impl Default for SystemSettings {
    fn default() -> Self {
        Self {
            enhancement: EnhancementSettings::default(),
            video: section(json!({
                "default_resolution": "1920x1080",
                "frame_rate": 30,
                "quality": "high",
            })),
            system: section(json!({
                "auto_start": false,
                "save_logs": true,
                "log_level": "info",
            })),
            notification: section(json!({
                "enable_email": false,
                "enable_sound": true,
            })),
        }
    }
}

impl SystemSettings {
    /// Merge a JSON patch into these settings and return the result.
    ///
    /// Object values are merged one level deep into existing object
    /// sections; every other value replaces the section outright. The merged
    /// document is re-parsed and validated.
    pub fn merged(&self, patch: &Map<String, Value>) -> Result<Self, SettingsError> {
        let mut current = match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            Ok(_) => return Err(SettingsError::Invalid("settings are not an object".into())),
            Err(e) => return Err(SettingsError::Invalid(e.to_string())),
        };

        for (key, value) in patch {
            match (current.get_mut(key), value) {
                (Some(Value::Object(existing)), Value::Object(incoming)) => {
                    for (k, v) in incoming {
                        existing.insert(k.clone(), v.clone());
                    }
                }
                _ => {
                    current.insert(key.clone(), value.clone());
                }
            }
        }

        let merged: Self = serde_json::from_value(Value::Object(current))
            .map_err(|e| SettingsError::Invalid(e.to_string()))?;
        validate_settings(&merged)?;
        Ok(merged)
    }
}

/// Settings validation error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SettingsError {
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Invalid settings document: {0}")]
    Invalid(String),
}

/// Accepted LUT strength, shared by the settings page and live updates.
pub const LUT_STRENGTH_RANGE: (f64, f64) = (0.0, 1.0);
/// Accepted gamma.
pub const GAMMA_RANGE: (f64, f64) = (0.1, 3.0);
/// Accepted CLAHE contrast limit.
pub const CLAHE_CLIP_LIMIT_RANGE: (f64, f64) = (1.0, 10.0);

/// Fails for values outside `[min, max]`, NaN included.
pub(crate) fn check_range(
    field: &'static str,
    value: f64,
    (min, max): (f64, f64),
) -> Result<(), SettingsError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(SettingsError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

/// Validate settings values.
pub fn validate_settings(settings: &SystemSettings) -> Result<(), SettingsError> {
    let e = &settings.enhancement;
    check_range("enhancement.lut_strength", e.lut_strength, LUT_STRENGTH_RANGE)?;
    check_range("enhancement.gamma", e.gamma, GAMMA_RANGE)?;
    check_range(
        "enhancement.clahe_clip_limit",
        e.clahe_clip_limit,
        CLAHE_CLIP_LIMIT_RANGE,
    )?;
    Ok(())
}
