//! Core domain types, configuration loading and port definitions for minecam.
//!
//! This crate has no knowledge of HTTP, ffmpeg or image processing. It owns:
//!
//! - [`domain`] - DTOs exchanged with the browser frontend
//! - [`enhance`] - live enhancement parameters and their shared store
//! - [`settings`] - the persisted system settings document and validation
//! - [`config`] - hot-reloaded camera, RTSP and user files
//! - [`paths`] - directory resolution and `.env` discovery
//! - [`ports`] / [`services`] - storage abstractions and the services over them

#![deny(unused_crate_dependencies)]

pub mod config;
pub mod domain;
pub mod enhance;
pub mod paths;
pub mod ports;
pub mod services;
pub mod settings;

// Re-export commonly used types for convenience
pub use config::{CameraCatalog, ConfigError, JsonSettingsRepository, UserStore};
pub use domain::{
    AccessToken, ApiResponse, Camera, CameraStatus, EnhancementStatus, PublicUser, StreamKind,
    User, UserRecord, VideoStreamUrl, round_fps,
};
pub use enhance::{EnhanceParams, EnhanceParamsStore, EnhanceParamsUpdate};
pub use ports::{CoreError, RepositoryError, SettingsRepository};
pub use services::SettingsService;
pub use settings::{EnhancementSettings, SettingsError, SystemSettings, validate_settings};

// Re-export path utilities
pub use paths::{
    PathError, RunMode, config_dir, data_dir, default_env_candidates, load_env_files, lut_dir,
    run_mode, settings_file,
};
