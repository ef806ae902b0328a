//! Path utilities for minecam configuration and data directories.
//!
//! This module provides the canonical path resolution for all components:
//! - Camera and settings configuration (`config/`)
//! - User records (`data/`)
//! - Per-camera LUT files (`lut/`)
//! - `.env` discovery
//!
//! # Design
//!
//! - Returns `PathBuf` and `PathError` for clear error handling
//! - Every directory can be overridden with an environment variable
//! - Run-mode detection is kept in `platform`

mod dirs;
mod env_file;
mod error;
mod platform;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Error type
pub use error::PathError;

// Run mode and roots
pub use platform::{RunMode, base_dir, exe_dir, project_root, run_mode};

// Configuration directories
pub use dirs::{config_dir, data_dir, lut_dir, settings_file};

// .env handling
pub use env_file::{check_env_file, default_env_candidates, load_env_files};
