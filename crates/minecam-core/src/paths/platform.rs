//! Run-mode detection and root directories.
//!
//! A binary built and run from inside the source tree resolves its
//! configuration relative to the project root; an installed binary resolves
//! it relative to its own directory.

use std::env;
use std::path::{Path, PathBuf};

use super::error::PathError;

/// How the current process was launched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Running from the source tree (e.g. `cargo run`).
    Source,
    /// Running as an installed or copied binary.
    Packaged,
}

impl RunMode {
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Source => "source tree (development)",
            Self::Packaged => "packaged binary",
        }
    }
}

/// Root of the workspace this crate was compiled from.
pub fn project_root() -> PathBuf {
    let manifest = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest
        .ancestors()
        .nth(2)
        .map_or_else(|| manifest.to_path_buf(), Path::to_path_buf)
}

/// Directory containing the running executable.
pub fn exe_dir() -> Result<PathBuf, PathError> {
    let exe = env::current_exe().map_err(|e| PathError::NoExecutable(e.to_string()))?;
    let exe = exe.canonicalize().unwrap_or(exe);
    exe.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| PathError::NoExecutable(exe.display().to_string()))
}

/// Detect whether the executable lives inside the source tree.
pub fn run_mode() -> RunMode {
    let Ok(exe) = exe_dir() else {
        return RunMode::Packaged;
    };
    let root = project_root();
    let root = root.canonicalize().unwrap_or(root);
    if root.join("Cargo.toml").exists() && exe.starts_with(&root) {
        RunMode::Source
    } else {
        RunMode::Packaged
    }
}

/// Base directory for `config/`, `data/` and `lut/`.
pub fn base_dir() -> Result<PathBuf, PathError> {
    match run_mode() {
        RunMode::Source => Ok(project_root()),
        RunMode::Packaged => exe_dir(),
    }
}

/// Resolve a directory from an env override, else `<base>/<name>`.
pub(super) fn resolve_dir(env_key: &str, name: &str) -> Result<PathBuf, PathError> {
    if let Ok(path) = env::var(env_key) {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }
    Ok(base_dir()?.join(name))
}
