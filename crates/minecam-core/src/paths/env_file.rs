//! `.env` discovery and loading.
//!
//! Candidates are checked in order and the first one that exists and is
//! well-formed is loaded. Malformed files are reported and skipped so a
//! broken file next to the binary does not shadow a good one in the
//! project root.

use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::error::PathError;
use super::platform::{RunMode, exe_dir, project_root, run_mode};

/// Default `.env` candidates, most specific first.
///
/// 1. Next to the executable (packaged runs only)
/// 2. The project root
/// 3. The current working directory
pub fn default_env_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if run_mode() == RunMode::Packaged {
        if let Ok(dir) = exe_dir() {
            candidates.push(dir.join(".env"));
        }
    }
    candidates.push(project_root().join(".env"));
    if let Ok(cwd) = env::current_dir() {
        candidates.push(cwd.join(".env"));
    }
    candidates
}

/// Check a `.env` file for encoding and syntax problems.
///
/// Blank lines and `#` comments are allowed; every other line must
/// contain `=`.
pub fn check_env_file(path: &Path) -> Result<(), PathError> {
    let bytes = fs::read(path).map_err(|e| PathError::EnvFileError {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let text = String::from_utf8(bytes).map_err(|_| PathError::EnvEncoding(path.to_path_buf()))?;

    let invalid: Vec<usize> = text
        .lines()
        .enumerate()
        .filter_map(|(idx, line)| {
            let trimmed = line.trim();
            let ok = trimmed.is_empty() || trimmed.starts_with('#') || trimmed.contains('=');
            (!ok).then_some(idx + 1)
        })
        .collect();

    if invalid.is_empty() {
        Ok(())
    } else {
        Err(PathError::EnvSyntax {
            path: path.to_path_buf(),
            lines: invalid,
        })
    }
}

/// Load the first valid `.env` among `candidates`.
///
/// Returns the path that was loaded, or `None` when no candidate exists or
/// all existing ones were rejected. Variables already present in the
/// process environment are not overridden.
pub fn load_env_files(candidates: &[PathBuf]) -> Option<PathBuf> {
    let mut seen = HashSet::new();

    for candidate in candidates {
        let resolved = candidate
            .canonicalize()
            .unwrap_or_else(|_| candidate.clone());
        if !seen.insert(resolved.clone()) || !resolved.is_file() {
            continue;
        }

        if let Err(e) = check_env_file(&resolved) {
            warn!(path = %resolved.display(), error = %e, "Skipping .env file");
            continue;
        }

        match dotenvy::from_path(&resolved) {
            Ok(()) => {
                info!(path = %resolved.display(), "Loaded .env file");
                return Some(resolved);
            }
            Err(e) => {
                warn!(path = %resolved.display(), error = %e, "Failed to load .env file");
            }
        }
    }

    warn!("No .env file found, using process environment and defaults");
    None
}
