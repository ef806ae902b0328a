//! Path-related error types.
//!
//! Provides semantic errors for path operations without exposing
//! implementation details or adapter-specific concerns.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during path resolution and `.env` handling.
#[derive(Debug, Error)]
pub enum PathError {
    /// The running executable's location could not be determined.
    #[error("Cannot determine executable location: {0}")]
    NoExecutable(String),

    /// A `.env` file is not valid UTF-8.
    #[error(".env file {0} is not valid UTF-8")]
    EnvEncoding(PathBuf),

    /// A `.env` file contains lines without `=`.
    #[error(".env file {path} has malformed lines (missing '='): {lines:?}")]
    EnvSyntax { path: PathBuf, lines: Vec<usize> },

    /// Failed to read or load an `.env` file.
    #[error("Failed to access env file {path}: {reason}")]
    EnvFileError { path: PathBuf, reason: String },

    /// Failed to get the current working directory.
    #[error("Cannot determine current directory: {0}")]
    CurrentDirError(String),
}
