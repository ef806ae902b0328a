//! User records from `users.json`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::{ConfigError, USERS_FILE, read_json};
use crate::domain::UserRecord;
use crate::paths;

/// Read-only access to `users.json` (`{username: record}`).
#[derive(Debug, Clone)]
pub struct UserStore {
    path: PathBuf,
}

impl UserStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store backed by `<data_dir>/users.json`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(paths::data_dir()?.join(USERS_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load_all(&self) -> Result<HashMap<String, UserRecord>, ConfigError> {
        read_json(&self.path)
    }

    pub fn get(&self, username: &str) -> Result<Option<UserRecord>, ConfigError> {
        Ok(self.load_all()?.remove(username))
    }
}
