//! Saved login session and UI preferences.
//!
//! A small string key/value file: the token, the logged-in user, the
//! remembered username and a snapshot of the UI state (selected camera,
//! theme). Values are strings the way a browser's local storage holds
//! them; structured values are stored as JSON text.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use minecam_core::{AccessToken, PublicUser};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ClientError, ClientResult};

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const USER_INFO_KEY: &str = "user_info";
pub const REMEMBER_USER_KEY: &str = "remember_user";
pub const UI_STATE_KEY: &str = "minecam-store";

const SESSION_FILE: &str = "session.json";

/// Colour scheme of the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// Persisted part of the UI state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UiState {
    pub selected_camera: Option<String>,
    pub theme: Theme,
}

/// File-backed session store.
#[derive(Debug)]
pub struct SessionStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl SessionStore {
    /// `<config dir>/minecam/session.json`.
    pub fn default_path() -> ClientResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("minecam").join(SESSION_FILE))
            .ok_or(ClientError::NoSessionDir)
    }

    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> ClientResult<Self> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => BTreeMap::new(),
            Ok(text) => serde_json::from_str(&text)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), keys = entries.len(), "Opened session store");
        Ok(Self { path, entries })
    }

    /// Open the store at [`Self::default_path`].
    pub fn open_default() -> ClientResult<Self> {
        Self::open(Self::default_path()?)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get_item(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn set_item(&mut self, key: &str, value: impl Into<String>) -> ClientResult<()> {
        self.entries.insert(key.to_string(), value.into());
        self.persist()
    }

    pub fn remove_item(&mut self, key: &str) -> ClientResult<()> {
        if self.entries.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }

    fn persist(&self) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&self.entries)?)?;
        Ok(())
    }

    /// Store a successful login. With `remember` the username is kept for
    /// the next login prompt, otherwise any remembered name is forgotten.
    pub fn save_login(&mut self, login: &AccessToken, remember: bool) -> ClientResult<()> {
        self.entries
            .insert(ACCESS_TOKEN_KEY.to_string(), login.access_token.clone());
        self.entries.insert(
            USER_INFO_KEY.to_string(),
            serde_json::to_string(&login.user)?,
        );
        if remember {
            self.entries
                .insert(REMEMBER_USER_KEY.to_string(), login.user.username.clone());
        } else {
            self.entries.remove(REMEMBER_USER_KEY);
        }
        self.persist()
    }

    /// Forget the token and user. The remembered username and the UI
    /// snapshot survive a logout.
    pub fn clear(&mut self) -> ClientResult<()> {
        self.entries.remove(ACCESS_TOKEN_KEY);
        self.entries.remove(USER_INFO_KEY);
        self.persist()
    }

    pub fn access_token(&self) -> Option<&str> {
        self.get_item(ACCESS_TOKEN_KEY).filter(|t| !t.is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token().is_some()
    }

    /// Saved user info; unreadable JSON counts as none.
    pub fn user(&self) -> Option<PublicUser> {
        let raw = self.get_item(USER_INFO_KEY)?;
        match serde_json::from_str(raw) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable user info in session");
                None
            }
        }
    }

    pub fn remembered_user(&self) -> Option<&str> {
        self.get_item(REMEMBER_USER_KEY)
    }

    /// Saved UI state; defaults when absent or unreadable.
    pub fn ui_state(&self) -> UiState {
        self.get_item(UI_STATE_KEY)
            .and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or_default()
    }

    pub fn set_ui_state(&mut self, state: &UiState) -> ClientResult<()> {
        let raw = serde_json::to_string(state)?;
        self.set_item(UI_STATE_KEY, raw)
    }

    /// Remember `camera_id` as the selected camera.
    pub fn select_camera(&mut self, camera_id: &str) -> ClientResult<()> {
        let mut state = self.ui_state();
        state.selected_camera = Some(camera_id.to_string());
        self.set_ui_state(&state)
    }
}

/// Token of the saved session, or [`ClientError::NotLoggedIn`].
pub fn require_session(store: &SessionStore) -> ClientResult<&str> {
    store.access_token().ok_or(ClientError::NotLoggedIn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn login(username: &str) -> AccessToken {
        AccessToken::bearer(
            format!("token-of-{username}"),
            PublicUser {
                username: username.to_string(),
                full_name: None,
                email: None,
                role: "user".to_string(),
                is_active: true,
            },
        )
    }

    #[test]
    fn missing_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let store = SessionStore::open(temp.path().join("nested/session.json")).unwrap();
        assert!(!store.is_authenticated());
        assert!(store.user().is_none());
        assert_eq!(store.ui_state(), UiState::default());
        assert!(require_session(&store).is_err());
    }

    #[test]
    fn login_survives_reopen() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("session.json");
        let mut store = SessionStore::open(&path).unwrap();
        store.save_login(&login("operator"), true).unwrap();

        let reopened = SessionStore::open(&path).unwrap();
        assert_eq!(require_session(&reopened).unwrap(), "token-of-operator");
        assert_eq!(reopened.user().unwrap().username, "operator");
        assert_eq!(reopened.remembered_user(), Some("operator"));
    }

    #[test]
    fn logout_keeps_preferences() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("session.json");
        let mut store = SessionStore::open(&path).unwrap();
        store.save_login(&login("operator"), true).unwrap();
        store.select_camera("camera-2").unwrap();
        let dark = UiState {
            theme: Theme::Dark,
            ..store.ui_state()
        };
        store.set_ui_state(&dark).unwrap();

        store.clear().unwrap();
        let reopened = SessionStore::open(&path).unwrap();
        assert!(!reopened.is_authenticated());
        assert!(reopened.user().is_none());
        assert_eq!(reopened.remembered_user(), Some("operator"));
        assert_eq!(
            reopened.ui_state(),
            UiState {
                selected_camera: Some("camera-2".to_string()),
                theme: Theme::Dark,
            }
        );
    }

    #[test]
    fn login_without_remember_forgets_name() {
        let temp = TempDir::new().unwrap();
        let mut store = SessionStore::open(temp.path().join("s.json")).unwrap();
        store.save_login(&login("admin"), true).unwrap();
        store.save_login(&login("operator"), false).unwrap();
        assert!(store.remembered_user().is_none());
    }

    #[test]
    fn corrupt_values_fall_back() {
        let temp = TempDir::new().unwrap();
        let mut store = SessionStore::open(temp.path().join("s.json")).unwrap();
        store.set_item(USER_INFO_KEY, "{not json").unwrap();
        store.set_item(UI_STATE_KEY, "[]").unwrap();
        assert!(store.user().is_none());
        assert_eq!(store.ui_state(), UiState::default());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("s.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(
            SessionStore::open(&path),
            Err(ClientError::Serialization(_))
        ));
    }
}
