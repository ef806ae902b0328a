//! User domain types.

use serde::{Deserialize, Serialize};

/// Public user information (no credentials).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: i64,
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default)]
    pub disabled: bool,
}

fn default_role() -> String {
    "user".to_string()
}

impl User {
    /// Whether the user carries the `admin` role.
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

/// A user as stored in `users.json`, including the bcrypt hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(flatten)]
    pub user: User,
    pub hashed_password: String,
}

/// The user shape returned by `/api/token` and `/api/user/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub role: String,
    pub is_active: bool,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            role: user.role.clone(),
            is_active: !user.disabled,
        }
    }
}

/// Payload of a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
    pub user: PublicUser,
}

impl AccessToken {
    pub fn bearer(access_token: String, user: PublicUser) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
            user,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_parses_with_defaults() {
        let raw = r#"{"user_id": 7, "username": "ops", "hashed_password": "$2b$12$abc"}"#;
        let record: UserRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.user.role, "user");
        assert!(!record.user.disabled);
        assert_eq!(record.hashed_password, "$2b$12$abc");
    }

    #[test]
    fn public_user_inverts_disabled() {
        let user = User {
            user_id: 1,
            username: "admin".into(),
            full_name: None,
            email: None,
            role: "admin".into(),
            disabled: true,
        };
        let public = PublicUser::from(&user);
        assert!(!public.is_active);
        assert!(user.is_admin());
    }
}
