//! Password verification, JWT issuing and the authentication extractors.
//!
//! Tokens are HS256 JWTs carrying the username (`sub`), the numeric user id
//! and an expiry. Users are looked up in `users.json` on every request, so
//! a user removed from the file is rejected even with a valid token.

use std::time::Duration;

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use minecam_core::{ConfigError, User, UserStore};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::error::HttpError;
use crate::state::AppState;

/// Default token lifetime.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(30 * 60);

/// Secret used when `SECRET_KEY` is not set. Never fit for production.
pub const DEVELOPMENT_SECRET: &str = "minecam-development-secret-change-in-production";

/// Authentication failures.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Incorrect username or password")]
    InvalidCredentials,

    #[error("Not authenticated")]
    MissingToken,

    #[error("Could not validate credentials")]
    InvalidToken,

    #[error("User not found")]
    UserNotFound,

    #[error("Inactive user")]
    Inactive,

    #[error("Admin privileges required")]
    NotAdmin,

    #[error(transparent)]
    Users(#[from] ConfigError),

    #[error("Password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("Token encoding failed: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

/// JWT payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Username.
    pub sub: String,
    pub user_id: i64,
    /// Expiry as a Unix timestamp in seconds.
    pub exp: u64,
}

/// Signing keys and token lifetime.
#[derive(Clone)]
pub struct JwtConfig {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtConfig {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Use `secret`, or the development secret with a warning when unset.
    pub fn from_secret(secret: Option<&str>, ttl: Duration) -> Self {
        match secret.filter(|s| !s.is_empty()) {
            Some(secret) => Self::new(secret, ttl),
            None => {
                warn!("SECRET_KEY is not set, signing tokens with the development secret");
                Self::new(DEVELOPMENT_SECRET, ttl)
            }
        }
    }

    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `user`.
    pub fn issue(&self, user: &User) -> Result<String, AuthError> {
        let exp = chrono::Utc::now().timestamp().max(0) as u64 + self.ttl.as_secs();
        let claims = Claims {
            sub: user.username.clone(),
            user_id: user.user_id,
            exp,
        };
        Ok(jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.encoding,
        )?)
    }

    /// Verify signature and expiry and return the claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let validation = Validation::new(Algorithm::HS256);
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(error = %e, "Rejected access token");
                AuthError::InvalidToken
            })
    }
}

/// Hash a password with the default bcrypt cost.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    Ok(bcrypt::hash(password, bcrypt::DEFAULT_COST)?)
}

/// Check `password` against a bcrypt hash. Malformed hashes never match.
pub fn verify_password(password: &str, hashed: &str) -> bool {
    bcrypt::verify(password, hashed).unwrap_or_else(|e| {
        warn!(error = %e, "Stored password hash is malformed");
        false
    })
}

/// Look up `username` and check its password.
///
/// Unknown users and wrong passwords are indistinguishable to the caller.
pub fn authenticate(users: &UserStore, username: &str, password: &str) -> Result<User, AuthError> {
    let record = users.get(username)?.ok_or(AuthError::InvalidCredentials)?;
    if verify_password(password, &record.hashed_password) {
        Ok(record.user)
    } else {
        Err(AuthError::InvalidCredentials)
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// The user named by a valid Bearer token.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AuthError::MissingToken)?;
        let claims = state.jwt.verify(token)?;
        let record = state
            .users
            .get(&claims.sub)
            .map_err(AuthError::from)?
            .ok_or(AuthError::UserNotFound)?;
        Ok(Self(record.user))
    }
}

/// A [`CurrentUser`] that is not disabled.
#[derive(Debug, Clone)]
pub struct ActiveUser(pub User);

impl FromRequestParts<AppState> for ActiveUser {
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        if user.disabled {
            return Err(AuthError::Inactive.into());
        }
        Ok(Self(user))
    }
}

/// An [`ActiveUser`] with the `admin` role.
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let ActiveUser(user) = ActiveUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            return Err(AuthError::NotAdmin.into());
        }
        Ok(Self(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn user() -> User {
        User {
            user_id: 3,
            username: "operator".into(),
            full_name: None,
            email: None,
            role: "user".into(),
            disabled: false,
        }
    }

    #[test]
    fn issued_tokens_verify() {
        let jwt = JwtConfig::new("secret", DEFAULT_TOKEN_TTL);
        let token = jwt.issue(&user()).unwrap();
        let claims = jwt.verify(&token).unwrap();
        assert_eq!(claims.sub, "operator");
        assert_eq!(claims.user_id, 3);
    }

    #[test]
    fn tokens_from_another_secret_are_rejected() {
        let token = JwtConfig::new("one", DEFAULT_TOKEN_TTL)
            .issue(&user())
            .unwrap();
        let err = JwtConfig::new("two", DEFAULT_TOKEN_TTL)
            .verify(&token)
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let jwt = JwtConfig::new("secret", DEFAULT_TOKEN_TTL);
        let claims = Claims {
            sub: "operator".into(),
            user_id: 3,
            exp: 1_000,
        };
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();
        assert!(matches!(jwt.verify(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn password_hashes_verify() {
        let hashed = bcrypt::hash("hunter2", 4).unwrap();
        assert!(verify_password("hunter2", &hashed));
        assert!(!verify_password("hunter3", &hashed));
        assert!(!verify_password("hunter2", "not-a-hash"));
    }

    #[test]
    fn bearer_header_parsing() {
        let parse = |value: &str| {
            let (parts, ()) = Request::builder()
                .header(header::AUTHORIZATION, value)
                .body(())
                .unwrap()
                .into_parts();
            bearer_token(&parts).map(str::to_string)
        };
        assert_eq!(parse("Bearer abc").as_deref(), Some("abc"));
        assert_eq!(parse("bearer abc").as_deref(), Some("abc"));
        assert_eq!(parse("Basic abc"), None);
        assert_eq!(parse("Bearer "), None);
    }
}
