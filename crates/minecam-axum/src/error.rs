//! Axum-specific error types and mappings.
//!
//! Maps [`CoreError`], [`ConfigError`] and [`AuthError`] to HTTP status
//! codes. Every error body is `{"detail": <message>, "status": <code>}`;
//! `detail` is the field the frontend shows to the user.

use axum::extract::rejection::{FormRejection, JsonRejection, QueryRejection};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use minecam_core::{ConfigError, CoreError, RepositoryError, SettingsError};
use serde::Serialize;
use thiserror::Error;

use crate::auth::AuthError;

/// Axum-specific error type.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request (invalid input).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Missing or invalid credentials. Carries `WWW-Authenticate: Bearer`.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated but not allowed.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Well-formed request whose values fail validation.
    #[error("Unprocessable: {0}")]
    Unprocessable(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl HttpError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Map an extractor rejection, keeping 422 for well-formed bodies with
    /// the wrong shape and 400 for everything else.
    fn rejected(status: StatusCode, detail: String) -> Self {
        if status == StatusCode::UNPROCESSABLE_ENTITY {
            Self::Unprocessable(detail)
        } else {
            Self::BadRequest(detail)
        }
    }

    fn detail(&self) -> &str {
        match self {
            Self::NotFound(msg)
            | Self::BadRequest(msg)
            | Self::Unauthorized(msg)
            | Self::Forbidden(msg)
            | Self::Unprocessable(msg)
            | Self::Internal(msg) => msg,
        }
    }
}

/// JSON error response body.
#[derive(Serialize)]
pub(crate) struct ErrorBody<'a> {
    pub detail: &'a str,
    pub status: u16,
}

/// Build a `{"detail", "status"}` response outside of [`HttpError`].
pub(crate) fn detail_response(status: StatusCode, detail: &str) -> Response {
    let body = ErrorBody {
        detail,
        status: status.as_u16(),
    };
    (status, axum::Json(body)).into_response()
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Request failed");
        }

        let mut response = detail_response(status, self.detail());
        if matches!(self, Self::Unauthorized(_)) {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

impl From<CoreError> for HttpError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Repository(repo_err) => repo_err.into(),
            CoreError::Settings(settings_err) => settings_err.into(),
            CoreError::Config(config_err) => config_err.into(),
        }
    }
}

impl From<RepositoryError> for HttpError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Storage(msg) => Self::Internal(format!("Storage: {msg}")),
            RepositoryError::Serialization(msg) => Self::Internal(format!("Serialization: {msg}")),
        }
    }
}

impl From<SettingsError> for HttpError {
    fn from(err: SettingsError) -> Self {
        Self::Unprocessable(err.to_string())
    }
}

impl From<JsonRejection> for HttpError {
    fn from(rejection: JsonRejection) -> Self {
        Self::rejected(rejection.status(), rejection.body_text())
    }
}

impl From<FormRejection> for HttpError {
    fn from(rejection: FormRejection) -> Self {
        Self::rejected(rejection.status(), rejection.body_text())
    }
}

impl From<QueryRejection> for HttpError {
    fn from(rejection: QueryRejection) -> Self {
        Self::rejected(rejection.status(), rejection.body_text())
    }
}

impl From<ConfigError> for HttpError {
    fn from(err: ConfigError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<AuthError> for HttpError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials | AuthError::MissingToken | AuthError::InvalidToken => {
                Self::Unauthorized(err.to_string())
            }
            AuthError::UserNotFound => Self::NotFound(err.to_string()),
            AuthError::Inactive => Self::BadRequest(err.to_string()),
            AuthError::NotAdmin => Self::Forbidden(err.to_string()),
            AuthError::Users(config_err) => config_err.into(),
            AuthError::Hash(_) | AuthError::Token(_) => Self::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minecam_core::SettingsError;

    #[test]
    fn unauthorized_carries_bearer_challenge() {
        let response = HttpError::Unauthorized("nope".into()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "Bearer");
    }

    #[test]
    fn settings_errors_are_unprocessable() {
        let err = CoreError::Settings(SettingsError::OutOfRange {
            field: "enhancement.gamma",
            value: 9.0,
            min: 0.1,
            max: 3.0,
        });
        assert_eq!(HttpError::from(err).status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn repository_failures_are_internal() {
        let err = CoreError::Repository(RepositoryError::Storage("disk full".into()));
        let http = HttpError::from(err);
        assert_eq!(http.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(http.detail(), "Storage: disk full");
    }

    #[test]
    fn auth_errors_map_to_statuses() {
        assert_eq!(
            HttpError::from(AuthError::UserNotFound).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            HttpError::from(AuthError::Inactive).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            HttpError::from(AuthError::NotAdmin).status(),
            StatusCode::FORBIDDEN
        );
    }
}
