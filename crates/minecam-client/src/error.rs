//! Client error type and the status code to message mapping.
//!
//! Every failed call surfaces a message fit for showing to the user. The
//! backend's own `detail` is kept alongside for logging and for status
//! codes without a fixed message.

use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors returned by [`crate::ApiClient`] and [`crate::SessionStore`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// The backend answered with a non-success status.
    #[error("{message}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Human-readable message derived from the status
        message: String,
        /// `detail` field of the error body, when present
        detail: Option<String>,
    },

    /// Connection, timeout or body decoding failure.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server address cannot carry an API path.
    #[error("Invalid server address: {0}")]
    InvalidUrl(String),

    /// A command needs a saved session and there is none.
    #[error("Not logged in")]
    NotLoggedIn,

    /// The session file could not be read or written.
    #[error("Session storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// The session file or a stored value is not valid JSON.
    #[error("Invalid session data: {0}")]
    Serialization(#[from] serde_json::Error),

    /// No per-user configuration directory on this platform.
    #[error("Cannot determine a location for the session file")]
    NoSessionDir,
}

impl ClientError {
    /// Build an HTTP error from a status code and the backend's `detail`.
    pub fn from_status(status: u16, detail: Option<String>) -> Self {
        Self::Http {
            status,
            message: status_message(status, detail.as_deref()),
            detail,
        }
    }

    /// Status code of an HTTP error.
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the saved token is no longer accepted.
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Http { status: 401, .. } | Self::NotLoggedIn)
    }
}

/// Message shown for a failed request with the given status.
pub fn status_message(status: u16, detail: Option<&str>) -> String {
    match status {
        400 => "Bad request, please check your input".to_string(),
        401 => "Session expired, please log in again".to_string(),
        403 => "You do not have permission to perform this action".to_string(),
        404 => "The requested resource was not found".to_string(),
        422 => "Invalid request parameters".to_string(),
        500 => "Internal server error, please try again later".to_string(),
        502..=504 => "Service temporarily unavailable".to_string(),
        _ => detail
            .filter(|d| !d.is_empty())
            .map_or_else(|| format!("Request failed with status {status}"), str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_statuses_have_fixed_messages() {
        assert_eq!(
            status_message(401, Some("Incorrect username or password")),
            "Session expired, please log in again"
        );
        assert_eq!(
            status_message(422, None),
            "Invalid request parameters"
        );
        assert_eq!(
            status_message(503, None),
            "Service temporarily unavailable"
        );
    }

    #[test]
    fn other_statuses_use_backend_detail() {
        assert_eq!(status_message(409, Some("Conflict here")), "Conflict here");
        assert_eq!(status_message(409, Some("")), "Request failed with status 409");
        assert_eq!(status_message(418, None), "Request failed with status 418");
    }

    #[test]
    fn http_error_keeps_detail() {
        let err = ClientError::from_status(404, Some("Camera camera-9 is not registered".into()));
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "The requested resource was not found");
        let ClientError::Http { detail, .. } = err else {
            panic!("expected http error");
        };
        assert_eq!(detail.as_deref(), Some("Camera camera-9 is not registered"));
    }

    #[test]
    fn unauthorized_detection() {
        assert!(ClientError::from_status(401, None).is_unauthorized());
        assert!(ClientError::NotLoggedIn.is_unauthorized());
        assert!(!ClientError::from_status(403, None).is_unauthorized());
    }
}
