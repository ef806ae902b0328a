//! Uniform response envelope.

use serde::{Deserialize, Serialize};

/// `{success, data, message}` envelope wrapped around most API payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(default)]
    pub message: String,
}

impl<T> ApiResponse<T> {
    /// Successful response with a message.
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: message.into(),
        }
    }
}
