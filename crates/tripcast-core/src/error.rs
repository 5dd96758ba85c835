//! Shared error types for Tripcast.
//!
//! Stage-specific errors live next to the stage that raises them; this
//! module holds the pieces every stage needs:
//! - `NetworkError` classifies transport failures against any HTTP collaborator
//! - `SecretError` is raised when the backend cannot hand out a provider credential
//! - `ReqwestErrorExt` maps `reqwest::Error` into `NetworkError`

use thiserror::Error;

/// Network-related errors (HTTP, connectivity).
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl NetworkError {
    pub fn user_message(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed(_) => {
                "Unable to connect. Please ensure the server is running and then try again."
            }
            NetworkError::Timeout => "The request timed out. Please try again.",
            NetworkError::ServerError { status, .. } if *status >= 500 => {
                "The server is experiencing issues. Please try again later."
            }
            NetworkError::ServerError { .. } => "The request failed. Please try again.",
            NetworkError::InvalidResponse(_) => {
                "Received an unexpected response. Please try again."
            }
        }
    }

    /// [`Self::user_message`] followed by the underlying cause.
    pub fn user_message_with_details(&self) -> String {
        format!("{}\n\nError details:\n{}", self.user_message(), self)
    }
}

/// Credential lookup errors from the secret provider.
#[derive(Debug, Error)]
pub enum SecretError {
    #[error("Secret {name} unavailable: {reason}")]
    Unavailable { name: String, reason: String },
}

impl SecretError {
    pub fn unavailable(name: impl Into<String>, reason: impl ToString) -> Self {
        SecretError::Unavailable {
            name: name.into(),
            reason: reason.to_string(),
        }
    }

    /// Name of the secret that could not be fetched.
    pub fn name(&self) -> &str {
        match self {
            SecretError::Unavailable { name, .. } => name,
        }
    }
}

/// Body text of a non-success response, for error messages.
///
/// A body that cannot be read is logged and described instead of dropped.
pub async fn error_body(response: reqwest::Response) -> String {
    match response.text().await {
        Ok(text) => text,
        Err(e) => {
            tracing::debug!("Failed to read error response body: {}", e);
            format!("<unreadable response body: {}>", e)
        }
    }
}

/// Extension trait for converting reqwest errors to our error types.
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        if self.is_timeout() {
            NetworkError::Timeout
        } else if self.is_connect() {
            NetworkError::ConnectionFailed(self.to_string())
        } else if let Some(status) = self.status() {
            NetworkError::ServerError {
                status: status.as_u16(),
                message: self.to_string(),
            }
        } else if self.is_decode() {
            NetworkError::InvalidResponse(self.to_string())
        } else {
            NetworkError::ConnectionFailed(self.to_string())
        }
    }
}
