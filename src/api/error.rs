//! Error taxonomy for transit service calls
//!
//! Classifies every failure by origin so the retry policy can decide whether
//! a retry is worthwhile and callers can present a human-readable message
//! without inspecting transport details.

use thiserror::Error;

/// Classified failure for an API operation.
///
/// Transport-level failures and 5xx responses are presumed transient and
/// retryable; 4xx responses and malformed bodies are not.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// The attempt did not complete within the configured timeout
    #[error("request timed out")]
    Timeout,

    /// Connection reset/abort, DNS failure, or no response received at all
    #[error("network error: {0}")]
    Network(String),

    /// HTTP 5xx from the service
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// HTTP 4xx, including validation failures and not-found
    #[error("request failed ({status}): {message}")]
    Request { status: u16, message: String },

    /// Response body was not the JSON shape the operation required
    #[error("invalid response body: {0}")]
    Decode(String),

    /// A retryable failure persisted through every allowed attempt
    #[error("service unavailable after {attempts} attempts: {message}")]
    ServiceUnavailable { attempts: u32, message: String },
}

impl ApiError {
    /// Whether the retry policy should attempt this failure again.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Timeout => true,
            ApiError::Network(_) => true,
            ApiError::Server { .. } => true,
            ApiError::Request { .. } => false,
            ApiError::Decode(_) => false,
            ApiError::ServiceUnavailable { .. } => false,
        }
    }

    /// HTTP status code, when the failure came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } | ApiError::Request { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Classify an HTTP status code with an accompanying message.
    pub fn from_status(status: u16, message: String) -> Self {
        if (500..=599).contains(&status) {
            ApiError::Server { status, message }
        } else {
            ApiError::Request { status, message }
        }
    }

    /// Classify a transport-level reqwest failure.
    pub fn from_transport(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            ApiError::Timeout
        } else if error.is_decode() {
            ApiError::Decode(error.to_string())
        } else if let Some(status) = error.status() {
            Self::from_status(status.as_u16(), error.to_string())
        } else {
            // Connect errors, resets, and requests that never got a
            // response all land here.
            ApiError::Network(error.to_string())
        }
    }

    /// Classify a non-success HTTP response, consuming its body.
    ///
    /// The services report failures as `{"message": "..."}`; that message is
    /// surfaced directly when present so callers can display it as-is.
    pub async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Self::from_status(status, extract_message(&body, status))
    }
}

fn extract_message(body: &str, status: u16) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(message) = value.get("message").and_then(|m| m.as_str()) {
            return message.to_string();
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("request failed with status {}", status)
    } else {
        trimmed.to_string()
    }
}
