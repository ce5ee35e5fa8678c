//! Jakdojade client error types.

use reqwest::StatusCode;

use crate::domain::ValidationError;
use crate::sign::SignError;

/// Broad classification of a [`JakdojadeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Anonymous registration failed or returned unusable credentials
    Registration,
    /// The query was invalid; nothing was sent
    Validation,
    /// Network failure or non-success response from a data endpoint
    Transport,
    /// The request could not be prepared for signing
    SigningInput,
}

/// Errors from the Jakdojade HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum JakdojadeError {
    /// Registration endpoint returned a non-success status
    #[error("registration failed with status {status}: {body}")]
    Registration { status: u16, body: String },

    /// Registration request did not complete
    #[error("registration request failed: {0}")]
    RegistrationHttp(#[source] reqwest::Error),

    /// Registration succeeded but the credentials are missing or empty
    #[error("registration returned malformed credentials: {0}")]
    MalformedCredentials(String),

    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error status code
    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    /// Response body was not the expected JSON
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// Body or parameters could not be signed
    #[error("signing failed: {0}")]
    Signing(#[from] SignError),

    /// Credential or device id not usable as a header value
    #[error("invalid value for header {0}")]
    InvalidHeader(&'static str),

    /// Query failed validation
    #[error("invalid query: {0}")]
    Validation(#[from] ValidationError),
}

impl JakdojadeError {
    /// Which of the four error kinds this is.
    pub fn kind(&self) -> ErrorKind {
        match self {
            JakdojadeError::Registration { .. }
            | JakdojadeError::RegistrationHttp(_)
            | JakdojadeError::MalformedCredentials(_) => ErrorKind::Registration,
            JakdojadeError::Http(_) | JakdojadeError::Api { .. } | JakdojadeError::Json { .. } => {
                ErrorKind::Transport
            }
            JakdojadeError::Signing(_) | JakdojadeError::InvalidHeader(_) => {
                ErrorKind::SigningInput
            }
            JakdojadeError::Validation(_) => ErrorKind::Validation,
        }
    }

    /// Provider HTTP status, when the provider answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            JakdojadeError::Registration { status, .. } | JakdojadeError::Api { status, .. } => {
                Some(*status)
            }
            JakdojadeError::Http(e) | JakdojadeError::RegistrationHttp(e) => {
                e.status().map(|s| s.as_u16())
            }
            _ => None,
        }
    }

    /// Whether retrying the same call may succeed.
    ///
    /// True for timeouts, connection failures, rate limiting and server
    /// errors. The client never retries on its own.
    pub fn is_retryable(&self) -> bool {
        match self {
            JakdojadeError::Http(e) | JakdojadeError::RegistrationHttp(e) => {
                e.is_timeout() || e.is_connect()
            }
            JakdojadeError::Registration { status, .. } | JakdojadeError::Api { status, .. } => {
                StatusCode::from_u16(*status)
                    .map(|s| s == StatusCode::TOO_MANY_REQUESTS || s.is_server_error())
                    .unwrap_or(false)
            }
            _ => false,
        }
    }
}
