//! Error taxonomy surfaced by the client core.

use reqwest::StatusCode;
use thiserror::Error;

/// Why a position could not be obtained.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationError {
    #[error("location permission denied")]
    PermissionDenied,
    #[error("timed out waiting for a location fix")]
    Timeout,
    #[error("location unavailable")]
    Unavailable,
}

/// Errors returned by the core's operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Location error: {0}")]
    Location(#[from] LocationError),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Authentication error: {0}")]
    Auth(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Local storage error: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Auth failures should re-prompt for credentials instead of being retried.
    pub fn is_auth(&self) -> bool {
        matches!(self, Error::Auth(_))
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Error::Network(_))
    }

    /// Classify a non-success backend response.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let detail = if body.is_empty() {
            status.to_string()
        } else {
            format!("{}: {}", status, body)
        };
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::Auth(detail),
            StatusCode::NOT_FOUND => Error::NotFound(detail),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => Error::Validation(detail),
            _ => Error::Network(detail),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        tracing::error!("Local storage error: {:?}", err);
        Error::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("Local storage is not valid JSON: {:?}", err);
        Error::Storage(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        tracing::debug!("HTTP transport error: {:?}", err);
        match err.status() {
            Some(status) => Error::from_status(status, ""),
            None => Error::Network(err.to_string()),
        }
    }
}
