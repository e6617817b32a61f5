//! Fetch error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Failed to read response body: {0}")]
    Body(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Request ended without a response")]
    Aborted,
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_body() || err.is_decode() {
            FetchError::Body(err.to_string())
        } else if err.is_builder() {
            FetchError::InvalidRequest(err.to_string())
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}
