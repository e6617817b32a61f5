//! Visit error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VisitError {
    #[error("Fetch error: {0}")]
    Fetch(#[from] stride_fetch::FetchError),

    #[error("Server responded with status {0}")]
    Status(u16),

    #[error("Response carried no renderable content")]
    NotHtml,

    #[error("Render error: {0}")]
    Render(String),

    #[error("Visit ended without an outcome")]
    Aborted,

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },
}
