//! Form error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Unknown form method: {0}")]
    UnknownMethod(String),

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },
}
