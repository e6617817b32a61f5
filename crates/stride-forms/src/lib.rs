//! Stride Forms
//!
//! A [`FormSubmission`] sends one [`Form`] over the [`stride_fetch::Fetcher`]
//! and reports exactly one outcome:
//! ```text
//! Started → { SucceededWithResponse | FailedWithResponse | Errored } → Finished
//! ```
//! unless it is stopped first, after which it reports nothing at all.

mod error;
mod event;
mod form;
mod state;
mod submission;

pub use error::FormError;
pub use event::{FormSubmissionEvent, FormSubmissionMessage, FormSubmissionObserver};
pub use form::{Form, FormMethod};
pub use state::FormSubmissionState;
pub use submission::{FormSubmission, SubmissionId};

pub type Result<T> = std::result::Result<T, FormError>;
