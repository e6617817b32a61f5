//! Stride Visit
//!
//! A [`Visit`] drives one navigation to a [`stride_core::Location`]:
//! ```text
//! Initialized
//!   ↓ start
//! Started ── cancel ──→ Canceled
//!   ↓ rendered        ↘ fetch/render error
//! Completed             Failed
//! ```
//! Progress is reported as [`VisitMessage`]s on the channel handed to
//! [`Visit::start`]; whoever owns the visit applies them and notifies its
//! [`VisitObserver`].

mod error;
mod event;
mod options;
mod state;
mod view;
mod visit;

pub use error::VisitError;
pub use event::{VisitEvent, VisitMessage, VisitObserver};
pub use options::{VisitAction, VisitOptions, VisitResponse};
pub use state::VisitState;
pub use view::View;
pub use visit::{Visit, VisitId};

pub type Result<T> = std::result::Result<T, VisitError>;
