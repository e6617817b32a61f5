//! Stride Navigator
//!
//! The single authority for "what navigation is happening right now".
//!
//! - At most one foreground activity: a [`stride_visit::Visit`] or a
//!   foreground [`stride_forms::FormSubmission`]. Starting a new one stops
//!   the old one first.
//! - Any number of background form submissions, untouched by foreground
//!   traffic.
//! - A successful foreground submission that returns HTML turns into a fresh
//!   visit that renders the returned content without fetching it again.

mod delegate;
mod event;
mod history;
mod issues;
mod navigator;
mod options;

pub use delegate::{History, NavigatorDelegate, NavigatorObserver};
pub use event::NavigatorEvent;
pub use history::{HistoryEntry, SessionHistory};
pub use issues::{IssueSink, NavigationIssue, TracingIssueSink};
pub use navigator::{Foreground, Navigator};
pub use options::{NavigationOptions, NavigationTarget};

// Re-export the lifecycle crates the public API is expressed in
pub use stride_core::{Config, Location, RestorationIdentifier};
pub use stride_fetch::{FetchError, FetchResponse, Fetcher, HttpFetcher};
pub use stride_forms::{
    Form, FormMethod, FormSubmission, FormSubmissionEvent, FormSubmissionMessage,
    FormSubmissionObserver, FormSubmissionState, SubmissionId,
};
pub use stride_visit::{
    View, Visit, VisitAction, VisitError, VisitEvent, VisitId, VisitMessage, VisitObserver,
    VisitOptions, VisitResponse, VisitState,
};
