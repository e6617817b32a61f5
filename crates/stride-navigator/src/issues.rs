//! Observability sink for non-fatal failures

use stride_fetch::{FetchError, FetchResponse};
use stride_forms::FormSubmission;
use stride_visit::{Visit, VisitError};

/// A failure that ends one visit or submission and nothing else
#[derive(Debug, Clone, Copy)]
pub enum NavigationIssue<'a> {
    /// The server answered a submission with a non-success status
    SubmissionFailed {
        submission: &'a FormSubmission,
        response: &'a FetchResponse,
    },
    /// The submission never got an answer
    SubmissionErrored {
        submission: &'a FormSubmission,
        error: &'a FetchError,
    },
    VisitFailed {
        visit: &'a Visit,
        error: &'a VisitError,
    },
}

impl NavigationIssue<'_> {
    pub fn as_str(&self) -> &'static str {
        match self {
            NavigationIssue::SubmissionFailed { .. } => "submission_failed",
            NavigationIssue::SubmissionErrored { .. } => "submission_errored",
            NavigationIssue::VisitFailed { .. } => "visit_failed",
        }
    }
}

pub trait IssueSink: Send + Sync {
    fn report(&self, issue: NavigationIssue<'_>);
}

/// Default sink: one `tracing` error event per issue
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingIssueSink;

impl IssueSink for TracingIssueSink {
    fn report(&self, issue: NavigationIssue<'_>) {
        match issue {
            NavigationIssue::SubmissionFailed {
                submission,
                response,
            } => {
                tracing::error!(
                    submission_id = %submission.id(),
                    form = %submission.form().label(),
                    status = response.status,
                    location = %response.location,
                    "Form submission failed"
                );
            }
            NavigationIssue::SubmissionErrored { submission, error } => {
                tracing::error!(
                    submission_id = %submission.id(),
                    form = %submission.form().label(),
                    error = %error,
                    "Form submission errored"
                );
            }
            NavigationIssue::VisitFailed { visit, error } => {
                tracing::error!(
                    visit_id = %visit.id(),
                    location = %visit.location(),
                    error = %error,
                    "Visit failed"
                );
            }
        }
    }
}
