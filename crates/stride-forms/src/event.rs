//! Form submission lifecycle events

use stride_fetch::{FetchError, FetchResponse};

use crate::submission::{FormSubmission, SubmissionId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormSubmissionEvent {
    Started,
    /// 2xx response
    SucceededWithResponse(FetchResponse),
    /// The server answered with a non-success status
    FailedWithResponse(FetchResponse),
    /// The exchange itself failed
    Errored(FetchError),
    Finished,
}

impl FormSubmissionEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormSubmissionEvent::Started => "started",
            FormSubmissionEvent::SucceededWithResponse(_) => "succeeded",
            FormSubmissionEvent::FailedWithResponse(_) => "failed",
            FormSubmissionEvent::Errored(_) => "errored",
            FormSubmissionEvent::Finished => "finished",
        }
    }
}

/// An event tagged with the submission that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSubmissionMessage {
    pub submission_id: SubmissionId,
    pub event: FormSubmissionEvent,
}

/// Receives the lifecycle of submissions it owns.
pub trait FormSubmissionObserver {
    fn form_submission_started(&mut self, submission: &FormSubmission);

    fn form_submission_succeeded_with_response(
        &mut self,
        submission: &FormSubmission,
        response: &FetchResponse,
    );

    fn form_submission_failed_with_response(
        &mut self,
        submission: &FormSubmission,
        response: &FetchResponse,
    );

    fn form_submission_errored(&mut self, submission: &FormSubmission, error: &FetchError);

    fn form_submission_finished(&mut self, submission: &FormSubmission);
}
