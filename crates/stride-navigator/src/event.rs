//! Events feeding the navigator

use stride_forms::FormSubmissionMessage;
use stride_visit::VisitMessage;

/// Everything a visit or form submission task can report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigatorEvent {
    Visit(VisitMessage),
    FormSubmission(FormSubmissionMessage),
}

impl From<VisitMessage> for NavigatorEvent {
    fn from(message: VisitMessage) -> Self {
        NavigatorEvent::Visit(message)
    }
}

impl From<FormSubmissionMessage> for NavigatorEvent {
    fn from(message: FormSubmissionMessage) -> Self {
        NavigatorEvent::FormSubmission(message)
    }
}
