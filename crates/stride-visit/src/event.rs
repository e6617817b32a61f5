//! Visit lifecycle events

use crate::error::VisitError;
use crate::visit::{Visit, VisitId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisitEvent {
    Started,
    Completed,
    Failed(VisitError),
}

impl VisitEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisitEvent::Started => "started",
            VisitEvent::Completed => "completed",
            VisitEvent::Failed(_) => "failed",
        }
    }
}

/// An event tagged with the visit that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitMessage {
    pub visit_id: VisitId,
    pub event: VisitEvent,
}

/// Receives the lifecycle of visits it owns.
pub trait VisitObserver {
    fn visit_started(&mut self, visit: &Visit);

    fn visit_completed(&mut self, visit: &Visit);

    fn visit_failed(&mut self, visit: &Visit, error: &VisitError);
}
