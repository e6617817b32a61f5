//! Form Submission State Machine
//!
//! ```text
//! Initialized
//!   ↓ start
//! Requesting ──┐
//!   ↓ outcome  │ stop
//! Receiving ───┤
//!   ↓ finish   ↓
//! Finished   Stopped
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormSubmissionState {
    /// Constructed, not yet started
    Initialized,
    /// Request in flight
    Requesting,
    /// Outcome reported, waiting for the finish notification
    Receiving,
    /// Done, outcome delivered
    Finished,
    /// Stopped before finishing; silent from then on
    Stopped,
}

impl FormSubmissionState {
    pub fn can_transition_to(&self, target: FormSubmissionState) -> bool {
        use FormSubmissionState::*;

        matches!(
            (self, target),
            (Initialized, Requesting)
                | (Requesting, Receiving)
                | (Requesting, Stopped)
                | (Receiving, Finished)
                | (Receiving, Stopped)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            FormSubmissionState::Finished | FormSubmissionState::Stopped
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FormSubmissionState::Initialized => "initialized",
            FormSubmissionState::Requesting => "requesting",
            FormSubmissionState::Receiving => "receiving",
            FormSubmissionState::Finished => "finished",
            FormSubmissionState::Stopped => "stopped",
        }
    }
}

impl std::fmt::Display for FormSubmissionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_transitions() {
        use FormSubmissionState::*;

        assert!(Initialized.can_transition_to(Requesting));
        assert!(Requesting.can_transition_to(Receiving));
        assert!(Receiving.can_transition_to(Finished));
        // Stop is allowed any time after start, until finished
        assert!(Requesting.can_transition_to(Stopped));
        assert!(Receiving.can_transition_to(Stopped));
    }

    #[test]
    fn test_invalid_transitions() {
        use FormSubmissionState::*;

        assert!(!Initialized.can_transition_to(Stopped));
        assert!(!Requesting.can_transition_to(Finished));
        assert!(!Finished.can_transition_to(Stopped));
        assert!(!Stopped.can_transition_to(Requesting));
        assert!(Finished.is_terminal() && Stopped.is_terminal());
    }
}
