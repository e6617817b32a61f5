//! Visit State Machine
//!
//! ```text
//! Initialized → Started → { Completed | Canceled | Failed }
//! ```
//! Strictly linear; terminal states never transition again.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisitState {
    /// Constructed, not yet started
    Initialized,
    /// Fetching or rendering
    Started,
    /// Rendered successfully
    Completed,
    /// Aborted through `cancel`
    Canceled,
    /// Fetch or render failed
    Failed,
}

impl VisitState {
    pub fn can_transition_to(&self, target: VisitState) -> bool {
        matches!(
            (self, target),
            (VisitState::Initialized, VisitState::Started)
                | (VisitState::Started, VisitState::Completed)
                | (VisitState::Started, VisitState::Canceled)
                | (VisitState::Started, VisitState::Failed)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            VisitState::Completed | VisitState::Canceled | VisitState::Failed
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VisitState::Initialized => "initialized",
            VisitState::Started => "started",
            VisitState::Completed => "completed",
            VisitState::Canceled => "canceled",
            VisitState::Failed => "failed",
        }
    }
}

impl std::fmt::Display for VisitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for VisitState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "initialized" => Ok(VisitState::Initialized),
            "started" => Ok(VisitState::Started),
            "completed" => Ok(VisitState::Completed),
            "canceled" => Ok(VisitState::Canceled),
            "failed" => Ok(VisitState::Failed),
            _ => Err(format!("Unknown visit state: {}", s)),
        }
    }
}
