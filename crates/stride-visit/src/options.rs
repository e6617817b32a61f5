//! Visit configuration

use serde::{Deserialize, Serialize};

use stride_core::Location;

/// How the history collaborator should record a completed visit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisitAction {
    /// Push a new history entry
    #[default]
    Advance,
    /// Replace the current history entry
    Replace,
    /// Return to an existing entry (back/forward)
    Restore,
}

/// Content handed to a visit up front, so it renders without fetching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitResponse {
    pub response_html: String,
}

impl VisitResponse {
    pub fn new(response_html: impl Into<String>) -> Self {
        Self {
            response_html: response_html.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisitOptions {
    pub action: VisitAction,
    pub referrer: Option<Location>,
    pub response: Option<VisitResponse>,
}

impl VisitOptions {
    pub fn with_action(mut self, action: VisitAction) -> Self {
        self.action = action;
        self
    }

    pub fn with_referrer(mut self, referrer: Option<Location>) -> Self {
        self.referrer = referrer;
        self
    }

    pub fn with_response(mut self, response_html: impl Into<String>) -> Self {
        self.response = Some(VisitResponse::new(response_html));
        self
    }
}
