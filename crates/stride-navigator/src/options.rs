//! Options accepted by `visit` and `submit`

use serde::{Deserialize, Serialize};

use stride_visit::{VisitAction, VisitOptions};

/// Admission policy for a submission. Visits are always foreground.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationTarget {
    /// Runs alongside whatever is in the foreground
    Background,
    /// Replaces the current foreground activity
    #[default]
    Foreground,
    /// Admitted exactly like `Foreground`
    Modal,
}

impl NavigationTarget {
    pub fn is_background(&self) -> bool {
        matches!(self, NavigationTarget::Background)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationOptions {
    pub target: NavigationTarget,
    /// Passed through to the visit
    pub visit: VisitOptions,
}

impl NavigationOptions {
    pub fn background() -> Self {
        Self::with_target(NavigationTarget::Background)
    }

    pub fn foreground() -> Self {
        Self::with_target(NavigationTarget::Foreground)
    }

    pub fn modal() -> Self {
        Self::with_target(NavigationTarget::Modal)
    }

    fn with_target(target: NavigationTarget) -> Self {
        Self {
            target,
            ..Default::default()
        }
    }

    pub fn with_action(mut self, action: VisitAction) -> Self {
        self.visit.action = action;
        self
    }

    pub fn with_response(mut self, response_html: impl Into<String>) -> Self {
        self.visit = self.visit.with_response(response_html);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_target_is_foreground() {
        assert_eq!(NavigationOptions::default().target, NavigationTarget::Foreground);
        assert!(NavigationOptions::background().target.is_background());
        assert!(!NavigationOptions::modal().target.is_background());
    }

    #[test]
    fn test_deserialize_partial_options() {
        let options: NavigationOptions =
            serde_json::from_str(r#"{"target": "background"}"#).unwrap();
        assert_eq!(options.target, NavigationTarget::Background);
        assert_eq!(options.visit, VisitOptions::default());
    }

    #[test]
    fn test_builders() {
        let options = NavigationOptions::foreground()
            .with_action(VisitAction::Replace)
            .with_response("<p/>");
        assert_eq!(options.visit.action, VisitAction::Replace);
        assert_eq!(options.visit.response.unwrap().response_html, "<p/>");
    }
}
