//! Restoration identifiers

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque token correlating a visit with a browser history entry.
///
/// Minted fresh for every new navigation; supplied by the caller when
/// restoring an existing entry on back/forward.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RestorationIdentifier(String);

impl RestorationIdentifier {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RestorationIdentifier {
    fn default() -> Self {
        Self::new()
    }
}

impl From<String> for RestorationIdentifier {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for RestorationIdentifier {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for RestorationIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_identifiers_are_unique() {
        let a = RestorationIdentifier::new();
        let b = RestorationIdentifier::new();
        assert_ne!(a, b);
        assert!(Uuid::parse_str(a.as_str()).is_ok());
    }

    #[test]
    fn test_supplied_identifier_is_kept() {
        let id = RestorationIdentifier::from("history-entry-7");
        assert_eq!(id.as_str(), "history-entry-7");
        assert_eq!(id, RestorationIdentifier::from("history-entry-7".to_string()));
    }
}
