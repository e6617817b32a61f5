//! In-memory session history

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use stride_core::{Location, RestorationIdentifier};
use stride_visit::{Visit, VisitAction};

use crate::delegate::History;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub location: Location,
    pub restoration_identifier: RestorationIdentifier,
}

struct HistoryStack {
    entries: Vec<HistoryEntry>,
    index: usize,
}

impl HistoryStack {
    fn current(&self) -> &HistoryEntry {
        &self.entries[self.index]
    }
}

/// A back/forward stack for one browsing session.
///
/// Never empty: it starts at the initial location. Interior locking lets a
/// delegate record completed visits through a shared reference.
pub struct SessionHistory {
    stack: RwLock<HistoryStack>,
}

impl SessionHistory {
    pub fn new(initial: Location) -> Self {
        Self {
            stack: RwLock::new(HistoryStack {
                entries: vec![HistoryEntry {
                    location: initial,
                    restoration_identifier: RestorationIdentifier::new(),
                }],
                index: 0,
            }),
        }
    }

    pub fn current(&self) -> HistoryEntry {
        self.stack.read().current().clone()
    }

    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.stack.read().entries.clone()
    }

    pub fn len(&self) -> usize {
        self.stack.read().entries.len()
    }

    /// Add an entry after the current one, dropping any forward entries
    pub fn push(&self, location: Location, restoration_identifier: RestorationIdentifier) {
        let mut stack = self.stack.write();
        let keep = stack.index + 1;
        stack.entries.truncate(keep);
        stack.entries.push(HistoryEntry {
            location,
            restoration_identifier,
        });
        stack.index = keep;
    }

    pub fn replace(&self, location: Location, restoration_identifier: RestorationIdentifier) {
        let mut stack = self.stack.write();
        let index = stack.index;
        stack.entries[index] = HistoryEntry {
            location,
            restoration_identifier,
        };
    }

    /// Move to the entry carrying `restoration_identifier`. Returns `false` if none does.
    pub fn restore(&self, restoration_identifier: &RestorationIdentifier) -> bool {
        let mut stack = self.stack.write();
        let position = stack
            .entries
            .iter()
            .position(|e| &e.restoration_identifier == restoration_identifier);

        match position {
            Some(index) => {
                stack.index = index;
                true
            }
            None => false,
        }
    }

    /// Record a completed visit according to its action.
    pub fn record_visit(&self, visit: &Visit) {
        let location = visit.location().clone();
        let restoration_identifier = visit.restoration_identifier().clone();

        match visit.action() {
            VisitAction::Advance => self.push(location, restoration_identifier),
            VisitAction::Replace => self.replace(location, restoration_identifier),
            VisitAction::Restore => {
                if !self.restore(&restoration_identifier) {
                    tracing::debug!(
                        restoration_identifier = %restoration_identifier,
                        "Restoration entry missing, advancing instead"
                    );
                    self.push(location, restoration_identifier);
                }
            }
        }
    }

    pub fn go_back(&self) -> Option<HistoryEntry> {
        let mut stack = self.stack.write();
        if stack.index == 0 {
            return None;
        }
        stack.index -= 1;
        Some(stack.current().clone())
    }

    pub fn go_forward(&self) -> Option<HistoryEntry> {
        let mut stack = self.stack.write();
        if stack.index + 1 >= stack.entries.len() {
            return None;
        }
        stack.index += 1;
        Some(stack.current().clone())
    }
}

impl History for SessionHistory {
    fn location(&self) -> Location {
        self.current().location
    }
}
