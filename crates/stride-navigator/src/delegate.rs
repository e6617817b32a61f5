//! Outer collaborators of the navigator

use std::sync::Arc;

use stride_core::Location;
use stride_visit::{View, Visit};

/// What the owner of a navigator hears about.
///
/// Only visits that are still current when their event arrives are reported;
/// canceled and superseded visits stay silent.
pub trait NavigatorObserver {
    fn visit_started(&mut self, visit: &Visit);

    fn visit_completed(&mut self, visit: &Visit);
}

/// Source of the current location, used as the referrer of new visits
pub trait History {
    fn location(&self) -> Location;
}

/// The application-level controller that owns a navigator.
pub trait NavigatorDelegate: NavigatorObserver {
    /// Opaque to the navigator; only handed back through `Navigator::adapter`
    type Adapter;
    type View: View + 'static;
    type History: History;

    fn adapter(&self) -> &Self::Adapter;

    fn view(&self) -> &Arc<Self::View>;

    fn history(&self) -> &Self::History;
}
