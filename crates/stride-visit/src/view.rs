//! Rendering collaborator

use stride_core::{Location, RestorationIdentifier};

use crate::Result;

/// Paints fetched content. Called from the visit's task, hence `Send + Sync`.
pub trait View: Send + Sync {
    fn render(
        &self,
        location: &Location,
        html: &str,
        restoration_identifier: &RestorationIdentifier,
    ) -> Result<()>;
}
