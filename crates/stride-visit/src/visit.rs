//! Visit data structure and drive task

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use uuid::Uuid;

use stride_core::{Location, RestorationIdentifier};
use stride_fetch::{FetchRequest, FetchResponse, Fetcher};

use crate::error::VisitError;
use crate::event::{VisitEvent, VisitMessage};
use crate::options::{VisitAction, VisitOptions, VisitResponse};
use crate::state::VisitState;
use crate::view::View;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisitId(Uuid);

impl VisitId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for VisitId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for VisitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One navigation attempt
#[derive(Debug)]
pub struct Visit {
    id: VisitId,
    /// Foreground generation this visit belongs to
    generation: u64,
    location: Location,
    restoration_identifier: RestorationIdentifier,
    referrer: Option<Location>,
    action: VisitAction,
    response: Option<VisitResponse>,
    state: VisitState,
    created_at: DateTime<Utc>,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    /// Flipped to `true` on cancel; the drive task goes silent once it sees it
    control: Option<watch::Sender<bool>>,
}

impl Visit {
    pub fn new(
        generation: u64,
        location: Location,
        restoration_identifier: RestorationIdentifier,
        options: VisitOptions,
    ) -> Self {
        Self {
            id: VisitId::new(),
            generation,
            location,
            restoration_identifier,
            referrer: options.referrer,
            action: options.action,
            response: options.response,
            state: VisitState::Initialized,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
            control: None,
        }
    }

    pub fn id(&self) -> VisitId {
        self.id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn restoration_identifier(&self) -> &RestorationIdentifier {
        &self.restoration_identifier
    }

    pub fn referrer(&self) -> Option<&Location> {
        self.referrer.as_ref()
    }

    pub fn action(&self) -> VisitAction {
        self.action
    }

    /// Content supplied up front, if any
    pub fn response(&self) -> Option<&VisitResponse> {
        self.response.as_ref()
    }

    pub fn state(&self) -> VisitState {
        self.state
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    fn transition_to(&mut self, new_state: VisitState) -> Result<()> {
        if !self.state.can_transition_to(new_state) {
            return Err(VisitError::InvalidTransition {
                from: self.state.to_string(),
                to: new_state.to_string(),
            });
        }

        tracing::debug!(
            visit_id = %self.id,
            from = %self.state,
            to = %new_state,
            "Visit state transition"
        );

        self.state = new_state;
        Ok(())
    }

    /// Begin the visit.
    ///
    /// Spawns the drive task on the current Tokio runtime. The task reports
    /// `Started`, then renders the pre-supplied response or fetches the
    /// location, and finally reports `Completed` or `Failed`.
    pub fn start<E>(
        &mut self,
        fetcher: Arc<dyn Fetcher>,
        view: Arc<dyn View>,
        events: mpsc::UnboundedSender<E>,
    ) -> Result<()>
    where
        E: From<VisitMessage> + Send + 'static,
    {
        self.transition_to(VisitState::Started)?;
        self.started_at = Some(Utc::now());

        let (tx, rx) = watch::channel(false);
        self.control = Some(tx);

        let job = VisitJob {
            visit_id: self.id,
            location: self.location.clone(),
            restoration_identifier: self.restoration_identifier.clone(),
            response: self.response.clone(),
        };

        tracing::info!(
            visit_id = %self.id,
            location = %self.location,
            action = ?self.action,
            prefetched = self.response.is_some(),
            "Started visit"
        );

        tokio::spawn(drive_visit(job, fetcher, view, rx, events));

        Ok(())
    }

    /// Abort an in-progress visit. Nothing further is reported for it.
    ///
    /// Returns `false` when there was nothing to cancel.
    pub fn cancel(&mut self) -> bool {
        if self.transition_to(VisitState::Canceled).is_err() {
            return false;
        }

        if let Some(control) = self.control.take() {
            let _ = control.send(true);
        }

        tracing::info!(visit_id = %self.id, location = %self.location, "Canceled visit");
        true
    }

    pub fn complete(&mut self) -> Result<()> {
        self.transition_to(VisitState::Completed)?;
        self.completed_at = Some(Utc::now());
        self.control = None;
        Ok(())
    }

    pub fn fail(&mut self) -> Result<()> {
        self.transition_to(VisitState::Failed)?;
        self.completed_at = Some(Utc::now());
        self.control = None;
        Ok(())
    }

    /// Apply a reported event to the state machine.
    ///
    /// `Started` is already reflected by `start`, so it only checks the state.
    pub fn apply(&mut self, event: &VisitEvent) -> Result<()> {
        match event {
            VisitEvent::Started if self.state == VisitState::Started => Ok(()),
            VisitEvent::Started => Err(VisitError::InvalidTransition {
                from: self.state.to_string(),
                to: VisitState::Started.to_string(),
            }),
            VisitEvent::Completed => self.complete(),
            VisitEvent::Failed(_) => self.fail(),
        }
    }
}

struct VisitJob {
    visit_id: VisitId,
    location: Location,
    restoration_identifier: RestorationIdentifier,
    response: Option<VisitResponse>,
}

async fn drive_visit<E>(
    job: VisitJob,
    fetcher: Arc<dyn Fetcher>,
    view: Arc<dyn View>,
    mut control: watch::Receiver<bool>,
    events: mpsc::UnboundedSender<E>,
) where
    E: From<VisitMessage>,
{
    let mut reporter = Reporter {
        visit_id: job.visit_id,
        control: control.clone(),
        events,
        finished: false,
    };

    reporter.emit(VisitEvent::Started);

    let html = match job.response {
        Some(response) => response.response_html,
        None => {
            let outcome = tokio::select! {
                _ = cancelled(&mut control) => return,
                outcome = fetcher.fetch(FetchRequest::get(&job.location)) => outcome,
            };

            match outcome.map_err(VisitError::from).and_then(renderable) {
                Ok(html) => html,
                Err(e) => {
                    tracing::warn!(visit_id = %job.visit_id, error = %e, "Visit fetch failed");
                    reporter.emit(VisitEvent::Failed(e));
                    return;
                }
            }
        }
    };

    if reporter.silenced() {
        return;
    }

    match view.render(&job.location, &html, &job.restoration_identifier) {
        Ok(()) => reporter.emit(VisitEvent::Completed),
        Err(e) => {
            tracing::warn!(visit_id = %job.visit_id, error = %e, "Visit render failed");
            reporter.emit(VisitEvent::Failed(e));
        }
    }
}

/// Sends a visit's events unless it was canceled or dropped.
///
/// If the task ends without a terminal event, for instance because the
/// fetcher or the view panicked, dropping the reporter sends `Failed`.
struct Reporter<E: From<VisitMessage>> {
    visit_id: VisitId,
    control: watch::Receiver<bool>,
    events: mpsc::UnboundedSender<E>,
    finished: bool,
}

impl<E: From<VisitMessage>> Reporter<E> {
    /// Canceled, or the owning `Visit` is gone
    fn silenced(&self) -> bool {
        *self.control.borrow() || self.control.has_changed().is_err()
    }

    fn emit(&mut self, event: VisitEvent) {
        if self.silenced() {
            return;
        }
        if !matches!(event, VisitEvent::Started) {
            self.finished = true;
        }
        let _ = self.events.send(E::from(VisitMessage {
            visit_id: self.visit_id,
            event,
        }));
    }
}

impl<E: From<VisitMessage>> Drop for Reporter<E> {
    fn drop(&mut self) {
        if self.finished || self.silenced() {
            return;
        }
        tracing::warn!(visit_id = %self.visit_id, "Visit task ended without an outcome");
        self.emit(VisitEvent::Failed(VisitError::Aborted));
    }
}

fn renderable(response: FetchResponse) -> Result<String> {
    if !response.succeeded() {
        return Err(VisitError::Status(response.status));
    }
    response
        .response_html()
        .map(str::to_string)
        .ok_or(VisitError::NotHtml)
}

/// Resolves once the visit is canceled or its owner is gone.
async fn cancelled(control: &mut watch::Receiver<bool>) {
    while !*control.borrow() {
        if control.changed().await.is_err() {
            return;
        }
    }
}
