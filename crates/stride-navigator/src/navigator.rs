//! Navigator
//!
//! Owns the foreground slot and the background submission set, and is the
//! observer of every visit and submission it starts. Tasks report back over
//! one channel; the owner pumps it with [`Navigator::step`],
//! [`Navigator::drain`] or [`Navigator::run_until_idle`], so every state change
//! happens on the owner's thread of control.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;

use stride_core::{Location, RestorationIdentifier};
use stride_fetch::{FetchError, FetchResponse, Fetcher};
use stride_forms::{
    Form, FormSubmission, FormSubmissionEvent, FormSubmissionMessage, FormSubmissionObserver,
    SubmissionId,
};
use stride_visit::{Visit, VisitError, VisitEvent, VisitMessage, VisitObserver, VisitOptions};

use crate::delegate::{History, NavigatorDelegate};
use crate::event::NavigatorEvent;
use crate::issues::{IssueSink, NavigationIssue, TracingIssueSink};
use crate::options::NavigationOptions;

/// The single foreground activity, if any
#[derive(Debug, Default)]
pub enum Foreground {
    #[default]
    Idle,
    Visit(Visit),
    FormSubmission(FormSubmission),
}

impl Foreground {
    pub fn is_idle(&self) -> bool {
        matches!(self, Foreground::Idle)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Foreground::Idle => "idle",
            Foreground::Visit(_) => "visit",
            Foreground::FormSubmission(_) => "form_submission",
        }
    }
}

pub struct Navigator<D: NavigatorDelegate> {
    delegate: D,
    fetcher: Arc<dyn Fetcher>,
    issues: Arc<dyn IssueSink>,
    foreground: Foreground,
    background: HashMap<SubmissionId, FormSubmission>,
    /// Foreground submissions replaced by the visit they produced, waiting for `Finished`
    finishing: HashMap<SubmissionId, FormSubmission>,
    /// Bumped for every new foreground activity; events from older ones are stale
    generation: u64,
    events_tx: mpsc::UnboundedSender<NavigatorEvent>,
    events_rx: mpsc::UnboundedReceiver<NavigatorEvent>,
}

impl<D: NavigatorDelegate> Navigator<D> {
    pub fn new(delegate: D, fetcher: Arc<dyn Fetcher>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Self {
            delegate,
            fetcher,
            issues: Arc::new(TracingIssueSink),
            foreground: Foreground::Idle,
            background: HashMap::new(),
            finishing: HashMap::new(),
            generation: 0,
            events_tx,
            events_rx,
        }
    }

    pub fn with_issue_sink(mut self, issues: Arc<dyn IssueSink>) -> Self {
        self.issues = issues;
        self
    }

    // === Public operations ===

    /// Navigate to `location`, replacing whatever is in the foreground.
    ///
    /// The referrer is always the history's current location; a referrer in
    /// `options` is ignored.
    pub fn visit(
        &mut self,
        location: Location,
        restoration_identifier: RestorationIdentifier,
        options: NavigationOptions,
    ) {
        self.start_visit(location, restoration_identifier, options.visit);
    }

    /// Submit `form`. Background submissions leave the foreground alone;
    /// anything else stops the current foreground activity first.
    pub fn submit(&mut self, form: Form, options: NavigationOptions) {
        if options.target.is_background() {
            let mut submission = FormSubmission::new(self.generation, form, true);
            if let Err(e) = submission.start(self.fetcher.clone(), self.events_tx.clone()) {
                tracing::warn!(error = %e, "Failed to start background form submission");
                return;
            }
            self.background.insert(submission.id(), submission);

            tracing::debug!(
                pending = self.background.len(),
                "Admitted background form submission"
            );
        } else {
            self.stop();
            self.generation += 1;

            let mut submission = FormSubmission::new(self.generation, form, false);
            if let Err(e) = submission.start(self.fetcher.clone(), self.events_tx.clone()) {
                tracing::warn!(error = %e, "Failed to start form submission");
                return;
            }
            self.foreground = Foreground::FormSubmission(submission);
        }
    }

    /// Stop the foreground activity, if any. Background submissions keep running.
    pub fn stop(&mut self) {
        match std::mem::take(&mut self.foreground) {
            Foreground::FormSubmission(mut submission) => {
                submission.stop();
            }
            Foreground::Visit(mut visit) => {
                visit.cancel();
            }
            Foreground::Idle => {}
        }
    }

    /// Extension point. Reloading is left to the history collaborator.
    pub fn reload(&mut self) {
        tracing::debug!(location = %self.location(), "Reload requested");
    }

    /// Extension point. Traversal is left to the history collaborator, which
    /// comes back through `visit` with `VisitAction::Restore`.
    pub fn go_back(&mut self) {
        tracing::debug!(location = %self.location(), "Back navigation requested");
    }

    // === Accessors ===

    pub fn delegate(&self) -> &D {
        &self.delegate
    }

    pub fn delegate_mut(&mut self) -> &mut D {
        &mut self.delegate
    }

    pub fn adapter(&self) -> &D::Adapter {
        self.delegate.adapter()
    }

    pub fn view(&self) -> &Arc<D::View> {
        self.delegate.view()
    }

    pub fn history(&self) -> &D::History {
        self.delegate.history()
    }

    /// The history's current location
    pub fn location(&self) -> Location {
        self.history().location()
    }

    pub fn foreground(&self) -> &Foreground {
        &self.foreground
    }

    pub fn current_visit(&self) -> Option<&Visit> {
        match &self.foreground {
            Foreground::Visit(visit) => Some(visit),
            _ => None,
        }
    }

    pub fn foreground_submission(&self) -> Option<&FormSubmission> {
        match &self.foreground {
            Foreground::FormSubmission(submission) => Some(submission),
            _ => None,
        }
    }

    pub fn background_submissions(&self) -> impl Iterator<Item = &FormSubmission> {
        self.background.values()
    }

    /// Submissions that turned into a visit and have not reported `Finished` yet
    pub fn finishing_submissions(&self) -> impl Iterator<Item = &FormSubmission> {
        self.finishing.values()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Nothing in the foreground and no submission still expected to report
    pub fn is_idle(&self) -> bool {
        self.foreground.is_idle() && self.background.is_empty() && self.finishing.is_empty()
    }

    // === Event pump ===

    pub async fn next_event(&mut self) -> Option<NavigatorEvent> {
        self.events_rx.recv().await
    }

    /// Wait for one event and apply it.
    ///
    /// The navigator keeps a sender of its own, so the channel never closes
    /// and this only returns `false` if it is dropped mid-call. Every task
    /// reports a terminal event even when its fetcher or view panics, which
    /// is what lets `run_until_idle` terminate.
    pub async fn step(&mut self) -> bool {
        match self.next_event().await {
            Some(event) => {
                self.dispatch(event);
                true
            }
            None => false,
        }
    }

    /// Apply every event already queued, without waiting. Returns how many.
    pub fn drain(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.dispatch(event);
            applied += 1;
        }
        applied
    }

    pub async fn run_until_idle(&mut self) {
        while !self.is_idle() {
            if !self.step().await {
                break;
            }
        }
    }

    pub fn dispatch(&mut self, event: NavigatorEvent) {
        match event {
            NavigatorEvent::Visit(message) => self.dispatch_visit(message),
            NavigatorEvent::FormSubmission(message) => self.dispatch_form_submission(message),
        }
    }

    fn dispatch_visit(&mut self, message: VisitMessage) {
        let mut visit = match std::mem::take(&mut self.foreground) {
            Foreground::Visit(visit)
                if visit.id() == message.visit_id && visit.generation() == self.generation =>
            {
                visit
            }
            other => {
                self.foreground = other;
                tracing::trace!(
                    visit_id = %message.visit_id,
                    event = message.event.as_str(),
                    "Dropping event from superseded visit"
                );
                return;
            }
        };

        if let Err(e) = visit.apply(&message.event) {
            tracing::warn!(visit_id = %visit.id(), error = %e, "Rejected visit event");
            self.foreground = Foreground::Visit(visit);
            return;
        }

        match &message.event {
            VisitEvent::Started => {
                self.visit_started(&visit);
                self.foreground = Foreground::Visit(visit);
            }
            // Terminal: the visit is released here
            VisitEvent::Completed => self.visit_completed(&visit),
            VisitEvent::Failed(error) => self.visit_failed(&visit, error),
        }
    }

    fn dispatch_form_submission(&mut self, message: FormSubmissionMessage) {
        let Some(mut submission) = self.take_submission(message.submission_id) else {
            tracing::trace!(
                submission_id = %message.submission_id,
                event = message.event.as_str(),
                "Dropping event from stopped form submission"
            );
            return;
        };

        if let Err(e) = submission.apply(&message.event) {
            tracing::warn!(submission_id = %submission.id(), error = %e, "Rejected form submission event");
            self.restore_submission(submission);
            return;
        }

        match &message.event {
            FormSubmissionEvent::Started => self.form_submission_started(&submission),
            FormSubmissionEvent::SucceededWithResponse(response) => {
                self.form_submission_succeeded_with_response(&submission, response)
            }
            FormSubmissionEvent::FailedWithResponse(response) => {
                self.form_submission_failed_with_response(&submission, response)
            }
            FormSubmissionEvent::Errored(error) => self.form_submission_errored(&submission, error),
            // Terminal: not putting it back releases its slot
            FormSubmissionEvent::Finished => {
                self.form_submission_finished(&submission);
                return;
            }
        }

        self.restore_submission(submission);
    }

    /// Remove a live submission from its slot so it can be handed to observers.
    fn take_submission(&mut self, id: SubmissionId) -> Option<FormSubmission> {
        if let Some(submission) = self.background.remove(&id) {
            return Some(submission);
        }
        if let Some(submission) = self.finishing.remove(&id) {
            return Some(submission);
        }

        match std::mem::take(&mut self.foreground) {
            Foreground::FormSubmission(submission)
                if submission.id() == id && submission.generation() == self.generation =>
            {
                Some(submission)
            }
            other => {
                self.foreground = other;
                None
            }
        }
    }

    fn restore_submission(&mut self, submission: FormSubmission) {
        if submission.is_background() {
            self.background.insert(submission.id(), submission);
        } else if self.foreground.is_idle() && submission.generation() == self.generation {
            self.foreground = Foreground::FormSubmission(submission);
        } else {
            // Replaced by the visit it produced; it still owes `Finished`
            self.finishing.insert(submission.id(), submission);
        }
    }

    fn is_current_foreground(&self, submission: &FormSubmission) -> bool {
        !submission.is_background() && submission.generation() == self.generation
    }

    fn start_visit(
        &mut self,
        location: Location,
        restoration_identifier: RestorationIdentifier,
        options: VisitOptions,
    ) {
        self.stop();
        self.generation += 1;

        let options = options.with_referrer(Some(self.location()));
        let mut visit = Visit::new(self.generation, location, restoration_identifier, options);

        let view: Arc<dyn stride_visit::View> = self.delegate.view().clone();
        if let Err(e) = visit.start(self.fetcher.clone(), view, self.events_tx.clone()) {
            tracing::warn!(visit_id = %visit.id(), error = %e, "Failed to start visit");
            return;
        }

        self.foreground = Foreground::Visit(visit);
    }
}

impl<D: NavigatorDelegate> VisitObserver for Navigator<D> {
    fn visit_started(&mut self, visit: &Visit) {
        self.delegate.visit_started(visit);
    }

    fn visit_completed(&mut self, visit: &Visit) {
        self.delegate.visit_completed(visit);
    }

    fn visit_failed(&mut self, visit: &Visit, error: &VisitError) {
        self.issues.report(NavigationIssue::VisitFailed { visit, error });
    }
}

impl<D: NavigatorDelegate> FormSubmissionObserver for Navigator<D> {
    fn form_submission_started(&mut self, submission: &FormSubmission) {
        tracing::debug!(submission_id = %submission.id(), "Form submission under way");
    }

    fn form_submission_succeeded_with_response(
        &mut self,
        submission: &FormSubmission,
        response: &FetchResponse,
    ) {
        if !self.is_current_foreground(submission) {
            tracing::debug!(
                submission_id = %submission.id(),
                background = submission.is_background(),
                "Not rendering response of non-current form submission"
            );
            return;
        }

        match response.response_html() {
            Some(html) => {
                let options = VisitOptions::default().with_response(html);
                self.start_visit(
                    response.location().clone(),
                    RestorationIdentifier::new(),
                    options,
                );
            }
            None => {
                tracing::debug!(
                    submission_id = %submission.id(),
                    location = %response.location(),
                    "Form submission response has no renderable content"
                );
            }
        }
    }

    fn form_submission_failed_with_response(
        &mut self,
        submission: &FormSubmission,
        response: &FetchResponse,
    ) {
        self.issues.report(NavigationIssue::SubmissionFailed {
            submission,
            response,
        });
    }

    fn form_submission_errored(&mut self, submission: &FormSubmission, error: &FetchError) {
        self.issues
            .report(NavigationIssue::SubmissionErrored { submission, error });
    }

    fn form_submission_finished(&mut self, submission: &FormSubmission) {
        tracing::debug!(
            submission_id = %submission.id(),
            background = submission.is_background(),
            pending = self.background.len(),
            "Form submission finished"
        );
    }
}
