//! Form submission and its drive task

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use uuid::Uuid;

use stride_fetch::{FetchError, FetchRequest, Fetcher};

use crate::error::FormError;
use crate::event::{FormSubmissionEvent, FormSubmissionMessage};
use crate::form::Form;
use crate::state::FormSubmissionState;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionId(Uuid);

impl SubmissionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubmissionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug)]
pub struct FormSubmission {
    id: SubmissionId,
    /// Foreground generation at creation; meaningless for background submissions
    generation: u64,
    form: Form,
    background: bool,
    state: FormSubmissionState,
    created_at: DateTime<Utc>,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
    control: Option<watch::Sender<bool>>,
}

impl FormSubmission {
    pub fn new(generation: u64, form: Form, background: bool) -> Self {
        Self {
            id: SubmissionId::new(),
            generation,
            form,
            background,
            state: FormSubmissionState::Initialized,
            created_at: Utc::now(),
            started_at: None,
            finished_at: None,
            control: None,
        }
    }

    pub fn id(&self) -> SubmissionId {
        self.id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn is_background(&self) -> bool {
        self.background
    }

    pub fn state(&self) -> FormSubmissionState {
        self.state
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    fn transition_to(&mut self, new_state: FormSubmissionState) -> Result<()> {
        if !self.state.can_transition_to(new_state) {
            return Err(FormError::InvalidTransition {
                from: self.state.to_string(),
                to: new_state.to_string(),
            });
        }

        tracing::debug!(
            submission_id = %self.id,
            from = %self.state,
            to = %new_state,
            "Form submission state transition"
        );

        self.state = new_state;
        Ok(())
    }

    /// Send the form.
    ///
    /// Spawns the drive task on the current Tokio runtime.
    pub fn start<E>(&mut self, fetcher: Arc<dyn Fetcher>, events: mpsc::UnboundedSender<E>) -> Result<()>
    where
        E: From<FormSubmissionMessage> + Send + 'static,
    {
        self.transition_to(FormSubmissionState::Requesting)?;
        self.started_at = Some(Utc::now());

        let (tx, rx) = watch::channel(false);
        self.control = Some(tx);

        tracing::info!(
            submission_id = %self.id,
            form = %self.form.label(),
            method = %self.form.method.as_str(),
            background = self.background,
            "Started form submission"
        );

        tokio::spawn(drive_submission(
            self.id,
            self.form.to_fetch_request(),
            fetcher,
            rx,
            events,
        ));

        Ok(())
    }

    /// Stop an in-progress submission. Nothing further is reported for it.
    ///
    /// Returns `false` when it had not started or was already done.
    pub fn stop(&mut self) -> bool {
        if self.transition_to(FormSubmissionState::Stopped).is_err() {
            return false;
        }

        if let Some(control) = self.control.take() {
            let _ = control.send(true);
        }
        self.finished_at = Some(Utc::now());

        tracing::info!(submission_id = %self.id, form = %self.form.label(), "Stopped form submission");
        true
    }

    /// Apply a reported event to the state machine.
    pub fn apply(&mut self, event: &FormSubmissionEvent) -> Result<()> {
        match event {
            FormSubmissionEvent::Started if self.state == FormSubmissionState::Requesting => Ok(()),
            FormSubmissionEvent::Started => Err(FormError::InvalidTransition {
                from: self.state.to_string(),
                to: FormSubmissionState::Requesting.to_string(),
            }),
            FormSubmissionEvent::SucceededWithResponse(_)
            | FormSubmissionEvent::FailedWithResponse(_)
            | FormSubmissionEvent::Errored(_) => self.transition_to(FormSubmissionState::Receiving),
            FormSubmissionEvent::Finished => {
                self.transition_to(FormSubmissionState::Finished)?;
                self.finished_at = Some(Utc::now());
                self.control = None;
                Ok(())
            }
        }
    }
}

async fn drive_submission<E>(
    submission_id: SubmissionId,
    request: FetchRequest,
    fetcher: Arc<dyn Fetcher>,
    mut control: watch::Receiver<bool>,
    events: mpsc::UnboundedSender<E>,
) where
    E: From<FormSubmissionMessage>,
{
    let mut reporter = Reporter {
        submission_id,
        control: control.clone(),
        events,
        answered: false,
        finished: false,
    };

    reporter.emit(FormSubmissionEvent::Started);

    let outcome = tokio::select! {
        _ = stopped(&mut control) => return,
        outcome = fetcher.fetch(request) => outcome,
    };

    let event = match outcome {
        Ok(response) if response.succeeded() => FormSubmissionEvent::SucceededWithResponse(response),
        Ok(response) => FormSubmissionEvent::FailedWithResponse(response),
        Err(e) => FormSubmissionEvent::Errored(e),
    };

    tracing::debug!(
        submission_id = %submission_id,
        outcome = event.as_str(),
        "Form submission outcome"
    );

    reporter.emit(event);
    reporter.emit(FormSubmissionEvent::Finished);
}

/// Sends a submission's events unless it was stopped or dropped.
///
/// Dropping it before `Finished` was sent, e.g. when the fetcher panics,
/// reports `Errored(Aborted)` if no outcome went out yet, then `Finished`.
struct Reporter<E: From<FormSubmissionMessage>> {
    submission_id: SubmissionId,
    control: watch::Receiver<bool>,
    events: mpsc::UnboundedSender<E>,
    answered: bool,
    finished: bool,
}

impl<E: From<FormSubmissionMessage>> Reporter<E> {
    /// Stopped, or the owning `FormSubmission` is gone
    fn silenced(&self) -> bool {
        *self.control.borrow() || self.control.has_changed().is_err()
    }

    fn emit(&mut self, event: FormSubmissionEvent) {
        if self.silenced() {
            return;
        }
        match &event {
            FormSubmissionEvent::Started => {}
            FormSubmissionEvent::Finished => self.finished = true,
            _ => self.answered = true,
        }
        let _ = self.events.send(E::from(FormSubmissionMessage {
            submission_id: self.submission_id,
            event,
        }));
    }
}

impl<E: From<FormSubmissionMessage>> Drop for Reporter<E> {
    fn drop(&mut self) {
        if self.finished || self.silenced() {
            return;
        }
        tracing::warn!(
            submission_id = %self.submission_id,
            "Form submission task ended without finishing"
        );
        if !self.answered {
            self.emit(FormSubmissionEvent::Errored(FetchError::Aborted));
        }
        self.emit(FormSubmissionEvent::Finished);
    }
}

/// Resolves once the submission is stopped or its owner is gone.
async fn stopped(control: &mut watch::Receiver<bool>) {
    while !*control.borrow() {
        if control.changed().await.is_err() {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use stride_core::Location;
    use stride_fetch::{FetchMethod, FetchResponse};
    use tokio::sync::oneshot;

    /// Answers once the test releases the gate
    struct GatedFetcher {
        gate: Mutex<Option<oneshot::Receiver<stride_fetch::Result<FetchResponse>>>>,
        requests: Mutex<Vec<FetchRequest>>,
    }

    impl GatedFetcher {
        fn new() -> (Arc<Self>, oneshot::Sender<stride_fetch::Result<FetchResponse>>) {
            let (tx, rx) = oneshot::channel();
            let fetcher = Arc::new(Self {
                gate: Mutex::new(Some(rx)),
                requests: Mutex::new(Vec::new()),
            });
            (fetcher, tx)
        }
    }

    #[async_trait]
    impl Fetcher for GatedFetcher {
        async fn fetch(&self, request: FetchRequest) -> stride_fetch::Result<FetchResponse> {
            self.requests.lock().push(request);
            let gate = self.gate.lock().take();
            match gate {
                Some(rx) => rx
                    .await
                    .unwrap_or_else(|_| Err(FetchError::Transport("gate dropped".to_string()))),
                None => Err(FetchError::Transport("already fetched".to_string())),
            }
        }
    }

    struct PanickingFetcher;

    #[async_trait]
    impl Fetcher for PanickingFetcher {
        async fn fetch(&self, _request: FetchRequest) -> stride_fetch::Result<FetchResponse> {
            panic!("fetcher blew up")
        }
    }

    fn form() -> Form {
        Form::new(Location::parse("https://example.com/posts").unwrap())
            .with_method(crate::FormMethod::Post)
            .field("title", "Hi")
    }

    fn response(status: u16) -> FetchResponse {
        FetchResponse::html(Location::parse("https://example.com/posts/1").unwrap(), "<p>1</p>")
            .with_status(status)
    }

    async fn collect(mut rx: mpsc::UnboundedReceiver<FormSubmissionMessage>) -> Vec<FormSubmissionEvent> {
        let mut events = Vec::new();
        while let Some(message) = rx.recv().await {
            events.push(message.event);
        }
        events
    }

    #[tokio::test]
    async fn test_success_then_finished() {
        let (fetcher, gate) = GatedFetcher::new();
        let (tx, rx) = mpsc::unbounded_channel::<FormSubmissionMessage>();

        let mut submission = FormSubmission::new(1, form(), false);
        submission.start(fetcher.clone(), tx).unwrap();
        assert_eq!(submission.state(), FormSubmissionState::Requesting);

        gate.send(Ok(response(200))).unwrap();
        let events = collect(rx).await;
        assert_eq!(
            events,
            vec![
                FormSubmissionEvent::Started,
                FormSubmissionEvent::SucceededWithResponse(response(200)),
                FormSubmissionEvent::Finished,
            ]
        );

        let request = fetcher.requests.lock()[0].clone();
        assert_eq!(request.method, FetchMethod::Post);
        assert_eq!(request.body.as_deref(), Some("title=Hi"));

        for event in &events {
            submission.apply(event).unwrap();
        }
        assert_eq!(submission.state(), FormSubmissionState::Finished);
        assert!(submission.finished_at().is_some());
    }

    #[tokio::test]
    async fn test_server_failure_and_transport_error() {
        let (fetcher, gate) = GatedFetcher::new();
        let (tx, rx) = mpsc::unbounded_channel::<FormSubmissionMessage>();
        let mut rejected = FormSubmission::new(1, form(), true);
        rejected.start(fetcher, tx).unwrap();
        gate.send(Ok(response(422))).unwrap();
        assert_eq!(
            collect(rx).await,
            vec![
                FormSubmissionEvent::Started,
                FormSubmissionEvent::FailedWithResponse(response(422)),
                FormSubmissionEvent::Finished,
            ]
        );

        let (fetcher, gate) = GatedFetcher::new();
        let (tx, rx) = mpsc::unbounded_channel::<FormSubmissionMessage>();
        let mut errored = FormSubmission::new(1, form(), true);
        errored.start(fetcher, tx).unwrap();
        gate.send(Err(FetchError::Timeout)).unwrap();
        assert_eq!(
            collect(rx).await,
            vec![
                FormSubmissionEvent::Started,
                FormSubmissionEvent::Errored(FetchError::Timeout),
                FormSubmissionEvent::Finished,
            ]
        );
    }

    #[tokio::test]
    async fn test_stop_before_outcome_is_silent() {
        let (fetcher, gate) = GatedFetcher::new();
        let (tx, mut rx) = mpsc::unbounded_channel::<FormSubmissionMessage>();

        let mut submission = FormSubmission::new(1, form(), false);
        submission.start(fetcher, tx).unwrap();
        assert_eq!(rx.recv().await.unwrap().event, FormSubmissionEvent::Started);

        assert!(submission.stop());
        assert_eq!(submission.state(), FormSubmissionState::Stopped);

        // A late answer goes nowhere.
        let _ = gate.send(Ok(response(200)));
        assert!(rx.recv().await.is_none());

        assert!(!submission.stop());
        assert!(submission.apply(&FormSubmissionEvent::Finished).is_err());
    }

    #[tokio::test]
    async fn test_panicking_fetcher_still_finishes() {
        let (tx, rx) = mpsc::unbounded_channel::<FormSubmissionMessage>();
        let mut submission = FormSubmission::new(1, form(), false);
        submission.start(Arc::new(PanickingFetcher), tx).unwrap();

        let events = collect(rx).await;
        assert_eq!(
            events,
            vec![
                FormSubmissionEvent::Started,
                FormSubmissionEvent::Errored(FetchError::Aborted),
                FormSubmissionEvent::Finished,
            ]
        );
        for event in &events {
            submission.apply(event).unwrap();
        }
        assert_eq!(submission.state(), FormSubmissionState::Finished);
    }

    #[test]
    fn test_stop_before_start_is_noop() {
        let mut submission = FormSubmission::new(4, form(), false);
        assert!(!submission.stop());
        assert_eq!(submission.state(), FormSubmissionState::Initialized);
        assert_eq!(submission.generation(), 4);
        assert!(!submission.is_background());
    }
}
