//! Login flow controller.
//!
//! Per confirm press: emit `Loading`, snapshot the fields, validate, submit
//! when valid, classify, and deliver exactly one terminal event. A newer press
//! supersedes an older one at any stage.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use crate::classifier::{classify_submission, classify_validation, submission_failure_kind, validation_failure_kind};
use crate::config::FlowConfig;
use crate::domain::{Credentials, FailureKind, FlowEvent};
use crate::flow::field::TextField;
use crate::flow::latest::LatestTask;
use crate::flow::projection::Projection;
use crate::service::CredentialService;
use crate::validation::{FieldSnapshot, FieldValidator, ValidationRule};

pub const EMAIL_LABEL: &str = "Email";
pub const PASSWORD_LABEL: &str = "Password";

/// What the view feeds into the flow
pub struct LoginInput {
    pub email: TextField,
    pub password: TextField,
    /// One `()` per confirm press; closing it stops the flow
    pub confirm: mpsc::Receiver<()>,
}

/// What the view subscribes to
pub struct LoginOutput {
    /// Fires once per successful login
    pub success: Projection<()>,
    /// Displayable message per failed action
    pub failure: Projection<String>,
    /// Fires as soon as confirm is pressed
    pub loading: Projection<()>,
    /// Every consumer-visible event in order
    pub events: Projection<FlowEvent>,
    /// The driver task; finishes once the confirm stream has closed and the
    /// last action has ended
    pub driver: JoinHandle<()>,
}

/// Immutable copy of the login form taken when confirm was pressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginSnapshot {
    pub email: FieldSnapshot,
    pub password: FieldSnapshot,
}

impl LoginSnapshot {
    /// Read both fields and attach their labels and rules
    pub fn capture(email: &TextField, password: &TextField) -> Self {
        Self {
            email: FieldSnapshot::new(EMAIL_LABEL, email.value(), ValidationRule::Email),
            password: FieldSnapshot::new(PASSWORD_LABEL, password.value(), ValidationRule::NonEmpty),
        }
    }

    /// Fields in evaluation order
    pub fn fields(&self) -> Vec<FieldSnapshot> {
        vec![self.email.clone(), self.password.clone()]
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.email.raw_value, &self.password.raw_value)
    }
}

/// Builds login flows over a validator and a credential service.
pub struct LoginFlowController<V, S> {
    validator: Arc<V>,
    service: Arc<S>,
    config: FlowConfig,
}

impl<V, S> LoginFlowController<V, S>
where
    V: FieldValidator + 'static,
    S: CredentialService + 'static,
{
    pub fn new(validator: Arc<V>, service: Arc<S>) -> Self {
        Self {
            validator,
            service,
            config: FlowConfig::default(),
        }
    }

    /// Use custom channel sizes
    pub fn with_config(mut self, config: FlowConfig) -> Self {
        self.config = config;
        self
    }

    /// Wire `input` to a new flow and return its outputs.
    ///
    /// Must be called inside a tokio runtime. All projections are subscribed
    /// before the driver starts, so none of them misses the first action.
    pub fn transform(&self, input: LoginInput) -> LoginOutput {
        let (events_tx, events_rx) = broadcast::channel::<FlowEvent>(self.config.event_capacity.max(1));
        let (results_tx, results_rx) = mpsc::channel(self.config.result_capacity.max(1));

        let success = Projection::new("success", events_tx.subscribe(), |event| {
            event.is_login_succeeded().then_some(())
        });
        let failure = Projection::new("failure", events_tx.subscribe(), |event| match event {
            FlowEvent::Failed(message) => Some(message),
            _ => None,
        });
        let loading = Projection::new("loading", events_tx.subscribe(), |event| event.is_loading().then_some(()));
        let events = Projection::new("events", events_rx, Some);

        let driver = LoginDriver {
            validator: Arc::clone(&self.validator),
            service: Arc::clone(&self.service),
            email: input.email,
            password: input.password,
            events: events_tx,
            results: results_tx,
            action: LatestTask::new(),
        };
        let driver = tokio::spawn(driver.run(input.confirm, results_rx));

        LoginOutput {
            success,
            failure,
            loading,
            events,
            driver,
        }
    }
}

/// Owns the per-flow state; only ever touched from its own task.
struct LoginDriver<V, S> {
    validator: Arc<V>,
    service: Arc<S>,
    email: TextField,
    password: TextField,
    events: broadcast::Sender<FlowEvent>,
    results: mpsc::Sender<(u64, ActionOutcome)>,
    action: LatestTask,
}

impl<V, S> LoginDriver<V, S>
where
    V: FieldValidator + 'static,
    S: CredentialService + 'static,
{
    async fn run(mut self, mut confirm: mpsc::Receiver<()>, mut results: mpsc::Receiver<(u64, ActionOutcome)>) {
        tracing::debug!("Login flow started");
        let mut accepting = true;
        // After confirm closes, the last action still gets to finish
        while accepting || self.action.is_pending() {
            tokio::select! {
                // A press that is already queued supersedes a result that is
                // ready at the same time.
                biased;
                pressed = confirm.recv(), if accepting => match pressed {
                    Some(()) => self.start_action(),
                    None => accepting = false,
                },
                Some((generation, outcome)) = results.recv() => self.finish_action(generation, outcome),
            }
        }
        tracing::debug!("Login flow stopped");
    }

    fn start_action(&mut self) {
        let snapshot = LoginSnapshot::capture(&self.email, &self.password);
        self.emit(FlowEvent::Loading);

        let validator = Arc::clone(&self.validator);
        let service = Arc::clone(&self.service);
        let results = self.results.clone();

        let generation = self.action.replace(move |generation| async move {
            let outcome = AssertUnwindSafe(run_action(validator.as_ref(), service.as_ref(), snapshot))
                .catch_unwind()
                .await
                .unwrap_or_else(|_| {
                    tracing::error!(generation, "Login action panicked");
                    ActionOutcome::fault()
                });
            // Driver gone means the flow stopped
            let _ = results.send((generation, outcome)).await;
        });
        tracing::debug!(generation, "Confirm pressed, action started");
    }

    fn finish_action(&mut self, generation: u64, outcome: ActionOutcome) {
        let ActionOutcome { event, failure } = outcome;
        if !self.action.is_current(generation) {
            tracing::debug!(generation, kind = event.kind(), "Dropping result of superseded action");
            return;
        }
        let (event, failure) = if event.is_terminal() {
            (event, failure)
        } else {
            tracing::error!(generation, kind = event.kind(), "Action ended without a terminal event");
            (FlowEvent::unknown_error(), Some(FailureKind::Unknown))
        };
        self.action.cancel();
        tracing::info!(generation, kind = event.kind(), ?failure, "Login action finished");
        self.emit(event);
    }

    fn emit(&self, event: FlowEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}

/// Terminal event of an action plus where its failure came from.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ActionOutcome {
    event: FlowEvent,
    failure: Option<FailureKind>,
}

impl ActionOutcome {
    /// A collaborator faulted instead of answering
    fn fault() -> Self {
        Self {
            event: FlowEvent::unknown_error(),
            failure: Some(FailureKind::Unknown),
        }
    }
}

/// Validation then, if it passed, submission. Always ends in a terminal event.
async fn run_action<V, S>(validator: &V, service: &S, snapshot: LoginSnapshot) -> ActionOutcome
where
    V: FieldValidator + ?Sized,
    S: CredentialService + ?Sized,
{
    let validation = match validator.validate(&snapshot.fields()).await {
        Ok(result) => result,
        Err(e) => {
            tracing::warn!(error = %e, "Validation call failed");
            return ActionOutcome::fault();
        }
    };
    let failure = validation_failure_kind(&validation);
    let event = classify_validation(validation);
    if !event.is_validation_passed() {
        return ActionOutcome { event, failure };
    }

    let status = match service.submit(&snapshot.credentials()).await {
        Ok(status) => status,
        Err(e) => {
            tracing::warn!(error = %e, "Submission call failed");
            return ActionOutcome::fault();
        }
    };
    ActionOutcome {
        failure: submission_failure_kind(&status),
        event: classify_submission(status),
    }
}
