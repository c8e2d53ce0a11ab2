//! Login flow integration tests
//!
//! Drives the public flow API with scripted collaborators.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use loginflow::domain::{Credentials, FlowEvent, SubmissionStatus};
use loginflow::error::{LoginFlowError, Result};
use loginflow::flow::{LoginFlowController, LoginInput, LoginOutput, Projection, TextField};
use loginflow::service::{CredentialService, Directory};
use loginflow::validation::{FieldSnapshot, FieldValidator, RuleValidator, ValidationResult};

/// What a scripted submission does
enum Reply {
    Status(SubmissionStatus),
    Hang,
    Fault,
    Panic,
    Delayed(Duration, SubmissionStatus),
}

/// Credential service answering from a script, one reply per call.
/// Once the script runs out, every call answers `Ok`.
#[derive(Default)]
struct ScriptedService {
    replies: Mutex<VecDeque<Reply>>,
    calls: AtomicUsize,
    seen: Mutex<Vec<Credentials>>,
}

impl ScriptedService {
    fn new(replies: Vec<Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            ..Default::default()
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialService for ScriptedService {
    async fn submit(&self, credentials: &Credentials) -> Result<SubmissionStatus> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(credentials.clone());
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Reply::Status(SubmissionStatus::Ok));
        match reply {
            Reply::Status(status) => Ok(status),
            Reply::Hang => std::future::pending().await,
            Reply::Fault => Err(LoginFlowError::Transport("connection reset".to_string())),
            Reply::Panic => panic!("service blew up"),
            Reply::Delayed(delay, status) => {
                tokio::time::sleep(delay).await;
                Ok(status)
            }
        }
    }
}

struct Form {
    email: TextField,
    password: TextField,
    confirm: mpsc::Sender<()>,
    output: LoginOutput,
}

impl Form {
    async fn press(&self) {
        self.confirm.send(()).await.unwrap();
    }
}

fn form<V: FieldValidator + 'static>(validator: V, service: Arc<ScriptedService>, email: &str, password: &str) -> Form {
    let email = TextField::new(email);
    let password = TextField::new(password);
    let (confirm, confirm_rx) = mpsc::channel(8);
    let output = LoginFlowController::new(Arc::new(validator), service).transform(LoginInput {
        email: email.clone(),
        password: password.clone(),
        confirm: confirm_rx,
    });
    Form {
        email,
        password,
        confirm,
        output,
    }
}

async fn next<T, E: Clone>(projection: &mut Projection<T, E>) -> T {
    tokio::time::timeout(Duration::from_secs(2), projection.recv())
        .await
        .expect("timed out waiting for event")
        .expect("flow stopped")
}

/// Asserts nothing else arrives within a short window
async fn assert_quiet<T: std::fmt::Debug, E: Clone>(projection: &mut Projection<T, E>) {
    if let Ok(Some(value)) = tokio::time::timeout(Duration::from_millis(100), projection.recv()).await {
        panic!("unexpected {} event: {:?}", projection.name(), value);
    }
}

#[tokio::test]
async fn test_success_scenario() {
    let service = ScriptedService::new(vec![Reply::Status(SubmissionStatus::Ok)]);
    let mut form = form(RuleValidator::new(), Arc::clone(&service), "user@test.com", "pw");

    form.press().await;
    next(&mut form.output.loading).await;
    next(&mut form.output.success).await;
    assert_quiet(&mut form.output.failure).await;
    assert_eq!(service.seen.lock().unwrap()[0], Credentials::new("user@test.com", "pw"));
}

#[tokio::test]
async fn test_wrong_password_scenario() {
    let service = ScriptedService::new(vec![Reply::Status(SubmissionStatus::Unauthorized)]);
    let mut form = form(RuleValidator::new(), service, "user@test.com", "pw");

    form.press().await;
    assert_eq!(next(&mut form.output.failure).await, "Wrong password");
    assert_quiet(&mut form.output.success).await;
}

#[tokio::test]
async fn test_unknown_email_and_other_status() {
    let service = ScriptedService::new(vec![
        Reply::Status(SubmissionStatus::NotFound),
        Reply::Status(SubmissionStatus::Other("Account locked".to_string())),
    ]);
    let mut form = form(RuleValidator::new(), service, "user@test.com", "pw");

    form.press().await;
    assert_eq!(next(&mut form.output.failure).await, "Email does not exist");
    form.press().await;
    assert_eq!(next(&mut form.output.failure).await, "Account locked");
}

#[tokio::test]
async fn test_empty_password_never_submits() {
    let service = ScriptedService::new(vec![]);
    let mut form = form(RuleValidator::new(), Arc::clone(&service), "user@test.com", "");

    form.press().await;
    assert_eq!(next(&mut form.output.events).await, FlowEvent::Loading);
    assert_eq!(
        next(&mut form.output.events).await,
        FlowEvent::Failed("Password is required".to_string())
    );
    assert_eq!(next(&mut form.output.failure).await, "Password is required");
    assert_eq!(service.calls(), 0);
}

#[tokio::test]
async fn test_repeated_presses_each_succeed_once() {
    let service = ScriptedService::new(vec![]);
    let mut form = form(RuleValidator::new(), Arc::clone(&service), "user@test.com", "pw");

    for _ in 0..3 {
        form.press().await;
        assert_eq!(next(&mut form.output.events).await, FlowEvent::Loading);
        assert_eq!(next(&mut form.output.events).await, FlowEvent::LoginSucceeded);
    }
    assert_quiet(&mut form.output.events).await;

    let mut successes = 0;
    while form.output.success.try_recv().is_some() {
        successes += 1;
    }
    assert_eq!(successes, 3);
    assert_eq!(service.calls(), 3);
}

#[tokio::test]
async fn test_latest_press_wins_over_hung_submission() {
    let service = ScriptedService::new(vec![Reply::Hang, Reply::Status(SubmissionStatus::Ok)]);
    let mut form = form(RuleValidator::new(), Arc::clone(&service), "user@test.com", "pw");

    form.press().await;
    // The first action must be stuck in submission before it is superseded
    while service.calls() == 0 {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    form.press().await;

    assert_eq!(next(&mut form.output.events).await, FlowEvent::Loading);
    assert_eq!(next(&mut form.output.events).await, FlowEvent::Loading);
    assert_eq!(next(&mut form.output.events).await, FlowEvent::LoginSucceeded);
    assert_quiet(&mut form.output.events).await;
}

#[tokio::test]
async fn test_superseded_result_is_dropped() {
    // The first answer would arrive later than the second
    let service = ScriptedService::new(vec![
        Reply::Delayed(Duration::from_millis(200), SubmissionStatus::Unauthorized),
        Reply::Status(SubmissionStatus::Ok),
    ]);
    let mut form = form(RuleValidator::new(), Arc::clone(&service), "user@test.com", "pw");

    form.press().await;
    next(&mut form.output.loading).await;
    // Wait until the first submission is in flight before superseding it
    while service.calls() == 0 {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    form.press().await;

    next(&mut form.output.success).await;
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(form.output.failure.try_recv(), None);
}

#[tokio::test]
async fn test_snapshot_is_taken_at_press_time() {
    let service = ScriptedService::new(vec![Reply::Delayed(
        Duration::from_millis(50),
        SubmissionStatus::Ok,
    )]);
    let mut form = form(RuleValidator::new(), Arc::clone(&service), "user@test.com", "pw");

    form.press().await;
    next(&mut form.output.loading).await;
    form.email.set("someone@else.com");
    form.password.set("changed");
    next(&mut form.output.success).await;

    assert_eq!(service.seen.lock().unwrap()[0], Credentials::new("user@test.com", "pw"));
}

#[tokio::test]
async fn test_submission_fault_becomes_unknown_error_and_flow_survives() {
    let service = ScriptedService::new(vec![Reply::Fault, Reply::Status(SubmissionStatus::Ok)]);
    let mut form = form(RuleValidator::new(), service, "user@test.com", "pw");

    form.press().await;
    assert_eq!(next(&mut form.output.failure).await, "Unknown error");

    form.press().await;
    next(&mut form.output.success).await;
}

#[tokio::test]
async fn test_submission_panic_becomes_unknown_error_and_flow_survives() {
    let service = ScriptedService::new(vec![Reply::Panic, Reply::Status(SubmissionStatus::Ok)]);
    let mut form = form(RuleValidator::new(), service, "user@test.com", "pw");

    form.press().await;
    assert_eq!(next(&mut form.output.failure).await, "Unknown error");

    form.press().await;
    next(&mut form.output.success).await;
}

struct FlakyValidator {
    calls: AtomicUsize,
}

#[async_trait]
impl FieldValidator for FlakyValidator {
    async fn validate(&self, fields: &[FieldSnapshot]) -> Result<ValidationResult> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            return Err(LoginFlowError::Validation("rules not loaded".to_string()));
        }
        Ok(RuleValidator::check_all(fields))
    }
}

#[tokio::test]
async fn test_validator_fault_becomes_unknown_error() {
    let service = ScriptedService::new(vec![]);
    let validator = FlakyValidator {
        calls: AtomicUsize::new(0),
    };
    let mut form = form(validator, Arc::clone(&service), "user@test.com", "pw");

    form.press().await;
    assert_eq!(next(&mut form.output.failure).await, "Unknown error");
    assert_eq!(service.calls(), 0);

    form.press().await;
    next(&mut form.output.success).await;
}

/// First call takes a while and rejects the form; later calls check the rules.
struct SlowFirstValidator {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl FieldValidator for SlowFirstValidator {
    async fn validate(&self, fields: &[FieldSnapshot]) -> Result<ValidationResult> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            tokio::time::sleep(Duration::from_millis(200)).await;
            return Ok(ValidationResult::invalid("stale"));
        }
        Ok(RuleValidator::check_all(fields))
    }
}

#[tokio::test]
async fn test_latest_press_wins_over_pending_validation() {
    let service = ScriptedService::new(vec![Reply::Status(SubmissionStatus::Ok)]);
    let calls = Arc::new(AtomicUsize::new(0));
    let validator = SlowFirstValidator {
        calls: Arc::clone(&calls),
    };
    let mut form = form(validator, Arc::clone(&service), "user@test.com", "pw");

    form.press().await;
    // The first action must be inside validation before it is superseded
    while calls.load(Ordering::SeqCst) == 0 {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    form.press().await;

    assert_eq!(next(&mut form.output.events).await, FlowEvent::Loading);
    assert_eq!(next(&mut form.output.events).await, FlowEvent::Loading);
    assert_eq!(next(&mut form.output.events).await, FlowEvent::LoginSucceeded);

    // Outlive the first validation so a leaked result would have shown up
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(form.output.failure.try_recv(), None);
    assert_quiet(&mut form.output.events).await;
    assert_eq!(service.calls(), 1);
}

#[tokio::test]
async fn test_closing_confirm_lets_last_action_finish() {
    let service = ScriptedService::new(vec![Reply::Delayed(
        Duration::from_millis(50),
        SubmissionStatus::Ok,
    )]);
    let Form {
        confirm, mut output, ..
    } = form(RuleValidator::new(), service, "user@test.com", "pw");

    confirm.send(()).await.unwrap();
    drop(confirm);

    next(&mut output.success).await;
    tokio::time::timeout(Duration::from_secs(2), output.driver)
        .await
        .expect("driver did not stop")
        .unwrap();
    assert_eq!(output.success.recv().await, None);
}

#[tokio::test]
async fn test_with_directory_service() {
    let directory = Arc::new(Directory::new().with_account("user@test.com", "pw"));
    let (confirm, confirm_rx) = mpsc::channel(4);
    let email = TextField::new("user@test.com");
    let password = TextField::new("wrong");
    let mut output = LoginFlowController::new(Arc::new(RuleValidator::new()), Arc::clone(&directory)).transform(
        LoginInput {
            email: email.clone(),
            password: password.clone(),
            confirm: confirm_rx,
        },
    );

    confirm.send(()).await.unwrap();
    assert_eq!(next(&mut output.failure).await, "Wrong password");

    password.set("pw");
    confirm.send(()).await.unwrap();
    next(&mut output.success).await;
    assert_eq!(directory.current_user().unwrap(), Some("user@test.com".to_string()));
}
