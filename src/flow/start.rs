//! Start screen controller.
//!
//! Maps the start screen's buttons to navigation transitions and runs logout,
//! keeping only the latest logout press.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use crate::config::FlowConfig;
use crate::domain::Scene;
use crate::flow::latest::LatestTask;
use crate::flow::projection::Projection;
use crate::service::SessionService;

/// Button presses from the start screen
pub struct StartScreenInput {
    pub dashboard_pressed: mpsc::Receiver<()>,
    pub login_pressed: mpsc::Receiver<()>,
    pub logout_pressed: mpsc::Receiver<()>,
}

/// What the start screen subscribes to
pub struct StartScreenOutput {
    /// Scene to navigate to, one per login/dashboard press
    pub transition: Projection<Scene, Scene>,
    /// Fires when a logout finished, whether or not it succeeded
    pub logout: Projection<(), ()>,
    /// Finishes once every button stream closed and no logout is in flight
    pub driver: JoinHandle<()>,
}

pub struct StartScreenController<S> {
    session: Arc<S>,
    config: FlowConfig,
}

impl<S> StartScreenController<S>
where
    S: SessionService + 'static,
{
    pub fn new(session: Arc<S>) -> Self {
        Self {
            session,
            config: FlowConfig::default(),
        }
    }

    pub fn with_config(mut self, config: FlowConfig) -> Self {
        self.config = config;
        self
    }

    /// Whether a user is logged in; a failing session service counts as no.
    pub async fn is_logged_in(&self) -> bool {
        match self.session.is_user_logged_in().await {
            Ok(logged_in) => logged_in,
            Err(e) => {
                tracing::warn!(error = %e, "Session check failed");
                false
            }
        }
    }

    /// Wire the buttons to a new driver and return its outputs.
    pub fn transform(&self, input: StartScreenInput) -> StartScreenOutput {
        let capacity = self.config.event_capacity.max(1);
        let (transition_tx, transition_rx) = broadcast::channel::<Scene>(capacity);
        let (logout_tx, logout_rx) = broadcast::channel::<()>(capacity);
        let (results_tx, results_rx) = mpsc::channel(self.config.result_capacity.max(1));

        let driver = StartScreenDriver {
            session: Arc::clone(&self.session),
            transitions: transition_tx,
            logouts: logout_tx,
            results: results_tx,
            logout: LatestTask::new(),
        };
        let driver = tokio::spawn(driver.run(input, results_rx));

        StartScreenOutput {
            transition: Projection::new("transition", transition_rx, Some),
            logout: Projection::new("logout", logout_rx, Some),
            driver,
        }
    }
}

struct StartScreenDriver<S> {
    session: Arc<S>,
    transitions: broadcast::Sender<Scene>,
    logouts: broadcast::Sender<()>,
    results: mpsc::Sender<u64>,
    logout: LatestTask,
}

impl<S> StartScreenDriver<S>
where
    S: SessionService + 'static,
{
    async fn run(mut self, input: StartScreenInput, mut results: mpsc::Receiver<u64>) {
        let StartScreenInput {
            mut dashboard_pressed,
            mut login_pressed,
            mut logout_pressed,
        } = input;
        let (mut dashboard_open, mut login_open, mut logout_open) = (true, true, true);

        while dashboard_open || login_open || logout_open || self.logout.is_pending() {
            tokio::select! {
                biased;
                pressed = logout_pressed.recv(), if logout_open => match pressed {
                    Some(()) => self.start_logout(),
                    None => logout_open = false,
                },
                pressed = login_pressed.recv(), if login_open => match pressed {
                    Some(()) => self.navigate(Scene::Login),
                    None => login_open = false,
                },
                pressed = dashboard_pressed.recv(), if dashboard_open => match pressed {
                    Some(()) => self.navigate(Scene::Dashboard),
                    None => dashboard_open = false,
                },
                Some(generation) = results.recv() => self.finish_logout(generation),
            }
        }
        tracing::debug!("Start screen stopped");
    }

    fn navigate(&self, scene: Scene) {
        tracing::debug!(%scene, "Transition requested");
        let _ = self.transitions.send(scene);
    }

    fn start_logout(&mut self) {
        let session = Arc::clone(&self.session);
        let results = self.results.clone();
        let generation = self.logout.replace(move |generation| async move {
            if let Err(e) = session.logout().await {
                tracing::warn!(generation, error = %e, "Logout failed");
            }
            let _ = results.send(generation).await;
        });
        tracing::debug!(generation, "Logout started");
    }

    fn finish_logout(&mut self, generation: u64) {
        if !self.logout.is_current(generation) {
            tracing::debug!(generation, "Dropping result of superseded logout");
            return;
        }
        self.logout.cancel();
        let _ = self.logouts.send(());
    }
}
