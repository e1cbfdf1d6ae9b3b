//! Device action executor - validates and dispatches action requests

use super::handlers::{self, ActionPlan};
use crate::config::Settings;
use crate::transport::{DatagramConnector, HttpShutdownClient, ShutdownTransport, UdpConnector};
use anyhow::Result;
use power_remote_shared::state_machine::{
    is_valid_transition, ActionEvent, ActionStateMachine, TransitionResult,
};
use power_remote_shared::{
    ActionError, ActionKind, ActionOutcome, DeviceActionRequest, WidgetTrigger,
};
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{debug, error, info, warn};

/// Executes wake and shutdown requests.
///
/// Holds no per-invocation state: every call owns its own socket or
/// connection, so independent requests may run concurrently.
pub struct ActionExecutor<D, H> {
    settings: Settings,
    datagrams: Arc<D>,
    shutdown: Arc<H>,
}

impl<D, H> Clone for ActionExecutor<D, H> {
    fn clone(&self) -> Self {
        Self {
            settings: self.settings.clone(),
            datagrams: self.datagrams.clone(),
            shutdown: self.shutdown.clone(),
        }
    }
}

impl ActionExecutor<UdpConnector, HttpShutdownClient> {
    /// Create an executor backed by real UDP and HTTP transports
    pub fn from_settings(settings: Settings) -> Result<Self> {
        let shutdown = HttpShutdownClient::new(&settings.shutdown)?;
        Ok(Self::new(settings, UdpConnector::new(), shutdown))
    }
}

impl<D, H> ActionExecutor<D, H>
where
    D: DatagramConnector + 'static,
    H: ShutdownTransport + 'static,
{
    /// Create a new executor
    pub fn new(settings: Settings, datagrams: D, shutdown: H) -> Self {
        Self {
            settings,
            datagrams: Arc::new(datagrams),
            shutdown: Arc::new(shutdown),
        }
    }

    /// Run one request to completion and report how it ended
    pub async fn execute(&self, request: &DeviceActionRequest) -> ActionOutcome {
        info!("Executing {}", describe(request));

        let mut fsm = ActionStateMachine::new();
        advance(&mut fsm, ActionEvent::Started);

        let plan = match handlers::prepare(request) {
            Ok(plan) => plan,
            Err(err) => {
                advance(&mut fsm, ActionEvent::ValidationFailed);
                warn!("  Request rejected: {}", err);
                return err.into();
            }
        };
        advance(&mut fsm, ActionEvent::Validated);

        let result = match &plan {
            ActionPlan::Wake(wake) => {
                handlers::send_wake(&self.settings.wake, wake, self.datagrams.as_ref()).await
            }
            ActionPlan::Shutdown(shutdown) => {
                handlers::request_shutdown(shutdown, self.shutdown.as_ref()).await
            }
        };

        match result {
            Ok(detail) => {
                advance(&mut fsm, ActionEvent::Completed);
                info!("  Action completed: {}", detail);
                ActionOutcome::succeeded(detail)
            }
            Err(err) => {
                advance(&mut fsm, ActionEvent::Errored);
                error!("  Action failed: {}", err);
                err.into()
            }
        }
    }

    /// Run the JSON record a widget hands over when tapped.
    ///
    /// Malformed records and unknown action codes are rejected without any
    /// network activity.
    pub async fn execute_trigger(&self, raw: &str) -> ActionOutcome {
        debug!("Received trigger ({} bytes)", raw.len());

        match WidgetTrigger::from_json(raw).and_then(WidgetTrigger::into_request) {
            Ok(request) => self.execute(&request).await,
            Err(err) => {
                log_trigger_error(&err);
                err.into()
            }
        }
    }

    /// Run a request on its own task; the outcome arrives on the returned
    /// channel.
    pub fn submit(&self, request: DeviceActionRequest) -> oneshot::Receiver<ActionOutcome> {
        let (tx, rx) = oneshot::channel();
        let executor = self.clone();

        tokio::spawn(async move {
            let outcome = executor.execute(&request).await;
            let _ = tx.send(outcome);
        });

        rx
    }

    /// Like [`submit`](Self::submit) for a raw widget record
    pub fn submit_trigger(&self, raw: String) -> oneshot::Receiver<ActionOutcome> {
        let (tx, rx) = oneshot::channel();
        let executor = self.clone();

        tokio::spawn(async move {
            let outcome = executor.execute_trigger(&raw).await;
            let _ = tx.send(outcome);
        });

        rx
    }
}

fn log_trigger_error(err: &ActionError) {
    match err {
        ActionError::UnknownAction(code) => error!("Unknown action: {}", code),
        other => error!("Invalid trigger: {}", other),
    }
}

fn describe(request: &DeviceActionRequest) -> String {
    match request.kind {
        ActionKind::Wake => format!(
            "{} for host={:?} port={}",
            request.kind, request.host_address, request.wake_port
        ),
        ActionKind::Shutdown => format!("{} for host={:?}", request.kind, request.host_address),
    }
}

fn advance(fsm: &mut ActionStateMachine, event: ActionEvent) {
    let from = fsm.state();
    match fsm.process_event(event) {
        TransitionResult::Success(to) => {
            debug_assert!(is_valid_transition(from, to));
            debug!("  State: {:?} -> {:?}", from, to)
        }
        TransitionResult::Invalid { from, event } => {
            warn!("  Ignored {:?} in state {:?}", event, from)
        }
    }
}
