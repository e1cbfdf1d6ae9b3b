//! Action handlers
//!
//! Each handler is split into a pure validation step, run while the
//! invocation is `Validating`, and a network step, run while `Executing`.

mod shutdown;
mod wake;

pub use shutdown::{prepare_shutdown, request_shutdown, ShutdownPlan};
pub use wake::{prepare_wake, send_wake, WakePlan};

use power_remote_shared::{ActionError, ActionKind, DeviceActionRequest};

/// Validated input for exactly one action
#[derive(Debug)]
pub enum ActionPlan {
    Wake(WakePlan),
    Shutdown(ShutdownPlan),
}

/// Validate a request and build the plan for its action
pub fn prepare(request: &DeviceActionRequest) -> Result<ActionPlan, ActionError> {
    match request.kind {
        ActionKind::Wake => prepare_wake(request).map(ActionPlan::Wake),
        ActionKind::Shutdown => prepare_shutdown(request).map(ActionPlan::Shutdown),
    }
}
