//! Shutdown handler

use crate::transport::ShutdownTransport;
use power_remote_shared::{ActionError, DeviceActionRequest};
use std::fmt;
use tracing::{debug, error, info, warn};

const LOG_TARGET: &str = "Shutdown";

/// A validated shutdown request
#[derive(Clone)]
pub struct ShutdownPlan {
    pub host: String,
    key: String,
}

impl ShutdownPlan {
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl fmt::Debug for ShutdownPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShutdownPlan")
            .field("host", &self.host)
            .finish_non_exhaustive()
    }
}

/// Check that a shared key is present. An empty key is never sent.
pub fn prepare_shutdown(request: &DeviceActionRequest) -> Result<ShutdownPlan, ActionError> {
    if request.shared_key.is_empty() {
        warn!(target: LOG_TARGET, "No key provided for {}", request.host_address);
        return Err(ActionError::EmptyKey);
    }

    Ok(ShutdownPlan {
        host: request.host_address.clone(),
        key: request.shared_key.clone(),
    })
}

/// Send a single shutdown request. Only status 200 counts as success and
/// nothing is retried.
pub async fn request_shutdown<T>(plan: &ShutdownPlan, transport: &T) -> Result<String, ActionError>
where
    T: ShutdownTransport + ?Sized,
{
    debug!(target: LOG_TARGET, "POST to {} via {}", plan.host, transport.name());

    let status = transport
        .post_shutdown(&plan.host, plan.key())
        .await
        .map_err(|e| {
            error!(target: LOG_TARGET, "Error: {:#}", e);
            ActionError::Transport(format!("{e:#}"))
        })?;

    debug!(target: LOG_TARGET, "Response code: {}", status);

    if status == 200 {
        info!(target: LOG_TARGET, "Shutdown accepted by {}", plan.host);
        Ok("HTTP 200".into())
    } else {
        warn!(target: LOG_TARGET, "Unexpected response: {}", status);
        Err(ActionError::UnexpectedStatus(status))
    }
}
