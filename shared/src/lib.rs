//! Power Remote Shared Types
//!
//! This crate provides the request and outcome types, the Wake-on-LAN codec
//! and the action lifecycle state machine used by the power-remote executor.
//! Nothing in here performs I/O.

pub mod codec;
pub mod request;
pub mod state_machine;

use std::fmt;
use thiserror::Error;

pub use request::{ActionKind, DeviceActionRequest, MacAddress, WidgetTrigger};

/// Timing and addressing parameters for both actions
pub mod timing {
    /// Number of magic packets sent per wake request
    pub const WAKE_REPEAT_COUNT: u32 = 3;

    /// Delay between two consecutive magic packets
    pub const WAKE_INTERVAL_MS: u64 = 500;

    /// UDP port used when the device has none configured
    pub const DEFAULT_WAKE_PORT: u16 = 9;

    /// TCP port the shutdown agent listens on
    pub const SHUTDOWN_PORT: u16 = 8080;

    /// Connect timeout for the shutdown request
    pub const SHUTDOWN_CONNECT_TIMEOUT_MS: u64 = 10_000;

    /// Read timeout for the shutdown request
    pub const SHUTDOWN_READ_TIMEOUT_MS: u64 = 10_000;
}

/// Errors an action can end with.
///
/// The `Display` text of each variant is the detail string reported to the
/// caller in [`ActionOutcome`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("InvalidMacFormat")]
    InvalidMacFormat,

    #[error("EmptyKey")]
    EmptyKey,

    #[error("unknown action type {0}")]
    UnknownAction(i64),

    #[error("malformed trigger: {0}")]
    MalformedTrigger(String),

    /// The cause is kept for logging only
    #[error("AddressResolutionFailed")]
    AddressResolutionFailed(String),

    #[error("sent {sent}/{total} packets before failure: {cause}")]
    SendFailed { sent: u32, total: u32, cause: String },

    #[error("{0}")]
    Transport(String),

    #[error("unexpected status {0}")]
    UnexpectedStatus(u16),
}

impl ActionError {
    /// Whether the error was raised before any network activity
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ActionError::InvalidMacFormat
                | ActionError::EmptyKey
                | ActionError::UnknownAction(_)
                | ActionError::MalformedTrigger(_)
        )
    }
}

/// How an action invocation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalState {
    /// The action ran to completion
    Succeeded,
    /// The action was attempted but a runtime error stopped it
    Failed,
    /// The request was invalid and nothing was attempted
    Rejected,
}

impl fmt::Display for TerminalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminalState::Succeeded => write!(f, "succeeded"),
            TerminalState::Failed => write!(f, "failed"),
            TerminalState::Rejected => write!(f, "rejected"),
        }
    }
}

/// Result reported back to the caller of the executor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub succeeded: bool,
    pub detail: String,
    pub terminal: TerminalState,
}

impl ActionOutcome {
    /// Create an outcome for a completed action
    pub fn succeeded(detail: impl Into<String>) -> Self {
        Self {
            succeeded: true,
            detail: detail.into(),
            terminal: TerminalState::Succeeded,
        }
    }

    /// Create an outcome for an action that failed at runtime
    pub fn failed(detail: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            detail: detail.into(),
            terminal: TerminalState::Failed,
        }
    }

    /// Create an outcome for a request that never got past validation
    pub fn rejected(detail: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            detail: detail.into(),
            terminal: TerminalState::Rejected,
        }
    }
}

impl From<ActionError> for ActionOutcome {
    fn from(error: ActionError) -> Self {
        if error.is_validation() {
            ActionOutcome::rejected(error.to_string())
        } else {
            ActionOutcome::failed(error.to_string())
        }
    }
}

impl fmt::Display for ActionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.terminal, self.detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_creation() {
        let outcome = ActionOutcome::succeeded("HTTP 200");
        assert!(outcome.succeeded);
        assert_eq!(outcome.detail, "HTTP 200");
        assert_eq!(outcome.terminal, TerminalState::Succeeded);
    }

    #[test]
    fn test_validation_errors_are_rejected() {
        let outcome = ActionOutcome::from(ActionError::EmptyKey);
        assert!(!outcome.succeeded);
        assert_eq!(outcome.detail, "EmptyKey");
        assert_eq!(outcome.terminal, TerminalState::Rejected);

        let outcome = ActionOutcome::from(ActionError::UnknownAction(7));
        assert_eq!(outcome.detail, "unknown action type 7");
        assert_eq!(outcome.terminal, TerminalState::Rejected);
    }

    #[test]
    fn test_runtime_errors_are_failed() {
        let outcome = ActionOutcome::from(ActionError::UnexpectedStatus(403));
        assert_eq!(outcome.detail, "unexpected status 403");
        assert_eq!(outcome.terminal, TerminalState::Failed);

        let outcome = ActionOutcome::from(ActionError::AddressResolutionFailed(
            "no such host".into(),
        ));
        assert_eq!(outcome.detail, "AddressResolutionFailed");
        assert_eq!(outcome.terminal, TerminalState::Failed);

        let outcome = ActionOutcome::from(ActionError::SendFailed {
            sent: 1,
            total: 3,
            cause: "network unreachable".into(),
        });
        assert_eq!(
            outcome.detail,
            "sent 1/3 packets before failure: network unreachable"
        );
    }
}
