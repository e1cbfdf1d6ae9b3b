//! Action State Machine
//!
//! Tracks a single action invocation:
//! ```text
//! Idle -> Validating -> Executing -> Succeeded
//!                    |            -> Failed
//!                    -> Rejected
//! ```
//! `Rejected` and `Failed` are both failures, but only `Failed` means the
//! network was touched.

/// Lifecycle state of one invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionState {
    Idle,
    Validating,
    Executing,
    Succeeded,
    Failed,
    Rejected,
}

impl ActionState {
    /// Terminal states accept no further events
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ActionState::Succeeded | ActionState::Failed | ActionState::Rejected
        )
    }
}

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionEvent {
    /// Request received
    Started,
    /// Input checks passed
    Validated,
    /// Input checks failed
    ValidationFailed,
    /// Network work finished without error
    Completed,
    /// Network work hit an error
    Errored,
}

/// Result of a state transition attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionResult {
    /// Transition was valid and state changed
    Success(ActionState),
    /// Transition was invalid from current state
    Invalid { from: ActionState, event: ActionEvent },
}

/// State machine for one action invocation
#[derive(Debug)]
pub struct ActionStateMachine {
    current_state: ActionState,
}

impl Default for ActionStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionStateMachine {
    /// Create a new state machine in Idle state
    pub fn new() -> Self {
        Self {
            current_state: ActionState::Idle,
        }
    }

    /// Get current state
    pub fn state(&self) -> ActionState {
        self.current_state
    }

    /// Process an event and return the transition result
    pub fn process_event(&mut self, event: ActionEvent) -> TransitionResult {
        match self.get_next_state(event) {
            Some(state) => {
                self.current_state = state;
                TransitionResult::Success(state)
            }
            None => TransitionResult::Invalid {
                from: self.current_state,
                event,
            },
        }
    }

    fn get_next_state(&self, event: ActionEvent) -> Option<ActionState> {
        use ActionEvent::*;
        use ActionState::*;

        match (self.current_state, event) {
            (Idle, Started) => Some(Validating),

            (Validating, Validated) => Some(Executing),
            (Validating, ValidationFailed) => Some(Rejected),

            (Executing, Completed) => Some(Succeeded),
            (Executing, Errored) => Some(Failed),

            _ => None,
        }
    }
}

/// Check if a transition from one state to another is valid
pub fn is_valid_transition(from: ActionState, to: ActionState) -> bool {
    use ActionState::*;

    matches!(
        (from, to),
        (Idle, Validating)
            | (Validating, Executing)
            | (Validating, Rejected)
            | (Executing, Succeeded)
            | (Executing, Failed)
    )
}
