//! Device action execution
//!
//! This module handles:
//! - Validating action requests and widget records
//! - Dispatching to the wake or shutdown handler
//! - Turning every result into an ActionOutcome

mod executor;
pub mod handlers;

pub use executor::ActionExecutor;
