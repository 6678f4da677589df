//! Controller and configuration errors.

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when validating a [`CycleConfig`](super::CycleConfig).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Cycle interval [{min:?}, {max:?}) is empty; min must be below max")]
    EmptyInterval { min: Duration, max: Duration },

    #[error("Poll interval must be greater than zero")]
    ZeroPollInterval,
}

/// Errors that can occur when starting or stopping a simulation.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// `simulate` was already called on this controller
    #[error("Simulation already started for controller {id}")]
    AlreadySimulating { id: uuid::Uuid },

    /// The OS refused to create the background thread
    #[error("Failed to spawn simulation thread: {0}")]
    Spawn(#[from] std::io::Error),

    /// The background thread panicked before it could be joined
    #[error("Simulation thread panicked")]
    TaskPanicked,
}
