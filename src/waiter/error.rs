//! Waiter error types.

use std::time::Duration;
use thiserror::Error;

/// Errors from the bounded wait.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum WaitError {
    /// The deadline passed before a matching value arrived
    #[error("No matching value within {timeout:?} ({consumed} values discarded)")]
    Timeout { timeout: Duration, consumed: usize },
}
