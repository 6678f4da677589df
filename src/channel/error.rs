//! Channel error types.

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when receiving with a deadline.
///
/// The unbounded `receive` never fails; it blocks instead.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ChannelError {
    /// No item arrived before the timeout elapsed
    #[error("No item received within {0:?}")]
    Timeout(Duration),
}
