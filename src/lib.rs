//! Phaselight: a two-phase signal simulator built on a blocking channel
//!
//! A background thread toggles a signal between `Red` and `Green` on a
//! randomized timer and publishes every transition to a blocking FIFO
//! channel. Consumers block on that channel until the value they care
//! about shows up. It is the classic producer/consumer + condition
//! variable pattern, packaged as a small library.
//!
//! # Core Concepts
//!
//! - **Channel**: [`BlockingChannel`], an unbounded FIFO with non-blocking
//!   `send` and blocking `receive`
//! - **Controller**: [`PhaseController`], which owns the current phase and
//!   the background toggling loop
//! - **Waiter**: [`PhaseWaiter`], which discards values until a target or
//!   predicate match arrives
//!
//! # Example
//!
//! ```rust
//! use phaselight::{CycleConfig, Phase, PhaseController};
//! use std::time::Duration;
//!
//! let config = CycleConfig::builder()
//!     .cycle_range(Duration::from_millis(10), Duration::from_millis(20))
//!     .build()
//!     .unwrap();
//! let controller = PhaseController::with_config(config).unwrap();
//! let handle = controller.simulate().unwrap();
//!
//! controller.wait_for_green();
//! handle.stop().unwrap();
//!
//! let history = controller.history();
//! assert_eq!(history.published()[0], Phase::Green);
//! ```
//!
//! # Known Limitations
//!
//! - The channel is unbounded. A producer that outpaces its consumers grows
//!   the queue without limit; [`BlockingChannel::len`] exposes the depth.
//! - [`BlockingChannel::receive`] and [`PhaseController::wait_for_green`]
//!   have no timeout and block forever if nothing matching is ever sent.
//!   Use the `*_timeout` variants where that matters.
//! - Toggle timing is checked at the poll interval (1 ms by default), so a
//!   toggle may lag its nominal time by that much or more under load.
//! - The controller's history keeps only the latest
//!   [`CycleConfig::history_limit`] transitions (1024 by default); older ones
//!   are evicted, so a long-running loop does not grow it without limit.
//! - A simulation whose [`SimulationHandle`] is dropped without `stop`
//!   keeps running for the rest of the process.

pub mod channel;
pub mod controller;
pub mod core;
pub mod waiter;

// Re-export commonly used types
pub use channel::{BlockingChannel, ChannelError};
pub use controller::{
    ConfigError, ControllerError, CycleConfig, PhaseController, SignalController,
    SimulationHandle,
};
pub use crate::core::{Phase, PhaseHistory, PhaseTransition, Predicate, Signal};
pub use waiter::{Matched, PhaseWaiter, WaitError};
