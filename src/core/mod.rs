//! Core signal types.
//!
//! This module contains the plain-value side of the crate:
//! - The `Phase` enumeration and the `Signal` trait it implements
//! - Predicates used by waiters to select values
//! - History of published transitions
//!
//! Nothing in this module blocks or spawns threads.

mod history;
mod phase;
mod predicate;

pub use history::{PhaseHistory, PhaseTransition};
pub use phase::{Phase, Signal};
pub use predicate::Predicate;
