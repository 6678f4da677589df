//! Predicates over received values.
//!
//! A `Predicate` decides whether a value pulled off a channel is the one a
//! waiter is looking for. It is boxed so waiters can hold heterogeneous
//! conditions behind one type.

use std::fmt;

/// Thread-safe predicate evaluated against each received value.
///
/// # Example
///
/// ```rust
/// use phaselight::core::{Phase, Predicate};
///
/// let is_green = Predicate::new(|p: &Phase| p.is_green());
///
/// assert!(is_green.check(&Phase::Green));
/// assert!(!is_green.check(&Phase::Red));
/// ```
pub struct Predicate<T> {
    check: Box<dyn Fn(&T) -> bool + Send + Sync>,
}

impl<T> Predicate<T> {
    /// Create a predicate from a closure.
    ///
    /// The closure must be deterministic: waiters may call it once per
    /// received value and act on the result immediately.
    pub fn new<F>(check: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self {
            check: Box::new(check),
        }
    }

    /// Predicate that matches values equal to `target`.
    pub fn equals(target: T) -> Self
    where
        T: PartialEq + Send + Sync + 'static,
    {
        Self::new(move |value| *value == target)
    }

    /// Evaluate the predicate.
    pub fn check(&self, value: &T) -> bool {
        (self.check)(value)
    }
}

impl<T> fmt::Debug for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate").finish_non_exhaustive()
    }
}
