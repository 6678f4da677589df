//! Blocking consumers that wait for a specific value.
//!
//! A [`PhaseWaiter`] pulls values off a shared [`BlockingChannel`] and
//! discards them until one matches. Every value it pulls is consumed: other
//! receivers on the same channel will not see it.

pub mod error;

pub use error::WaitError;

use crate::channel::BlockingChannel;
use crate::core::{Phase, Predicate};
use std::fmt::Debug;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Value that satisfied a wait, with the number of values consumed to get it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Matched<T> {
    pub value: T,
    /// Values received, including the match
    pub consumed: usize,
}

/// Consumer that blocks until a target value is received.
///
/// # Example
///
/// ```rust
/// use phaselight::channel::BlockingChannel;
/// use phaselight::core::Phase;
/// use phaselight::waiter::PhaseWaiter;
/// use std::sync::Arc;
///
/// let channel = Arc::new(BlockingChannel::new());
/// channel.send(Phase::Red);
/// channel.send(Phase::Red);
/// channel.send(Phase::Green);
///
/// let waiter = PhaseWaiter::new(Arc::clone(&channel));
/// assert_eq!(waiter.wait_for_green(), 3);
/// assert!(channel.is_empty());
/// ```
#[derive(Debug)]
pub struct PhaseWaiter<T> {
    channel: Arc<BlockingChannel<T>>,
}

impl<T> Clone for PhaseWaiter<T> {
    fn clone(&self) -> Self {
        Self {
            channel: Arc::clone(&self.channel),
        }
    }
}

impl<T: PartialEq + Debug> PhaseWaiter<T> {
    /// Create a waiter that consumes from `channel`.
    pub fn new(channel: Arc<BlockingChannel<T>>) -> Self {
        Self { channel }
    }

    /// Count a received value and return it if it matches.
    ///
    /// Non-matching values are dropped here and nowhere else.
    fn accept<F>(value: T, consumed: &mut usize, matches: F) -> Option<Matched<T>>
    where
        F: Fn(&T) -> bool,
    {
        *consumed += 1;
        if matches(&value) {
            return Some(Matched {
                value,
                consumed: *consumed,
            });
        }
        tracing::trace!(?value, consumed = *consumed, "discarded non-matching value");
        None
    }

    /// Block until a value satisfying `predicate` is received.
    ///
    /// There is no upper bound on discarded values and no timeout.
    pub fn wait_until(&self, predicate: &Predicate<T>) -> Matched<T> {
        let mut consumed = 0;
        loop {
            let value = self.channel.receive();
            if let Some(matched) = Self::accept(value, &mut consumed, |v| predicate.check(v)) {
                return matched;
            }
        }
    }

    /// Block until `target` is received.
    ///
    /// Returns the number of values consumed, including the match.
    pub fn wait_for(&self, target: T) -> usize {
        let mut consumed = 0;
        loop {
            let value = self.channel.receive();
            if let Some(matched) = Self::accept(value, &mut consumed, |v| *v == target) {
                return matched.consumed;
            }
        }
    }

    /// Like [`wait_for`](Self::wait_for), but gives up once `timeout` has
    /// elapsed in total.
    ///
    /// A timeout too large to express as a deadline (such as
    /// `Duration::MAX`) waits without limit.
    ///
    /// # Errors
    ///
    /// Returns [`WaitError::Timeout`] if no match arrived in time. Values
    /// discarded before the deadline stay consumed.
    pub fn wait_for_timeout(&self, target: T, timeout: Duration) -> Result<usize, WaitError> {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            return Ok(self.wait_for(target));
        };

        let mut consumed = 0;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let Ok(value) = self.channel.receive_timeout(remaining) else {
                return Err(WaitError::Timeout { timeout, consumed });
            };
            if let Some(matched) = Self::accept(value, &mut consumed, |v| *v == target) {
                return Ok(matched.consumed);
            }
        }
    }
}

impl PhaseWaiter<Phase> {
    /// Block until a `Green` phase is received.
    pub fn wait_for_green(&self) -> usize {
        self.wait_for(Phase::Green)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;

    fn channel_with(values: &[Phase]) -> Arc<BlockingChannel<Phase>> {
        let channel = Arc::new(BlockingChannel::new());
        for value in values {
            channel.send(*value);
        }
        channel
    }

    #[test]
    fn wait_for_green_consumes_through_first_green() {
        let channel = channel_with(&[Phase::Red, Phase::Red, Phase::Green]);
        let waiter = PhaseWaiter::new(Arc::clone(&channel));

        assert_eq!(waiter.wait_for_green(), 3);
        assert!(channel.is_empty());
    }

    #[test]
    fn wait_for_green_leaves_later_values() {
        let channel = channel_with(&[Phase::Green, Phase::Red]);
        let waiter = PhaseWaiter::new(Arc::clone(&channel));

        assert_eq!(waiter.wait_for_green(), 1);
        assert_eq!(channel.try_receive(), Some(Phase::Red));
    }

    #[test]
    fn wait_until_returns_matching_value() {
        let channel = Arc::new(BlockingChannel::new());
        for n in [1, 3, 5, 8, 9] {
            channel.send(n);
        }
        let waiter = PhaseWaiter::new(Arc::clone(&channel));

        let matched = waiter.wait_until(&Predicate::new(|n: &i32| n % 2 == 0));

        assert_eq!(matched, Matched { value: 8, consumed: 4 });
        assert_eq!(channel.len(), 1);
    }

    #[test]
    fn wait_for_blocks_until_target_sent() {
        let channel = channel_with(&[Phase::Red]);
        let released = Arc::new(AtomicBool::new(false));

        let waiter_thread = {
            let waiter = PhaseWaiter::new(Arc::clone(&channel));
            let released = Arc::clone(&released);
            thread::spawn(move || {
                let consumed = waiter.wait_for_green();
                released.store(true, Ordering::SeqCst);
                consumed
            })
        };

        thread::sleep(Duration::from_millis(50));
        assert!(!released.load(Ordering::SeqCst));

        channel.send(Phase::Green);
        assert_eq!(waiter_thread.join().unwrap(), 2);
        assert!(released.load(Ordering::SeqCst));
    }

    #[test]
    fn wait_for_timeout_reports_discarded_values() {
        let channel = channel_with(&[Phase::Red, Phase::Red]);
        let waiter = PhaseWaiter::new(Arc::clone(&channel));
        let timeout = Duration::from_millis(20);

        let result = waiter.wait_for_timeout(Phase::Green, timeout);

        assert_eq!(result, Err(WaitError::Timeout { timeout, consumed: 2 }));
        assert!(channel.is_empty());
    }

    #[test]
    fn wait_for_timeout_returns_match() {
        let channel = channel_with(&[Phase::Red, Phase::Green]);
        let waiter = PhaseWaiter::new(channel);

        assert_eq!(
            waiter.wait_for_timeout(Phase::Green, Duration::from_secs(1)),
            Ok(2)
        );
    }

    #[test]
    fn each_green_releases_one_waiter() {
        let channel: Arc<BlockingChannel<Phase>> = Arc::new(BlockingChannel::new());
        let waiter = PhaseWaiter::new(Arc::clone(&channel));

        let waiters: Vec<_> = (0..3)
            .map(|_| {
                let waiter = waiter.clone();
                thread::spawn(move || waiter.wait_for_green())
            })
            .collect();

        for _ in 0..3 {
            channel.send(Phase::Green);
        }

        let consumed: Vec<usize> = waiters.into_iter().map(|w| w.join().unwrap()).collect();
        assert_eq!(consumed, vec![1, 1, 1]);
        assert!(channel.is_empty());
    }

    #[test]
    fn unbounded_timeout_waits_for_match() {
        let channel = channel_with(&[Phase::Red, Phase::Green]);
        let waiter = PhaseWaiter::new(Arc::clone(&channel));

        assert_eq!(waiter.wait_for_timeout(Phase::Green, Duration::MAX), Ok(2));
        assert!(channel.is_empty());
    }

    #[test]
    fn unbounded_timeout_blocks_until_green_arrives() {
        let channel = channel_with(&[]);
        let waiter = PhaseWaiter::new(Arc::clone(&channel));

        let waiter_thread =
            thread::spawn(move || waiter.wait_for_timeout(Phase::Green, Duration::MAX));

        thread::sleep(Duration::from_millis(20));
        channel.send(Phase::Green);

        assert_eq!(waiter_thread.join().unwrap(), Ok(1));
    }
}
