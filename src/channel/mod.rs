//! Blocking FIFO channel.
//!
//! `BlockingChannel` is the hand-off point between producers and
//! consumers: `send` never blocks, `receive` blocks until an item is
//! available. One mutex guards the queue and one condition variable
//! signals that it became non-empty.
//!
//! # Capacity
//!
//! The queue is unbounded. If producers outpace consumers it grows without
//! limit; nothing here applies back-pressure. The phase controller publishes
//! one value every few seconds, so any consumer that keeps calling
//! `receive` drains it far faster than it fills. Use [`BlockingChannel::len`]
//! to watch the depth when that assumption may not hold.
//!
//! # Example
//!
//! ```rust
//! use phaselight::channel::BlockingChannel;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let channel = Arc::new(BlockingChannel::new());
//!
//! let producer = {
//!     let channel = Arc::clone(&channel);
//!     thread::spawn(move || {
//!         for i in 0..3 {
//!             channel.send(i);
//!         }
//!     })
//! };
//!
//! let received: Vec<i32> = (0..3).map(|_| channel.receive()).collect();
//! producer.join().unwrap();
//!
//! assert_eq!(received, vec![0, 1, 2]);
//! ```

pub mod error;

pub use error::ChannelError;

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Thread-safe unbounded FIFO queue with a blocking receive.
pub struct BlockingChannel<T> {
    queue: Mutex<VecDeque<T>>,
    item_ready: Condvar,
}

impl<T> BlockingChannel<T> {
    /// Create an empty channel.
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            item_ready: Condvar::new(),
        }
    }

    /// Lock the queue.
    ///
    /// Every critical section leaves the `VecDeque` in a valid state, so a
    /// panic in another holder does not invalidate it and poisoning is
    /// ignored.
    fn lock(&self) -> MutexGuard<'_, VecDeque<T>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append `item` to the tail of the queue and wake one receiver.
    ///
    /// Never blocks beyond the brief lock acquisition and always succeeds.
    pub fn send(&self, item: T) {
        let depth = {
            let mut queue = self.lock();
            queue.push_back(item);
            queue.len()
        };
        tracing::trace!(depth, "item sent");
        self.item_ready.notify_one();
    }

    /// Block until an item is available, then remove and return the oldest one.
    ///
    /// The wait re-checks that the queue is non-empty after every wake-up,
    /// so spurious wake-ups and several receivers racing for one item are
    /// both handled: exactly one receiver gets each item.
    ///
    /// Blocks forever if nothing is ever sent.
    pub fn receive(&self) -> T {
        let mut queue = self.lock();
        loop {
            if let Some(item) = queue.pop_front() {
                return item;
            }
            queue = self
                .item_ready
                .wait(queue)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Remove and return the oldest item without blocking.
    pub fn try_receive(&self) -> Option<T> {
        self.lock().pop_front()
    }

    /// Like [`receive`](Self::receive), but gives up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::Timeout`] if the queue is still empty when
    /// the timeout elapses.
    pub fn receive_timeout(&self, timeout: Duration) -> Result<T, ChannelError> {
        let guard = self.lock();
        let (mut queue, _) = self
            .item_ready
            .wait_timeout_while(guard, timeout, |queue| queue.is_empty())
            .unwrap_or_else(PoisonError::into_inner);
        queue.pop_front().ok_or(ChannelError::Timeout(timeout))
    }

    /// Number of items waiting to be received.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no item is waiting to be received.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl<T> Default for BlockingChannel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for BlockingChannel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockingChannel")
            .field("len", &self.len())
            .finish()
    }
}
