//! Owner handle for a running simulation.

use crate::controller::error::ControllerError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use uuid::Uuid;

/// Handle returned by `simulate`.
///
/// Dropping the handle without calling [`stop`](Self::stop) detaches the
/// background thread, which then keeps toggling for the rest of the
/// process.
#[derive(Debug)]
pub struct SimulationHandle {
    controller_id: Uuid,
    stop_requested: Arc<AtomicBool>,
    thread: JoinHandle<()>,
}

impl SimulationHandle {
    pub(crate) fn new(
        controller_id: Uuid,
        stop_requested: Arc<AtomicBool>,
        thread: JoinHandle<()>,
    ) -> Self {
        Self {
            controller_id,
            stop_requested,
            thread,
        }
    }

    /// Id of the controller this simulation belongs to.
    pub fn controller_id(&self) -> Uuid {
        self.controller_id
    }

    /// Ask the background loop to exit at its next poll, without waiting.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
    }

    /// Whether the background thread has exited.
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Request a stop and wait for the background thread to exit.
    ///
    /// Once this returns, no further phases are published.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::TaskPanicked`] if the thread panicked.
    pub fn stop(self) -> Result<(), ControllerError> {
        self.request_stop();
        self.thread.join().map_err(|_| ControllerError::TaskPanicked)?;
        tracing::info!(controller = %self.controller_id, "simulation stopped");
        Ok(())
    }
}
