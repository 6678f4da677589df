//! Phase controller: the toggling state machine and its background loop.
//!
//! A controller owns the current phase and a [`BlockingChannel`]. After
//! [`simulate`](SignalController::simulate) a background thread toggles the
//! phase once per randomly drawn cycle and publishes every new value to the
//! channel, where any number of waiters can pick it up.
//!
//! # Example
//!
//! ```rust
//! use phaselight::controller::{CycleConfig, PhaseController};
//! use phaselight::core::Phase;
//! use std::time::Duration;
//!
//! let config = CycleConfig::builder()
//!     .cycle_range(Duration::from_millis(5), Duration::from_millis(10))
//!     .build()
//!     .unwrap();
//! let controller = PhaseController::with_config(config).unwrap();
//! assert_eq!(controller.current_phase(), Phase::Red);
//!
//! let handle = controller.simulate().unwrap();
//! controller.wait_for_green();
//! handle.stop().unwrap();
//! ```

pub mod config;
pub mod error;
pub mod handle;
pub mod random;

pub use config::{CycleConfig, CycleConfigBuilder};
pub use error::{ConfigError, ControllerError};
pub use handle::SimulationHandle;
pub use random::{random_duration, random_duration_with};

use crate::channel::BlockingChannel;
use crate::core::{Phase, PhaseHistory, PhaseTransition, Signal};
use crate::waiter::PhaseWaiter;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Controller for the two-phase traffic signal.
pub type PhaseController = SignalController<Phase>;

/// Mutable state guarded by the controller's lock.
#[derive(Debug)]
struct ControllerState<S: Signal> {
    phase: S,
    history: PhaseHistory<S>,
    cycles: u64,
}

impl<S: Signal> ControllerState<S> {
    fn new(history_limit: usize) -> Self {
        Self {
            phase: S::initial(),
            history: PhaseHistory::with_limit(history_limit),
            cycles: 0,
        }
    }

    /// Toggle the phase and record the transition. Returns the new phase.
    fn toggle(&mut self, cycle_duration: Duration) -> S {
        let from = self.phase;
        let to = from.toggled();
        self.cycles += 1;
        self.phase = to;
        self.history.record(PhaseTransition {
            from,
            to,
            timestamp: Utc::now(),
            cycle: self.cycles,
            cycle_duration,
        });
        to
    }
}

/// State shared between a controller and its background thread.
#[derive(Debug)]
struct Shared<S: Signal> {
    state: Mutex<ControllerState<S>>,
    channel: Arc<BlockingChannel<S>>,
}

impl<S: Signal> Shared<S> {
    fn lock(&self) -> MutexGuard<'_, ControllerState<S>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Owns a toggling signal and publishes every transition.
///
/// The current phase is only ever read or written under one mutex, so
/// [`current_phase`](Self::current_phase) never races the background
/// writer.
#[derive(Debug)]
pub struct SignalController<S: Signal> {
    id: Uuid,
    config: CycleConfig,
    shared: Arc<Shared<S>>,
    started: AtomicBool,
}

impl<S: Signal> SignalController<S> {
    /// Create a controller with the default 4–6 second cycle.
    pub fn new() -> Self {
        Self::build(CycleConfig::default())
    }

    /// Create a controller with custom timing.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `config` fails validation.
    pub fn with_config(config: CycleConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: CycleConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            config,
            shared: Arc::new(Shared {
                state: Mutex::new(ControllerState::new(config.history_limit())),
                channel: Arc::new(BlockingChannel::new()),
            }),
            started: AtomicBool::new(false),
        }
    }

    /// Unique id of this controller, used in logs and the thread name.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Timing this controller was built with.
    pub fn config(&self) -> &CycleConfig {
        &self.config
    }

    /// Current phase, read under the same lock the background loop writes with.
    pub fn current_phase(&self) -> S {
        self.shared.lock().phase
    }

    /// Snapshot of the most recent transitions, up to
    /// [`CycleConfig::history_limit`] of them.
    pub fn history(&self) -> PhaseHistory<S> {
        self.shared.lock().history.clone()
    }

    /// The channel transitions are published to.
    pub fn channel(&self) -> Arc<BlockingChannel<S>> {
        Arc::clone(&self.shared.channel)
    }

    /// A waiter reading from this controller's channel.
    pub fn waiter(&self) -> PhaseWaiter<S> {
        PhaseWaiter::new(self.channel())
    }

    /// Whether `simulate` has been called successfully.
    pub fn is_simulating(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }

    /// Block until `target` is received from the channel.
    ///
    /// Returns the number of values consumed, including the match.
    pub fn wait_for(&self, target: S) -> usize {
        self.waiter().wait_for(target)
    }

    /// Start the toggling loop on a background thread and return at once.
    ///
    /// A controller runs at most one loop: calling this again, even after
    /// the first simulation was stopped, is a misuse error.
    ///
    /// # Errors
    ///
    /// - [`ControllerError::AlreadySimulating`] on a repeated call
    /// - [`ControllerError::Spawn`] if the thread could not be created
    pub fn simulate(&self) -> Result<SimulationHandle, ControllerError> {
        if self.started.swap(true, Ordering::AcqRel) {
            tracing::warn!(controller = %self.id, "simulate called twice");
            return Err(ControllerError::AlreadySimulating { id: self.id });
        }

        let stop_requested = Arc::new(AtomicBool::new(false));
        let task = CycleTask {
            controller_id: self.id,
            config: self.config,
            shared: Arc::clone(&self.shared),
            stop_requested: Arc::clone(&stop_requested),
        };

        let spawned = thread::Builder::new()
            .name(format!("phaselight-{}", self.id.simple()))
            .spawn(move || task.run());

        let thread = match spawned {
            Ok(thread) => thread,
            Err(err) => {
                self.started.store(false, Ordering::Release);
                tracing::error!(controller = %self.id, error = %err, "failed to spawn simulation thread");
                return Err(ControllerError::Spawn(err));
            }
        };

        tracing::info!(
            controller = %self.id,
            min_cycle = ?self.config.min_cycle(),
            max_cycle = ?self.config.max_cycle(),
            "simulation started"
        );
        Ok(SimulationHandle::new(self.id, stop_requested, thread))
    }
}

impl PhaseController {
    /// Block until a `Green` phase is received, discarding anything else.
    ///
    /// Each published value goes to exactly one waiter, so with several
    /// callers only one of them is released per `Green`.
    pub fn wait_for_green(&self) -> usize {
        self.waiter().wait_for_green()
    }
}

impl<S: Signal> Default for SignalController<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// The background toggling loop.
struct CycleTask<S: Signal> {
    controller_id: Uuid,
    config: CycleConfig,
    shared: Arc<Shared<S>>,
    stop_requested: Arc<AtomicBool>,
}

impl<S: Signal> CycleTask<S> {
    fn draw_cycle(&self) -> Duration {
        random_duration(self.config.min_cycle(), self.config.max_cycle())
    }

    fn run(self) {
        let span = tracing::debug_span!("cycle_through_phases", controller = %self.controller_id);
        let _entered = span.enter();

        let mut cycle_duration = self.draw_cycle();
        let mut last_update = Instant::now();

        loop {
            thread::sleep(self.config.poll_interval());

            if self.stop_requested.load(Ordering::Acquire) {
                tracing::debug!("stop requested");
                return;
            }

            if last_update.elapsed() < cycle_duration {
                continue;
            }

            let (phase, cycle) = {
                let mut state = self.shared.lock();
                let phase = state.toggle(cycle_duration);
                // Publish under the lock so channel order matches history order.
                self.shared.channel.send(phase);
                (phase, state.cycles)
            };
            tracing::debug!(
                phase = phase.name(),
                cycle,
                cycle_duration = ?cycle_duration,
                "phase published"
            );

            cycle_duration = self.draw_cycle();
            last_update = Instant::now();
        }
    }
}
