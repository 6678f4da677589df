//! Cycle timing configuration.

use crate::controller::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default lower bound of a cycle.
pub const DEFAULT_MIN_CYCLE: Duration = Duration::from_secs(4);

/// Default (exclusive) upper bound of a cycle.
pub const DEFAULT_MAX_CYCLE: Duration = Duration::from_secs(6);

/// Default sleep between elapsed-time checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Default number of transitions a controller keeps in its history.
pub const DEFAULT_HISTORY_LIMIT: usize = 1024;

/// Timing of the toggling loop.
///
/// Each cycle lasts a duration drawn uniformly from `[min_cycle, max_cycle)`.
/// The loop checks elapsed time every `poll_interval`, so a toggle may lag
/// its nominal time by up to one poll interval. The controller keeps only
/// the latest `history_limit` transitions.
///
/// Durations serialize as human-readable strings (`"4s"`, `"1ms 500us"`)
/// at full nanosecond precision.
///
/// # Example
///
/// ```rust
/// use phaselight::controller::CycleConfig;
/// use std::time::Duration;
///
/// let config = CycleConfig::builder()
///     .cycle_range(Duration::from_millis(200), Duration::from_millis(400))
///     .poll_interval(Duration::from_millis(5))
///     .history_limit(16)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.min_cycle(), Duration::from_millis(200));
/// assert_eq!(config.history_limit(), 16);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleConfig {
    #[serde(with = "human_duration")]
    min_cycle: Duration,
    #[serde(with = "human_duration")]
    max_cycle: Duration,
    #[serde(with = "human_duration")]
    poll_interval: Duration,
    #[serde(default = "default_history_limit")]
    history_limit: usize,
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

impl CycleConfig {
    /// Start building a config from the defaults.
    pub fn builder() -> CycleConfigBuilder {
        CycleConfigBuilder::new()
    }

    /// Inclusive lower bound of a cycle.
    pub fn min_cycle(&self) -> Duration {
        self.min_cycle
    }

    /// Exclusive upper bound of a cycle.
    pub fn max_cycle(&self) -> Duration {
        self.max_cycle
    }

    /// Sleep between elapsed-time checks in the background loop.
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Most transitions the controller's history retains.
    ///
    /// Zero disables history recording.
    pub fn history_limit(&self) -> usize {
        self.history_limit
    }

    /// Check the invariants the builder enforces.
    ///
    /// Configs obtained through deserialization skip the builder, so
    /// controllers re-run this before accepting one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_cycle >= self.max_cycle {
            return Err(ConfigError::EmptyInterval {
                min: self.min_cycle,
                max: self.max_cycle,
            });
        }

        if self.poll_interval.is_zero() {
            return Err(ConfigError::ZeroPollInterval);
        }

        Ok(())
    }
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            min_cycle: DEFAULT_MIN_CYCLE,
            max_cycle: DEFAULT_MAX_CYCLE,
            poll_interval: DEFAULT_POLL_INTERVAL,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

/// Builder for [`CycleConfig`].
#[derive(Clone, Debug)]
pub struct CycleConfigBuilder {
    config: CycleConfig,
}

impl CycleConfigBuilder {
    /// Start from the default 4–6 second cycle.
    pub fn new() -> Self {
        Self {
            config: CycleConfig::default(),
        }
    }

    /// Set the half-open interval cycle durations are drawn from
    pub fn cycle_range(mut self, min: Duration, max: Duration) -> Self {
        self.config.min_cycle = min;
        self.config.max_cycle = max;
        self
    }

    /// Set the sleep between elapsed-time checks
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.config.poll_interval = interval;
        self
    }

    /// Set how many recent transitions the history keeps
    pub fn history_limit(mut self, limit: usize) -> Self {
        self.config.history_limit = limit;
        self
    }

    /// Build the config.
    /// Returns an error if the interval is empty or the poll interval is zero.
    pub fn build(self) -> Result<CycleConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for CycleConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

mod human_duration {
    use serde::{de, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&humantime::format_duration(*duration))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let text = String::deserialize(deserializer)?;
        humantime::parse_duration(&text).map_err(de::Error::custom)
    }
}
