//! Random cycle durations.

use rand::Rng;
use std::time::Duration;

/// Draw a duration uniformly from the half-open interval `[min, max)`.
///
/// Uses a fresh draw from the thread-local generator on every call.
/// Returns `min` when the interval is empty (`max <= min`).
///
/// # Example
///
/// ```rust
/// use phaselight::controller::random_duration;
/// use std::time::Duration;
///
/// let min = Duration::from_secs(4);
/// let max = Duration::from_secs(6);
/// let drawn = random_duration(min, max);
///
/// assert!(drawn >= min && drawn < max);
/// ```
pub fn random_duration(min: Duration, max: Duration) -> Duration {
    random_duration_with(&mut rand::rng(), min, max)
}

/// Same as [`random_duration`] but with a caller-supplied generator.
///
/// Sampling is done on whole nanoseconds so the upper bound is never
/// reached through floating point rounding.
pub fn random_duration_with<R: Rng>(rng: &mut R, min: Duration, max: Duration) -> Duration {
    if max <= min {
        return min;
    }

    let span = u64::try_from((max - min).as_nanos()).unwrap_or(u64::MAX);
    min + Duration::from_nanos(rng.random_range(0..span))
}
