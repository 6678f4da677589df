//! Transition history tracking.
//!
//! Every toggle a controller publishes is also recorded here, so the
//! sequence of phases can be inspected after the fact without draining
//! the channel.

use super::phase::Signal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Entries reserved up front by [`PhaseHistory::with_limit`].
const PREALLOCATE_LIMIT: usize = 64;

/// Record of a single published toggle.
///
/// # Example
///
/// ```rust
/// use phaselight::core::{Phase, PhaseTransition};
/// use chrono::Utc;
/// use std::time::Duration;
///
/// let transition = PhaseTransition {
///     from: Phase::Red,
///     to: Phase::Green,
///     timestamp: Utc::now(),
///     cycle: 1,
///     cycle_duration: Duration::from_millis(4500),
/// };
/// assert_eq!(transition.to, Phase::Green);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct PhaseTransition<S: Signal> {
    /// The phase being left
    pub from: S,
    /// The phase being entered and published
    pub to: S,
    /// Wall-clock time of the toggle
    pub timestamp: DateTime<Utc>,
    /// 1-based index of the cycle that ended with this toggle
    pub cycle: u64,
    /// The randomly drawn length of that cycle
    pub cycle_duration: Duration,
}

/// Ordered history of toggles.
///
/// # Example
///
/// ```rust
/// use phaselight::core::{Phase, PhaseHistory, PhaseTransition};
/// use chrono::Utc;
/// use std::time::Duration;
///
/// let mut history = PhaseHistory::new();
/// history.record(PhaseTransition {
///     from: Phase::Red,
///     to: Phase::Green,
///     timestamp: Utc::now(),
///     cycle: 1,
///     cycle_duration: Duration::from_secs(5),
/// });
///
/// let path = history.get_path();
/// assert_eq!(path, vec![&Phase::Red, &Phase::Green]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct PhaseHistory<S: Signal> {
    transitions: VecDeque<PhaseTransition<S>>,
    #[serde(default)]
    limit: Option<usize>,
}

impl<S: Signal> Default for PhaseHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Signal> PhaseHistory<S> {
    /// Create a new empty history that keeps every transition.
    pub fn new() -> Self {
        Self {
            transitions: VecDeque::new(),
            limit: None,
        }
    }

    /// Create a history that keeps only the most recent `limit` transitions.
    ///
    /// Older entries are evicted as new ones are recorded, so a history
    /// attached to a long-running loop stays bounded. A limit of zero
    /// records nothing.
    ///
    /// # Example
    ///
    /// ```rust
    /// use phaselight::core::{Phase, PhaseHistory, PhaseTransition, Signal};
    /// use chrono::Utc;
    /// use std::time::Duration;
    ///
    /// let mut history = PhaseHistory::with_limit(2);
    /// let mut phase = Phase::Red;
    /// for cycle in 1..=3 {
    ///     history.record(PhaseTransition {
    ///         from: phase,
    ///         to: phase.toggled(),
    ///         timestamp: Utc::now(),
    ///         cycle,
    ///         cycle_duration: Duration::from_secs(5),
    ///     });
    ///     phase = phase.toggled();
    /// }
    ///
    /// assert_eq!(history.len(), 2);
    /// assert_eq!(history.get(0).map(|t| t.cycle), Some(2));
    /// ```
    pub fn with_limit(limit: usize) -> Self {
        Self {
            transitions: VecDeque::with_capacity(limit.min(PREALLOCATE_LIMIT)),
            limit: Some(limit),
        }
    }

    /// Maximum number of transitions kept, if bounded.
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Append a transition, evicting the oldest entry when at the limit.
    pub fn record(&mut self, transition: PhaseTransition<S>) {
        if let Some(limit) = self.limit {
            if limit == 0 {
                return;
            }
            while self.transitions.len() >= limit {
                self.transitions.pop_front();
            }
        }
        self.transitions.push_back(transition);
    }

    /// Get the path of phases traversed.
    ///
    /// Returns the `from` phase of the first retained transition followed
    /// by the `to` phase of every retained transition. Empty if nothing was
    /// recorded.
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::new();
        if let Some(first) = self.transitions.front() {
            path.push(&first.from);
        }
        for transition in &self.transitions {
            path.push(&transition.to);
        }
        path
    }

    /// The published values in order, i.e. every `to` phase.
    pub fn published(&self) -> Vec<S> {
        self.transitions.iter().map(|t| t.to).collect()
    }

    /// Time between the first and last retained toggle.
    ///
    /// Returns `None` if there are no transitions.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.front(), self.transitions.back()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    /// Check that no two consecutive transitions publish the same value and
    /// that each transition starts where the previous one ended.
    pub fn is_alternating(&self) -> bool {
        self.transitions.iter().all(|t| t.from != t.to)
            && self
                .transitions
                .iter()
                .zip(self.transitions.iter().skip(1))
                .all(|(prev, next)| prev.to == next.from)
    }

    /// Most recent transition, if any.
    pub fn last(&self) -> Option<&PhaseTransition<S>> {
        self.transitions.back()
    }

    /// Transition at `index`, counting from the oldest retained entry.
    pub fn get(&self, index: usize) -> Option<&PhaseTransition<S>> {
        self.transitions.get(index)
    }

    /// Number of retained transitions.
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    /// Whether no transition has been retained.
    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Iterate over retained transitions, oldest first.
    pub fn transitions(&self) -> impl DoubleEndedIterator<Item = &PhaseTransition<S>> + '_ {
        self.transitions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Phase;

    fn toggle(from: Phase, cycle: u64) -> PhaseTransition<Phase> {
        PhaseTransition {
            from,
            to: from.toggled(),
            timestamp: Utc::now(),
            cycle,
            cycle_duration: Duration::from_secs(5),
        }
    }

    #[test]
    fn new_history_is_empty() {
        let history: PhaseHistory<Phase> = PhaseHistory::new();
        assert!(history.is_empty());
        assert!(history.get_path().is_empty());
        assert!(history.duration().is_none());
        assert!(history.last().is_none());
    }

    #[test]
    fn record_adds_transition() {
        let mut history = PhaseHistory::new();
        history.record(toggle(Phase::Red, 1));

        assert_eq!(history.len(), 1);
        assert_eq!(history.last().map(|t| t.to), Some(Phase::Green));
    }

    #[test]
    fn get_path_returns_phase_sequence() {
        let mut history = PhaseHistory::new();
        history.record(toggle(Phase::Red, 1));
        history.record(toggle(Phase::Green, 2));

        let path = history.get_path();
        assert_eq!(path, vec![&Phase::Red, &Phase::Green, &Phase::Red]);
        assert_eq!(history.published(), vec![Phase::Green, Phase::Red]);
    }

    #[test]
    fn alternation_detects_duplicates() {
        let mut history = PhaseHistory::new();
        history.record(toggle(Phase::Red, 1));
        history.record(toggle(Phase::Green, 2));
        assert!(history.is_alternating());

        history.record(toggle(Phase::Green, 3));
        assert!(!history.is_alternating());
    }

    #[test]
    fn alternation_rejects_self_transition() {
        let mut history = PhaseHistory::new();
        history.record(PhaseTransition {
            from: Phase::Red,
            to: Phase::Red,
            timestamp: Utc::now(),
            cycle: 1,
            cycle_duration: Duration::ZERO,
        });
        assert!(!history.is_alternating());
    }

    #[test]
    fn duration_calculates_elapsed_time() {
        let mut history = PhaseHistory::new();
        history.record(toggle(Phase::Red, 1));

        std::thread::sleep(Duration::from_millis(10));

        history.record(toggle(Phase::Green, 2));

        let duration = history.duration();
        assert!(duration.is_some());
        assert!(duration.unwrap() >= Duration::from_millis(10));
    }

    #[test]
    fn single_transition_has_duration_zero() {
        let mut history = PhaseHistory::new();
        history.record(toggle(Phase::Red, 1));

        assert_eq!(history.duration(), Some(Duration::ZERO));
    }

    #[test]
    fn history_serializes_correctly() {
        let mut history = PhaseHistory::new();
        history.record(toggle(Phase::Red, 1));

        let json = serde_json::to_string(&history).unwrap();
        let deserialized: PhaseHistory<Phase> = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.len(), 1);
        assert_eq!(deserialized.get(0).unwrap().cycle, 1);
        assert_eq!(deserialized.get(0).unwrap().to, Phase::Green);
    }

    #[test]
    fn limited_history_evicts_oldest() {
        let mut history = PhaseHistory::with_limit(3);
        let mut phase = Phase::Red;
        for cycle in 1..=10 {
            history.record(toggle(phase, cycle));
            phase = phase.toggled();
        }

        assert_eq!(history.len(), 3);
        assert_eq!(history.limit(), Some(3));
        let cycles: Vec<u64> = history.transitions().map(|t| t.cycle).collect();
        assert_eq!(cycles, vec![8, 9, 10]);
        assert!(history.is_alternating());
    }

    #[test]
    fn zero_limit_records_nothing() {
        let mut history = PhaseHistory::with_limit(0);
        history.record(toggle(Phase::Red, 1));

        assert!(history.is_empty());
    }

    #[test]
    fn unlimited_history_keeps_everything() {
        let mut history = PhaseHistory::new();
        let mut phase = Phase::Red;
        for cycle in 1..=50 {
            history.record(toggle(phase, cycle));
            phase = phase.toggled();
        }

        assert_eq!(history.len(), 50);
        assert_eq!(history.limit(), None);
    }

    #[test]
    fn limit_survives_serialization() {
        let mut history = PhaseHistory::with_limit(1);
        history.record(toggle(Phase::Red, 1));

        let json = serde_json::to_string(&history).unwrap();
        let mut deserialized: PhaseHistory<Phase> = serde_json::from_str(&json).unwrap();
        deserialized.record(toggle(Phase::Green, 2));

        assert_eq!(deserialized.len(), 1);
        assert_eq!(deserialized.last().map(|t| t.cycle), Some(2));
    }
}
