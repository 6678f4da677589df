//! Property-based tests for the channel, waiter, and cycle timing.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated inputs.

use chrono::Utc;
use phaselight::controller::random_duration;
use phaselight::core::{Phase, PhaseHistory, PhaseTransition, Signal};
use phaselight::{BlockingChannel, PhaseWaiter};
use proptest::prelude::*;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

prop_compose! {
    fn arbitrary_phase()(green in any::<bool>()) -> Phase {
        if green { Phase::Green } else { Phase::Red }
    }
}

proptest! {
    #[test]
    fn channel_preserves_fifo_order(values in prop::collection::vec(any::<u32>(), 0..64)) {
        let channel = BlockingChannel::new();
        for value in &values {
            channel.send(*value);
        }

        let received: Vec<u32> = (0..values.len()).map(|_| channel.receive()).collect();

        prop_assert_eq!(received, values);
        prop_assert!(channel.is_empty());
    }

    #[test]
    fn fifo_holds_with_concurrent_producer(values in prop::collection::vec(any::<u16>(), 1..32)) {
        let channel = Arc::new(BlockingChannel::new());

        let producer = {
            let channel = Arc::clone(&channel);
            let values = values.clone();
            thread::spawn(move || {
                for value in values {
                    channel.send(value);
                }
            })
        };

        let received: Vec<u16> = (0..values.len()).map(|_| channel.receive()).collect();
        producer.join().unwrap();

        prop_assert_eq!(received, values);
    }

    #[test]
    fn waiter_consumes_exactly_through_first_match(
        prefix in prop::collection::vec(Just(Phase::Red), 0..20),
        suffix in prop::collection::vec(arbitrary_phase(), 0..10)
    ) {
        let channel = Arc::new(BlockingChannel::new());
        for phase in prefix.iter().chain(std::iter::once(&Phase::Green)).chain(suffix.iter()) {
            channel.send(*phase);
        }

        let consumed = PhaseWaiter::new(Arc::clone(&channel)).wait_for_green();

        prop_assert_eq!(consumed, prefix.len() + 1);
        prop_assert_eq!(channel.len(), suffix.len());
    }

    #[test]
    fn random_duration_stays_in_half_open_interval(
        min_ms in 0u64..10_000,
        span_ms in 1u64..10_000
    ) {
        let min = Duration::from_millis(min_ms);
        let max = min + Duration::from_millis(span_ms);

        let drawn = random_duration(min, max);

        prop_assert!(drawn >= min);
        prop_assert!(drawn < max);
    }

    #[test]
    fn toggling_history_always_alternates(start in arbitrary_phase(), toggles in 0usize..50) {
        let mut history = PhaseHistory::new();
        let mut phase = start;
        for cycle in 0..toggles {
            let next = phase.toggled();
            history.record(PhaseTransition {
                from: phase,
                to: next,
                timestamp: Utc::now(),
                cycle: cycle as u64 + 1,
                cycle_duration: Duration::from_secs(5),
            });
            phase = next;
        }

        prop_assert!(history.is_alternating());
        prop_assert_eq!(history.len(), toggles);
    }

    #[test]
    fn phase_roundtrip_serialization(phase in arbitrary_phase()) {
        let json = serde_json::to_string(&phase).unwrap();
        let deserialized: Phase = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(phase, deserialized);
    }
}

#[test]
fn sampled_cycle_durations_lie_in_default_interval() {
    let min = Duration::from_secs(4);
    let max = Duration::from_secs(6);

    for _ in 0..10_000 {
        let drawn = random_duration(min, max);
        assert!(drawn >= min && drawn < max, "{drawn:?} outside [4s, 6s)");
    }
}
