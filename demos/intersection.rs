//! Intersection Demo
//!
//! A traffic light cycles between Red and Green while a handful of
//! vehicles queue up and wait for a green light before crossing.
//!
//! Key concepts:
//! - One background producer (the light)
//! - Several blocking consumers (the vehicles)
//! - Each Green releases exactly one waiting vehicle
//!
//! Run with: cargo run --example intersection
//! Set PHASELIGHT_LOG=debug to see every published phase.

use phaselight::{CycleConfig, PhaseController};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const VEHICLES: usize = 4;

fn init_logging() {
    let filter =
        EnvFilter::try_from_env("PHASELIGHT_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    println!("=== Intersection ===\n");

    // Shorter cycles than the 4-6 s default so the demo finishes quickly
    let config = CycleConfig::builder()
        .cycle_range(Duration::from_millis(400), Duration::from_millis(600))
        .build()?;
    let light = Arc::new(PhaseController::with_config(config)?);
    println!("Initial phase: {}\n", light.current_phase());

    let handle = light.simulate()?;

    let vehicles: Vec<_> = (1..=VEHICLES)
        .map(|id| {
            let light = Arc::clone(&light);
            thread::spawn(move || {
                println!("Vehicle #{id} is waiting at the intersection");
                let observed = light.wait_for_green();
                println!("Vehicle #{id} crosses on green (observed {observed} phases)");
            })
        })
        .collect();

    for vehicle in vehicles {
        vehicle.join().map_err(|_| "vehicle thread panicked")?;
    }

    handle.stop()?;

    let history = light.history();
    println!("\nPublished {} phases:", history.len());
    for transition in history.transitions() {
        println!(
            "  cycle {:>2}: {} -> {} after {:?}",
            transition.cycle, transition.from, transition.to, transition.cycle_duration
        );
    }

    println!("\n=== Demo Complete ===");
    Ok(())
}
