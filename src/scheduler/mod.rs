mod basket;
mod combined;
mod engine;
mod expansion;

pub use basket::*;
pub use combined::*;
pub use engine::*;
pub use expansion::*;

use crate::calendar::Calendar;
use crate::error::Result;
use crate::ledger::AssignmentLedger;
use crate::registry::ResourceRegistry;
use crate::types::{Timetable, TimetableInput, TimetableMetadata};
use crate::validator::repair_pass;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Instant;

/// Main entry point for timetable generation.
///
/// Identical input and seed produce an identical assignment list. The run
/// never fails on placement dead-ends; unresolved sessions surface as
/// deficits on the returned timetable.
pub fn generate_timetable(input: &TimetableInput, seed: u64, quiet: bool) -> Result<Timetable> {
    let start_time = Instant::now();

    let progress = if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(100);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}% {msg}")
                .unwrap()
                .progress_chars("#>-"),
        );
        pb
    };

    // Phase 1: Expand courses into placement jobs
    progress.set_message("Expanding course sessions...");
    progress.set_position(10);
    let calendar = Calendar::new(&input.config);
    let registry = ResourceRegistry::new(&input.rooms, &input.faculty, &input.sections);
    let jobs = build_jobs(input, &registry);

    // Phase 2-3: Place sessions (regular, then combined, then baskets)
    progress.set_message("Placing sessions...");
    progress.set_position(25);
    let mut ledger = AssignmentLedger::new(input.config.scheduling_days.clone());
    let mut engine =
        PlacementEngine::new(&calendar, &registry, seed, input.config.max_backtracks);
    let outcomes = engine.place_all(&jobs, &mut ledger);

    // Phase 4: Strictly additive repair of any missing sessions
    progress.set_message("Repairing deficits...");
    progress.set_position(85);
    let deficits = repair_pass(&jobs, &outcomes, &mut engine, &mut ledger);

    progress.set_message("Complete!");
    progress.set_position(100);
    progress.finish_with_message("Timetable generated");

    let elapsed = start_time.elapsed();
    let backtracks = engine.backtracks();

    let mut timetable = Timetable {
        assignments: ledger.into_assignments(),
        deficits,
        metadata: TimetableMetadata {
            generated_at: chrono::Utc::now().to_rfc3339(),
            algorithm_version: env!("CARGO_PKG_VERSION").to_string(),
            seed,
            backtracks,
            solve_time_ms: elapsed.as_millis() as u64,
        },
    };
    timetable.sort_canonical();
    Ok(timetable)
}
