use std::collections::BTreeMap;

use crate::ledger::AssignmentLedger;
use crate::scheduler::{PlacementEngine, PlacementJob, PlacementOutcome};
use crate::types::{CourseCode, Deficit, SessionKind};

/// Last-chance pass over sessions the main run could not place.
///
/// Each unplaced job gets one fresh placement attempt with new random
/// draws and no backtracking. The pass is strictly additive: committed
/// assignments are never evicted or moved. Whatever still fails is
/// reported as a deficit, never as a fatal error.
pub fn repair_pass(
    jobs: &[PlacementJob],
    outcomes: &[PlacementOutcome],
    engine: &mut PlacementEngine,
    ledger: &mut AssignmentLedger,
) -> Vec<Deficit> {
    let mut missing: BTreeMap<(CourseCode, SessionKind), u32> = BTreeMap::new();

    for (job, outcome) in jobs.iter().zip(outcomes) {
        if *outcome == PlacementOutcome::Placed {
            continue;
        }
        if engine.place_job(job, ledger).is_ok() {
            continue;
        }
        // a failed basket job leaves every elective short one session
        for demand in &job.demands {
            *missing.entry((demand.course.clone(), job.kind)).or_default() += 1;
        }
    }

    missing
        .into_iter()
        .map(|((course_code, kind), count)| Deficit {
            course_code,
            kind,
            missing: count,
        })
        .collect()
}
