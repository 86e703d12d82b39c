use crate::error::Result;
use crate::export::ExportView;
use crate::types::Timetable;

/// The resolved assignment list as pretty JSON; the renderer contract
pub fn generate_json_report(timetable: &Timetable) -> Result<String> {
    Ok(serde_json::to_string_pretty(timetable)?)
}

/// The display grid as pretty JSON
pub fn generate_grid_json(view: &ExportView) -> Result<String> {
    Ok(serde_json::to_string_pretty(view)?)
}

/// Summary statistics as JSON
#[derive(serde::Serialize)]
pub struct JsonSummary {
    pub total_assignments: usize,
    pub capacity_warnings: usize,
    pub unresolved_deficits: usize,
    pub backtracks: u32,
    pub seed: u64,
    pub solve_time_ms: u64,
}

pub fn generate_json_summary(timetable: &Timetable) -> Result<String> {
    let summary = JsonSummary {
        total_assignments: timetable.assignments.len(),
        capacity_warnings: timetable.capacity_warnings().count(),
        unresolved_deficits: timetable.deficits.len(),
        backtracks: timetable.metadata.backtracks,
        seed: timetable.metadata.seed,
        solve_time_ms: timetable.metadata.solve_time_ms,
    };

    Ok(serde_json::to_string_pretty(&summary)?)
}
