use itertools::Itertools;

use crate::types::{Timetable, TimetableInput, TimetableKey};

/// Plain-text report: per-section day listings plus warnings
pub fn generate_text_report(timetable: &Timetable, input: &TimetableInput) -> String {
    let mut lines = vec![
        "WEEKLY TIMETABLE".to_string(),
        "=".repeat(40),
        String::new(),
    ];

    let keys: Vec<TimetableKey> = input
        .sections
        .iter()
        .map(|s| TimetableKey::new(s.department.clone(), s.semester, s.id.clone()))
        .sorted()
        .collect();

    for key in keys {
        lines.push(format!("{key}"));
        lines.push("-".repeat(40));
        let assignments = timetable.assignments_for(&key);
        if assignments.is_empty() {
            lines.push("  (no sessions)".to_string());
        }
        for a in assignments {
            let rooms = a.rooms.iter().map(|r| r.0.as_str()).join(", ");
            lines.push(format!(
                "  {}  {} ({})  [{}]{}",
                a.interval,
                a.course_code,
                a.kind.tag(),
                rooms,
                if a.capacity_warning { "  (over capacity)" } else { "" }
            ));
        }
        lines.push(String::new());
    }

    if !timetable.deficits.is_empty() {
        lines.push("UNRESOLVED SESSIONS".to_string());
        lines.push("-".repeat(40));
        for deficit in &timetable.deficits {
            lines.push(format!(
                "  {} short {} {} session(s)",
                deficit.course_code, deficit.missing, deficit.kind
            ));
        }
        lines.push(String::new());
    }

    lines.push(format!(
        "Seed {}  Backtracks {}  Solve time {} ms",
        timetable.metadata.seed, timetable.metadata.backtracks, timetable.metadata.solve_time_ms
    ));
    lines.join("\n")
}
