mod invariants;
mod repair;

pub use invariants::*;
pub use repair::*;

use crate::types::{SessionKind, Timetable, TimetableInput};

/// Result of auditing a generated timetable
#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub violations: Vec<Violation>,
    pub statistics: TimetableStatistics,
}

/// A constraint violation found by the audit
#[derive(Debug, Clone)]
pub struct Violation {
    pub constraint: String,
    pub message: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Severity {
    Error,
    Warning,
}

/// Statistics about the timetable
#[derive(Debug, Clone)]
pub struct TimetableStatistics {
    pub total_assignments: usize,
    pub lectures: usize,
    pub tutorials: usize,
    pub labs: usize,
    pub capacity_warnings: usize,
    pub unresolved_deficits: usize,
}

/// Audit a timetable against every hard constraint and the per-course
/// session-count law. Capacity shortfalls already flagged on their
/// assignment surface as warnings, not errors.
pub fn audit_timetable(timetable: &Timetable, input: &TimetableInput) -> ValidationReport {
    let mut violations = Vec::new();

    violations.extend(check_exclusivity(timetable));
    violations.extend(check_durations(timetable));
    violations.extend(check_room_kinds(timetable, input));
    violations.extend(check_breaks(timetable, input));
    violations.extend(check_capacity(timetable, input));
    violations.extend(check_lab_adjacency(timetable, input));
    violations.extend(check_lecture_spacing(timetable));
    violations.extend(check_session_counts(timetable, input));
    violations.extend(check_basket_coherence(timetable, input));

    let statistics = calculate_statistics(timetable);
    let is_valid = violations.iter().all(|v| v.severity != Severity::Error);

    ValidationReport {
        is_valid,
        violations,
        statistics,
    }
}

fn calculate_statistics(timetable: &Timetable) -> TimetableStatistics {
    let count =
        |kind: SessionKind| timetable.assignments.iter().filter(|a| a.kind == kind).count();
    TimetableStatistics {
        total_assignments: timetable.assignments.len(),
        lectures: count(SessionKind::Lecture),
        tutorials: count(SessionKind::Tutorial),
        labs: count(SessionKind::Lab),
        capacity_warnings: timetable.capacity_warnings().count(),
        unresolved_deficits: timetable.deficits.len(),
    }
}
