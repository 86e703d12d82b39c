use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{BasketId, CourseCode, FacultyId, Interval, RoomId, SessionKind, TimetableKey};

/// A committed session placement.
///
/// `sections` is a singleton for normal courses and holds every involved key
/// for combined courses and elective baskets. `rooms` is a singleton except
/// for batched labs, where index i is batch label 'A' + i running in
/// parallel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub course_code: CourseCode,
    pub kind: SessionKind,
    pub interval: Interval,
    pub rooms: Vec<RoomId>,
    pub faculty: BTreeSet<FacultyId>,
    pub sections: BTreeSet<TimetableKey>,
    #[serde(default)]
    pub basket_id: Option<BasketId>,
    /// Set when the best available room(s) could not seat the enrollment
    #[serde(default)]
    pub capacity_warning: bool,
}

impl Assignment {
    pub fn is_batched(&self) -> bool {
        self.rooms.len() > 1
    }

    /// Batch label for room index i ("A", "B", ...)
    pub fn batch_label(index: usize) -> char {
        (b'A' + index as u8) as char
    }

    pub fn covers_section(&self, key: &TimetableKey) -> bool {
        self.sections.contains(key)
    }

    /// Two assignments of the same basket at the same interval are the
    /// parallel legs of one elective slot, not a conflict.
    pub fn same_basket_slot(&self, other: &Assignment) -> bool {
        match (&self.basket_id, &other.basket_id) {
            (Some(a), Some(b)) => a == b && self.interval == other.interval,
            _ => false,
        }
    }
}

/// A course still short of its required session count after repair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deficit {
    pub course_code: CourseCode,
    pub kind: SessionKind,
    pub missing: u32,
}

/// Metadata about a generation run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimetableMetadata {
    pub generated_at: String,
    pub algorithm_version: String,
    pub seed: u64,
    pub backtracks: u32,
    pub solve_time_ms: u64,
}

/// The complete generated timetable: the resolved assignment set plus any
/// deficits the repair pass could not close. Read-only after generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timetable {
    pub assignments: Vec<Assignment>,
    pub deficits: Vec<Deficit>,
    pub metadata: TimetableMetadata,
}

impl Timetable {
    /// Assignments covering one rendered timetable
    pub fn assignments_for(&self, key: &TimetableKey) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.covers_section(key))
            .collect()
    }

    /// Placed sessions of one kind for a course within a section row
    pub fn count_sessions(&self, code: &CourseCode, key: &TimetableKey, kind: SessionKind) -> u32 {
        self.assignments
            .iter()
            .filter(|a| a.course_code == *code && a.kind == kind && a.covers_section(key))
            .count() as u32
    }

    pub fn capacity_warnings(&self) -> impl Iterator<Item = &Assignment> {
        self.assignments.iter().filter(|a| a.capacity_warning)
    }

    /// Canonical order: (day, start, first section, course). Applied before
    /// the timetable is returned so equal seeds yield identical output.
    pub fn sort_canonical(&mut self) {
        self.assignments.sort_by(|a, b| {
            (a.interval.day, a.interval.start, &a.sections, &a.course_code).cmp(&(
                b.interval.day,
                b.interval.start,
                &b.sections,
                &b.course_code,
            ))
        });
    }
}
