use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Department, SectionId};

/// A student section (one cohort attending one timetable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub id: SectionId,
    pub department: Department,
    pub semester: u8,
    /// Display label used in rendered timetables (e.g. "CS-4A")
    pub batch_label: String,
    pub enrollment: u32,
    /// Admission year, used for roll-number labels in reports
    pub year: u16,
}

/// Identifies one rendered timetable: (department, semester, section)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimetableKey {
    pub department: Department,
    pub semester: u8,
    pub section: SectionId,
}

impl TimetableKey {
    pub fn new(department: Department, semester: u8, section: SectionId) -> Self {
        Self {
            department,
            semester,
            section,
        }
    }
}

impl fmt::Display for TimetableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.department, self.semester, self.section)
    }
}
