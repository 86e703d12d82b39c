use serde::{Deserialize, Serialize};

use super::{hhmm, BreakKind, BreakWindow, Course, Day, Department, FacultyId, Room, Section};
use super::{CourseCode, SectionId};

/// Configuration for the schedule grid, breaks and engine limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Candidate start-time granularity in minutes
    #[serde(default = "default_slot_minutes")]
    pub slot_minutes: u16,
    #[serde(default = "default_day_start", with = "hhmm")]
    pub day_start: u16,
    #[serde(default = "default_day_end", with = "hhmm")]
    pub day_end: u16,
    #[serde(default = "default_days")]
    pub scheduling_days: Vec<Day>,
    #[serde(default = "default_departments")]
    pub departments: Vec<Department>,
    #[serde(default = "default_breaks")]
    pub breaks: Vec<BreakWindow>,
    /// Courses above this enrollment list teaching assistants in reports
    #[serde(default = "default_ta_threshold")]
    pub ta_threshold: u32,
    /// Global cap on placement rollbacks before settling for a partial result
    #[serde(default = "default_max_backtracks")]
    pub max_backtracks: u32,
}

fn default_slot_minutes() -> u16 {
    30
}

fn default_day_start() -> u16 {
    9 * 60
}

fn default_day_end() -> u16 {
    19 * 60 + 30
}

fn default_days() -> Vec<Day> {
    Day::ALL.to_vec()
}

fn default_departments() -> Vec<Department> {
    vec![
        Department::from("CSE"),
        Department::from("DSAI"),
        Department::from("ECE"),
    ]
}

fn default_ta_threshold() -> u32 {
    100
}

fn default_max_backtracks() -> u32 {
    2000
}

fn default_breaks() -> Vec<BreakWindow> {
    let lunch = |dept: &str, start: u16, end: u16| BreakWindow {
        kind: BreakKind::Lunch,
        department: Some(Department::from(dept)),
        start,
        end,
    };
    vec![
        BreakWindow {
            kind: BreakKind::Morning,
            department: None,
            start: 10 * 60 + 30,
            end: 11 * 60,
        },
        lunch("CSE", 13 * 60, 14 * 60 + 30),
        lunch("DSAI", 13 * 60 + 15, 14 * 60 + 45),
        lunch("ECE", 13 * 60 + 30, 15 * 60),
        BreakWindow {
            kind: BreakKind::Snack,
            department: None,
            start: 16 * 60 + 30,
            end: 17 * 60,
        },
    ]
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            slot_minutes: default_slot_minutes(),
            day_start: default_day_start(),
            day_end: default_day_end(),
            scheduling_days: default_days(),
            departments: default_departments(),
            breaks: default_breaks(),
            ta_threshold: default_ta_threshold(),
            max_backtracks: default_max_backtracks(),
        }
    }
}

/// A faculty member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Faculty {
    pub id: FacultyId,
    pub name: String,
}

/// A teaching assistant attached to one course; rendering only
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assistant {
    pub id: String,
    pub name: String,
    pub course_code: CourseCode,
}

/// Per-(course, section) enrollment override for electives
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElectiveEnrollment {
    pub course_code: CourseCode,
    pub section_id: SectionId,
    pub enrollment: u32,
}

/// All input data bundled together; immutable during generation
#[derive(Debug, Clone)]
pub struct TimetableInput {
    pub courses: Vec<Course>,
    pub rooms: Vec<Room>,
    pub sections: Vec<Section>,
    pub faculty: Vec<Faculty>,
    pub assistants: Vec<Assistant>,
    pub config: ScheduleConfig,
}
