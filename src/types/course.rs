use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{
    BasketId, CourseCode, Department, FacultyId, RoomId, RoomKind, SectionId, SessionKind,
    TimetableKey,
};

/// One course offering for one section, with its weekly L-T-P contact hours
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub code: CourseCode,
    pub name: String,
    pub section_id: SectionId,
    pub department: Department,
    pub semester: u8,
    /// Weekly lecture contact hours; may be fractional (e.g. 1.5)
    pub lecture_hours: f32,
    /// Weekly tutorial contact hours
    pub tutorial_hours: u8,
    /// Weekly practical contact hours
    pub practical_hours: u8,
    pub credits: f32,
    pub enrollment: u32,
    pub faculty: BTreeSet<FacultyId>,
    /// Several sections attend one teaching; grouped by (code, faculty)
    #[serde(default)]
    pub is_combined: bool,
    #[serde(default)]
    pub is_elective: bool,
    /// Electives sharing a basket must share their time slots
    #[serde(default)]
    pub basket_id: Option<BasketId>,
    /// Non-lab sessions must use this room when set
    #[serde(default)]
    pub fixed_room: Option<RoomId>,
    /// Labs run in a computer lab when true, a hardware lab when false.
    /// Resolved from the course code's subject family when absent.
    #[serde(default)]
    pub software_lab: Option<bool>,
}

impl Course {
    /// Weekly lecture sessions: ceil(L / 1.5), computed over half-hour units
    /// so fractional hours never drift through floating point.
    pub fn lecture_sessions(&self) -> u32 {
        let half_hours = (self.lecture_hours * 2.0).round() as u32;
        half_hours.div_ceil(3)
    }

    /// Weekly tutorial sessions: one 60-minute session per contact hour
    pub fn tutorial_sessions(&self) -> u32 {
        u32::from(self.tutorial_hours)
    }

    /// Weekly lab sessions: ceil(P / 2); each lab is a 120-minute block
    pub fn lab_sessions(&self) -> u32 {
        u32::from(self.practical_hours).div_ceil(2)
    }

    pub fn sessions_of(&self, kind: SessionKind) -> u32 {
        match kind {
            SessionKind::Lecture => self.lecture_sessions(),
            SessionKind::Tutorial => self.tutorial_sessions(),
            SessionKind::Lab => self.lab_sessions(),
        }
    }

    pub fn total_sessions(&self) -> u32 {
        self.lecture_sessions() + self.tutorial_sessions() + self.lab_sessions()
    }

    pub fn timetable_key(&self) -> TimetableKey {
        TimetableKey::new(
            self.department.clone(),
            self.semester,
            self.section_id.clone(),
        )
    }

    /// Lab room family for this course's practicals
    pub fn lab_room_kind(&self) -> RoomKind {
        let software = self
            .software_lab
            .unwrap_or_else(|| self.code.0.contains("CS") || self.code.0.contains("DS"));
        if software {
            RoomKind::ComputerLab
        } else {
            RoomKind::HardwareLab
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(l: f32, t: u8, p: u8) -> Course {
        Course {
            code: CourseCode::from("CS301"),
            name: "Systems".to_string(),
            section_id: SectionId::from("A"),
            department: Department::from("CSE"),
            semester: 4,
            lecture_hours: l,
            tutorial_hours: t,
            practical_hours: p,
            credits: l + f32::from(t) + f32::from(p) / 2.0,
            enrollment: 60,
            faculty: BTreeSet::from([FacultyId::from("F1")]),
            is_combined: false,
            is_elective: false,
            basket_id: None,
            fixed_room: None,
            software_lab: None,
        }
    }

    #[test]
    fn test_session_counts_from_credit_tuple() {
        let c = course(3.0, 1, 2);
        assert_eq!(c.lecture_sessions(), 2);
        assert_eq!(c.tutorial_sessions(), 1);
        assert_eq!(c.lab_sessions(), 1);
        assert_eq!(c.total_sessions(), 4);
    }

    #[test]
    fn test_fractional_lecture_hours_are_exact() {
        assert_eq!(course(1.5, 0, 0).lecture_sessions(), 1);
        assert_eq!(course(4.5, 0, 0).lecture_sessions(), 3);
        // 1 contact hour still needs one full 90-minute slot
        assert_eq!(course(1.0, 0, 0).lecture_sessions(), 1);
        assert_eq!(course(0.0, 0, 0).lecture_sessions(), 0);
    }

    #[test]
    fn test_odd_practical_hours_round_up() {
        assert_eq!(course(0.0, 0, 3).lab_sessions(), 2);
        assert_eq!(course(0.0, 0, 4).lab_sessions(), 2);
    }

    #[test]
    fn test_lab_room_family() {
        let mut c = course(0.0, 0, 2);
        assert_eq!(c.lab_room_kind(), RoomKind::ComputerLab);
        c.code = CourseCode::from("EC204");
        assert_eq!(c.lab_room_kind(), RoomKind::HardwareLab);
        c.software_lab = Some(true);
        assert_eq!(c.lab_room_kind(), RoomKind::ComputerLab);
    }
}
