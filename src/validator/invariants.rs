use itertools::Itertools;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::calendar::Calendar;
use crate::types::{
    Assignment, BasketId, CourseCode, Department, Interval, Room, RoomId, SessionKind, Timetable,
    TimetableInput,
};
use crate::validator::{Severity, Violation};

fn error(constraint: &str, message: String) -> Violation {
    Violation {
        constraint: constraint.to_string(),
        message,
        severity: Severity::Error,
    }
}

/// Room, faculty and section exclusivity over all overlapping pairs.
/// Assignments of one basket at one interval are parallel by design and are
/// exempt from the section check only.
pub fn check_exclusivity(timetable: &Timetable) -> Vec<Violation> {
    let mut violations = Vec::new();

    for (a, b) in timetable.assignments.iter().tuple_combinations() {
        if !a.interval.overlaps(&b.interval) {
            continue;
        }
        if let Some(room) = a.rooms.iter().find(|r| b.rooms.contains(r)) {
            violations.push(error(
                "RoomExclusivity",
                format!("Room '{room}' double-booked at {}", a.interval),
            ));
        }
        if let Some(fac) = a.faculty.intersection(&b.faculty).next() {
            violations.push(error(
                "FacultyExclusivity",
                format!("Faculty '{fac}' double-booked at {}", a.interval),
            ));
        }
        if !a.same_basket_slot(b) {
            if let Some(key) = a.sections.intersection(&b.sections).next() {
                violations.push(error(
                    "SectionExclusivity",
                    format!(
                        "Section '{key}' has '{}' and '{}' overlapping at {}",
                        a.course_code, b.course_code, a.interval
                    ),
                ));
            }
        }
    }
    violations
}

/// Lecture = 90 min, Tutorial = 60 min, Lab = 120 min
pub fn check_durations(timetable: &Timetable) -> Vec<Violation> {
    timetable
        .assignments
        .iter()
        .filter(|a| a.interval.duration_min() != a.kind.duration_min())
        .map(|a| {
            error(
                "SessionDuration",
                format!(
                    "'{}' {} runs {} min at {}",
                    a.course_code,
                    a.kind,
                    a.interval.duration_min(),
                    a.interval
                ),
            )
        })
        .collect()
}

/// Labs sit in lab rooms, everything else in teaching rooms
pub fn check_room_kinds(timetable: &Timetable, input: &TimetableInput) -> Vec<Violation> {
    let rooms: HashMap<&RoomId, &Room> = input.rooms.iter().map(|r| (&r.id, r)).collect();
    let mut violations = Vec::new();

    for a in &timetable.assignments {
        for room_id in &a.rooms {
            match rooms.get(room_id) {
                Some(room) if room.suits(a.kind) => {}
                Some(room) => violations.push(error(
                    "KindRoomCompatibility",
                    format!(
                        "'{}' {} assigned to {:?} room '{}'",
                        a.course_code, a.kind, room.kind, room.id
                    ),
                )),
                None => violations.push(error(
                    "KindRoomCompatibility",
                    format!("'{}' assigned to unknown room '{room_id}'", a.course_code),
                )),
            }
        }
    }
    violations
}

/// No assignment overlaps a break window applicable to any of its sections'
/// departments
pub fn check_breaks(timetable: &Timetable, input: &TimetableInput) -> Vec<Violation> {
    let calendar = Calendar::new(&input.config);
    let mut violations = Vec::new();

    for a in &timetable.assignments {
        let departments: BTreeSet<&Department> =
            a.sections.iter().map(|k| &k.department).collect();
        for dept in departments {
            if calendar.in_break(&a.interval, dept) {
                violations.push(error(
                    "BreakRespect",
                    format!(
                        "'{}' at {} overlaps a {dept} break window",
                        a.course_code, a.interval
                    ),
                ));
            }
        }
    }
    violations
}

/// Assigned rooms collectively seat the enrollment. Shortfalls the engine
/// already flagged (no sufficiently large room existed) downgrade to
/// warnings.
pub fn check_capacity(timetable: &Timetable, input: &TimetableInput) -> Vec<Violation> {
    let rooms: HashMap<&RoomId, &Room> = input.rooms.iter().map(|r| (&r.id, r)).collect();
    let mut violations = Vec::new();

    for a in &timetable.assignments {
        let enrollment: u32 = input
            .courses
            .iter()
            .filter(|c| c.code == a.course_code && a.covers_section(&c.timetable_key()))
            .map(|c| c.enrollment)
            .sum();
        let seats: u32 = a
            .rooms
            .iter()
            .filter_map(|id| rooms.get(id))
            .map(|r| r.capacity)
            .sum();
        if enrollment > seats {
            violations.push(Violation {
                constraint: "RoomCapacity".to_string(),
                message: format!(
                    "'{}' at {} seats {seats} of {enrollment} students",
                    a.course_code, a.interval
                ),
                severity: if a.capacity_warning {
                    Severity::Warning
                } else {
                    Severity::Error
                },
            });
        }
    }
    violations
}

/// No course has labs on adjacent working days
pub fn check_lab_adjacency(timetable: &Timetable, input: &TimetableInput) -> Vec<Violation> {
    let days = &input.config.scheduling_days;
    let position = |iv: &Interval| days.iter().position(|&d| d == iv.day);
    let mut violations = Vec::new();

    let labs: BTreeMap<&CourseCode, Vec<&Assignment>> = timetable
        .assignments
        .iter()
        .filter(|a| a.kind == SessionKind::Lab)
        .map(|a| (&a.course_code, a))
        .into_group_map()
        .into_iter()
        .collect();

    for (code, assignments) in labs {
        for (a, b) in assignments.iter().tuple_combinations() {
            if a.sections.is_disjoint(&b.sections) {
                continue;
            }
            if let (Some(pa), Some(pb)) = (position(&a.interval), position(&b.interval)) {
                if pa.abs_diff(pb) == 1 {
                    violations.push(error(
                        "LabSpacing",
                        format!(
                            "'{code}' has labs on {} and {}",
                            a.interval.day, b.interval.day
                        ),
                    ));
                }
            }
        }
    }
    violations
}

/// At most one lecture of a course per day
pub fn check_lecture_spacing(timetable: &Timetable) -> Vec<Violation> {
    let mut violations = Vec::new();
    for (a, b) in timetable
        .assignments
        .iter()
        .filter(|a| a.kind == SessionKind::Lecture)
        .tuple_combinations()
    {
        if a.course_code == b.course_code
            && !a.sections.is_disjoint(&b.sections)
            && a.interval.day == b.interval.day
        {
            violations.push(error(
                "LectureSpacing",
                format!(
                    "'{}' has two lectures on {}",
                    a.course_code, a.interval.day
                ),
            ));
        }
    }
    violations
}

/// Every course row not listed as a deficit carries exactly its required
/// session counts
pub fn check_session_counts(timetable: &Timetable, input: &TimetableInput) -> Vec<Violation> {
    let deficits: BTreeSet<(&CourseCode, SessionKind)> = timetable
        .deficits
        .iter()
        .map(|d| (&d.course_code, d.kind))
        .collect();
    let mut violations = Vec::new();

    for course in &input.courses {
        let key = course.timetable_key();
        for kind in SessionKind::PLACEMENT_ORDER {
            if deficits.contains(&(&course.code, kind)) {
                continue;
            }
            let required = course.sessions_of(kind);
            let placed = timetable.count_sessions(&course.code, &key, kind);
            if placed != required {
                violations.push(error(
                    "SessionCount",
                    format!(
                        "'{}' in {key}: {placed} of {required} {kind} sessions",
                        course.code
                    ),
                ));
            }
        }
    }
    violations
}

/// Each basket slot runs every elective of the basket in parallel
pub fn check_basket_coherence(timetable: &Timetable, input: &TimetableInput) -> Vec<Violation> {
    let mut basket_codes: BTreeMap<&BasketId, BTreeSet<&CourseCode>> = BTreeMap::new();
    for course in input.courses.iter().filter(|c| c.is_elective) {
        if let Some(basket) = &course.basket_id {
            basket_codes.entry(basket).or_default().insert(&course.code);
        }
    }

    let mut violations = Vec::new();
    for (basket, codes) in basket_codes {
        let mut by_interval: BTreeMap<Interval, BTreeSet<&CourseCode>> = BTreeMap::new();
        for a in timetable
            .assignments
            .iter()
            .filter(|a| a.basket_id.as_ref() == Some(basket))
        {
            by_interval
                .entry(a.interval)
                .or_default()
                .insert(&a.course_code);
        }
        for (interval, present) in by_interval {
            if present != codes {
                violations.push(error(
                    "BasketCoherence",
                    format!(
                        "Basket '{basket}' at {interval} runs {} of {} electives",
                        present.len(),
                        codes.len()
                    ),
                ));
            }
        }
    }
    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        Day, FacultyId, ScheduleConfig, SectionId, TimetableKey, TimetableMetadata,
    };

    fn assignment(code: &str, day: Day, start: u16, end: u16, room: &str) -> Assignment {
        Assignment {
            course_code: CourseCode::from(code),
            kind: SessionKind::Lecture,
            interval: Interval::new(day, start, end),
            rooms: vec![RoomId::from(room)],
            faculty: BTreeSet::from([FacultyId::from("F1")]),
            sections: BTreeSet::from([TimetableKey::new(
                Department::from("CSE"),
                4,
                SectionId::from("A"),
            )]),
            basket_id: None,
            capacity_warning: false,
        }
    }

    fn timetable(assignments: Vec<Assignment>) -> Timetable {
        Timetable {
            assignments,
            deficits: vec![],
            metadata: TimetableMetadata::default(),
        }
    }

    fn empty_input() -> TimetableInput {
        TimetableInput {
            courses: vec![],
            rooms: vec![],
            sections: vec![],
            faculty: vec![],
            assistants: vec![],
            config: ScheduleConfig::default(),
        }
    }

    #[test]
    fn test_detects_room_double_booking() {
        let tt = timetable(vec![
            assignment("CS301", Day::Mon, 540, 630, "C101"),
            assignment("CS302", Day::Mon, 600, 690, "C101"),
        ]);
        let violations = check_exclusivity(&tt);
        assert!(violations
            .iter()
            .any(|v| v.constraint == "RoomExclusivity"));
    }

    #[test]
    fn test_detects_two_lectures_same_day() {
        let tt = timetable(vec![
            assignment("CS301", Day::Mon, 540, 630, "C101"),
            assignment("CS301", Day::Mon, 690, 780, "C102"),
        ]);
        assert_eq!(check_lecture_spacing(&tt).len(), 1);
    }

    #[test]
    fn test_detects_adjacent_lab_days() {
        let lab = |day, start: u16| Assignment {
            kind: SessionKind::Lab,
            interval: Interval::new(day, start, start + 120),
            ..assignment("CS310", day, start, start + 120, "L106")
        };
        let tt = timetable(vec![lab(Day::Mon, 540), lab(Day::Tue, 540)]);
        let violations = check_lab_adjacency(&tt, &empty_input());
        assert_eq!(violations.len(), 1);

        let spread = timetable(vec![lab(Day::Mon, 540), lab(Day::Wed, 540)]);
        assert!(check_lab_adjacency(&spread, &empty_input()).is_empty());

        // two labs on one day at different times are not an adjacency issue
        let same_day = timetable(vec![lab(Day::Mon, 540), lab(Day::Mon, 690)]);
        assert!(check_lab_adjacency(&same_day, &empty_input()).is_empty());
    }

    #[test]
    fn test_wrong_duration_flagged() {
        let mut a = assignment("CS301", Day::Mon, 540, 600, "C101");
        a.kind = SessionKind::Lecture; // 60 min instead of 90
        assert_eq!(check_durations(&timetable(vec![a])).len(), 1);
    }

    #[test]
    fn test_break_overlap_flagged() {
        // 10:00-11:30 crosses the 10:30-11:00 morning break
        let tt = timetable(vec![assignment("CS301", Day::Mon, 600, 690, "C101")]);
        let violations = check_breaks(&tt, &empty_input());
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].constraint, "BreakRespect");
    }
}
