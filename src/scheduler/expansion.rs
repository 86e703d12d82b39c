use std::cmp::Reverse;
use std::collections::BTreeSet;

use crate::registry::ResourceRegistry;
use crate::scheduler::engine::{PlacementJob, RoomDemand};
use crate::types::{Course, SessionKind, TimetableInput, TimetableKey};

/// Parallel lab batches for an enrollment, derived from the smallest lab of
/// the required family. 1 when no lab of that family exists; the engine then
/// reports the session infeasible.
pub fn lab_batches(course: &Course, enrollment: u32, registry: &ResourceRegistry) -> u32 {
    registry
        .min_lab_capacity(course.lab_room_kind())
        .map_or(1, |cap| enrollment.div_ceil(cap).max(1))
}

/// Expand one teaching group into placement jobs: labs first, then
/// lectures, then tutorials. `enrollment` and `sections` may span several
/// sections for combined courses.
pub fn jobs_for_group(
    course: &Course,
    enrollment: u32,
    sections: BTreeSet<TimetableKey>,
    registry: &ResourceRegistry,
) -> Vec<PlacementJob> {
    let departments: BTreeSet<_> = std::iter::once(course.department.clone())
        .chain(sections.iter().map(|k| k.department.clone()))
        .collect();
    let mut jobs = Vec::with_capacity(course.total_sessions() as usize);
    for kind in SessionKind::PLACEMENT_ORDER {
        let batches = match kind {
            SessionKind::Lab => lab_batches(course, enrollment, registry),
            _ => 1,
        };
        for _ in 0..course.sessions_of(kind) {
            jobs.push(PlacementJob {
                kind,
                departments: departments.clone(),
                faculty: course.faculty.clone(),
                sections: sections.clone(),
                demands: vec![RoomDemand {
                    course: course.code.clone(),
                    enrollment,
                    fixed_room: course.fixed_room.clone(),
                    lab_kind: course.lab_room_kind(),
                    batches,
                    faculty: course.faculty.clone(),
                    sections: sections.clone(),
                    basket_id: None,
                }],
            });
        }
    }
    jobs
}

/// Jobs for every course scheduled on its own: neither combined nor part of
/// an elective basket. Courses are ordered most-constrained first; within a
/// course, labs precede lectures precede tutorials.
pub fn regular_jobs(input: &TimetableInput, registry: &ResourceRegistry) -> Vec<PlacementJob> {
    let mut courses: Vec<&Course> = input
        .courses
        .iter()
        .filter(|c| !c.is_combined && !(c.is_elective && c.basket_id.is_some()))
        .collect();
    courses.sort_by_key(|c| {
        (
            Reverse(c.lab_sessions()),
            Reverse(c.total_sessions()),
            Reverse(c.enrollment),
            c.code.clone(),
            c.section_id.clone(),
        )
    });

    courses
        .into_iter()
        .flat_map(|c| {
            jobs_for_group(
                c,
                c.enrollment,
                BTreeSet::from([c.timetable_key()]),
                registry,
            )
        })
        .collect()
}

/// Full job list in placement order: regular courses, then combined
/// courses, then elective baskets (the latter two in input order)
pub fn build_jobs(input: &TimetableInput, registry: &ResourceRegistry) -> Vec<PlacementJob> {
    let mut jobs = regular_jobs(input, registry);
    jobs.extend(super::combined::combined_jobs(input, registry));
    jobs.extend(super::basket::basket_jobs(input, registry));
    jobs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        CourseCode, Department, FacultyId, Room, RoomId, RoomKind, ScheduleConfig, SectionId,
    };

    fn course(code: &str, l: f32, t: u8, p: u8, enrollment: u32) -> Course {
        Course {
            code: CourseCode::from(code),
            name: code.to_string(),
            section_id: SectionId::from("A"),
            department: Department::from("CSE"),
            semester: 4,
            lecture_hours: l,
            tutorial_hours: t,
            practical_hours: p,
            credits: l + f32::from(t) + f32::from(p) / 2.0,
            enrollment,
            faculty: BTreeSet::from([FacultyId::from("F1")]),
            is_combined: false,
            is_elective: false,
            basket_id: None,
            fixed_room: None,
            software_lab: None,
        }
    }

    fn registry() -> ResourceRegistry {
        let rooms = vec![Room {
            id: RoomId::from("L106"),
            kind: RoomKind::ComputerLab,
            capacity: 40,
        }];
        ResourceRegistry::new(&rooms, &[], &[])
    }

    fn input(courses: Vec<Course>) -> TimetableInput {
        TimetableInput {
            courses,
            rooms: vec![],
            sections: vec![],
            faculty: vec![],
            assistants: vec![],
            config: ScheduleConfig::default(),
        }
    }

    #[test]
    fn test_labs_precede_lectures_precede_tutorials() {
        let jobs = jobs_for_group(
            &course("CS301", 3.0, 1, 2, 60),
            60,
            BTreeSet::new(),
            &registry(),
        );
        let kinds: Vec<SessionKind> = jobs.iter().map(|j| j.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SessionKind::Lab,
                SessionKind::Lecture,
                SessionKind::Lecture,
                SessionKind::Tutorial
            ]
        );
    }

    #[test]
    fn test_most_constrained_course_goes_first() {
        let input = input(vec![
            course("NOLAB", 3.0, 1, 0, 90),
            course("LAB", 1.5, 0, 2, 30),
        ]);
        let jobs = regular_jobs(&input, &registry());
        assert_eq!(jobs[0].demands[0].course, CourseCode::from("LAB"));
        assert_eq!(jobs[0].kind, SessionKind::Lab);
    }

    #[test]
    fn test_enrollment_above_lab_capacity_splits_batches() {
        let c = course("CS310", 0.0, 0, 2, 90);
        assert_eq!(lab_batches(&c, 90, &registry()), 3);
        let jobs = jobs_for_group(&c, 90, BTreeSet::new(), &registry());
        assert_eq!(jobs[0].demands[0].batches, 3);
    }
}
