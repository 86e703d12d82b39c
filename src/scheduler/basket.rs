//! Elective-basket coordinator: electives in one (department, semester)
//! basket run concurrently, so each basket session picks one interval and a
//! distinct room per elective. A candidate interval is accepted only if
//! every elective finds a room; the engine rolls back partial commits.

use std::collections::BTreeSet;

use crate::registry::ResourceRegistry;
use crate::scheduler::engine::{PlacementJob, RoomDemand};
use crate::scheduler::expansion::lab_batches;
use crate::types::{
    BasketId, Course, Department, FacultyId, SessionKind, TimetableInput, TimetableKey,
};

/// Jobs for every elective basket, in input order. The basket's L-T-P
/// profile (validated uniform) drives the session counts; every elective
/// contributes one room demand sized for its own enrollment.
pub fn basket_jobs(input: &TimetableInput, registry: &ResourceRegistry) -> Vec<PlacementJob> {
    let mut jobs = Vec::new();
    let mut seen: Vec<(&Department, u8, &BasketId)> = Vec::new();

    for course in input.courses.iter().filter(|c| c.is_elective) {
        let Some(basket) = &course.basket_id else {
            continue;
        };
        let group_key = (&course.department, course.semester, basket);
        if seen.contains(&group_key) {
            continue;
        }
        seen.push(group_key);

        let group: Vec<&Course> = input
            .courses
            .iter()
            .filter(|c| {
                c.is_elective
                    && c.department == course.department
                    && c.semester == course.semester
                    && c.basket_id.as_ref() == Some(basket)
            })
            .collect();

        let sections: BTreeSet<TimetableKey> =
            group.iter().map(|c| c.timetable_key()).collect();
        let faculty: BTreeSet<FacultyId> = group
            .iter()
            .flat_map(|c| c.faculty.iter().cloned())
            .collect();

        for kind in SessionKind::PLACEMENT_ORDER {
            for _ in 0..course.sessions_of(kind) {
                let demands: Vec<RoomDemand> = group
                    .iter()
                    .map(|elective| RoomDemand {
                        course: elective.code.clone(),
                        enrollment: elective.enrollment,
                        fixed_room: elective.fixed_room.clone(),
                        lab_kind: elective.lab_room_kind(),
                        batches: match kind {
                            SessionKind::Lab => {
                                lab_batches(elective, elective.enrollment, registry)
                            }
                            _ => 1,
                        },
                        faculty: elective.faculty.clone(),
                        sections: sections.clone(),
                        basket_id: Some(basket.clone()),
                    })
                    .collect();
                jobs.push(PlacementJob {
                    kind,
                    departments: BTreeSet::from([course.department.clone()]),
                    faculty: faculty.clone(),
                    sections: sections.clone(),
                    demands,
                });
            }
        }
    }
    jobs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CourseCode, ScheduleConfig, SectionId};

    fn elective(code: &str, fac: &str, enrollment: u32) -> Course {
        Course {
            code: CourseCode::from(code),
            name: code.to_string(),
            section_id: SectionId::from("A"),
            department: Department::from("CSE"),
            semester: 6,
            lecture_hours: 1.5,
            tutorial_hours: 0,
            practical_hours: 0,
            credits: 1.5,
            enrollment,
            faculty: BTreeSet::from([FacultyId::from(fac)]),
            is_combined: false,
            is_elective: true,
            basket_id: Some(BasketId::from("B1")),
            fixed_room: None,
            software_lab: None,
        }
    }

    #[test]
    fn test_basket_shares_interval_choice_across_electives() {
        let input = TimetableInput {
            courses: vec![elective("EL501", "F1", 35), elective("EL502", "F2", 40)],
            rooms: vec![],
            sections: vec![],
            faculty: vec![],
            assistants: vec![],
            config: ScheduleConfig::default(),
        };
        let registry = ResourceRegistry::new(&[], &[], &[]);
        let jobs = basket_jobs(&input, &registry);

        // one lecture session for the whole basket, two room demands
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].demands.len(), 2);
        assert_eq!(jobs[0].faculty.len(), 2);
        assert!(jobs[0]
            .demands
            .iter()
            .all(|d| d.basket_id == Some(BasketId::from("B1"))));
    }
}
