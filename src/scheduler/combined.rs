//! Combined-section coordinator: one course code taught to several sections
//! at once. Each session becomes a single assignment spanning every
//! section's row, seated for the summed enrollment.

use std::collections::BTreeSet;

use crate::registry::ResourceRegistry;
use crate::scheduler::engine::PlacementJob;
use crate::scheduler::expansion::jobs_for_group;
use crate::types::{Course, CourseCode, TimetableInput, TimetableKey};

/// Jobs for every combined teaching group, in input order. Rows sharing a
/// course code and faculty set form one group; input validation guarantees
/// their L-T-P profiles match.
pub fn combined_jobs(input: &TimetableInput, registry: &ResourceRegistry) -> Vec<PlacementJob> {
    let mut jobs = Vec::new();
    let mut seen: Vec<&CourseCode> = Vec::new();

    for course in input.courses.iter().filter(|c| c.is_combined) {
        if seen.contains(&&course.code) {
            continue;
        }
        seen.push(&course.code);

        let group: Vec<&Course> = input
            .courses
            .iter()
            .filter(|c| c.is_combined && c.code == course.code && c.faculty == course.faculty)
            .collect();

        let enrollment: u32 = group.iter().map(|c| c.enrollment).sum();
        let sections: BTreeSet<TimetableKey> =
            group.iter().map(|c| c.timetable_key()).collect();

        jobs.extend(jobs_for_group(course, enrollment, sections, registry));
    }
    jobs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        Department, FacultyId, ScheduleConfig, SectionId, SessionKind,
    };

    fn combined_course(section: &str, enrollment: u32) -> Course {
        Course {
            code: CourseCode::from("MA202"),
            name: "Mathematics".to_string(),
            section_id: SectionId::from(section),
            department: Department::from("CSE"),
            semester: 4,
            lecture_hours: 3.0,
            tutorial_hours: 0,
            practical_hours: 0,
            credits: 3.0,
            enrollment,
            faculty: BTreeSet::from([FacultyId::from("F9")]),
            is_combined: true,
            is_elective: false,
            basket_id: None,
            fixed_room: None,
            software_lab: None,
        }
    }

    #[test]
    fn test_group_collapses_to_one_job_set() {
        let input = TimetableInput {
            courses: vec![
                combined_course("A", 50),
                combined_course("B", 50),
                combined_course("C", 50),
            ],
            rooms: vec![],
            sections: vec![],
            faculty: vec![],
            assistants: vec![],
            config: ScheduleConfig::default(),
        };
        let registry = ResourceRegistry::new(&[], &[], &[]);
        let jobs = combined_jobs(&input, &registry);

        // L = 3.0 expands to two lectures, shared by the whole group
        assert_eq!(jobs.len(), 2);
        assert!(jobs.iter().all(|j| j.kind == SessionKind::Lecture));
        assert_eq!(jobs[0].sections.len(), 3);
        assert_eq!(jobs[0].demands.len(), 1);
        assert_eq!(jobs[0].demands[0].enrollment, 150);
    }
}
