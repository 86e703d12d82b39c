use crate::error::{Result, TimetableError};
use crate::types::{
    format_hhmm, BasketId, Course, CourseCode, Department, FacultyId, RoomId, SectionId,
    TimetableInput,
};
use std::collections::{HashMap, HashSet};

/// Validation result with collected errors and warnings
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    pub fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }
}

/// Validate all input data. Errors here are the only fatal outcome of the
/// whole pipeline; placement never aborts.
pub fn validate_input(input: &TimetableInput) -> Result<ValidationResult> {
    let mut result = ValidationResult::default();

    check_duplicate_room_ids(input, &mut result);
    check_duplicate_section_ids(input, &mut result);
    check_duplicate_faculty_ids(input, &mut result);

    let faculty_ids: HashSet<&FacultyId> = input.faculty.iter().map(|f| &f.id).collect();
    let section_ids: HashSet<&SectionId> = input.sections.iter().map(|s| &s.id).collect();

    for course in &input.courses {
        for fac in &course.faculty {
            if !faculty_ids.contains(fac) {
                result.add_error(
                    TimetableError::UnknownFaculty {
                        course: course.code.0.clone(),
                        faculty: fac.0.clone(),
                    }
                    .to_string(),
                );
            }
        }
        if !section_ids.contains(&course.section_id) {
            result.add_error(
                TimetableError::UnknownSection {
                    course: course.code.0.clone(),
                    section: course.section_id.0.clone(),
                }
                .to_string(),
            );
        }
        if let Some(room) = &course.fixed_room {
            match input.rooms.iter().find(|r| &r.id == room) {
                None => result.add_error(
                    TimetableError::UnknownRoom {
                        course: course.code.0.clone(),
                        room: room.0.clone(),
                    }
                    .to_string(),
                ),
                Some(r) if r.kind.is_lab() => result.add_error(format!(
                    "Course '{}' fixes non-lab sessions to lab room '{}'",
                    course.code, room
                )),
                Some(_) => {}
            }
        }
        check_credits(course, &mut result);
    }

    check_breaks_inside_working_hours(input, &mut result);
    check_combined_groups(input, &mut result);
    check_basket_groups(input, &mut result);
    check_departments(input, &mut result);
    check_room_sizes(input, &mut result);

    if !result.is_valid() {
        return Err(anyhow::anyhow!(
            "Validation failed with {} errors:\n{}",
            result.errors.len(),
            result.errors.join("\n")
        ));
    }

    Ok(result)
}

fn check_credits(course: &Course, result: &mut ValidationResult) {
    let half_hours = course.lecture_hours * 2.0;
    if course.lecture_hours < 0.0 || (half_hours - half_hours.round()).abs() > 1e-6 {
        result.add_error(
            TimetableError::InvalidCredits {
                course: course.code.0.clone(),
                reason: format!(
                    "lecture hours {} are not on the half-hour grid",
                    course.lecture_hours
                ),
            }
            .to_string(),
        );
    }
    if course.credits < 0.0 {
        result.add_error(
            TimetableError::InvalidCredits {
                course: course.code.0.clone(),
                reason: format!("negative credits {}", course.credits),
            }
            .to_string(),
        );
    }
    if course.total_sessions() == 0 && course.credits > 0.0 {
        result.add_error(
            TimetableError::InvalidCredits {
                course: course.code.0.clone(),
                reason: "credits claimed but L, T and P are all zero".to_string(),
            }
            .to_string(),
        );
    }
}

fn check_breaks_inside_working_hours(input: &TimetableInput, result: &mut ValidationResult) {
    for window in &input.config.breaks {
        if window.start >= window.end
            || window.start < input.config.day_start
            || window.end > input.config.day_end
        {
            result.add_error(
                TimetableError::BreakOutsideWorkingHours {
                    start: format_hhmm(window.start),
                    end: format_hhmm(window.end),
                }
                .to_string(),
            );
        }
    }
}

/// Rows of a combined course must agree on faculty and L-T-P so any row can
/// stand in for the group during placement
fn check_combined_groups(input: &TimetableInput, result: &mut ValidationResult) {
    let mut groups: HashMap<&CourseCode, Vec<&Course>> = HashMap::new();
    for course in input.courses.iter().filter(|c| c.is_combined) {
        groups.entry(&course.code).or_default().push(course);
    }
    for (code, group) in groups {
        let first = group[0];
        let consistent = group.iter().all(|c| {
            c.faculty == first.faculty
                && c.lecture_hours == first.lecture_hours
                && c.tutorial_hours == first.tutorial_hours
                && c.practical_hours == first.practical_hours
        });
        if !consistent {
            result.add_error(
                TimetableError::CombinedMismatch {
                    course: code.0.clone(),
                }
                .to_string(),
            );
        }
    }
}

/// Electives in a basket must share a department, semester and L-T-P profile
fn check_basket_groups(input: &TimetableInput, result: &mut ValidationResult) {
    let mut groups: HashMap<&BasketId, Vec<&Course>> = HashMap::new();
    for course in input.courses.iter().filter(|c| c.is_elective) {
        if let Some(basket) = &course.basket_id {
            groups.entry(basket).or_default().push(course);
        }
    }
    for (basket, group) in groups {
        let first = group[0];
        let consistent = group.iter().all(|c| {
            c.department == first.department
                && c.semester == first.semester
                && c.lecture_hours == first.lecture_hours
                && c.tutorial_hours == first.tutorial_hours
                && c.practical_hours == first.practical_hours
        });
        if !consistent {
            result.add_error(
                TimetableError::BasketMismatch {
                    basket: basket.0.clone(),
                }
                .to_string(),
            );
        }
    }
}

fn check_departments(input: &TimetableInput, result: &mut ValidationResult) {
    let departments: HashSet<&Department> = input.config.departments.iter().collect();
    let with_lunch: HashSet<&Department> = input
        .config
        .breaks
        .iter()
        .filter_map(|b| b.department.as_ref())
        .collect();
    for course in &input.courses {
        if !departments.contains(&course.department) {
            result.add_warning(format!(
                "Course '{}' department '{}' is not in the configured department list",
                course.code, course.department
            ));
        }
        if !with_lunch.contains(&course.department) {
            result.add_warning(format!(
                "Department '{}' has no lunch window configured",
                course.department
            ));
        }
    }
}

fn check_room_sizes(input: &TimetableInput, result: &mut ValidationResult) {
    let max_capacity = input
        .rooms
        .iter()
        .filter(|r| !r.kind.is_lab())
        .map(|r| r.capacity)
        .max()
        .unwrap_or(0);
    for course in input.courses.iter().filter(|c| !c.is_combined) {
        if course.lecture_sessions() > 0 && course.enrollment > max_capacity {
            result.add_warning(format!(
                "Course '{}' enrollment ({}) exceeds the largest teaching room ({})",
                course.code, course.enrollment, max_capacity
            ));
        }
    }
}

fn check_duplicate_room_ids(input: &TimetableInput, result: &mut ValidationResult) {
    let mut seen = HashSet::new();
    for room in &input.rooms {
        if !seen.insert(&room.id) {
            result.add_error(
                TimetableError::DuplicateId {
                    id_type: "room".to_string(),
                    id: room.id.0.clone(),
                }
                .to_string(),
            );
        }
    }
}

fn check_duplicate_section_ids(input: &TimetableInput, result: &mut ValidationResult) {
    let mut seen = HashSet::new();
    for section in &input.sections {
        if !seen.insert(&section.id) {
            result.add_error(
                TimetableError::DuplicateId {
                    id_type: "section".to_string(),
                    id: section.id.0.clone(),
                }
                .to_string(),
            );
        }
    }
}

fn check_duplicate_faculty_ids(input: &TimetableInput, result: &mut ValidationResult) {
    let mut seen = HashSet::new();
    for faculty in &input.faculty {
        if !seen.insert(&faculty.id) {
            result.add_error(
                TimetableError::DuplicateId {
                    id_type: "faculty".to_string(),
                    id: faculty.id.0.clone(),
                }
                .to_string(),
            );
        }
    }
}
