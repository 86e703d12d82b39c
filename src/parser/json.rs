use crate::error::{Result, TimetableError};
use crate::types::{Course, ElectiveEnrollment, ScheduleConfig, TimetableInput};
use std::fs;
use std::path::Path;

/// Load all input data from a directory.
///
/// Expects `courses.json`, `rooms.json`, `sections.json` and `faculty.json`;
/// `assistants.json`, `elective_enrollments.json` and `config.toml` are
/// optional. Elective enrollment overrides are applied to the loaded
/// courses here, so the rest of the crate only ever sees final numbers.
pub fn load_input_from_dir(dir: &Path) -> Result<TimetableInput> {
    let mut courses: Vec<Course> = load_json_file(&dir.join("courses.json"))?;
    let rooms = load_json_file(&dir.join("rooms.json"))?;
    let sections = load_json_file(&dir.join("sections.json"))?;
    let faculty = load_json_file(&dir.join("faculty.json"))?;
    let assistants = load_optional(&dir.join("assistants.json"))?;
    let overrides: Vec<ElectiveEnrollment> = load_optional(&dir.join("elective_enrollments.json"))?;
    let config = load_config_or_default(&dir.join("config.toml"))?;

    apply_elective_overrides(&mut courses, &overrides);

    Ok(TimetableInput {
        courses,
        rooms,
        sections,
        faculty,
        assistants,
        config,
    })
}

/// Load config from TOML, or fall back to the institute defaults
pub fn load_config_or_default(path: &Path) -> Result<ScheduleConfig> {
    if !path.exists() {
        return Ok(ScheduleConfig::default());
    }
    let content = fs::read_to_string(path).map_err(|e| TimetableError::FileRead {
        path: path.display().to_string(),
        source: e,
    })?;
    toml::from_str(&content).map_err(|e| {
        TimetableError::ConfigParse {
            file: path.display().to_string(),
            message: e.to_string(),
        }
        .into()
    })
}

/// Per-(course, section) enrollment overrides for electives
fn apply_elective_overrides(courses: &mut [Course], overrides: &[ElectiveEnrollment]) {
    for entry in overrides {
        for course in courses.iter_mut() {
            if course.is_elective
                && course.code == entry.course_code
                && course.section_id == entry.section_id
            {
                course.enrollment = entry.enrollment;
            }
        }
    }
}

/// Generic JSON file loader
fn load_json_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let path_str = path.display().to_string();
    let content = fs::read_to_string(path).map_err(|e| TimetableError::FileRead {
        path: path_str.clone(),
        source: e,
    })?;

    serde_json::from_str(&content).map_err(|e| {
        TimetableError::JsonParse {
            file: path_str,
            message: e.to_string(),
        }
        .into()
    })
}

/// Like `load_json_file`, but a missing file yields an empty list
fn load_optional<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if path.exists() {
        load_json_file(path)
    } else {
        Ok(Vec::new())
    }
}
