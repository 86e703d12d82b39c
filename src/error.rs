use thiserror::Error;

/// Fatal input errors; detected before placement starts.
///
/// Placement itself never aborts: infeasible sessions, capacity shortfalls
/// and unresolved deficits are carried on the output instead.
#[derive(Error, Debug)]
pub enum TimetableError {
    // Input/Parse errors
    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse JSON in '{file}': {message}")]
    JsonParse { file: String, message: String },

    #[error("Failed to parse config in '{file}': {message}")]
    ConfigParse { file: String, message: String },

    // Data validation errors
    #[error("Duplicate ID found: {id_type} '{id}'")]
    DuplicateId { id_type: String, id: String },

    #[error("Course '{course}' references unknown faculty '{faculty}'")]
    UnknownFaculty { course: String, faculty: String },

    #[error("Course '{course}' references unknown section '{section}'")]
    UnknownSection { course: String, section: String },

    #[error("Course '{course}' references unknown fixed room '{room}'")]
    UnknownRoom { course: String, room: String },

    #[error("Break window {start}-{end} lies outside working hours")]
    BreakOutsideWorkingHours { start: String, end: String },

    #[error("Course '{course}' has inconsistent credit data: {reason}")]
    InvalidCredits { course: String, reason: String },

    #[error("Combined course '{course}' mixes faculty sets or L-T-P profiles across sections")]
    CombinedMismatch { course: String },

    #[error("Elective basket '{basket}' mixes L-T-P profiles or spans departments")]
    BasketMismatch { basket: String },
}

/// Use anyhow::Result at application boundaries
pub type Result<T> = anyhow::Result<T>;
