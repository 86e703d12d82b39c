//! Institute Timetabler - Constraint-aware weekly timetable generator
//!
//! This library assigns every course session (lecture, tutorial, lab) of a
//! multi-department institute to a (day, time-range, room) triple while
//! respecting faculty, room, section and break-window constraints.
//!
//! # Algorithm Overview
//!
//! Generation works in 5 phases:
//! 1. **Expansion**: expand each course's L-T-P tuple into concrete sessions
//!    (labs first, then lectures, then tutorials)
//! 2. **Placement**: randomized candidate search per session with a bounded
//!    backtracking stack over the assignment ledger
//! 3. **Group coordination**: combined courses span several sections in one
//!    room; elective baskets share an interval across distinct rooms
//! 4. **Repair**: a strictly additive pass re-attempts any missing sessions
//! 5. **Export**: project the ledger onto per-section display grids
//!
//! # Example
//!
//! ```no_run
//! use institute_timetabler::parser::{load_input_from_dir, validate_input};
//! use institute_timetabler::scheduler::generate_timetable;
//! use institute_timetabler::validator::audit_timetable;
//! use std::path::Path;
//!
//! let input = load_input_from_dir(Path::new("./data/demo")).unwrap();
//! validate_input(&input).unwrap();
//! let timetable = generate_timetable(&input, 42, false).unwrap();
//! let audit = audit_timetable(&timetable, &input);
//! println!("{} assignments, valid: {}", timetable.assignments.len(), audit.is_valid);
//! ```

pub mod calendar;
pub mod error;
pub mod export;
pub mod ledger;
pub mod parser;
pub mod registry;
pub mod reporter;
pub mod scheduler;
pub mod types;
pub mod validator;

pub use error::{Result, TimetableError};
