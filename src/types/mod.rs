mod assignment;
mod config;
mod course;
mod room;
mod section;
mod session;
mod time;

pub use assignment::*;
pub use config::*;
pub use course::*;
pub use room::*;
pub use section::*;
pub use session::*;
pub use time::*;

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(pub String);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

string_id!(
    /// Newtype for course codes (e.g. "CS301")
    CourseCode
);
string_id!(
    /// Newtype for faculty identifiers
    FacultyId
);
string_id!(
    /// Newtype for room identifiers
    RoomId
);
string_id!(
    /// Newtype for section identifiers
    SectionId
);
string_id!(
    /// Newtype for elective basket identifiers
    BasketId
);
string_id!(
    /// Newtype for department identifiers (e.g. "CSE")
    Department
);
