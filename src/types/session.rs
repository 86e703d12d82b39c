use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a teaching session; the slot duration is fixed per kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SessionKind {
    Lecture,
    Tutorial,
    Lab,
}

impl SessionKind {
    /// Placement order: labs are the most constrained, tutorials the least
    pub const PLACEMENT_ORDER: [SessionKind; 3] =
        [SessionKind::Lab, SessionKind::Lecture, SessionKind::Tutorial];

    pub fn duration_min(self) -> u16 {
        match self {
            SessionKind::Lecture => 90,
            SessionKind::Tutorial => 60,
            SessionKind::Lab => 120,
        }
    }

    /// Short tag used in grid cells ("L", "T", "LAB")
    pub fn tag(self) -> &'static str {
        match self {
            SessionKind::Lecture => "L",
            SessionKind::Tutorial => "T",
            SessionKind::Lab => "LAB",
        }
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionKind::Lecture => "Lecture",
            SessionKind::Tutorial => "Tutorial",
            SessionKind::Lab => "Lab",
        };
        write!(f, "{name}")
    }
}
