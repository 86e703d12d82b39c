use serde::{Deserialize, Serialize};
use super::{RoomId, SessionKind};

/// Physical room category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomKind {
    LectureRoom,
    Seater120,
    Seater240,
    ComputerLab,
    HardwareLab,
}

impl RoomKind {
    pub fn is_lab(self) -> bool {
        matches!(self, RoomKind::ComputerLab | RoomKind::HardwareLab)
    }
}

/// A physical room with a fixed seating capacity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub kind: RoomKind,
    pub capacity: u32,
}

impl Room {
    /// Lab sessions use only lab rooms; everything else uses teaching rooms
    pub fn suits(&self, kind: SessionKind) -> bool {
        self.kind.is_lab() == (kind == SessionKind::Lab)
    }
}
