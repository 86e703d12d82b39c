//! Read-only registry of rooms, faculty and sections.

use std::collections::BTreeMap;

use crate::types::{Faculty, FacultyId, Room, RoomId, RoomKind, Section, SectionId};

/// Resource lookups for placement. Rooms are held sorted by ascending
/// capacity so "smallest suitable first" queries are a single scan.
#[derive(Debug, Clone)]
pub struct ResourceRegistry {
    rooms: Vec<Room>,
    faculty: BTreeMap<FacultyId, String>,
    sections: BTreeMap<SectionId, Section>,
}

impl ResourceRegistry {
    pub fn new(rooms: &[Room], faculty: &[Faculty], sections: &[Section]) -> Self {
        let mut rooms = rooms.to_vec();
        rooms.sort_by(|a, b| (a.capacity, &a.id).cmp(&(b.capacity, &b.id)));
        Self {
            rooms,
            faculty: faculty
                .iter()
                .map(|f| (f.id.clone(), f.name.clone()))
                .collect(),
            sections: sections.iter().map(|s| (s.id.clone(), s.clone())).collect(),
        }
    }

    pub fn room(&self, id: &RoomId) -> Option<&Room> {
        self.rooms.iter().find(|r| &r.id == id)
    }

    pub fn section(&self, id: &SectionId) -> Option<&Section> {
        self.sections.get(id)
    }

    pub fn faculty_name(&self, id: &FacultyId) -> Option<&str> {
        self.faculty.get(id).map(String::as_str)
    }

    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.values()
    }

    /// Teaching rooms (lecture room or tiered seater) that seat at least
    /// `min_capacity`, smallest first
    pub fn teaching_rooms(&self, min_capacity: u32) -> impl Iterator<Item = &Room> {
        self.rooms
            .iter()
            .filter(move |r| !r.kind.is_lab() && r.capacity >= min_capacity)
    }

    /// Lab rooms of one family that seat at least `min_capacity`, smallest
    /// first
    pub fn lab_rooms(&self, kind: RoomKind, min_capacity: u32) -> impl Iterator<Item = &Room> {
        debug_assert!(kind.is_lab());
        self.rooms
            .iter()
            .filter(move |r| r.kind == kind && r.capacity >= min_capacity)
    }

    /// Fallback candidates when nothing seats the enrollment: same class of
    /// room, largest first, paired with a capacity warning by the caller
    pub fn teaching_rooms_desc(&self) -> impl Iterator<Item = &Room> {
        self.rooms.iter().rev().filter(|r| !r.kind.is_lab())
    }

    pub fn lab_rooms_desc(&self, kind: RoomKind) -> impl Iterator<Item = &Room> {
        self.rooms.iter().rev().filter(move |r| r.kind == kind)
    }

    /// Smallest capacity among lab rooms of a family; drives batch counts
    pub fn min_lab_capacity(&self, kind: RoomKind) -> Option<u32> {
        self.rooms
            .iter()
            .filter(|r| r.kind == kind)
            .map(|r| r.capacity)
            .min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ResourceRegistry {
        let rooms = vec![
            Room {
                id: RoomId::from("S240"),
                kind: RoomKind::Seater240,
                capacity: 240,
            },
            Room {
                id: RoomId::from("C101"),
                kind: RoomKind::LectureRoom,
                capacity: 60,
            },
            Room {
                id: RoomId::from("S120"),
                kind: RoomKind::Seater120,
                capacity: 120,
            },
            Room {
                id: RoomId::from("L106"),
                kind: RoomKind::ComputerLab,
                capacity: 40,
            },
            Room {
                id: RoomId::from("L201"),
                kind: RoomKind::HardwareLab,
                capacity: 30,
            },
        ];
        ResourceRegistry::new(&rooms, &[], &[])
    }

    #[test]
    fn test_tightest_fit_order() {
        let reg = registry();
        let picks: Vec<_> = reg.teaching_rooms(50).map(|r| r.id.0.as_str()).collect();
        assert_eq!(picks, vec!["C101", "S120", "S240"]);
    }

    #[test]
    fn test_no_suitable_room_falls_back_to_largest() {
        let reg = registry();
        assert_eq!(reg.teaching_rooms(500).count(), 0);
        let largest = reg.teaching_rooms_desc().next().unwrap();
        assert_eq!(largest.id.0, "S240");
    }

    #[test]
    fn test_lab_family_is_respected() {
        let reg = registry();
        let labs: Vec<_> = reg
            .lab_rooms(RoomKind::ComputerLab, 0)
            .map(|r| r.id.0.as_str())
            .collect();
        assert_eq!(labs, vec!["L106"]);
        assert_eq!(reg.min_lab_capacity(RoomKind::HardwareLab), Some(30));
    }
}
