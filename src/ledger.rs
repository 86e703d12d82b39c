//! The assignment ledger: authoritative store of committed placements plus
//! the overlap indices that make availability queries cheap.

use std::collections::{BTreeSet, HashMap};
use thiserror::Error;

use crate::types::{Assignment, CourseCode, Day, FacultyId, Interval, RoomId, SessionKind, TimetableKey};

/// Proof of a successful commit; required to roll the commit back.
/// Commits form a stack, so only the most recent token is redeemable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitToken(usize);

/// Why a commit was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CommitConflict {
    #[error("interval duration does not match the session kind")]
    Duration,
    #[error("a room is already occupied on an overlapping interval")]
    Room,
    #[error("a faculty member is already teaching on an overlapping interval")]
    Faculty,
    #[error("a section already has a session on an overlapping interval")]
    Section,
    #[error("the course already has a lecture that day")]
    LectureSpacing,
    #[error("the course has a lab on an adjacent working day")]
    LabAdjacency,
}

/// Mutable set of assignments with by-room, by-faculty, by-section-day and
/// by-course indices. Exactly one writer exists per generation run.
#[derive(Debug)]
pub struct AssignmentLedger {
    days: Vec<Day>,
    assignments: Vec<Assignment>,
    by_room: HashMap<RoomId, Vec<usize>>,
    by_faculty: HashMap<FacultyId, Vec<usize>>,
    by_section_day: HashMap<(TimetableKey, Day), Vec<usize>>,
    by_course: HashMap<CourseCode, Vec<usize>>,
}

impl AssignmentLedger {
    pub fn new(days: Vec<Day>) -> Self {
        Self {
            days,
            assignments: Vec::new(),
            by_room: HashMap::new(),
            by_faculty: HashMap::new(),
            by_section_day: HashMap::new(),
            by_course: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    pub fn into_assignments(self) -> Vec<Assignment> {
        self.assignments
    }

    /// Marker for [`AssignmentLedger::rollback_to`]
    pub fn checkpoint(&self) -> usize {
        self.assignments.len()
    }

    /// Commit an assignment if no invariant would break
    pub fn try_commit(&mut self, assignment: Assignment) -> Result<CommitToken, CommitConflict> {
        let iv = assignment.interval;
        if iv.duration_min() != assignment.kind.duration_min() {
            return Err(CommitConflict::Duration);
        }
        for (i, room) in assignment.rooms.iter().enumerate() {
            if assignment.rooms[..i].contains(room) || !self.is_room_free(room, &iv) {
                return Err(CommitConflict::Room);
            }
        }
        if !self.is_faculty_free(assignment.faculty.iter(), &iv) {
            return Err(CommitConflict::Faculty);
        }
        if !self.sections_free(
            assignment.sections.iter(),
            &iv,
            assignment.basket_id.as_ref().map(|b| (b, &iv)),
        ) {
            return Err(CommitConflict::Section);
        }
        match assignment.kind {
            SessionKind::Lecture
                if self.lecture_on_day(&assignment.course_code, &assignment.sections, iv.day) =>
            {
                return Err(CommitConflict::LectureSpacing);
            }
            SessionKind::Lab
                if self.lab_day_conflict(&assignment.course_code, &assignment.sections, iv.day) =>
            {
                return Err(CommitConflict::LabAdjacency);
            }
            _ => {}
        }

        let index = self.assignments.len();
        for room in &assignment.rooms {
            self.by_room.entry(room.clone()).or_default().push(index);
        }
        for fac in &assignment.faculty {
            self.by_faculty.entry(fac.clone()).or_default().push(index);
        }
        for key in &assignment.sections {
            self.by_section_day
                .entry((key.clone(), iv.day))
                .or_default()
                .push(index);
        }
        self.by_course
            .entry(assignment.course_code.clone())
            .or_default()
            .push(index);
        self.assignments.push(assignment);
        Ok(CommitToken(index))
    }

    /// Inverse of the most recent commit. Panics if the token is stale.
    pub fn rollback(&mut self, token: CommitToken) {
        assert_eq!(
            token.0 + 1,
            self.assignments.len(),
            "rollback must undo the most recent commit"
        );
        let assignment = self.assignments.pop().expect("ledger is empty");
        let index = token.0;
        for room in &assignment.rooms {
            Self::unindex(&mut self.by_room, room, index);
        }
        for fac in &assignment.faculty {
            Self::unindex(&mut self.by_faculty, fac, index);
        }
        for key in &assignment.sections {
            let k = (key.clone(), assignment.interval.day);
            if let Some(v) = self.by_section_day.get_mut(&k) {
                v.retain(|&i| i != index);
                if v.is_empty() {
                    self.by_section_day.remove(&k);
                }
            }
        }
        Self::unindex(&mut self.by_course, &assignment.course_code, index);
    }

    /// Roll back every commit made after the checkpoint, newest first
    pub fn rollback_to(&mut self, checkpoint: usize) {
        while self.assignments.len() > checkpoint {
            self.rollback(CommitToken(self.assignments.len() - 1));
        }
    }

    fn unindex<K: std::hash::Hash + Eq + Clone>(
        map: &mut HashMap<K, Vec<usize>>,
        key: &K,
        index: usize,
    ) {
        if let Some(v) = map.get_mut(key) {
            v.retain(|&i| i != index);
            if v.is_empty() {
                map.remove(key);
            }
        }
    }

    pub fn is_room_free(&self, room: &RoomId, iv: &Interval) -> bool {
        self.by_room.get(room).map_or(true, |idxs| {
            idxs.iter()
                .all(|&i| !self.assignments[i].interval.overlaps(iv))
        })
    }

    pub fn is_faculty_free<'a>(
        &self,
        faculty: impl Iterator<Item = &'a FacultyId>,
        iv: &Interval,
    ) -> bool {
        for fac in faculty {
            if let Some(idxs) = self.by_faculty.get(fac) {
                if idxs
                    .iter()
                    .any(|&i| self.assignments[i].interval.overlaps(iv))
                {
                    return false;
                }
            }
        }
        true
    }

    /// True iff every key's row is clear on the interval. Assignments of
    /// `same_basket` at the identical interval are the parallel legs of one
    /// elective slot and do not count as conflicts.
    pub fn sections_free<'a>(
        &self,
        keys: impl Iterator<Item = &'a TimetableKey>,
        iv: &Interval,
        same_basket: Option<(&crate::types::BasketId, &Interval)>,
    ) -> bool {
        for key in keys {
            if let Some(idxs) = self.by_section_day.get(&(key.clone(), iv.day)) {
                for &i in idxs {
                    let other = &self.assignments[i];
                    if !other.interval.overlaps(iv) {
                        continue;
                    }
                    let exempt = matches!(
                        (same_basket, &other.basket_id),
                        (Some((basket, at)), Some(other_basket))
                            if basket == other_basket && other.interval == *at
                    );
                    if !exempt {
                        return false;
                    }
                }
            }
        }
        true
    }

    /// True iff the course already has a lab on `day - 1` or `day + 1` in
    /// the configured working-day order; the day itself does not count. A
    /// course is identified by its code plus the section rows it teaches,
    /// so two sections' offerings of one code never block each other.
    pub fn lab_day_conflict(
        &self,
        course: &CourseCode,
        sections: &BTreeSet<TimetableKey>,
        day: Day,
    ) -> bool {
        let Some(pos) = self.days.iter().position(|&d| d == day) else {
            return false;
        };
        self.by_course.get(course).map_or(false, |idxs| {
            idxs.iter().any(|&i| {
                let a = &self.assignments[i];
                a.kind == SessionKind::Lab
                    && !a.sections.is_disjoint(sections)
                    && self
                        .days
                        .iter()
                        .position(|&d| d == a.interval.day)
                        .is_some_and(|p| p.abs_diff(pos) == 1)
            })
        })
    }

    /// True iff the course offering already has a lecture on the day
    pub fn lecture_on_day(
        &self,
        course: &CourseCode,
        sections: &BTreeSet<TimetableKey>,
        day: Day,
    ) -> bool {
        self.by_course.get(course).map_or(false, |idxs| {
            idxs.iter().any(|&i| {
                let a = &self.assignments[i];
                a.kind == SessionKind::Lecture
                    && !a.sections.is_disjoint(sections)
                    && a.interval.day == day
            })
        })
    }

    /// Placed sessions of a kind for a course within one section row
    pub fn count_sessions(&self, course: &CourseCode, key: &TimetableKey, kind: SessionKind) -> u32 {
        self.by_course.get(course).map_or(0, |idxs| {
            idxs.iter()
                .filter(|&&i| {
                    let a = &self.assignments[i];
                    a.kind == kind && a.covers_section(key)
                })
                .count() as u32
        })
    }
}
