use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeSet;
use thiserror::Error;

use crate::calendar::Calendar;
use crate::ledger::{AssignmentLedger, CommitToken};
use crate::registry::ResourceRegistry;
use crate::types::{
    Assignment, BasketId, CourseCode, Day, Department, FacultyId, Interval, RoomId, RoomKind,
    SessionKind, TimetableKey,
};

/// One assignment to be written when a job's interval is chosen. Jobs carry
/// one demand normally; elective baskets carry one per elective.
#[derive(Debug, Clone)]
pub struct RoomDemand {
    pub course: CourseCode,
    pub enrollment: u32,
    pub fixed_room: Option<RoomId>,
    /// Lab family required when the job is a lab
    pub lab_kind: RoomKind,
    /// Parallel lab batches; 1 for everything else
    pub batches: u32,
    pub faculty: BTreeSet<FacultyId>,
    pub sections: BTreeSet<TimetableKey>,
    pub basket_id: Option<BasketId>,
}

/// One session to place: a (day, start, rooms) decision for every demand
#[derive(Debug, Clone)]
pub struct PlacementJob {
    pub kind: SessionKind,
    /// Departments whose lunch windows apply (one per involved section)
    pub departments: BTreeSet<Department>,
    /// Union of every demand's faculty; blocked for the whole interval
    pub faculty: BTreeSet<FacultyId>,
    /// Union of every demand's section keys
    pub sections: BTreeSet<TimetableKey>,
    pub demands: Vec<RoomDemand>,
}

/// Returned when no candidate (day, start, room) triple works; never fatal
#[derive(Debug, Clone, Error)]
#[error("no feasible placement for {kind} of '{course}'")]
pub struct InfeasibleSession {
    pub course: CourseCode,
    pub kind: SessionKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementOutcome {
    Placed,
    Infeasible,
}

/// Per-session search loop with a bounded, explicit backtracking stack.
/// All randomness flows through the seeded PRNG handle, so a fixed seed
/// reproduces the schedule exactly.
pub struct PlacementEngine<'a> {
    calendar: &'a Calendar,
    registry: &'a ResourceRegistry,
    rng: ChaCha8Rng,
    max_backtracks: u32,
    backtracks: u32,
}

impl<'a> PlacementEngine<'a> {
    pub fn new(
        calendar: &'a Calendar,
        registry: &'a ResourceRegistry,
        seed: u64,
        max_backtracks: u32,
    ) -> Self {
        Self {
            calendar,
            registry,
            rng: ChaCha8Rng::seed_from_u64(seed),
            max_backtracks,
            backtracks: 0,
        }
    }

    pub fn backtracks(&self) -> u32 {
        self.backtracks
    }

    /// Place jobs in order. When a job dead-ends, the most recent commit is
    /// rolled back and re-placed with a fresh random draw before the failed
    /// job is retried; a global attempt cap bounds the rollbacks. Jobs that
    /// stay infeasible are left for the repair pass.
    pub fn place_all(
        &mut self,
        jobs: &[PlacementJob],
        ledger: &mut AssignmentLedger,
    ) -> Vec<PlacementOutcome> {
        let mut outcomes = vec![PlacementOutcome::Infeasible; jobs.len()];
        let mut stack: Vec<(usize, Vec<CommitToken>)> = Vec::new();
        let mut i = 0;
        while i < jobs.len() {
            match self.place_job(&jobs[i], ledger) {
                Ok(tokens) => {
                    outcomes[i] = PlacementOutcome::Placed;
                    stack.push((i, tokens));
                    i += 1;
                }
                Err(_) => {
                    if self.backtracks < self.max_backtracks {
                        if let Some((prev, tokens)) = stack.pop() {
                            self.backtracks += 1;
                            for token in tokens.into_iter().rev() {
                                ledger.rollback(token);
                            }
                            outcomes[prev] = PlacementOutcome::Infeasible;
                            i = prev;
                            continue;
                        }
                    }
                    outcomes[i] = PlacementOutcome::Infeasible;
                    i += 1;
                }
            }
        }
        outcomes
    }

    /// One placement attempt over freshly shuffled candidates
    pub fn place_job(
        &mut self,
        job: &PlacementJob,
        ledger: &mut AssignmentLedger,
    ) -> Result<Vec<CommitToken>, InfeasibleSession> {
        let mut days: Vec<Day> = self.calendar.days().to_vec();
        days.shuffle(&mut self.rng);
        for day in days {
            let mut candidates: Vec<Interval> = self
                .calendar
                .candidate_intervals(day, job.kind)
                .into_iter()
                .filter(|iv| {
                    !job.departments
                        .iter()
                        .any(|dept| self.calendar.in_break(iv, dept))
                })
                .collect();
            candidates.shuffle(&mut self.rng);

            'candidates: for iv in candidates {
                if !ledger.sections_free(job.sections.iter(), &iv, None) {
                    continue;
                }
                match job.kind {
                    SessionKind::Lecture => {
                        if job
                            .demands
                            .iter()
                            .any(|d| ledger.lecture_on_day(&d.course, &d.sections, day))
                        {
                            continue;
                        }
                    }
                    SessionKind::Lab => {
                        if job
                            .demands
                            .iter()
                            .any(|d| ledger.lab_day_conflict(&d.course, &d.sections, day))
                        {
                            continue;
                        }
                    }
                    SessionKind::Tutorial => {}
                }
                if !ledger.is_faculty_free(job.faculty.iter(), &iv) {
                    continue;
                }

                let checkpoint = ledger.checkpoint();
                let mut tokens = Vec::with_capacity(job.demands.len());
                for demand in &job.demands {
                    let Some((rooms, capacity_warning)) =
                        self.pick_rooms(demand, job.kind, &iv, ledger)
                    else {
                        ledger.rollback_to(checkpoint);
                        continue 'candidates;
                    };
                    let assignment = Assignment {
                        course_code: demand.course.clone(),
                        kind: job.kind,
                        interval: iv,
                        rooms,
                        faculty: demand.faculty.clone(),
                        sections: demand.sections.clone(),
                        basket_id: demand.basket_id.clone(),
                        capacity_warning,
                    };
                    match ledger.try_commit(assignment) {
                        Ok(token) => tokens.push(token),
                        Err(_) => {
                            ledger.rollback_to(checkpoint);
                            continue 'candidates;
                        }
                    }
                }
                return Ok(tokens);
            }
        }
        Err(InfeasibleSession {
            course: job
                .demands
                .first()
                .map(|d| d.course.clone())
                .unwrap_or_else(|| CourseCode::from("?")),
            kind: job.kind,
        })
    }

    /// Tightest-fit room selection. Falls back to the largest room of the
    /// required class, with a capacity warning, only when no room of that
    /// class can seat the demand at all; a merely-busy suitable room fails
    /// the candidate instead.
    fn pick_rooms(
        &self,
        demand: &RoomDemand,
        kind: SessionKind,
        iv: &Interval,
        ledger: &AssignmentLedger,
    ) -> Option<(Vec<RoomId>, bool)> {
        if kind != SessionKind::Lab {
            if let Some(fixed) = &demand.fixed_room {
                if !ledger.is_room_free(fixed, iv) {
                    return None;
                }
                let short = self
                    .registry
                    .room(fixed)
                    .is_some_and(|r| r.capacity < demand.enrollment);
                return Some((vec![fixed.clone()], short));
            }
            let mut suitable = self.registry.teaching_rooms(demand.enrollment).peekable();
            if suitable.peek().is_some() {
                let room = suitable.find(|r| ledger.is_room_free(&r.id, iv))?;
                return Some((vec![room.id.clone()], false));
            }
            let fallback = self
                .registry
                .teaching_rooms_desc()
                .find(|r| ledger.is_room_free(&r.id, iv))?;
            return Some((vec![fallback.id.clone()], true));
        }

        let batches = demand.batches.max(1);
        let per_batch = demand.enrollment.div_ceil(batches);
        let mut rooms: Vec<RoomId> = Vec::with_capacity(batches as usize);
        let mut warning = false;
        for _ in 0..batches {
            let mut suitable = self
                .registry
                .lab_rooms(demand.lab_kind, per_batch)
                .filter(|r| !rooms.contains(&r.id))
                .peekable();
            let pick = if suitable.peek().is_some() {
                suitable.find(|r| ledger.is_room_free(&r.id, iv))?
            } else {
                warning = true;
                self.registry
                    .lab_rooms_desc(demand.lab_kind)
                    .filter(|r| !rooms.contains(&r.id))
                    .find(|r| ledger.is_room_free(&r.id, iv))?
            };
            rooms.push(pick.id.clone());
        }
        Some((rooms, warning))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Faculty, Room, ScheduleConfig, Section, SectionId};

    fn registry(rooms: Vec<Room>) -> ResourceRegistry {
        let sections = vec![Section {
            id: SectionId::from("A"),
            department: Department::from("CSE"),
            semester: 4,
            batch_label: "CS-4A".to_string(),
            enrollment: 30,
            year: 23,
        }];
        let faculty = vec![Faculty {
            id: FacultyId::from("F1"),
            name: "Prof. One".to_string(),
        }];
        ResourceRegistry::new(&rooms, &faculty, &sections)
    }

    fn lecture_room(id: &str, capacity: u32) -> Room {
        Room {
            id: RoomId::from(id),
            kind: RoomKind::LectureRoom,
            capacity,
        }
    }

    fn key() -> TimetableKey {
        TimetableKey::new(Department::from("CSE"), 4, SectionId::from("A"))
    }

    fn lecture_job(code: &str, fac: &str, enrollment: u32) -> PlacementJob {
        let faculty = BTreeSet::from([FacultyId::from(fac)]);
        PlacementJob {
            kind: SessionKind::Lecture,
            departments: BTreeSet::from([Department::from("CSE")]),
            faculty: faculty.clone(),
            sections: BTreeSet::from([key()]),
            demands: vec![RoomDemand {
                course: CourseCode::from(code),
                enrollment,
                fixed_room: None,
                lab_kind: RoomKind::ComputerLab,
                batches: 1,
                faculty,
                sections: BTreeSet::from([key()]),
                basket_id: None,
            }],
        }
    }

    #[test]
    fn test_places_single_lecture_outside_breaks() {
        let config = ScheduleConfig::default();
        let calendar = Calendar::new(&config);
        let registry = registry(vec![lecture_room("C101", 60)]);
        let mut ledger = AssignmentLedger::new(config.scheduling_days.clone());
        let mut engine = PlacementEngine::new(&calendar, &registry, 7, 2000);

        let tokens = engine.place_job(&lecture_job("CS301", "F1", 30), &mut ledger).unwrap();
        assert_eq!(tokens.len(), 1);
        let a = &ledger.assignments()[0];
        assert_eq!(a.interval.duration_min(), 90);
        assert!(!calendar.in_break(&a.interval, &Department::from("CSE")));
        assert_eq!(a.rooms, vec![RoomId::from("C101")]);
    }

    #[test]
    fn test_shared_faculty_never_overlaps() {
        let config = ScheduleConfig::default();
        let calendar = Calendar::new(&config);
        let registry = registry(vec![lecture_room("C101", 60), lecture_room("C102", 60)]);
        let mut ledger = AssignmentLedger::new(config.scheduling_days.clone());
        let mut engine = PlacementEngine::new(&calendar, &registry, 11, 2000);

        let jobs = vec![lecture_job("CS301", "F1", 30), lecture_job("CS302", "F1", 30)];
        let outcomes = engine.place_all(&jobs, &mut ledger);
        assert!(outcomes.iter().all(|o| *o == PlacementOutcome::Placed));
        let [a, b] = ledger.assignments() else {
            panic!("expected two assignments")
        };
        assert!(!a.interval.overlaps(&b.interval));
    }

    #[test]
    fn test_tight_fit_prefers_smallest_suitable_room() {
        let config = ScheduleConfig::default();
        let calendar = Calendar::new(&config);
        let registry = registry(vec![
            lecture_room("BIG", 240),
            lecture_room("SMALL", 40),
            lecture_room("MID", 70),
        ]);
        let mut ledger = AssignmentLedger::new(config.scheduling_days.clone());
        let mut engine = PlacementEngine::new(&calendar, &registry, 3, 2000);

        engine
            .place_job(&lecture_job("CS301", "F1", 60), &mut ledger)
            .unwrap();
        assert_eq!(ledger.assignments()[0].rooms, vec![RoomId::from("MID")]);
        assert!(!ledger.assignments()[0].capacity_warning);
    }

    #[test]
    fn test_oversize_enrollment_takes_largest_room_with_warning() {
        let config = ScheduleConfig::default();
        let calendar = Calendar::new(&config);
        let registry = registry(vec![lecture_room("C101", 60), lecture_room("C102", 80)]);
        let mut ledger = AssignmentLedger::new(config.scheduling_days.clone());
        let mut engine = PlacementEngine::new(&calendar, &registry, 5, 2000);

        engine
            .place_job(&lecture_job("CS301", "F1", 150), &mut ledger)
            .unwrap();
        let a = &ledger.assignments()[0];
        assert_eq!(a.rooms, vec![RoomId::from("C102")]);
        assert!(a.capacity_warning);
    }

    #[test]
    fn test_infeasible_when_no_room_class_exists() {
        let config = ScheduleConfig::default();
        let calendar = Calendar::new(&config);
        // only lab rooms exist, so a lecture has nowhere to go
        let registry = registry(vec![Room {
            id: RoomId::from("L106"),
            kind: RoomKind::ComputerLab,
            capacity: 40,
        }]);
        let mut ledger = AssignmentLedger::new(config.scheduling_days.clone());
        let mut engine = PlacementEngine::new(&calendar, &registry, 1, 2000);

        let err = engine
            .place_job(&lecture_job("CS301", "F1", 30), &mut ledger)
            .unwrap_err();
        assert_eq!(err.kind, SessionKind::Lecture);
        assert!(ledger.is_empty());
    }
}
