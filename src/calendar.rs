//! Working-day time grid and break-window queries.

use crate::types::{BreakWindow, Day, Department, Interval, ScheduleConfig, SessionKind};

/// Enumerates candidate intervals on the configured grid and answers
/// break-window queries. Built once per run; read-only afterwards.
#[derive(Debug, Clone)]
pub struct Calendar {
    days: Vec<Day>,
    day_start: u16,
    day_end: u16,
    stride: u16,
    breaks: Vec<BreakWindow>,
}

impl Calendar {
    pub fn new(config: &ScheduleConfig) -> Self {
        Self {
            days: config.scheduling_days.clone(),
            day_start: config.day_start,
            day_end: config.day_end,
            stride: config.slot_minutes,
            breaks: config.breaks.clone(),
        }
    }

    pub fn days(&self) -> &[Day] {
        &self.days
    }

    pub fn day_start(&self) -> u16 {
        self.day_start
    }

    pub fn day_end(&self) -> u16 {
        self.day_end
    }

    pub fn breaks(&self) -> &[BreakWindow] {
        &self.breaks
    }

    /// All intervals of the kind's duration starting on the grid stride,
    /// wholly inside working hours and clear of department-independent
    /// blocking breaks. Ordered by ascending start minute.
    ///
    /// Department lunch windows are not filtered here; callers apply
    /// [`Calendar::in_break`] for the section's department.
    pub fn candidate_intervals(&self, day: Day, kind: SessionKind) -> Vec<Interval> {
        let duration = kind.duration_min();
        let mut out = Vec::new();
        let mut start = self.day_start;
        while start + duration <= self.day_end {
            let iv = Interval::new(day, start, start + duration);
            let blocked = self.breaks.iter().any(|b| {
                b.kind.blocks_teaching() && b.department.is_none() && iv.overlaps(&b.interval_on(day))
            });
            if !blocked {
                out.push(iv);
            }
            start += self.stride;
        }
        out
    }

    /// True iff the interval overlaps any blocking break window applicable
    /// to the department
    pub fn in_break(&self, interval: &Interval, dept: &Department) -> bool {
        self.breaks.iter().any(|b| {
            b.kind.blocks_teaching()
                && b.applies_to(dept)
                && interval.overlaps(&b.interval_on(interval.day))
        })
    }

    /// The break window (if any) overlapping an interval for a department;
    /// used by the export view to label break cells. Blocking windows win
    /// over the snack window.
    pub fn break_overlapping(&self, interval: &Interval, dept: &Department) -> Option<&BreakWindow> {
        self.breaks
            .iter()
            .filter(|b| b.applies_to(dept) && interval.overlaps(&b.interval_on(interval.day)))
            .max_by_key(|b| b.kind.blocks_teaching())
    }
}
