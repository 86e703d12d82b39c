//! Read-only projection of a timetable onto per-section display grids.

use serde::Serialize;
use std::collections::BTreeSet;

use crate::calendar::Calendar;
use crate::types::{
    format_hhmm, hhmm, Assignment, BasketId, BreakKind, CourseCode, Day, Interval, RoomId,
    SessionKind, Timetable, TimetableInput, TimetableKey,
};

/// One fixed-width display bucket
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DisplaySlot {
    #[serde(with = "hhmm")]
    pub start: u16,
    #[serde(with = "hhmm")]
    pub end: u16,
}

/// Contents of one grid cell
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Cell {
    Empty,
    Break {
        kind: BreakKind,
        label: String,
    },
    Session {
        course_code: CourseCode,
        kind: SessionKind,
        rooms: Vec<RoomId>,
        basket_id: Option<BasketId>,
        label: String,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct DayRow {
    pub day: Day,
    pub cells: Vec<Cell>,
}

/// The rendered grid for one timetable key
#[derive(Debug, Clone, Serialize)]
pub struct SectionGrid {
    pub key: TimetableKey,
    pub rows: Vec<DayRow>,
}

/// Immutable (key x day x display-slot) view over a generated timetable.
/// Renderers style this; the scheduling core never reads it back.
#[derive(Debug, Clone, Serialize)]
pub struct ExportView {
    pub slots: Vec<DisplaySlot>,
    pub grids: Vec<SectionGrid>,
}

impl ExportView {
    pub fn project(timetable: &Timetable, input: &TimetableInput) -> Self {
        let calendar = Calendar::new(&input.config);
        let slots = display_slots(input.config.slot_minutes.max(1), &calendar);

        let keys: BTreeSet<TimetableKey> = input
            .sections
            .iter()
            .map(|s| TimetableKey::new(s.department.clone(), s.semester, s.id.clone()))
            .collect();

        let grids = keys
            .into_iter()
            .map(|key| {
                let rows = calendar
                    .days()
                    .iter()
                    .map(|&day| DayRow {
                        day,
                        cells: slots
                            .iter()
                            .map(|slot| resolve_cell(timetable, &calendar, &key, day, slot))
                            .collect(),
                    })
                    .collect();
                SectionGrid { key, rows }
            })
            .collect();

        ExportView { slots, grids }
    }
}

fn display_slots(stride: u16, calendar: &Calendar) -> Vec<DisplaySlot> {
    let mut slots = Vec::new();
    let mut start = calendar.day_start();
    while start + stride <= calendar.day_end() {
        slots.push(DisplaySlot {
            start,
            end: start + stride,
        });
        start += stride;
    }
    slots
}

/// Cell precedence: blocking break, then the dominant session, then the
/// snack pseudo-break, then empty
fn resolve_cell(
    timetable: &Timetable,
    calendar: &Calendar,
    key: &TimetableKey,
    day: Day,
    slot: &DisplaySlot,
) -> Cell {
    let bucket = Interval::new(day, slot.start, slot.end);

    let window = calendar.break_overlapping(&bucket, &key.department);
    if let Some(window) = window.filter(|w| w.kind.blocks_teaching()) {
        return break_cell(window.kind, window.start, window.end);
    }

    let dominant = timetable
        .assignments
        .iter()
        .filter(|a| a.covers_section(key) && a.interval.overlaps(&bucket))
        .max_by_key(|a| {
            let overlap =
                a.interval.end.min(bucket.end) - a.interval.start.max(bucket.start);
            (overlap, std::cmp::Reverse(a.interval.start))
        });
    if let Some(a) = dominant {
        return Cell::Session {
            course_code: a.course_code.clone(),
            kind: a.kind,
            rooms: a.rooms.clone(),
            basket_id: a.basket_id.clone(),
            label: session_label(a),
        };
    }

    if let Some(window) = window {
        return break_cell(window.kind, window.start, window.end);
    }
    Cell::Empty
}

fn break_cell(kind: BreakKind, start: u16, end: u16) -> Cell {
    let label = match kind {
        BreakKind::Lunch => format!(
            "{} ({}-{})",
            kind.label(),
            format_hhmm(start),
            format_hhmm(end)
        ),
        _ => kind.label().to_string(),
    };
    Cell::Break { kind, label }
}

/// Cell text, e.g. "CS301 (L) C101" or "CS310 (LAB) A:L106 B:L107"
fn session_label(a: &Assignment) -> String {
    let rooms = if a.is_batched() {
        a.rooms
            .iter()
            .enumerate()
            .map(|(i, r)| format!("{}:{r}", Assignment::batch_label(i)))
            .collect::<Vec<_>>()
            .join(" ")
    } else {
        a.rooms
            .iter()
            .map(|r| r.0.clone())
            .collect::<Vec<_>>()
            .join(" ")
    };
    match &a.basket_id {
        Some(basket) => format!("{basket}: {} ({}) {rooms}", a.course_code, a.kind.tag()),
        None => format!("{} ({}) {rooms}", a.course_code, a.kind.tag()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        Department, FacultyId, ScheduleConfig, Section, SectionId, TimetableMetadata,
    };

    fn sample_input() -> TimetableInput {
        TimetableInput {
            courses: vec![],
            rooms: vec![],
            sections: vec![Section {
                id: SectionId::from("A"),
                department: Department::from("CSE"),
                semester: 4,
                batch_label: "CS-4A".to_string(),
                enrollment: 60,
                year: 23,
            }],
            faculty: vec![],
            assistants: vec![],
            config: ScheduleConfig::default(),
        }
    }

    fn sample_timetable() -> Timetable {
        Timetable {
            assignments: vec![Assignment {
                course_code: CourseCode::from("CS301"),
                kind: SessionKind::Lecture,
                interval: Interval::new(Day::Mon, 540, 630),
                rooms: vec![RoomId::from("C101")],
                faculty: BTreeSet::from([FacultyId::from("F1")]),
                sections: BTreeSet::from([TimetableKey::new(
                    Department::from("CSE"),
                    4,
                    SectionId::from("A"),
                )]),
                basket_id: None,
                capacity_warning: false,
            }],
            deficits: vec![],
            metadata: TimetableMetadata::default(),
        }
    }

    fn cell_at<'a>(view: &'a ExportView, day: Day, start: u16) -> &'a Cell {
        let slot_idx = view.slots.iter().position(|s| s.start == start).unwrap();
        let row = view.grids[0]
            .rows
            .iter()
            .find(|r| r.day == day)
            .unwrap();
        &row.cells[slot_idx]
    }

    #[test]
    fn test_session_fills_its_buckets() {
        let view = ExportView::project(&sample_timetable(), &sample_input());
        for start in [540, 570, 600] {
            match cell_at(&view, Day::Mon, start) {
                Cell::Session { course_code, label, .. } => {
                    assert_eq!(course_code, &CourseCode::from("CS301"));
                    assert_eq!(label, "CS301 (L) C101");
                }
                other => panic!("expected session at {start}, got {other:?}"),
            }
        }
        assert_eq!(cell_at(&view, Day::Tue, 540), &Cell::Empty);
    }

    #[test]
    fn test_break_cells_are_labelled() {
        let view = ExportView::project(&sample_timetable(), &sample_input());
        match cell_at(&view, Day::Mon, 630) {
            Cell::Break { kind, label } => {
                assert_eq!(*kind, BreakKind::Morning);
                assert_eq!(label, "Morning Break");
            }
            other => panic!("expected morning break, got {other:?}"),
        }
        // CSE lunch starts 13:00
        match cell_at(&view, Day::Mon, 780) {
            Cell::Break { kind, label } => {
                assert_eq!(*kind, BreakKind::Lunch);
                assert_eq!(label, "Lunch Break (13:00-14:30)");
            }
            other => panic!("expected lunch break, got {other:?}"),
        }
    }

    #[test]
    fn test_snack_window_is_rendered_when_free() {
        let view = ExportView::project(&sample_timetable(), &sample_input());
        match cell_at(&view, Day::Mon, 990) {
            Cell::Break { kind, .. } => assert_eq!(*kind, BreakKind::Snack),
            other => panic!("expected snacks, got {other:?}"),
        }
    }
}
