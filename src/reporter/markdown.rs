use itertools::Itertools;

use crate::export::{Cell, ExportView, SectionGrid};
use crate::types::{format_hhmm, Timetable, TimetableInput};

/// Markdown report: one grid per section, elective details, TA listing and
/// any unresolved deficits
pub fn generate_markdown_report(
    timetable: &Timetable,
    input: &TimetableInput,
    view: &ExportView,
) -> String {
    let mut lines = vec![
        "# Weekly Timetable".to_string(),
        String::new(),
        format!(
            "Generated {} (seed {}, v{})",
            timetable.metadata.generated_at, timetable.metadata.seed,
            timetable.metadata.algorithm_version
        ),
        String::new(),
    ];

    for grid in &view.grids {
        lines.push(section_heading(grid, input));
        lines.push(String::new());
        lines.extend(grid_table(grid, view));
        lines.push(String::new());
    }

    lines.extend(elective_details(timetable, input));
    lines.extend(assistant_listing(input));

    if !timetable.deficits.is_empty() {
        lines.push("## Unresolved Sessions".to_string());
        lines.push(String::new());
        for deficit in &timetable.deficits {
            lines.push(format!(
                "- **{}**: {} {} session(s) could not be placed",
                deficit.course_code, deficit.missing, deficit.kind
            ));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

fn section_heading(grid: &SectionGrid, input: &TimetableInput) -> String {
    match input.sections.iter().find(|s| s.id == grid.key.section) {
        Some(section) => format!(
            "## Section {} ({} sem {}) – Roll no {}{}001 to {}{}{:03}",
            section.batch_label,
            section.department,
            section.semester,
            section.year,
            section.department.0.to_lowercase(),
            section.year,
            section.department.0.to_lowercase(),
            section.enrollment
        ),
        None => format!("## {}", grid.key),
    }
}

fn grid_table(grid: &SectionGrid, view: &ExportView) -> Vec<String> {
    let header = std::iter::once("Day".to_string())
        .chain(
            view.slots
                .iter()
                .map(|s| format!("{}-{}", format_hhmm(s.start), format_hhmm(s.end))),
        )
        .join(" | ");
    let rule = std::iter::repeat("---")
        .take(view.slots.len() + 1)
        .join(" | ");

    let mut rows = vec![format!("| {header} |"), format!("| {rule} |")];
    for row in &grid.rows {
        let cells = std::iter::once(row.day.to_string())
            .chain(row.cells.iter().map(|cell| match cell {
                Cell::Empty => String::new(),
                Cell::Break { label, .. } => format!("*{label}*"),
                Cell::Session { label, .. } => label.clone(),
            }))
            .join(" | ");
        rows.push(format!("| {cells} |"));
    }
    rows
}

fn elective_details(timetable: &Timetable, input: &TimetableInput) -> Vec<String> {
    let electives: Vec<_> = timetable
        .assignments
        .iter()
        .filter(|a| a.basket_id.is_some())
        .collect();
    if electives.is_empty() {
        return Vec::new();
    }

    let mut lines = vec![
        "## Elective Scheduling Details".to_string(),
        String::new(),
        "| Basket | Course | Faculty | Room(s) | Time Slot |".to_string(),
        "| --- | --- | --- | --- | --- |".to_string(),
    ];
    for a in electives {
        let Some(basket) = &a.basket_id else {
            continue;
        };
        let faculty_names = a
            .faculty
            .iter()
            .map(|f| {
                input
                    .faculty
                    .iter()
                    .find(|rec| &rec.id == f)
                    .map_or(f.0.clone(), |rec| rec.name.clone())
            })
            .join(", ");
        let rooms = a.rooms.iter().map(|r| r.0.as_str()).join(", ");
        lines.push(format!(
            "| {} | {} | {} | {} | {} ({}) |",
            basket,
            a.course_code,
            faculty_names,
            rooms,
            a.interval,
            a.kind.tag()
        ));
    }
    lines.push(String::new());
    lines
}

/// Courses above the TA threshold list their teaching assistants. Rows of a
/// combined course count their summed enrollment.
fn assistant_listing(input: &TimetableInput) -> Vec<String> {
    use std::collections::BTreeMap;

    let mut taught: BTreeMap<&crate::types::CourseCode, u32> = BTreeMap::new();
    for course in &input.courses {
        let entry = taught.entry(&course.code).or_default();
        if course.is_combined {
            *entry += course.enrollment;
        } else {
            *entry = (*entry).max(course.enrollment);
        }
    }
    taught.retain(|_, enrollment| *enrollment > input.config.ta_threshold);
    if taught.is_empty() || input.assistants.is_empty() {
        return Vec::new();
    }

    let mut lines = vec!["## Teaching Assistants".to_string(), String::new()];
    for (code, enrollment) in taught {
        let names: Vec<&str> = input
            .assistants
            .iter()
            .filter(|a| &a.course_code == code)
            .map(|a| a.name.as_str())
            .collect();
        if !names.is_empty() {
            lines.push(format!(
                "- **{code}** ({enrollment} students): {}",
                names.join(", ")
            ));
        }
    }
    lines.push(String::new());
    lines
}
