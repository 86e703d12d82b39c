mod json;
mod markdown;
mod text;

pub use json::*;
pub use markdown::*;
pub use text::*;

use crate::error::Result;
use crate::export::ExportView;
use crate::types::{Timetable, TimetableInput};
use crate::validator::{Severity, ValidationReport};
use colored::Colorize;
use std::fs;
use std::path::Path;

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Json,
    Markdown,
    Text,
}

/// Generate all reports and write to the output directory
pub fn generate_reports(
    timetable: &Timetable,
    input: &TimetableInput,
    output_dir: &Path,
    formats: &[OutputFormat],
) -> Result<()> {
    fs::create_dir_all(output_dir)?;
    let view = ExportView::project(timetable, input);

    for format in formats {
        match format {
            OutputFormat::Json => {
                fs::write(
                    output_dir.join("timetable.json"),
                    generate_json_report(timetable)?,
                )?;
                fs::write(output_dir.join("grid.json"), generate_grid_json(&view)?)?;
            }
            OutputFormat::Markdown => {
                fs::write(
                    output_dir.join("timetable.md"),
                    generate_markdown_report(timetable, input, &view),
                )?;
            }
            OutputFormat::Text => {
                fs::write(
                    output_dir.join("timetable.txt"),
                    generate_text_report(timetable, input),
                )?;
            }
        }
    }

    Ok(())
}

/// Print a colored terminal summary of the run
pub fn print_summary(timetable: &Timetable, validation: &ValidationReport) {
    println!("\n{}", "Timetable Summary".bold().cyan());
    println!("{}", "─".repeat(40));
    println!(
        "  Assignments: {} ({} lectures, {} tutorials, {} labs)",
        validation.statistics.total_assignments,
        validation.statistics.lectures,
        validation.statistics.tutorials,
        validation.statistics.labs
    );
    println!(
        "  Backtracks: {}  Solve time: {} ms",
        timetable.metadata.backtracks, timetable.metadata.solve_time_ms
    );

    if validation.is_valid {
        println!("  {}", "All hard constraints satisfied".green());
    } else {
        println!("  {}", "Hard constraint violations found".red().bold());
    }
    for violation in &validation.violations {
        match violation.severity {
            Severity::Error => {
                println!("  {} {}: {}", "✗".red(), violation.constraint.red(), violation.message)
            }
            Severity::Warning => println!(
                "  {} {}: {}",
                "!".yellow(),
                violation.constraint.yellow(),
                violation.message
            ),
        }
    }

    for assignment in timetable.capacity_warnings() {
        println!(
            "  {} '{}' at {} is over room capacity",
            "!".yellow(),
            assignment.course_code,
            assignment.interval
        );
    }
    for deficit in &timetable.deficits {
        println!(
            "  {} '{}' short {} {} session(s)",
            "!".yellow(),
            deficit.course_code,
            deficit.missing,
            deficit.kind
        );
    }
}
