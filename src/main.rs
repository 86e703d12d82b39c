use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use institute_timetabler::parser::{load_input_from_dir, validate_input};
use institute_timetabler::reporter::{
    generate_json_summary, generate_reports, generate_text_report, print_summary, OutputFormat,
};
use institute_timetabler::scheduler::generate_timetable;
use institute_timetabler::types::{SectionId, Timetable, TimetableKey};
use institute_timetabler::validator::audit_timetable;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "institute-timetabler")]
#[command(about = "Constraint-aware institute timetable generator")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run demo with sample data
    Demo {
        /// PRNG seed; identical input and seed reproduce the timetable
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },

    /// Generate a timetable from input data
    Generate {
        /// Directory containing input JSON files and config.toml
        #[arg(short, long)]
        data: PathBuf,

        /// Output directory for timetable files
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,

        /// Output format(s): json, markdown, text, or all
        #[arg(short, long, default_value = "all")]
        format: String,

        /// PRNG seed
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Suppress progress output, print JSON summary only
        #[arg(short, long)]
        quiet: bool,
    },

    /// Audit an existing timetable against the hard constraints
    Validate {
        /// Path to timetable.json file
        #[arg(short, long)]
        timetable: PathBuf,

        /// Directory containing input data for validation
        #[arg(short, long)]
        data: PathBuf,

        /// Show every violation and warning
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print a report from a saved timetable
    Report {
        /// Path to timetable.json file
        #[arg(short, long)]
        timetable: PathBuf,

        /// Directory containing input data
        #[arg(short, long)]
        data: PathBuf,

        /// Limit to one section id
        #[arg(long)]
        section: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Demo { seed } => run_demo(seed),
        Commands::Generate {
            data,
            output,
            format,
            seed,
            quiet,
        } => run_generate(&data, &output, &format, seed, quiet),
        Commands::Validate {
            timetable,
            data,
            verbose,
        } => run_validate(&timetable, &data, verbose),
        Commands::Report {
            timetable,
            data,
            section,
        } => run_report(&timetable, &data, section),
    }
}

fn run_demo(seed: u64) -> Result<()> {
    println!("{}", "Institute Timetabler Demo".bold().cyan());
    println!("{}", "─".repeat(40));

    let demo_path = PathBuf::from("data/demo");
    let output_path = PathBuf::from("output");

    if !demo_path.join("courses.json").exists() {
        println!("{}", "Demo data not found. Creating sample data...".yellow());
        create_demo_data(&demo_path)?;
    }

    println!("Loading demo data from: {}", demo_path.display());
    let input = load_input_from_dir(&demo_path).context("Failed to load demo data")?;

    let validation_result = validate_input(&input)?;
    for warning in &validation_result.warnings {
        println!("{} {}", "Warning:".yellow(), warning);
    }

    println!(
        "Loaded {} courses, {} rooms, {} sections, {} faculty",
        input.courses.len(),
        input.rooms.len(),
        input.sections.len(),
        input.faculty.len()
    );

    println!("\nGenerating timetable (seed {seed})...\n");
    let timetable = generate_timetable(&input, seed, false)?;
    let audit = audit_timetable(&timetable, &input);

    print_summary(&timetable, &audit);

    generate_reports(
        &timetable,
        &input,
        &output_path,
        &[OutputFormat::Json, OutputFormat::Markdown, OutputFormat::Text],
    )?;
    println!(
        "Reports written to: {}",
        output_path.display().to_string().green()
    );

    Ok(())
}

fn run_generate(
    data: &PathBuf,
    output: &PathBuf,
    format: &str,
    seed: u64,
    quiet: bool,
) -> Result<()> {
    let input = load_input_from_dir(data).context("Failed to load input data")?;
    let validation_result = validate_input(&input)?;

    if !quiet {
        for warning in &validation_result.warnings {
            println!("{} {}", "Warning:".yellow(), warning);
        }
        println!(
            "Loaded {} courses, {} rooms, {} sections, {} faculty",
            input.courses.len(),
            input.rooms.len(),
            input.sections.len(),
            input.faculty.len()
        );
    }

    let timetable = generate_timetable(&input, seed, quiet)?;
    let audit = audit_timetable(&timetable, &input);

    generate_reports(&timetable, &input, output, &parse_formats(format))?;

    if quiet {
        println!("{}", generate_json_summary(&timetable)?);
    } else {
        print_summary(&timetable, &audit);
        println!("Reports written to: {}", output.display().to_string().green());
    }

    Ok(())
}

fn run_validate(timetable_path: &PathBuf, data: &PathBuf, verbose: bool) -> Result<()> {
    let input = load_input_from_dir(data)?;
    let timetable = load_timetable(timetable_path)?;

    let audit = audit_timetable(&timetable, &input);

    if audit.is_valid {
        println!("{}", "✓ Timetable satisfies all hard constraints".green().bold());
    } else {
        println!("{}", "✗ Timetable has violations".red().bold());
    }
    if verbose || !audit.is_valid {
        for v in &audit.violations {
            println!("  - {}: {}", v.constraint.red(), v.message);
        }
    }

    if verbose {
        println!("\n{}", "Statistics:".bold());
        println!("  Assignments: {}", audit.statistics.total_assignments);
        println!(
            "  Lectures/Tutorials/Labs: {}/{}/{}",
            audit.statistics.lectures, audit.statistics.tutorials, audit.statistics.labs
        );
        println!(
            "  Capacity warnings: {}  Unresolved deficits: {}",
            audit.statistics.capacity_warnings, audit.statistics.unresolved_deficits
        );
    }

    Ok(())
}

fn run_report(timetable_path: &PathBuf, data: &PathBuf, section: Option<String>) -> Result<()> {
    let input = load_input_from_dir(data)?;
    let timetable = load_timetable(timetable_path)?;

    match section {
        Some(section_id) => {
            let id = SectionId(section_id);
            match input.sections.iter().find(|s| s.id == id) {
                Some(section) => {
                    let key =
                        TimetableKey::new(section.department.clone(), section.semester, id);
                    println!("Schedule for {key}");
                    for a in timetable.assignments_for(&key) {
                        println!("  {}  {} ({})", a.interval, a.course_code, a.kind.tag());
                    }
                }
                None => println!("Section not found"),
            }
        }
        None => println!("{}", generate_text_report(&timetable, &input)),
    }

    Ok(())
}

fn load_timetable(path: &PathBuf) -> Result<Timetable> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(serde_json::from_str(&json)?)
}

fn parse_formats(format: &str) -> Vec<OutputFormat> {
    if format == "all" {
        return vec![OutputFormat::Json, OutputFormat::Markdown, OutputFormat::Text];
    }

    format
        .split(',')
        .filter_map(|f| match f.trim().to_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "markdown" | "md" => Some(OutputFormat::Markdown),
            "text" | "txt" => Some(OutputFormat::Text),
            _ => None,
        })
        .collect()
}

fn create_demo_data(path: &PathBuf) -> Result<()> {
    std::fs::create_dir_all(path)?;

    let courses = serde_json::json!([
        {"code": "CS301", "name": "Operating Systems", "section_id": "CSE4A", "department": "CSE", "semester": 4,
         "lecture_hours": 3.0, "tutorial_hours": 0, "practical_hours": 2, "credits": 4.0, "enrollment": 62,
         "faculty": ["F01"]},
        {"code": "CS302", "name": "Design of Algorithms", "section_id": "CSE4A", "department": "CSE", "semester": 4,
         "lecture_hours": 3.0, "tutorial_hours": 1, "practical_hours": 0, "credits": 4.0, "enrollment": 62,
         "faculty": ["F02"]},
        {"code": "CS301", "name": "Operating Systems", "section_id": "CSE4B", "department": "CSE", "semester": 4,
         "lecture_hours": 3.0, "tutorial_hours": 0, "practical_hours": 2, "credits": 4.0, "enrollment": 58,
         "faculty": ["F03"]},
        {"code": "CS302", "name": "Design of Algorithms", "section_id": "CSE4B", "department": "CSE", "semester": 4,
         "lecture_hours": 3.0, "tutorial_hours": 1, "practical_hours": 0, "credits": 4.0, "enrollment": 58,
         "faculty": ["F02"]},
        {"code": "MA202", "name": "Probability and Statistics", "section_id": "CSE4A", "department": "CSE", "semester": 4,
         "lecture_hours": 3.0, "tutorial_hours": 1, "practical_hours": 0, "credits": 4.0, "enrollment": 62,
         "faculty": ["F04"], "is_combined": true},
        {"code": "MA202", "name": "Probability and Statistics", "section_id": "CSE4B", "department": "CSE", "semester": 4,
         "lecture_hours": 3.0, "tutorial_hours": 1, "practical_hours": 0, "credits": 4.0, "enrollment": 58,
         "faculty": ["F04"], "is_combined": true},
        {"code": "DS405", "name": "Machine Learning", "section_id": "DSAI4A", "department": "DSAI", "semester": 4,
         "lecture_hours": 3.0, "tutorial_hours": 0, "practical_hours": 2, "credits": 4.0, "enrollment": 45,
         "faculty": ["F05"]},
        {"code": "EC204", "name": "Digital Circuits", "section_id": "ECE4A", "department": "ECE", "semester": 4,
         "lecture_hours": 3.0, "tutorial_hours": 1, "practical_hours": 2, "credits": 5.0, "enrollment": 50,
         "faculty": ["F06"], "software_lab": false},
        {"code": "EL501", "name": "Compilers", "section_id": "CSE6A", "department": "CSE", "semester": 6,
         "lecture_hours": 3.0, "tutorial_hours": 0, "practical_hours": 0, "credits": 3.0, "enrollment": 70,
         "faculty": ["F07"], "is_elective": true, "basket_id": "B1"},
        {"code": "EL502", "name": "Information Retrieval", "section_id": "CSE6A", "department": "CSE", "semester": 6,
         "lecture_hours": 3.0, "tutorial_hours": 0, "practical_hours": 0, "credits": 3.0, "enrollment": 70,
         "faculty": ["F08"], "is_elective": true, "basket_id": "B1"}
    ]);
    std::fs::write(
        path.join("courses.json"),
        serde_json::to_string_pretty(&courses)?,
    )?;

    let rooms = serde_json::json!([
        {"id": "C101", "kind": "LECTURE_ROOM", "capacity": 60},
        {"id": "C102", "kind": "LECTURE_ROOM", "capacity": 60},
        {"id": "C103", "kind": "LECTURE_ROOM", "capacity": 72},
        {"id": "S120", "kind": "SEATER_120", "capacity": 120},
        {"id": "S240", "kind": "SEATER_240", "capacity": 240},
        {"id": "L106", "kind": "COMPUTER_LAB", "capacity": 40},
        {"id": "L107", "kind": "COMPUTER_LAB", "capacity": 40},
        {"id": "L201", "kind": "HARDWARE_LAB", "capacity": 40},
        {"id": "L202", "kind": "HARDWARE_LAB", "capacity": 40}
    ]);
    std::fs::write(path.join("rooms.json"), serde_json::to_string_pretty(&rooms)?)?;

    let sections = serde_json::json!([
        {"id": "CSE4A", "department": "CSE", "semester": 4, "batch_label": "CS-4A", "enrollment": 62, "year": 23},
        {"id": "CSE4B", "department": "CSE", "semester": 4, "batch_label": "CS-4B", "enrollment": 58, "year": 23},
        {"id": "CSE6A", "department": "CSE", "semester": 6, "batch_label": "CS-6A", "enrollment": 70, "year": 22},
        {"id": "DSAI4A", "department": "DSAI", "semester": 4, "batch_label": "DS-4A", "enrollment": 45, "year": 23},
        {"id": "ECE4A", "department": "ECE", "semester": 4, "batch_label": "EC-4A", "enrollment": 50, "year": 23}
    ]);
    std::fs::write(
        path.join("sections.json"),
        serde_json::to_string_pretty(&sections)?,
    )?;

    let faculty = serde_json::json!([
        {"id": "F01", "name": "Dr. Iyer"},
        {"id": "F02", "name": "Prof. Rao"},
        {"id": "F03", "name": "Dr. Kulkarni"},
        {"id": "F04", "name": "Prof. Deshpande"},
        {"id": "F05", "name": "Dr. Menon"},
        {"id": "F06", "name": "Prof. Hegde"},
        {"id": "F07", "name": "Dr. Shetty"},
        {"id": "F08", "name": "Prof. Nair"}
    ]);
    std::fs::write(
        path.join("faculty.json"),
        serde_json::to_string_pretty(&faculty)?,
    )?;

    let assistants = serde_json::json!([
        {"id": "TA1", "name": "A. Verma", "course_code": "MA202"},
        {"id": "TA2", "name": "S. Joshi", "course_code": "MA202"}
    ]);
    std::fs::write(
        path.join("assistants.json"),
        serde_json::to_string_pretty(&assistants)?,
    )?;

    let elective_enrollments = serde_json::json!([
        {"course_code": "EL501", "section_id": "CSE6A", "enrollment": 38},
        {"course_code": "EL502", "section_id": "CSE6A", "enrollment": 32}
    ]);
    std::fs::write(
        path.join("elective_enrollments.json"),
        serde_json::to_string_pretty(&elective_enrollments)?,
    )?;

    println!("{}", "Demo data created successfully!".green());
    Ok(())
}
