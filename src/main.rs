use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use cru_timetable::discovery::{self, Timetable};
use cru_timetable::model::{day_label, weekday_from_code, COURSE_MARKER};
use cru_timetable::parser::ParseOptions;
use cru_timetable::report::{self, availability, calendar, capacity, format_minutes, occupancy};
use cru_timetable::settings::Settings;

#[derive(Parser)]
#[command(name = "cru", version, about = "Check and query CRU timetable files")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the syntax of CRU files and display the parsed data
    Check {
        /// A .cru file or a directory scanned recursively
        path: PathBuf,
        /// Count rejected lines without printing them
        #[arg(short, long)]
        quiet: bool,
        /// Report noise lines instead of skipping them
        #[arg(long)]
        strict: bool,
        /// Print the parsed courses as JSON
        #[arg(long)]
        json: bool,
    },
    /// Session types and rooms of a course
    Classrooms {
        path: PathBuf,
        /// Course name, with or without the leading '+'
        course: String,
    },
    /// Maximum capacity of a room
    Capacity { path: PathBuf, room: String },
    /// Rooms ranked by capacity
    Rank { path: PathBuf },
    /// Free periods of a room over the week
    FreeSlots {
        room: String,
        /// File or directory to load (default: configured data_dir)
        #[arg(short, long)]
        path: Option<PathBuf>,
    },
    /// Rooms free on a given day and time
    FreeRooms {
        /// Day code (L, MA, ME, J, V)
        day: String,
        /// Time of day (e.g. 10:00)
        time: String,
        #[arg(short, long)]
        path: Option<PathBuf>,
    },
    /// Weekly occupancy rate of each room
    Occupancy { path: PathBuf },
    /// Export the sessions of some courses between two dates as an ICS file
    Calendar {
        /// First day, YYYY-MM-DD
        start: String,
        /// Last day, YYYY-MM-DD
        end: String,
        #[arg(required = true)]
        courses: Vec<String>,
        #[arg(short, long)]
        path: Option<PathBuf>,
        /// Output file
        #[arg(short, long, default_value = "timetable.ics")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load()?;
    let options = settings.parse_options();

    let result = match cli.command {
        Commands::Check { path, quiet, strict, json } => {
            let options = ParseOptions {
                show_errors: options.show_errors && !quiet,
                filter_noise: options.filter_noise && !strict,
            };
            check(&path, options, json)
        }
        Commands::Classrooms { path, course } => {
            let tt = load(&path, options)?;
            let name = course_name(&course);
            match capacity::classrooms(&tt.courses, &name) {
                None => bail!("Course \"{}\" not found.", name),
                Some(rooms) if rooms.is_empty() => {
                    println!("No slot found for course \"{}\".", name);
                }
                Some(rooms) => {
                    println!("Slots for course \"{}\":", name);
                    for (i, c) in rooms.iter().enumerate() {
                        println!("Slot {}: Type - {}, Classroom - {}", i + 1, c.session_type, c.room);
                    }
                }
            }
            Ok(())
        }
        Commands::Capacity { path, room } => {
            let tt = load(&path, quiet(options))?;
            match capacity::room_capacity(&tt.courses, &room) {
                Some(cap) => println!("Capacity for classroom {}: {} places.", room, cap),
                None => println!("No data found for room {}.", room),
            }
            Ok(())
        }
        Commands::Rank { path } => {
            let tt = load(&path, options)?;
            let ranked = capacity::rank_rooms(&tt.courses);
            let max = ranked.first().map(|r| r.capacity).unwrap_or(0);
            println!("{:>8} | {:<6} |", "Capacity", "Room");
            println!("{}", "-".repeat(20));
            for r in &ranked {
                println!(
                    "{:>8} | {:<6} | {}",
                    r.capacity,
                    r.room,
                    bar(f64::from(r.capacity), f64::from(max))
                );
            }
            println!("\n{} rooms", ranked.len());
            Ok(())
        }
        Commands::FreeSlots { room, path } => {
            let root = path.unwrap_or_else(|| settings.data_dir.clone());
            let tt = load(&root, options)?;
            if !report::known_rooms(&tt.courses).contains(room.as_str()) {
                bail!("No slot found for room \"{}\". Please verify the room name.", room);
            }
            for day in availability::free_periods(&tt.courses, &room, settings.day_window()) {
                if day.periods.is_empty() {
                    println!("No free period on {}.", day_label(&day.day));
                    continue;
                }
                println!("Free periods on {}:", day_label(&day.day));
                for (start, end) in day.periods {
                    println!("  -> {} to {}", format_minutes(start), format_minutes(end));
                }
            }
            Ok(())
        }
        Commands::FreeRooms { day, time, path } => {
            let day = day.to_uppercase();
            if weekday_from_code(&day).is_none() {
                bail!("Day is invalid \"{}\"", day);
            }
            let at = availability::parse_time_of_day(&time)?;
            let root = path.unwrap_or_else(|| settings.data_dir.clone());
            let tt = load(&root, options)?;
            let rooms = availability::free_rooms(&tt.courses, &day, at);
            if rooms.is_empty() {
                println!("No free classrooms on {} at {}.", day, time);
            } else {
                println!("Free classrooms on {} at {}:", day, time);
                for room in rooms {
                    println!("- {}", room);
                }
            }
            Ok(())
        }
        Commands::Occupancy { path } => {
            let tt = load(&path, options)?;
            println!("Room Occupancy Rates:");
            for row in occupancy::occupancy(&tt.courses, settings.day_window()) {
                println!(
                    "{:<6} {:>6.2}% ({:>4} minutes) {}",
                    row.room,
                    row.rate,
                    row.used_minutes,
                    bar(row.rate, 100.0)
                );
            }
            Ok(())
        }
        Commands::Calendar { start, end, courses, path, output } => {
            let start = calendar::parse_date(&start)?;
            let end = calendar::parse_date(&end)?;
            let root = path.unwrap_or_else(|| settings.data_dir.clone());
            let tt = load(&root, options)?;
            let names: Vec<String> = courses.iter().map(|c| course_name(c)).collect();
            let ics = calendar::render_ics(&tt.courses, &names, start, end, chrono::Utc::now())?;
            std::fs::write(&output, ics)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!("Calendar written to {}", output.display());
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        info!("Done in {:.1}s", elapsed.as_secs_f64());
    }

    result
}

fn check(path: &Path, options: ParseOptions, json: bool) -> Result<()> {
    // rejected lines are printed below with their file name
    let tt = load(path, quiet(options))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&tt.courses)?);
    } else {
        for course in &tt.courses {
            println!("{} ({} slots)", course.name, course.slots.len());
            for s in &course.slots {
                println!(
                    "  {:<4} {:>3} places  {:<2} {:<11} group {:<4} room {}",
                    s.session_type, s.capacity, s.day, s.time_range, s.group, s.room
                );
            }
        }
    }

    if options.show_errors {
        for (path, d) in tt.diagnostics() {
            eprintln!("{}: {}", path.display(), d);
        }
    }

    let errors = tt.error_count();
    println!(
        "Parsing completed with {} error(s). {} courses in {} file(s).",
        errors,
        tt.courses.len(),
        tt.files.len()
    );
    if errors > 0 {
        bail!("{} line(s) rejected", errors);
    }
    Ok(())
}

fn load(path: &Path, options: ParseOptions) -> Result<Timetable> {
    discovery::load_timetable(path, options)
}

fn quiet(options: ParseOptions) -> ParseOptions {
    ParseOptions {
        show_errors: false,
        ..options
    }
}

fn course_name(arg: &str) -> String {
    if arg.starts_with(COURSE_MARKER) {
        arg.to_string()
    } else {
        format!("{}{}", COURSE_MARKER, arg)
    }
}

fn bar(value: f64, max: f64) -> String {
    const WIDTH: f64 = 40.0;
    if max <= 0.0 {
        return String::new();
    }
    let n = (value / max * WIDTH).round().clamp(0.0, WIDTH) as usize;
    "#".repeat(n)
}
