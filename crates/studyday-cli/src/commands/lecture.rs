//! Lecture commands for CLI.

use clap::Subcommand;
use studyday_core::{format_time, parse_time, Lecture, PlannerDb};

use super::date_or_today;

#[derive(Subcommand)]
pub enum LectureAction {
    /// Add a lecture
    Add {
        /// Course name
        course: String,
        /// Start time (e.g. "10:00 am")
        start: String,
        /// End time (e.g. "11am")
        end: String,
        /// Day of the lecture (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<String>,
    },
    /// List lectures of a day
    List {
        /// Day (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove a lecture
    Remove {
        /// Lecture ID
        id: i64,
    },
}

pub fn run(action: LectureAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = PlannerDb::open()?;

    match action {
        LectureAction::Add {
            course,
            start,
            end,
            date,
        } => {
            let day = date_or_today(date.as_deref())?;
            let lecture = Lecture::new(course.trim(), parse_time(&start)?, parse_time(&end)?);
            if lecture.course.is_empty() {
                return Err("Course is required".into());
            }
            let id = db.add_lecture(day, &lecture)?;
            println!("Lecture added: {id}");
        }
        LectureAction::List { date, json } => {
            let day = date_or_today(date.as_deref())?;
            let lectures = db.lectures_on(day)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&lectures)?);
            } else if lectures.is_empty() {
                println!("No lectures on {day}");
            } else {
                for stored in &lectures {
                    println!(
                        "{:>4}  {} - {}  {}",
                        stored.id,
                        format_time(stored.lecture.start_min),
                        format_time(stored.lecture.end_min),
                        stored.lecture.course
                    );
                }
            }
        }
        LectureAction::Remove { id } => {
            db.remove_lecture(id)?;
            println!("Lecture removed: {id}");
        }
    }
    Ok(())
}
