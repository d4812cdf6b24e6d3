//! Weekly task catalog commands for CLI.

use clap::Subcommand;
use studyday_core::time::monday_of;
use studyday_core::{format_time, parse_time, PlannerDb, ReduceOutcome, WorkItem};

use super::date_or_today;

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task to a week's catalog
    Add {
        /// Course name
        course: String,
        /// Task title
        title: String,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due_date: String,
        /// Due time (e.g. "5pm")
        #[arg(long)]
        due: String,
        /// Total minutes of work needed
        #[arg(long)]
        minutes: u32,
        /// Mark as repeating weekly
        #[arg(long)]
        repeat: bool,
        /// Any day of the target week (default: this week)
        #[arg(long)]
        week: Option<String>,
    },
    /// List a week's catalog
    List {
        /// Any day of the week (default: this week)
        #[arg(long)]
        week: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Lower a task's remaining minutes; removes it at zero
    Reduce {
        /// Task ID
        id: i64,
        /// Minutes to take off
        #[arg(long, default_value = "10")]
        by: u32,
    },
    /// Toggle a task's prepared flag
    Toggle {
        /// Task ID
        id: i64,
    },
    /// Remove a task
    Remove {
        /// Task ID
        id: i64,
    },
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = PlannerDb::open()?;

    match action {
        TaskAction::Add {
            course,
            title,
            due_date,
            due,
            minutes,
            repeat,
            week,
        } => {
            let (course, title) = (course.trim(), title.trim());
            if course.is_empty() || title.is_empty() {
                return Err("Course and title are required".into());
            }
            if minutes == 0 {
                return Err("Minutes must be > 0".into());
            }
            let week_of = date_or_today(week.as_deref())?;
            let mut item = WorkItem::new(
                course,
                title,
                date_or_today(Some(&due_date))?,
                parse_time(&due)?,
                minutes,
            );
            item.repeat_weekly = repeat;
            let id = db.add_task(week_of, &item)?;
            println!("Task added: {id} (week of {})", monday_of(week_of));
        }
        TaskAction::List { week, json } => {
            let week_of = date_or_today(week.as_deref())?;
            let tasks = db.tasks_for_week(week_of)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&tasks)?);
            } else if tasks.is_empty() {
                println!("No tasks for week of {}", monday_of(week_of));
            } else {
                for record in &tasks {
                    let item = &record.item;
                    println!(
                        "{:>4}  {} — {}  due {} {}  {} min{}{}",
                        record.id,
                        item.course,
                        item.title,
                        item.due_date,
                        format_time(item.due_min),
                        item.minutes_needed,
                        if item.prepared { "  [prepared]" } else { "" },
                        if item.repeat_weekly { "  [weekly]" } else { "" },
                    );
                }
            }
        }
        TaskAction::Reduce { id, by } => match db.reduce_task(id, by)? {
            ReduceOutcome::Reduced(left) => println!("Task {id}: {left} min left"),
            ReduceOutcome::Deleted => println!("Task {id} done and removed"),
        },
        TaskAction::Toggle { id } => {
            let prepared = db.toggle_prepared(id)?;
            println!("Task {id} prepared: {}", if prepared { "yes" } else { "no" });
        }
        TaskAction::Remove { id } => {
            db.remove_task(id)?;
            println!("Task removed: {id}");
        }
    }
    Ok(())
}
