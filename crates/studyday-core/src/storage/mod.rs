mod config;
pub mod migrations;
pub mod planner_db;

pub use config::{Config, DayConfig, PlannerSettings};
pub use planner_db::{PlannerDb, ReduceOutcome, StoredLecture, TaskRecord};

use std::path::PathBuf;

/// Returns the data directory, creating it if needed.
///
/// `STUDYDAY_HOME` overrides the location outright. Otherwise this is
/// `~/.config/studyday/`, or `~/.config/studyday-dev/` when
/// `STUDYDAY_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = match std::env::var_os("STUDYDAY_HOME") {
        Some(home) => PathBuf::from(home),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("STUDYDAY_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("studyday-dev")
            } else {
                base_dir.join("studyday")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
