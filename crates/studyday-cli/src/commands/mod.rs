pub mod config;
pub mod export;
pub mod lecture;
pub mod plan;
pub mod task;

use chrono::{Local, NaiveDate};

/// Parse an ISO `YYYY-MM-DD` date, defaulting to today.
pub fn date_or_today(date: Option<&str>) -> Result<NaiveDate, Box<dyn std::error::Error>> {
    match date {
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map_err(|_| format!("Date must be YYYY-MM-DD, got '{s}'").into()),
        None => Ok(Local::now().date_naive()),
    }
}
