use std::path::PathBuf;

use chrono::Utc;
use clap::Args;
use studyday_core::{render_ics, PlannerDb};

use super::date_or_today;

#[derive(Args)]
pub struct ExportArgs {
    /// Day whose stored plan to export (YYYY-MM-DD, default: today)
    #[arg(long)]
    date: Option<String>,
    /// Output file (default: stdout)
    #[arg(long)]
    out: Option<PathBuf>,
}

pub fn run(args: ExportArgs) -> Result<(), Box<dyn std::error::Error>> {
    let day = date_or_today(args.date.as_deref())?;
    let db = PlannerDb::open()?;
    let blocks = db.plan_on(day)?;
    if blocks.is_empty() {
        return Err(format!("No stored plan for {day}; run `studyday plan` first").into());
    }

    let ics = render_ics(day, &blocks, Utc::now());
    match args.out {
        Some(path) => {
            std::fs::write(&path, ics)?;
            println!("Saved to {}", path.display());
        }
        None => print!("{ics}"),
    }
    Ok(())
}
