//! Day planning command for CLI.

use chrono::{Local, Timelike};
use clap::Args;
use rand::SeedableRng;
use rand_pcg::Pcg64;
use serde::Serialize;
use studyday_core::allocator::shares_for_day;
use studyday_core::inspiration::{self, Inspiration};
use studyday_core::{parse_time, Config, DailyScheduler, DayPlan, Lecture, PlannerDb, WorkItem};
use tracing::debug;

use super::date_or_today;

#[derive(Args)]
pub struct PlanArgs {
    /// Day to plan (YYYY-MM-DD, default: today)
    #[arg(long)]
    date: Option<String>,
    /// Plan only after this time (default: the current time when planning today)
    #[arg(long)]
    now: Option<String>,
    /// Fatigue level 1-10 (default: from config)
    #[arg(long)]
    tired: Option<u8>,
    /// Pack study blocks back to back without breaks
    #[arg(long)]
    no_adaptive: bool,
    /// Do not store the plan
    #[arg(long)]
    dry_run: bool,
    /// Output as JSON
    #[arg(long)]
    json: bool,
    /// Seed for the inspiration line
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Serialize)]
struct PlanOutput<'a> {
    date: String,
    items: &'a [WorkItem],
    #[serde(flatten)]
    plan: &'a DayPlan,
    inspiration: &'a Inspiration,
}

pub fn run(args: PlanArgs) -> Result<(), Box<dyn std::error::Error>> {
    let day = date_or_today(args.date.as_deref())?;

    let mut config = Config::load()?.planner_config()?;
    if let Some(tired) = args.tired {
        config.tired = tired;
    }
    if args.no_adaptive {
        config.adaptive_breaks = false;
    }
    let scheduler = DailyScheduler::new(config)?;

    let horizon = match args.now.as_deref() {
        Some(now) => Some(parse_time(now)?),
        None if day == Local::now().date_naive() => {
            let now = Local::now();
            Some((now.hour() * 60 + now.minute()) as i32)
        }
        None => None,
    };

    let db = PlannerDb::open()?;
    let catalog: Vec<WorkItem> = db
        .tasks_for_week(day)?
        .into_iter()
        .map(|record| record.item)
        .collect();
    let items = shares_for_day(&catalog, day, &db.history_index()?);
    let lectures: Vec<Lecture> = db
        .lectures_on(day)?
        .into_iter()
        .map(|stored| stored.lecture)
        .collect();

    debug!(%day, items = items.len(), lectures = lectures.len(), ?horizon, "planning day");
    let plan = scheduler.plan(&lectures, &items, horizon);
    if !args.dry_run {
        db.save_plan(day, &plan.blocks)?;
    }

    let mut rng = match args.seed {
        Some(seed) => Pcg64::seed_from_u64(seed),
        None => Pcg64::from_entropy(),
    };
    let inspiration = inspiration::pick(&mut rng);

    if args.json {
        let output = PlanOutput {
            date: day.to_string(),
            items: &items,
            plan: &plan,
            inspiration: &inspiration,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", plan.trace_text());
        println!("\n— Inspiration —\n{inspiration}");
    }
    Ok(())
}
