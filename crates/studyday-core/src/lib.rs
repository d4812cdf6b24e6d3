//! # Studyday Core Library
//!
//! This library provides the business logic for the studyday planner: given
//! the fixed lectures of a day and a catalog of weekly work items, it lays
//! out study blocks and breaks in the free time of a single day.
//! All operations are exposed through the standalone `studyday` CLI binary.
//!
//! ## Architecture
//!
//! - **Planner**: deterministic single-day placement engine with a human-readable trace
//! - **Allocator**: splits a multi-day work item into today's share using study history
//! - **Storage**: SQLite day store / week store and TOML configuration
//! - **Export**: iCalendar rendering of study blocks
//!
//! ## Key Components
//!
//! - [`DailyScheduler`]: Places study blocks and breaks for one day
//! - [`PlannerDb`]: Lecture, plan and task persistence
//! - [`Config`]: Application configuration management
//! - [`HistoryIndex`]: In-memory index of committed study minutes

pub mod allocator;
pub mod breaks;
pub mod error;
pub mod export;
pub mod history;
pub mod inspiration;
pub mod interval;
pub mod model;
pub mod planner;
pub mod storage;
pub mod time;

pub use allocator::{share_for_day, shares_for_day};
pub use breaks::{size_break, BreakRequest};
pub use error::{ConfigError, CoreError, DatabaseError, PlanError, TimeParseError, ValidationError};
pub use export::render_ics;
pub use history::{HistoryIndex, HistoryLookup};
pub use inspiration::Inspiration;
pub use interval::{FreeSegment, Interval};
pub use model::{BlockKind, Lecture, PlanBlock, WorkItem};
pub use planner::{DailyScheduler, DayPlan, PlannerConfig, TraceLine};
pub use storage::{Config, PlannerDb, ReduceOutcome, StoredLecture, TaskRecord};
pub use time::{format_time, parse_time};
