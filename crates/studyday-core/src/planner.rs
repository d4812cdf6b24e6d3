//! Greedy deadline-aware daily scheduler.
//!
//! Places the day's work items into the free time left around lectures:
//! - Lectures are padded by a buffer and merged into a fixed busy set
//! - Items are taken earliest-deadline first, larger items first on ties
//! - Each item is filled right to left from its due time toward the horizon
//! - Adaptive breaks are inserted before each study block while work remains
//!
//! Shortfalls are reported in the trace, never as errors.

use std::cmp::Reverse;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::breaks::{size_break, BreakRequest};
use crate::error::PlanError;
use crate::interval::{self, FreeSegment, Interval};
use crate::model::{BlockKind, Lecture, PlanBlock, WorkItem, LECTURE_PREFIX};
use crate::time::{format_time, MINUTES_PER_DAY};

/// Tuning knobs for one scheduling call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerConfig {
    pub day_start: i32,
    pub day_end: i32,
    /// Longest single study block (minutes)
    pub block_size: i32,
    /// Break budget before fatigue scaling (minutes)
    pub max_break: i32,
    pub adaptive_breaks: bool,
    /// Fatigue, clamped to 1..=10
    pub tired: u8,
    /// Padding around each lecture (minutes)
    pub lecture_buffer: i32,
    /// Base gap between study blocks; the break floor adds `tired * 3`
    pub min_gap: i32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            day_start: 8 * 60,
            day_end: 22 * 60,
            block_size: 60,
            max_break: 60,
            adaptive_breaks: true,
            tired: 3,
            lecture_buffer: 30,
            min_gap: 10,
        }
    }
}

impl PlannerConfig {
    /// Reject configurations the scheduler cannot run with.
    pub fn validate(&self) -> Result<(), PlanError> {
        if self.day_start >= self.day_end {
            return Err(PlanError::InvalidDayWindow {
                start: self.day_start,
                end: self.day_end,
            });
        }
        if self.day_start < 0 || self.day_end > MINUTES_PER_DAY {
            return Err(PlanError::DayOutOfRange {
                start: self.day_start,
                end: self.day_end,
            });
        }
        if self.block_size <= 0 {
            return Err(PlanError::InvalidBlockSize(self.block_size));
        }
        if self.max_break < 0 {
            return Err(PlanError::NegativeMaxBreak(self.max_break));
        }
        Ok(())
    }

    fn break_floor(&self) -> i32 {
        self.min_gap + i32::from(self.tired) * 3
    }
}

/// One line of the human-readable plan trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TraceLine {
    Study { start: i32, end: i32, label: String },
    Break { start: i32, end: i32 },
    NoWindow { due: i32, course: String, title: String },
    Shortfall { due: i32, course: String, title: String, remaining: i32 },
    FixedHeader,
    Fixed { start: i32, end: i32, label: String },
}

impl TraceLine {
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::NoWindow { .. } | Self::Shortfall { .. })
    }
}

impl fmt::Display for TraceLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Study { start, end, label } | Self::Fixed { start, end, label } => {
                write!(f, "{} - {}  {}", format_time(*start), format_time(*end), label)
            }
            Self::Break { start, end } => {
                write!(f, "{} - {}  Break", format_time(*start), format_time(*end))
            }
            Self::NoWindow { due, course, title } => write!(
                f,
                "⚠ No window left before {} for {course} — {title}",
                format_time(*due)
            ),
            Self::Shortfall {
                due,
                course,
                title,
                remaining,
            } => write!(
                f,
                "⚠ Not enough time before {} for {course} — {title}: {remaining} min left",
                format_time(*due)
            ),
            Self::FixedHeader => write!(f, "\n— Today’s Fixed Items —"),
        }
    }
}

/// Result of a scheduling call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPlan {
    /// Study/break blocks per item in priority order, then lectures.
    pub blocks: Vec<PlanBlock>,
    pub trace: Vec<TraceLine>,
}

impl DayPlan {
    pub fn trace_text(&self) -> String {
        self.trace
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn warnings(&self) -> impl Iterator<Item = &TraceLine> {
        self.trace.iter().filter(|line| line.is_warning())
    }

    /// Total minutes of study placed under `label`.
    pub fn study_minutes(&self, label: &str) -> i32 {
        self.blocks
            .iter()
            .filter(|b| b.kind == BlockKind::Study && b.label == label)
            .map(PlanBlock::duration_minutes)
            .sum()
    }
}

/// Greedy backward-filling scheduler for a single day.
#[derive(Debug, Clone)]
pub struct DailyScheduler {
    config: PlannerConfig,
}

impl DailyScheduler {
    /// Create a scheduler, validating the configuration up front.
    ///
    /// # Errors
    /// Returns a [`PlanError`] for an empty or out-of-range day window, a
    /// non-positive block size or a negative break budget.
    pub fn new(mut config: PlannerConfig) -> Result<Self, PlanError> {
        config.validate()?;
        config.tired = config.tired.clamp(1, 10);
        Ok(Self { config })
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Lectures padded by the buffer, clipped to the day, merged.
    pub fn busy_intervals(&self, lectures: &[Lecture]) -> Vec<Interval> {
        let cfg = &self.config;
        let padded: Vec<Interval> = lectures
            .iter()
            .map(|lec| {
                Interval::new(
                    cfg.day_start.max(lec.start_min - cfg.lecture_buffer),
                    cfg.day_end.min(lec.end_min + cfg.lecture_buffer),
                    format!("{LECTURE_PREFIX}{}", lec.course),
                )
            })
            .filter(|iv| !iv.is_empty())
            .collect();
        interval::merge(&padded)
    }

    /// Plan the day.
    ///
    /// # Arguments
    /// * `lectures` - Fixed lectures for the day
    /// * `items` - Day-scoped work items (see [`crate::allocator`])
    /// * `horizon` - Current minute when planning today, `None` otherwise
    pub fn plan(&self, lectures: &[Lecture], items: &[WorkItem], horizon: Option<i32>) -> DayPlan {
        let cfg = &self.config;
        let busy = self.busy_intervals(lectures);
        let window_start = horizon.map_or(cfg.day_start, |now| now.max(cfg.day_start));

        let mut pending: Vec<&WorkItem> = items.iter().filter(|w| !w.prepared).collect();
        pending.sort_by_key(|w| (w.due_min, Reverse(w.minutes_needed)));

        let mut plan = DayPlan::default();
        for item in pending {
            self.place_item(item, window_start, &busy, &mut plan);
        }

        plan.trace.push(TraceLine::FixedHeader);
        for iv in busy.iter().filter(|iv| iv.label.starts_with(LECTURE_PREFIX)) {
            plan.trace.push(TraceLine::Fixed {
                start: iv.start,
                end: iv.end,
                label: iv.label.clone(),
            });
            plan.blocks.push(PlanBlock::lecture(iv.start, iv.end, iv.label.clone()));
        }
        plan
    }

    fn place_item(&self, item: &WorkItem, window_start: i32, busy: &[Interval], plan: &mut DayPlan) {
        let cfg = &self.config;
        let mut window_end = cfg.day_end.min(item.due_min);
        if window_end <= window_start {
            warn!(course = %item.course, title = %item.title, due = item.due_min, "no window left");
            plan.trace.push(TraceLine::NoWindow {
                due: item.due_min,
                course: item.course.clone(),
                title: item.title.clone(),
            });
            return;
        }

        let mut remaining = i32::try_from(item.minutes_needed).unwrap_or(i32::MAX);
        while remaining > 0 {
            let mut occupied = busy.to_vec();
            occupied.extend(
                plan.blocks
                    .iter()
                    .map(|b| Interval::new(b.start_min, b.end_min, b.label.clone())),
            );
            let free = interval::subtract(window_start, window_end, &occupied);

            let Some(segment) = pick_segment(&free, item.due_min) else {
                break;
            };

            let alloc = cfg.block_size.min(remaining).min(segment.len());
            let study_start = segment.end - alloc;
            debug!(label = %item.study_label(), start = study_start, end = segment.end, "placed study block");
            plan.trace.push(TraceLine::Study {
                start: study_start,
                end: segment.end,
                label: item.study_label(),
            });
            plan.blocks.push(PlanBlock::study(study_start, segment.end, item));
            remaining -= alloc;

            if remaining > 0 && cfg.adaptive_breaks {
                let length = size_break(&BreakRequest {
                    remaining_after: remaining,
                    current_end: study_start,
                    window_end,
                    max_break: cfg.max_break,
                    tired: cfg.tired,
                    floor: cfg.break_floor(),
                });
                if length > 0 {
                    // may run into lecture padding, never into an earlier study or break block
                    let placed_floor = plan
                        .blocks
                        .iter()
                        .filter(|b| b.kind != BlockKind::Lecture && b.end_min <= study_start)
                        .map(|b| b.end_min)
                        .fold(window_start, i32::max);
                    let break_start = placed_floor.max(study_start - length);
                    if break_start < study_start {
                        plan.trace.push(TraceLine::Break {
                            start: break_start,
                            end: study_start,
                        });
                        plan.blocks.push(PlanBlock::rest(break_start, study_start));
                    }
                }
            }

            window_end = study_start;
        }

        if remaining > 0 {
            warn!(course = %item.course, title = %item.title, remaining, "not enough time before due");
            plan.trace.push(TraceLine::Shortfall {
                due: item.due_min,
                course: item.course.clone(),
                title: item.title.clone(),
                remaining,
            });
        }
    }
}

/// Rank segments by distance from their end to the due time (larger segment
/// first on ties), then take the last non-empty one in that ranking.
fn pick_segment(free: &[FreeSegment], due_min: i32) -> Option<FreeSegment> {
    let mut ranked = free.to_vec();
    ranked.sort_by_key(|seg| ((due_min - seg.end).abs(), Reverse(seg.len()), seg.start, seg.end));
    ranked.into_iter().rev().find(|seg| !seg.is_empty())
}
