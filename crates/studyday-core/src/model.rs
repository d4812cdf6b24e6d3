//! Data model shared by the engine, the store and the CLI.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Prefix of every lecture label in a plan.
pub const LECTURE_PREFIX: &str = "Lecture: ";

/// A fixed lecture on a given day, in minutes since midnight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lecture {
    pub course: String,
    pub start_min: i32,
    pub end_min: i32,
}

impl Lecture {
    pub fn new(course: impl Into<String>, start_min: i32, end_min: i32) -> Self {
        Self {
            course: course.into(),
            start_min,
            end_min,
        }
    }

    pub fn overlaps(&self, start: i32, end: i32) -> bool {
        self.start_min < end && self.end_min > start
    }
}

/// A unit of study work from the weekly catalog.
///
/// `minutes_needed` is the total remaining effort, not a per-day figure.
/// The allocator derives day-scoped copies whose `minutes_needed` is the
/// share for that day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    pub course: String,
    pub title: String,
    pub due_date: NaiveDate,
    pub due_min: i32,
    pub minutes_needed: u32,
    #[serde(default)]
    pub prepared: bool,
    #[serde(default)]
    pub repeat_weekly: bool,
}

impl WorkItem {
    pub fn new(
        course: impl Into<String>,
        title: impl Into<String>,
        due_date: NaiveDate,
        due_min: i32,
        minutes_needed: u32,
    ) -> Self {
        Self {
            course: course.into(),
            title: title.into(),
            due_date,
            due_min,
            minutes_needed,
            prepared: false,
            repeat_weekly: false,
        }
    }

    /// Label of every study block placed for this item.
    pub fn study_label(&self) -> String {
        study_label(&self.course, &self.title)
    }
}

/// `"Study: {course} — {title}"`, the identity used to match history.
pub fn study_label(course: &str, title: &str) -> String {
    format!("Study: {course} — {title}")
}

/// Kind of block on a day plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Study,
    Break,
    Lecture,
}

impl BlockKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Study => "study",
            Self::Break => "break",
            Self::Lecture => "lecture",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "study" => Some(Self::Study),
            "break" => Some(Self::Break),
            "lecture" => Some(Self::Lecture),
            _ => None,
        }
    }
}

impl std::fmt::Display for BlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A block on a day plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanBlock {
    pub start_min: i32,
    pub end_min: i32,
    pub label: String,
    pub kind: BlockKind,
    /// Course the block belongs to; empty for breaks.
    #[serde(default)]
    pub course: String,
    #[serde(default)]
    pub manual: bool,
}

impl PlanBlock {
    pub fn study(start_min: i32, end_min: i32, item: &WorkItem) -> Self {
        Self {
            start_min,
            end_min,
            label: item.study_label(),
            kind: BlockKind::Study,
            course: item.course.clone(),
            manual: false,
        }
    }

    pub fn rest(start_min: i32, end_min: i32) -> Self {
        Self {
            start_min,
            end_min,
            label: "Break".to_string(),
            kind: BlockKind::Break,
            course: String::new(),
            manual: false,
        }
    }

    pub fn lecture(start_min: i32, end_min: i32, label: impl Into<String>) -> Self {
        let label = label.into();
        let course = label
            .strip_prefix(LECTURE_PREFIX)
            .unwrap_or(&label)
            .to_string();
        Self {
            start_min,
            end_min,
            label,
            kind: BlockKind::Lecture,
            course,
            manual: false,
        }
    }

    pub fn duration_minutes(&self) -> i32 {
        self.end_min - self.start_min
    }

    pub fn overlaps(&self, other: &PlanBlock) -> bool {
        self.start_min < other.end_min && other.start_min < self.end_min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn study_label_uses_em_dash() {
        assert_eq!(study_label("MATH101", "Problem set 3"), "Study: MATH101 — Problem set 3");
    }

    #[test]
    fn lecture_block_recovers_course_from_label() {
        let block = PlanBlock::lecture(570, 690, "Lecture: Physics");
        assert_eq!(block.course, "Physics");
        assert_eq!(block.kind, BlockKind::Lecture);
        assert_eq!(block.duration_minutes(), 120);
    }

    #[test]
    fn block_kind_serializes_lowercase() {
        let json = serde_json::to_string(&BlockKind::Study).unwrap();
        assert_eq!(json, "\"study\"");
        assert_eq!(BlockKind::parse("break"), Some(BlockKind::Break));
        assert_eq!(BlockKind::parse("Break"), None);
    }

    #[test]
    fn work_item_serialization_defaults_flags() {
        let json = r#"{"course":"CS","title":"Lab","due_date":"2024-03-08","due_min":900,"minutes_needed":45}"#;
        let item: WorkItem = serde_json::from_str(json).unwrap();
        assert!(!item.prepared);
        assert!(!item.repeat_weekly);
        assert_eq!(item.due_date, NaiveDate::from_ymd_opt(2024, 3, 8).unwrap());
    }

    #[test]
    fn adjacent_blocks_do_not_overlap() {
        let a = PlanBlock::rest(480, 510);
        let b = PlanBlock::rest(510, 540);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&PlanBlock::rest(500, 520)));
    }
}
