//! Committed study history.
//!
//! The allocator needs to know how many minutes of each task were already
//! planned on earlier days. Instead of rescanning every stored day per
//! lookup, [`HistoryIndex`] keeps a per-label running total by date.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use crate::model::{study_label, BlockKind, PlanBlock};

/// Source of previously committed study minutes.
pub trait HistoryLookup {
    /// Minutes of Study blocks labelled `"Study: {course} — {title}"` on
    /// dates strictly before `before`.
    fn prior_minutes(&self, course: &str, title: &str, before: NaiveDate) -> u32;
}

/// No history at all.
impl HistoryLookup for () {
    fn prior_minutes(&self, _course: &str, _title: &str, _before: NaiveDate) -> u32 {
        0
    }
}

/// Study minutes per label per date.
#[derive(Debug, Clone, Default)]
pub struct HistoryIndex {
    by_label: HashMap<String, BTreeMap<NaiveDate, u32>>,
}

impl HistoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from stored day plans.
    pub fn from_days<'a, I>(days: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, &'a [PlanBlock])>,
    {
        let mut index = Self::new();
        for (date, blocks) in days {
            index.commit_day(date, blocks);
        }
        index
    }

    /// Record `blocks` as the committed plan for `date`, replacing whatever
    /// was committed for that date before.
    pub fn commit_day(&mut self, date: NaiveDate, blocks: &[PlanBlock]) {
        for per_date in self.by_label.values_mut() {
            per_date.remove(&date);
        }
        self.by_label.retain(|_, per_date| !per_date.is_empty());

        for block in blocks.iter().filter(|b| b.kind == BlockKind::Study) {
            let minutes = u32::try_from(block.duration_minutes().max(0)).unwrap_or(0);
            *self
                .by_label
                .entry(block.label.clone())
                .or_default()
                .entry(date)
                .or_insert(0) += minutes;
        }
    }

    /// Minutes committed under `label` on exactly `date`.
    pub fn minutes_on(&self, label: &str, date: NaiveDate) -> u32 {
        self.by_label
            .get(label)
            .and_then(|per_date| per_date.get(&date))
            .copied()
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.by_label.is_empty()
    }
}

impl HistoryLookup for HistoryIndex {
    fn prior_minutes(&self, course: &str, title: &str, before: NaiveDate) -> u32 {
        self.by_label
            .get(&study_label(course, title))
            .map(|per_date| per_date.range(..before).map(|(_, m)| *m).sum())
            .unwrap_or(0)
    }
}
