//! Interval algebra over a single day's minutes.
//!
//! Busy time is a list of labelled half-open intervals; free time is the
//! complement of busy time inside a bound.

use serde::{Deserialize, Serialize};

/// A labelled half-open interval `[start, end)` in minutes since midnight.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Interval {
    pub start: i32,
    pub end: i32,
    pub label: String,
}

impl Interval {
    pub fn new(start: i32, end: i32, label: impl Into<String>) -> Self {
        Self {
            start,
            end,
            label: label.into(),
        }
    }

    pub fn len(&self) -> i32 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// An unlabelled free segment `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeSegment {
    pub start: i32,
    pub end: i32,
}

impl FreeSegment {
    pub fn len(&self) -> i32 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Merge overlapping or touching intervals.
///
/// Each merged interval keeps the label of the first input interval (in
/// sorted order) it absorbed.
pub fn merge(intervals: &[Interval]) -> Vec<Interval> {
    let mut sorted = intervals.to_vec();
    sorted.sort();

    let mut merged: Vec<Interval> = Vec::with_capacity(sorted.len());
    for interval in sorted {
        match merged.last_mut() {
            Some(last) if interval.start <= last.end => {
                last.end = last.end.max(interval.end);
            }
            _ => merged.push(interval),
        }
    }
    merged
}

/// Free segments of `[start, end)` not covered by any `busy` interval.
///
/// Returned segments are sorted, disjoint and non-empty.
pub fn subtract(start: i32, end: i32, busy: &[Interval]) -> Vec<FreeSegment> {
    if start >= end {
        return Vec::new();
    }

    let mut clipped: Vec<(i32, i32)> = busy
        .iter()
        .map(|b| (b.start.max(start), b.end.min(end)))
        .filter(|(s, e)| s < e)
        .collect();
    clipped.sort_unstable();

    let mut free = Vec::new();
    let mut cursor = start;
    for (s, e) in clipped {
        if cursor < s {
            free.push(FreeSegment { start: cursor, end: s });
        }
        cursor = cursor.max(e);
        if cursor >= end {
            break;
        }
    }
    if cursor < end {
        free.push(FreeSegment { start: cursor, end });
    }
    free
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(start: i32, end: i32, label: &str) -> Interval {
        Interval::new(start, end, label)
    }

    #[test]
    fn merge_empty_is_empty() {
        assert!(merge(&[]).is_empty());
    }

    #[test]
    fn merge_keeps_first_label() {
        let merged = merge(&[iv(600, 700, "B"), iv(570, 650, "A"), iv(800, 900, "C")]);
        assert_eq!(merged, vec![iv(570, 700, "A"), iv(800, 900, "C")]);
    }

    #[test]
    fn merge_joins_touching_intervals() {
        let merged = merge(&[iv(0, 10, "x"), iv(10, 20, "y")]);
        assert_eq!(merged, vec![iv(0, 20, "x")]);
    }

    #[test]
    fn merge_absorbs_contained_interval() {
        let merged = merge(&[iv(0, 100, "outer"), iv(20, 30, "inner")]);
        assert_eq!(merged, vec![iv(0, 100, "outer")]);
    }

    #[test]
    fn subtract_without_busy_is_whole_bound() {
        assert_eq!(subtract(480, 600, &[]), vec![FreeSegment { start: 480, end: 600 }]);
    }

    #[test]
    fn subtract_degenerate_bound_is_empty() {
        assert!(subtract(600, 600, &[]).is_empty());
        assert!(subtract(700, 600, &[]).is_empty());
    }

    #[test]
    fn subtract_clips_busy_to_bound() {
        let free = subtract(480, 900, &[iv(400, 500, "a"), iv(570, 690, "b"), iv(880, 1000, "c")]);
        assert_eq!(
            free,
            vec![
                FreeSegment { start: 500, end: 570 },
                FreeSegment { start: 690, end: 880 },
            ]
        );
    }

    #[test]
    fn subtract_handles_unsorted_overlapping_busy() {
        let free = subtract(0, 100, &[iv(50, 60, "b"), iv(10, 55, "a"), iv(70, 80, "c")]);
        assert_eq!(
            free,
            vec![
                FreeSegment { start: 0, end: 10 },
                FreeSegment { start: 60, end: 70 },
                FreeSegment { start: 80, end: 100 },
            ]
        );
    }

    #[test]
    fn subtract_fully_covered_is_empty() {
        assert!(subtract(100, 200, &[iv(0, 300, "all")]).is_empty());
    }
}
