//! Multi-day proportional work splitting.
//!
//! Turns a catalog item's total remaining effort into the share that should
//! be attempted on one particular day, given what earlier days already
//! committed.

use chrono::NaiveDate;
use tracing::debug;

use crate::history::HistoryLookup;
use crate::model::WorkItem;
use crate::time::END_OF_DAY;

/// Day-scoped view of `item` for `today`, or `None` when nothing is left.
///
/// - overdue: everything remaining, due at 23:59
/// - due today: everything remaining, due at the item's own time
/// - due tomorrow: half, due at 23:59
/// - due in `n > 1` days: `ceil(remaining / n)`, due at 23:59
pub fn share_for_day<H>(item: &WorkItem, today: NaiveDate, history: &H) -> Option<WorkItem>
where
    H: HistoryLookup + ?Sized,
{
    if item.prepared {
        return None;
    }

    let prior = history.prior_minutes(&item.course, &item.title, today);
    let remaining = item.minutes_needed.saturating_sub(prior);
    if remaining == 0 {
        return None;
    }

    let days_until = (item.due_date - today).num_days();
    let (share, due_min) = match days_until {
        d if d < 0 => (remaining, END_OF_DAY),
        0 => (remaining, item.due_min),
        d => {
            let parts = if d == 1 { 2 } else { u32::try_from(d).unwrap_or(u32::MAX) };
            (remaining.div_ceil(parts).max(1), END_OF_DAY)
        }
    };
    debug!(
        course = %item.course,
        title = %item.title,
        prior,
        remaining,
        days_until,
        share,
        "allocated share"
    );

    Some(WorkItem {
        minutes_needed: share,
        due_min,
        prepared: false,
        ..item.clone()
    })
}

/// Shares for a whole catalog against one history snapshot, in catalog order.
pub fn shares_for_day<H>(items: &[WorkItem], today: NaiveDate, history: &H) -> Vec<WorkItem>
where
    H: HistoryLookup + ?Sized,
{
    items
        .iter()
        .filter_map(|item| share_for_day(item, today, history))
        .collect()
}
