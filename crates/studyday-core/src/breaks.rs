//! Adaptive rest-break sizing.
//!
//! Longer breaks when the window has spare time, capped by a budget that
//! grows with fatigue, never shorter than the caller's floor.

/// Inputs to [`size_break`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakRequest {
    /// Work minutes still to place after the current block.
    pub remaining_after: i32,
    /// Where the current block ends (for backward filling, its start).
    pub current_end: i32,
    /// End of the scheduling window.
    pub window_end: i32,
    /// Break budget before fatigue scaling.
    pub max_break: i32,
    /// Fatigue level, 1 (fresh) to 10 (exhausted).
    pub tired: u8,
    /// Minimum break length.
    pub floor: i32,
}

/// Scale a break budget by fatigue: up to +75% at `tired == 10`.
pub fn fatigue_scaled(max_break: i32, tired: u8) -> i32 {
    let multiplier = 1.0 + (f64::from(tired) / 10.0) * 0.75;
    (f64::from(max_break) * multiplier) as i32
}

/// Spare minutes in the window beyond what remaining work needs.
pub fn slack(remaining_after: i32, current_end: i32, window_end: i32) -> i32 {
    (window_end - current_end - remaining_after).max(0)
}

/// Break length in minutes for the given request.
pub fn size_break(req: &BreakRequest) -> i32 {
    let slack = slack(req.remaining_after, req.current_end, req.window_end);
    let budget = fatigue_scaled(req.max_break, req.tired);
    let floor = req.floor.max(0);

    if budget <= 0 || slack <= 5 {
        return floor;
    }
    let tiered = if slack <= 20 {
        budget.min(10)
    } else if slack <= 40 {
        budget.min(15)
    } else {
        budget.min((slack / 3).max(20))
    };
    floor.max(tiered)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(slack_minutes: i32, max_break: i32, tired: u8, floor: i32) -> BreakRequest {
        BreakRequest {
            remaining_after: 0,
            current_end: 0,
            window_end: slack_minutes,
            max_break,
            tired,
            floor,
        }
    }

    #[test]
    fn slack_never_negative() {
        assert_eq!(slack(100, 500, 550), 0);
        assert_eq!(slack(30, 500, 600), 70);
    }

    #[test]
    fn fatigue_scaling_truncates() {
        assert_eq!(fatigue_scaled(60, 3), 73);
        assert_eq!(fatigue_scaled(60, 10), 105);
        assert_eq!(fatigue_scaled(0, 10), 0);
    }

    #[test]
    fn tight_window_gets_floor() {
        assert_eq!(size_break(&req(5, 60, 3, 19)), 19);
        assert_eq!(size_break(&req(0, 60, 3, 0)), 0);
    }

    #[test]
    fn zero_budget_gets_floor() {
        assert_eq!(size_break(&req(300, 0, 5, 12)), 12);
    }

    #[test]
    fn tiers_by_slack() {
        assert_eq!(size_break(&req(20, 60, 1, 0)), 10);
        assert_eq!(size_break(&req(40, 60, 1, 0)), 15);
        assert_eq!(size_break(&req(41, 60, 1, 0)), 20);
        assert_eq!(size_break(&req(150, 60, 1, 0)), 50);
        assert_eq!(size_break(&req(600, 60, 1, 0)), 64);
    }

    #[test]
    fn small_budget_caps_tier() {
        assert_eq!(size_break(&req(30, 8, 1, 0)), 8);
    }

    #[test]
    fn floor_wins_over_tier() {
        assert_eq!(size_break(&req(15, 60, 10, 40)), 40);
    }

    #[test]
    fn negative_floor_is_zero() {
        assert_eq!(size_break(&req(0, 60, 1, -5)), 0);
    }
}
