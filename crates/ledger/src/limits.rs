//! Daily spending limits with a rolling 24-hour window.

use serde::{Deserialize, Serialize};

/// The reset window, measured as elapsed wall-clock seconds since the last
/// reset, not calendar-day boundaries.
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Default daily cross-border limit: 10 SOL in lamports.
pub const DEFAULT_CROSS_BORDER_LIMIT: u64 = 10_000_000_000;

/// Per-user daily aggregates for the cross-border transaction class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyLimits {
    pub cross_border_limit: u64,
    pub cross_border_spent: u64,
    pub domestic_count: u32,
    pub cross_border_count: u32,
    /// Unix timestamp of the last window reset.
    pub last_reset: i64,
}

/// Outcome of a limit check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "decision")]
pub enum SpendDecision {
    Allowed,
    Denied { reason: String },
}

impl SpendDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, SpendDecision::Allowed)
    }
}

impl DailyLimits {
    pub fn new(now: i64) -> Self {
        Self {
            cross_border_limit: DEFAULT_CROSS_BORDER_LIMIT,
            cross_border_spent: 0,
            domestic_count: 0,
            cross_border_count: 0,
            last_reset: now,
        }
    }

    pub fn should_reset(&self, now: i64) -> bool {
        now - self.last_reset >= SECONDS_PER_DAY
    }

    /// Reset counters when 24 hours have elapsed since the last reset.
    pub fn roll(&mut self, now: i64) {
        if self.should_reset(now) {
            self.cross_border_spent = 0;
            self.domestic_count = 0;
            self.cross_border_count = 0;
            self.last_reset = now;
        }
    }

    /// Check whether a cross-border amount fits the remaining budget.
    pub fn can_spend(&self, amount: u64) -> SpendDecision {
        if self.cross_border_spent.saturating_add(amount) > self.cross_border_limit {
            SpendDecision::Denied {
                reason: format!(
                    "daily cross-border limit exceeded: remaining {} of {} lamports",
                    self.remaining(),
                    self.cross_border_limit
                ),
            }
        } else {
            SpendDecision::Allowed
        }
    }

    pub fn add_cross_border(&mut self, amount: u64) {
        self.cross_border_spent = self.cross_border_spent.saturating_add(amount);
        self.cross_border_count += 1;
    }

    pub fn add_domestic(&mut self) {
        self.domestic_count += 1;
    }

    /// Remaining cross-border budget for the current window.
    pub fn remaining(&self) -> u64 {
        self.cross_border_limit.saturating_sub(self.cross_border_spent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_limits_allow_up_to_cap() {
        let limits = DailyLimits::new(0);
        assert!(limits.can_spend(DEFAULT_CROSS_BORDER_LIMIT).is_allowed());
        assert!(!limits
            .can_spend(DEFAULT_CROSS_BORDER_LIMIT + 1)
            .is_allowed());
    }

    #[test]
    fn test_spending_reduces_budget() {
        let mut limits = DailyLimits::new(0);
        limits.add_cross_border(4_000_000_000);
        assert_eq!(limits.remaining(), 6_000_000_000);
        assert!(limits.can_spend(6_000_000_000).is_allowed());
        assert!(!limits.can_spend(6_000_000_001).is_allowed());
    }

    #[test]
    fn test_rolling_window_resets_after_24h() {
        let mut limits = DailyLimits::new(1_000);
        limits.add_cross_border(DEFAULT_CROSS_BORDER_LIMIT);
        assert!(!limits.can_spend(1).is_allowed());

        // One second short of 24 hours: still capped.
        limits.roll(1_000 + SECONDS_PER_DAY - 1);
        assert!(!limits.can_spend(1).is_allowed());

        // 24 hours elapsed: window resets, budget restored.
        limits.roll(1_000 + SECONDS_PER_DAY);
        assert!(limits.can_spend(1).is_allowed());
        assert_eq!(limits.cross_border_count, 0);
        assert_eq!(limits.last_reset, 1_000 + SECONDS_PER_DAY);
    }

    #[test]
    fn test_denied_reason_reports_remaining() {
        let mut limits = DailyLimits::new(0);
        limits.add_cross_border(9_000_000_000);
        match limits.can_spend(2_000_000_000) {
            SpendDecision::Denied { reason } => {
                assert!(reason.contains("1000000000"));
            }
            SpendDecision::Allowed => panic!("expected denial"),
        }
    }
}
