/// Policy identifiers are emitted with detection output so threshold changes
/// stay visible in diffs and support sessions.
pub const WINDFALL_POLICY_VERSION: &str = "windfall/v1";
pub const SWEEP_POLICY_VERSION: &str = "sweep/v1";

/// v1 windfall policy.
///
/// `min_income_observations` is deliberately low; raising it changes which
/// users see a windfall prompt, so it only moves with a new policy version.
#[derive(Debug, Clone, Copy)]
pub struct WindfallPolicy {
    pub min_income_observations: usize,
    pub lookback_days: i64,
    pub threshold_multiplier: f64,
    pub savings_rate: f64,
}

impl WindfallPolicy {
    /// Strict comparison: a deposit of exactly `threshold_multiplier * baseline` does not qualify.
    pub fn exceeds_threshold(self, amount: f64, baseline: f64) -> bool {
        amount > baseline * self.threshold_multiplier
    }
}

pub const WINDFALL_POLICY_V1: WindfallPolicy = WindfallPolicy {
    min_income_observations: 2,
    lookback_days: 30,
    threshold_multiplier: 1.5,
    savings_rate: 0.20,
};

/// v1 weekly sweep policy.
///
/// The trailing average divides by `baseline_weeks` regardless of how many
/// debits fall in each sub-week.
#[derive(Debug, Clone, Copy)]
pub struct SweepPolicy {
    pub current_window_days: i64,
    pub baseline_weeks: i64,
    pub min_underspend: f64,
    pub savings_rate: f64,
}

impl SweepPolicy {
    pub const fn baseline_window_days(self) -> i64 {
        self.baseline_weeks * 7
    }

    pub fn qualifies(self, underspend: f64) -> bool {
        underspend > self.min_underspend
    }
}

pub const SWEEP_POLICY_V1: SweepPolicy = SweepPolicy {
    current_window_days: 7,
    baseline_weeks: 4,
    min_underspend: 5.00,
    savings_rate: 0.5,
};

pub const OPPORTUNITY_PRIORITY_WINDFALL: u8 = 1;
pub const OPPORTUNITY_PRIORITY_SWEEP: u8 = 2;

#[cfg(test)]
mod tests {
    use super::{SWEEP_POLICY_V1, WINDFALL_POLICY_V1};

    #[test]
    fn windfall_threshold_is_strict() {
        let policy = WINDFALL_POLICY_V1;
        assert!(!policy.exceeds_threshold(750.0, 500.0));
        assert!(policy.exceeds_threshold(750.01, 500.0));
    }

    #[test]
    fn sweep_floor_is_strict_and_baseline_spans_four_weeks() {
        let policy = SWEEP_POLICY_V1;
        assert!(!policy.qualifies(5.00));
        assert!(policy.qualifies(5.01));
        assert_eq!(policy.baseline_window_days(), 28);
    }
}
