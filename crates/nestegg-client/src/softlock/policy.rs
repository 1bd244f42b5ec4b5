use chrono::{DateTime, Duration, Utc};

pub const SOFT_LOCK_POLICY_VERSION: &str = "soft_lock/v1";

/// v1 cooling-off policy.
///
/// `assumed_weekly_progress_pct` is a flat savings-velocity heuristic used only
/// for impact messaging; it is not derived from the vault's deposit history.
#[derive(Debug, Clone, Copy)]
pub struct SoftLockPolicy {
    pub cooling_period_hours: i64,
    pub assumed_weekly_progress_pct: f64,
}

impl SoftLockPolicy {
    pub fn cooling_period(self) -> Duration {
        Duration::hours(self.cooling_period_hours)
    }

    pub fn available_at(self, created_at: DateTime<Utc>) -> DateTime<Utc> {
        created_at + self.cooling_period()
    }

    /// Elapsed time before `created_at` (clock skew) counts as zero.
    pub fn elapsed(self, created_at: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
        (now - created_at).max(Duration::zero())
    }

    pub fn is_eligible(self, created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        self.elapsed(created_at, now) >= self.cooling_period()
    }

    /// `ceil(cooling_hours - hours_elapsed)`, floored at zero.
    pub fn hours_remaining(self, created_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
        let elapsed = self.elapsed(created_at, now);
        let hours_elapsed = elapsed.num_milliseconds() as f64 / 3_600_000.0;
        let remaining = (self.cooling_period_hours as f64 - hours_elapsed).ceil();
        (remaining as i64).max(0)
    }
}

pub const SOFT_LOCK_POLICY_V1: SoftLockPolicy = SoftLockPolicy {
    cooling_period_hours: 24,
    assumed_weekly_progress_pct: 5.0,
};

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, Utc};

    use super::SOFT_LOCK_POLICY_V1;

    fn created() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-03-01T12:00:00Z")
            .map(|value| value.with_timezone(&Utc))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    #[test]
    fn hours_remaining_rounds_up_partial_hours() {
        let policy = SOFT_LOCK_POLICY_V1;
        assert_eq!(policy.hours_remaining(created(), created()), 24);
        assert_eq!(
            policy.hours_remaining(created(), created() + Duration::minutes(30)),
            24
        );
        assert_eq!(
            policy.hours_remaining(created(), created() + Duration::hours(1)),
            23
        );
        assert_eq!(
            policy.hours_remaining(
                created(),
                created() + Duration::hours(23) + Duration::minutes(59)
            ),
            1
        );
        assert_eq!(
            policy.hours_remaining(created(), created() + Duration::hours(30)),
            0
        );
    }

    #[test]
    fn eligibility_starts_at_exactly_twenty_four_hours() {
        let policy = SOFT_LOCK_POLICY_V1;
        assert!(!policy.is_eligible(created(), created() + Duration::hours(24) - Duration::seconds(1)));
        assert!(policy.is_eligible(created(), created() + Duration::hours(24)));
        assert!(policy.is_eligible(created(), created() + Duration::days(9)));
    }

    #[test]
    fn clock_skew_never_extends_the_cooling_period() {
        let policy = SOFT_LOCK_POLICY_V1;
        assert_eq!(
            policy.hours_remaining(created(), created() - Duration::hours(3)),
            24
        );
    }
}
