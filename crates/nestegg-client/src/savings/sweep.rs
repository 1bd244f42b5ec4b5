use chrono::NaiveDate;
use tracing::debug;

use crate::savings::date::days_before;
use crate::savings::policy::{SWEEP_POLICY_V1, SweepPolicy};
use crate::savings::types::{
    PromptOption, SavingsPrompt, SweepReason, SweepResult, Transaction, round_cents, round_to,
};

const SWEEP_TONE: &str = "encouraging";
const SWEEP_EMOJI: &str = "🎉";
const SWEEP_IMPACT_MESSAGE: &str =
    "Sweeping small weekly wins into savings adds up to real progress over a year.";

pub fn analyze_weekly_sweep(transactions: &[Transaction], today: NaiveDate) -> SweepResult {
    analyze_weekly_sweep_with_policy(transactions, today, SWEEP_POLICY_V1)
}

pub fn analyze_weekly_sweep_with_policy(
    transactions: &[Transaction],
    today: NaiveDate,
    policy: SweepPolicy,
) -> SweepResult {
    // Current week: [today - 7, today]. Baseline: [today - 35, today - 7).
    let current_start = days_before(today, policy.current_window_days);
    let baseline_start = days_before(current_start, policy.baseline_window_days());

    let mut current_week_spend = 0.0;
    let mut baseline_spend = 0.0;
    let mut baseline_debits = 0_usize;
    for transaction in transactions.iter().filter(|row| row.is_spend()) {
        if transaction.date >= current_start && transaction.date <= today {
            current_week_spend += transaction.amount;
        } else if transaction.date >= baseline_start && transaction.date < current_start {
            baseline_spend += transaction.amount;
            baseline_debits += 1;
        }
    }

    if baseline_debits == 0 {
        return SweepResult {
            has_opportunity: false,
            current_week_spend: round_cents(current_week_spend),
            trailing_average_weekly_spend: 0.0,
            underspend_amount: 0.0,
            suggested_savings_amount: 0.0,
            explanation: format!(
                "Insufficient historical data: no spending found in the {} weeks before this one.",
                policy.baseline_weeks
            ),
            reason: Some(SweepReason::InsufficientHistoricalData),
        };
    }

    // The threshold sees the unrounded underspend; a quarter-cent average
    // must not be rounded down onto the floor. Only float noise is trimmed.
    let exact_average = baseline_spend / policy.baseline_weeks as f64;
    let exact_underspend = round_to(exact_average - current_week_spend, 6);
    let qualifies = policy.qualifies(exact_underspend);
    let overspent = exact_underspend < 0.0;

    let current_week_spend = round_cents(current_week_spend);
    let average = round_cents(exact_average);
    let underspend = round_cents(exact_underspend);
    debug!(
        current_week_spend,
        average, exact_underspend, baseline_debits, "weekly sweep evaluated"
    );

    if qualifies {
        return SweepResult {
            has_opportunity: true,
            current_week_spend,
            trailing_average_weekly_spend: average,
            underspend_amount: underspend,
            suggested_savings_amount: round_cents(exact_underspend * policy.savings_rate),
            explanation: format!(
                "You spent ${current_week_spend:.2} this week, ${underspend:.2} less than your ${average:.2} weekly average."
            ),
            reason: None,
        };
    }

    let (reason, explanation) = if overspent {
        (
            SweepReason::Overspent,
            format!(
                "You spent ${current_week_spend:.2} this week, ${:.2} more than your ${average:.2} weekly average.",
                current_week_spend - average
            ),
        )
    } else {
        (
            SweepReason::BelowThreshold,
            format!(
                "You're ${underspend:.2} under your ${average:.2} weekly average; sweeps start above ${:.2}.",
                policy.min_underspend
            ),
        )
    };

    SweepResult {
        has_opportunity: false,
        current_week_spend,
        trailing_average_weekly_spend: average,
        underspend_amount: underspend,
        suggested_savings_amount: 0.0,
        explanation,
        reason: Some(reason),
    }
}

/// Prompt for a sweep: save the suggested amount, save half of it, or keep it all.
pub fn sweep_prompt(result: &SweepResult) -> Option<SavingsPrompt> {
    if !result.has_opportunity {
        return None;
    }

    let suggested = result.suggested_savings_amount;
    let half = round_cents(suggested / 2.0);
    Some(SavingsPrompt {
        title: "You underspent this week!".to_string(),
        message: format!(
            "You came in ${:.2} under your usual week. Sweep some of it into savings?",
            result.underspend_amount
        ),
        options: vec![
            PromptOption {
                label: format!("Save ${suggested:.2}"),
                value: suggested,
                percentage: Some(50),
            },
            PromptOption {
                label: format!("Save ${half:.2}"),
                value: half,
                percentage: Some(25),
            },
            PromptOption {
                label: "Keep it all".to_string(),
                value: 0.0,
                percentage: None,
            },
        ],
        impact_message: SWEEP_IMPACT_MESSAGE.to_string(),
        tone: Some(SWEEP_TONE.to_string()),
        emoji: Some(SWEEP_EMOJI.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate};

    use super::{analyze_weekly_sweep, sweep_prompt};
    use crate::savings::types::{SweepReason, Transaction};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 31).unwrap_or(NaiveDate::MIN)
    }

    fn txn(days_ago: i64, amount: f64) -> Transaction {
        Transaction {
            amount,
            date: today() - Duration::days(days_ago),
            description: "CARD PURCHASE".to_string(),
            counterparty_name: None,
        }
    }

    fn baseline_rows(total: f64) -> Vec<Transaction> {
        vec![
            txn(10, total / 4.0),
            txn(17, total / 4.0),
            txn(24, total / 4.0),
            txn(31, total / 4.0),
        ]
    }

    #[test]
    fn underspend_triggers_half_savings_suggestion() {
        let mut rows = baseline_rows(1110.0);
        rows.push(txn(1, 120.0));
        rows.push(txn(4, 80.0));
        rows.push(txn(2, -1500.0));

        let result = analyze_weekly_sweep(&rows, today());
        assert!(result.has_opportunity);
        assert_eq!(result.current_week_spend, 200.0);
        assert_eq!(result.trailing_average_weekly_spend, 277.5);
        assert_eq!(result.underspend_amount, 77.5);
        assert_eq!(result.suggested_savings_amount, 38.75);
    }

    #[test]
    fn underspend_of_177_50_suggests_88_75() {
        let mut rows = baseline_rows(1110.0);
        rows.push(txn(3, 100.0));
        let result = analyze_weekly_sweep(&rows, today());
        assert!(result.has_opportunity);
        assert_eq!(result.underspend_amount, 177.5);
        assert_eq!(result.suggested_savings_amount, 88.75);
    }

    #[test]
    fn underspend_of_exactly_five_dollars_does_not_trigger() {
        let mut rows = baseline_rows(420.0);
        rows.push(txn(2, 100.0));
        let result = analyze_weekly_sweep(&rows, today());
        assert!(!result.has_opportunity);
        assert_eq!(result.underspend_amount, 5.0);
        assert_eq!(result.reason, Some(SweepReason::BelowThreshold));

        let mut rows = baseline_rows(420.0);
        rows.push(txn(2, 99.99));
        let result = analyze_weekly_sweep(&rows, today());
        assert!(result.has_opportunity);
        assert_eq!(result.underspend_amount, 5.01);
    }

    #[test]
    fn quarter_cent_average_above_the_floor_still_triggers() {
        // 420.01 / 4 = 105.0025, so the underspend is 5.0025.
        let mut rows = baseline_rows(420.01);
        rows.push(txn(2, 100.0));
        let result = analyze_weekly_sweep(&rows, today());
        assert!(result.has_opportunity);
        assert_eq!(result.reason, None);
        assert_eq!(result.current_week_spend, 100.0);
        assert_eq!(result.suggested_savings_amount, 2.5);
    }

    #[test]
    fn empty_baseline_reports_insufficient_data() {
        let rows = vec![txn(1, 50.0), txn(40, 900.0), txn(12, -300.0)];
        let result = analyze_weekly_sweep(&rows, today());
        assert!(!result.has_opportunity);
        assert_eq!(result.reason, Some(SweepReason::InsufficientHistoricalData));
        assert_eq!(result.trailing_average_weekly_spend, 0.0);
        assert_eq!(result.suggested_savings_amount, 0.0);
    }

    #[test]
    fn overspending_is_distinguished_from_small_underspend() {
        let mut rows = baseline_rows(400.0);
        rows.push(txn(1, 250.0));
        let result = analyze_weekly_sweep(&rows, today());
        assert!(!result.has_opportunity);
        assert_eq!(result.reason, Some(SweepReason::Overspent));
        assert!(result.underspend_amount < 0.0);
    }

    #[test]
    fn windows_do_not_overlap_at_day_seven_or_day_thirty_five() {
        let rows = vec![txn(7, 40.0), txn(8, 400.0), txn(35, 400.0), txn(36, 9000.0)];
        let result = analyze_weekly_sweep(&rows, today());
        assert_eq!(result.current_week_spend, 40.0);
        assert_eq!(result.trailing_average_weekly_spend, 200.0);
    }

    #[test]
    fn prompt_offers_three_options_with_encouraging_tone() {
        let mut rows = baseline_rows(1110.0);
        rows.push(txn(1, 200.0));
        let result = analyze_weekly_sweep(&rows, today());
        let prompt = sweep_prompt(&result);
        assert!(prompt.is_some());
        if let Some(prompt) = prompt {
            let values = prompt
                .options
                .iter()
                .map(|option| option.value)
                .collect::<Vec<f64>>();
            assert_eq!(values, vec![38.75, 19.38, 0.0]);
            assert_eq!(prompt.tone.as_deref(), Some("encouraging"));
            assert!(prompt.emoji.is_some());
        }
    }
}
