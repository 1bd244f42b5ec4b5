use chrono::NaiveDate;
use tracing::debug;

use crate::savings::date::days_before;
use crate::savings::policy::{WINDFALL_POLICY_V1, WindfallPolicy};
use crate::savings::types::{
    PromptOption, SavingsPrompt, Transaction, WindfallReason, WindfallResult, round_cents, round_to,
};

const WINDFALL_IMPACT_MESSAGE: &str =
    "Saving part of a windfall right when it lands keeps it from quietly becoming everyday spending.";

pub fn detect_windfall(transactions: &[Transaction], today: NaiveDate) -> WindfallResult {
    detect_windfall_with_policy(transactions, today, WINDFALL_POLICY_V1)
}

pub fn detect_windfall_with_policy(
    transactions: &[Transaction],
    today: NaiveDate,
    policy: WindfallPolicy,
) -> WindfallResult {
    let mut incomes = transactions
        .iter()
        .filter(|transaction| transaction.is_income())
        .map(Transaction::abs_amount)
        .collect::<Vec<f64>>();

    if incomes.len() < policy.min_income_observations {
        return no_windfall(
            WindfallReason::InsufficientHistory,
            None,
            format!(
                "Not enough income history yet: found {} deposits, need at least {}.",
                incomes.len(),
                policy.min_income_observations
            ),
        );
    }

    incomes.sort_by(|left, right| left.total_cmp(right));
    let Some(baseline) = baseline_income(&incomes) else {
        return no_windfall(
            WindfallReason::InsufficientHistory,
            None,
            "Not enough income history yet.".to_string(),
        );
    };

    let window_start = days_before(today, policy.lookback_days);
    // First qualifying deposit in input order; callers control ordering.
    let candidate = transactions.iter().find(|transaction| {
        transaction.is_income()
            && transaction.date >= window_start
            && transaction.date <= today
            && policy.exceeds_threshold(transaction.abs_amount(), baseline)
    });

    let Some(deposit) = candidate else {
        return no_windfall(
            WindfallReason::NoRecentLargeDeposits,
            Some(baseline),
            format!(
                "No recent large deposits: nothing in the last {} days exceeded {:.1}x your typical income of ${:.2}.",
                policy.lookback_days, policy.threshold_multiplier, baseline
            ),
        );
    };

    let amount = deposit.abs_amount();
    let multiplier = amount / baseline;
    let source_label = deposit.source_label();
    debug!(
        amount,
        baseline,
        multiplier,
        date = %deposit.date,
        "windfall detected"
    );

    WindfallResult {
        is_windfall: true,
        amount: Some(round_cents(amount)),
        baseline_income: Some(round_cents(baseline)),
        multiplier: Some(round_to(multiplier, 2)),
        explanation: format!(
            "{source_label} deposit is {multiplier:.1}x your typical income of ${baseline:.2}."
        ),
        source_label: Some(source_label),
        date: Some(deposit.date),
        suggested_savings_amount: round_cents(amount * policy.savings_rate),
        reason: None,
    }
}

/// Prompt for a detected windfall: save 20%, 10%, 30%, or decline, in that order.
pub fn windfall_prompt(result: &WindfallResult) -> Option<SavingsPrompt> {
    if !result.is_windfall {
        return None;
    }

    let suggested = result.suggested_savings_amount;
    let amount = result.amount.unwrap_or_default();
    let source = result.source_label.as_deref().unwrap_or("Unknown");
    let multiplier = result.multiplier.unwrap_or_default();
    let options = vec![
        save_option(20, suggested),
        save_option(10, round_cents(suggested / 2.0)),
        save_option(30, round_cents(suggested * 1.5)),
        PromptOption {
            label: "Not this time".to_string(),
            value: 0.0,
            percentage: None,
        },
    ];

    Some(SavingsPrompt {
        title: "You got a windfall!".to_string(),
        message: format!(
            "${amount:.2} from {source} is {multiplier:.1}x your usual deposit. Want to set some aside before it gets spent?"
        ),
        options,
        impact_message: WINDFALL_IMPACT_MESSAGE.to_string(),
        tone: None,
        emoji: None,
    })
}

/// Element at index `n / 2` of the ascending sort; even-length lists take the
/// upper of the two middle values rather than their average.
pub(crate) fn baseline_income(sorted_incomes: &[f64]) -> Option<f64> {
    sorted_incomes.get(sorted_incomes.len() / 2).copied()
}

fn save_option(percentage: u32, value: f64) -> PromptOption {
    PromptOption {
        label: format!("Save {percentage}% (${value:.2})"),
        value,
        percentage: Some(percentage),
    }
}

fn no_windfall(
    reason: WindfallReason,
    baseline: Option<f64>,
    explanation: String,
) -> WindfallResult {
    WindfallResult {
        is_windfall: false,
        amount: None,
        baseline_income: baseline.map(round_cents),
        multiplier: None,
        source_label: None,
        date: None,
        suggested_savings_amount: 0.0,
        explanation,
        reason: Some(reason),
    }
}
