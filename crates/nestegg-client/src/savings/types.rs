use chrono::NaiveDate;
use serde::Serialize;

/// Canonical transaction consumed by the detectors.
///
/// Sign convention: a negative `amount` is money received (income), a positive
/// `amount` is money spent.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub amount: f64,
    pub date: NaiveDate,
    pub description: String,
    pub counterparty_name: Option<String>,
}

impl Transaction {
    pub fn is_income(&self) -> bool {
        self.amount < 0.0
    }

    pub fn is_spend(&self) -> bool {
        self.amount > 0.0
    }

    pub fn abs_amount(&self) -> f64 {
        self.amount.abs()
    }

    pub fn source_label(&self) -> String {
        if !self.description.is_empty() {
            return self.description.clone();
        }
        match &self.counterparty_name {
            Some(name) => name.clone(),
            None => "Unknown".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NormalizedBatch {
    #[serde(skip)]
    pub transactions: Vec<Transaction>,
    pub records_read: i64,
    pub records_used: i64,
    pub records_skipped: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WindfallReason {
    InsufficientHistory,
    NoRecentLargeDeposits,
}

impl WindfallReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InsufficientHistory => "insufficient_history",
            Self::NoRecentLargeDeposits => "no_recent_large_deposits",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindfallResult {
    pub is_windfall: bool,
    pub amount: Option<f64>,
    pub baseline_income: Option<f64>,
    pub multiplier: Option<f64>,
    pub source_label: Option<String>,
    pub date: Option<NaiveDate>,
    pub suggested_savings_amount: f64,
    pub explanation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<WindfallReason>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepReason {
    InsufficientHistoricalData,
    Overspent,
    BelowThreshold,
}

impl SweepReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InsufficientHistoricalData => "insufficient_historical_data",
            Self::Overspent => "overspent",
            Self::BelowThreshold => "below_threshold",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepResult {
    pub has_opportunity: bool,
    pub current_week_spend: f64,
    pub trailing_average_weekly_spend: f64,
    pub underspend_amount: f64,
    pub suggested_savings_amount: f64,
    pub explanation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<SweepReason>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromptOption {
    pub label: String,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavingsPrompt {
    pub title: String,
    pub message: String,
    pub options: Vec<PromptOption>,
    pub impact_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OpportunityKind {
    Windfall,
    Sweep,
}

impl OpportunityKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Windfall => "windfall",
            Self::Sweep => "sweep",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OpportunityPayload {
    Windfall(WindfallResult),
    Sweep(SweepResult),
}

impl OpportunityPayload {
    pub fn suggested_savings_amount(&self) -> f64 {
        match self {
            Self::Windfall(result) => result.suggested_savings_amount,
            Self::Sweep(result) => result.suggested_savings_amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Opportunity {
    pub kind: OpportunityKind,
    pub priority: u8,
    pub payload: OpportunityPayload,
    pub prompt: SavingsPrompt,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpportunitySummary {
    pub windfall_detected: bool,
    pub sweep_detected: bool,
    pub opportunity_count: i64,
    pub total_suggested_savings: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpportunityAnalysis {
    pub opportunities: Vec<Opportunity>,
    pub summary: OpportunitySummary,
}

pub(crate) fn round_to(value: f64, decimals: u32) -> f64 {
    let exponent = i32::try_from(decimals).unwrap_or(2);
    let factor = 10_f64.powi(exponent);
    (value * factor).round() / factor
}

pub(crate) fn round_cents(value: f64) -> f64 {
    round_to(value, 2)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{Transaction, round_cents};

    fn txn(amount: f64, description: &str, counterparty: Option<&str>) -> Transaction {
        Transaction {
            amount,
            date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap_or(NaiveDate::MIN),
            description: description.to_string(),
            counterparty_name: counterparty.map(str::to_string),
        }
    }

    #[test]
    fn negative_amounts_are_income_and_positive_amounts_are_spend() {
        let deposit = txn(-500.0, "PAYROLL", None);
        let purchase = txn(42.15, "GROCERY", None);
        assert!(deposit.is_income());
        assert!(!deposit.is_spend());
        assert!(purchase.is_spend());
        assert!(!purchase.is_income());
        assert!(!txn(0.0, "ZERO", None).is_income());
        assert!(!txn(0.0, "ZERO", None).is_spend());
    }

    #[test]
    fn source_label_falls_back_from_description_to_counterparty_to_unknown() {
        assert_eq!(txn(-1.0, "Tax Refund", Some("IRS")).source_label(), "Tax Refund");
        assert_eq!(txn(-1.0, "", Some("IRS")).source_label(), "IRS");
        assert_eq!(txn(-1.0, "", None).source_label(), "Unknown");
    }

    #[test]
    fn cents_rounding_removes_float_noise() {
        assert_eq!(round_cents(105.0 - 99.99), 5.01);
        assert_eq!(round_cents(2000.0 * 0.2), 400.0);
    }
}
