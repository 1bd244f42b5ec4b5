use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Vault {
    pub id: String,
    pub name: String,
    pub balance: f64,
    pub goal_amount: Option<f64>,
    pub purpose: Option<String>,
}

impl Vault {
    /// A goal of zero or less is treated as no goal.
    pub fn effective_goal(&self) -> Option<f64> {
        self.goal_amount.filter(|goal| *goal > 0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WithdrawalStatus {
    Pending,
    Completed,
}

impl WithdrawalStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WithdrawalRequest {
    pub id: String,
    pub vault_id: String,
    pub amount: f64,
    pub reason: String,
    pub status: WithdrawalStatus,
    pub created_at: DateTime<Utc>,
    pub impact_message: String,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    NewRequestRequired,
    CoolingPeriod,
}

impl DenialReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NewRequestRequired => "new_request_required",
            Self::CoolingPeriod => "cooling_period",
        }
    }
}

/// Outcome of gating one withdrawal attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum WithdrawalDecision {
    /// The pending request has cooled off and may be executed.
    Allowed { request: WithdrawalRequest },
    /// No pending request exists; the caller should confirm and create one.
    NewRequestRequired { vault: Vault },
    CoolingPeriod {
        request: WithdrawalRequest,
        hours_remaining: i64,
        available_at: DateTime<Utc>,
    },
}

impl WithdrawalDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }

    pub fn denial_reason(&self) -> Option<DenialReason> {
        match self {
            Self::Allowed { .. } => None,
            Self::NewRequestRequired { .. } => Some(DenialReason::NewRequestRequired),
            Self::CoolingPeriod { .. } => Some(DenialReason::CoolingPeriod),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalImpact {
    pub message: String,
    pub current_progress_pct: Option<f64>,
    pub new_progress_pct: Option<f64>,
    pub delay_weeks: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreatedWithdrawal {
    pub request: WithdrawalRequest,
    pub impact: GoalImpact,
    pub available_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PendingWithdrawalView {
    pub request: WithdrawalRequest,
    pub available_at: DateTime<Utc>,
    pub hours_remaining: i64,
    pub can_withdraw: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletedWithdrawal {
    pub request: WithdrawalRequest,
    pub vault: Vault,
}
