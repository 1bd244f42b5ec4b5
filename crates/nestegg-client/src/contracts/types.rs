use serde::Serialize;

use crate::savings::types::{Opportunity, OpportunitySummary, SweepResult, WindfallResult};
use crate::softlock::types::{GoalImpact, Vault, WithdrawalRequest};

#[derive(Debug, Clone, Serialize)]
pub struct TransactionInputSummary {
    pub source_kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_ref: Option<String>,
    pub as_of: String,
    pub records_read: i64,
    pub records_used: i64,
    pub records_skipped: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PolicyVersions {
    pub windfall: String,
    pub sweep: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OpportunitiesData {
    pub input: TransactionInputSummary,
    pub policy: PolicyVersions,
    pub opportunities: Vec<Opportunity>,
    pub summary: OpportunitySummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct WindfallData {
    pub input: TransactionInputSummary,
    pub policy_version: String,
    pub result: WindfallResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct SweepData {
    pub input: TransactionInputSummary,
    pub policy_version: String,
    pub result: SweepResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct VaultData {
    pub vault: Vault,
}

#[derive(Debug, Clone, Serialize)]
pub struct VaultListData {
    pub vault_count: i64,
    pub total_balance: f64,
    pub vaults: Vec<Vault>,
}

/// Flat rendering of a withdrawal decision.
///
/// `reason` is absent when `allowed` is true; `request_id` is present whenever
/// a pending request exists.
#[derive(Debug, Clone, Serialize)]
pub struct WithdrawalCheckData {
    pub vault_id: String,
    pub amount: f64,
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours_remaining: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vault: Option<Vault>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WithdrawalRequestData {
    pub request: WithdrawalRequest,
    pub impact: GoalImpact,
    pub available_at: String,
    pub policy_version: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct WithdrawalStatusData {
    pub vault_id: String,
    pub has_pending_request: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<WithdrawalRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours_remaining: Option<i64>,
    pub can_withdraw: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct WithdrawalCompleteData {
    pub request: WithdrawalRequest,
    pub vault: Vault,
}

#[derive(Debug, Clone, Serialize)]
pub struct WithdrawalHistoryData {
    pub vault_id: String,
    pub request_count: i64,
    pub requests: Vec<WithdrawalRequest>,
}
