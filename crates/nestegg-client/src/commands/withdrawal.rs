use std::path::Path;

use chrono::{DateTime, Utc};

use crate::commands::common::{open_ledger, require_positive_amount};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{
    WithdrawalCheckData, WithdrawalCompleteData, WithdrawalHistoryData, WithdrawalRequestData,
    WithdrawalStatusData,
};
use crate::softlock::engine::{
    check_withdrawal, complete_withdrawal, create_withdrawal_request, get_withdrawal_status,
};
use crate::softlock::policy::SOFT_LOCK_POLICY_VERSION;
use crate::softlock::sqlite::format_timestamp;
use crate::softlock::store::{VaultLedger, WithdrawalRequestStore};
use crate::softlock::types::WithdrawalDecision;
use crate::{ClientError, ClientResult};

/// Shared knobs for withdrawal commands. `now_override` pins the clock so
/// cooling-period arithmetic can be exercised without waiting.
#[derive(Debug, Default, Clone, Copy)]
pub struct WithdrawalRunOptions<'a> {
    pub home_override: Option<&'a Path>,
    pub now_override: Option<DateTime<Utc>>,
}

impl WithdrawalRunOptions<'_> {
    fn now(&self) -> DateTime<Utc> {
        self.now_override.unwrap_or_else(Utc::now)
    }
}

pub fn check(vault_id: &str, amount: f64) -> ClientResult<SuccessEnvelope> {
    check_with_options(vault_id, amount, WithdrawalRunOptions::default())
}

#[doc(hidden)]
pub fn check_with_options(
    vault_id: &str,
    amount: f64,
    options: WithdrawalRunOptions<'_>,
) -> ClientResult<SuccessEnvelope> {
    let amount = require_positive_amount(amount, "amount")?;
    let ledger = open_ledger(options.home_override)?;
    let decision = check_withdrawal(&ledger, vault_id, amount, options.now())?;

    let reason = decision
        .denial_reason()
        .map(|reason| reason.as_str().to_string());
    let mut data = WithdrawalCheckData {
        vault_id: vault_id.to_string(),
        amount,
        allowed: decision.is_allowed(),
        reason,
        request_id: None,
        hours_remaining: None,
        available_at: None,
        vault: None,
    };
    match decision {
        WithdrawalDecision::Allowed { request } => {
            data.request_id = Some(request.id);
            data.hours_remaining = Some(0);
        }
        WithdrawalDecision::NewRequestRequired { vault } => {
            data.vault = Some(vault);
        }
        WithdrawalDecision::CoolingPeriod {
            request,
            hours_remaining,
            available_at,
        } => {
            data.request_id = Some(request.id);
            data.hours_remaining = Some(hours_remaining);
            data.available_at = Some(format_timestamp(available_at));
        }
    }

    success("withdrawal check", data)
}

pub fn request(vault_id: &str, amount: f64, reason: &str) -> ClientResult<SuccessEnvelope> {
    request_with_options(vault_id, amount, reason, WithdrawalRunOptions::default())
}

#[doc(hidden)]
pub fn request_with_options(
    vault_id: &str,
    amount: f64,
    reason: &str,
    options: WithdrawalRunOptions<'_>,
) -> ClientResult<SuccessEnvelope> {
    let amount = require_positive_amount(amount, "amount")?;
    if reason.trim().is_empty() {
        return Err(ClientError::invalid_argument_for_command(
            "`reason` must not be empty.",
            Some("withdrawal request"),
        ));
    }
    let ledger = open_ledger(options.home_override)?;
    let created = create_withdrawal_request(&ledger, vault_id, amount, reason, options.now())?;

    success(
        "withdrawal request",
        WithdrawalRequestData {
            available_at: format_timestamp(created.available_at),
            request: created.request,
            impact: created.impact,
            policy_version: SOFT_LOCK_POLICY_VERSION.to_string(),
        },
    )
}

pub fn status(vault_id: &str) -> ClientResult<SuccessEnvelope> {
    status_with_options(vault_id, WithdrawalRunOptions::default())
}

#[doc(hidden)]
pub fn status_with_options(
    vault_id: &str,
    options: WithdrawalRunOptions<'_>,
) -> ClientResult<SuccessEnvelope> {
    let ledger = open_ledger(options.home_override)?;
    let view = get_withdrawal_status(&ledger, vault_id, options.now())?;

    let data = match view {
        Some(view) => WithdrawalStatusData {
            vault_id: vault_id.to_string(),
            has_pending_request: true,
            available_at: Some(format_timestamp(view.available_at)),
            hours_remaining: Some(view.hours_remaining),
            can_withdraw: view.can_withdraw,
            request: Some(view.request),
        },
        None => WithdrawalStatusData {
            vault_id: vault_id.to_string(),
            has_pending_request: false,
            request: None,
            available_at: None,
            hours_remaining: None,
            can_withdraw: false,
        },
    };
    success("withdrawal status", data)
}

pub fn complete(vault_id: &str) -> ClientResult<SuccessEnvelope> {
    complete_with_options(vault_id, WithdrawalRunOptions::default())
}

#[doc(hidden)]
pub fn complete_with_options(
    vault_id: &str,
    options: WithdrawalRunOptions<'_>,
) -> ClientResult<SuccessEnvelope> {
    let ledger = open_ledger(options.home_override)?;
    let completed = complete_withdrawal(&ledger, vault_id, options.now())?;
    success(
        "withdrawal complete",
        WithdrawalCompleteData {
            request: completed.request,
            vault: completed.vault,
        },
    )
}

pub fn history(vault_id: &str) -> ClientResult<SuccessEnvelope> {
    history_with_home_override(vault_id, None)
}

#[doc(hidden)]
pub fn history_with_home_override(
    vault_id: &str,
    home_override: Option<&Path>,
) -> ClientResult<SuccessEnvelope> {
    let ledger = open_ledger(home_override)?;
    if ledger.get_vault(vault_id)?.is_none() {
        return Err(ClientError::vault_not_found(vault_id));
    }
    let requests = ledger.list_requests(vault_id)?;
    success(
        "withdrawal history",
        WithdrawalHistoryData {
            vault_id: vault_id.to_string(),
            request_count: requests.len() as i64,
            requests,
        },
    )
}
