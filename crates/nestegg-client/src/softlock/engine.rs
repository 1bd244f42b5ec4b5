use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use ulid::Ulid;

use crate::softlock::impact::goal_impact;
use crate::softlock::policy::{SOFT_LOCK_POLICY_V1, SoftLockPolicy};
use crate::softlock::store::{VaultLedger, WithdrawalRequestStore};
use crate::softlock::types::{
    CompletedWithdrawal, CreatedWithdrawal, PendingWithdrawalView, Vault, WithdrawalDecision,
    WithdrawalRequest, WithdrawalStatus,
};
use crate::{ClientError, ClientResult};

pub fn check_withdrawal<L>(
    ledger: &L,
    vault_id: &str,
    amount: f64,
    now: DateTime<Utc>,
) -> ClientResult<WithdrawalDecision>
where
    L: VaultLedger + WithdrawalRequestStore,
{
    check_withdrawal_with_policy(ledger, vault_id, amount, now, SOFT_LOCK_POLICY_V1)
}

/// Gates one withdrawal attempt. Never writes.
///
/// `amount` is what the caller intends to take out; the decision depends only
/// on the vault's pending request, so it is recorded in the log line alone.
pub fn check_withdrawal_with_policy<L>(
    ledger: &L,
    vault_id: &str,
    amount: f64,
    now: DateTime<Utc>,
    policy: SoftLockPolicy,
) -> ClientResult<WithdrawalDecision>
where
    L: VaultLedger + WithdrawalRequestStore,
{
    let vault = require_vault(ledger, vault_id)?;
    let Some(request) = ledger.find_pending_request(vault_id)? else {
        debug!(%vault_id, amount, "no pending withdrawal request");
        return Ok(WithdrawalDecision::NewRequestRequired { vault });
    };

    if policy.is_eligible(request.created_at, now) {
        debug!(%vault_id, request_id = %request.id, "withdrawal cooling period elapsed");
        return Ok(WithdrawalDecision::Allowed { request });
    }

    let hours_remaining = policy.hours_remaining(request.created_at, now);
    let available_at = policy.available_at(request.created_at);
    debug!(%vault_id, amount, hours_remaining, "withdrawal still cooling off");
    Ok(WithdrawalDecision::CoolingPeriod {
        request,
        hours_remaining,
        available_at,
    })
}

pub fn create_withdrawal_request<L>(
    ledger: &L,
    vault_id: &str,
    amount: f64,
    reason: &str,
    now: DateTime<Utc>,
) -> ClientResult<CreatedWithdrawal>
where
    L: VaultLedger + WithdrawalRequestStore,
{
    create_withdrawal_request_with_policy(ledger, vault_id, amount, reason, now, SOFT_LOCK_POLICY_V1)
}

/// Records a pending request stamped at `now`.
///
/// The balance is not checked here; a request larger than the vault only
/// fails when it is completed.
pub fn create_withdrawal_request_with_policy<L>(
    ledger: &L,
    vault_id: &str,
    amount: f64,
    reason: &str,
    now: DateTime<Utc>,
    policy: SoftLockPolicy,
) -> ClientResult<CreatedWithdrawal>
where
    L: VaultLedger + WithdrawalRequestStore,
{
    if !amount.is_finite() || amount <= 0.0 {
        return Err(ClientError::invalid_amount("amount"));
    }
    let vault = require_vault(ledger, vault_id)?;
    let impact = goal_impact(&vault, amount, policy);

    let request = WithdrawalRequest {
        id: format!("wdr_{}", Ulid::new()),
        vault_id: vault.id.clone(),
        amount,
        reason: reason.trim().to_string(),
        status: WithdrawalStatus::Pending,
        created_at: now,
        impact_message: impact.message.clone(),
        completed_at: None,
    };
    if let Err(error) = ledger.insert_request(&request) {
        warn!(%vault_id, code = %error.code, "withdrawal request rejected");
        return Err(error);
    }

    Ok(CreatedWithdrawal {
        available_at: policy.available_at(now),
        request,
        impact,
    })
}

pub fn get_withdrawal_status<L>(
    ledger: &L,
    vault_id: &str,
    now: DateTime<Utc>,
) -> ClientResult<Option<PendingWithdrawalView>>
where
    L: VaultLedger + WithdrawalRequestStore,
{
    get_withdrawal_status_with_policy(ledger, vault_id, now, SOFT_LOCK_POLICY_V1)
}

pub fn get_withdrawal_status_with_policy<L>(
    ledger: &L,
    vault_id: &str,
    now: DateTime<Utc>,
    policy: SoftLockPolicy,
) -> ClientResult<Option<PendingWithdrawalView>>
where
    L: VaultLedger + WithdrawalRequestStore,
{
    require_vault(ledger, vault_id)?;
    Ok(ledger
        .find_pending_request(vault_id)?
        .map(|request| PendingWithdrawalView {
            available_at: policy.available_at(request.created_at),
            hours_remaining: policy.hours_remaining(request.created_at, now),
            can_withdraw: policy.is_eligible(request.created_at, now),
            request,
        }))
}

pub fn complete_withdrawal<L>(
    ledger: &L,
    vault_id: &str,
    now: DateTime<Utc>,
) -> ClientResult<CompletedWithdrawal>
where
    L: VaultLedger + WithdrawalRequestStore,
{
    complete_withdrawal_with_policy(ledger, vault_id, now, SOFT_LOCK_POLICY_V1)
}

/// Executes an eligible request: marks it completed and debits the vault in one
/// atomic ledger step.
///
/// A second caller racing on the same request fails with
/// `withdrawal_request_not_pending` instead of debiting twice.
pub fn complete_withdrawal_with_policy<L>(
    ledger: &L,
    vault_id: &str,
    now: DateTime<Utc>,
    policy: SoftLockPolicy,
) -> ClientResult<CompletedWithdrawal>
where
    L: VaultLedger + WithdrawalRequestStore,
{
    let request = match check_withdrawal_with_policy(ledger, vault_id, 0.0, now, policy)? {
        WithdrawalDecision::Allowed { request } => request,
        WithdrawalDecision::NewRequestRequired { .. } => {
            return Err(ClientError::withdrawal_request_not_found(vault_id));
        }
        WithdrawalDecision::CoolingPeriod {
            hours_remaining, ..
        } => {
            return Err(ClientError::withdrawal_cooling_period(
                vault_id,
                hours_remaining,
            ));
        }
    };

    let vault = require_vault(ledger, vault_id)?;
    if vault.balance < request.amount {
        return Err(ClientError::insufficient_vault_balance(
            vault_id,
            vault.balance,
            request.amount,
        ));
    }

    let vault = ledger.complete_request(&request, now)?;

    Ok(CompletedWithdrawal {
        request: WithdrawalRequest {
            status: WithdrawalStatus::Completed,
            completed_at: Some(now),
            ..request
        },
        vault,
    })
}

fn require_vault<L>(ledger: &L, vault_id: &str) -> ClientResult<Vault>
where
    L: VaultLedger,
{
    ledger
        .get_vault(vault_id)?
        .ok_or_else(|| ClientError::vault_not_found(vault_id))
}

#[cfg(test)]
mod tests {
    use std::thread;

    use chrono::{DateTime, Duration, Utc};

    use super::{
        check_withdrawal, complete_withdrawal, create_withdrawal_request, get_withdrawal_status,
    };
    use crate::softlock::memory::MemoryLedger;
    use crate::softlock::store::WithdrawalRequestStore;
    use crate::softlock::types::{DenialReason, Vault, WithdrawalDecision, WithdrawalStatus};

    fn at(value: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(value)
            .map(|timestamp| timestamp.with_timezone(&Utc))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    fn ledger() -> MemoryLedger {
        let ledger = MemoryLedger::new();
        let inserted = ledger.insert_vault(Vault {
            id: "vlt_trip".to_string(),
            name: "Japan Trip".to_string(),
            balance: 2500.0,
            goal_amount: Some(5000.0),
            purpose: Some("Two weeks in Kyoto".to_string()),
        });
        assert!(inserted.is_ok());
        ledger
    }

    #[test]
    fn cooling_off_flow_from_request_to_allowed() {
        let ledger = ledger();
        let created_at = at("2026-03-01T09:00:00Z");

        let first = check_withdrawal(&ledger, "vlt_trip", 600.0, created_at);
        assert!(first.is_ok());
        if let Ok(decision) = &first {
            assert_eq!(
                decision.denial_reason(),
                Some(DenialReason::NewRequestRequired)
            );
            if let WithdrawalDecision::NewRequestRequired { vault } = decision {
                assert_eq!(vault.name, "Japan Trip");
                assert_eq!(vault.purpose.as_deref(), Some("Two weeks in Kyoto"));
            }
        }
        // Checking never creates a request.
        let pending = ledger.find_pending_request("vlt_trip");
        assert!(matches!(pending, Ok(None)));

        let created = create_withdrawal_request(&ledger, "vlt_trip", 600.0, "Flights", created_at);
        assert!(created.is_ok());
        if let Ok(created) = &created {
            assert_eq!(created.available_at, created_at + Duration::hours(24));
            assert_eq!(created.request.status, WithdrawalStatus::Pending);
            assert!(created.request.id.starts_with("wdr_"));
            assert_eq!(created.impact.delay_weeks, Some(3));
        }

        let almost = check_withdrawal(
            &ledger,
            "vlt_trip",
            600.0,
            created_at + Duration::hours(23) + Duration::minutes(59),
        );
        assert!(almost.is_ok());
        if let Ok(WithdrawalDecision::CoolingPeriod {
            hours_remaining, ..
        }) = almost
        {
            assert_eq!(hours_remaining, 1);
        } else {
            panic!("expected cooling period decision");
        }

        let after = check_withdrawal(
            &ledger,
            "vlt_trip",
            600.0,
            created_at + Duration::hours(24) + Duration::seconds(1),
        );
        assert!(after.is_ok());
        if let Ok(decision) = after {
            assert!(decision.is_allowed());
            if let WithdrawalDecision::Allowed { request } = decision {
                if let Ok(created) = &created {
                    assert_eq!(request.id, created.request.id);
                }
            }
        }
    }

    #[test]
    fn repeated_checks_never_increase_hours_remaining() {
        let ledger = ledger();
        let created_at = at("2026-03-01T09:00:00Z");
        assert!(create_withdrawal_request(&ledger, "vlt_trip", 100.0, "", created_at).is_ok());

        let mut previous = i64::MAX;
        for minutes in [0, 1, 59, 61, 600, 1439] {
            let decision =
                check_withdrawal(&ledger, "vlt_trip", 100.0, created_at + Duration::minutes(minutes));
            assert!(decision.is_ok());
            if let Ok(WithdrawalDecision::CoolingPeriod {
                hours_remaining, ..
            }) = decision
            {
                assert!(hours_remaining <= previous);
                previous = hours_remaining;
            } else {
                panic!("expected cooling period decision");
            }
        }
        assert_eq!(previous, 1);
    }

    #[test]
    fn missing_vault_is_reported_not_fatal() {
        let ledger = ledger();
        let now = at("2026-03-01T09:00:00Z");
        for result in [
            check_withdrawal(&ledger, "vlt_nope", 1.0, now).map(|_| ()),
            create_withdrawal_request(&ledger, "vlt_nope", 1.0, "x", now).map(|_| ()),
            get_withdrawal_status(&ledger, "vlt_nope", now).map(|_| ()),
            complete_withdrawal(&ledger, "vlt_nope", now).map(|_| ()),
        ] {
            assert!(result.is_err());
            if let Err(error) = result {
                assert_eq!(error.code, "vault_not_found");
            }
        }
    }

    #[test]
    fn invalid_amounts_are_rejected_before_any_write() {
        let ledger = ledger();
        let now = at("2026-03-01T09:00:00Z");
        for amount in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let result = create_withdrawal_request(&ledger, "vlt_trip", amount, "x", now);
            assert!(result.is_err());
        }
        assert!(matches!(ledger.find_pending_request("vlt_trip"), Ok(None)));
    }

    #[test]
    fn status_reports_pending_request_and_eligibility() {
        let ledger = ledger();
        let created_at = at("2026-03-01T09:00:00Z");

        let empty = get_withdrawal_status(&ledger, "vlt_trip", created_at);
        assert!(matches!(empty, Ok(None)));

        assert!(create_withdrawal_request(&ledger, "vlt_trip", 250.0, "Rent", created_at).is_ok());

        let cooling = get_withdrawal_status(&ledger, "vlt_trip", created_at + Duration::hours(5));
        assert!(cooling.is_ok());
        if let Ok(Some(view)) = cooling {
            assert_eq!(view.request.amount, 250.0);
            assert_eq!(view.request.reason, "Rent");
            assert_eq!(view.hours_remaining, 19);
            assert!(!view.can_withdraw);
            assert!(!view.request.impact_message.is_empty());
        }

        let later = get_withdrawal_status(&ledger, "vlt_trip", created_at + Duration::days(4));
        if let Ok(Some(view)) = later {
            assert_eq!(view.hours_remaining, 0);
            assert!(view.can_withdraw);
        } else {
            panic!("expected pending request view");
        }
    }

    #[test]
    fn complete_requires_eligibility_and_debits_the_vault() {
        let ledger = ledger();
        let created_at = at("2026-03-01T09:00:00Z");

        let none = complete_withdrawal(&ledger, "vlt_trip", created_at);
        assert!(none.is_err());
        if let Err(error) = none {
            assert_eq!(error.code, "withdrawal_request_not_found");
        }

        assert!(create_withdrawal_request(&ledger, "vlt_trip", 600.0, "Flights", created_at).is_ok());

        let early = complete_withdrawal(&ledger, "vlt_trip", created_at + Duration::hours(2));
        assert!(early.is_err());
        if let Err(error) = early {
            assert_eq!(error.code, "withdrawal_cooling_period");
        }

        let done = complete_withdrawal(&ledger, "vlt_trip", created_at + Duration::hours(25));
        assert!(done.is_ok());
        if let Ok(done) = done {
            assert_eq!(done.vault.balance, 1900.0);
            assert_eq!(done.request.status, WithdrawalStatus::Completed);
        }

        // The completed request no longer gates the vault.
        let next = check_withdrawal(&ledger, "vlt_trip", 10.0, created_at + Duration::hours(26));
        assert!(matches!(
            next,
            Ok(WithdrawalDecision::NewRequestRequired { .. })
        ));
    }

    #[test]
    fn completing_more_than_the_balance_leaves_request_pending() {
        let ledger = ledger();
        let created_at = at("2026-03-01T09:00:00Z");
        assert!(create_withdrawal_request(&ledger, "vlt_trip", 9000.0, "Car", created_at).is_ok());

        let result = complete_withdrawal(&ledger, "vlt_trip", created_at + Duration::days(2));
        assert!(result.is_err());
        if let Err(error) = result {
            assert_eq!(error.code, "insufficient_vault_balance");
        }
        let pending = ledger.find_pending_request("vlt_trip");
        assert!(matches!(pending, Ok(Some(_))));
    }

    #[test]
    fn concurrent_creators_produce_exactly_one_pending_request() {
        let ledger = ledger();
        let now = at("2026-03-01T09:00:00Z");

        let outcomes = thread::scope(|scope| {
            let handles = (0..8)
                .map(|index| {
                    let ledger = &ledger;
                    scope.spawn(move || {
                        create_withdrawal_request(ledger, "vlt_trip", 10.0 + index as f64, "race", now)
                    })
                })
                .collect::<Vec<_>>();
            handles
                .into_iter()
                .map(|handle| handle.join())
                .collect::<Vec<_>>()
        });

        let mut successes = 0;
        for outcome in outcomes {
            assert!(outcome.is_ok());
            match outcome {
                Ok(Ok(_)) => successes += 1,
                Ok(Err(error)) => assert_eq!(error.code, "withdrawal_request_pending"),
                Err(_) => panic!("creator thread panicked"),
            }
        }
        assert_eq!(successes, 1);

        let history = ledger.list_requests("vlt_trip");
        if let Ok(history) = history {
            assert_eq!(history.len(), 1);
        } else {
            panic!("expected request history");
        }
    }
}
