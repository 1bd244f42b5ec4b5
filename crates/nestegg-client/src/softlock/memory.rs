use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use crate::savings::types::round_cents;
use crate::softlock::store::{VaultLedger, WithdrawalRequestStore};
use crate::softlock::types::{Vault, WithdrawalRequest, WithdrawalStatus};
use crate::{ClientError, ClientResult};

#[derive(Debug, Default)]
struct LedgerState {
    vaults: BTreeMap<String, Vault>,
    requests: Vec<WithdrawalRequest>,
}

/// Process-local ledger. One mutex guards vaults and requests, so the
/// pending check and the insert happen under the same lock.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    state: Mutex<LedgerState>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_vault(&self, vault: Vault) -> ClientResult<()> {
        self.lock()?.vaults.insert(vault.id.clone(), vault);
        Ok(())
    }

    fn lock(&self) -> ClientResult<MutexGuard<'_, LedgerState>> {
        self.state
            .lock()
            .map_err(|_| ClientError::internal_store("memory ledger lock was poisoned"))
    }
}

impl VaultLedger for MemoryLedger {
    fn get_vault(&self, vault_id: &str) -> ClientResult<Option<Vault>> {
        Ok(self.lock()?.vaults.get(vault_id).cloned())
    }

    fn deposit(&self, vault_id: &str, amount: f64) -> ClientResult<Vault> {
        let mut state = self.lock()?;
        let vault = state
            .vaults
            .get_mut(vault_id)
            .ok_or_else(|| ClientError::vault_not_found(vault_id))?;
        vault.balance = round_cents(vault.balance + amount);
        Ok(vault.clone())
    }

    fn withdraw(&self, vault_id: &str, amount: f64) -> ClientResult<Vault> {
        let mut state = self.lock()?;
        let vault = state
            .vaults
            .get_mut(vault_id)
            .ok_or_else(|| ClientError::vault_not_found(vault_id))?;
        if vault.balance < amount {
            return Err(ClientError::insufficient_vault_balance(
                vault_id,
                vault.balance,
                amount,
            ));
        }
        vault.balance = round_cents(vault.balance - amount);
        Ok(vault.clone())
    }
}

impl WithdrawalRequestStore for MemoryLedger {
    fn find_pending_request(&self, vault_id: &str) -> ClientResult<Option<WithdrawalRequest>> {
        Ok(self
            .lock()?
            .requests
            .iter()
            .rev()
            .find(|request| {
                request.vault_id == vault_id && request.status == WithdrawalStatus::Pending
            })
            .cloned())
    }

    fn insert_request(&self, record: &WithdrawalRequest) -> ClientResult<()> {
        let mut state = self.lock()?;
        let has_pending = state.requests.iter().any(|request| {
            request.vault_id == record.vault_id && request.status == WithdrawalStatus::Pending
        });
        if record.status == WithdrawalStatus::Pending && has_pending {
            return Err(ClientError::withdrawal_request_pending(&record.vault_id));
        }
        state.requests.push(record.clone());
        Ok(())
    }

    fn mark_completed(&self, request_id: &str, completed_at: DateTime<Utc>) -> ClientResult<()> {
        let mut state = self.lock()?;
        let request = state
            .requests
            .iter_mut()
            .find(|request| request.id == request_id && request.status == WithdrawalStatus::Pending)
            .ok_or_else(|| ClientError::withdrawal_request_not_pending(request_id))?;
        request.status = WithdrawalStatus::Completed;
        request.completed_at = Some(completed_at);
        Ok(())
    }

    fn complete_request(
        &self,
        request: &WithdrawalRequest,
        completed_at: DateTime<Utc>,
    ) -> ClientResult<Vault> {
        let mut state = self.lock()?;
        // Validate both sides before touching either.
        let position = state
            .requests
            .iter()
            .position(|row| row.id == request.id && row.status == WithdrawalStatus::Pending)
            .ok_or_else(|| ClientError::withdrawal_request_not_pending(&request.id))?;
        let balance = state
            .vaults
            .get(&request.vault_id)
            .map(|vault| vault.balance)
            .ok_or_else(|| ClientError::vault_not_found(&request.vault_id))?;
        if balance < request.amount {
            return Err(ClientError::insufficient_vault_balance(
                &request.vault_id,
                balance,
                request.amount,
            ));
        }

        let LedgerState { vaults, requests } = &mut *state;
        let row = &mut requests[position];
        row.status = WithdrawalStatus::Completed;
        row.completed_at = Some(completed_at);
        let vault = vaults
            .get_mut(&request.vault_id)
            .ok_or_else(|| ClientError::vault_not_found(&request.vault_id))?;
        vault.balance = round_cents(vault.balance - request.amount);
        Ok(vault.clone())
    }

    fn list_requests(&self, vault_id: &str) -> ClientResult<Vec<WithdrawalRequest>> {
        Ok(self
            .lock()?
            .requests
            .iter()
            .rev()
            .filter(|request| request.vault_id == vault_id)
            .cloned()
            .collect())
    }
}
