use chrono::{DateTime, Utc};

use crate::ClientResult;
use crate::softlock::types::{Vault, WithdrawalRequest};

/// Read and transfer access to vault balances.
///
/// Balances are owned by the ledger; the soft-lock engine reads them for
/// impact messaging and instructs transfers once a request is executed.
pub trait VaultLedger {
    fn get_vault(&self, vault_id: &str) -> ClientResult<Option<Vault>>;

    fn deposit(&self, vault_id: &str, amount: f64) -> ClientResult<Vault>;

    fn withdraw(&self, vault_id: &str, amount: f64) -> ClientResult<Vault>;
}

/// Append-only log of withdrawal requests keyed by vault.
///
/// `insert_request` must reject a pending record when the vault already has
/// one, atomically with respect to concurrent callers.
pub trait WithdrawalRequestStore {
    fn find_pending_request(&self, vault_id: &str) -> ClientResult<Option<WithdrawalRequest>>;

    fn insert_request(&self, record: &WithdrawalRequest) -> ClientResult<()>;

    fn mark_completed(&self, request_id: &str, completed_at: DateTime<Utc>) -> ClientResult<()>;

    /// Marks a pending request completed and debits its vault as one unit.
    /// Either both writes land or neither does.
    fn complete_request(
        &self,
        request: &WithdrawalRequest,
        completed_at: DateTime<Utc>,
    ) -> ClientResult<Vault>;

    fn list_requests(&self, vault_id: &str) -> ClientResult<Vec<WithdrawalRequest>>;
}
