pub mod engine;
pub mod impact;
pub mod memory;
pub mod policy;
pub mod sqlite;
pub mod store;
pub mod types;

pub use engine::{
    check_withdrawal, check_withdrawal_with_policy, complete_withdrawal,
    complete_withdrawal_with_policy, create_withdrawal_request,
    create_withdrawal_request_with_policy, get_withdrawal_status,
    get_withdrawal_status_with_policy,
};
pub use memory::MemoryLedger;
pub use policy::{SOFT_LOCK_POLICY_V1, SoftLockPolicy};
pub use sqlite::{NewVault, SqliteLedger};
pub use store::{VaultLedger, WithdrawalRequestStore};
pub use types::{
    CompletedWithdrawal, CreatedWithdrawal, DenialReason, GoalImpact, PendingWithdrawalView, Vault,
    WithdrawalDecision, WithdrawalRequest, WithdrawalStatus,
};
