use std::path::Path;

use serde_json::{Value, json};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ClientError {
    pub code: String,
    pub message: String,
    pub recovery_steps: Vec<String>,
    pub data: Option<Value>,
}

impl ClientError {
    pub fn new(code: &str, message: &str, recovery_steps: Vec<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            recovery_steps,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn invalid_argument(message: &str) -> Self {
        Self::invalid_argument_for_command(message, None)
    }

    pub fn invalid_argument_for_command(message: &str, command: Option<&str>) -> Self {
        let help_hint = match command {
            Some(cmd) => format!("Run `nestegg {cmd} --help` for usage."),
            None => "Run `nestegg --help` for usage.".to_string(),
        };
        let error = Self::new("invalid_argument", message, vec![help_hint]);
        if let Some(cmd) = command {
            return error.with_data(json!({
                "command_hint": cmd,
            }));
        }
        error
    }

    pub fn invalid_argument_with_recovery(message: &str, recovery_steps: Vec<String>) -> Self {
        Self::new("invalid_argument", message, recovery_steps)
    }

    pub fn invalid_transactions_input(message: &str) -> Self {
        Self::invalid_argument_with_recovery(
            message,
            vec![
                "Provide one top-level JSON array of transaction objects.".to_string(),
                "Each object needs `amount` and `date`; negative amounts are money received."
                    .to_string(),
            ],
        )
    }

    pub fn invalid_amount(field_name: &str) -> Self {
        Self::invalid_argument_with_recovery(
            &format!("`{field_name}` must be a positive, finite amount."),
            vec!["Pass the amount as a plain number such as `250` or `19.99`.".to_string()],
        )
        .with_data(json!({
            "field": field_name,
        }))
    }

    pub fn vault_not_found(vault_id: &str) -> Self {
        Self::new(
            "vault_not_found",
            &format!("Vault `{vault_id}` was not found."),
            vec![
                "Run `nestegg vault list` to find a valid vault id.".to_string(),
                "Or create one with `nestegg vault create --name <name>`.".to_string(),
            ],
        )
        .with_data(json!({
            "vault_id": vault_id,
        }))
    }

    pub fn withdrawal_request_pending(vault_id: &str) -> Self {
        Self::new(
            "withdrawal_request_pending",
            &format!("Vault `{vault_id}` already has a pending withdrawal request."),
            vec![
                format!("Run `nestegg withdrawal status {vault_id}` to see when it unlocks."),
                format!(
                    "Run `nestegg withdrawal complete {vault_id}` once the cooling period ends."
                ),
            ],
        )
        .with_data(json!({
            "vault_id": vault_id,
        }))
    }

    pub fn withdrawal_request_not_found(vault_id: &str) -> Self {
        Self::new(
            "withdrawal_request_not_found",
            &format!("Vault `{vault_id}` has no pending withdrawal request."),
            vec![format!(
                "Start one with `nestegg withdrawal request {vault_id} <amount> --reason <text>`."
            )],
        )
        .with_data(json!({
            "vault_id": vault_id,
        }))
    }

    pub fn withdrawal_request_not_pending(request_id: &str) -> Self {
        Self::new(
            "withdrawal_request_not_pending",
            &format!("Withdrawal request `{request_id}` is not pending."),
            vec!["Run `nestegg withdrawal history <vault_id>` to inspect request states.".to_string()],
        )
        .with_data(json!({
            "request_id": request_id,
        }))
    }

    pub fn withdrawal_cooling_period(vault_id: &str, hours_remaining: i64) -> Self {
        Self::new(
            "withdrawal_cooling_period",
            &format!(
                "Withdrawal from vault `{vault_id}` is still cooling off ({hours_remaining}h remaining)."
            ),
            vec![format!(
                "Run `nestegg withdrawal status {vault_id}` to check again later."
            )],
        )
        .with_data(json!({
            "vault_id": vault_id,
            "hours_remaining": hours_remaining,
        }))
    }

    pub fn insufficient_vault_balance(vault_id: &str, balance: f64, amount: f64) -> Self {
        Self::new(
            "insufficient_vault_balance",
            &format!(
                "Vault `{vault_id}` holds {balance:.2}, which is less than the requested {amount:.2}."
            ),
            vec!["Request an amount at or below the current vault balance.".to_string()],
        )
        .with_data(json!({
            "vault_id": vault_id,
            "balance": balance,
            "amount": amount,
        }))
    }

    pub fn internal_serialization(message: &str) -> Self {
        Self::new("internal_serialization_error", message, Vec::new())
    }

    pub fn internal_store(message: &str) -> Self {
        Self::new("internal_store_error", message, Vec::new())
    }

    pub fn ledger_init_permission_denied(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "ledger_init_permission_denied",
            &format!("Cannot initialize ledger at `{location}`: {detail}"),
            vec![format!(
                "Grant write access to `{location}` or set `NESTEGG_HOME` to a writable directory."
            )],
        )
    }

    pub fn ledger_locked(path: &Path) -> Self {
        let location = path.display().to_string();
        Self::new(
            "ledger_locked",
            &format!("Ledger database is locked at `{location}`."),
            vec![format!(
                "Close other processes using `{location}` so the lock is released."
            )],
        )
    }

    pub fn ledger_corrupt(path: &Path) -> Self {
        let location = path.display().to_string();
        Self::new(
            "ledger_corrupt",
            &format!("Ledger database appears corrupt at `{location}`."),
            vec![format!(
                "Replace `{location}` with a valid SQLite ledger file or restore from backup."
            )],
        )
    }

    pub fn migration_failed(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "migration_failed",
            &format!("Ledger migration failed at `{location}`: {detail}"),
            vec!["Resolve conflicting schema objects referenced in the error details.".to_string()],
        )
    }

    pub fn ledger_init_failed(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "ledger_init_failed",
            &format!("Ledger initialization failed at `{location}`: {detail}"),
            Vec::new(),
        )
    }

    pub fn is_internal(&self) -> bool {
        self.code.starts_with("internal_")
            || matches!(
                self.code.as_str(),
                "ledger_init_permission_denied"
                    | "ledger_locked"
                    | "ledger_corrupt"
                    | "migration_failed"
                    | "ledger_init_failed"
            )
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
