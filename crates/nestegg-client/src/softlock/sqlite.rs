use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, Transaction, TransactionBehavior, params};
use tracing::{info, warn};
use ulid::Ulid;

use crate::softlock::store::{VaultLedger, WithdrawalRequestStore};
use crate::softlock::types::{Vault, WithdrawalRequest, WithdrawalStatus};
use crate::state::{is_unique_violation, map_sqlite_error, open_connection};
use crate::{ClientError, ClientResult};

const VAULT_COLUMNS: &str = "vault_id, name, balance, goal_amount, purpose";
const REQUEST_COLUMNS: &str =
    "request_id, vault_id, amount, reason, status, created_at, impact_message, completed_at";

#[derive(Debug, Clone)]
pub struct NewVault {
    pub name: String,
    pub balance: f64,
    pub goal_amount: Option<f64>,
    pub purpose: Option<String>,
}

type RequestRow = (
    String,
    String,
    f64,
    String,
    String,
    String,
    String,
    Option<String>,
);

/// Vault and withdrawal-request ledger backed by the local SQLite database.
pub struct SqliteLedger {
    connection: Connection,
    db_path: PathBuf,
}

impl SqliteLedger {
    pub fn open(db_path: &Path) -> ClientResult<Self> {
        Ok(Self {
            connection: open_connection(db_path)?,
            db_path: db_path.to_path_buf(),
        })
    }

    pub fn create_vault(&self, new_vault: &NewVault, now: DateTime<Utc>) -> ClientResult<Vault> {
        let vault_id = format!("vlt_{}", Ulid::new());
        let timestamp = format_timestamp(now);
        self.connection
            .execute(
                "INSERT INTO internal_vaults (
                    vault_id,
                    name,
                    balance,
                    goal_amount,
                    purpose,
                    created_at,
                    updated_at
                 ) VALUES (?1, ?2, ROUND(?3, 2), ?4, ?5, ?6, ?6)",
                params![
                    &vault_id,
                    &new_vault.name,
                    new_vault.balance,
                    new_vault.goal_amount,
                    &new_vault.purpose,
                    &timestamp
                ],
            )
            .map_err(|error| self.map_error(&error))?;
        info!(%vault_id, name = %new_vault.name, "vault created");

        self.get_vault(&vault_id)?
            .ok_or_else(|| ClientError::vault_not_found(&vault_id))
    }

    pub fn list_vaults(&self) -> ClientResult<Vec<Vault>> {
        let mut statement = self
            .connection
            .prepare(&format!(
                "SELECT {VAULT_COLUMNS} FROM internal_vaults ORDER BY created_at ASC, vault_id ASC"
            ))
            .map_err(|error| self.map_error(&error))?;
        let rows = statement
            .query_map([], vault_from_row)
            .map_err(|error| self.map_error(&error))?;

        let mut vaults = Vec::new();
        for row in rows {
            vaults.push(row.map_err(|error| self.map_error(&error))?);
        }
        Ok(vaults)
    }

    fn map_error(&self, error: &rusqlite::Error) -> ClientError {
        map_sqlite_error(&self.db_path, error)
    }

    fn request_from_raw(&self, raw: RequestRow) -> ClientResult<WithdrawalRequest> {
        let (request_id, vault_id, amount, reason, status, created_at, impact_message, completed_at) =
            raw;
        let status =
            WithdrawalStatus::parse(&status).ok_or_else(|| ClientError::ledger_corrupt(&self.db_path))?;
        let created_at =
            parse_timestamp(&created_at).ok_or_else(|| ClientError::ledger_corrupt(&self.db_path))?;
        let completed_at = match completed_at {
            Some(value) => Some(
                parse_timestamp(&value).ok_or_else(|| ClientError::ledger_corrupt(&self.db_path))?,
            ),
            None => None,
        };

        Ok(WithdrawalRequest {
            id: request_id,
            vault_id,
            amount,
            reason,
            status,
            created_at,
            impact_message,
            completed_at,
        })
    }
}

impl VaultLedger for SqliteLedger {
    fn get_vault(&self, vault_id: &str) -> ClientResult<Option<Vault>> {
        self.connection
            .query_row(
                &format!("SELECT {VAULT_COLUMNS} FROM internal_vaults WHERE vault_id = ?1"),
                [vault_id],
                vault_from_row,
            )
            .optional()
            .map_err(|error| self.map_error(&error))
    }

    fn deposit(&self, vault_id: &str, amount: f64) -> ClientResult<Vault> {
        let changed = self
            .connection
            .execute(
                "UPDATE internal_vaults
                 SET balance = ROUND(balance + ?1, 2), updated_at = ?2
                 WHERE vault_id = ?3",
                params![amount, format_timestamp(Utc::now()), vault_id],
            )
            .map_err(|error| self.map_error(&error))?;
        if changed == 0 {
            return Err(ClientError::vault_not_found(vault_id));
        }
        info!(%vault_id, amount, "vault deposit recorded");

        self.get_vault(vault_id)?
            .ok_or_else(|| ClientError::vault_not_found(vault_id))
    }

    fn withdraw(&self, vault_id: &str, amount: f64) -> ClientResult<Vault> {
        let changed = self
            .connection
            .execute(
                "UPDATE internal_vaults
                 SET balance = ROUND(balance - ?1, 2), updated_at = ?2
                 WHERE vault_id = ?3 AND balance >= ?1",
                params![amount, format_timestamp(Utc::now()), vault_id],
            )
            .map_err(|error| self.map_error(&error))?;
        if changed == 0 {
            return match self.get_vault(vault_id)? {
                Some(vault) => Err(ClientError::insufficient_vault_balance(
                    vault_id,
                    vault.balance,
                    amount,
                )),
                None => Err(ClientError::vault_not_found(vault_id)),
            };
        }
        info!(%vault_id, amount, "vault withdrawal recorded");

        self.get_vault(vault_id)?
            .ok_or_else(|| ClientError::vault_not_found(vault_id))
    }
}

impl WithdrawalRequestStore for SqliteLedger {
    fn find_pending_request(&self, vault_id: &str) -> ClientResult<Option<WithdrawalRequest>> {
        let raw = self
            .connection
            .query_row(
                &format!(
                    "SELECT {REQUEST_COLUMNS}
                     FROM internal_withdrawal_requests
                     WHERE vault_id = ?1 AND status = 'pending'
                     ORDER BY created_at DESC
                     LIMIT 1"
                ),
                [vault_id],
                request_row,
            )
            .optional()
            .map_err(|error| self.map_error(&error))?;

        raw.map(|row| self.request_from_raw(row)).transpose()
    }

    fn insert_request(&self, record: &WithdrawalRequest) -> ClientResult<()> {
        // Single statement: the existence check and the insert cannot interleave
        // with another writer. The partial unique index backs this up.
        let inserted = self.connection.execute(
            "INSERT INTO internal_withdrawal_requests (
                request_id,
                vault_id,
                amount,
                reason,
                status,
                created_at,
                impact_message,
                completed_at
             )
             SELECT ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8
             WHERE ?5 <> 'pending' OR NOT EXISTS (
                SELECT 1 FROM internal_withdrawal_requests
                WHERE vault_id = ?2 AND status = 'pending'
             )",
            params![
                &record.id,
                &record.vault_id,
                record.amount,
                &record.reason,
                record.status.as_str(),
                format_timestamp(record.created_at),
                &record.impact_message,
                record.completed_at.map(format_timestamp),
            ],
        );

        match inserted {
            Ok(0) => {
                warn!(vault_id = %record.vault_id, "rejected second pending withdrawal request");
                Err(ClientError::withdrawal_request_pending(&record.vault_id))
            }
            Ok(_) => {
                info!(
                    request_id = %record.id,
                    vault_id = %record.vault_id,
                    amount = record.amount,
                    "withdrawal request recorded"
                );
                Ok(())
            }
            Err(error) if is_unique_violation(&error) => {
                warn!(vault_id = %record.vault_id, "pending withdrawal request index conflict");
                Err(ClientError::withdrawal_request_pending(&record.vault_id))
            }
            Err(error) => Err(self.map_error(&error)),
        }
    }

    fn mark_completed(&self, request_id: &str, completed_at: DateTime<Utc>) -> ClientResult<()> {
        let changed = self
            .connection
            .execute(
                "UPDATE internal_withdrawal_requests
                 SET status = 'completed', completed_at = ?2
                 WHERE request_id = ?1 AND status = 'pending'",
                params![request_id, format_timestamp(completed_at)],
            )
            .map_err(|error| self.map_error(&error))?;
        if changed == 0 {
            return Err(ClientError::withdrawal_request_not_pending(request_id));
        }
        info!(%request_id, "withdrawal request completed");
        Ok(())
    }

    fn complete_request(
        &self,
        request: &WithdrawalRequest,
        completed_at: DateTime<Utc>,
    ) -> ClientResult<Vault> {
        // Both updates run on this connection inside one immediate transaction;
        // an early return drops it and rolls back.
        let transaction =
            Transaction::new_unchecked(&self.connection, TransactionBehavior::Immediate)
                .map_err(|error| self.map_error(&error))?;
        self.mark_completed(&request.id, completed_at)?;
        let vault = self.withdraw(&request.vault_id, request.amount)?;
        transaction
            .commit()
            .map_err(|error| self.map_error(&error))?;
        info!(
            request_id = %request.id,
            vault_id = %request.vault_id,
            amount = request.amount,
            "withdrawal executed"
        );
        Ok(vault)
    }

    fn list_requests(&self, vault_id: &str) -> ClientResult<Vec<WithdrawalRequest>> {
        let mut statement = self
            .connection
            .prepare(&format!(
                "SELECT {REQUEST_COLUMNS}
                 FROM internal_withdrawal_requests
                 WHERE vault_id = ?1
                 ORDER BY created_at DESC, request_id DESC"
            ))
            .map_err(|error| self.map_error(&error))?;
        let rows = statement
            .query_map([vault_id], request_row)
            .map_err(|error| self.map_error(&error))?;

        let mut requests = Vec::new();
        for row in rows {
            let raw = row.map_err(|error| self.map_error(&error))?;
            requests.push(self.request_from_raw(raw)?);
        }
        Ok(requests)
    }
}

pub fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|timestamp| timestamp.with_timezone(&Utc))
}

fn vault_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Vault> {
    Ok(Vault {
        id: row.get(0)?,
        name: row.get(1)?,
        balance: row.get(2)?,
        goal_amount: row.get(3)?,
        purpose: row.get(4)?,
    })
}

fn request_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RequestRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
    ))
}
