use std::path::Path;

use chrono::Utc;

use crate::commands::common::{open_ledger, require_non_negative_amount, require_positive_amount};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{VaultData, VaultListData};
use crate::savings::types::round_cents;
use crate::softlock::sqlite::NewVault;
use crate::softlock::store::VaultLedger;
use crate::{ClientError, ClientResult};

#[derive(Debug, Default)]
pub struct VaultCreateOptions<'a> {
    pub name: String,
    pub balance: Option<f64>,
    pub goal_amount: Option<f64>,
    pub purpose: Option<String>,
    pub home_override: Option<&'a Path>,
}

pub fn create(
    name: &str,
    balance: Option<f64>,
    goal_amount: Option<f64>,
    purpose: Option<&str>,
) -> ClientResult<SuccessEnvelope> {
    create_with_options(VaultCreateOptions {
        name: name.to_string(),
        balance,
        goal_amount,
        purpose: purpose.map(std::string::ToString::to_string),
        home_override: None,
    })
}

#[doc(hidden)]
pub fn create_with_options(options: VaultCreateOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let name = options.name.trim();
    if name.is_empty() {
        return Err(ClientError::invalid_argument_for_command(
            "`name` must not be empty.",
            Some("vault create"),
        ));
    }
    let balance = require_non_negative_amount(options.balance.unwrap_or(0.0), "balance")?;
    let goal_amount = options
        .goal_amount
        .map(|goal| require_non_negative_amount(goal, "goal"))
        .transpose()?;
    let purpose = options
        .purpose
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());

    let ledger = open_ledger(options.home_override)?;
    let vault = ledger.create_vault(
        &NewVault {
            name: name.to_string(),
            balance,
            goal_amount,
            purpose,
        },
        Utc::now(),
    )?;
    success("vault create", VaultData { vault })
}

pub fn list() -> ClientResult<SuccessEnvelope> {
    list_with_home_override(None)
}

#[doc(hidden)]
pub fn list_with_home_override(home_override: Option<&Path>) -> ClientResult<SuccessEnvelope> {
    let ledger = open_ledger(home_override)?;
    let vaults = ledger.list_vaults()?;
    let total_balance = round_cents(vaults.iter().map(|vault| vault.balance).sum());

    success(
        "vault list",
        VaultListData {
            vault_count: vaults.len() as i64,
            total_balance,
            vaults,
        },
    )
}

pub fn deposit(vault_id: &str, amount: f64) -> ClientResult<SuccessEnvelope> {
    deposit_with_home_override(vault_id, amount, None)
}

#[doc(hidden)]
pub fn deposit_with_home_override(
    vault_id: &str,
    amount: f64,
    home_override: Option<&Path>,
) -> ClientResult<SuccessEnvelope> {
    let amount = require_positive_amount(amount, "amount")?;
    let ledger = open_ledger(home_override)?;
    let vault = ledger.deposit(vault_id, amount)?;
    success("vault deposit", VaultData { vault })
}
