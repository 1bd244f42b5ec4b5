use serde_json::Value;
use tracing::debug;

use crate::savings::date::parse_transaction_date;
use crate::savings::types::{NormalizedBatch, Transaction};
use crate::{ClientError, ClientResult};

const DATE_FIELDS: [&str; 2] = ["date", "posted_at"];
const DESCRIPTION_FIELDS: [&str; 2] = ["description", "name"];
const COUNTERPARTY_FIELDS: [&str; 3] = ["counterparty_name", "counterpartyName", "merchant"];

/// Parses a JSON document holding one top-level array of transaction records.
pub fn parse_transaction_records(content: &str) -> ClientResult<Vec<Value>> {
    let parsed: Value = serde_json::from_str(content).map_err(|error| {
        ClientError::invalid_transactions_input(&format!(
            "Transactions input is not valid JSON: {error}"
        ))
    })?;

    match parsed {
        Value::Array(records) => Ok(records),
        _ => Err(ClientError::invalid_transactions_input(
            "Transactions input must be one top-level JSON array.",
        )),
    }
}

/// Converts raw records into canonical transactions.
///
/// Records without a parseable date or a numeric amount are skipped; the batch
/// never fails because of one bad record. Input order is preserved.
pub fn normalize_transactions(records: &[Value]) -> NormalizedBatch {
    let mut transactions = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        match normalize_record(record) {
            Some(transaction) => transactions.push(transaction),
            None => debug!(record_index = index, "skipping malformed transaction record"),
        }
    }

    let records_read = records.len() as i64;
    let records_used = transactions.len() as i64;
    NormalizedBatch {
        transactions,
        records_read,
        records_used,
        records_skipped: records_read - records_used,
    }
}

fn normalize_record(record: &Value) -> Option<Transaction> {
    let object = record.as_object()?;
    let amount = object.get("amount").and_then(parse_amount)?;
    let date = DATE_FIELDS
        .iter()
        .find_map(|field| object.get(*field).and_then(Value::as_str))
        .and_then(parse_transaction_date)?;

    let description = DESCRIPTION_FIELDS
        .iter()
        .find_map(|field| clean_text(object.get(*field)))
        .unwrap_or_default();
    let counterparty_name = COUNTERPARTY_FIELDS
        .iter()
        .find_map(|field| clean_text(object.get(*field)));

    Some(Transaction {
        amount,
        date,
        description,
        counterparty_name,
    })
}

fn parse_amount(value: &Value) -> Option<f64> {
    let amount = match value {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    amount.is_finite().then_some(amount)
}

fn clean_text(value: Option<&Value>) -> Option<String> {
    let text = value?.as_str()?.trim();
    if text.is_empty() {
        return None;
    }
    Some(text.to_string())
}
