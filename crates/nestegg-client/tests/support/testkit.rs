use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use nestegg_client::SuccessEnvelope;
use serde_json::{Value, json};
use tempfile::{Builder, TempDir};

pub fn temp_home(prefix: &str) -> std::io::Result<(TempDir, PathBuf)> {
    let dir = Builder::new().prefix(prefix).tempdir()?;
    let home = dir.path().join("ledger-home");
    fs::create_dir_all(&home)?;
    Ok((dir, home))
}

pub fn write_fixture_json(dir: &Path, name: &str, rows: &[Value]) -> std::io::Result<PathBuf> {
    let path = dir.join(name);
    let body = serde_json::to_string_pretty(&Value::Array(rows.to_vec()))
        .map_err(std::io::Error::other)?;
    fs::write(&path, body)?;
    Ok(path)
}

pub fn at(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

pub fn payload(envelope: SuccessEnvelope) -> Value {
    serde_json::to_value(envelope).unwrap_or(Value::Null)
}

pub fn transaction(date: &str, amount: f64, description: &str) -> Value {
    json!({
        "date": date,
        "amount": amount,
        "description": description,
    })
}

/// Month of activity ending 2026-03-31: four $500 paychecks plus a $2000
/// refund, $200 spent this week against $1110 over the prior four weeks.
pub fn march_fixture() -> Vec<Value> {
    vec![
        transaction("2026-03-27", -500.0, "PAYROLL ACME"),
        transaction("2026-03-20", -2000.0, "IRS TAX REFUND"),
        transaction("2026-03-13", -500.0, "PAYROLL ACME"),
        transaction("2026-02-27", -500.0, "PAYROLL ACME"),
        transaction("2026-02-13", -500.0, "PAYROLL ACME"),
        transaction("2026-03-29", 80.0, "Grocer"),
        transaction("2026-03-25", 120.0, "Utilities"),
        transaction("2026-03-20", 300.0, "Rent share"),
        transaction("2026-03-10", 250.0, "Car service"),
        transaction("2026-03-03", 280.0, "Groceries"),
        transaction("2026-02-25", 280.0, "Groceries"),
        json!({ "date": "2026-03-30", "amount": "not-a-number", "description": "Bad amount" }),
        json!({ "date": "03/30/2026", "amount": 12.0, "description": "Bad date" }),
    ]
}
