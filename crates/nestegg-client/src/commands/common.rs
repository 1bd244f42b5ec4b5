use std::path::Path;

use crate::setup::load_setup;
use crate::softlock::sqlite::SqliteLedger;
use crate::{ClientError, ClientResult};

pub(crate) fn open_ledger(home_override: Option<&Path>) -> ClientResult<SqliteLedger> {
    let setup = load_setup(home_override)?;
    SqliteLedger::open(&setup.db_path)
}

pub(crate) fn require_positive_amount(value: f64, field_name: &str) -> ClientResult<f64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ClientError::invalid_amount(field_name));
    }
    Ok(value)
}

pub(crate) fn require_non_negative_amount(value: f64, field_name: &str) -> ClientResult<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(ClientError::invalid_argument_for_command(
            &format!("`{field_name}` must be zero or a positive, finite amount."),
            Some("vault create"),
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::{require_non_negative_amount, require_positive_amount};

    #[test]
    fn amounts_must_be_positive_and_finite() {
        assert!(require_positive_amount(0.01, "amount").is_ok());
        assert!(require_positive_amount(0.0, "amount").is_err());
        assert!(require_positive_amount(f64::NAN, "amount").is_err());
        assert!(require_non_negative_amount(0.0, "balance").is_ok());
        assert!(require_non_negative_amount(-1.0, "balance").is_err());
    }
}
