use chrono::{DateTime, Duration, Local, NaiveDate};

use crate::{ClientError, ClientResult};

pub fn format_iso_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp, keeping only its calendar date.
pub fn parse_transaction_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if looks_like_iso_date(trimmed) {
        return NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok();
    }
    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|timestamp| timestamp.date_naive())
}

pub fn resolve_as_of(as_of: Option<&str>, command: &str) -> ClientResult<NaiveDate> {
    let Some(value) = as_of else {
        return Ok(Local::now().date_naive());
    };
    if !looks_like_iso_date(value) {
        return Err(ClientError::invalid_argument_for_command(
            "`as-of` must use YYYY-MM-DD format with a real calendar date.",
            Some(command),
        ));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        ClientError::invalid_argument_for_command(
            "`as-of` must use YYYY-MM-DD format with valid calendar values.",
            Some(command),
        )
    })
}

pub fn days_before(date: NaiveDate, days: i64) -> NaiveDate {
    date - Duration::days(days)
}

fn looks_like_iso_date(value: &str) -> bool {
    if value.len() != 10 {
        return false;
    }
    let bytes = value.as_bytes();
    if bytes[4] != b'-' || bytes[7] != b'-' {
        return false;
    }

    for index in [0usize, 1, 2, 3, 5, 6, 8, 9] {
        if !bytes[index].is_ascii_digit() {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::{format_iso_date, parse_transaction_date, resolve_as_of};

    #[test]
    fn parses_plain_dates_and_timestamps() {
        let plain = parse_transaction_date("2026-02-14");
        assert!(plain.is_some());
        if let Some(date) = plain {
            assert_eq!(format_iso_date(&date), "2026-02-14");
        }

        let stamped = parse_transaction_date("2026-02-14T09:30:00Z");
        assert_eq!(stamped, plain);
    }

    #[test]
    fn rejects_impossible_and_malformed_dates() {
        assert!(parse_transaction_date("2026-02-31").is_none());
        assert!(parse_transaction_date("02/14/2026").is_none());
        assert!(parse_transaction_date("").is_none());
    }

    #[test]
    fn as_of_rejects_bad_calendar_values() {
        let result = resolve_as_of(Some("2026-13-01"), "opportunities");
        assert!(result.is_err());
        if let Err(error) = result {
            assert_eq!(error.code, "invalid_argument");
        }
    }
}
