use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsoDate(pub String);

impl IsoDate {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub fn parse_iso_date(value: &str) -> Result<IsoDate, String> {
    let well_formed = value.len() == 10
        && value.char_indices().all(|(index, ch)| match index {
            4 | 7 => ch == '-',
            _ => ch.is_ascii_digit(),
        });
    if !well_formed {
        return Err("date must use YYYY-MM-DD format".to_string());
    }
    if NaiveDate::parse_from_str(value, "%Y-%m-%d").is_err() {
        return Err("date must use valid calendar values".to_string());
    }
    Ok(IsoDate(value.to_string()))
}

pub fn parse_amount(value: &str) -> Result<f64, String> {
    match value.trim().parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount > 0.0 => Ok(amount),
        _ => Err("amount must be a positive number such as 250 or 19.99".to_string()),
    }
}

pub fn parse_non_negative_amount(value: &str) -> Result<f64, String> {
    match value.trim().parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount >= 0.0 => Ok(amount),
        _ => Err("amount must be zero or a positive number".to_string()),
    }
}

pub const DETECTION_AFTER_HELP: &str = "\
Input:
  One top-level JSON array of transaction objects, from <path> or stdin (`-`).
  Each object needs `amount` and `date` (YYYY-MM-DD or RFC 3339).
  Negative amounts are money received; positive amounts are money spent.
  Optional: `description` (or `name`), `counterparty_name` (or `merchant`).
  Records with a bad date or amount are skipped and counted.

Example:
  cat transactions.json | nestegg opportunities - --as-of 2026-03-31
";

pub const WITHDRAWAL_AFTER_HELP: &str = "\
Cooling-off flow:
  1. nestegg withdrawal check <vault_id> <amount>      See whether a request is needed
  2. nestegg withdrawal request <vault_id> <amount> --reason <text>
  3. Wait 24 hours, then nestegg withdrawal complete <vault_id>
";

#[derive(Debug, Parser)]
#[command(
    name = "nestegg",
    version,
    about = "Savings opportunity detection and withdrawal cooling-off",
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Args)]
pub struct DetectionArgs {
    /// Transactions JSON file, or `-` for stdin.
    pub path: Option<String>,
    /// Evaluate as if today were this date (YYYY-MM-DD).
    #[arg(long = "as-of", value_parser = parse_iso_date)]
    pub as_of: Option<IsoDate>,
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run windfall and weekly-sweep detection and rank the results.
    #[command(after_help = DETECTION_AFTER_HELP)]
    Opportunities(DetectionArgs),
    /// Look for a recent deposit well above typical income.
    #[command(after_help = DETECTION_AFTER_HELP)]
    Windfall(DetectionArgs),
    /// Compare this week's spending with the trailing four-week average.
    #[command(after_help = DETECTION_AFTER_HELP)]
    Sweep(DetectionArgs),
    /// Manage savings vaults in the local ledger.
    Vault {
        #[command(subcommand)]
        command: VaultCommand,
    },
    /// Gate vault withdrawals through a 24-hour cooling-off period.
    #[command(after_help = WITHDRAWAL_AFTER_HELP)]
    Withdrawal {
        #[command(subcommand)]
        command: WithdrawalCommand,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum VaultCommand {
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, value_parser = parse_non_negative_amount)]
        balance: Option<f64>,
        #[arg(long, value_parser = parse_non_negative_amount)]
        goal: Option<f64>,
        #[arg(long)]
        purpose: Option<String>,
        #[arg(long)]
        json: bool,
    },
    List {
        #[arg(long)]
        json: bool,
    },
    Deposit {
        vault_id: String,
        #[arg(value_parser = parse_amount)]
        amount: f64,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum WithdrawalCommand {
    Check {
        vault_id: String,
        #[arg(value_parser = parse_amount)]
        amount: f64,
        #[arg(long)]
        json: bool,
    },
    Request {
        vault_id: String,
        #[arg(value_parser = parse_amount)]
        amount: f64,
        #[arg(long)]
        reason: String,
        #[arg(long)]
        json: bool,
    },
    Status {
        vault_id: String,
        #[arg(long)]
        json: bool,
    },
    Complete {
        vault_id: String,
        #[arg(long)]
        json: bool,
    },
    History {
        vault_id: String,
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    pub fn wants_json(&self) -> bool {
        match self {
            Self::Opportunities(args) | Self::Windfall(args) | Self::Sweep(args) => args.json,
            Self::Vault { command } => match command {
                VaultCommand::Create { json, .. }
                | VaultCommand::List { json }
                | VaultCommand::Deposit { json, .. } => *json,
            },
            Self::Withdrawal { command } => match command {
                WithdrawalCommand::Check { json, .. }
                | WithdrawalCommand::Request { json, .. }
                | WithdrawalCommand::Status { json, .. }
                | WithdrawalCommand::Complete { json, .. }
                | WithdrawalCommand::History { json, .. } => *json,
            },
        }
    }
}

#[cfg(test)]
pub fn parse_from<I, T>(itr: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(itr)
}

#[cfg(test)]
mod tests {
    use super::{Commands, VaultCommand, WithdrawalCommand, parse_amount, parse_from, parse_iso_date};

    #[test]
    fn iso_date_parser_rejects_bad_shapes_and_calendar_values() {
        assert!(parse_iso_date("2026-03-31").is_ok());
        assert!(parse_iso_date("2026-3-31").is_err());
        assert!(parse_iso_date("2026-02-30").is_err());
        assert!(parse_iso_date("20260331xx").is_err());
    }

    #[test]
    fn amount_parser_requires_positive_finite_numbers() {
        assert_eq!(parse_amount("19.99"), Ok(19.99));
        assert!(parse_amount("0").is_err());
        assert!(parse_amount("-4").is_err());
        assert!(parse_amount("inf").is_err());
        assert!(parse_amount("ten").is_err());
    }

    #[test]
    fn detection_commands_accept_stdin_dash_and_as_of() {
        let parsed = parse_from(["nestegg", "sweep", "-", "--as-of", "2026-03-31", "--json"]);
        assert!(parsed.is_ok());
        if let Ok(cli) = parsed {
            assert!(cli.command.wants_json());
            if let Commands::Sweep(args) = cli.command {
                assert_eq!(args.path.as_deref(), Some("-"));
                assert_eq!(args.as_of.map(|date| date.0), Some("2026-03-31".to_string()));
            } else {
                panic!("expected sweep command");
            }
        }
    }

    #[test]
    fn withdrawal_request_requires_reason() {
        let missing = parse_from(["nestegg", "withdrawal", "request", "vlt_1", "50"]);
        assert!(missing.is_err());

        let parsed = parse_from([
            "nestegg",
            "withdrawal",
            "request",
            "vlt_1",
            "50",
            "--reason",
            "rent",
        ]);
        assert!(parsed.is_ok());
        if let Ok(cli) = parsed {
            assert!(!cli.command.wants_json());
            assert!(matches!(
                cli.command,
                Commands::Withdrawal {
                    command: WithdrawalCommand::Request { .. }
                }
            ));
        }
    }

    #[test]
    fn vault_create_accepts_optional_goal_and_purpose() {
        let parsed = parse_from([
            "nestegg", "vault", "create", "--name", "Trip", "--goal", "3000", "--purpose", "Kyoto",
        ]);
        assert!(parsed.is_ok());
        if let Ok(cli) = parsed {
            if let Commands::Vault {
                command: VaultCommand::Create { goal, balance, .. },
            } = cli.command
            {
                assert_eq!(goal, Some(3000.0));
                assert_eq!(balance, None);
            } else {
                panic!("expected vault create");
            }
        }
    }
}
