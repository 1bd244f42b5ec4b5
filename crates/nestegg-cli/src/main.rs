mod cli;
mod dispatch;
mod output;

use std::process::ExitCode;

use clap::{Parser, error::ErrorKind};
use nestegg_client::ClientError;
use output::write_stdout_text;
use tracing::debug;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

const LOG_ENV_VAR: &str = "NESTEGG_LOG";
const DEFAULT_LOG_FILTER: &str = "warn";

const ROOT_HELP: &str = "Nestegg - savings opportunities and withdrawal cooling-off

Usage:
  nestegg <command>

Find savings opportunities in a transactions JSON array:
  nestegg opportunities <path|->                          Windfall and weekly sweep, ranked
  nestegg windfall <path|->                               Large recent deposits only
  nestegg sweep <path|->                                  This week's underspend only

Manage vaults:
  nestegg vault create --name <name> [--goal <amount>]    Create a vault
  nestegg vault list                                      List vaults and balances
  nestegg vault deposit <vault_id> <amount>               Add money to a vault

Withdraw with a 24-hour cooling-off period:
  nestegg withdrawal check <vault_id> <amount>            Is a withdrawal allowed yet?
  nestegg withdrawal request <vault_id> <amount> --reason <text>
  nestegg withdrawal status <vault_id>                    Time left on the pending request
  nestegg withdrawal complete <vault_id>                  Execute an eligible request
  nestegg withdrawal history <vault_id>                   Every request for the vault

Add --json to any command for machine-readable output.
";

fn main() -> ExitCode {
    init_tracing();
    match run() {
        Ok(code) | Err(code) => code,
    }
}

/// Logs go to stderr so `--json` output on stdout stays parseable.
fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(stderr_layer)
        .with(filter)
        .try_init();
}

fn run() -> Result<ExitCode, ExitCode> {
    let raw_args = std::env::args().collect::<Vec<String>>();
    if raw_args.len() == 1 || is_top_level_help_request(&raw_args) {
        if write_stdout_text(ROOT_HELP).is_err() {
            return Err(ExitCode::from(2));
        }
        return Ok(ExitCode::SUCCESS);
    }

    let cli = match cli::Cli::try_parse() {
        Ok(value) => value,
        Err(err) => {
            if matches!(
                err.kind(),
                ErrorKind::DisplayHelp
                    | ErrorKind::DisplayVersion
                    | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            ) {
                if write_stdout_text(&err.to_string()).is_err() {
                    return Err(ExitCode::from(2));
                }
                return Ok(ExitCode::SUCCESS);
            }

            let command_hint = command_path_from_args(&raw_args);
            let parse_error = ClientError::invalid_argument_for_command(
                &strip_clap_boilerplate(&err.to_string()),
                command_hint.as_deref(),
            );
            let mode = infer_requested_output_mode(&raw_args);
            if output::print_failure(&parse_error, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            return Err(ExitCode::from(1));
        }
    };

    let mode = output::mode_for_command(&cli.command);
    match dispatch::dispatch(&cli) {
        Ok(success) => {
            debug!(command = %success.command, "command succeeded");
            if output::print_success(&success, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => {
            debug!(code = %error.code, "command failed");
            if output::print_failure(&error, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Err(exit_code_for_error(&error))
        }
    }
}

fn is_top_level_help_request(raw_args: &[String]) -> bool {
    raw_args.len() == 2 && matches!(raw_args[1].as_str(), "--help" | "-h" | "help")
}

/// Drops clap's Usage and "For more information" tail; recovery steps replace it.
fn strip_clap_boilerplate(message: &str) -> String {
    let trimmed = if let Some(pos) = message.find("\n\nUsage:") {
        &message[..pos]
    } else if let Some(pos) = message.find("\nFor more information") {
        &message[..pos]
    } else {
        message
    };
    trimmed.trim_start_matches("error: ").trim_end().to_string()
}

fn command_path_from_args(raw_args: &[String]) -> Option<String> {
    let non_flags = raw_args
        .iter()
        .skip(1)
        .filter(|value| !value.starts_with('-'))
        .map(String::as_str)
        .collect::<Vec<&str>>();

    let hint = match non_flags.as_slice() {
        ["opportunities", ..] => "opportunities",
        ["windfall", ..] => "windfall",
        ["sweep", ..] => "sweep",
        ["vault", "create", ..] => "vault create",
        ["vault", "list", ..] => "vault list",
        ["vault", "deposit", ..] => "vault deposit",
        ["vault", ..] => "vault",
        ["withdrawal", "check", ..] => "withdrawal check",
        ["withdrawal", "request", ..] => "withdrawal request",
        ["withdrawal", "status", ..] => "withdrawal status",
        ["withdrawal", "complete", ..] => "withdrawal complete",
        ["withdrawal", "history", ..] => "withdrawal history",
        ["withdrawal", ..] => "withdrawal",
        _ => return None,
    };
    Some(hint.to_string())
}

fn exit_code_for_error(error: &ClientError) -> ExitCode {
    if error.is_internal() {
        ExitCode::from(2)
    } else {
        ExitCode::from(1)
    }
}

fn infer_requested_output_mode(raw_args: &[String]) -> output::OutputMode {
    if raw_args.iter().skip(1).any(|value| value == "--json") {
        return output::OutputMode::Json;
    }
    output::OutputMode::Text
}
