mod error_text;
mod format;
mod json;
mod mode;
mod opportunity_text;
mod vault_text;

use std::io::{self, Write};

use nestegg_client::{ClientError, SuccessEnvelope};

pub use mode::{OutputMode, mode_for_command};

pub fn print_success(success: &SuccessEnvelope, mode: OutputMode) -> io::Result<()> {
    let body = match mode {
        OutputMode::Text => render_text_success(success)?,
        OutputMode::Json => json::render_success_json(success)?,
    };
    write_stdout_line(&body)
}

pub fn print_failure(error: &ClientError, mode: OutputMode) -> io::Result<()> {
    let body = match mode {
        OutputMode::Json => json::render_error_json(error)?,
        OutputMode::Text => error_text::render_error(error),
    };
    write_stdout_line(&body)
}

pub fn write_stdout_text(text: &str) -> io::Result<()> {
    write_tolerating_broken_pipe(text.as_bytes())
}

fn write_stdout_line(text: &str) -> io::Result<()> {
    write_tolerating_broken_pipe(format!("{text}\n").as_bytes())
}

/// A closed downstream pipe (`nestegg ... | head`) is not an error.
fn write_tolerating_broken_pipe(bytes: &[u8]) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    match stdout.write_all(bytes).and_then(|()| stdout.flush()) {
        Err(error) if error.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

fn render_text_success(success: &SuccessEnvelope) -> io::Result<String> {
    let data = &success.data;
    let body = match success.command.as_str() {
        "opportunities" => opportunity_text::render_opportunities(data),
        "windfall" => opportunity_text::render_windfall(data),
        "sweep" => opportunity_text::render_sweep(data),
        "vault create" | "vault deposit" => vault_text::render_vault(&success.command, data),
        "vault list" => vault_text::render_vault_list(data),
        "withdrawal check" => vault_text::render_withdrawal_check(data),
        "withdrawal request" => vault_text::render_withdrawal_request(data),
        "withdrawal status" => vault_text::render_withdrawal_status(data),
        "withdrawal complete" => vault_text::render_withdrawal_complete(data),
        "withdrawal history" => vault_text::render_withdrawal_history(data),
        _ => {
            return Err(io::Error::other(format!(
                "unsupported text output command `{}`",
                success.command
            )));
        }
    };
    Ok(body)
}
