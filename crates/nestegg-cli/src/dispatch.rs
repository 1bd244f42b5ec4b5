use nestegg_client::commands;
use nestegg_client::{ClientResult, SuccessEnvelope};

use crate::cli::{Cli, Commands, DetectionArgs, VaultCommand, WithdrawalCommand};

pub fn dispatch(cli: &Cli) -> ClientResult<SuccessEnvelope> {
    match &cli.command {
        Commands::Opportunities(args) => {
            let (path, as_of) = detection_inputs(args);
            commands::opportunities::run(path, as_of)
        }
        Commands::Windfall(args) => {
            let (path, as_of) = detection_inputs(args);
            commands::opportunities::windfall(path, as_of)
        }
        Commands::Sweep(args) => {
            let (path, as_of) = detection_inputs(args);
            commands::opportunities::sweep(path, as_of)
        }
        Commands::Vault { command } => match command {
            VaultCommand::Create {
                name,
                balance,
                goal,
                purpose,
                ..
            } => commands::vault::create(name, *balance, *goal, purpose.as_deref()),
            VaultCommand::List { .. } => commands::vault::list(),
            VaultCommand::Deposit {
                vault_id, amount, ..
            } => commands::vault::deposit(vault_id, *amount),
        },
        Commands::Withdrawal { command } => match command {
            WithdrawalCommand::Check {
                vault_id, amount, ..
            } => commands::withdrawal::check(vault_id, *amount),
            WithdrawalCommand::Request {
                vault_id,
                amount,
                reason,
                ..
            } => commands::withdrawal::request(vault_id, *amount, reason),
            WithdrawalCommand::Status { vault_id, .. } => commands::withdrawal::status(vault_id),
            WithdrawalCommand::Complete { vault_id, .. } => {
                commands::withdrawal::complete(vault_id)
            }
            WithdrawalCommand::History { vault_id, .. } => commands::withdrawal::history(vault_id),
        },
    }
}

fn detection_inputs(args: &DetectionArgs) -> (Option<&str>, Option<&str>) {
    (
        args.path.as_deref(),
        args.as_of.as_ref().map(|date| date.as_str()),
    )
}
