use chrono::NaiveDate;

use crate::ClientResult;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{
    OpportunitiesData, PolicyVersions, SweepData, TransactionInputSummary, WindfallData,
};
use crate::savings::date::{format_iso_date, resolve_as_of};
use crate::savings::input::resolve_source;
use crate::savings::normalize::{normalize_transactions, parse_transaction_records};
use crate::savings::policy::{SWEEP_POLICY_VERSION, WINDFALL_POLICY_VERSION};
use crate::savings::types::NormalizedBatch;
use crate::savings::{analyze_weekly_sweep, detect_windfall, run_opportunity_analysis};

#[derive(Debug, Default)]
pub struct DetectionRunOptions {
    pub path: Option<String>,
    pub as_of: Option<String>,
    pub stdin_override: Option<String>,
}

struct LoadedInput {
    summary: TransactionInputSummary,
    batch: NormalizedBatch,
    today: NaiveDate,
}

pub fn run(path: Option<&str>, as_of: Option<&str>) -> ClientResult<SuccessEnvelope> {
    run_with_options(options(path, as_of))
}

#[doc(hidden)]
pub fn run_with_options(options: DetectionRunOptions) -> ClientResult<SuccessEnvelope> {
    let loaded = load_input(options, "opportunities")?;
    let analysis = run_opportunity_analysis(&loaded.batch.transactions, loaded.today);

    success(
        "opportunities",
        OpportunitiesData {
            input: loaded.summary,
            policy: PolicyVersions {
                windfall: WINDFALL_POLICY_VERSION.to_string(),
                sweep: SWEEP_POLICY_VERSION.to_string(),
            },
            opportunities: analysis.opportunities,
            summary: analysis.summary,
        },
    )
}

pub fn windfall(path: Option<&str>, as_of: Option<&str>) -> ClientResult<SuccessEnvelope> {
    windfall_with_options(options(path, as_of))
}

#[doc(hidden)]
pub fn windfall_with_options(options: DetectionRunOptions) -> ClientResult<SuccessEnvelope> {
    let loaded = load_input(options, "windfall")?;
    let result = detect_windfall(&loaded.batch.transactions, loaded.today);

    success(
        "windfall",
        WindfallData {
            input: loaded.summary,
            policy_version: WINDFALL_POLICY_VERSION.to_string(),
            result,
        },
    )
}

pub fn sweep(path: Option<&str>, as_of: Option<&str>) -> ClientResult<SuccessEnvelope> {
    sweep_with_options(options(path, as_of))
}

#[doc(hidden)]
pub fn sweep_with_options(options: DetectionRunOptions) -> ClientResult<SuccessEnvelope> {
    let loaded = load_input(options, "sweep")?;
    let result = analyze_weekly_sweep(&loaded.batch.transactions, loaded.today);

    success(
        "sweep",
        SweepData {
            input: loaded.summary,
            policy_version: SWEEP_POLICY_VERSION.to_string(),
            result,
        },
    )
}

fn options(path: Option<&str>, as_of: Option<&str>) -> DetectionRunOptions {
    DetectionRunOptions {
        path: path.map(std::string::ToString::to_string),
        as_of: as_of.map(std::string::ToString::to_string),
        stdin_override: None,
    }
}

fn load_input(options: DetectionRunOptions, command: &str) -> ClientResult<LoadedInput> {
    let today = resolve_as_of(options.as_of.as_deref(), command)?;
    let source = resolve_source(options.path.as_deref(), options.stdin_override)?;
    let records = parse_transaction_records(&source.content)?;
    let batch = normalize_transactions(&records);

    Ok(LoadedInput {
        summary: TransactionInputSummary {
            source_kind: source.kind.as_str().to_string(),
            source_ref: source.reference,
            as_of: format_iso_date(&today),
            records_read: batch.records_read,
            records_used: batch.records_used,
            records_skipped: batch.records_skipped,
        },
        batch,
        today,
    })
}
