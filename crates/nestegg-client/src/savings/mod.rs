pub mod date;
pub mod input;
pub mod normalize;
pub mod opportunity;
pub mod policy;
pub mod sweep;
pub mod types;
pub mod windfall;

pub use normalize::normalize_transactions;
pub use opportunity::run_opportunity_analysis;
pub use sweep::{analyze_weekly_sweep, sweep_prompt};
pub use types::{
    Opportunity, OpportunityAnalysis, OpportunityKind, SweepResult, Transaction, WindfallResult,
};
pub use windfall::{detect_windfall, windfall_prompt};
