use std::thread;

use chrono::NaiveDate;

use crate::savings::policy::{OPPORTUNITY_PRIORITY_SWEEP, OPPORTUNITY_PRIORITY_WINDFALL};
use crate::savings::sweep::{analyze_weekly_sweep, sweep_prompt};
use crate::savings::types::{
    Opportunity, OpportunityAnalysis, OpportunityKind, OpportunityPayload, OpportunitySummary,
    Transaction, round_cents,
};
use crate::savings::windfall::{detect_windfall, windfall_prompt};

/// Runs both detectors over one snapshot and ranks the flagged results.
///
/// The detectors share only an immutable borrow of `transactions`, so the
/// windfall pass runs on a scoped thread while the sweep pass runs here.
pub fn run_opportunity_analysis(
    transactions: &[Transaction],
    today: NaiveDate,
) -> OpportunityAnalysis {
    let (windfall, sweep) = thread::scope(|scope| {
        let windfall_handle = scope.spawn(|| detect_windfall(transactions, today));
        let sweep = analyze_weekly_sweep(transactions, today);
        match windfall_handle.join() {
            Ok(windfall) => (windfall, sweep),
            Err(panic) => std::panic::resume_unwind(panic),
        }
    });

    let mut opportunities = Vec::new();
    if let Some(prompt) = windfall_prompt(&windfall) {
        opportunities.push(Opportunity {
            kind: OpportunityKind::Windfall,
            priority: OPPORTUNITY_PRIORITY_WINDFALL,
            payload: OpportunityPayload::Windfall(windfall.clone()),
            prompt,
        });
    }
    if let Some(prompt) = sweep_prompt(&sweep) {
        opportunities.push(Opportunity {
            kind: OpportunityKind::Sweep,
            priority: OPPORTUNITY_PRIORITY_SWEEP,
            payload: OpportunityPayload::Sweep(sweep.clone()),
            prompt,
        });
    }
    opportunities.sort_by_key(|opportunity| (opportunity.priority, opportunity.kind));

    let total_suggested_savings = round_cents(
        opportunities
            .iter()
            .map(|opportunity| opportunity.payload.suggested_savings_amount())
            .sum(),
    );

    OpportunityAnalysis {
        summary: OpportunitySummary {
            windfall_detected: windfall.is_windfall,
            sweep_detected: sweep.has_opportunity,
            opportunity_count: opportunities.len() as i64,
            total_suggested_savings,
        },
        opportunities,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate};

    use super::run_opportunity_analysis;
    use crate::savings::types::{OpportunityKind, OpportunityPayload, Transaction};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 31).unwrap_or(NaiveDate::MIN)
    }

    fn txn(days_ago: i64, amount: f64, description: &str) -> Transaction {
        Transaction {
            amount,
            date: today() - Duration::days(days_ago),
            description: description.to_string(),
            counterparty_name: None,
        }
    }

    #[test]
    fn ranks_windfall_ahead_of_sweep_and_sums_suggestions() {
        let rows = vec![
            txn(2, 120.0, "GROCERY"),
            txn(4, 80.0, "GAS"),
            txn(3, -2000.0, "TAX REFUND"),
            txn(10, 277.5, "RENT SHARE"),
            txn(17, 277.5, "RENT SHARE"),
            txn(24, 277.5, "RENT SHARE"),
            txn(31, 277.5, "RENT SHARE"),
            txn(14, -500.0, "PAYROLL"),
            txn(28, -500.0, "PAYROLL"),
            txn(42, -500.0, "PAYROLL"),
            txn(56, -500.0, "PAYROLL"),
        ];

        let analysis = run_opportunity_analysis(&rows, today());
        assert_eq!(analysis.opportunities.len(), 2);
        assert_eq!(analysis.opportunities[0].kind, OpportunityKind::Windfall);
        assert_eq!(analysis.opportunities[0].priority, 1);
        assert_eq!(analysis.opportunities[0].prompt.options.len(), 4);
        assert_eq!(analysis.opportunities[1].kind, OpportunityKind::Sweep);
        assert_eq!(analysis.opportunities[1].priority, 2);
        assert_eq!(analysis.opportunities[1].prompt.options.len(), 3);
        assert!(analysis.summary.windfall_detected);
        assert!(analysis.summary.sweep_detected);
        assert_eq!(analysis.summary.total_suggested_savings, 438.75);

        if let OpportunityPayload::Windfall(windfall) = &analysis.opportunities[0].payload {
            assert_eq!(windfall.suggested_savings_amount, 400.0);
        } else {
            panic!("expected windfall payload first");
        }
    }

    #[test]
    fn empty_history_yields_no_opportunities() {
        let analysis = run_opportunity_analysis(&[], today());
        assert!(analysis.opportunities.is_empty());
        assert!(!analysis.summary.windfall_detected);
        assert!(!analysis.summary.sweep_detected);
        assert_eq!(analysis.summary.total_suggested_savings, 0.0);
    }

    #[test]
    fn sweep_alone_is_reported_when_no_windfall() {
        let rows = vec![
            txn(1, 50.0, "COFFEE"),
            txn(9, 300.0, "GROCERY"),
            txn(20, 300.0, "GROCERY"),
        ];
        let analysis = run_opportunity_analysis(&rows, today());
        assert_eq!(analysis.opportunities.len(), 1);
        assert_eq!(analysis.opportunities[0].kind, OpportunityKind::Sweep);
        assert!(!analysis.summary.windfall_detected);
        assert_eq!(analysis.summary.total_suggested_savings, 50.0);
    }
}
