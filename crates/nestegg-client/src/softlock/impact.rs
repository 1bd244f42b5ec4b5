use crate::savings::types::round_to;
use crate::softlock::policy::SoftLockPolicy;
use crate::softlock::types::{GoalImpact, Vault};

/// Estimates how far a withdrawal sets back the vault's goal.
///
/// Delay assumes the policy's flat weekly progress rate:
/// `ceil((current_pct - new_pct) / assumed_weekly_progress_pct)`.
pub fn goal_impact(vault: &Vault, amount: f64, policy: SoftLockPolicy) -> GoalImpact {
    let remaining = vault.balance - amount;
    let Some(goal) = vault.effective_goal() else {
        return GoalImpact {
            message: format!(
                "Withdrawing ${amount:.2} leaves ${remaining:.2} in {}.",
                vault.name
            ),
            current_progress_pct: None,
            new_progress_pct: None,
            delay_weeks: None,
        };
    };

    let current_pct = vault.balance / goal * 100.0;
    let new_pct = remaining / goal * 100.0;
    // Rounded so float noise cannot push an exact multiple of the rate up a week.
    let pct_lost = round_to(current_pct - new_pct, 6);
    let delay_weeks = (pct_lost / policy.assumed_weekly_progress_pct).ceil() as i64;
    let week_label = if delay_weeks == 1 { "week" } else { "weeks" };

    let mut message = format!(
        "This withdrawal takes {} from {current_pct:.0}% to {new_pct:.0}% of its ${goal:.2} goal, setting you back about {delay_weeks} {week_label}.",
        vault.name
    );
    if let Some(purpose) = &vault.purpose {
        message.push_str(&format!(" You're saving for: {purpose}."));
    }

    GoalImpact {
        message,
        current_progress_pct: Some(round_to(current_pct, 1)),
        new_progress_pct: Some(round_to(new_pct, 1)),
        delay_weeks: Some(delay_weeks),
    }
}
