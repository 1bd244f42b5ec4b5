use serde_json::Value;

use super::format::{Align, Column, key_value_rows, money, render_table, text};

pub fn render_vault(command: &str, data: &Value) -> String {
    let vault = &data["vault"];
    let heading = match command {
        "vault create" => "Vault created",
        _ => "Deposit recorded",
    };
    let mut lines = vec![heading.to_string(), String::new()];
    lines.extend(vault_rows(vault));
    lines.join("\n")
}

pub fn render_vault_list(data: &Value) -> String {
    let vaults = data["vaults"].as_array().cloned().unwrap_or_default();
    if vaults.is_empty() {
        return "No vaults yet. Create one with `nestegg vault create --name <name>`.".to_string();
    }

    let columns = [
        Column {
            name: "Vault ID",
            align: Align::Left,
        },
        Column {
            name: "Name",
            align: Align::Left,
        },
        Column {
            name: "Balance",
            align: Align::Right,
        },
        Column {
            name: "Goal",
            align: Align::Right,
        },
    ];
    let rows = vaults
        .iter()
        .map(|vault| {
            vec![
                text(&vault["id"]),
                text(&vault["name"]),
                money(&vault["balance"]),
                money(&vault["goal_amount"]),
            ]
        })
        .collect::<Vec<_>>();

    let mut lines = vec![format!("Vaults ({})", text(&data["vault_count"])), String::new()];
    lines.extend(render_table(&columns, &rows));
    lines.push(String::new());
    lines.push(format!("Total balance: {}", money(&data["total_balance"])));
    lines.join("\n")
}

pub fn render_withdrawal_check(data: &Value) -> String {
    let vault_id = text(&data["vault_id"]);
    if data["allowed"].as_bool() == Some(true) {
        return format!(
            "Withdrawal allowed: the cooling-off period is over.\n\nRun `nestegg withdrawal complete {vault_id}` to move the money."
        );
    }

    match data["reason"].as_str() {
        Some("cooling_period") => format!(
            "Still cooling off: {} hour(s) remaining.\n\n  Available at:  {}\n\nRun `nestegg withdrawal status {vault_id}` to check again.",
            text(&data["hours_remaining"]),
            text(&data["available_at"])
        ),
        _ => {
            let mut lines = vec![
                "A withdrawal request is needed first.".to_string(),
                String::new(),
            ];
            lines.extend(vault_rows(&data["vault"]));
            lines.push(String::new());
            lines.push(format!(
                "Run `nestegg withdrawal request {vault_id} {} --reason <text>` to start the 24-hour cooling-off period.",
                text(&data["amount"])
            ));
            lines.join("\n")
        }
    }
}

pub fn render_withdrawal_request(data: &Value) -> String {
    let request = &data["request"];
    let mut lines = vec!["Withdrawal requested".to_string(), String::new()];
    lines.extend(key_value_rows(
        &[
            ("Request:", text(&request["id"])),
            ("Amount:", money(&request["amount"])),
            ("Reason:", text(&request["reason"])),
            ("Available at:", text(&data["available_at"])),
        ],
        2,
    ));
    lines.push(String::new());
    lines.push(text(&data["impact"]["message"]));
    lines.join("\n")
}

pub fn render_withdrawal_status(data: &Value) -> String {
    if data["has_pending_request"].as_bool() != Some(true) {
        return format!(
            "No pending withdrawal request for {}.",
            text(&data["vault_id"])
        );
    }

    let request = &data["request"];
    let state = if data["can_withdraw"].as_bool() == Some(true) {
        "ready to complete".to_string()
    } else {
        format!("{} hour(s) remaining", text(&data["hours_remaining"]))
    };
    let mut lines = vec!["Pending withdrawal".to_string(), String::new()];
    lines.extend(key_value_rows(
        &[
            ("Request:", text(&request["id"])),
            ("Amount:", money(&request["amount"])),
            ("Reason:", text(&request["reason"])),
            ("Available at:", text(&data["available_at"])),
            ("Status:", state),
        ],
        2,
    ));
    lines.push(String::new());
    lines.push(text(&request["impact_message"]));
    lines.join("\n")
}

pub fn render_withdrawal_complete(data: &Value) -> String {
    let mut lines = vec![
        format!(
            "Withdrew {} from {}.",
            money(&data["request"]["amount"]),
            text(&data["vault"]["name"])
        ),
        String::new(),
    ];
    lines.extend(vault_rows(&data["vault"]));
    lines.join("\n")
}

pub fn render_withdrawal_history(data: &Value) -> String {
    let requests = data["requests"].as_array().cloned().unwrap_or_default();
    if requests.is_empty() {
        return format!("No withdrawal requests for {}.", text(&data["vault_id"]));
    }

    let columns = [
        Column {
            name: "Request",
            align: Align::Left,
        },
        Column {
            name: "Status",
            align: Align::Left,
        },
        Column {
            name: "Amount",
            align: Align::Right,
        },
        Column {
            name: "Created",
            align: Align::Left,
        },
        Column {
            name: "Reason",
            align: Align::Left,
        },
    ];
    let rows = requests
        .iter()
        .map(|request| {
            vec![
                text(&request["id"]),
                text(&request["status"]),
                money(&request["amount"]),
                text(&request["created_at"]),
                text(&request["reason"]),
            ]
        })
        .collect::<Vec<_>>();

    let mut lines = vec![
        format!("Withdrawal history for {}", text(&data["vault_id"])),
        String::new(),
    ];
    lines.extend(render_table(&columns, &rows));
    lines.join("\n")
}

fn vault_rows(vault: &Value) -> Vec<String> {
    let mut entries = vec![
        ("Vault:", format!("{} ({})", text(&vault["name"]), text(&vault["id"]))),
        ("Balance:", money(&vault["balance"])),
    ];
    if !vault["goal_amount"].is_null() {
        entries.push(("Goal:", money(&vault["goal_amount"])));
    }
    if !vault["purpose"].is_null() {
        entries.push(("Purpose:", text(&vault["purpose"])));
    }
    key_value_rows(&entries, 2)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{render_vault_list, render_withdrawal_check, render_withdrawal_status};

    #[test]
    fn vault_list_shows_table_and_total() {
        let rendered = render_vault_list(&json!({
            "vault_count": 1,
            "total_balance": 2500.0,
            "vaults": [{
                "id": "vlt_1",
                "name": "Trip",
                "balance": 2500.0,
                "goal_amount": null,
                "purpose": null
            }]
        }));
        assert!(rendered.contains("Vaults (1)"));
        assert!(rendered.contains("vlt_1"));
        assert!(rendered.contains("Total balance: $2500.00"));
    }

    #[test]
    fn check_without_request_points_at_request_command() {
        let rendered = render_withdrawal_check(&json!({
            "vault_id": "vlt_1",
            "amount": 600.0,
            "allowed": false,
            "reason": "new_request_required",
            "vault": { "id": "vlt_1", "name": "Trip", "balance": 2500.0, "goal_amount": 5000.0, "purpose": "Kyoto" }
        }));
        assert!(rendered.contains("A withdrawal request is needed first."));
        assert!(rendered.contains("Purpose:"));
        assert!(rendered.contains("nestegg withdrawal request vlt_1 600.0"));
    }

    #[test]
    fn cooling_check_and_status_show_hours_remaining() {
        let check = render_withdrawal_check(&json!({
            "vault_id": "vlt_1",
            "allowed": false,
            "reason": "cooling_period",
            "hours_remaining": 3,
            "available_at": "2026-03-02T09:00:00.000Z"
        }));
        assert!(check.contains("3 hour(s) remaining"));

        let status = render_withdrawal_status(&json!({
            "vault_id": "vlt_1",
            "has_pending_request": true,
            "can_withdraw": true,
            "hours_remaining": 0,
            "available_at": "2026-03-02T09:00:00.000Z",
            "request": { "id": "wdr_1", "amount": 50.0, "reason": "rent", "impact_message": "ok" }
        }));
        assert!(status.contains("ready to complete"));
        assert!(status.contains("wdr_1"));
    }
}
