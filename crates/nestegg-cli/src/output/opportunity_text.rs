use serde_json::Value;

use super::format::{key_value_rows, money, text};

pub fn render_opportunities(data: &Value) -> String {
    let mut lines = vec!["Savings opportunities".to_string(), String::new()];
    lines.extend(input_lines(&data["input"]));
    lines.push(String::new());

    let opportunities = data["opportunities"]
        .as_array()
        .cloned()
        .unwrap_or_default();
    if opportunities.is_empty() {
        lines.push("No opportunities right now. Check back after your next paycheck.".to_string());
        return lines.join("\n");
    }

    for (index, opportunity) in opportunities.iter().enumerate() {
        let prompt = &opportunity["prompt"];
        lines.push(format!(
            "{}. {} ({})",
            index + 1,
            text(&prompt["title"]),
            text(&opportunity["kind"])
        ));
        lines.push(format!("   {}", text(&prompt["message"])));
        lines.extend(prompt_option_lines(&prompt["options"]));
        lines.push(String::new());
    }

    lines.push(format!(
        "Total suggested savings: {}",
        money(&data["summary"]["total_suggested_savings"])
    ));
    lines.join("\n")
}

pub fn render_windfall(data: &Value) -> String {
    let result = &data["result"];
    let mut lines = vec!["Windfall check".to_string(), String::new()];
    lines.extend(input_lines(&data["input"]));
    lines.push(String::new());

    if result["is_windfall"].as_bool() == Some(true) {
        lines.extend(key_value_rows(
            &[
                ("Deposit:", money(&result["amount"])),
                ("From:", text(&result["source_label"])),
                ("On:", text(&result["date"])),
                ("Typical income:", money(&result["baseline_income"])),
                ("Multiplier:", format!("{}x", text(&result["multiplier"]))),
                ("Suggested savings:", money(&result["suggested_savings_amount"])),
            ],
            2,
        ));
    } else {
        lines.push(format!("  No windfall ({}).", text(&result["reason"])));
    }
    lines.push(String::new());
    lines.push(text(&result["explanation"]));
    lines.join("\n")
}

pub fn render_sweep(data: &Value) -> String {
    let result = &data["result"];
    let mut lines = vec!["Weekly sweep".to_string(), String::new()];
    lines.extend(input_lines(&data["input"]));
    lines.push(String::new());
    lines.extend(key_value_rows(
        &[
            ("This week:", money(&result["current_week_spend"])),
            (
                "Weekly average:",
                money(&result["trailing_average_weekly_spend"]),
            ),
            ("Underspend:", money(&result["underspend_amount"])),
            ("Suggested savings:", money(&result["suggested_savings_amount"])),
        ],
        2,
    ));
    lines.push(String::new());
    lines.push(text(&result["explanation"]));
    lines.join("\n")
}

fn input_lines(input: &Value) -> Vec<String> {
    let source = match input["source_ref"].as_str() {
        Some(reference) => reference.to_string(),
        None => text(&input["source_kind"]),
    };
    key_value_rows(
        &[
            ("Source:", source),
            ("As of:", text(&input["as_of"])),
            (
                "Records used:",
                format!(
                    "{} of {} ({} skipped)",
                    text(&input["records_used"]),
                    text(&input["records_read"]),
                    text(&input["records_skipped"])
                ),
            ),
        ],
        2,
    )
}

fn prompt_option_lines(options: &Value) -> Vec<String> {
    options
        .as_array()
        .map(|options| {
            options
                .iter()
                .map(|option| {
                    format!(
                        "   - {:<20} {}",
                        text(&option["label"]),
                        money(&option["value"])
                    )
                })
                .collect()
        })
        .unwrap_or_default()
}
