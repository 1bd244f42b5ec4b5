use nestegg_client::ClientError;

pub fn render_error(error: &ClientError) -> String {
    let mut lines = vec![
        "That didn't work.".to_string(),
        String::new(),
        format!("  Error:    {}", error.code),
        format!("  Details:  {}", error.message),
        String::new(),
        "What to do next:".to_string(),
    ];

    if error.recovery_steps.is_empty() {
        lines.push("  1. Retry the command. Set NESTEGG_LOG=debug for more detail.".to_string());
    } else {
        lines.extend(
            error
                .recovery_steps
                .iter()
                .enumerate()
                .map(|(index, step)| format!("  {}. {step}", index + 1)),
        );
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use nestegg_client::ClientError;

    use super::render_error;

    #[test]
    fn renders_code_details_and_numbered_steps() {
        let rendered = render_error(&ClientError::vault_not_found("vlt_9"));
        assert!(rendered.starts_with("That didn't work."));
        assert!(rendered.contains("  Error:    vault_not_found"));
        assert!(rendered.contains("vlt_9"));
        assert!(rendered.contains("  1. Run `nestegg vault list`"));
        assert!(rendered.contains("  2. "));
    }

    #[test]
    fn internal_errors_without_steps_point_at_logging() {
        let rendered = render_error(&ClientError::internal_store("lock poisoned"));
        assert!(rendered.contains("NESTEGG_LOG=debug"));
    }
}
