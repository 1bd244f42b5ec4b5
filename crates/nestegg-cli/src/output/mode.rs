use crate::cli::Commands;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum OutputMode {
    Text,
    Json,
}

pub fn mode_for_command(command: &Commands) -> OutputMode {
    if command.wants_json() {
        OutputMode::Json
    } else {
        OutputMode::Text
    }
}

#[cfg(test)]
mod tests {
    use super::{OutputMode, mode_for_command};
    use crate::cli::parse_from;

    #[test]
    fn json_flag_selects_json_for_every_command_family() {
        let cases: [&[&str]; 4] = [
            &["nestegg", "opportunities", "-", "--json"],
            &["nestegg", "vault", "list", "--json"],
            &["nestegg", "withdrawal", "status", "vlt_1", "--json"],
            &["nestegg", "withdrawal", "check", "vlt_1", "25", "--json"],
        ];
        for args in cases {
            let parsed = parse_from(args);
            assert!(parsed.is_ok());
            if let Ok(cli) = parsed {
                assert_eq!(mode_for_command(&cli.command), OutputMode::Json);
            }
        }
    }

    #[test]
    fn text_is_the_default() {
        let parsed = parse_from(["nestegg", "withdrawal", "history", "vlt_1"]);
        assert!(parsed.is_ok());
        if let Ok(cli) = parsed {
            assert_eq!(mode_for_command(&cli.command), OutputMode::Text);
        }
    }
}
