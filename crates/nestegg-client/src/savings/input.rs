use std::fs;
use std::io::{IsTerminal, Read};

use crate::{ClientError, ClientResult};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SourceKind {
    File,
    Stdin,
}

impl SourceKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Stdin => "stdin",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedSource {
    pub kind: SourceKind,
    pub reference: Option<String>,
    pub content: String,
}

/// Reads transaction JSON from a file path, or from stdin when the path is `-`
/// or omitted.
pub fn resolve_source(
    path: Option<&str>,
    stdin_override: Option<String>,
) -> ClientResult<ResolvedSource> {
    match path {
        Some(path_value) if path_value != "-" => {
            let content = fs::read_to_string(path_value).map_err(|error| {
                ClientError::invalid_argument_with_recovery(
                    &format!("Could not read transactions file `{path_value}`: {error}"),
                    vec![
                        "Verify the path exists and is readable.".to_string(),
                        "Or pipe the JSON array on stdin and pass `-` as the path.".to_string(),
                    ],
                )
            })?;
            Ok(ResolvedSource {
                kind: SourceKind::File,
                reference: Some(path_value.to_string()),
                content,
            })
        }
        _ => match read_stdin(stdin_override)? {
            Some(content) => Ok(ResolvedSource {
                kind: SourceKind::Stdin,
                reference: None,
                content,
            }),
            None => Err(ClientError::invalid_transactions_input(
                "No transactions provided. Pass a file path or pipe a JSON array via stdin.",
            )),
        },
    }
}

fn read_stdin(stdin_override: Option<String>) -> ClientResult<Option<String>> {
    if let Some(value) = stdin_override {
        return Ok(Some(value).filter(|body| !body.trim().is_empty()));
    }

    if std::io::stdin().is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|error| {
            ClientError::invalid_argument_with_recovery(
                &format!("Could not read stdin: {error}"),
                vec!["Retry with an explicit file path argument.".to_string()],
            )
        })?;

    if buffer.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(buffer))
}
