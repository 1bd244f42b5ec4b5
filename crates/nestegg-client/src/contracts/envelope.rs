use serde::Serialize;
use serde_json::Value;

use crate::API_VERSION;
use crate::error::{ClientError, ClientResult};

/// `ok: true` wrapper emitted by every command on success.
#[derive(Debug, Clone, Serialize)]
pub struct SuccessEnvelope {
    pub ok: bool,
    pub command: String,
    pub version: String,
    pub data: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailureEnvelope {
    pub ok: bool,
    pub version: String,
    pub error: ErrorContract,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorContract {
    pub code: String,
    pub message: String,
    pub recovery_steps: Vec<String>,
}

impl From<&ClientError> for ErrorContract {
    fn from(error: &ClientError) -> Self {
        Self {
            code: error.code.clone(),
            message: error.message.clone(),
            recovery_steps: error.recovery_steps.clone(),
        }
    }
}

pub fn success<T>(command: &str, data: T) -> ClientResult<SuccessEnvelope>
where
    T: Serialize,
{
    let data = serde_json::to_value(data)
        .map_err(|error| ClientError::internal_serialization(&error.to_string()))?;
    Ok(SuccessEnvelope {
        ok: true,
        command: command.to_string(),
        version: API_VERSION.to_string(),
        data,
    })
}

pub fn failure_from_error(error: &ClientError) -> FailureEnvelope {
    FailureEnvelope {
        ok: false,
        version: API_VERSION.to_string(),
        error: ErrorContract::from(error),
        data: error.data.clone(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{failure_from_error, success};
    use crate::ClientError;

    #[test]
    fn success_wraps_data_with_command_name() {
        let envelope = success("vault list", json!({ "vault_count": 0 }));
        assert!(envelope.is_ok());
        if let Ok(envelope) = envelope {
            assert!(envelope.ok);
            assert_eq!(envelope.command, "vault list");
            assert_eq!(envelope.data["vault_count"], 0);
        }
    }

    #[test]
    fn failure_carries_code_recovery_steps_and_data() {
        let envelope = failure_from_error(&ClientError::vault_not_found("vlt_x"));
        assert!(!envelope.ok);
        assert_eq!(envelope.error.code, "vault_not_found");
        assert!(!envelope.error.recovery_steps.is_empty());
        assert_eq!(
            envelope.data.as_ref().map(|data| data["vault_id"].clone()),
            Some(json!("vlt_x"))
        );
    }
}
