//! Response envelope: `{body: {result}}` or `{body: {error}}`.

use serde::Serialize;
use serde_json::Value;

/// Exactly one of `result` / `error` per outcome.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    Success {
        result: Value,
    },
    Failure {
        error: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        details: Option<Value>,
    },
}

impl Outcome {
    pub fn result(result: Value) -> Self {
        Outcome::Success { result }
    }

    /// `{result: {message}}`, the confirmation shape used by every mutating verb.
    pub fn message(message: impl Into<String>) -> Self {
        Outcome::Success {
            result: serde_json::json!({ "message": message.into() }),
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        Outcome::Failure {
            error: error.into(),
            details: None,
        }
    }

    pub fn error_with_details(error: impl Into<String>, details: Value) -> Self {
        Outcome::Failure {
            error: error.into(),
            details: Some(details),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Outcome::Failure { .. })
    }

    pub fn result_value(&self) -> Option<&Value> {
        match self {
            Outcome::Success { result } => Some(result),
            Outcome::Failure { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Outcome::Success { .. } => None,
            Outcome::Failure { error, .. } => Some(error),
        }
    }
}

/// What the hosting runtime receives. The `body` wrapper is always present.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ActionResponse {
    pub body: Outcome,
}

impl ActionResponse {
    pub fn into_json(self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|e| {
            serde_json::json!({ "body": { "error": format!("response serialization: {}", e) } })
        })
    }
}

impl From<Outcome> for ActionResponse {
    fn from(body: Outcome) -> Self {
        ActionResponse { body }
    }
}
