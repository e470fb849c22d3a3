//! Verb handlers: one repository operation each, uniform success/error shaping.

pub mod admin;
pub mod verbs;
pub use admin::*;
pub use verbs::*;

use crate::error::AppError;
use crate::response::Outcome;
use serde_json::Value;
use std::future::Future;

/// Error text when the record payload could not be cast.
pub const NULL_DTO: &str = "Il DTO è nullo";

/// Runs `op` and turns its failure into `{error: "<prefix><message>"}`.
pub(crate) async fn try_execute<F, Fut>(error_prefix: &str, op: F) -> Outcome
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Value, AppError>>,
{
    match op().await {
        Ok(result) => Outcome::result(result),
        Err(e) => {
            tracing::warn!(error = %e, "{}", error_prefix.trim_end_matches(": "));
            Outcome::error(format!("{}{}", error_prefix, e))
        }
    }
}

pub(crate) fn message(text: String) -> Value {
    serde_json::json!({ "message": text })
}
