//! Typed errors and their mapping onto the response envelope.

use std::fmt;
use std::panic::Location;
use thiserror::Error;

/// SQLSTATE for `unique_violation`.
const PG_UNIQUE_VIOLATION: &str = "23505";
/// SQLSTATE for `undefined_table`.
const PG_UNDEFINED_TABLE: &str = "42P01";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid setting {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
    #[error("config load: {0}")]
    Load(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Schema(String),
    #[error("database: {0}")]
    Db(sqlx::Error),
    #[error("gateway: {0}")]
    Gateway(String),
    #[error("body transformation template not configured (set APISIX_BODY_TEMPLATE or APISIX_BODY_TEMPLATE_PATH)")]
    TemplateMissing,
}

impl From<sqlx::Error> for AppError {
    /// Constraint and missing-table failures get their own variants; the rest stay `Db`.
    fn from(e: sqlx::Error) -> Self {
        let code = e
            .as_database_error()
            .and_then(|d| d.code())
            .map(|c| c.into_owned());
        match code.as_deref() {
            Some(PG_UNIQUE_VIOLATION) => AppError::Conflict(database_message(&e)),
            Some(PG_UNDEFINED_TABLE) => AppError::Schema(database_message(&e)),
            _ => AppError::Db(e),
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::Gateway(e.to_string())
    }
}

fn database_message(e: &sqlx::Error) -> String {
    e.as_database_error()
        .map(|d| d.message().to_string())
        .unwrap_or_else(|| e.to_string())
}

/// An error that escaped to the top of an invocation, tagged with the place it was propagated from.
#[derive(Debug)]
pub struct ActionFailure {
    pub error: AppError,
    pub location: &'static Location<'static>,
}

impl ActionFailure {
    pub fn line(&self) -> u32 {
        self.location.line()
    }
}

impl From<AppError> for ActionFailure {
    #[track_caller]
    fn from(error: AppError) -> Self {
        ActionFailure {
            error,
            location: Location::caller(),
        }
    }
}

impl From<ConfigError> for ActionFailure {
    #[track_caller]
    fn from(error: ConfigError) -> Self {
        ActionFailure {
            error: AppError::Config(error),
            location: Location::caller(),
        }
    }
}

impl fmt::Display for ActionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Error during action execution: {}, line: {}",
            self.error,
            self.line()
        )
    }
}
