//! POST sub-operations: schema management and the read-only ad-hoc query.

use super::{message, try_execute};
use crate::error::AppError;
use crate::response::Outcome;
use crate::store::EntityRepository;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

pub const CREATE_TABLE_ERROR: &str = "Errore durante la creazione della tabella: ";
pub const TRUNCATE_TABLE_ERROR: &str = "Errore durante il troncamento della tabella: ";
pub const DROP_TABLE_ERROR: &str = "Errore durante l'eliminazione della tabella: ";
pub const QUERY_ERROR: &str = "Errore durante l'esecuzione della query: ";

pub const NO_ROWS: &str = "La query non ha generato risultati";

pub async fn handle_create_table(repo: &dyn EntityRepository) -> Outcome {
    try_execute(CREATE_TABLE_ERROR, || async move {
        repo.create_table().await?;
        Ok::<_, AppError>(message(format!("Tabella creata: {}", repo.table_name())))
    })
    .await
}

pub async fn handle_truncate_table(repo: &dyn EntityRepository) -> Outcome {
    try_execute(TRUNCATE_TABLE_ERROR, || async move {
        repo.truncate_table().await?;
        Ok::<_, AppError>(message(format!("Tabella troncata: {}", repo.table_name())))
    })
    .await
}

pub async fn handle_drop_table(repo: &dyn EntityRepository) -> Outcome {
    try_execute(DROP_TABLE_ERROR, || async move {
        repo.drop_table().await?;
        Ok::<_, AppError>(message(format!("Tabella droppata: {}", repo.table_name())))
    })
    .await
}

fn select_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^\s*SELECT").expect("static regex"))
}

/// Lexical check only: leading whitespace, then `SELECT` in any case.
pub fn is_select_query(query: &str) -> bool {
    select_re().is_match(query)
}

/// Rejects anything that is not a SELECT before the store is reached.
pub async fn handle_execute_query(query: Option<String>, repo: &dyn EntityRepository) -> Outcome {
    try_execute(QUERY_ERROR, || async move {
        let query = query.ok_or_else(|| AppError::Validation("Query is null".into()))?;
        if !is_select_query(&query) {
            return Err(AppError::Validation("Only SELECT queries are allowed".into()));
        }
        let rows = repo.execute_query(&query).await?;
        if rows.is_empty() {
            return Ok(message(NO_ROWS.to_string()));
        }
        Ok::<_, AppError>(Value::Array(rows))
    })
    .await
}
