//! Entity repository contract and its implementations.

mod postgres;
#[cfg(test)]
pub(crate) mod memory;

pub use postgres::PgRepository;

use crate::entity::Record;
use crate::error::AppError;
use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

/// All persistence for the one entity table. Every call opens and releases its own connection.
#[async_trait]
pub trait EntityRepository: Send + Sync {
    /// Fixed for the repository's lifetime.
    fn table_name(&self) -> &str;

    /// Idempotent.
    async fn create_table(&self) -> Result<(), AppError>;

    /// `AppError::Schema` if the table does not exist.
    async fn truncate_table(&self) -> Result<(), AppError>;

    /// `AppError::Schema` if the table does not exist.
    async fn drop_table(&self) -> Result<(), AppError>;

    async fn get_all(&self) -> Result<Vec<Record>, AppError>;

    /// Absence is `Ok(None)`, never an error.
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Record>, AppError>;

    /// `AppError::Conflict` if the id already exists.
    async fn insert(&self, record: &Record) -> Result<Uuid, AppError>;

    /// No-op when the id does not exist.
    async fn update(&self, record: &Record) -> Result<Uuid, AppError>;

    /// Not an error when the id does not exist.
    async fn delete(&self, id: Uuid) -> Result<Uuid, AppError>;

    /// Runs exactly one statement. Read-only checking is the caller's job.
    async fn execute_query(&self, sql: &str) -> Result<Vec<Value>, AppError>;
}
