//! In-process repository for tests. Counts calls per operation.

use super::EntityRepository;
use crate::entity::Record;
use crate::error::AppError;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
struct Inner {
    table_exists: bool,
    rows: HashMap<Uuid, Record>,
    calls: HashMap<&'static str, usize>,
    query_rows: Vec<Value>,
}

pub struct MemoryRepository {
    table: String,
    inner: Mutex<Inner>,
}

impl MemoryRepository {
    /// Starts with the table already created.
    pub fn new(table: &str) -> Self {
        MemoryRepository {
            table: table.to_string(),
            inner: Mutex::new(Inner {
                table_exists: true,
                ..Inner::default()
            }),
        }
    }

    pub fn without_table(table: &str) -> Self {
        MemoryRepository {
            table: table.to_string(),
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Rows returned by `execute_query`.
    pub fn with_query_rows(self, rows: Vec<Value>) -> Self {
        self.inner.lock().unwrap().query_rows = rows;
        self
    }

    pub fn calls(&self, op: &str) -> usize {
        self.inner.lock().unwrap().calls.get(op).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.inner.lock().unwrap().calls.values().sum()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().rows.len()
    }

    fn enter(&self, op: &'static str) -> std::sync::MutexGuard<'_, Inner> {
        let mut inner = self.inner.lock().unwrap();
        *inner.calls.entry(op).or_insert(0) += 1;
        inner
    }

    fn missing_table(&self) -> AppError {
        AppError::Schema(format!("relation \"{}\" does not exist", self.table.to_lowercase()))
    }
}

#[async_trait]
impl EntityRepository for MemoryRepository {
    fn table_name(&self) -> &str {
        &self.table
    }

    async fn create_table(&self) -> Result<(), AppError> {
        self.enter("create_table").table_exists = true;
        Ok(())
    }

    async fn truncate_table(&self) -> Result<(), AppError> {
        let mut inner = self.enter("truncate_table");
        if !inner.table_exists {
            return Err(self.missing_table());
        }
        inner.rows.clear();
        Ok(())
    }

    async fn drop_table(&self) -> Result<(), AppError> {
        let mut inner = self.enter("drop_table");
        if !inner.table_exists {
            return Err(self.missing_table());
        }
        inner.table_exists = false;
        inner.rows.clear();
        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<Record>, AppError> {
        let inner = self.enter("get_all");
        if !inner.table_exists {
            return Err(self.missing_table());
        }
        Ok(inner.rows.values().cloned().collect())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Record>, AppError> {
        let inner = self.enter("get_by_id");
        if !inner.table_exists {
            return Err(self.missing_table());
        }
        Ok(inner.rows.get(&id).cloned())
    }

    async fn insert(&self, record: &Record) -> Result<Uuid, AppError> {
        let mut inner = self.enter("insert");
        if !inner.table_exists {
            return Err(self.missing_table());
        }
        if inner.rows.contains_key(&record.id) {
            return Err(AppError::Conflict(format!(
                "duplicate key value violates unique constraint \"{}_pkey\"",
                self.table.to_lowercase()
            )));
        }
        inner.rows.insert(record.id, record.clone());
        Ok(record.id)
    }

    async fn update(&self, record: &Record) -> Result<Uuid, AppError> {
        let mut inner = self.enter("update");
        if !inner.table_exists {
            return Err(self.missing_table());
        }
        if let Some(existing) = inner.rows.get_mut(&record.id) {
            *existing = record.clone();
        }
        Ok(record.id)
    }

    async fn delete(&self, id: Uuid) -> Result<Uuid, AppError> {
        let mut inner = self.enter("delete");
        if !inner.table_exists {
            return Err(self.missing_table());
        }
        inner.rows.remove(&id);
        Ok(id)
    }

    async fn execute_query(&self, _sql: &str) -> Result<Vec<Value>, AppError> {
        let inner = self.enter("execute_query");
        Ok(inner.query_rows.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn insert_then_get_returns_equal_record() {
        let repo = MemoryRepository::new("T_Dto");
        let r = Record::new(Some("a".into()));
        repo.insert(&r).await.unwrap();
        assert_eq!(repo.get_by_id(r.id).await.unwrap(), Some(r));
    }

    #[tokio::test]
    async fn delete_absent_is_ok_and_stays_absent() {
        let repo = MemoryRepository::new("T_Dto");
        let id = Uuid::new_v4();
        assert_eq!(repo.delete(id).await.unwrap(), id);
        assert!(repo.get_by_id(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_absent_is_noop() {
        let repo = MemoryRepository::new("T_Dto");
        repo.update(&Record::new(None)).await.unwrap();
        assert_eq!(repo.len(), 0);
    }

    #[tokio::test]
    async fn duplicate_insert_conflicts() {
        let repo = MemoryRepository::new("T_Dto");
        let r = Record::new(None);
        repo.insert(&r).await.unwrap();
        assert!(matches!(repo.insert(&r).await, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn schema_ops_on_missing_table_fail() {
        let repo = MemoryRepository::without_table("T_Dto");
        assert!(matches!(repo.truncate_table().await, Err(AppError::Schema(_))));
        assert!(matches!(repo.drop_table().await, Err(AppError::Schema(_))));
        repo.create_table().await.unwrap();
        repo.create_table().await.unwrap();
        assert!(repo.get_all().await.unwrap().is_empty());
    }
}
