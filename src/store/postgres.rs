//! PostgreSQL repository. One connection per operation, no pool.

use super::EntityRepository;
use crate::config::RepositoryConfig;
use crate::entity::Record;
use crate::error::AppError;
use crate::sql::TableStatements;
use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::{PgConnectOptions, PgConnection, PgRow};
use sqlx::{ConnectOptions, Connection, Row};
use uuid::Uuid;

pub struct PgRepository {
    options: PgConnectOptions,
    statements: TableStatements,
}

impl PgRepository {
    /// Pure: validates the table name and prepares connection options, no I/O.
    pub fn new(config: &RepositoryConfig) -> Result<Self, AppError> {
        let statements = TableStatements::for_action(&config.action_name)?;
        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .database(&config.database)
            .username(&config.user)
            .password(&config.password);
        Ok(PgRepository { options, statements })
    }

    async fn connect(&self) -> Result<PgConnection, AppError> {
        Ok(self.options.connect().await?)
    }

    /// Run a statement without result rows. The connection is released on every path.
    async fn execute(&self, sql: &str) -> Result<u64, AppError> {
        tracing::debug!(sql = %sql, table = %self.table_name(), "query");
        let mut conn = self.connect().await?;
        let result = sqlx::query(sql).execute(&mut conn).await;
        release(conn).await;
        Ok(result?.rows_affected())
    }

    async fn write_record(&self, sql: &str, record: &Record) -> Result<u64, AppError> {
        tracing::debug!(sql = %sql, table = %self.table_name(), id = %record.id, "query");
        let mut conn = self.connect().await?;
        let result = sqlx::query(sql)
            .bind(record.id)
            .bind(record.descr.as_deref())
            .bind(record.enabled)
            .bind(record.upd_date)
            .execute(&mut conn)
            .await;
        release(conn).await;
        Ok(result?.rows_affected())
    }
}

async fn release(conn: PgConnection) {
    if let Err(e) = conn.close().await {
        tracing::debug!(error = %e, "connection close failed");
    }
}

#[async_trait]
impl EntityRepository for PgRepository {
    fn table_name(&self) -> &str {
        self.statements.table()
    }

    async fn create_table(&self) -> Result<(), AppError> {
        self.execute(&self.statements.create_table()).await?;
        Ok(())
    }

    async fn truncate_table(&self) -> Result<(), AppError> {
        self.execute(&self.statements.truncate_table()).await?;
        Ok(())
    }

    async fn drop_table(&self) -> Result<(), AppError> {
        self.execute(&self.statements.drop_table()).await?;
        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<Record>, AppError> {
        let sql = self.statements.select_all();
        tracing::debug!(sql = %sql, table = %self.table_name(), "query");
        let mut conn = self.connect().await?;
        let rows = sqlx::query(&sql).fetch_all(&mut conn).await;
        release(conn).await;
        rows?.iter().map(record_from_row).collect()
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Record>, AppError> {
        let sql = self.statements.select_by_id();
        tracing::debug!(sql = %sql, table = %self.table_name(), id = %id, "query");
        let mut conn = self.connect().await?;
        let row = sqlx::query(&sql).bind(id).fetch_optional(&mut conn).await;
        release(conn).await;
        row?.as_ref().map(record_from_row).transpose()
    }

    async fn insert(&self, record: &Record) -> Result<Uuid, AppError> {
        self.write_record(&self.statements.insert(), record).await?;
        Ok(record.id)
    }

    async fn update(&self, record: &Record) -> Result<Uuid, AppError> {
        self.write_record(&self.statements.update(), record).await?;
        Ok(record.id)
    }

    async fn delete(&self, id: Uuid) -> Result<Uuid, AppError> {
        let sql = self.statements.delete();
        tracing::debug!(sql = %sql, table = %self.table_name(), id = %id, "query");
        let mut conn = self.connect().await?;
        let result = sqlx::query(&sql).bind(id).execute(&mut conn).await;
        release(conn).await;
        result?;
        Ok(id)
    }

    async fn execute_query(&self, sql: &str) -> Result<Vec<Value>, AppError> {
        tracing::debug!(sql = %sql, table = %self.table_name(), "ad-hoc query");
        let mut conn = self.connect().await?;
        let rows = sqlx::query(sql).fetch_all(&mut conn).await;
        release(conn).await;
        Ok(rows?.iter().map(row_to_json).collect())
    }
}

fn record_from_row(row: &PgRow) -> Result<Record, AppError> {
    Ok(Record {
        id: row.try_get("id")?,
        descr: row.try_get("descr")?,
        enabled: row.try_get("enabled")?,
        upd_date: row.try_get("upddate")?,
    })
}

fn row_to_json(row: &PgRow) -> Value {
    use sqlx::Column;
    let mut map = serde_json::Map::new();
    for col in row.columns() {
        let name = col.name();
        map.insert(name.to_string(), cell_to_value(row, name));
    }
    Value::Object(map)
}

/// Loosely typed cell decoding: first type that decodes wins, SQL NULL and unknown types become `null`.
fn cell_to_value(row: &PgRow, name: &str) -> Value {
    if let Ok(Some(n)) = row.try_get::<Option<i16>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<i32>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<i64>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<f32>, _>(name) {
        if let Some(n) = serde_json::Number::from_f64(n as f64) {
            return Value::Number(n);
        }
    }
    if let Ok(Some(n)) = row.try_get::<Option<f64>, _>(name) {
        if let Some(n) = serde_json::Number::from_f64(n) {
            return Value::Number(n);
        }
    }
    if let Ok(Some(b)) = row.try_get::<Option<bool>, _>(name) {
        return Value::Bool(b);
    }
    if let Ok(Some(u)) = row.try_get::<Option<Uuid>, _>(name) {
        return Value::String(u.to_string());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(name) {
        return Value::String(d.to_rfc3339());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::NaiveDateTime>, _>(name) {
        return Value::String(d.format("%Y-%m-%dT%H:%M:%S%.f").to_string());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::NaiveDate>, _>(name) {
        return Value::String(d.format("%Y-%m-%d").to_string());
    }
    if let Ok(Some(s)) = row.try_get::<Option<String>, _>(name) {
        return Value::String(s);
    }
    if let Ok(Some(j)) = row.try_get::<Option<Value>, _>(name) {
        return j;
    }
    Value::Null
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(action: &str) -> RepositoryConfig {
        RepositoryConfig {
            host: "localhost".into(),
            port: 5432,
            database: "nuvolaris".into(),
            user: "u".into(),
            password: "p".into(),
            action_name: action.into(),
        }
    }

    #[test]
    fn table_name_fixed_at_construction() {
        let repo = PgRepository::new(&config("PrototipeFNC")).unwrap();
        assert_eq!(repo.table_name(), "PrototipeFNC_Dto");
    }

    #[test]
    fn construction_rejects_unsafe_action_name() {
        assert!(PgRepository::new(&config("a b")).is_err());
    }
}
