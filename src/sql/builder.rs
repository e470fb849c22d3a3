//! Builds the fixed statement set for one entity table.

use crate::config::is_plain_identifier;
use crate::entity::ENTITY_TABLE_SUFFIX;
use crate::error::AppError;

/// Statements for `<action>_Dto`. The name is left unquoted so ad-hoc queries can refer to it
/// the same way (PostgreSQL folds it to lower case).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableStatements {
    table: String,
}

impl TableStatements {
    /// Fails if the derived table name is not a plain identifier.
    pub fn for_action(action_name: &str) -> Result<Self, AppError> {
        let table = format!("{}{}", action_name, ENTITY_TABLE_SUFFIX);
        if !is_plain_identifier(&table) {
            return Err(AppError::Validation(format!(
                "invalid table name derived from action '{}'",
                action_name
            )));
        }
        Ok(TableStatements { table })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn create_table(&self) -> String {
        format!(
            "CREATE TABLE IF NOT EXISTS {} (Id UUID PRIMARY KEY, Descr TEXT, Enabled BOOLEAN, UpdDate TIMESTAMP)",
            self.table
        )
    }

    pub fn truncate_table(&self) -> String {
        format!("TRUNCATE TABLE {}", self.table)
    }

    pub fn drop_table(&self) -> String {
        format!("DROP TABLE {}", self.table)
    }

    pub fn select_all(&self) -> String {
        format!("SELECT Id, Descr, Enabled, UpdDate FROM {}", self.table)
    }

    /// Binds: `$1` id.
    pub fn select_by_id(&self) -> String {
        format!("SELECT Id, Descr, Enabled, UpdDate FROM {} WHERE Id = $1", self.table)
    }

    /// Binds: `$1` id, `$2` descr, `$3` enabled, `$4` upd_date.
    pub fn insert(&self) -> String {
        format!(
            "INSERT INTO {} (Id, Descr, Enabled, UpdDate) VALUES ($1, $2, $3, $4)",
            self.table
        )
    }

    /// Binds: `$1` id, `$2` descr, `$3` enabled, `$4` upd_date.
    pub fn update(&self) -> String {
        format!(
            "UPDATE {} SET Descr = $2, Enabled = $3, UpdDate = $4 WHERE Id = $1",
            self.table
        )
    }

    /// Binds: `$1` id.
    pub fn delete(&self) -> String {
        format!("DELETE FROM {} WHERE Id = $1", self.table)
    }
}
