//! SQLite-backed [`KnowledgeSource`].
//!
//! Opens the configured database read-only on every fetch and runs
//!
//! ```sql
//! SELECT CAST(question_pattern AS TEXT) AS question_pattern,
//!        CAST(response AS TEXT) AS response
//! FROM <table> ORDER BY [<priority>,] rowid
//! ```
//!
//! The `ORDER BY` is always explicit: match priority depends on row order,
//! and an unordered `SELECT` gives no stable order across reloads.
//! Columns are cast to text so a numeric pattern such as `2024` stored in an
//! untyped column loads as `"2024"`. NULL is not coerced: a row with a NULL
//! column fails the load.
//! Connection failures map to [`DataSourceError::Unavailable`]; failures
//! once connected (missing table or column, NULLs) map to
//! [`DataSourceError::Query`] or [`DataSourceError::InvalidRow`].

use std::path::PathBuf;

use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use chatbot_engine_core::error::{DataSourceError, SourceResult};
use chatbot_engine_core::models::RawKnowledgeRow;
use chatbot_engine_core::source::KnowledgeSource;

use crate::config::{is_valid_identifier, Config};
use crate::db;

pub struct SqliteKnowledgeSource {
    db_path: PathBuf,
    table: String,
    priority_column: Option<String>,
}

impl SqliteKnowledgeSource {
    pub fn new(db_path: PathBuf, table: String, priority_column: Option<String>) -> Self {
        Self {
            db_path,
            table,
            priority_column,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.db.path.clone(),
            config.knowledge.table.clone(),
            config.knowledge.priority_column.clone(),
        )
    }

    /// The `SELECT` issued by [`fetch_rows`](KnowledgeSource::fetch_rows).
    pub fn select_sql(&self) -> SourceResult<String> {
        if !is_valid_identifier(&self.table) {
            return Err(DataSourceError::query(
                self.describe(),
                format!("invalid table name '{}'", self.table),
            ));
        }
        let order_by = match &self.priority_column {
            Some(col) if is_valid_identifier(col) => format!("{} ASC, rowid ASC", col),
            Some(col) => {
                return Err(DataSourceError::query(
                    self.describe(),
                    format!("invalid priority column '{}'", col),
                ))
            }
            None => "rowid ASC".to_string(),
        };
        Ok(format!(
            "SELECT CAST(question_pattern AS TEXT) AS question_pattern, \
             CAST(response AS TEXT) AS response FROM {} ORDER BY {}",
            self.table, order_by
        ))
    }
}

#[async_trait]
impl KnowledgeSource for SqliteKnowledgeSource {
    fn describe(&self) -> String {
        format!("sqlite:{}#{}", self.db_path.display(), self.table)
    }

    async fn fetch_rows(&self) -> SourceResult<Vec<RawKnowledgeRow>> {
        let sql = self.select_sql()?;

        if !self.db_path.is_file() {
            return Err(DataSourceError::unavailable(
                self.describe(),
                "database file does not exist",
            ));
        }

        let pool = db::connect_read_only(&self.db_path)
            .await
            .map_err(|e| DataSourceError::unavailable(self.describe(), e.to_string()))?;

        let result = sqlx::query(&sql).fetch_all(&pool).await;
        pool.close().await;
        let rows = result.map_err(|e| DataSourceError::query(self.describe(), e.to_string()))?;

        rows.iter()
            .enumerate()
            .map(|(i, row)| -> SourceResult<RawKnowledgeRow> {
                Ok(RawKnowledgeRow {
                    question_pattern: text_column(row, i, "question_pattern")?,
                    response: text_column(row, i, "response")?,
                })
            })
            .collect()
    }
}

/// Decode a non-NULL text column. sqlx reads NULL as `""` when asked for a
/// plain `String`, so decode through `Option` and reject `None`.
fn text_column(row: &SqliteRow, index: usize, column: &str) -> SourceResult<String> {
    let value: Option<String> = row.try_get(column).map_err(|e| DataSourceError::InvalidRow {
        row: index,
        message: e.to_string(),
    })?;
    value.ok_or_else(|| DataSourceError::InvalidRow {
        row: index,
        message: format!("NULL {}", column),
    })
}
