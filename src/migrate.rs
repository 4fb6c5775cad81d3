//! Schema creation for `chatbot init`.
//!
//! Creates the knowledge table only; no rows are written. The
//! `INTEGER PRIMARY KEY` column aliases `rowid`, so the default
//! insertion-order priority survives `VACUUM`.

use anyhow::Result;

use crate::config::Config;
use crate::db;

pub async fn run_migrations(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;

    // Identifier was validated by config::parse_config.
    let table = &config.knowledge.table;

    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {table} (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            question_pattern TEXT NOT NULL,
            response TEXT NOT NULL,
            priority INTEGER NOT NULL DEFAULT 0
        )
        "#
    ))
    .execute(&pool)
    .await?;

    sqlx::query(&format!(
        "CREATE INDEX IF NOT EXISTS idx_{table}_priority ON {table}(priority, id)"
    ))
    .execute(&pool)
    .await?;

    pool.close().await;
    Ok(())
}
