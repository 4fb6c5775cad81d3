//! TOML configuration parsing and validation.
//!
//! ```toml
//! [db]
//! path = "./data/chatbot.sqlite"
//!
//! [knowledge]
//! table = "knowledge_base"
//! priority_column = "priority"
//! on_load_error = "fail"
//! reload_interval_secs = 300
//!
//! [server]
//! bind = "127.0.0.1:8080"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    #[serde(default)]
    pub knowledge: KnowledgeConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct KnowledgeConfig {
    /// Table holding `question_pattern` / `response` rows.
    #[serde(default = "default_table")]
    pub table: String,
    /// Column ordering match priority (ascending). Ties, and the case where
    /// this is unset, fall back to `rowid` order.
    #[serde(default)]
    pub priority_column: Option<String>,
    #[serde(default)]
    pub on_load_error: LoadErrorPolicy,
    /// Reload the knowledge base in the background every N seconds.
    #[serde(default)]
    pub reload_interval_secs: Option<u64>,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            table: default_table(),
            priority_column: None,
            on_load_error: LoadErrorPolicy::default(),
            reload_interval_secs: None,
        }
    }
}

fn default_table() -> String {
    "knowledge_base".to_string()
}

/// What `serve` does when the startup load fails.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LoadErrorPolicy {
    /// Abort startup.
    #[default]
    Fail,
    /// Log a warning and serve the fallback until a reload succeeds.
    Empty,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub bind: String,
}

/// True for a plain SQL identifier: `[A-Za-z_][A-Za-z0-9_]*`.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).with_context(|| "Failed to parse config file")?;

    if !is_valid_identifier(&config.knowledge.table) {
        anyhow::bail!(
            "knowledge.table must be a plain identifier, got '{}'",
            config.knowledge.table
        );
    }

    if let Some(col) = &config.knowledge.priority_column {
        if !is_valid_identifier(col) {
            anyhow::bail!(
                "knowledge.priority_column must be a plain identifier, got '{}'",
                col
            );
        }
    }

    if config.knowledge.reload_interval_secs == Some(0) {
        anyhow::bail!("knowledge.reload_interval_secs must be > 0");
    }

    if config.server.bind.trim().is_empty() {
        anyhow::bail!("server.bind must not be empty");
    }

    Ok(config)
}
