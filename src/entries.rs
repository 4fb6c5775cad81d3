//! Knowledge base listing for `chatbot entries`.
//!
//! Prints entries in match-priority order, which is the order the matcher
//! scans them in. Useful for checking why one rule shadows another.

use anyhow::{Context, Result};

use chatbot_engine_core::source::{self, KnowledgeSource};

use crate::config::Config;
use crate::sqlite_source::SqliteKnowledgeSource;

pub async fn run_entries(config: &Config, json: bool) -> Result<()> {
    let store = SqliteKnowledgeSource::from_config(config);
    let kb = source::load(&store)
        .await
        .context("Failed to load knowledge base")?;

    if json {
        println!("{}", serde_json::to_string_pretty(kb.entries())?);
        return Ok(());
    }

    println!("{:>5}  {:<32} RESPONSE", "#", "PATTERN");
    for (i, entry) in kb.entries().iter().enumerate() {
        println!(
            "{:>5}  {:<32} {}",
            i,
            format!("{:?}", entry.pattern()),
            truncate(entry.response(), 60)
        );
    }
    println!();
    println!("{} entries from {}", kb.len(), store.describe());

    Ok(())
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        out.push_str("...");
        out
    }
}
