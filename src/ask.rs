//! One-shot question answering for `chatbot ask`.
//!
//! Loads the knowledge base once, answers a single query, and prints the
//! response. With `--explain`, also prints the normalized query and which
//! entry (if any) produced the answer.

use anyhow::{Context, Result};

use chatbot_engine_core::matcher::{normalize_query, FALLBACK_RESPONSE};
use chatbot_engine_core::source;

use crate::config::Config;
use crate::sqlite_source::SqliteKnowledgeSource;

pub async fn run_ask(config: &Config, query: &str, explain: bool) -> Result<()> {
    let store = SqliteKnowledgeSource::from_config(config);
    let kb = source::load(&store)
        .await
        .context("Failed to load knowledge base")?;

    let matched = kb.find_match(query);

    if explain {
        println!("query:      {:?}", normalize_query(query));
        match matched {
            Some((index, entry)) => {
                println!("matched:    #{} pattern {:?}", index, entry.pattern())
            }
            None => println!("matched:    no match (fallback)"),
        }
        println!("entries:    {}", kb.len());
        println!();
    }

    let response = matched
        .map(|(_, entry)| entry.response())
        .unwrap_or(FALLBACK_RESPONSE);
    println!("{}", response);

    Ok(())
}
