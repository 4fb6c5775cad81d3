//! Knowledge source abstraction and the loader built on it.
//!
//! A [`KnowledgeSource`] returns raw `(question_pattern, response)` rows in
//! match-priority order. [`load`] turns those rows into a [`KnowledgeBase`],
//! lowercasing every pattern and keeping responses and order untouched.
//! No filtering, dedup, or emptiness checks happen here.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{DataSourceError, SourceResult};
use crate::matcher::KnowledgeBase;
use crate::models::{KnowledgeEntry, RawKnowledgeRow};

/// Read-only backing store for knowledge rows.
///
/// Implementations must be `Send + Sync` so a single source can be shared
/// between the startup load and later reloads.
#[async_trait]
pub trait KnowledgeSource: Send + Sync {
    /// Human-readable name for logs and error messages.
    fn describe(&self) -> String;

    /// Fetch every row, in the order that decides match priority.
    async fn fetch_rows(&self) -> SourceResult<Vec<RawKnowledgeRow>>;
}

/// Load a [`KnowledgeBase`] from `source`.
pub async fn load(source: &dyn KnowledgeSource) -> SourceResult<KnowledgeBase> {
    let rows = source.fetch_rows().await?;
    Ok(rows.into_iter().map(KnowledgeEntry::from).collect())
}

/// In-memory [`KnowledgeSource`] for tests and embedding.
///
/// Rows can be swapped at runtime with [`InMemorySource::set_rows`], and the
/// source can be switched into a failing state to exercise error paths.
pub struct InMemorySource {
    name: String,
    state: Mutex<InMemoryState>,
}

struct InMemoryState {
    rows: Vec<RawKnowledgeRow>,
    unavailable: Option<String>,
}

impl InMemorySource {
    pub fn new(rows: Vec<RawKnowledgeRow>) -> Self {
        Self {
            name: "memory".to_string(),
            state: Mutex::new(InMemoryState {
                rows,
                unavailable: None,
            }),
        }
    }

    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self::new(
            pairs
                .iter()
                .map(|(p, r)| RawKnowledgeRow::new(*p, *r))
                .collect(),
        )
    }

    pub fn set_rows(&self, rows: Vec<RawKnowledgeRow>) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.rows = rows;
    }

    /// Make subsequent fetches fail with [`DataSourceError::Unavailable`].
    /// Pass `None` to restore the source.
    pub fn set_unavailable(&self, reason: Option<&str>) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.unavailable = reason.map(str::to_string);
    }
}

#[async_trait]
impl KnowledgeSource for InMemorySource {
    fn describe(&self) -> String {
        self.name.clone()
    }

    async fn fetch_rows(&self) -> SourceResult<Vec<RawKnowledgeRow>> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(reason) = &state.unavailable {
            return Err(DataSourceError::unavailable(&self.name, reason.clone()));
        }
        Ok(state.rows.clone())
    }
}
