//! First-match substring matcher.
//!
//! # Algorithm
//!
//! 1. Normalize the query: lowercase, then trim surrounding whitespace.
//! 2. Walk the knowledge base in stored order.
//! 3. Return the response of the first entry whose pattern is a contiguous
//!    substring of the normalized query.
//! 4. If nothing matches, return [`FALLBACK_RESPONSE`].
//!
//! There is no ranking and no index: the scan is `O(entries × query length)`.
//! An empty pattern is a substring of every query and therefore matches
//! everything that reaches it.

use crate::models::KnowledgeEntry;

/// Returned when no pattern matches the query.
pub const FALLBACK_RESPONSE: &str =
    "I apologize, I didn't find a direct answer. Can you rephrase your question?";

/// Lowercase and trim a user query. No other normalization is applied.
pub fn normalize_query(query: &str) -> String {
    query.to_lowercase().trim().to_string()
}

/// Ordered, read-only sequence of [`KnowledgeEntry`] values.
///
/// Order is match priority: the earliest matching entry wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnowledgeBase {
    entries: Vec<KnowledgeEntry>,
}

impl KnowledgeBase {
    pub fn new(entries: Vec<KnowledgeEntry>) -> Self {
        Self { entries }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[KnowledgeEntry] {
        &self.entries
    }

    /// Find the first entry matching `query`, with its position in the base.
    ///
    /// `query` is normalized here; callers pass raw user input.
    pub fn find_match(&self, query: &str) -> Option<(usize, &KnowledgeEntry)> {
        let normalized = normalize_query(query);
        self.entries
            .iter()
            .enumerate()
            .find(|(_, entry)| normalized.contains(entry.pattern()))
    }

    /// Answer `query`. Never fails: falls back to [`FALLBACK_RESPONSE`].
    pub fn respond(&self, query: &str) -> &str {
        self.find_match(query)
            .map(|(_, entry)| entry.response())
            .unwrap_or(FALLBACK_RESPONSE)
    }
}

impl FromIterator<KnowledgeEntry> for KnowledgeBase {
    fn from_iter<I: IntoIterator<Item = KnowledgeEntry>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
