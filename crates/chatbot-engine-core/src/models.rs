//! Core data models for the knowledge base.

use serde::Serialize;

/// A row exactly as the backing store returned it, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawKnowledgeRow {
    pub question_pattern: String,
    pub response: String,
}

impl RawKnowledgeRow {
    pub fn new(question_pattern: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            question_pattern: question_pattern.into(),
            response: response.into(),
        }
    }
}

/// One matching rule: a lowercase pattern and the response it yields.
///
/// Entries are immutable. The only way to build one is [`KnowledgeEntry::new`],
/// which lowercases the pattern, so every entry in a knowledge base satisfies
/// the lowercase invariant the matcher relies on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KnowledgeEntry {
    pattern: String,
    response: String,
}

impl KnowledgeEntry {
    /// Lowercases `pattern`; `response` is kept verbatim.
    pub fn new(pattern: &str, response: impl Into<String>) -> Self {
        Self {
            pattern: pattern.to_lowercase(),
            response: response.into(),
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn response(&self) -> &str {
        &self.response
    }
}

impl From<RawKnowledgeRow> for KnowledgeEntry {
    fn from(row: RawKnowledgeRow) -> Self {
        Self::new(&row.question_pattern, row.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_is_lowercased() {
        let entry = KnowledgeEntry::new("Opening HOURS", "We open at 9.");
        assert_eq!(entry.pattern(), "opening hours");
    }

    #[test]
    fn test_response_is_verbatim() {
        let entry = KnowledgeEntry::new("hours", "  We OPEN at 9!  ");
        assert_eq!(entry.response(), "  We OPEN at 9!  ");
    }

    #[test]
    fn test_pattern_whitespace_is_kept() {
        // Only case is normalized on patterns.
        let entry = KnowledgeEntry::new(" Hi ", "Hello!");
        assert_eq!(entry.pattern(), " hi ");
    }

    #[test]
    fn test_from_raw_row() {
        let entry: KnowledgeEntry = RawKnowledgeRow::new("BYE", "Goodbye!").into();
        assert_eq!(entry.pattern(), "bye");
        assert_eq!(entry.response(), "Goodbye!");
    }
}
