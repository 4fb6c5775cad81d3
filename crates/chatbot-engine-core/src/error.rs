//! Knowledge source error types.

/// Failure while loading rows from a backing knowledge store.
///
/// This is the only error the core can produce: matching itself is total.
#[derive(Debug, thiserror::Error)]
pub enum DataSourceError {
    /// The store could not be reached or opened.
    #[error("knowledge source '{source_name}' is unavailable: {message}")]
    Unavailable {
        source_name: String,
        message: String,
    },

    /// The store was reachable but the query failed.
    #[error("knowledge query against '{source_name}' failed: {message}")]
    Query {
        source_name: String,
        message: String,
    },

    /// A returned row could not be decoded into a pattern/response pair.
    #[error("knowledge row {row} is invalid: {message}")]
    InvalidRow { row: usize, message: String },
}

impl DataSourceError {
    pub fn unavailable(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unavailable {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    pub fn query(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Query {
            source_name: source_name.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for knowledge source operations.
pub type SourceResult<T> = Result<T, DataSourceError>;
