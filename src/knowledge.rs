//! Knowledge service: the loader and the matcher wired together.
//!
//! [`KnowledgeService`] owns a [`KnowledgeSource`] and the
//! [`SharedKnowledge`] snapshot that request handlers read from. It applies
//! the startup [`LoadErrorPolicy`], performs reloads by building a fresh
//! base and swapping it in, and optionally runs a periodic reload task.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;

use chatbot_engine_core::error::DataSourceError;
use chatbot_engine_core::matcher::FALLBACK_RESPONSE;
use chatbot_engine_core::snapshot::{KnowledgeSnapshot, SharedKnowledge};
use chatbot_engine_core::source::{self, KnowledgeSource};

use crate::config::{Config, LoadErrorPolicy};
use crate::sqlite_source::SqliteKnowledgeSource;

/// Outcome of a successful load or reload.
#[derive(Debug, Clone, Serialize)]
pub struct ReloadReport {
    pub entries: usize,
    pub generation: u64,
    pub duration_ms: u64,
}

pub struct KnowledgeService {
    source: Arc<dyn KnowledgeSource>,
    knowledge: SharedKnowledge,
    /// Serializes reloads so an older fetch never overwrites a newer one.
    reload_lock: tokio::sync::Mutex<()>,
}

impl KnowledgeService {
    /// A service with an empty knowledge base. Call [`initialize`](Self::initialize)
    /// or [`reload`](Self::reload) to populate it.
    pub fn new(source: Arc<dyn KnowledgeSource>) -> Self {
        Self {
            source,
            knowledge: SharedKnowledge::empty(),
            reload_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(Arc::new(SqliteKnowledgeSource::from_config(config)))
    }

    /// Perform the startup load.
    ///
    /// With [`LoadErrorPolicy::Fail`] a load error is returned to the caller.
    /// With [`LoadErrorPolicy::Empty`] it is logged and the service keeps
    /// serving from an empty base.
    pub async fn initialize(&self, policy: LoadErrorPolicy) -> Result<(), DataSourceError> {
        match self.reload().await {
            Ok(_) => Ok(()),
            Err(e) if policy == LoadErrorPolicy::Empty => {
                tracing::warn!(
                    source = %self.source.describe(),
                    error = %e,
                    "knowledge load failed, starting with an empty knowledge base"
                );
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Load a fresh knowledge base and swap it in.
    ///
    /// On failure the current snapshot stays in place.
    pub async fn reload(&self) -> Result<ReloadReport, DataSourceError> {
        let _guard = self.reload_lock.lock().await;
        let started = Instant::now();
        let base = source::load(self.source.as_ref()).await?;
        let entries = base.len();
        let snapshot = self.knowledge.replace(base);
        let report = ReloadReport {
            entries,
            generation: snapshot.generation(),
            duration_ms: started.elapsed().as_millis() as u64,
        };
        tracing::info!(
            source = %self.source.describe(),
            entries = report.entries,
            generation = report.generation,
            duration_ms = report.duration_ms,
            "knowledge base loaded"
        );
        Ok(report)
    }

    pub fn snapshot(&self) -> Arc<KnowledgeSnapshot> {
        self.knowledge.snapshot()
    }

    /// Answer `query` from the current snapshot. Never fails.
    pub fn respond(&self, query: &str) -> String {
        let snapshot = self.knowledge.snapshot();
        match snapshot.base().find_match(query) {
            Some((index, entry)) => {
                tracing::debug!(index, pattern = entry.pattern(), "query matched");
                entry.response().to_string()
            }
            None => {
                tracing::debug!("no pattern matched, using fallback");
                FALLBACK_RESPONSE.to_string()
            }
        }
    }

    pub fn source_name(&self) -> String {
        self.source.describe()
    }
}

/// Reload `service` every `interval` until the returned task is aborted.
///
/// Failed reloads are logged and the previous snapshot is kept.
pub fn spawn_periodic_reload(
    service: Arc<KnowledgeService>,
    interval: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately; startup already loaded.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if let Err(e) = service.reload().await {
                tracing::warn!(error = %e, "periodic knowledge reload failed, keeping previous snapshot");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatbot_engine_core::models::RawKnowledgeRow;
    use chatbot_engine_core::source::InMemorySource;

    fn service_with(source: Arc<InMemorySource>) -> KnowledgeService {
        KnowledgeService::new(source)
    }

    #[tokio::test]
    async fn test_initialize_loads_entries() {
        let src = Arc::new(InMemorySource::from_pairs(&[
            ("hello", "Hi there!"),
            ("bye", "Goodbye!"),
        ]));
        let svc = service_with(src);
        svc.initialize(LoadErrorPolicy::Fail).await.unwrap();
        assert_eq!(svc.snapshot().base().len(), 2);
        assert_eq!(svc.respond("Hello, how are you?"), "Hi there!");
        assert_eq!(svc.respond("goodbye friend"), "Goodbye!");
        assert_eq!(svc.respond("what is the weather"), FALLBACK_RESPONSE);
    }

    #[tokio::test]
    async fn test_fail_policy_propagates_error() {
        let src = Arc::new(InMemorySource::from_pairs(&[("hello", "Hi there!")]));
        src.set_unavailable(Some("down"));
        let svc = service_with(src);
        let err = svc.initialize(LoadErrorPolicy::Fail).await.unwrap_err();
        assert!(matches!(err, DataSourceError::Unavailable { .. }));
    }

    #[tokio::test]
    async fn test_empty_policy_serves_fallback() {
        let src = Arc::new(InMemorySource::from_pairs(&[("hello", "Hi there!")]));
        src.set_unavailable(Some("down"));
        let svc = service_with(src.clone());
        svc.initialize(LoadErrorPolicy::Empty).await.unwrap();
        assert_eq!(svc.snapshot().generation(), 0);
        assert_eq!(svc.respond("hello"), FALLBACK_RESPONSE);

        src.set_unavailable(None);
        let report = svc.reload().await.unwrap();
        assert_eq!(report.generation, 1);
        assert_eq!(svc.respond("hello"), "Hi there!");
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_previous_snapshot() {
        let src = Arc::new(InMemorySource::from_pairs(&[("hello", "Hi there!")]));
        let svc = service_with(src.clone());
        svc.initialize(LoadErrorPolicy::Fail).await.unwrap();

        src.set_unavailable(Some("down"));
        assert!(svc.reload().await.is_err());
        assert_eq!(svc.snapshot().generation(), 1);
        assert_eq!(svc.respond("hello"), "Hi there!");
    }

    #[tokio::test]
    async fn test_reload_picks_up_new_rows() {
        let src = Arc::new(InMemorySource::from_pairs(&[("hello", "Hi there!")]));
        let svc = service_with(src.clone());
        svc.initialize(LoadErrorPolicy::Fail).await.unwrap();

        src.set_rows(vec![
            RawKnowledgeRow::new("HELLO", "Welcome back!"),
            RawKnowledgeRow::new("refund", "Refunds take 5 days."),
        ]);
        let report = svc.reload().await.unwrap();
        assert_eq!(report.entries, 2);
        assert_eq!(report.generation, 2);
        assert_eq!(svc.respond("hello"), "Welcome back!");
        assert_eq!(svc.respond("Refund?"), "Refunds take 5 days.");
    }

    #[tokio::test(start_paused = true)]
    async fn test_periodic_reload() {
        let src = Arc::new(InMemorySource::from_pairs(&[("hello", "Hi there!")]));
        let svc = Arc::new(service_with(src.clone()));
        svc.initialize(LoadErrorPolicy::Fail).await.unwrap();

        let handle = spawn_periodic_reload(svc.clone(), Duration::from_secs(30));
        src.set_rows(vec![RawKnowledgeRow::new("hello", "Updated!")]);

        tokio::time::sleep(Duration::from_secs(31)).await;
        tokio::task::yield_now().await;
        assert_eq!(svc.respond("hello"), "Updated!");
        assert!(svc.snapshot().generation() >= 2);

        handle.abort();
    }
}
