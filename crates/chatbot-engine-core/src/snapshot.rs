//! Swappable, immutable knowledge snapshots.
//!
//! [`SharedKnowledge`] holds the current [`KnowledgeSnapshot`] behind
//! `RwLock<Arc<_>>`. Readers hold the lock only long enough to clone the
//! `Arc` and then match against a snapshot nobody can mutate. A reload
//! builds a complete new snapshot first and swaps the pointer, so a
//! concurrent reader observes either the old base or the new one.

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};

use crate::matcher::KnowledgeBase;

/// A loaded knowledge base plus when and in which load it was produced.
#[derive(Debug)]
pub struct KnowledgeSnapshot {
    base: KnowledgeBase,
    generation: u64,
    loaded_at: DateTime<Utc>,
}

impl KnowledgeSnapshot {
    pub fn base(&self) -> &KnowledgeBase {
        &self.base
    }

    /// 0 for the empty placeholder, then 1, 2, ... per successful load.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

/// Process-wide handle to the current knowledge snapshot.
#[derive(Debug)]
pub struct SharedKnowledge {
    current: RwLock<Arc<KnowledgeSnapshot>>,
}

impl SharedKnowledge {
    /// Start with an empty base at generation 0.
    pub fn empty() -> Self {
        Self {
            current: RwLock::new(Arc::new(KnowledgeSnapshot {
                base: KnowledgeBase::empty(),
                generation: 0,
                loaded_at: Utc::now(),
            })),
        }
    }

    /// The snapshot in effect right now.
    pub fn snapshot(&self) -> Arc<KnowledgeSnapshot> {
        // The guarded value is a plain Arc and is never left half-written,
        // so a poisoned lock is still safe to read.
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    /// Install `base` as the next generation and return the new snapshot.
    pub fn replace(&self, base: KnowledgeBase) -> Arc<KnowledgeSnapshot> {
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        let next = Arc::new(KnowledgeSnapshot {
            base,
            generation: guard.generation + 1,
            loaded_at: Utc::now(),
        });
        *guard = Arc::clone(&next);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::FALLBACK_RESPONSE;
    use crate::models::KnowledgeEntry;

    fn kb(pairs: &[(&str, &str)]) -> KnowledgeBase {
        pairs
            .iter()
            .map(|(p, r)| KnowledgeEntry::new(p, *r))
            .collect()
    }

    fn loaded(base: KnowledgeBase) -> SharedKnowledge {
        let shared = SharedKnowledge::empty();
        shared.replace(base);
        shared
    }

    fn answer(shared: &SharedKnowledge, query: &str) -> String {
        shared.snapshot().base().respond(query).to_string()
    }

    #[test]
    fn test_empty_starts_at_generation_zero() {
        let shared = SharedKnowledge::empty();
        let snap = shared.snapshot();
        assert_eq!(snap.generation(), 0);
        assert!(snap.base().is_empty());
        assert_eq!(answer(&shared, "hello"), FALLBACK_RESPONSE);
    }

    #[test]
    fn test_replace_bumps_generation() {
        let shared = loaded(kb(&[("hello", "Hi there!")]));
        assert_eq!(shared.snapshot().generation(), 1);

        let next = shared.replace(kb(&[("hello", "Howdy!")]));
        assert_eq!(next.generation(), 2);
        assert_eq!(answer(&shared, "hello"), "Howdy!");
    }

    #[test]
    fn test_old_snapshot_survives_replace() {
        let shared = loaded(kb(&[("hello", "Hi there!")]));
        let held = shared.snapshot();
        shared.replace(KnowledgeBase::empty());

        assert_eq!(held.base().respond("hello"), "Hi there!");
        assert_eq!(answer(&shared, "hello"), FALLBACK_RESPONSE);
    }

    #[test]
    fn test_concurrent_readers_see_whole_snapshots() {
        let shared = Arc::new(loaded(kb(&[
            ("ping", "pong-1"),
            ("ping", "unused-1"),
        ])));

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let shared = Arc::clone(&shared);
                std::thread::spawn(move || {
                    for _ in 0..500 {
                        let snap = shared.snapshot();
                        let resp = snap.base().respond("ping");
                        // Both entries of a snapshot come from the same load.
                        let suffix = resp.rsplit('-').next().unwrap().to_string();
                        assert_eq!(
                            snap.base().entries()[1].response(),
                            format!("unused-{}", suffix)
                        );
                    }
                })
            })
            .collect();

        for i in 2..50 {
            let pong = format!("pong-{}", i);
            let unused = format!("unused-{}", i);
            shared.replace(kb(&[("ping", pong.as_str()), ("ping", unused.as_str())]));
        }

        for r in readers {
            r.join().unwrap();
        }
        assert_eq!(shared.snapshot().generation(), 49);
    }
}
