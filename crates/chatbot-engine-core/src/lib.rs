//! # Chatbot Engine Core
//!
//! Runtime-independent logic for Chatbot Engine: knowledge entries, the
//! first-match substring matcher, the swappable knowledge snapshot, and the
//! [`source::KnowledgeSource`] abstraction the loader reads from.
//!
//! This crate contains no tokio, sqlx, or filesystem I/O. Backends that
//! talk to a real store live in the `chatbot-engine` application crate.

pub mod error;
pub mod matcher;
pub mod models;
pub mod snapshot;
pub mod source;
