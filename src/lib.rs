//! # Chatbot Engine
//!
//! A rule-based question-answering service. A small table of
//! `(question_pattern, response)` rows is loaded from SQLite into memory;
//! each query is lowercased and trimmed, and the response of the first row
//! whose pattern is a substring of the query is returned. If nothing
//! matches, a fixed fallback message is returned instead.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐  load   ┌──────────────────┐  Arc snapshot  ┌──────────┐
//! │  SQLite  │────────▶│ KnowledgeService │───────────────▶│   HTTP   │
//! │  table   │ (reload)│  (swap on load)  │                │ /respond │
//! └──────────┘         └──────────────────┘                └──────────┘
//! ```
//!
//! The matcher, snapshot holder, and source trait live in
//! `chatbot-engine-core`; this crate adds the SQLite source, configuration,
//! the HTTP server, and the `chatbot` CLI.
//!
//! ## Quick Start
//!
//! ```bash
//! chatbot init                        # create database and table
//! sqlite3 data/chatbot.sqlite \
//!   "INSERT INTO knowledge_base (question_pattern, response) VALUES ('hello', 'Hi there!')"
//! chatbot ask "Hello, how are you?"   # -> Hi there!
//! chatbot serve                       # start HTTP server
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`db`] | Database connections |
//! | [`migrate`] | Schema creation |
//! | [`sqlite_source`] | SQLite knowledge source |
//! | [`knowledge`] | Load, reload, and respond |
//! | [`server`] | HTTP server |

pub mod config;
pub mod db;
pub mod knowledge;
pub mod migrate;
pub mod server;
pub mod sqlite_source;
