//! Intent Service
//!
//! Resolves a free-text user query into a named intent and its canned
//! response.
//!
//! ## Architecture
//!
//! ```text
//! Raw query → TextNormalizer → KnowledgeStore (keyword → similarity)
//!                                  │ miss
//!                                  ▼
//!                   list intents → LanguageModelGateway (Ollama)
//!                                  │
//!                                  ▼
//!                        KnowledgeStore::get_response → Query
//! ```
//!
//! ## Features
//!
//! - `database` - Postgres knowledge store (sqlx + pg_trgm)
//! - `server` - axum router for `POST /query` (default)
//! - `cli` - `intent_cli` operator tool

pub mod api;
pub mod config;
pub mod database;
pub mod error;
pub mod normalizer;
pub mod resolver;
pub mod startup;

pub use config::{AppConfig, ConfigError, StoreBackend};
pub use database::{InMemoryKnowledgeStore, IntentMatch, KnowledgeSeed, KnowledgeStore, ScoredMatch};
pub use error::{ResolveError, StoreError};
pub use normalizer::{StemLanguage, TextNormalizer};
pub use resolver::{IntentResolver, Query, ResolutionStage};

#[cfg(feature = "database")]
pub use database::PgKnowledgeStore;
