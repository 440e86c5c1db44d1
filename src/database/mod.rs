//! Knowledge store: intents, their keywords and canned responses
//!
//! The resolver only sees the [`KnowledgeStore`] trait. Two backends:
//! Postgres with `pg_trgm` (feature `database`) and an in-memory store built
//! from a YAML seed.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::StoreError;

pub mod memory_store;
pub mod trigram;

#[cfg(feature = "database")]
pub mod pg_store;

pub use memory_store::{InMemoryKnowledgeStore, KnowledgeSeed, SeedIntent};

#[cfg(feature = "database")]
pub use pg_store::{DatabaseConfig, PgKnowledgeStore};

/// An intent together with its stored response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntentMatch {
    pub intent: String,
    pub response: String,
}

/// A similarity candidate; `score` is trigram similarity in `[0, 1]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredMatch {
    pub intent: String,
    pub response: String,
    pub score: f32,
}

impl From<ScoredMatch> for IntentMatch {
    fn from(m: ScoredMatch) -> Self {
        IntentMatch {
            intent: m.intent,
            response: m.response,
        }
    }
}

/// Lookup capabilities the resolver depends on
///
/// `Ok(None)` means "no match" / "not found" and drives the fallback chain.
/// `Err` is reserved for infrastructure faults.
#[async_trait]
pub trait KnowledgeStore: Send + Sync {
    /// Confident match: a stored keyword equals a query token or the whole query
    async fn find_by_keyword(&self, normalized_query: &str)
        -> Result<Option<IntentMatch>, StoreError>;

    /// Best intent by trigram similarity; `None` only for an empty store
    async fn find_by_similarity(
        &self,
        normalized_query: &str,
    ) -> Result<Option<ScoredMatch>, StoreError>;

    async fn get_response(&self, intent: &str) -> Result<Option<String>, StoreError>;

    async fn list_intents(&self) -> Result<Vec<String>, StoreError>;
}

/// Keyword candidates for a normalized query: each token plus the whole phrase
pub(crate) fn keyword_candidates(normalized_query: &str) -> Vec<String> {
    let mut candidates: Vec<String> = normalized_query
        .split(' ')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();
    if candidates.len() > 1 {
        candidates.push(normalized_query.to_string());
    }
    candidates.sort();
    candidates.dedup();
    candidates
}
