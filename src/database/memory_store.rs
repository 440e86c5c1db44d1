//! In-memory knowledge store loaded from a YAML seed
//!
//! Seed format:
//!
//! ```yaml
//! intents:
//!   - intent: greeting
//!     response: "Здравствуйте!"
//!     keywords: [привет, здравствуйте]
//! ```
//!
//! Keywords are normalized with the service normalizer on load, so seeds are
//! written in plain words.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use super::trigram;
use super::{keyword_candidates, IntentMatch, KnowledgeStore, ScoredMatch};
use crate::error::StoreError;
use crate::normalizer::TextNormalizer;

#[derive(Debug, Clone, Deserialize)]
pub struct KnowledgeSeed {
    pub intents: Vec<SeedIntent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedIntent {
    pub intent: String,
    pub response: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl KnowledgeSeed {
    /// Load a seed from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read knowledge seed {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Invalid knowledge seed {}", path.display()))
    }

    /// Load a seed from a YAML string
    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }
}

#[derive(Debug, Clone)]
struct Entry {
    response: String,
    keywords: BTreeSet<String>,
}

/// Knowledge store held entirely in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryKnowledgeStore {
    entries: BTreeMap<String, Entry>,
}

impl InMemoryKnowledgeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a seed; a repeated intent merges keywords, last response wins
    pub fn from_seed(seed: KnowledgeSeed, normalizer: &TextNormalizer) -> Self {
        let mut store = Self::new();
        for item in seed.intents {
            store.insert(&item.intent, &item.response, &item.keywords, normalizer);
        }
        store
    }

    pub fn insert(
        &mut self,
        intent: &str,
        response: &str,
        keywords: &[String],
        normalizer: &TextNormalizer,
    ) {
        let entry = self
            .entries
            .entry(intent.to_string())
            .or_insert_with(|| Entry {
                response: String::new(),
                keywords: BTreeSet::new(),
            });
        entry.response = response.to_string();
        entry.keywords.extend(
            keywords
                .iter()
                .map(|k| normalizer.normalize(k))
                .filter(|k| !k.is_empty()),
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn similarity_score(query: &str, intent: &str, entry: &Entry) -> f32 {
        entry
            .keywords
            .iter()
            .map(|k| trigram::similarity(query, k))
            .fold(trigram::similarity(query, intent), f32::max)
    }
}

#[async_trait]
impl KnowledgeStore for InMemoryKnowledgeStore {
    async fn find_by_keyword(
        &self,
        normalized_query: &str,
    ) -> Result<Option<IntentMatch>, StoreError> {
        let candidates = keyword_candidates(normalized_query);
        if candidates.is_empty() {
            return Ok(None);
        }

        let mut best: Option<(&String, &Entry, usize)> = None;
        for (intent, entry) in &self.entries {
            let hits = candidates
                .iter()
                .filter(|c| entry.keywords.contains(*c))
                .count();
            if hits > 0 && best.map_or(true, |(_, _, top)| hits > top) {
                best = Some((intent, entry, hits));
            }
        }

        Ok(best.map(|(intent, entry, _)| IntentMatch {
            intent: intent.clone(),
            response: entry.response.clone(),
        }))
    }

    async fn find_by_similarity(
        &self,
        normalized_query: &str,
    ) -> Result<Option<ScoredMatch>, StoreError> {
        let best = self
            .entries
            .iter()
            .map(|(intent, entry)| {
                let score = Self::similarity_score(normalized_query, intent, entry);
                let tie_break = strsim::jaro_winkler(normalized_query, &intent.to_lowercase());
                (intent, entry, score, tie_break)
            })
            .max_by(|a, b| {
                a.2.partial_cmp(&b.2)
                    .unwrap_or(Ordering::Equal)
                    .then(a.3.partial_cmp(&b.3).unwrap_or(Ordering::Equal))
                    // prefer the alphabetically first intent on a full tie
                    .then_with(|| b.0.cmp(a.0))
            });

        Ok(best.map(|(intent, entry, score, _)| ScoredMatch {
            intent: intent.clone(),
            response: entry.response.clone(),
            score,
        }))
    }

    async fn get_response(&self, intent: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(intent).map(|e| e.response.clone()))
    }

    async fn list_intents(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.entries.keys().cloned().collect())
    }
}
