//! Intent resolver (query processor)
//!
//! Ordered fallback chain, each step reached only when the previous one did
//! not produce a confident answer:
//!
//! ```text
//! normalize → keyword lookup → similarity lookup (thresholded)
//!           → list intents → language model → response lookup
//! ```
//!
//! Store faults and gateway failures end the resolution immediately. An intent
//! chosen by the model without a stored response resolves with an empty
//! response.

use std::sync::Arc;

use intent_llm::LanguageModelGateway;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::database::{IntentMatch, KnowledgeStore};
use crate::error::ResolveError;
use crate::normalizer::TextNormalizer;

/// Which fallback step produced the intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStage {
    Keyword,
    Similarity,
    LanguageModel,
}

/// Outcome of one resolution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Query {
    pub text: String,
    pub intent: String,
    /// Empty when the intent has no stored response
    pub response: String,
    pub stage: ResolutionStage,
}

impl Query {
    fn from_match(text: &str, found: IntentMatch, stage: ResolutionStage) -> Self {
        Self {
            text: text.to_string(),
            intent: found.intent,
            response: found.response,
            stage,
        }
    }

    pub fn has_response(&self) -> bool {
        !self.response.is_empty()
    }
}

/// Shared across requests; holds read-only handles only
pub struct IntentResolver {
    normalizer: TextNormalizer,
    store: Arc<dyn KnowledgeStore>,
    gateway: Arc<dyn LanguageModelGateway>,
    fuzzy_threshold: Option<f32>,
}

impl IntentResolver {
    /// Resolver with the similarity stage disabled
    pub fn new(
        normalizer: TextNormalizer,
        store: Arc<dyn KnowledgeStore>,
        gateway: Arc<dyn LanguageModelGateway>,
    ) -> Self {
        Self {
            normalizer,
            store,
            gateway,
            fuzzy_threshold: None,
        }
    }

    /// Accept similarity matches scoring at least `threshold`
    pub fn with_fuzzy_threshold(mut self, threshold: Option<f32>) -> Self {
        self.fuzzy_threshold = threshold;
        self
    }

    #[tracing::instrument(skip(self), fields(normalized = tracing::field::Empty))]
    pub async fn resolve(&self, raw_query: &str) -> Result<Query, ResolveError> {
        let normalized = self.normalizer.normalize(raw_query);
        tracing::Span::current().record("normalized", normalized.as_str());

        if let Some(hit) = self.store.find_by_keyword(&normalized).await? {
            info!(intent = %hit.intent, "Resolved by keyword");
            return Ok(Query::from_match(raw_query, hit, ResolutionStage::Keyword));
        }
        debug!("No keyword match");

        if let Some(threshold) = self.fuzzy_threshold {
            match self.store.find_by_similarity(&normalized).await? {
                Some(candidate) if candidate.score >= threshold => {
                    info!(intent = %candidate.intent, score = candidate.score, "Resolved by similarity");
                    return Ok(Query::from_match(
                        raw_query,
                        candidate.into(),
                        ResolutionStage::Similarity,
                    ));
                }
                Some(candidate) => debug!(
                    intent = %candidate.intent,
                    score = candidate.score,
                    threshold,
                    "Similarity match below threshold"
                ),
                None => debug!("Knowledge store has no intents to compare"),
            }
        }

        let intents = self.store.list_intents().await?;
        debug!(intents = intents.len(), "Falling back to language model");

        let intent = self.gateway.classify(&normalized, &intents).await?;

        let response = match self.store.get_response(&intent).await? {
            Some(response) => response,
            None => {
                warn!(intent = %intent, "Language model chose an intent with no stored response");
                String::new()
            }
        };

        Ok(Query {
            text: raw_query.to_string(),
            intent,
            response,
            stage: ResolutionStage::LanguageModel,
        })
    }
}
