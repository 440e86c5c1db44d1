//! Service assembly
//!
//! Builds the collaborators from [`AppConfig`] and fails fast: an unreachable
//! database, a broken seed file or an unavailable model abort startup.

use std::sync::Arc;

use anyhow::{Context, Result};
use intent_llm::{ensure_model_available, LanguageModelGateway, OllamaClient, PromptClassifier};
use tracing::info;

use crate::config::{AppConfig, StoreBackend};
use crate::database::{InMemoryKnowledgeStore, KnowledgeSeed, KnowledgeStore};
use crate::normalizer::TextNormalizer;
use crate::resolver::IntentResolver;

/// Open the configured knowledge store
pub async fn build_store(
    config: &AppConfig,
    normalizer: &TextNormalizer,
) -> Result<Arc<dyn KnowledgeStore>> {
    match &config.store {
        StoreBackend::Seed { path } => {
            let seed = KnowledgeSeed::from_file(path)?;
            let store = InMemoryKnowledgeStore::from_seed(seed, normalizer);
            info!(path = %path.display(), intents = store.len(), "Loaded knowledge seed");
            Ok(Arc::new(store))
        }
        #[cfg(feature = "database")]
        StoreBackend::Postgres {
            database_url,
            pool_size,
        } => {
            use crate::database::{DatabaseConfig, PgKnowledgeStore};

            let db_config = DatabaseConfig::new(database_url.clone(), *pool_size);
            let store = PgKnowledgeStore::connect(&db_config)
                .await
                .context("Failed to connect to the knowledge store database")?;
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "database"))]
        StoreBackend::Postgres { .. } => Err(anyhow::anyhow!(
            "DATABASE_URL is set but this build has no Postgres support (feature `database`)"
        )),
    }
}

/// Check the model is available, then wrap it in the classification gateway
pub async fn build_gateway(config: &AppConfig) -> Result<Arc<dyn LanguageModelGateway>> {
    let client = OllamaClient::new(config.ollama.clone());
    info!(
        url = %client.base_url(),
        model = %config.ollama.model,
        "Checking language model availability"
    );
    ensure_model_available(&client)
        .await
        .context("Language model is not available")?;

    Ok(Arc::new(
        PromptClassifier::new(client).with_timeout(config.ollama.timeout),
    ))
}

/// Full resolver: normalizer, store, gateway
pub async fn build_resolver(config: &AppConfig) -> Result<IntentResolver> {
    let normalizer = TextNormalizer::new(config.language);
    let store = build_store(config, &normalizer).await?;
    let gateway = build_gateway(config).await?;

    info!(
        language = %config.language,
        fuzzy_threshold = ?config.fuzzy_threshold,
        "Intent resolver ready"
    );
    Ok(IntentResolver::new(normalizer, store, gateway).with_fuzzy_threshold(config.fuzzy_threshold))
}
