//! Postgres knowledge store
//!
//! Tables (see `migrations/0001_knowledge_store.sql`):
//! - `responses(intent, response)` - one canned response per intent
//! - `intent_keywords(intent, keyword)` - stemmed keywords
//!
//! Similarity uses `pg_trgm`: `similarity()` against the intent name and every
//! keyword, best score wins.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::{info, warn};

use super::{keyword_candidates, IntentMatch, KnowledgeStore, ScoredMatch};
use crate::config::mask_database_url;
use crate::error::StoreError;

/// Connection pool settings
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub connection_timeout: Duration,
    pub idle_timeout: Option<Duration>,
}

impl DatabaseConfig {
    pub fn new(database_url: impl Into<String>, max_connections: u32) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections,
            connection_timeout: Duration::from_secs(30),
            idle_timeout: Some(Duration::from_secs(600)), // 10 minutes
        }
    }
}

#[derive(Debug, Clone)]
pub struct PgKnowledgeStore {
    pool: PgPool,
}

impl PgKnowledgeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect and verify the database answers
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        info!(
            "Connecting to knowledge store: {}",
            mask_database_url(&config.database_url)
        );

        let mut pool_options = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.connection_timeout);

        if let Some(idle_timeout) = config.idle_timeout {
            pool_options = pool_options.idle_timeout(idle_timeout);
        }

        let pool = pool_options
            .connect(&config.database_url)
            .await
            .map_err(|e| {
                warn!("Failed to connect to database: {}", e);
                e
            })?;

        let store = Self::new(pool);
        store.test_connection().await?;
        info!("Knowledge store connection pool created");
        Ok(store)
    }

    pub async fn test_connection(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl KnowledgeStore for PgKnowledgeStore {
    async fn find_by_keyword(
        &self,
        normalized_query: &str,
    ) -> Result<Option<IntentMatch>, StoreError> {
        let candidates = keyword_candidates(normalized_query);
        if candidates.is_empty() {
            return Ok(None);
        }

        let row: Option<(String, String)> = sqlx::query_as(
            r#"
            SELECT r.intent, r.response
            FROM intent_keywords k
            JOIN responses r ON r.intent = k.intent
            WHERE k.keyword = ANY($1)
            GROUP BY r.intent, r.response
            ORDER BY COUNT(*) DESC, r.intent
            LIMIT 1
            "#,
        )
        .bind(candidates.as_slice())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(intent, response)| IntentMatch { intent, response }))
    }

    async fn find_by_similarity(
        &self,
        normalized_query: &str,
    ) -> Result<Option<ScoredMatch>, StoreError> {
        let row: Option<(String, String, f32)> = sqlx::query_as(
            r#"
            SELECT r.intent,
                   r.response,
                   GREATEST(similarity(r.intent, $1),
                            COALESCE(MAX(similarity(k.keyword, $1)), 0))::real AS score
            FROM responses r
            LEFT JOIN intent_keywords k ON k.intent = r.intent
            GROUP BY r.intent, r.response
            ORDER BY score DESC, r.intent
            LIMIT 1
            "#,
        )
        .bind(normalized_query)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(intent, response, score)| ScoredMatch {
            intent,
            response,
            score,
        }))
    }

    async fn get_response(&self, intent: &str) -> Result<Option<String>, StoreError> {
        let response: Option<String> =
            sqlx::query_scalar("SELECT response FROM responses WHERE intent = $1")
                .bind(intent)
                .fetch_optional(&self.pool)
                .await?;
        Ok(response)
    }

    async fn list_intents(&self) -> Result<Vec<String>, StoreError> {
        let intents: Vec<String> =
            sqlx::query_scalar("SELECT DISTINCT intent FROM responses ORDER BY intent")
                .fetch_all(&self.pool)
                .await?;
        Ok(intents)
    }
}
