//! Process configuration
//!
//! Read once at startup from the environment (after `.env` is loaded) and
//! threaded into the collaborators explicitly.

use std::path::PathBuf;
use std::time::Duration;

use intent_llm::OllamaConfig;
use thiserror::Error;

use crate::normalizer::StemLanguage;

/// Default similarity acceptance threshold for the fuzzy stage
pub const DEFAULT_FUZZY_THRESHOLD: f32 = 0.5;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_POOL_SIZE: u32 = 10;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("no knowledge store configured: set DATABASE_URL or KNOWLEDGE_SEED")]
    NoKnowledgeStore,
}

/// Where intents and responses live
#[derive(Debug, Clone, PartialEq)]
pub enum StoreBackend {
    /// Postgres with the `pg_trgm` extension
    Postgres { database_url: String, pool_size: u32 },
    /// YAML seed loaded into memory
    Seed { path: PathBuf },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store: StoreBackend,
    pub ollama: OllamaConfig,
    pub language: StemLanguage,
    /// `None` disables the similarity stage
    pub fuzzy_threshold: Option<f32>,
    pub port: u16,
}

impl AppConfig {
    /// Load from process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup (used by tests)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let store = match get("DATABASE_URL").or_else(|| get("POSTGRES_CONN")) {
            Some(database_url) => StoreBackend::Postgres {
                database_url,
                pool_size: parse_or("DATABASE_POOL_SIZE", get("DATABASE_POOL_SIZE"), DEFAULT_POOL_SIZE)?,
            },
            None => match get("KNOWLEDGE_SEED") {
                Some(path) => StoreBackend::Seed {
                    path: PathBuf::from(path),
                },
                None => return Err(ConfigError::NoKnowledgeStore),
            },
        };

        let defaults = OllamaConfig::default();
        let timeout_secs: u64 = parse_or(
            "LLM_TIMEOUT_SECS",
            get("LLM_TIMEOUT_SECS"),
            defaults.timeout.as_secs(),
        )?;
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "LLM_TIMEOUT_SECS",
                value: "0".to_string(),
                reason: "timeout must be positive".to_string(),
            });
        }
        let ollama = OllamaConfig {
            base_url: get("OLLAMA_URL").unwrap_or(defaults.base_url),
            model: get("OLLAMA_MODEL").unwrap_or(defaults.model),
            timeout: Duration::from_secs(timeout_secs),
        };

        let language = match get("STEM_LANGUAGE") {
            Some(value) => value.parse()?,
            None => StemLanguage::default(),
        };

        let fuzzy_threshold = parse_threshold(get("FUZZY_THRESHOLD"))?;
        let port = parse_or("PORT", get("PORT"), DEFAULT_PORT)?;

        Ok(Self {
            store,
            ollama,
            language,
            fuzzy_threshold,
            port,
        })
    }
}

fn parse_or<T>(key: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            value: raw,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

fn parse_threshold(value: Option<String>) -> Result<Option<f32>, ConfigError> {
    let Some(raw) = value else {
        return Ok(Some(DEFAULT_FUZZY_THRESHOLD));
    };
    if matches!(raw.trim().to_lowercase().as_str(), "off" | "none" | "disabled") {
        return Ok(None);
    }
    let threshold: f32 = parse_or("FUZZY_THRESHOLD", Some(raw.clone()), DEFAULT_FUZZY_THRESHOLD)?;
    if !(0.0..=1.0).contains(&threshold) {
        return Err(ConfigError::Invalid {
            key: "FUZZY_THRESHOLD",
            value: raw,
            reason: "must be within 0.0..=1.0".to_string(),
        });
    }
    Ok(Some(threshold))
}

/// Hide the password part of a connection string for logging
pub fn mask_database_url(url: &str) -> String {
    if let Ok(parsed) = url::Url::parse(url) {
        let mut masked = parsed.clone();
        if parsed.password().is_some() {
            let _ = masked.set_password(Some("***"));
        }
        masked.to_string()
    } else if url.chars().count() > 20 {
        let chars: Vec<char> = url.chars().collect();
        let head: String = chars[..10].iter().collect();
        let tail: String = chars[chars.len() - 10..].iter().collect();
        format!("{head}***{tail}")
    } else {
        "***".to_string()
    }
}
