//! Error types for intent resolution
//!
//! "No match" and "no response" are not errors: store lookups return
//! `Option` for those. Everything here is a real fault.

use intent_llm::GatewayError;
use thiserror::Error;

/// Infrastructure failure of the knowledge store
#[derive(Error, Debug)]
pub enum StoreError {
    #[cfg(feature = "database")]
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("knowledge store unavailable: {0}")]
    Unavailable(String),
}

/// Failure of a single resolution
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("knowledge store failure: {0}")]
    Store(#[from] StoreError),

    #[error("intent classification failed: {0}")]
    Gateway(#[from] GatewayError),
}

impl ResolveError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ResolveError::Gateway(e) if e.is_timeout())
    }

    /// Caller-facing message without internal detail
    pub fn public_message(&self) -> &'static str {
        match self {
            ResolveError::Store(_) => "Knowledge store is unavailable",
            ResolveError::Gateway(GatewayError::Timeout(_)) => "Intent classification timed out",
            ResolveError::Gateway(GatewayError::EmptyResponse) => {
                "Could not determine the intent of the query"
            }
            ResolveError::Gateway(_) => "Intent classification service is unavailable",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_public_messages_hide_detail() {
        let store = ResolveError::from(StoreError::Unavailable(
            "connection to 10.0.0.5 refused".to_string(),
        ));
        assert_eq!(store.public_message(), "Knowledge store is unavailable");
        assert!(!store.is_timeout());

        let timeout = ResolveError::from(GatewayError::Timeout(Duration::from_secs(30)));
        assert!(timeout.is_timeout());
        assert_eq!(timeout.public_message(), "Intent classification timed out");

        let upstream = ResolveError::from(GatewayError::Upstream {
            status: 500,
            body: "stack trace".to_string(),
        });
        assert!(!upstream.public_message().contains("stack trace"));
    }
}
