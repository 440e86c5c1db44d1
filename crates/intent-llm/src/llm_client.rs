//! Text Generator Trait
//!
//! Provider-neutral interface for "generate text from prompt" endpoints.

use async_trait::async_trait;

use crate::error::GatewayError;

/// Synchronous request/response text generation
///
/// Every call has a real cost (remote inference). Implementations must not
/// retry on their own.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Submit a prompt and return the raw generated text
    async fn generate(&self, prompt: &str) -> Result<String, GatewayError>;

    /// Get the model name for logging
    fn model_name(&self) -> &str;

    /// Get the provider name for logging
    fn provider_name(&self) -> &str;
}
