//! Ollama Client
//!
//! Text generation and model management against a local Ollama server.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::GatewayError;
use crate::llm_client::TextGenerator;

/// Default Ollama endpoint for local runs
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Default model
pub const DEFAULT_MODEL: &str = "mistral";

/// Default bound for a single generation call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Bound for the `/api/tags` liveness probe
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection settings for an Ollama server
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Deserialize)]
struct ModelTag {
    name: String,
}

#[derive(Serialize)]
struct PullRequest<'a> {
    name: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct PullResponse {
    #[serde(default)]
    status: String,
}

/// Ollama HTTP API client
#[derive(Clone)]
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl OllamaClient {
    pub fn new(config: OllamaConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model,
            timeout: config.timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Names of the models installed on the server (`GET /api/tags`)
    pub async fn list_models(&self) -> Result<Vec<String>, GatewayError> {
        let response = self
            .client
            .get(self.endpoint("/api/tags"))
            .timeout(PROBE_TIMEOUT)
            .send()
            .await
            .map_err(|e| GatewayError::from_reqwest(e, PROBE_TIMEOUT))?;

        let tags: TagsResponse = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| GatewayError::from_reqwest(e, PROBE_TIMEOUT))?;

        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    /// Download the configured model (`POST /api/pull`)
    ///
    /// Not time-bounded: a pull runs until the server reports completion.
    pub async fn pull_model(&self) -> Result<(), GatewayError> {
        tracing::info!(model = %self.model, "Pulling model");

        let response = self
            .client
            .post(self.endpoint("/api/pull"))
            .json(&PullRequest {
                name: &self.model,
                stream: false,
            })
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let pulled: PullResponse = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        if pulled.status != "success" {
            return Err(GatewayError::Transport(format!(
                "pull of '{}' ended with status '{}'",
                self.model, pulled.status
            )));
        }

        Ok(())
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, GatewayError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    Err(GatewayError::Upstream { status, body })
}

#[async_trait]
impl TextGenerator for OllamaClient {
    async fn generate(&self, prompt: &str) -> Result<String, GatewayError> {
        let response = self
            .client
            .post(self.endpoint("/api/generate"))
            .timeout(self.timeout)
            .json(&GenerateRequest {
                model: &self.model,
                prompt,
                stream: false,
            })
            .send()
            .await
            .map_err(|e| GatewayError::from_reqwest(e, self.timeout))?;

        let generated: GenerateResponse = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| GatewayError::from_reqwest(e, self.timeout))?;

        Ok(generated.response)
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn provider_name(&self) -> &str {
        "Ollama"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_client_trims_trailing_slash() {
        let client = OllamaClient::new(OllamaConfig {
            base_url: "http://ollama:11434/".to_string(),
            ..OllamaConfig::default()
        });
        assert_eq!(client.base_url(), "http://ollama:11434");
        assert_eq!(client.endpoint("/api/tags"), "http://ollama:11434/api/tags");
    }

    #[test]
    fn test_defaults() {
        let client = OllamaClient::new(OllamaConfig::default());
        assert_eq!(client.model_name(), DEFAULT_MODEL);
        assert_eq!(client.provider_name(), "Ollama");
        assert_eq!(client.timeout(), Duration::from_secs(30));
    }
}
