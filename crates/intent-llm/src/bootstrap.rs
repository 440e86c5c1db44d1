//! Model availability check
//!
//! Runs once at startup, before the first classification. Fails fast when the
//! server is unreachable or the model cannot be pulled.

use tracing::{info, warn};

use crate::error::GatewayError;
use crate::llm_client::TextGenerator;
use crate::ollama_client::OllamaClient;

/// Ensure the server is up and the configured model is installed
pub async fn ensure_model_available(client: &OllamaClient) -> Result<(), GatewayError> {
    let model = client.model_name().to_string();

    let installed = client
        .list_models()
        .await
        .map_err(|e| GatewayError::ModelUnavailable {
            model: model.clone(),
            reason: format!("Ollama is not reachable at {}: {}", client.base_url(), e),
        })?;

    if installed.iter().any(|name| model_matches(name, &model)) {
        info!(model = %model, "Model available");
        return Ok(());
    }

    warn!(model = %model, installed = ?installed, "Model not installed, pulling");
    client
        .pull_model()
        .await
        .map_err(|e| GatewayError::ModelUnavailable {
            model: model.clone(),
            reason: e.to_string(),
        })?;

    info!(model = %model, "Model pulled");
    Ok(())
}

/// Ollama lists untagged models as `<name>:latest`
fn model_matches(installed: &str, wanted: &str) -> bool {
    installed == wanted || installed.strip_suffix(":latest") == Some(wanted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_matches() {
        assert!(model_matches("mistral", "mistral"));
        assert!(model_matches("mistral:latest", "mistral"));
        assert!(model_matches("llama3:8b", "llama3:8b"));
        assert!(!model_matches("llama3:8b", "llama3"));
        assert!(!model_matches("mistral-nemo:latest", "mistral"));
    }
}
