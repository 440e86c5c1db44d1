//! Language-model fallback for intent resolution
//!
//! This crate asks a locally hosted model to pick one intent out of a known
//! vocabulary. It has no database dependencies - the vocabulary is supplied
//! by the caller.
//!
//! ## Architecture
//!
//! ```text
//! normalized query + intents → classification prompt → TextGenerator (Ollama) → intent name
//! ```
//!
//! Model availability (reachability, pulling a missing model) is checked once
//! at startup by [`bootstrap::ensure_model_available`], never per request.

pub mod bootstrap;
pub mod error;
pub mod gateway;
pub mod llm_client;
pub mod ollama_client;
pub mod prompt;

pub use bootstrap::ensure_model_available;
pub use error::GatewayError;
pub use gateway::{LanguageModelGateway, PromptClassifier};
pub use llm_client::TextGenerator;
pub use ollama_client::{OllamaClient, OllamaConfig};
pub use prompt::classification_prompt;
