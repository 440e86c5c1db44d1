//! Language-model gateway
//!
//! Classifies a normalized query against the current intent vocabulary by
//! prompting a [`TextGenerator`]. The answer is returned exactly as the model
//! produced it; whether that intent exists is the caller's concern.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::error::GatewayError;
use crate::llm_client::TextGenerator;
use crate::ollama_client::DEFAULT_TIMEOUT;
use crate::prompt::classification_prompt;

/// Picks one intent for a query
#[async_trait]
pub trait LanguageModelGateway: Send + Sync {
    async fn classify(
        &self,
        normalized_query: &str,
        candidate_intents: &[String],
    ) -> Result<String, GatewayError>;
}

/// Gateway that builds the fixed classification prompt and bounds the call
pub struct PromptClassifier<G> {
    generator: G,
    timeout: Duration,
}

impl<G: TextGenerator> PromptClassifier<G> {
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }
}

#[async_trait]
impl<G: TextGenerator> LanguageModelGateway for PromptClassifier<G> {
    async fn classify(
        &self,
        normalized_query: &str,
        candidate_intents: &[String],
    ) -> Result<String, GatewayError> {
        let prompt = classification_prompt(normalized_query, candidate_intents);
        debug!(
            provider = self.generator.provider_name(),
            model = self.generator.model_name(),
            intents = candidate_intents.len(),
            "Classifying query"
        );

        // Dropping the generate future on expiry cancels the in-flight request
        let outcome = tokio::time::timeout(self.timeout, self.generator.generate(&prompt))
            .await
            .unwrap_or(Err(GatewayError::Timeout(self.timeout)));

        match outcome {
            Ok(answer) if answer.is_empty() => {
                error!(model = self.generator.model_name(), "Language model returned empty response");
                Err(GatewayError::EmptyResponse)
            }
            Ok(answer) => {
                info!(intent = %answer, "Language model chose intent");
                Ok(answer)
            }
            Err(GatewayError::Timeout(bound)) => {
                warn!(
                    model = self.generator.model_name(),
                    timeout_secs = bound.as_secs_f32(),
                    "Language model timed out"
                );
                Err(GatewayError::Timeout(bound))
            }
            Err(e) => {
                error!(model = self.generator.model_name(), error = %e, "Language model call failed");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct MockGenerator {
        answer: Result<String, fn() -> GatewayError>,
        delay: Duration,
        prompts: Mutex<Vec<String>>,
    }

    impl MockGenerator {
        fn answering(answer: &str) -> Self {
            Self {
                answer: Ok(answer.to_string()),
                delay: Duration::ZERO,
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn failing(err: fn() -> GatewayError) -> Self {
            Self {
                answer: Err(err),
                delay: Duration::ZERO,
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn slow(answer: &str, delay: Duration) -> Self {
            Self {
                delay,
                ..Self::answering(answer)
            }
        }
    }

    #[async_trait]
    impl TextGenerator for MockGenerator {
        async fn generate(&self, prompt: &str) -> Result<String, GatewayError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            tokio::time::sleep(self.delay).await;
            match &self.answer {
                Ok(text) => Ok(text.clone()),
                Err(make) => Err(make()),
            }
        }

        fn model_name(&self) -> &str {
            "mock"
        }

        fn provider_name(&self) -> &str {
            "Mock"
        }
    }

    fn intents() -> Vec<String> {
        vec!["greeting".to_string(), "farewell".to_string()]
    }

    #[tokio::test]
    async fn test_classify_returns_answer_verbatim() {
        let classifier = PromptClassifier::new(MockGenerator::answering(" Greeting\n"));

        let intent = classifier.classify("привет", &intents()).await.unwrap();

        assert_eq!(intent, " Greeting\n");
        let prompts = classifier.generator().prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("[greeting, farewell]"));
        assert!(prompts[0].contains("\"привет\""));
    }

    #[tokio::test]
    async fn test_empty_answer_is_empty_response() {
        let classifier = PromptClassifier::new(MockGenerator::answering(""));

        let err = classifier.classify("привет", &intents()).await.unwrap_err();

        assert!(matches!(err, GatewayError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_transport_failure_propagates() {
        let classifier = PromptClassifier::new(MockGenerator::failing(|| {
            GatewayError::Transport("connection refused".to_string())
        }));

        let err = classifier.classify("привет", &intents()).await.unwrap_err();

        assert!(matches!(err, GatewayError::Transport(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_generator_times_out_at_default_bound() {
        let classifier =
            PromptClassifier::new(MockGenerator::slow("greeting", Duration::from_secs(31)));

        let err = classifier.classify("привет", &intents()).await.unwrap_err();

        match err {
            GatewayError::Timeout(bound) => assert_eq!(bound, Duration::from_secs(30)),
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_answer_within_bound_is_accepted() {
        let classifier =
            PromptClassifier::new(MockGenerator::slow("farewell", Duration::from_secs(29)));

        let intent = classifier.classify("пок", &intents()).await.unwrap();

        assert_eq!(intent, "farewell");
    }
}
