//! Test doubles for the knowledge store and the language-model gateway

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use intent_llm::{GatewayError, LanguageModelGateway};
use intent_service::{IntentMatch, KnowledgeStore, ScoredMatch, StoreError};

/// Which store operation should fail with an infrastructure fault
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    Nothing,
    Keyword,
    Similarity,
    ListIntents,
    GetResponse,
}

pub struct MockKnowledgeStore {
    pub keyword_hit: Option<IntentMatch>,
    pub similarity_hit: Option<ScoredMatch>,
    pub responses: BTreeMap<String, String>,
    pub fail_on: FailOn,
    pub calls: Mutex<Vec<&'static str>>,
}

impl MockKnowledgeStore {
    pub fn new() -> Self {
        Self {
            keyword_hit: None,
            similarity_hit: None,
            responses: BTreeMap::new(),
            fail_on: FailOn::Nothing,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_response(mut self, intent: &str, response: &str) -> Self {
        self.responses.insert(intent.to_string(), response.to_string());
        self
    }

    pub fn with_keyword_hit(mut self, intent: &str, response: &str) -> Self {
        self.keyword_hit = Some(IntentMatch {
            intent: intent.to_string(),
            response: response.to_string(),
        });
        self
    }

    pub fn with_similarity_hit(mut self, intent: &str, response: &str, score: f32) -> Self {
        self.similarity_hit = Some(ScoredMatch {
            intent: intent.to_string(),
            response: response.to_string(),
            score,
        });
        self
    }

    pub fn failing_on(mut self, fail_on: FailOn) -> Self {
        self.fail_on = fail_on;
        self
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &'static str, fail: FailOn) -> Result<(), StoreError> {
        self.calls.lock().unwrap().push(call);
        if self.fail_on == fail {
            return Err(StoreError::Unavailable("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl KnowledgeStore for MockKnowledgeStore {
    async fn find_by_keyword(&self, _query: &str) -> Result<Option<IntentMatch>, StoreError> {
        self.record("find_by_keyword", FailOn::Keyword)?;
        Ok(self.keyword_hit.clone())
    }

    async fn find_by_similarity(&self, _query: &str) -> Result<Option<ScoredMatch>, StoreError> {
        self.record("find_by_similarity", FailOn::Similarity)?;
        Ok(self.similarity_hit.clone())
    }

    async fn get_response(&self, intent: &str) -> Result<Option<String>, StoreError> {
        self.record("get_response", FailOn::GetResponse)?;
        Ok(self.responses.get(intent).cloned())
    }

    async fn list_intents(&self) -> Result<Vec<String>, StoreError> {
        self.record("list_intents", FailOn::ListIntents)?;
        Ok(self.responses.keys().cloned().collect())
    }
}

/// Scripted gateway answer
#[derive(Debug, Clone)]
pub enum MockAnswer {
    Intent(String),
    Empty,
    Transport,
    Timeout,
}

pub struct MockGateway {
    answer: MockAnswer,
    calls: AtomicUsize,
    seen: Mutex<Option<(String, Vec<String>)>>,
}

impl MockGateway {
    pub fn answering(intent: &str) -> Self {
        Self::scripted(MockAnswer::Intent(intent.to_string()))
    }

    pub fn scripted(answer: MockAnswer) -> Self {
        Self {
            answer,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Query and intents passed to the last `classify` call
    pub fn seen(&self) -> Option<(String, Vec<String>)> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModelGateway for MockGateway {
    async fn classify(
        &self,
        normalized_query: &str,
        candidate_intents: &[String],
    ) -> Result<String, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.seen.lock().unwrap() =
            Some((normalized_query.to_string(), candidate_intents.to_vec()));

        match &self.answer {
            MockAnswer::Intent(intent) => Ok(intent.clone()),
            MockAnswer::Empty => Err(GatewayError::EmptyResponse),
            MockAnswer::Transport => Err(GatewayError::Transport("connection reset".to_string())),
            MockAnswer::Timeout => Err(GatewayError::Timeout(Duration::from_secs(30))),
        }
    }
}
