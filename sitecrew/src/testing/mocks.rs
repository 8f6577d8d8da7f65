//! Scripted model client for tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use crate::errors::ModelError;
use crate::model::{GenerationRequest, GenerationResponse, ModelClient};

const MODEL_NAME: &str = "scripted";

/// What to answer when no rule or queued response applies.
#[derive(Debug, Clone)]
enum Fallback {
    Echo,
    Fixed(String),
    Fail(ModelError),
}

#[derive(Debug, Clone)]
struct Rule {
    pattern: String,
    reply: Result<String, ModelError>,
}

/// A deterministic, in-process [`ModelClient`].
///
/// Each call is answered by the first source that applies:
///
/// 1. a failure scheduled for that call number ([`fail_on_call`](Self::fail_on_call))
/// 2. the first rule whose pattern occurs in the prompt
/// 3. the next queued response
/// 4. the fallback (echo the prompt by default)
///
/// Every request is recorded.
#[derive(Debug)]
pub struct ScriptedModelClient {
    rules: Vec<Rule>,
    scheduled_failures: HashMap<usize, ModelError>,
    fallback: Fallback,
    delay: Option<Duration>,
    queue: Mutex<VecDeque<String>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl Default for ScriptedModelClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedModelClient {
    /// Creates a client that echoes every prompt.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            scheduled_failures: HashMap::new(),
            fallback: Fallback::Echo,
            delay: None,
            queue: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Creates a client that answers calls with `responses` in order, then
    /// echoes.
    #[must_use]
    pub fn with_responses(responses: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let client = Self::new();
        client
            .queue
            .lock()
            .extend(responses.into_iter().map(Into::into));
        client
    }

    /// Answers `response` whenever the prompt contains `pattern`.
    #[must_use]
    pub fn when_prompt_contains(mut self, pattern: impl Into<String>, response: impl Into<String>) -> Self {
        self.rules.push(Rule {
            pattern: pattern.into(),
            reply: Ok(response.into()),
        });
        self
    }

    /// Fails with `error` whenever the prompt contains `pattern`.
    #[must_use]
    pub fn fail_when_prompt_contains(mut self, pattern: impl Into<String>, error: ModelError) -> Self {
        self.rules.push(Rule {
            pattern: pattern.into(),
            reply: Err(error),
        });
        self
    }

    /// Fails the `call`-th call (1-based) with `error`.
    #[must_use]
    pub fn fail_on_call(mut self, call: usize, error: ModelError) -> Self {
        self.scheduled_failures.insert(call, error);
        self
    }

    /// Answers `text` when nothing else applies.
    #[must_use]
    pub fn with_fallback(mut self, text: impl Into<String>) -> Self {
        self.fallback = Fallback::Fixed(text.into());
        self
    }

    /// Fails with `error` when nothing else applies.
    #[must_use]
    pub fn with_fallback_error(mut self, error: ModelError) -> Self {
        self.fallback = Fallback::Fail(error);
        self
    }

    /// Sleeps before answering each call.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Returns the number of calls received.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Returns every request received, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().clone()
    }

    /// Returns every prompt received, in order.
    #[must_use]
    pub fn prompts(&self) -> Vec<String> {
        self.requests.lock().iter().map(|r| r.prompt.clone()).collect()
    }

    /// Returns the first recorded prompt containing `pattern`.
    #[must_use]
    pub fn prompt_containing(&self, pattern: &str) -> Option<String> {
        self.requests
            .lock()
            .iter()
            .find(|r| r.prompt.contains(pattern))
            .map(|r| r.prompt.clone())
    }

    fn reply_for(&self, call: usize, request: &GenerationRequest) -> Result<String, ModelError> {
        if let Some(error) = self.scheduled_failures.get(&call) {
            return Err(error.clone());
        }
        if let Some(rule) = self.rules.iter().find(|r| request.prompt.contains(&r.pattern)) {
            return rule.reply.clone();
        }
        if let Some(queued) = self.queue.lock().pop_front() {
            return Ok(queued);
        }
        match &self.fallback {
            Fallback::Echo => Ok(request.prompt.clone()),
            Fallback::Fixed(text) => Ok(text.clone()),
            Fallback::Fail(error) => Err(error.clone()),
        }
    }
}

#[async_trait]
impl ModelClient for ScriptedModelClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse, ModelError> {
        let call = {
            let mut requests = self.requests.lock();
            requests.push(request.clone());
            requests.len()
        };

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.reply_for(call, request)
            .map(|text| GenerationResponse::text(MODEL_NAME, text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GenerationParams;

    fn request(prompt: &str) -> GenerationRequest {
        GenerationRequest::new("You are a tester.", prompt, GenerationParams::default())
    }

    #[tokio::test]
    async fn test_echo_by_default() {
        let client = ScriptedModelClient::new();
        let response = client.generate(&request("hello")).await.unwrap();

        assert_eq!(response.text, "hello");
        assert_eq!(response.model, "scripted");
        assert_eq!(client.call_count(), 1);
    }

    #[tokio::test]
    async fn test_queued_responses_then_fallback() {
        let client = ScriptedModelClient::with_responses(["one", "two"]).with_fallback("rest");

        assert_eq!(client.generate(&request("a")).await.unwrap().text, "one");
        assert_eq!(client.generate(&request("b")).await.unwrap().text, "two");
        assert_eq!(client.generate(&request("c")).await.unwrap().text, "rest");
        assert_eq!(client.prompts(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_rules_take_precedence_over_queue() {
        let client = ScriptedModelClient::with_responses(["queued"])
            .when_prompt_contains("design", "DESIGN")
            .fail_when_prompt_contains("broken", ModelError::http(400, "bad"));

        assert_eq!(client.generate(&request("the design task")).await.unwrap().text, "DESIGN");
        assert!(client.generate(&request("broken task")).await.is_err());
        assert_eq!(client.generate(&request("other")).await.unwrap().text, "queued");
    }

    #[tokio::test]
    async fn test_fail_on_call() {
        let client = ScriptedModelClient::new().fail_on_call(2, ModelError::http(503, "busy"));

        assert!(client.generate(&request("a")).await.is_ok());
        let err = client.generate(&request("a")).await.unwrap_err();
        assert!(err.is_retryable());
        assert!(client.generate(&request("a")).await.is_ok());
        assert_eq!(client.call_count(), 3);
    }

    #[tokio::test]
    async fn test_prompt_containing() {
        let client = ScriptedModelClient::new();
        client.generate(&request("first prompt")).await.unwrap();
        client.generate(&request("second prompt")).await.unwrap();

        assert_eq!(client.prompt_containing("second").as_deref(), Some("second prompt"));
        assert!(client.prompt_containing("third").is_none());
    }
}
