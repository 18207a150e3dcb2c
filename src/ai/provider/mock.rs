//! Scripted provider for unit tests

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use super::{CompletionRequest, LlmProvider, LlmResponse, SharedProvider, TokenUsage};
use crate::types::{RepolyzeError, Result};

/// Replays queued replies in order and records every request
#[derive(Default)]
pub struct MockProvider {
    replies: Mutex<VecDeque<Result<String>>>,
    requests: Mutex<Vec<CompletionRequest>>,
    delay: Mutex<Option<Duration>>,
}

impl MockProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_replies(replies: &[&str]) -> Arc<Self> {
        let mock = Self::default();
        for reply in replies {
            mock.push_reply(reply);
        }
        Arc::new(mock)
    }

    pub fn push_reply(&self, reply: &str) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Ok(reply.to_string()));
    }

    pub fn push_error(&self, error: RepolyzeError) {
        self.replies.lock().unwrap().push_back(Err(error));
    }

    /// Sleep this long before every reply
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn shared(self: &Arc<Self>) -> SharedProvider {
        self.clone()
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    async fn generate(&self, request: &CompletionRequest) -> Result<LlmResponse> {
        self.requests.lock().unwrap().push(request.clone());
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(RepolyzeError::upstream("mock", "no scripted reply")))?;

        let mut response = LlmResponse::content_only(reply);
        response.usage = TokenUsage {
            input_tokens: 10,
            output_tokens: 5,
        };
        response.metadata.model = "mock-model".to_string();
        response.metadata.provider = "mock".to_string();
        Ok(response)
    }

    fn name(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }
}
