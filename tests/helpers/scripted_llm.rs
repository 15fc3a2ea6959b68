// ABOUTME: Scripted LLM provider for integration tests
// ABOUTME: Replays queued replies in order and records every request it receives

use async_trait::async_trait;
use soulfit_server::errors::AppError;
use soulfit_server::llm::{ChatRequest, ChatResponse, LlmCapabilities, LlmProvider};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Provider that answers from a queue instead of the network
pub struct ScriptedLlm {
    replies: Mutex<VecDeque<Result<String, AppError>>>,
    requests: Mutex<Vec<ChatRequest>>,
    capabilities: LlmCapabilities,
    healthy: bool,
}

impl ScriptedLlm {
    /// Vision-capable provider with the given replies
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(|r| Ok(r.into())).collect()),
            requests: Mutex::new(Vec::new()),
            capabilities: LlmCapabilities::full_featured(),
            healthy: true,
        }
    }

    /// Provider with no replies queued; any call fails the test
    pub fn silent() -> Self {
        Self::new(Vec::<String>::new())
    }

    /// Replace the capability flags
    pub fn with_capabilities(mut self, capabilities: LlmCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Make health checks report the endpoint as down
    pub const fn unhealthy(mut self) -> Self {
        self.healthy = false;
        self
    }

    /// Queue a failing call
    pub fn then_fail(self, error: AppError) -> Self {
        self.replies.lock().unwrap().push_back(Err(error));
        self
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of calls made
    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmProvider for ScriptedLlm {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn display_name(&self) -> &'static str {
        "Scripted"
    }

    fn capabilities(&self) -> LlmCapabilities {
        self.capabilities
    }

    fn default_model(&self) -> &str {
        "scripted-model"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        self.requests.lock().unwrap().push(request.clone());
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected LLM call #{}", self.calls()))?;
        Ok(ChatResponse {
            content: reply,
            model: "scripted-model".to_owned(),
            usage: None,
            finish_reason: Some("stop".to_owned()),
        })
    }

    async fn health_check(&self) -> Result<bool, AppError> {
        Ok(self.healthy)
    }
}
