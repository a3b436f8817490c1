//! Run configuration and the LLM executor seam.

use crate::AgentLoopError;
use async_trait::async_trait;
use futures::StreamExt;
use genai::chat::{ChatOptions, ChatRequest};
use genai::Client;
use std::pin::Pin;
use std::sync::Arc;

/// Boxed stream of LLM chat events.
pub type LlmEventStream = Pin<
    Box<dyn futures::Stream<Item = Result<genai::chat::ChatStreamEvent, AgentLoopError>> + Send>,
>;

/// Abstraction over streaming LLM inference.
///
/// The run loop only ever streams; tests substitute a scripted executor.
/// The default implementation ([`GenaiLlmExecutor`]) delegates to
/// `genai::Client`.
#[async_trait]
pub trait LlmExecutor: Send + Sync {
    /// Run a streaming chat completion, returning a boxed event stream.
    async fn exec_chat_stream_events(
        &self,
        model: &str,
        chat_req: ChatRequest,
        options: Option<&ChatOptions>,
    ) -> Result<LlmEventStream, AgentLoopError>;

    /// Stable label for logging / debug output.
    fn name(&self) -> &'static str;
}

/// Default LLM executor backed by `genai::Client`.
#[derive(Clone, Default)]
pub struct GenaiLlmExecutor {
    client: Client,
}

impl GenaiLlmExecutor {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl std::fmt::Debug for GenaiLlmExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenaiLlmExecutor").finish()
    }
}

#[async_trait]
impl LlmExecutor for GenaiLlmExecutor {
    async fn exec_chat_stream_events(
        &self,
        model: &str,
        chat_req: ChatRequest,
        options: Option<&ChatOptions>,
    ) -> Result<LlmEventStream, AgentLoopError> {
        let resp = self
            .client
            .exec_chat_stream(model, chat_req, options)
            .await
            .map_err(|e| AgentLoopError::Llm(e.to_string()))?;
        Ok(Box::pin(resp.stream.map(|event| {
            event.map_err(|e| AgentLoopError::Llm(e.to_string()))
        })))
    }

    fn name(&self) -> &'static str {
        "genai_client"
    }
}

/// Runtime configuration for the agent loop.
#[derive(Clone)]
pub struct AgentConfig {
    /// Model identifier (e.g., "gpt-4o-mini").
    pub model: String,
    /// System prompt for the LLM; the view-context addendum is appended per run.
    pub system_prompt: String,
    /// Maximum inference rounds per run.
    pub max_rounds: usize,
    /// Chat options for the LLM.
    pub chat_options: Option<ChatOptions>,
    /// Optional LLM executor override.
    ///
    /// When not set, the loop uses [`GenaiLlmExecutor`] with
    /// `Client::default()`.
    pub llm_executor: Option<Arc<dyn LlmExecutor>>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            system_prompt: "You are a helpful assistant.".to_string(),
            max_rounds: 10,
            chat_options: Some(
                ChatOptions::default()
                    .with_capture_usage(true)
                    .with_capture_tool_calls(true),
            ),
            llm_executor: None,
        }
    }
}

impl std::fmt::Debug for AgentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentConfig")
            .field("model", &self.model)
            .field(
                "system_prompt",
                &format!("[{} chars]", self.system_prompt.len()),
            )
            .field("max_rounds", &self.max_rounds)
            .field(
                "llm_executor",
                &self
                    .llm_executor
                    .as_ref()
                    .map(|executor| executor.name())
                    .unwrap_or("genai_client(default)"),
            )
            .finish()
    }
}

impl AgentConfig {
    /// Create a config for the given model id.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    /// Set system prompt.
    #[must_use]
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Set max rounds.
    #[must_use]
    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    /// Set LLM executor.
    #[must_use]
    pub fn with_llm_executor(mut self, executor: Arc<dyn LlmExecutor>) -> Self {
        self.llm_executor = Some(executor);
        self
    }
}
