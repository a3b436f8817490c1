//! The agent run orchestrator.
//!
//! Drives one conversational turn end-to-end: streams model output, emits
//! [`wanderlust_contract::AgentEvent`]s in arrival order, dispatches completed
//! tool calls to the registry, and feeds tool results back to the model.

pub mod config;
pub mod convert;
pub mod run;
pub mod streaming;

pub use config::{AgentConfig, GenaiLlmExecutor, LlmEventStream, LlmExecutor};
pub use run::{run_stream, RunCancellationToken, RunRequest};
pub use streaming::{StreamCollector, StreamOutput, StreamResult};

use thiserror::Error;

/// Orchestrator errors.
#[derive(Debug, Clone, Error)]
pub enum AgentLoopError {
    #[error("llm error: {0}")]
    Llm(String),

    #[error("internal error: {0}")]
    Internal(String),
}
