//! Agent loop events for streaming execution.

use crate::tool::ToolResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Events emitted by a single agent run, in arrival order.
///
/// Protocol adapters (AG-UI, plain chat) consume this stream and serialize it
/// to their own wire formats; the vocabulary itself is transport-agnostic.
#[derive(Debug, Clone)]
pub enum AgentEvent {
    /// Run started.
    RunStart { thread_id: String, run_id: String },
    /// Run finished.
    RunFinish {
        thread_id: String,
        run_id: String,
        result: Option<Value>,
        /// Why this run terminated.
        termination: TerminationReason,
    },

    /// LLM text delta.
    TextDelta { delta: String },

    /// Tool call started.
    ToolCallStart { id: String, name: String },
    /// Tool call arguments delta.
    ToolCallDelta { id: String, args_delta: String },
    /// Tool call input is complete.
    ToolCallReady {
        id: String,
        name: String,
        arguments: Value,
    },
    /// Tool call completed. Emitted only after the tool's side effect has
    /// been applied.
    ToolCallDone { id: String, result: ToolResult },

    /// Unrecoverable error; a `RunFinish` with `TerminationReason::Error`
    /// follows and the stream terminates.
    Error { message: String },
}

impl AgentEvent {
    /// Extract the response text from a `RunFinish` result value.
    pub fn extract_response(result: &Option<Value>) -> String {
        result
            .as_ref()
            .and_then(|v| v.get("response"))
            .and_then(|r| r.as_str())
            .unwrap_or_default()
            .to_string()
    }
}

/// Why a run terminated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    /// LLM returned a response with no tool calls.
    NaturalEnd,
    /// The round budget was exhausted.
    MaxRounds,
    /// External run cancellation signal was received.
    Cancelled,
    /// Run ended due to an error path.
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extract_response_with_value() {
        let result = Some(json!({"response": "Hello world"}));
        assert_eq!(AgentEvent::extract_response(&result), "Hello world");
    }

    #[test]
    fn extract_response_none_or_missing() {
        assert_eq!(AgentEvent::extract_response(&None), "");
        let result = Some(json!({"other": 1}));
        assert_eq!(AgentEvent::extract_response(&result), "");
    }

    #[test]
    fn termination_reason_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(TerminationReason::NaturalEnd).unwrap(),
            json!("natural_end")
        );
        assert_eq!(
            serde_json::to_value(TerminationReason::MaxRounds).unwrap(),
            json!("max_rounds")
        );
    }
}
