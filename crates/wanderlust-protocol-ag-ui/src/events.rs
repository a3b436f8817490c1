//! AG-UI protocol events.
//!
//! These events follow the AG-UI wire shape for agent-to-frontend
//! communication, with one deliberate departure: `TEXT_MESSAGE_CONTENT`
//! carries the full accumulated message text (`text`), not a delta, so
//! receivers replace the last assistant message in place. Successive text
//! events are therefore prefix-extensions of each other.

use crate::types::Role;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// AG-UI protocol event types.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Event {
    /// Signals the start of an agent run.
    #[serde(rename = "RUN_STARTED")]
    RunStarted {
        #[serde(rename = "threadId")]
        thread_id: String,
        #[serde(rename = "runId")]
        run_id: String,
    },

    /// Signals successful completion of an agent run.
    #[serde(rename = "RUN_FINISHED")]
    RunFinished {
        #[serde(rename = "threadId")]
        thread_id: String,
        #[serde(rename = "runId")]
        run_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        result: Option<Value>,
    },

    /// Indicates an error occurred during the run. Terminal: nothing follows.
    #[serde(rename = "RUN_ERROR")]
    RunError { message: String },

    /// Indicates the beginning of the assistant's text message.
    #[serde(rename = "TEXT_MESSAGE_START")]
    TextMessageStart {
        #[serde(rename = "messageId")]
        message_id: String,
        /// Role is always "assistant".
        role: Role,
    },

    /// The assistant text so far — the full accumulated buffer, not a delta.
    #[serde(rename = "TEXT_MESSAGE_CONTENT")]
    TextMessageContent {
        #[serde(rename = "messageId")]
        message_id: String,
        text: String,
    },

    /// Indicates the end of the assistant's text message.
    #[serde(rename = "TEXT_MESSAGE_END")]
    TextMessageEnd {
        #[serde(rename = "messageId")]
        message_id: String,
    },

    /// Signals the start of a tool call.
    #[serde(rename = "TOOL_CALL_START")]
    ToolCallStart {
        #[serde(rename = "toolCallId")]
        tool_call_id: String,
        #[serde(rename = "toolCallName")]
        tool_call_name: String,
        #[serde(rename = "parentMessageId", skip_serializing_if = "Option::is_none")]
        parent_message_id: Option<String>,
    },

    /// Contains incremental tool arguments.
    #[serde(rename = "TOOL_CALL_ARGS")]
    ToolCallArgs {
        #[serde(rename = "toolCallId")]
        tool_call_id: String,
        delta: String,
    },

    /// Signals the end of tool argument streaming; the side effect has been
    /// applied by the time this event is observed.
    #[serde(rename = "TOOL_CALL_END")]
    ToolCallEnd {
        #[serde(rename = "toolCallId")]
        tool_call_id: String,
    },

    /// Contains the result of a tool execution.
    #[serde(rename = "TOOL_CALL_RESULT")]
    ToolCallResult {
        #[serde(rename = "messageId")]
        message_id: String,
        #[serde(rename = "toolCallId")]
        tool_call_id: String,
        content: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        role: Option<Role>,
    },
}

impl Event {
    /// Create a run-started event.
    pub fn run_started(thread_id: impl Into<String>, run_id: impl Into<String>) -> Self {
        Self::RunStarted {
            thread_id: thread_id.into(),
            run_id: run_id.into(),
        }
    }

    /// Create a run-finished event.
    pub fn run_finished(
        thread_id: impl Into<String>,
        run_id: impl Into<String>,
        result: Option<Value>,
    ) -> Self {
        Self::RunFinished {
            thread_id: thread_id.into(),
            run_id: run_id.into(),
            result,
        }
    }

    /// Create a run-error event.
    pub fn run_error(message: impl Into<String>) -> Self {
        Self::RunError {
            message: message.into(),
        }
    }

    /// Create a text-message-start event.
    pub fn text_message_start(message_id: impl Into<String>) -> Self {
        Self::TextMessageStart {
            message_id: message_id.into(),
            role: Role::Assistant,
        }
    }

    /// Create a text-message-content event carrying the full buffer so far.
    pub fn text_message_content(message_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::TextMessageContent {
            message_id: message_id.into(),
            text: text.into(),
        }
    }

    /// Create a text-message-end event.
    pub fn text_message_end(message_id: impl Into<String>) -> Self {
        Self::TextMessageEnd {
            message_id: message_id.into(),
        }
    }

    /// Create a tool-call-start event.
    pub fn tool_call_start(
        tool_call_id: impl Into<String>,
        tool_call_name: impl Into<String>,
        parent_message_id: Option<String>,
    ) -> Self {
        Self::ToolCallStart {
            tool_call_id: tool_call_id.into(),
            tool_call_name: tool_call_name.into(),
            parent_message_id,
        }
    }

    /// Create a tool-call-args event.
    pub fn tool_call_args(tool_call_id: impl Into<String>, delta: impl Into<String>) -> Self {
        Self::ToolCallArgs {
            tool_call_id: tool_call_id.into(),
            delta: delta.into(),
        }
    }

    /// Create a tool-call-end event.
    pub fn tool_call_end(tool_call_id: impl Into<String>) -> Self {
        Self::ToolCallEnd {
            tool_call_id: tool_call_id.into(),
        }
    }

    /// Create a tool-call-result event.
    pub fn tool_call_result(
        message_id: impl Into<String>,
        tool_call_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self::ToolCallResult {
            message_id: message_id.into(),
            tool_call_id: tool_call_id.into(),
            content: content.into(),
            role: Some(Role::Tool),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn events_serialize_with_type_discriminator() {
        let event = Event::run_started("t1", "r1");
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({"type": "RUN_STARTED", "threadId": "t1", "runId": "r1"})
        );

        let event = Event::run_error("model connection failed");
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({"type": "RUN_ERROR", "message": "model connection failed"})
        );
    }

    #[test]
    fn text_content_carries_full_buffer() {
        let event = Event::text_message_content("msg_1", "Hello world");
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "TEXT_MESSAGE_CONTENT");
        assert_eq!(value["text"], "Hello world");
    }

    #[test]
    fn tool_call_result_defaults_to_tool_role() {
        let value =
            serde_json::to_value(Event::tool_call_result("msg_1", "call_1", "done")).unwrap();
        assert_eq!(value["role"], "tool");
        assert_eq!(value["toolCallId"], "call_1");
    }

    #[test]
    fn round_trips_through_serde() {
        let event = Event::tool_call_start("call_1", "add_trip", Some("msg_1".to_string()));
        let json = serde_json::to_string(&event).unwrap();
        let back: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
