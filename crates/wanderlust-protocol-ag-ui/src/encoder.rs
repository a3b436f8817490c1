//! Conversion of orchestrator events to AG-UI protocol events.

use crate::events::Event;
use std::collections::HashSet;
use wanderlust_contract::AgentEvent;

/// Stateful encoder for one run.
///
/// Tracks the assistant message lifecycle, accumulates the text buffer (text
/// content events carry the whole buffer so far), and suppresses everything
/// after a terminal `RUN_ERROR`.
#[derive(Debug)]
pub struct AgUiEncoder {
    /// Message identifier for the assistant's streamed text.
    message_id: String,
    /// Full assistant text so far. Never reset within a run, so successive
    /// text events are prefix-extensions of each other.
    buffer: String,
    /// Whether the text message stream has started.
    text_started: bool,
    /// Whether a terminal event (RUN_ERROR) has been emitted. After this,
    /// all subsequent events are suppressed.
    stopped: bool,
    /// Tool call IDs already announced via TOOL_CALL_START.
    announced_tool_calls: HashSet<String>,
}

impl AgUiEncoder {
    /// Create an encoder for the given run; the streamed assistant message id
    /// is derived from the run id.
    pub fn new(run_id: &str) -> Self {
        let run_id_prefix: String = run_id.chars().take(8).collect();
        Self {
            message_id: format!("msg_{run_id_prefix}"),
            buffer: String::new(),
            text_started: false,
            stopped: false,
            announced_tool_calls: HashSet::new(),
        }
    }

    /// The id carried by the streamed assistant message events.
    pub fn message_id(&self) -> &str {
        &self.message_id
    }

    /// Encode one orchestrator event into zero or more protocol events.
    pub fn on_agent_event(&mut self, event: &AgentEvent) -> Vec<Event> {
        if self.stopped {
            return Vec::new();
        }

        match event {
            AgentEvent::RunStart { thread_id, run_id } => {
                vec![Event::run_started(thread_id, run_id)]
            }

            AgentEvent::TextDelta { delta } => {
                self.buffer.push_str(delta);
                let content = Event::text_message_content(&self.message_id, self.buffer.clone());
                if self.text_started {
                    vec![content]
                } else {
                    self.text_started = true;
                    vec![Event::text_message_start(&self.message_id), content]
                }
            }

            AgentEvent::ToolCallStart { id, name } => {
                self.announced_tool_calls.insert(id.clone());
                vec![Event::tool_call_start(
                    id,
                    name,
                    Some(self.message_id.clone()),
                )]
            }

            AgentEvent::ToolCallDelta { id, args_delta } => {
                vec![Event::tool_call_args(id, args_delta)]
            }

            AgentEvent::ToolCallReady {
                id,
                name,
                arguments,
            } => {
                // Providers that only surface tool calls at stream end never
                // produced START/ARGS; announce the call in full here.
                if self.announced_tool_calls.insert(id.clone()) {
                    vec![
                        Event::tool_call_start(id, name, Some(self.message_id.clone())),
                        Event::tool_call_args(id, arguments.to_string()),
                    ]
                } else {
                    Vec::new()
                }
            }

            AgentEvent::ToolCallDone { id, result } => {
                vec![
                    Event::tool_call_end(id),
                    Event::tool_call_result(
                        self.message_id.clone(),
                        id,
                        result.to_json().to_string(),
                    ),
                ]
            }

            AgentEvent::Error { message } => {
                self.stopped = true;
                vec![Event::run_error(message)]
            }

            AgentEvent::RunFinish {
                thread_id,
                run_id,
                result,
                ..
            } => {
                let mut out = Vec::new();
                if self.text_started {
                    out.push(Event::text_message_end(&self.message_id));
                }
                out.push(Event::run_finished(thread_id, run_id, result.clone()));
                out
            }
        }
    }
}
