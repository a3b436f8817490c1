//! The streaming run loop.
//!
//! One generator per run; runs share no mutable state. Tool calls are
//! dispatched sequentially in model-emission order, and every side effect is
//! applied before the corresponding `ToolCallDone` is yielded.

use crate::config::{AgentConfig, GenaiLlmExecutor, LlmExecutor};
use crate::streaming::{StreamCollector, StreamOutput};
use crate::convert;
use async_stream::stream;
use futures::{Stream, StreamExt};
use serde_json::json;
use std::collections::HashMap;
use std::pin::Pin;
use std::sync::Arc;
use wanderlust_contract::{
    gen_run_id, AgentEvent, Message, TerminationReason, Tool, ToolCallContext, ToolResult,
    ViewContext,
};

/// Cancellation signal for one run.
pub type RunCancellationToken = tokio_util::sync::CancellationToken;

/// Inputs for one run.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub thread_id: String,
    pub run_id: String,
    /// What the user is currently viewing; scopes trip-less tool calls.
    pub view: ViewContext,
    /// Full prior history plus the new user message.
    pub messages: Vec<Message>,
}

impl RunRequest {
    /// New request with generated ids.
    pub fn new(view: ViewContext, messages: Vec<Message>) -> Self {
        Self {
            thread_id: gen_run_id(),
            run_id: gen_run_id(),
            view,
            messages,
        }
    }

    #[must_use]
    pub fn with_ids(mut self, thread_id: impl Into<String>, run_id: impl Into<String>) -> Self {
        self.thread_id = thread_id.into();
        self.run_id = run_id.into();
        self
    }
}

/// Drive one conversational turn, yielding events in emission order.
///
/// The stream always terminates with `RunFinish`; an unrecoverable failure
/// yields exactly one `Error` first.
pub fn run_stream(
    config: AgentConfig,
    tools: HashMap<String, Arc<dyn Tool>>,
    request: RunRequest,
    cancellation_token: Option<RunCancellationToken>,
) -> Pin<Box<dyn Stream<Item = AgentEvent> + Send>> {
    Box::pin(stream! {
        let RunRequest { thread_id, run_id, view, messages } = request;
        let executor: Arc<dyn LlmExecutor> = config
            .llm_executor
            .clone()
            .unwrap_or_else(|| Arc::new(GenaiLlmExecutor::default()));

        macro_rules! finish_run {
            ($termination:expr, $response:expr) => {{
                let __termination = $termination;
                let __result = $response.map(|text: String| json!({ "response": text }));
                yield AgentEvent::RunFinish {
                    thread_id: thread_id.clone(),
                    run_id: run_id.clone(),
                    result: __result,
                    termination: __termination,
                };
                return;
            }};
        }

        macro_rules! terminate_stream_error {
            ($message:expr) => {{
                let message: String = $message;
                tracing::warn!(run_id = %run_id, error = %message, "run aborted");
                yield AgentEvent::Error { message };
                finish_run!(TerminationReason::Error, None);
            }};
        }

        yield AgentEvent::RunStart {
            thread_id: thread_id.clone(),
            run_id: run_id.clone(),
        };

        let system = {
            let addendum = view.system_addendum();
            if config.system_prompt.is_empty() {
                addendum
            } else {
                format!("{}\n\n{}", config.system_prompt, addendum)
            }
        };
        let mut transcript = Vec::with_capacity(messages.len() + 1);
        transcript.push(Message::system(system));
        transcript.extend(messages);

        let tool_refs: Vec<Arc<dyn Tool>> = tools.values().cloned().collect();
        let mut last_text = String::new();
        let mut completed_rounds = 0usize;

        loop {
            if let Some(ref token) = cancellation_token {
                if token.is_cancelled() {
                    finish_run!(TerminationReason::Cancelled, None);
                }
            }

            let chat_request = {
                let refs: Vec<&dyn Tool> = tool_refs.iter().map(|t| t.as_ref()).collect();
                convert::build_request(&transcript, &refs)
            };

            let mut chat_stream = match executor
                .exec_chat_stream_events(&config.model, chat_request, config.chat_options.as_ref())
                .await
            {
                Ok(stream) => stream,
                Err(e) => terminate_stream_error!(e.to_string()),
            };

            let mut collector = StreamCollector::new();
            loop {
                let next_event = if let Some(ref token) = cancellation_token {
                    tokio::select! {
                        _ = token.cancelled() => {
                            finish_run!(TerminationReason::Cancelled, None);
                        }
                        ev = chat_stream.next() => ev,
                    }
                } else {
                    chat_stream.next().await
                };

                let Some(event_result) = next_event else {
                    break;
                };

                match event_result {
                    Ok(event) => {
                        if let Some(output) = collector.process(event) {
                            match output {
                                StreamOutput::TextDelta(delta) => {
                                    yield AgentEvent::TextDelta { delta };
                                }
                                StreamOutput::ToolCallStart { id, name } => {
                                    yield AgentEvent::ToolCallStart { id, name };
                                }
                                StreamOutput::ToolCallDelta { id, args_delta } => {
                                    yield AgentEvent::ToolCallDelta { id, args_delta };
                                }
                            }
                        }
                    }
                    Err(e) => terminate_stream_error!(e.to_string()),
                }
            }

            let result = collector.finish();
            last_text = result.text.clone();

            if !result.needs_tools() {
                finish_run!(TerminationReason::NaturalEnd, Some(last_text.clone()));
            }

            transcript.push(Message::assistant_with_tool_calls(
                result.text.clone(),
                result.tool_calls.clone(),
            ));

            for call in &result.tool_calls {
                yield AgentEvent::ToolCallReady {
                    id: call.id.clone(),
                    name: call.name.clone(),
                    arguments: call.arguments.clone(),
                };

                let Some(tool) = tools.get(&call.name) else {
                    terminate_stream_error!(format!("unknown tool: {}", call.name));
                };

                let ctx = ToolCallContext::new(call.id.clone(), view.clone());
                let tool_result = match tool.validate_args(&call.arguments) {
                    Err(e) => ToolResult::error(&call.name, e.to_string()),
                    Ok(()) => match tool.execute(call.arguments.clone(), &ctx).await {
                        Ok(r) => r,
                        Err(e) => {
                            tracing::warn!(
                                run_id = %run_id,
                                tool = %call.name,
                                error = %e,
                                "tool call failed"
                            );
                            ToolResult::error(&call.name, e.to_string())
                        }
                    },
                };

                let content = serde_json::to_string(&tool_result)
                    .unwrap_or_else(|_| tool_result.message.clone().unwrap_or_default());
                transcript.push(Message::tool(call.id.clone(), content));

                // The side effect has been applied by this point.
                yield AgentEvent::ToolCallDone {
                    id: call.id.clone(),
                    result: tool_result,
                };
            }

            completed_rounds += 1;
            if completed_rounds >= config.max_rounds {
                finish_run!(TerminationReason::MaxRounds, Some(last_text.clone()));
            }
        }
    })
}
