#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, Response};
use axum::Router;
use genai::chat::{ChatOptions, ChatRequest, ChatStreamEvent, StreamChunk, StreamEnd, ToolChunk};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use wanderlust_agent_loop::{AgentConfig, AgentLoopError, LlmEventStream, LlmExecutor};
use wanderlust_search::{PlaceSearch, PlaceSearchResult, SearchError};
use wanderlust_server::{router, AppState};
use wanderlust_store::Store;

/// Search stub: either canned results or a canned error.
pub struct StubSearch {
    pub outcome: Result<Vec<PlaceSearchResult>, fn() -> SearchError>,
}

impl StubSearch {
    pub fn empty() -> Arc<Self> {
        Arc::new(Self { outcome: Ok(vec![]) })
    }

    pub fn unconfigured() -> Arc<Self> {
        Arc::new(Self {
            outcome: Err(|| SearchError::MissingApiKey),
        })
    }
}

#[async_trait]
impl PlaceSearch for StubSearch {
    async fn search(&self, _query: &str) -> Result<Vec<PlaceSearchResult>, SearchError> {
        match &self.outcome {
            Ok(results) => Ok(results.clone()),
            Err(make) => Err(make()),
        }
    }
}

pub type Scripted = Vec<Result<ChatStreamEvent, AgentLoopError>>;

/// Executor replaying one scripted event list per inference round.
pub struct ScriptedExecutor {
    rounds: Mutex<VecDeque<Result<Scripted, AgentLoopError>>>,
}

impl ScriptedExecutor {
    pub fn new(rounds: Vec<Result<Scripted, AgentLoopError>>) -> Arc<Self> {
        Arc::new(Self {
            rounds: Mutex::new(rounds.into()),
        })
    }
}

#[async_trait]
impl LlmExecutor for ScriptedExecutor {
    async fn exec_chat_stream_events(
        &self,
        _model: &str,
        _chat_req: ChatRequest,
        _options: Option<&ChatOptions>,
    ) -> Result<LlmEventStream, AgentLoopError> {
        let round = self
            .rounds
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(vec![Ok(ChatStreamEvent::End(StreamEnd::default()))]));
        let events = round?;
        Ok(Box::pin(futures::stream::iter(events)))
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

pub fn text_chunk(text: &str) -> Result<ChatStreamEvent, AgentLoopError> {
    Ok(ChatStreamEvent::Chunk(StreamChunk {
        content: text.to_string(),
    }))
}

pub fn tool_chunk(call_id: &str, name: &str, args: Value) -> Result<ChatStreamEvent, AgentLoopError> {
    Ok(ChatStreamEvent::ToolCallChunk(ToolChunk {
        tool_call: genai::chat::ToolCall {
            call_id: call_id.to_string(),
            fn_name: name.to_string(),
            fn_arguments: args,
            thought_signatures: None,
        },
    }))
}

pub fn end_chunk() -> Result<ChatStreamEvent, AgentLoopError> {
    Ok(ChatStreamEvent::End(StreamEnd::default()))
}

/// App over an in-memory store with a no-op search and no LLM scripted.
pub fn make_app() -> (Router, Store) {
    make_app_with(StubSearch::empty(), AgentConfig::default())
}

pub fn make_app_with(search: Arc<dyn PlaceSearch>, agent: AgentConfig) -> (Router, Store) {
    let store = Store::open_in_memory().unwrap();
    let app = router(AppState::new(store.clone(), search, agent));
    (app, store)
}

pub async fn send_json(app: &Router, method: &str, uri: &str, body: Value) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn send_get(app: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Split an SSE body into its JSON event records.
pub fn parse_sse(body: &str) -> Vec<Value> {
    body.lines()
        .filter_map(|line| line.strip_prefix("data: "))
        .map(|json| serde_json::from_str(json).unwrap())
        .collect()
}
