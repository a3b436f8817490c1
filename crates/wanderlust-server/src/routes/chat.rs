//! Plain-text chat stream: a tool-less run whose text deltas are written
//! straight to the response body.

use crate::error::ApiError;
use crate::state::AppState;
use async_stream::stream;
use axum::body::Body;
use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use bytes::Bytes;
use futures::StreamExt;
use serde::Deserialize;
use std::collections::HashMap;
use std::convert::Infallible;
use wanderlust_agent_loop::{run_stream, RunRequest};
use wanderlust_contract::{AgentEvent, ViewContext};
use wanderlust_protocol_ag_ui::{Message, RunAgentInput};

const CHAT_PATH: &str = "/api/chat";

pub fn routes() -> Router<AppState> {
    Router::new().route(CHAT_PATH, post(chat))
}

#[derive(Debug, Deserialize)]
struct ChatBody {
    messages: Vec<Message>,
}

async fn chat(
    State(st): State<AppState>,
    Json(body): Json<ChatBody>,
) -> Result<Response, ApiError> {
    let input = RunAgentInput::new(body.messages);
    input.validate().map_err(ApiError::BadRequest)?;

    let request = RunRequest::new(ViewContext::default(), input.into_messages());
    let events = run_stream(st.agent.clone(), HashMap::new(), request, None);

    let text_stream = stream! {
        let mut events = events;
        while let Some(event) = events.next().await {
            if let AgentEvent::TextDelta { delta } = event {
                yield Ok::<Bytes, Infallible>(Bytes::from(delta));
            }
        }
    };

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    Ok((headers, Body::from_stream(text_stream)).into_response())
}
