//! AG-UI streaming run endpoint.
//!
//! Each orchestrator event is serialized as one `data: <json>` SSE record and
//! flushed on its own; the response stream drives the run lazily, so a client
//! disconnect drops the generator and the in-flight model call with it.

use crate::error::ApiError;
use crate::sse::{event_frame, sse_response};
use crate::state::AppState;
use async_stream::stream;
use axum::extract::State;
use axum::response::Response;
use axum::routing::post;
use axum::{Json, Router};
use bytes::Bytes;
use futures::StreamExt;
use std::convert::Infallible;
use wanderlust_agent_loop::{run_stream, RunRequest};
use wanderlust_contract::gen_run_id;
use wanderlust_protocol_ag_ui::{AgUiEncoder, RunAgentInput};

const RUN_PATH: &str = "/api/ag-ui";

pub fn routes() -> Router<AppState> {
    Router::new().route(RUN_PATH, post(run))
}

async fn run(
    State(st): State<AppState>,
    Json(req): Json<RunAgentInput>,
) -> Result<Response, ApiError> {
    req.validate().map_err(ApiError::BadRequest)?;

    let thread_id = req.thread_id.clone().unwrap_or_else(gen_run_id);
    let run_id = req.run_id.clone().unwrap_or_else(gen_run_id);
    let view = req.view_context();
    let messages = req.into_messages();

    let tools = wanderlust_tools::registry(st.store.clone(), st.search.clone());
    let run_request = RunRequest {
        thread_id,
        run_id: run_id.clone(),
        view,
        messages,
    };
    let events = run_stream(st.agent.clone(), tools, run_request, None);

    let mut enc = AgUiEncoder::new(&run_id);
    let body = stream! {
        let mut events = events;
        while let Some(event) = events.next().await {
            for out in enc.on_agent_event(&event) {
                match serde_json::to_string(&out) {
                    Ok(json) => yield Ok::<Bytes, Infallible>(event_frame(&json)),
                    Err(e) => {
                        tracing::warn!(error = %e, "failed to serialize protocol event");
                    }
                }
            }
        }
    };

    Ok(sse_response(body))
}
