//! MCP JSON-RPC endpoint.
//!
//! One envelope per request: `initialize`, `tools/list` and `tools/call` are
//! served; notifications (no id) get an empty 204; unknown methods and tools
//! answer with the reserved -32601 code, handler failures with -32603.

use crate::state::AppState;
use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use wanderlust_contract::{gen_message_id, ToolCallContext, ToolError, ToolResult, ViewContext};

const MCP_PATH: &str = "/api/mcp";

const PROTOCOL_VERSION: &str = "2024-11-05";
const SERVER_NAME: &str = "wanderlust-mcp";
const SERVER_VERSION: &str = "1.0.0";

/// Reserved JSON-RPC error codes.
const METHOD_NOT_FOUND: i64 = -32601;
const INTERNAL_ERROR: i64 = -32603;

pub fn routes() -> Router<AppState> {
    Router::new().route(MCP_PATH, post(handle).options(preflight))
}

#[derive(Debug, Deserialize)]
struct JsonRpcRequest {
    #[allow(dead_code)]
    jsonrpc: Option<String>,
    #[serde(default)]
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Option<Value>,
}

fn rpc_response(id: Value, result: Value) -> Response {
    Json(json!({"jsonrpc": "2.0", "id": id, "result": result})).into_response()
}

fn rpc_error(id: Value, code: i64, message: String) -> Response {
    Json(json!({"jsonrpc": "2.0", "id": id, "error": {"code": code, "message": message}}))
        .into_response()
}

async fn handle(State(st): State<AppState>, Json(req): Json<JsonRpcRequest>) -> Response {
    // Notifications carry no id and expect no body.
    let Some(id) = req.id else {
        return StatusCode::NO_CONTENT.into_response();
    };

    match req.method.as_str() {
        "initialize" => rpc_response(
            id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": { "tools": {} },
                "serverInfo": { "name": SERVER_NAME, "version": SERVER_VERSION },
            }),
        ),

        "tools/list" => {
            let tools = wanderlust_tools::registry(st.store.clone(), st.search.clone());
            let mut listed: Vec<Value> = tools
                .values()
                .map(|tool| {
                    let desc = tool.descriptor();
                    json!({
                        "name": desc.id,
                        "description": desc.description,
                        "inputSchema": desc.parameters,
                    })
                })
                .collect();
            listed.sort_by(|a, b| a["name"].as_str().cmp(&b["name"].as_str()));
            rpc_response(id, json!({"tools": listed}))
        }

        "tools/call" => {
            let params = req.params.unwrap_or_default();
            let Some(tool_name) = params.get("name").and_then(Value::as_str) else {
                return rpc_error(id, METHOD_NOT_FOUND, "Unknown tool".to_string());
            };
            let arguments = params
                .get("arguments")
                .cloned()
                .unwrap_or_else(|| json!({}));

            let tools = wanderlust_tools::registry(st.store.clone(), st.search.clone());
            let Some(tool) = tools.get(tool_name) else {
                return rpc_error(id, METHOD_NOT_FOUND, format!("Unknown tool: {tool_name}"));
            };

            // The stateless adapter has no view scope; trip-scoped tools need
            // their explicit tripId here.
            let ctx = ToolCallContext::new(gen_message_id(), ViewContext::default());
            let result = match tool.validate_args(&arguments) {
                Err(e) => return rpc_error(id, INTERNAL_ERROR, e.to_string()),
                Ok(()) => match tool.execute(arguments, &ctx).await {
                    Ok(result) => result,
                    // Domain failures stay inside the MCP result envelope.
                    Err(
                        ToolError::NotFound(msg)
                        | ToolError::Configuration(msg)
                        | ToolError::Provider(msg),
                    ) => ToolResult::error(tool_name, msg),
                    Err(e) => {
                        tracing::warn!(tool = tool_name, error = %e, "tool call failed");
                        return rpc_error(id, INTERNAL_ERROR, e.to_string());
                    }
                },
            };

            rpc_response(id, mcp_content(&result))
        }

        other => rpc_error(id, METHOD_NOT_FOUND, format!("Unknown method: {other}")),
    }
}

/// Render a tool result as MCP content blocks.
fn mcp_content(result: &ToolResult) -> Value {
    let text = result
        .message
        .clone()
        .unwrap_or_else(|| result.data.to_string());
    if result.is_error() {
        json!({"content": [{"type": "text", "text": text}], "isError": true})
    } else {
        json!({"content": [{"type": "text", "text": text}]})
    }
}

/// CORS preflight is answered unconditionally.
async fn preflight() -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    (StatusCode::NO_CONTENT, headers).into_response()
}
