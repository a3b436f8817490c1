//! AG-UI streaming adapter tests, driven by a scripted LLM executor.

mod common;

use axum::http::StatusCode;
use common::*;
use serde_json::json;
use wanderlust_agent_loop::{AgentConfig, AgentLoopError};
use wanderlust_store::TripInput;

fn agent_with(rounds: Vec<Result<Scripted, AgentLoopError>>) -> AgentConfig {
    AgentConfig::default().with_llm_executor(ScriptedExecutor::new(rounds))
}

fn user_message(content: &str) -> serde_json::Value {
    json!({"messages": [{"role": "user", "content": content}]})
}

#[tokio::test]
async fn text_run_streams_sse_events_in_order() {
    let agent = agent_with(vec![Ok(vec![
        text_chunk("Bonjour"),
        text_chunk(" !"),
        end_chunk(),
    ])]);
    let (app, _store) = make_app_with(StubSearch::empty(), agent);

    let response = send_json(&app, "POST", "/api/ag-ui", user_message("salut")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "text/event-stream"
    );

    let events = parse_sse(&body_text(response).await);
    assert_eq!(events.first().unwrap()["type"], "RUN_STARTED");
    assert_eq!(events.last().unwrap()["type"], "RUN_FINISHED");

    let texts: Vec<&str> = events
        .iter()
        .filter(|e| e["type"] == "TEXT_MESSAGE_CONTENT")
        .map(|e| e["text"].as_str().unwrap())
        .collect();
    assert_eq!(texts, vec!["Bonjour", "Bonjour !"]);
    // Full-buffer semantics: each text event prefix-extends the previous one.
    for pair in texts.windows(2) {
        assert!(pair[1].starts_with(pair[0]));
    }
}

#[tokio::test]
async fn tool_call_mutates_store_and_reports_result() {
    let agent = agent_with(vec![
        Ok(vec![
            tool_chunk("call_1", "add_trip", json!({"name": "Paris Weekend"})),
            end_chunk(),
        ]),
        Ok(vec![text_chunk("Created your trip."), end_chunk()]),
    ]);
    let (app, store) = make_app_with(StubSearch::empty(), agent);

    let response = send_json(&app, "POST", "/api/ag-ui", user_message("plan paris")).await;
    let events = parse_sse(&body_text(response).await);

    let trips = store.list_trips().unwrap();
    assert_eq!(trips.len(), 1);
    assert_eq!(trips[0].name, "Paris Weekend");

    let types: Vec<&str> = events.iter().map(|e| e["type"].as_str().unwrap()).collect();
    let start = types.iter().position(|t| *t == "TOOL_CALL_START").unwrap();
    let end = types.iter().position(|t| *t == "TOOL_CALL_END").unwrap();
    let result = types.iter().position(|t| *t == "TOOL_CALL_RESULT").unwrap();
    assert!(start < end && end < result);

    let result_event = &events[result];
    assert_eq!(result_event["toolCallId"], "call_1");
    let content = result_event["content"].as_str().unwrap();
    assert!(content.contains("Created trip \"Paris Weekend\""));
    assert!(content.contains(&format!("(ID: {})", trips[0].id)));

    assert_eq!(events.last().unwrap()["type"], "RUN_FINISHED");
}

#[tokio::test]
async fn current_trip_context_scopes_place_tools() {
    let agent = agent_with(vec![
        Ok(vec![
            // No tripId in the arguments; the view context must supply it.
            tool_chunk(
                "call_1",
                "add_place",
                json!({"name": "Basilique", "latitude": 45.76, "longitude": 4.82}),
            ),
            end_chunk(),
        ]),
        Ok(vec![text_chunk("Added."), end_chunk()]),
    ]);
    let (app, store) = make_app_with(StubSearch::empty(), agent);
    let trip = store
        .create_trip(TripInput {
            name: "Lyon".to_string(),
            description: None,
        })
        .unwrap();

    let body = json!({
        "messages": [{"role": "user", "content": "add the basilica"}],
        "context": [
            {"description": "currentTrip",
             "value": format!(r#"{{"id": {}, "name": "Lyon"}}"#, trip.id)},
            {"description": "tripPlaces", "value": "[]"}
        ]
    });
    let response = send_json(&app, "POST", "/api/ag-ui", body).await;
    let events = parse_sse(&body_text(response).await);

    let places = store.list_places(trip.id).unwrap();
    assert_eq!(places.len(), 1);
    assert_eq!(places[0].name, "Basilique");
    assert_eq!(events.last().unwrap()["type"], "RUN_FINISHED");
}

#[tokio::test]
async fn without_current_trip_place_tools_fail_without_aborting() {
    let agent = agent_with(vec![
        Ok(vec![
            tool_chunk(
                "call_1",
                "add_place",
                json!({"name": "x", "latitude": 1.0, "longitude": 2.0}),
            ),
            end_chunk(),
        ]),
        Ok(vec![text_chunk("Which trip did you mean?"), end_chunk()]),
    ]);
    let (app, store) = make_app_with(StubSearch::empty(), agent);

    let response = send_json(&app, "POST", "/api/ag-ui", user_message("add a place")).await;
    let events = parse_sse(&body_text(response).await);

    let result = events
        .iter()
        .find(|e| e["type"] == "TOOL_CALL_RESULT")
        .unwrap();
    assert!(result["content"]
        .as_str()
        .unwrap()
        .contains("no trip is currently open"));
    assert!(store.list_trips().unwrap().is_empty());
    assert_eq!(events.last().unwrap()["type"], "RUN_FINISHED");
    assert!(!events.iter().any(|e| e["type"] == "RUN_ERROR"));
}

#[tokio::test]
async fn model_failure_emits_single_terminal_run_error() {
    let agent = agent_with(vec![Ok(vec![
        text_chunk("partial"),
        Err(AgentLoopError::Llm("connection reset".to_string())),
    ])]);
    let (app, _store) = make_app_with(StubSearch::empty(), agent);

    let response = send_json(&app, "POST", "/api/ag-ui", user_message("hello")).await;
    let events = parse_sse(&body_text(response).await);

    let errors: Vec<_> = events.iter().filter(|e| e["type"] == "RUN_ERROR").collect();
    assert_eq!(errors.len(), 1);
    assert!(errors[0]["message"]
        .as_str()
        .unwrap()
        .contains("connection reset"));
    // Terminal: the error is the final event on the wire.
    assert_eq!(events.last().unwrap()["type"], "RUN_ERROR");
}

#[tokio::test]
async fn empty_messages_are_rejected() {
    let (app, _store) = make_app();
    let response = send_json(&app, "POST", "/api/ag-ui", json!({"messages": []})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn chat_route_streams_plain_text() {
    let agent = agent_with(vec![Ok(vec![
        text_chunk("Hello "),
        text_chunk("traveler!"),
        end_chunk(),
    ])]);
    let (app, _store) = make_app_with(StubSearch::empty(), agent);

    let response = send_json(&app, "POST", "/api/chat", user_message("hi")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
    assert_eq!(body_text(response).await, "Hello traveler!");
}
