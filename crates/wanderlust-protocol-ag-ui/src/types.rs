//! AG-UI request types.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;
use wanderlust_contract::{self as contract, PlaceRef, TripRef, ViewContext};

/// Role for AG-UI input/output messages.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Developer,
    System,
    #[default]
    Assistant,
    User,
    Tool,
}

/// AG-UI message in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Message role.
    pub role: Role,
    /// Message content.
    pub content: String,
    /// Optional message ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Optional tool call ID (for tool messages).
    #[serde(rename = "toolCallId", skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl Message {
    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            id: None,
            tool_call_id: None,
        }
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            id: None,
            tool_call_id: None,
        }
    }
}

/// AG-UI context entry from frontend readable values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Context {
    /// Human-readable description of the context.
    pub description: String,
    /// The context value; clients typically send stringified JSON.
    pub value: Value,
}

/// Request to run the agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunAgentInput {
    /// Thread identifier.
    #[serde(rename = "threadId", default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
    /// Run identifier.
    #[serde(rename = "runId", default, skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
    /// Conversation messages.
    pub messages: Vec<Message>,
    /// Client-declared tool definitions. The server executes its own
    /// registry; this field is accepted for wire compatibility.
    #[serde(default)]
    pub tools: Vec<Value>,
    /// Frontend readable context entries.
    #[serde(default)]
    pub context: Vec<Context>,
    /// Initial state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<Value>,
    /// Additional forwarded properties from AG-UI client runtimes.
    #[serde(
        rename = "forwardedProps",
        alias = "forwarded_props",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub forwarded_props: Option<Value>,
}

impl RunAgentInput {
    /// Create a request with just messages.
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            thread_id: None,
            run_id: None,
            messages,
            tools: Vec::new(),
            context: Vec::new(),
            state: None,
            forwarded_props: None,
        }
    }

    /// Add a context entry.
    #[must_use]
    pub fn with_context(mut self, description: impl Into<String>, value: Value) -> Self {
        self.context.push(Context {
            description: description.into(),
            value,
        });
        self
    }

    /// Reject requests this adapter cannot run.
    pub fn validate(&self) -> Result<(), String> {
        if self.messages.is_empty() {
            return Err("messages must not be empty".to_string());
        }
        Ok(())
    }

    /// Convert AG-UI messages into the contract transcript.
    ///
    /// Developer/system entries are treated as system messages; tool entries
    /// without a call id are dropped (they cannot be correlated).
    pub fn into_messages(self) -> Vec<contract::Message> {
        self.messages
            .into_iter()
            .filter_map(|m| match m.role {
                Role::User => Some(contract::Message::user(m.content)),
                Role::Assistant => Some(contract::Message::assistant(m.content)),
                Role::System | Role::Developer => Some(contract::Message::system(m.content)),
                Role::Tool => m
                    .tool_call_id
                    .map(|call_id| contract::Message::tool(call_id, m.content)),
            })
            .collect()
    }

    /// Parse the client's context entries into the view snapshot.
    ///
    /// Values arrive as stringified JSON (`value: "{\"id\":1,...}"`); plain
    /// JSON values are accepted too. Unparseable entries are ignored with a
    /// warning and the snapshot falls back to the global shape.
    pub fn view_context(&self) -> ViewContext {
        let mut current_trip: Option<TripRef> = None;
        let mut trip_places: Option<Vec<PlaceRef>> = None;
        let mut all_trips: Option<Vec<TripRef>> = None;

        for entry in &self.context {
            match entry.description.as_str() {
                "currentTrip" => current_trip = parse_entry(entry),
                "tripPlaces" => trip_places = parse_entry(entry),
                "allTrips" => all_trips = parse_entry(entry),
                _ => {}
            }
        }

        if let Some(trip) = current_trip {
            ViewContext::trip(trip, trip_places.unwrap_or_default())
        } else {
            ViewContext::global(all_trips.unwrap_or_default())
        }
    }
}

fn parse_entry<T: serde::de::DeserializeOwned>(entry: &Context) -> Option<T> {
    let parsed = match &entry.value {
        Value::String(raw) => serde_json::from_str(raw),
        other => serde_json::from_value(other.clone()),
    };
    match parsed {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(
                description = %entry.description,
                error = %e,
                "ignoring unparseable context entry"
            );
            None
        }
    }
}
