//! Shared contracts for the Wanderlust trip planner: the chat message model,
//! the agent event vocabulary, the tool SPI, and the per-run view context.

pub mod context;
pub mod event;
pub mod message;
pub mod tool;

pub use context::{PlaceRef, TripRef, ViewContext};
pub use event::{AgentEvent, TerminationReason};
pub use message::{gen_message_id, gen_run_id, Message, Role, ToolCall};
pub use tool::{
    validate_against_schema, Tool, ToolCallContext, ToolDescriptor, ToolError, ToolResult,
    ToolStatus, TypedTool,
};
