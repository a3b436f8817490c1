//! AG-UI protocol binding: wire types for run requests and the encoder that
//! turns orchestrator events into AG-UI protocol events.

pub mod encoder;
pub mod events;
pub mod types;

pub use encoder::AgUiEncoder;
pub use events::Event;
pub use types::{Context, Message, Role, RunAgentInput};
