pub mod ag_ui;
pub mod chat;
pub mod mcp;
pub mod places;
pub mod search;
pub mod trips;
