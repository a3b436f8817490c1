//! HTTP surface for the trip planner: REST CRUD, the AG-UI streaming run
//! endpoint, the plain-text chat stream, and the MCP JSON-RPC endpoint.

pub mod error;
pub mod routes;
pub mod sse;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

use axum::Router;

/// Assemble the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(routes::trips::routes())
        .merge(routes::places::routes())
        .merge(routes::search::routes())
        .merge(routes::ag_ui::routes())
        .merge(routes::chat::routes())
        .merge(routes::mcp::routes())
        .with_state(state)
}
