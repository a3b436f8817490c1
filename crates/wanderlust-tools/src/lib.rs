//! The callable operations the chat assistant can invoke.
//!
//! Every tool is a [`TypedTool`] over the store or the search provider; the
//! same registry backs both the AG-UI streaming adapter and the MCP adapter.

mod places;
mod search;
mod trips;

pub use places::{AddPlaceTool, DeletePlaceTool, GetPlacesTool, ReorderPlacesTool};
pub use search::SearchPlacesTool;
pub use trips::{AddTripTool, DeleteTripTool, EditTripTool, GetTripTool, GetTripsTool};

use std::collections::HashMap;
use std::sync::Arc;
use wanderlust_contract::{Tool, ToolError};
use wanderlust_search::PlaceSearch;
use wanderlust_store::{Store, StoreError};

/// Build the full tool registry shared by all protocol adapters.
pub fn registry(store: Store, search: Arc<dyn PlaceSearch>) -> HashMap<String, Arc<dyn Tool>> {
    let mut tools: HashMap<String, Arc<dyn Tool>> = HashMap::new();
    let mut add = |tool: Arc<dyn Tool>| {
        tools.insert(tool.descriptor().id, tool);
    };

    add(Arc::new(AddTripTool::new(store.clone())));
    add(Arc::new(EditTripTool::new(store.clone())));
    add(Arc::new(DeleteTripTool::new(store.clone())));
    add(Arc::new(GetTripTool::new(store.clone())));
    add(Arc::new(GetTripsTool::new(store.clone())));
    add(Arc::new(AddPlaceTool::new(store.clone())));
    add(Arc::new(DeletePlaceTool::new(store.clone())));
    add(Arc::new(ReorderPlacesTool::new(store.clone())));
    add(Arc::new(GetPlacesTool::new(store)));
    add(Arc::new(SearchPlacesTool::new(search)));

    tools
}

pub(crate) fn store_err(e: StoreError) -> ToolError {
    match e {
        StoreError::NotFound { .. } => ToolError::NotFound(e.to_string()),
        StoreError::Invalid(msg) => ToolError::InvalidArguments(msg),
        other => ToolError::Internal(other.to_string()),
    }
}
