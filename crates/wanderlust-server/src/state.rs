//! Shared application state.

use std::sync::Arc;
use wanderlust_agent_loop::AgentConfig;
use wanderlust_search::PlaceSearch;
use wanderlust_store::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub search: Arc<dyn PlaceSearch>,
    pub agent: AgentConfig,
}

impl AppState {
    pub fn new(store: Store, search: Arc<dyn PlaceSearch>, agent: AgentConfig) -> Self {
        Self {
            store,
            search,
            agent,
        }
    }
}
