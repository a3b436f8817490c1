//! Place search tool.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use wanderlust_contract::{ToolCallContext, ToolError, ToolResult, TypedTool};
use wanderlust_search::{PlaceSearch, SearchError};

/// Free-text place search via the configured provider.
pub struct SearchPlacesTool {
    search: Arc<dyn PlaceSearch>,
}

impl SearchPlacesTool {
    pub fn new(search: Arc<dyn PlaceSearch>) -> Self {
        Self { search }
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchPlacesArgs {
    /// Search query (e.g. 'coffee shops in Paris').
    pub query: String,
}

#[async_trait]
impl TypedTool for SearchPlacesTool {
    type Args = SearchPlacesArgs;

    fn tool_id(&self) -> &str {
        "search_places"
    }
    fn name(&self) -> &str {
        "Search places"
    }
    fn description(&self) -> &str {
        "Search for places by query using Google Maps. Returns results with coordinates."
    }

    fn validate(&self, args: &SearchPlacesArgs) -> Result<(), String> {
        if args.query.trim().is_empty() {
            return Err("query must be non-empty".to_string());
        }
        Ok(())
    }

    async fn execute(
        &self,
        args: SearchPlacesArgs,
        _ctx: &ToolCallContext,
    ) -> Result<ToolResult, ToolError> {
        let query = args.query.trim().to_string();
        let results = self.search.search(&query).await.map_err(|e| match e {
            SearchError::MissingApiKey => ToolError::Configuration(e.to_string()),
            SearchError::Provider(msg) => ToolError::Provider(msg),
        })?;

        if results.is_empty() {
            return Ok(ToolResult::success_with_message(
                "search_places",
                json!([]),
                format!("No results found for \"{query}\""),
            ));
        }

        let result_list = results
            .iter()
            .enumerate()
            .map(|(i, r)| {
                format!(
                    "{}. {} - {} ({:.4}, {:.4})",
                    i + 1,
                    r.name,
                    r.address,
                    r.latitude,
                    r.longitude
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        Ok(ToolResult::success_with_message(
            "search_places",
            json!(results),
            format!(
                "Found {} results for \"{}\":\n{}",
                results.len(),
                query,
                result_list
            ),
        ))
    }
}
