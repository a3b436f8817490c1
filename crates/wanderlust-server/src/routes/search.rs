//! Place search endpoint.

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use wanderlust_search::SearchError;

const SEARCH_PATH: &str = "/api/places/search";

pub fn routes() -> Router<AppState> {
    Router::new().route(SEARCH_PATH, get(search_places))
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: Option<String>,
}

async fn search_places(
    State(st): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Value>, ApiError> {
    let query = params.q.unwrap_or_default();
    // Short queries skip the provider entirely.
    if query.trim().len() < 2 {
        return Ok(Json(json!({"results": []})));
    }

    let results = st.search.search(&query).await.map_err(|e| match e {
        SearchError::MissingApiKey => ApiError::Configuration(e.to_string()),
        SearchError::Provider(msg) => ApiError::Provider(msg),
    })?;
    Ok(Json(json!({"results": results})))
}
