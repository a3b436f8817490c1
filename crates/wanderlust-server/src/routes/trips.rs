//! Trip collection and single-trip endpoints.

use crate::error::{parse_id, ApiError};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use wanderlust_store::{Trip, TripInput, TripUpdate};

const TRIPS_PATH: &str = "/api/trips";
const TRIP_PATH: &str = "/api/trips/:tripId";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(TRIPS_PATH, get(list_trips).post(create_trip))
        .route(
            TRIP_PATH,
            get(get_trip).put(update_trip).delete(delete_trip),
        )
}

async fn list_trips(State(st): State<AppState>) -> Result<Json<Vec<Trip>>, ApiError> {
    Ok(Json(st.store.list_trips()?))
}

#[derive(Debug, Deserialize)]
struct CreateTripBody {
    name: Option<Value>,
    #[serde(default)]
    description: Option<String>,
}

async fn create_trip(
    State(st): State<AppState>,
    Json(body): Json<CreateTripBody>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(Value::String(name)) = body.name else {
        return Err(ApiError::BadRequest("Name is required".to_string()));
    };
    if name.trim().is_empty() {
        return Err(ApiError::BadRequest("Name is required".to_string()));
    }

    let trip = st.store.create_trip(TripInput {
        name,
        description: body.description,
    })?;
    Ok((StatusCode::CREATED, Json(trip)))
}

async fn get_trip(
    State(st): State<AppState>,
    Path(trip_id): Path<String>,
) -> Result<Json<Trip>, ApiError> {
    let id = parse_id(&trip_id, "trip")?;
    let trip = st
        .store
        .get_trip(id)?
        .ok_or_else(|| ApiError::NotFound("Trip not found".to_string()))?;
    Ok(Json(trip))
}

async fn update_trip(
    State(st): State<AppState>,
    Path(trip_id): Path<String>,
    Json(body): Json<TripUpdate>,
) -> Result<Json<Trip>, ApiError> {
    let id = parse_id(&trip_id, "trip")?;
    let trip = st
        .store
        .update_trip(id, body)?
        .ok_or_else(|| ApiError::NotFound("Trip not found".to_string()))?;
    Ok(Json(trip))
}

async fn delete_trip(
    State(st): State<AppState>,
    Path(trip_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&trip_id, "trip")?;
    if !st.store.delete_trip(id)? {
        return Err(ApiError::NotFound("Trip not found".to_string()));
    }
    Ok(Json(json!({"success": true})))
}
