//! Place endpoints, nested under a trip.

use crate::error::{parse_id, ApiError};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use wanderlust_store::{Place, PlaceInput, PlaceUpdate, Store};

const PLACES_PATH: &str = "/api/trips/:tripId/places";
const PLACE_PATH: &str = "/api/trips/:tripId/places/:placeId";
const REORDER_PATH: &str = "/api/trips/:tripId/places/reorder";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(PLACES_PATH, get(list_places).post(create_place))
        .route(REORDER_PATH, put(reorder_places))
        .route(
            PLACE_PATH,
            get(get_place).put(update_place).delete(delete_place),
        )
}

fn require_trip(store: &Store, id: i64) -> Result<(), ApiError> {
    store
        .get_trip(id)?
        .map(|_| ())
        .ok_or_else(|| ApiError::NotFound("Trip not found".to_string()))
}

/// Fetch a place and check it belongs to the trip in the path.
fn require_place(store: &Store, trip_id: i64, place_id: i64) -> Result<Place, ApiError> {
    store
        .get_place(place_id)?
        .filter(|p| p.trip_id == trip_id)
        .ok_or_else(|| ApiError::NotFound("Place not found".to_string()))
}

async fn list_places(
    State(st): State<AppState>,
    Path(trip_id): Path<String>,
) -> Result<Json<Vec<Place>>, ApiError> {
    let id = parse_id(&trip_id, "trip")?;
    require_trip(&st.store, id)?;
    Ok(Json(st.store.list_places(id)?))
}

#[derive(Debug, Deserialize)]
struct CreatePlaceBody {
    name: String,
    #[serde(default)]
    address: Option<String>,
    latitude: f64,
    longitude: f64,
}

async fn create_place(
    State(st): State<AppState>,
    Path(trip_id): Path<String>,
    Json(body): Json<CreatePlaceBody>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&trip_id, "trip")?;
    if body.name.trim().is_empty() {
        return Err(ApiError::BadRequest("Name is required".to_string()));
    }

    let place = st.store.create_place(PlaceInput {
        trip_id: id,
        name: body.name,
        address: body.address,
        latitude: body.latitude,
        longitude: body.longitude,
    })?;
    Ok((StatusCode::CREATED, Json(place)))
}

async fn get_place(
    State(st): State<AppState>,
    Path((trip_id, place_id)): Path<(String, String)>,
) -> Result<Json<Place>, ApiError> {
    let trip_id = parse_id(&trip_id, "trip")?;
    let place_id = parse_id(&place_id, "place")?;
    Ok(Json(require_place(&st.store, trip_id, place_id)?))
}

async fn update_place(
    State(st): State<AppState>,
    Path((trip_id, place_id)): Path<(String, String)>,
    Json(body): Json<PlaceUpdate>,
) -> Result<Json<Place>, ApiError> {
    let trip_id = parse_id(&trip_id, "trip")?;
    let place_id = parse_id(&place_id, "place")?;
    require_place(&st.store, trip_id, place_id)?;

    let place = st
        .store
        .update_place(place_id, body)?
        .ok_or_else(|| ApiError::NotFound("Place not found".to_string()))?;
    Ok(Json(place))
}

async fn delete_place(
    State(st): State<AppState>,
    Path((trip_id, place_id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let trip_id = parse_id(&trip_id, "trip")?;
    let place_id = parse_id(&place_id, "place")?;
    require_place(&st.store, trip_id, place_id)?;

    st.store.delete_place(place_id)?;
    Ok(Json(json!({"success": true})))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReorderBody {
    place_ids: Vec<i64>,
}

async fn reorder_places(
    State(st): State<AppState>,
    Path(trip_id): Path<String>,
    Json(body): Json<ReorderBody>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&trip_id, "trip")?;
    st.store.reorder_places(id, &body.place_ids)?;
    Ok(Json(json!({"success": true})))
}
