//! Place tools.
//!
//! `tripId` is optional on trip-scoped tools: when omitted it resolves from
//! the run's view context, and with no trip in scope the call is rejected
//! rather than guessed.

use crate::store_err;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;
use wanderlust_contract::{ToolCallContext, ToolError, ToolResult, TypedTool};
use wanderlust_store::{PlaceInput, Store};

fn resolve_trip_id(explicit: Option<i64>, ctx: &ToolCallContext) -> Result<i64, ToolError> {
    explicit.or_else(|| ctx.current_trip_id()).ok_or_else(|| {
        ToolError::InvalidArguments(
            "no trip is currently open; pass tripId explicitly".to_string(),
        )
    })
}

/// Add a place to a trip's itinerary.
pub struct AddPlaceTool {
    store: Store,
}

impl AddPlaceTool {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddPlaceArgs {
    /// ID of the trip to add the place to; defaults to the currently open trip.
    pub trip_id: Option<i64>,
    /// Name of the place.
    pub name: String,
    /// Address of the place.
    pub address: Option<String>,
    /// Latitude coordinate.
    pub latitude: f64,
    /// Longitude coordinate.
    pub longitude: f64,
}

#[async_trait]
impl TypedTool for AddPlaceTool {
    type Args = AddPlaceArgs;

    fn tool_id(&self) -> &str {
        "add_place"
    }
    fn name(&self) -> &str {
        "Add place"
    }
    fn description(&self) -> &str {
        "Add a place to a trip. Requires coordinates."
    }

    async fn execute(
        &self,
        args: AddPlaceArgs,
        ctx: &ToolCallContext,
    ) -> Result<ToolResult, ToolError> {
        let trip_id = resolve_trip_id(args.trip_id, ctx)?;
        let trip = self
            .store
            .get_trip(trip_id)
            .map_err(store_err)?
            .ok_or_else(|| ToolError::NotFound(format!("Trip {trip_id} not found")))?;

        let place = self
            .store
            .create_place(PlaceInput {
                trip_id,
                name: args.name,
                address: args.address,
                latitude: args.latitude,
                longitude: args.longitude,
            })
            .map_err(store_err)?;
        Ok(ToolResult::success_with_message(
            "add_place",
            json!(place),
            format!(
                "Added \"{}\" to trip \"{}\" (Place ID: {})",
                place.name, trip.name, place.id
            ),
        ))
    }
}

/// Remove a place from a trip.
pub struct DeletePlaceTool {
    store: Store,
}

impl DeletePlaceTool {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeletePlaceArgs {
    /// ID of the place to delete.
    pub place_id: i64,
}

#[async_trait]
impl TypedTool for DeletePlaceTool {
    type Args = DeletePlaceArgs;

    fn tool_id(&self) -> &str {
        "delete_place"
    }
    fn name(&self) -> &str {
        "Delete place"
    }
    fn description(&self) -> &str {
        "Remove a place from a trip."
    }

    async fn execute(
        &self,
        args: DeletePlaceArgs,
        _ctx: &ToolCallContext,
    ) -> Result<ToolResult, ToolError> {
        if !self.store.delete_place(args.place_id).map_err(store_err)? {
            return Err(ToolError::NotFound(format!(
                "Place {} not found",
                args.place_id
            )));
        }
        Ok(ToolResult::success_with_message(
            "delete_place",
            json!({"placeId": args.place_id}),
            format!("Deleted place {}", args.place_id),
        ))
    }
}

/// Reorder the places of a trip.
pub struct ReorderPlacesTool {
    store: Store,
}

impl ReorderPlacesTool {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReorderPlacesArgs {
    /// ID of the trip; defaults to the currently open trip.
    pub trip_id: Option<i64>,
    /// Ordered array of place IDs.
    pub place_ids: Vec<i64>,
}

#[async_trait]
impl TypedTool for ReorderPlacesTool {
    type Args = ReorderPlacesArgs;

    fn tool_id(&self) -> &str {
        "reorder_places"
    }
    fn name(&self) -> &str {
        "Reorder places"
    }
    fn description(&self) -> &str {
        "Reorder places in a trip's itinerary."
    }

    async fn execute(
        &self,
        args: ReorderPlacesArgs,
        ctx: &ToolCallContext,
    ) -> Result<ToolResult, ToolError> {
        let trip_id = resolve_trip_id(args.trip_id, ctx)?;
        let trip = self
            .store
            .get_trip(trip_id)
            .map_err(store_err)?
            .ok_or_else(|| ToolError::NotFound(format!("Trip {trip_id} not found")))?;

        self.store
            .reorder_places(trip_id, &args.place_ids)
            .map_err(store_err)?;
        Ok(ToolResult::success_with_message(
            "reorder_places",
            json!({"tripId": trip_id, "placeIds": args.place_ids}),
            format!(
                "Reordered {} places in trip \"{}\"",
                args.place_ids.len(),
                trip.name
            ),
        ))
    }
}

/// List the places of a trip in itinerary order.
pub struct GetPlacesTool {
    store: Store,
}

impl GetPlacesTool {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetPlacesArgs {
    /// ID of the trip; defaults to the currently open trip.
    pub trip_id: Option<i64>,
}

#[async_trait]
impl TypedTool for GetPlacesTool {
    type Args = GetPlacesArgs;

    fn tool_id(&self) -> &str {
        "get_places"
    }
    fn name(&self) -> &str {
        "Get places"
    }
    fn description(&self) -> &str {
        "Get all places in a trip's itinerary."
    }

    async fn execute(
        &self,
        args: GetPlacesArgs,
        ctx: &ToolCallContext,
    ) -> Result<ToolResult, ToolError> {
        let trip_id = resolve_trip_id(args.trip_id, ctx)?;
        let trip = self
            .store
            .get_trip(trip_id)
            .map_err(store_err)?
            .ok_or_else(|| ToolError::NotFound(format!("Trip {trip_id} not found")))?;

        let places = self.store.list_places(trip_id).map_err(store_err)?;
        if places.is_empty() {
            return Ok(ToolResult::success_with_message(
                "get_places",
                json!([]),
                format!("No places in trip \"{}\"", trip.name),
            ));
        }

        let place_list = places
            .iter()
            .enumerate()
            .map(|(i, p)| match p.address.as_deref() {
                Some(address) => format!("{}. {} - {} (ID: {})", i + 1, p.name, address, p.id),
                None => format!("{}. {} (ID: {})", i + 1, p.name, p.id),
            })
            .collect::<Vec<_>>()
            .join("\n");
        Ok(ToolResult::success_with_message(
            "get_places",
            json!(places),
            format!("Places in \"{}\":\n{}", trip.name, place_list),
        ))
    }
}
