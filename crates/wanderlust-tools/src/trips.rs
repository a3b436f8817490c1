//! Trip tools.

use crate::store_err;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;
use wanderlust_contract::{ToolCallContext, ToolError, ToolResult, TypedTool};
use wanderlust_store::{Store, TripInput, TripUpdate};

/// Create a new trip.
pub struct AddTripTool {
    store: Store,
}

impl AddTripTool {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct AddTripArgs {
    /// Name of the trip.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
}

#[async_trait]
impl TypedTool for AddTripTool {
    type Args = AddTripArgs;

    fn tool_id(&self) -> &str {
        "add_trip"
    }
    fn name(&self) -> &str {
        "Add trip"
    }
    fn description(&self) -> &str {
        "Create a new trip. Returns the created trip ID."
    }

    fn validate(&self, args: &AddTripArgs) -> Result<(), String> {
        if args.name.trim().is_empty() {
            return Err("name must be non-empty".to_string());
        }
        Ok(())
    }

    async fn execute(
        &self,
        args: AddTripArgs,
        _ctx: &ToolCallContext,
    ) -> Result<ToolResult, ToolError> {
        let trip = self
            .store
            .create_trip(TripInput {
                name: args.name,
                description: args.description,
            })
            .map_err(store_err)?;
        Ok(ToolResult::success_with_message(
            "add_trip",
            json!(trip),
            format!("Created trip \"{}\" (ID: {})", trip.name, trip.id),
        ))
    }
}

/// Update a trip's name or description.
pub struct EditTripTool {
    store: Store,
}

impl EditTripTool {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditTripArgs {
    /// ID of the trip to edit.
    pub trip_id: i64,
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
}

#[async_trait]
impl TypedTool for EditTripTool {
    type Args = EditTripArgs;

    fn tool_id(&self) -> &str {
        "edit_trip"
    }
    fn name(&self) -> &str {
        "Edit trip"
    }
    fn description(&self) -> &str {
        "Update a trip's name or description."
    }

    async fn execute(
        &self,
        args: EditTripArgs,
        _ctx: &ToolCallContext,
    ) -> Result<ToolResult, ToolError> {
        let trip = self
            .store
            .update_trip(
                args.trip_id,
                TripUpdate {
                    name: args.name,
                    description: args.description,
                },
            )
            .map_err(store_err)?
            .ok_or_else(|| ToolError::NotFound(format!("Trip {} not found", args.trip_id)))?;
        Ok(ToolResult::success_with_message(
            "edit_trip",
            json!(trip),
            format!("Updated trip \"{}\" (ID: {})", trip.name, trip.id),
        ))
    }
}

/// Delete a trip and all its places.
pub struct DeleteTripTool {
    store: Store,
}

impl DeleteTripTool {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteTripArgs {
    /// ID of the trip to delete.
    pub trip_id: i64,
}

#[async_trait]
impl TypedTool for DeleteTripTool {
    type Args = DeleteTripArgs;

    fn tool_id(&self) -> &str {
        "delete_trip"
    }
    fn name(&self) -> &str {
        "Delete trip"
    }
    fn description(&self) -> &str {
        "Delete a trip and all its places."
    }

    async fn execute(
        &self,
        args: DeleteTripArgs,
        _ctx: &ToolCallContext,
    ) -> Result<ToolResult, ToolError> {
        if !self.store.delete_trip(args.trip_id).map_err(store_err)? {
            return Err(ToolError::NotFound(format!(
                "Trip {} not found",
                args.trip_id
            )));
        }
        Ok(ToolResult::success_with_message(
            "delete_trip",
            json!({"tripId": args.trip_id}),
            format!("Deleted trip {}", args.trip_id),
        ))
    }
}

/// Fetch one trip with its ordered places.
pub struct GetTripTool {
    store: Store,
}

impl GetTripTool {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetTripArgs {
    /// ID of the trip to retrieve.
    pub trip_id: i64,
}

#[async_trait]
impl TypedTool for GetTripTool {
    type Args = GetTripArgs;

    fn tool_id(&self) -> &str {
        "get_trip"
    }
    fn name(&self) -> &str {
        "Get trip"
    }
    fn description(&self) -> &str {
        "Get details of a trip including its places."
    }

    async fn execute(
        &self,
        args: GetTripArgs,
        _ctx: &ToolCallContext,
    ) -> Result<ToolResult, ToolError> {
        let trip = self
            .store
            .get_trip(args.trip_id)
            .map_err(store_err)?
            .ok_or_else(|| ToolError::NotFound(format!("Trip {} not found", args.trip_id)))?;
        let places = self.store.list_places(trip.id).map_err(store_err)?;

        let summary = match trip.description.as_deref() {
            Some(desc) => format!("Trip: {} - {}\nPlaces: {}", trip.name, desc, places.len()),
            None => format!("Trip: {}\nPlaces: {}", trip.name, places.len()),
        };
        Ok(ToolResult::success_with_message(
            "get_trip",
            json!({"trip": trip, "places": places}),
            summary,
        ))
    }
}

/// List all trips.
pub struct GetTripsTool {
    store: Store,
}

impl GetTripsTool {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetTripsArgs {}

#[async_trait]
impl TypedTool for GetTripsTool {
    type Args = GetTripsArgs;

    fn tool_id(&self) -> &str {
        "get_trips"
    }
    fn name(&self) -> &str {
        "Get trips"
    }
    fn description(&self) -> &str {
        "List all available trips with their IDs and names."
    }

    async fn execute(
        &self,
        _args: GetTripsArgs,
        _ctx: &ToolCallContext,
    ) -> Result<ToolResult, ToolError> {
        let trips = self.store.list_trips().map_err(store_err)?;
        if trips.is_empty() {
            return Ok(ToolResult::success_with_message(
                "get_trips",
                json!([]),
                "No trips found",
            ));
        }

        let trip_list = trips
            .iter()
            .map(|t| format!("- {} (ID: {})", t.name, t.id))
            .collect::<Vec<_>>()
            .join("\n");
        Ok(ToolResult::success_with_message(
            "get_trips",
            json!(trips),
            format!("Found {} trips:\n{}", trips.len(), trip_list),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wanderlust_contract::{Tool, ViewContext};

    fn ctx() -> ToolCallContext {
        ToolCallContext::new("call_1", ViewContext::default())
    }

    fn store() -> Store {
        Store::open_in_memory().unwrap()
    }

    #[tokio::test]
    async fn add_trip_creates_exactly_one_trip() {
        let store = store();
        let tool = AddTripTool::new(store.clone());
        let result = Tool::execute(&tool, json!({"name": "Paris Weekend"}), &ctx())
            .await
            .unwrap();

        let trips = store.list_trips().unwrap();
        assert_eq!(trips.len(), 1);
        assert_eq!(trips[0].name, "Paris Weekend");
        let message = result.message.unwrap();
        assert!(message.contains("Created trip \"Paris Weekend\""));
        assert!(message.contains(&format!("(ID: {})", trips[0].id)));
    }

    #[tokio::test]
    async fn add_trip_rejects_blank_name() {
        let tool = AddTripTool::new(store());
        let err = Tool::execute(&tool, json!({"name": "  "}), &ctx())
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[tokio::test]
    async fn edit_trip_unknown_id_is_not_found() {
        let tool = EditTripTool::new(store());
        let err = Tool::execute(&tool, json!({"tripId": 404, "name": "x"}), &ctx())
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_trip_round_trip() {
        let store = store();
        let trip = store
            .create_trip(wanderlust_store::TripInput {
                name: "Rome".to_string(),
                description: None,
            })
            .unwrap();
        let tool = DeleteTripTool::new(store.clone());

        let result = Tool::execute(&tool, json!({"tripId": trip.id}), &ctx())
            .await
            .unwrap();
        assert_eq!(
            result.message.as_deref(),
            Some(format!("Deleted trip {}", trip.id).as_str())
        );
        assert!(store.get_trip(trip.id).unwrap().is_none());
    }

    #[tokio::test]
    async fn get_trips_reports_empty_store() {
        let tool = GetTripsTool::new(store());
        let result = Tool::execute(&tool, json!({}), &ctx()).await.unwrap();
        assert_eq!(result.message.as_deref(), Some("No trips found"));
    }

    #[tokio::test]
    async fn get_trip_includes_place_count() {
        let store = store();
        let trip = store
            .create_trip(wanderlust_store::TripInput {
                name: "Lyon".to_string(),
                description: Some("food".to_string()),
            })
            .unwrap();
        store
            .create_place(wanderlust_store::PlaceInput {
                trip_id: trip.id,
                name: "Bouchon".to_string(),
                address: None,
                latitude: 45.76,
                longitude: 4.83,
            })
            .unwrap();

        let tool = GetTripTool::new(store);
        let result = Tool::execute(&tool, json!({"tripId": trip.id}), &ctx())
            .await
            .unwrap();
        assert_eq!(
            result.message.as_deref(),
            Some("Trip: Lyon - food\nPlaces: 1")
        );
        assert_eq!(result.data["places"][0]["name"], "Bouchon");
    }
}
