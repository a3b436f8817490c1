//! REST surface tests.

mod common;

use axum::http::StatusCode;
use common::*;
use serde_json::json;
use wanderlust_agent_loop::AgentConfig;
use wanderlust_store::{PlaceInput, TripInput};

#[tokio::test]
async fn trip_crud_round_trip() {
    let (app, _store) = make_app();

    let response = send_json(
        &app,
        "POST",
        "/api/trips",
        json!({"name": "Paris Weekend", "description": "spring"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let trip = body_json(response).await;
    let trip_id = trip["id"].as_i64().unwrap();
    assert_eq!(trip["name"], "Paris Weekend");

    let response = send_get(&app, "/api/trips").await;
    assert_eq!(response.status(), StatusCode::OK);
    let trips = body_json(response).await;
    assert_eq!(trips.as_array().unwrap().len(), 1);

    let response = send_json(
        &app,
        "PUT",
        &format!("/api/trips/{trip_id}"),
        json!({"name": "Paris"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["name"], "Paris");
    assert_eq!(updated["description"], "spring");

    let response = send_json(&app, "DELETE", &format!("/api/trips/{trip_id}"), json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"success": true}));

    let response = send_get(&app, &format!("/api/trips/{trip_id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_trip_requires_name() {
    let (app, _store) = make_app();

    let response = send_json(&app, "POST", "/api/trips", json!({"description": "x"})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Name is required");

    let response = send_json(&app, "POST", "/api/trips", json!({"name": 42})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn invalid_trip_id_is_400() {
    let (app, _store) = make_app();
    let response = send_get(&app, "/api/trips/abc").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Invalid trip ID");
}

#[tokio::test]
async fn place_collection_under_trip() {
    let (app, store) = make_app();
    let trip = store
        .create_trip(TripInput {
            name: "Lyon".to_string(),
            description: None,
        })
        .unwrap();

    let response = send_json(
        &app,
        "POST",
        &format!("/api/trips/{}/places", trip.id),
        json!({"name": "Bouchon", "latitude": 45.76, "longitude": 4.83}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let place = body_json(response).await;
    assert_eq!(place["visit_order"], 0);

    let response = send_get(&app, &format!("/api/trips/{}/places", trip.id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let places = body_json(response).await;
    assert_eq!(places.as_array().unwrap().len(), 1);

    // Unknown trip 404s rather than returning an empty list.
    let response = send_get(&app, "/api/trips/999/places").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn place_must_belong_to_path_trip() {
    let (app, store) = make_app();
    let trip_a = store
        .create_trip(TripInput {
            name: "A".to_string(),
            description: None,
        })
        .unwrap();
    let trip_b = store
        .create_trip(TripInput {
            name: "B".to_string(),
            description: None,
        })
        .unwrap();
    let place = store
        .create_place(PlaceInput {
            trip_id: trip_a.id,
            name: "P".to_string(),
            address: None,
            latitude: 0.0,
            longitude: 0.0,
        })
        .unwrap();

    let response = send_get(&app, &format!("/api/trips/{}/places/{}", trip_b.id, place.id)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send_get(&app, &format!("/api/trips/{}/places/{}", trip_a.id, place.id)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn reorder_applies_index_order() {
    let (app, store) = make_app();
    let trip = store
        .create_trip(TripInput {
            name: "Lyon".to_string(),
            description: None,
        })
        .unwrap();
    let mut ids = Vec::new();
    for name in ["a", "b", "c"] {
        ids.push(
            store
                .create_place(PlaceInput {
                    trip_id: trip.id,
                    name: name.to_string(),
                    address: None,
                    latitude: 0.0,
                    longitude: 0.0,
                })
                .unwrap()
                .id,
        );
    }

    let response = send_json(
        &app,
        "PUT",
        &format!("/api/trips/{}/places/reorder", trip.id),
        json!({"placeIds": [ids[2], ids[0], ids[1]]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let got: Vec<i64> = store
        .list_places(trip.id)
        .unwrap()
        .iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(got, vec![ids[2], ids[0], ids[1]]);
}

#[tokio::test]
async fn reorder_with_foreign_id_is_400_and_keeps_order() {
    let (app, store) = make_app();
    let trip = store
        .create_trip(TripInput {
            name: "Lyon".to_string(),
            description: None,
        })
        .unwrap();
    let place = store
        .create_place(PlaceInput {
            trip_id: trip.id,
            name: "only".to_string(),
            address: None,
            latitude: 0.0,
            longitude: 0.0,
        })
        .unwrap();

    let response = send_json(
        &app,
        "PUT",
        &format!("/api/trips/{}/places/reorder", trip.id),
        json!({"placeIds": [place.id, 999]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("Place 999"));

    let places = store.list_places(trip.id).unwrap();
    assert_eq!(places[0].visit_order, 0);
}

#[tokio::test]
async fn reorder_unknown_trip_is_404() {
    let (app, _store) = make_app();
    let response = send_json(
        &app,
        "PUT",
        "/api/trips/42/places/reorder",
        json!({"placeIds": []}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn short_search_queries_skip_the_provider() {
    // The provider would fail; a short query must not reach it.
    let (app, _store) = make_app_with(StubSearch::unconfigured(), AgentConfig::default());
    let response = send_get(&app, "/api/places/search?q=a").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"results": []}));
}

#[tokio::test]
async fn search_without_credential_is_500() {
    let (app, _store) = make_app_with(StubSearch::unconfigured(), AgentConfig::default());
    let response = send_get(&app, "/api/places/search?q=cafes%20in%20Lyon").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("API key not configured"));
}
