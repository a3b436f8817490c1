//! View context: the ephemeral snapshot of what the user is looking at.
//!
//! Recomputed by the caller on every chat turn and passed explicitly into the
//! run; grounds the model's replies and scopes trip-less tool calls.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// A trip reference as the client sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripRef {
    pub id: i64,
    pub name: String,
}

/// A place reference as the client sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceRef {
    pub id: i64,
    pub name: String,
}

/// Exactly one of two mutually exclusive shapes: the user is either viewing
/// a single trip (with its ordered places) or the global trip list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ViewContext {
    /// A single trip is open.
    Trip {
        #[serde(rename = "currentTrip")]
        current_trip: TripRef,
        #[serde(rename = "tripPlaces")]
        trip_places: Vec<PlaceRef>,
    },
    /// The trip list is open.
    Global {
        #[serde(rename = "allTrips")]
        all_trips: Vec<TripRef>,
    },
}

impl Default for ViewContext {
    fn default() -> Self {
        Self::Global {
            all_trips: Vec::new(),
        }
    }
}

impl ViewContext {
    /// Snapshot for the global trip-list view.
    pub fn global(all_trips: Vec<TripRef>) -> Self {
        Self::Global { all_trips }
    }

    /// Snapshot for a single open trip.
    pub fn trip(current_trip: TripRef, trip_places: Vec<PlaceRef>) -> Self {
        Self::Trip {
            current_trip,
            trip_places,
        }
    }

    /// The trip the user currently has open, if any.
    pub fn current_trip_id(&self) -> Option<i64> {
        match self {
            Self::Trip { current_trip, .. } => Some(current_trip.id),
            Self::Global { .. } => None,
        }
    }

    /// Render the snapshot as a system-prompt addendum grounding the model.
    pub fn system_addendum(&self) -> String {
        let mut out = String::new();
        match self {
            Self::Trip {
                current_trip,
                trip_places,
            } => {
                let _ = writeln!(
                    out,
                    "The user is currently viewing the trip \"{}\" (ID: {}).",
                    current_trip.name, current_trip.id
                );
                if trip_places.is_empty() {
                    let _ = writeln!(out, "The trip has no places yet.");
                } else {
                    let _ = writeln!(out, "Places in this trip, in itinerary order:");
                    for place in trip_places {
                        let _ = writeln!(out, "- {} (ID: {})", place.name, place.id);
                    }
                }
            }
            Self::Global { all_trips } => {
                if all_trips.is_empty() {
                    let _ = writeln!(out, "The user is viewing the trip list. No trips exist yet.");
                } else {
                    let _ = writeln!(out, "The user is viewing the trip list. Known trips:");
                    for trip in all_trips {
                        let _ = writeln!(out, "- {} (ID: {})", trip.name, trip.id);
                    }
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn global_shape_serializes_all_trips() {
        let view = ViewContext::global(vec![TripRef {
            id: 1,
            name: "Paris".to_string(),
        }]);
        assert_eq!(
            serde_json::to_value(&view).unwrap(),
            json!({"allTrips": [{"id": 1, "name": "Paris"}]})
        );
        assert_eq!(view.current_trip_id(), None);
    }

    #[test]
    fn trip_shape_serializes_current_trip_and_places() {
        let view = ViewContext::trip(
            TripRef {
                id: 3,
                name: "Lyon".to_string(),
            },
            vec![PlaceRef {
                id: 7,
                name: "Basilique".to_string(),
            }],
        );
        assert_eq!(
            serde_json::to_value(&view).unwrap(),
            json!({
                "currentTrip": {"id": 3, "name": "Lyon"},
                "tripPlaces": [{"id": 7, "name": "Basilique"}]
            })
        );
        assert_eq!(view.current_trip_id(), Some(3));
    }

    #[test]
    fn deserializes_either_shape() {
        let view: ViewContext =
            serde_json::from_value(json!({"allTrips": []})).unwrap();
        assert!(matches!(view, ViewContext::Global { .. }));

        let view: ViewContext = serde_json::from_value(json!({
            "currentTrip": {"id": 2, "name": "Rome"},
            "tripPlaces": []
        }))
        .unwrap();
        assert_eq!(view.current_trip_id(), Some(2));
    }

    #[test]
    fn addendum_mentions_trip_and_places() {
        let view = ViewContext::trip(
            TripRef {
                id: 3,
                name: "Lyon".to_string(),
            },
            vec![
                PlaceRef {
                    id: 7,
                    name: "Basilique".to_string(),
                },
                PlaceRef {
                    id: 9,
                    name: "Parc".to_string(),
                },
            ],
        );
        let addendum = view.system_addendum();
        assert!(addendum.contains("\"Lyon\" (ID: 3)"));
        assert!(addendum.contains("- Basilique (ID: 7)"));
        assert!(addendum.contains("- Parc (ID: 9)"));
    }

    #[test]
    fn addendum_for_empty_trip_list() {
        let addendum = ViewContext::default().system_addendum();
        assert!(addendum.contains("No trips exist yet"));
    }
}
