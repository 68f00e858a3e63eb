//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{CanonicalId, LineId};
use crate::fare::FareBand;
use crate::network::{GraphSnapshot, LineNode, StationRecord};
use crate::planner::{Direction, DistanceRoute, InterchangeRoute, Leg};

/// A station in the station list.
#[derive(Debug, Serialize)]
pub struct StationResult {
    /// 1-based index, usable in place of the name
    pub index: usize,

    /// Canonical id
    pub id: CanonicalId,

    /// Display name
    pub name: String,

    /// Lines serving the station
    pub lines: Vec<LineId>,

    pub is_interchange: bool,
}

impl StationResult {
    pub fn from_record(index: usize, record: &StationRecord) -> Self {
        Self {
            index,
            id: record.id.clone(),
            name: record.display_name(),
            lines: record.lines.iter().cloned().collect(),
            is_interchange: record.is_interchange(),
        }
    }
}

/// Response for the station list.
#[derive(Debug, Serialize)]
pub struct StationListResponse {
    pub stations: Vec<StationResult>,
}

impl StationListResponse {
    pub fn from_snapshot(snapshot: &GraphSnapshot) -> Self {
        let stations = snapshot
            .registry
            .iter_sorted()
            .map(|(index, record)| StationResult::from_record(index, record))
            .collect();
        Self { stations }
    }
}

/// Request to resolve a station name or index.
#[derive(Debug, Deserialize)]
pub struct LookupRequest {
    pub q: String,
}

/// Response for station lookup.
#[derive(Debug, Serialize)]
pub struct LookupResponse {
    pub query: String,
    pub station: StationResult,
}

/// Request for a route between two stations.
#[derive(Debug, Deserialize)]
pub struct RouteRequest {
    /// Origin name or index
    pub from: String,

    /// Destination name or index
    pub to: String,
}

/// Minimum-distance route.
#[derive(Debug, Serialize)]
pub struct ShortestRouteResponse {
    pub path: Vec<CanonicalId>,
    pub distance: f64,
    pub fare: u32,
    pub directions: Vec<Direction>,
}

impl ShortestRouteResponse {
    pub fn from_route(route: &DistanceRoute, snapshot: &GraphSnapshot) -> Self {
        Self {
            path: route.path.clone(),
            distance: route.distance,
            fare: route.fare,
            directions: route.directions(snapshot),
        }
    }
}

/// Minimum-interchange route.
#[derive(Debug, Serialize)]
pub struct InterchangeRouteResponse {
    /// Line-tagged path
    pub path: Vec<LineNode>,

    /// Physical stations, changes collapsed
    pub stations: Vec<CanonicalId>,

    pub legs: Vec<Leg>,
    pub distance: f64,

    /// Search cost (segments plus interchange penalties)
    pub cost: u32,

    pub interchanges: u32,
    pub fare: u32,
    pub directions: Vec<Direction>,
}

impl InterchangeRouteResponse {
    pub fn from_route(route: &InterchangeRoute) -> Self {
        Self {
            path: route.path.clone(),
            stations: route.stations(),
            legs: route.legs(),
            distance: route.distance,
            cost: route.cost,
            interchanges: route.interchanges,
            fare: route.fare,
            directions: route.directions(),
        }
    }
}

/// Response for the fare table.
#[derive(Debug, Serialize)]
pub struct FareTableResponse {
    pub bands: Vec<FareBand>,
}

/// Request for a single fare.
#[derive(Debug, Deserialize)]
pub struct FareRequest {
    /// Distance in km
    pub distance: f64,
}

#[derive(Debug, Serialize)]
pub struct FareResponse {
    pub distance: f64,
    pub fare: u32,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fare::FareTable;
    use crate::network::EdgeRecord;
    use crate::planner::query_min_interchange;

    fn snapshot() -> GraphSnapshot {
        let records = vec![
            EdgeRecord::new("Alpha_red", "Beta_(interchange red blue)", 3.0),
            EdgeRecord::new("Beta_(interchange red blue)", "Gamma_blue", 4.0),
        ];
        GraphSnapshot::from_records(records, FareTable::delhi_metro())
    }

    #[test]
    fn station_list_is_indexed() {
        let response = StationListResponse::from_snapshot(&snapshot());
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["stations"].as_array().unwrap().len(), 3);
        assert_eq!(json["stations"][0]["index"], 1);
        assert_eq!(json["stations"][0]["id"], "alpha");
        assert_eq!(json["stations"][1]["is_interchange"], true);
        assert_eq!(
            json["stations"][1]["lines"],
            serde_json::json!(["blue", "red"])
        );
    }

    #[test]
    fn interchange_response_fields() {
        let net = snapshot();
        let route = query_min_interchange(&net, "alpha", "gamma").unwrap();
        let json = serde_json::to_value(InterchangeRouteResponse::from_route(&route)).unwrap();

        assert_eq!(json["interchanges"], 1);
        assert_eq!(json["cost"], 102);
        assert_eq!(json["stations"], serde_json::json!(["alpha", "beta", "gamma"]));
        assert_eq!(json["legs"].as_array().unwrap().len(), 2);
        assert_eq!(json["directions"][0]["step"], "start");
    }
}
