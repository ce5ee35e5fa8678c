//! Jakdojade API DTOs.
//!
//! Request types mirror the JSON the web client sends. Response types map
//! the route-search JSON, which is undocumented and varies between routes:
//! every field is optional, and a field with an unexpected type reads as
//! absent instead of failing the whole response.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::domain::{
    ConnectionPreference, Coordinate, Engine, FetchType, Location, RealtimeSearchMode, Route,
    RoutesCorrelation, SearchQuery, TimeOptions, TransitOptions,
};

/// Read a field, treating a type mismatch as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Read a list, dropping elements that do not parse.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(parse_list(Value::deserialize(deserializer)?))
}

/// Keep a field's raw value, recording that it was present even if `null`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Parse the elements of a JSON array, dropping those that do not parse.
/// Anything other than an array reads as empty.
fn parse_list<T: DeserializeOwned>(value: Value) -> Vec<T> {
    let Value::Array(items) = value else {
        return Vec::new();
    };

    let total = items.len();
    let parsed: Vec<T> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();

    if parsed.len() < total {
        tracing::warn!(
            dropped = total - parsed.len(),
            "skipping malformed list elements in response"
        );
    }

    parsed
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

/// Response from `POST /api/profiles/v2/register-anonymous`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    #[serde(default, deserialize_with = "lenient")]
    pub profile_login: Option<String>,

    /// The HMAC secret for signed requests
    #[serde(default, deserialize_with = "lenient")]
    pub password_hash: Option<String>,
}

// ---------------------------------------------------------------------------
// Route search request
// ---------------------------------------------------------------------------

/// Body of `POST /api/jd/v3/routes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSearchRequest {
    pub engine: Engine,
    pub fetch_type: FetchType,
    pub routes_correlation: RoutesCorrelation,
    /// Serialized as `null` when unknown
    pub user_location: Option<Coordinate>,
    pub search_query: SearchQueryBody,
}

/// The nested `searchQuery` object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQueryBody {
    pub start: Location,
    pub destination: Location,
    pub time_options: TimeOptions,
    pub realtime_search_mode: RealtimeSearchMode,
    pub routes_count: u32,
    pub user_connection_type_preference: ConnectionPreference,
    pub public_transport_options: TransitOptions,
}

impl From<&SearchQuery> for RouteSearchRequest {
    fn from(query: &SearchQuery) -> Self {
        Self {
            engine: query.engine,
            fetch_type: query.fetch_type,
            routes_correlation: query.routes_correlation,
            user_location: query.user_location,
            search_query: SearchQueryBody {
                start: query.start.clone(),
                destination: query.destination.clone(),
                time_options: query.time_options.clone(),
                realtime_search_mode: query.realtime_search_mode,
                routes_count: query.routes_count,
                user_connection_type_preference: query.connection_preference,
                public_transport_options: query.public_transport_options.clone(),
            },
        }
    }
}

impl From<RouteSearchRequest> for SearchQuery {
    fn from(request: RouteSearchRequest) -> Self {
        let body = request.search_query;
        Self {
            engine: request.engine,
            fetch_type: request.fetch_type,
            routes_correlation: request.routes_correlation,
            user_location: request.user_location,
            start: body.start,
            destination: body.destination,
            time_options: body.time_options,
            realtime_search_mode: body.realtime_search_mode,
            routes_count: body.routes_count,
            public_transport_options: body.public_transport_options,
            connection_preference: body.user_connection_type_preference,
        }
    }
}

// ---------------------------------------------------------------------------
// Route search response
// ---------------------------------------------------------------------------

/// Response from `POST /api/jd/v3/routes`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSearchResponse {
    /// Absent when the provider reports an error
    #[serde(default, deserialize_with = "lenient_list")]
    pub routes: Vec<RawRoute>,

    /// Provider error indicator
    #[serde(default)]
    pub error: Option<Value>,

    /// Every other top-level field
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Search results with every route normalized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResponse {
    pub routes: Vec<Route>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One provider route, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRoute {
    /// `routeParts` as sent; `None` when the key is missing
    #[serde(default, deserialize_with = "present")]
    pub route_parts: Option<Value>,

    /// Every other route field, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RawRoute {
    /// The route parts that parse. Malformed parts are dropped.
    pub fn parts(&self) -> Vec<RoutePart> {
        self.route_parts.clone().map(parse_list).unwrap_or_default()
    }

    /// The route exactly as the provider sent it.
    pub fn to_provider_map(&self) -> Map<String, Value> {
        let mut map = self.extra.clone();
        if let Some(parts) = &self.route_parts {
            map.insert("routeParts".to_string(), parts.clone());
        }
        map
    }
}

/// Provider classification of a route part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoutePartType {
    VehicleTransport,
    Walk,
    #[serde(other)]
    Other,
}

/// A leg of a route: a ride or a walk.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePart {
    #[serde(default, deserialize_with = "lenient")]
    pub route_part_type: Option<RoutePartType>,

    #[serde(default, deserialize_with = "lenient")]
    pub start_departure: Option<Departure>,

    #[serde(default, deserialize_with = "lenient")]
    pub target_arrival: Option<Arrival>,

    #[serde(default, deserialize_with = "lenient")]
    pub duration_seconds: Option<f64>,

    #[serde(default, deserialize_with = "lenient")]
    pub route_part_distance_meters: Option<f64>,

    #[serde(default, deserialize_with = "lenient")]
    pub route_vehicle: Option<RouteVehicle>,
}

/// A time the provider sends either as a bare string or as `{dateTime}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Bare(String),
    Wrapped {
        #[serde(rename = "dateTime")]
        date_time: String,
    },
}

impl Timestamp {
    pub fn as_str(&self) -> &str {
        match self {
            Timestamp::Bare(s) => s,
            Timestamp::Wrapped { date_time } => date_time,
        }
    }
}

/// Departure details of a route part.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Departure {
    #[serde(default, deserialize_with = "lenient")]
    pub departure_time: Option<Timestamp>,

    #[serde(default, deserialize_with = "lenient")]
    pub date_time: Option<String>,
}

/// Arrival details of a route part.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Arrival {
    #[serde(default, deserialize_with = "lenient")]
    pub arrival_time: Option<Timestamp>,

    #[serde(default, deserialize_with = "lenient")]
    pub date_time: Option<String>,
}

/// The vehicle ridden on a part, with the stops it serves.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteVehicle {
    /// The vehicle's full stop sequence, not just the ridden stops
    #[serde(default, deserialize_with = "lenient_list")]
    pub route_stops: Vec<RouteStop>,

    /// Index of the boarding stop in `route_stops`
    #[serde(default, deserialize_with = "lenient")]
    pub stops_start_index: Option<usize>,

    /// Index of the alighting stop in `route_stops`
    #[serde(default, deserialize_with = "lenient")]
    pub stops_end_index: Option<usize>,

    #[serde(default, deserialize_with = "lenient")]
    pub route_line: Option<RouteLine>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteStop {
    #[serde(default, deserialize_with = "lenient")]
    pub line_stop: Option<LineStop>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineStop {
    #[serde(default, deserialize_with = "lenient")]
    pub stop_point: Option<StopPoint>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopPoint {
    #[serde(default, deserialize_with = "lenient")]
    pub stop_name: Option<String>,
}

/// The line served on a part.
///
/// Most responses nest the descriptor under `line`; some carry the
/// display name and vehicle type directly.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteLine {
    #[serde(default, deserialize_with = "lenient")]
    pub line: Option<Line>,

    #[serde(default, deserialize_with = "lenient")]
    pub line_heading_text: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub line_display_name: Option<LineDisplayName>,

    #[serde(default, deserialize_with = "lenient")]
    pub vehicle_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    #[serde(default, deserialize_with = "lenient")]
    pub line_display_name: Option<LineDisplayName>,

    #[serde(default, deserialize_with = "lenient")]
    pub vehicle_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineDisplayName {
    #[serde(default, deserialize_with = "lenient")]
    pub line_name: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
}
