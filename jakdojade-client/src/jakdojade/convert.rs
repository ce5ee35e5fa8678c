//! Conversion from Jakdojade route DTOs to flat routes.
//!
//! Normalization never fails. Every derived attribute is resolved through a
//! short chain of fallbacks ending in a placeholder, so one odd route part
//! cannot drop a route and one odd route cannot drop a response.

use chrono::{DateTime, NaiveDateTime};
use tracing::debug;

use crate::domain::{
    NormalizedRoute, POINT, Route, Segment, SegmentKind, UNKNOWN, count_changes,
    without_derived_fields,
};

use super::types::{
    RawRoute, RawSearchResponse, RouteLine, RoutePart, RoutePartType, RouteVehicle, SearchResponse,
};

/// Vehicle type assumed when the line descriptor has none.
const DEFAULT_VEHICLE_TYPE: &str = "BUS";

const WALK_LINE: &str = "Walk";
const WALK_VEHICLE_TYPE: &str = "WALK";

/// Normalize every route in a search response.
pub fn normalize_response(response: RawSearchResponse) -> SearchResponse {
    SearchResponse {
        routes: response.routes.iter().map(normalize_route).collect(),
        error: response.error,
        extra: response.extra,
    }
}

/// Flatten one provider route.
///
/// A route without parts passes through exactly as the provider sent it.
/// Otherwise provider fields named like a derived field are dropped so the
/// derived value is the only one.
pub fn normalize_route(route: &RawRoute) -> Route {
    let parts = route.parts();
    let (Some(first), Some(last)) = (parts.first(), parts.last()) else {
        return Route::Passthrough(route.to_provider_map());
    };

    let segments: Vec<Segment> = parts.iter().map(convert_part).collect();

    // Route-level times come from the part's `departureTime`/`arrivalTime`.
    let route_start = first
        .start_departure
        .as_ref()
        .and_then(|d| d.departure_time.as_ref())
        .map(|t| t.as_str());
    let route_end = last
        .target_arrival
        .as_ref()
        .and_then(|a| a.arrival_time.as_ref())
        .map(|t| t.as_str());

    let segments_start = segments.first().and_then(|s| s.start_time.as_deref());
    let segments_end = segments.last().and_then(|s| s.end_time.as_deref());

    let duration_minutes = match minutes_between(route_start, route_end) {
        Some(minutes) if minutes > 0 => minutes,
        direct => minutes_between(segments_start, segments_end)
            .or(direct)
            .unwrap_or(0),
    };

    let changes = count_changes(&segments);

    debug!(
        segments = segments.len(),
        duration_minutes, changes, "normalized route"
    );

    Route::Normalized(NormalizedRoute {
        start_time: route_start.or(segments_start).map(str::to_owned),
        end_time: route_end.or(segments_end).map(str::to_owned),
        duration_minutes: clamp_minutes(duration_minutes),
        changes,
        segments,
        provider_fields: without_derived_fields(route.extra.clone()),
    })
}

/// Convert one route part to a segment.
fn convert_part(part: &RoutePart) -> Segment {
    let start_time = part.start_departure.as_ref().and_then(|d| {
        d.date_time
            .clone()
            .or_else(|| d.departure_time.as_ref().map(|t| t.as_str().to_owned()))
    });
    let end_time = part.target_arrival.as_ref().and_then(|a| {
        a.date_time
            .clone()
            .or_else(|| a.arrival_time.as_ref().map(|t| t.as_str().to_owned()))
    });

    let mut segment = Segment {
        kind: SegmentKind::Other,
        from: POINT.to_string(),
        to: POINT.to_string(),
        start_time,
        end_time,
        duration_minutes: part.duration_seconds.map(minutes_from_seconds).unwrap_or(0),
        distance_meters: part.route_part_distance_meters,
        line: None,
        vehicle_type: None,
        direction: None,
    };

    match part.route_part_type {
        Some(RoutePartType::VehicleTransport) => {
            let vehicle = part.route_vehicle.as_ref();
            let route_line = vehicle.and_then(|v| v.route_line.as_ref());

            segment.kind = SegmentKind::Vehicle;
            segment.from = vehicle
                .and_then(|v| stop_name(v, v.stops_start_index))
                .unwrap_or(UNKNOWN)
                .to_string();
            segment.to = vehicle
                .and_then(|v| stop_name(v, v.stops_end_index))
                .unwrap_or(UNKNOWN)
                .to_string();
            segment.line = Some(route_line.and_then(line_name).unwrap_or(UNKNOWN).to_string());
            segment.vehicle_type = Some(
                route_line
                    .and_then(vehicle_type)
                    .unwrap_or(DEFAULT_VEHICLE_TYPE)
                    .to_string(),
            );
            segment.direction = route_line
                .and_then(|l| non_empty(l.line_heading_text.as_deref()))
                .map(str::to_owned);
        }
        Some(RoutePartType::Walk) => {
            segment.kind = SegmentKind::Walk;
            segment.line = Some(WALK_LINE.to_string());
            segment.vehicle_type = Some(WALK_VEHICLE_TYPE.to_string());
        }
        Some(RoutePartType::Other) | None => {}
    }

    segment
}

/// Name of the stop at `index` in the vehicle's stop sequence.
fn stop_name(vehicle: &RouteVehicle, index: Option<usize>) -> Option<&str> {
    let stop = vehicle.route_stops.get(index?)?;
    let name = stop.line_stop.as_ref()?.stop_point.as_ref()?.stop_name.as_deref();
    non_empty(name)
}

/// Line display name: nested descriptor first, then the flat one;
/// `lineName` before `name` in each.
fn line_name(route_line: &RouteLine) -> Option<&str> {
    let nested = route_line
        .line
        .as_ref()
        .and_then(|l| l.line_display_name.as_ref());
    let flat = route_line.line_display_name.as_ref();

    non_empty(nested.and_then(|d| d.line_name.as_deref()))
        .or_else(|| non_empty(nested.and_then(|d| d.name.as_deref())))
        .or_else(|| non_empty(flat.and_then(|d| d.line_name.as_deref())))
        .or_else(|| non_empty(flat.and_then(|d| d.name.as_deref())))
}

fn vehicle_type(route_line: &RouteLine) -> Option<&str> {
    non_empty(
        route_line
            .line
            .as_ref()
            .and_then(|l| l.vehicle_type.as_deref()),
    )
    .or_else(|| non_empty(route_line.vehicle_type.as_deref()))
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

/// Whole minutes between two provider timestamps, rounded.
///
/// Returns `None` if either side is absent or unparseable.
fn minutes_between(start: Option<&str>, end: Option<&str>) -> Option<i64> {
    let start = parse_millis(start?)?;
    let end = parse_millis(end?)?;
    Some(((end - start) as f64 / 60_000.0).round() as i64)
}

/// Milliseconds since the epoch for an ISO-8601 timestamp.
///
/// Timestamps without an offset are read as UTC; the provider uses one
/// zone per response, so differences are unaffected.
fn parse_millis(s: &str) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.and_utc().timestamp_millis())
}

fn minutes_from_seconds(seconds: f64) -> u32 {
    if !seconds.is_finite() || seconds <= 0.0 {
        return 0;
    }
    clamp_minutes((seconds / 60.0).round() as i64)
}

fn clamp_minutes(minutes: i64) -> u32 {
    u32::try_from(minutes.max(0)).unwrap_or(u32::MAX)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn normalized(raw: &RawRoute) -> NormalizedRoute {
        normalize_route(raw)
            .into_normalized()
            .expect("route with parts should be normalized")
    }

    fn part_type() -> impl Strategy<Value = &'static str> {
        prop_oneof![
            Just("VEHICLE_TRANSPORT"),
            Just("WALK"),
            Just("FERRY_LINK"),
        ]
    }

    proptest! {
        /// Changes count vehicle parts only
        #[test]
        fn changes_are_vehicles_minus_one(types in proptest::collection::vec(part_type(), 1..12)) {
            let parts: Vec<_> = types.iter().map(|t| json!({ "routePartType": t })).collect();
            let raw: RawRoute = serde_json::from_value(json!({ "routeParts": parts })).unwrap();

            let vehicles = types.iter().filter(|t| **t == "VEHICLE_TRANSPORT").count() as u32;
            let normalized = normalized(&raw);

            prop_assert_eq!(normalized.changes, vehicles.saturating_sub(1));
            prop_assert_eq!(normalized.segments.len(), types.len());
        }

        /// Arbitrary stop indices and times never panic
        #[test]
        fn never_panics(
            start_idx in proptest::option::of(0usize..6),
            end_idx in proptest::option::of(0usize..6),
            stops in 0usize..4,
            start in "\\PC{0,25}",
            end in "\\PC{0,25}",
            seconds in proptest::num::f64::ANY,
        ) {
            let route_stops: Vec<_> = (0..stops)
                .map(|i| json!({ "lineStop": { "stopPoint": { "stopName": format!("S{i}") } } }))
                .collect();
            let raw: RawRoute = serde_json::from_value(json!({
                "routeParts": [{
                    "routePartType": "VEHICLE_TRANSPORT",
                    "startDeparture": { "departureTime": start },
                    "targetArrival": { "arrivalTime": end },
                    "durationSeconds": if seconds.is_finite() { json!(seconds) } else { json!(null) },
                    "routeVehicle": {
                        "stopsStartIndex": start_idx,
                        "stopsEndIndex": end_idx,
                        "routeStops": route_stops
                    }
                }]
            }))
            .unwrap();

            let normalized = normalized(&raw);
            let segment = &normalized.segments[0];
            prop_assert!(!segment.from.is_empty());
            prop_assert!(!segment.to.is_empty());
            prop_assert_eq!(normalized.changes, 0);
        }
    }
}
