//! Flattened route types.
//!
//! A `NormalizedRoute` is the provider's nested route reduced to a start
//! and end time, a duration, a change count, and an ordered list of
//! segments. Provider fields that are not derived here are kept verbatim in
//! `provider_fields`. A route the provider sent without parts is not
//! normalized at all; it stays a [`Route::Passthrough`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Placeholder for a stop or line that could not be resolved.
pub const UNKNOWN: &str = "Unknown";

/// Placeholder endpoint for walks and other non-vehicle segments.
pub const POINT: &str = "Point";

/// What a segment of a route is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SegmentKind {
    /// Riding a public transport vehicle
    Vehicle,
    /// Walking
    Walk,
    /// A part type the provider added that we do not model
    Other,
}

/// One leg of a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub kind: SegmentKind,
    /// Boarding stop name, or a placeholder
    pub from: String,
    /// Alighting stop name, or a placeholder
    pub to: String,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub duration_minutes: u32,
    pub distance_meters: Option<f64>,
    /// Line display name
    pub line: Option<String>,
    /// Provider vehicle type, e.g. `BUS`, `TRAM`
    pub vehicle_type: Option<String>,
    /// Heading shown on the vehicle
    pub direction: Option<String>,
}

impl Segment {
    /// Returns true if this is a vehicle segment.
    pub fn is_vehicle(&self) -> bool {
        self.kind == SegmentKind::Vehicle
    }

    /// Returns true if this is a walk segment.
    pub fn is_walk(&self) -> bool {
        self.kind == SegmentKind::Walk
    }
}

/// Keys the flat form writes itself. Provider fields with these names are
/// not carried into `provider_fields`.
pub const DERIVED_FIELDS: [&str; 5] = [
    "startTime",
    "endTime",
    "durationMinutes",
    "changes",
    "segments",
];

/// A route in flat form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedRoute {
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub duration_minutes: u32,
    /// Vehicle segments minus one, never negative
    pub changes: u32,
    pub segments: Vec<Segment>,
    /// Provider route fields other than the route parts and
    /// [`DERIVED_FIELDS`]
    #[serde(flatten)]
    pub provider_fields: Map<String, Value>,
}

impl NormalizedRoute {
    /// Iterate over vehicle segments only.
    pub fn vehicle_segments(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter().filter(|s| s.is_vehicle())
    }

    /// Total walking distance in meters, counting walks that report one.
    pub fn walking_distance_meters(&self) -> f64 {
        self.segments
            .iter()
            .filter(|s| s.is_walk())
            .filter_map(|s| s.distance_meters)
            .sum()
    }
}

/// Drop provider keys that would collide with the derived fields.
pub fn without_derived_fields(mut fields: Map<String, Value>) -> Map<String, Value> {
    for key in DERIVED_FIELDS {
        fields.remove(key);
    }
    fields
}

/// One route of a search response.
///
/// Serializes without a tag: a normalized route as its flat form, a
/// passthrough route as exactly the object the provider sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Route {
    /// The route had parts and was flattened
    Normalized(NormalizedRoute),
    /// The route had no parts; nothing was derived or changed
    Passthrough(Map<String, Value>),
}

impl Route {
    /// Returns true if the route was passed through untouched.
    pub fn is_passthrough(&self) -> bool {
        matches!(self, Route::Passthrough(_))
    }

    pub fn as_normalized(&self) -> Option<&NormalizedRoute> {
        match self {
            Route::Normalized(route) => Some(route),
            Route::Passthrough(_) => None,
        }
    }

    pub fn into_normalized(self) -> Option<NormalizedRoute> {
        match self {
            Route::Normalized(route) => Some(route),
            Route::Passthrough(_) => None,
        }
    }
}

/// Count changes for a segment list: vehicle segments minus one.
pub fn count_changes(segments: &[Segment]) -> u32 {
    let vehicles = segments.iter().filter(|s| s.is_vehicle()).count();
    u32::try_from(vehicles.saturating_sub(1)).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn segment(kind: SegmentKind) -> Segment {
        Segment {
            kind,
            from: POINT.into(),
            to: POINT.into(),
            start_time: None,
            end_time: None,
            duration_minutes: 5,
            distance_meters: Some(250.0),
            line: None,
            vehicle_type: None,
            direction: None,
        }
    }

    #[test]
    fn changes_ignore_walks() {
        use SegmentKind::*;
        let segments: Vec<_> = [Walk, Vehicle, Walk, Vehicle, Vehicle]
            .into_iter()
            .map(segment)
            .collect();
        assert_eq!(count_changes(&segments), 2);
    }

    #[test]
    fn changes_never_negative() {
        assert_eq!(count_changes(&[]), 0);
        assert_eq!(count_changes(&[segment(SegmentKind::Walk)]), 0);
        assert_eq!(count_changes(&[segment(SegmentKind::Vehicle)]), 0);
    }

    #[test]
    fn other_parts_are_not_changes() {
        let segments = vec![
            segment(SegmentKind::Vehicle),
            segment(SegmentKind::Other),
            segment(SegmentKind::Vehicle),
        ];
        assert_eq!(count_changes(&segments), 1);
    }

    fn flat(segments: Vec<Segment>, provider_fields: Map<String, Value>) -> NormalizedRoute {
        NormalizedRoute {
            start_time: None,
            end_time: None,
            duration_minutes: 0,
            changes: count_changes(&segments),
            segments,
            provider_fields,
        }
    }

    #[test]
    fn walking_distance_sums_walks() {
        let route = flat(
            vec![
                segment(SegmentKind::Walk),
                segment(SegmentKind::Vehicle),
                segment(SegmentKind::Walk),
            ],
            Map::new(),
        );
        assert_eq!(route.walking_distance_meters(), 500.0);
        assert_eq!(route.vehicle_segments().count(), 1);
    }

    #[test]
    fn serializes_flat_with_provider_fields() {
        let mut fields = Map::new();
        fields.insert("routeId".into(), Value::from("r1"));
        let route = Route::Normalized(flat(vec![segment(SegmentKind::Walk)], fields));

        let value = serde_json::to_value(&route).unwrap();
        assert_eq!(value["routeId"], "r1");
        assert_eq!(value["durationMinutes"], 0);
        assert_eq!(value["segments"][0]["kind"], "WALK");
    }

    #[test]
    fn derived_names_are_stripped() {
        let fields = json!({
            "routeId": "r1",
            "segments": "provider",
            "changes": 9,
            "startTime": "x",
            "endTime": "y",
            "durationMinutes": 99
        });
        let Value::Object(fields) = fields else {
            unreachable!()
        };

        let kept = without_derived_fields(fields);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept["routeId"], "r1");
    }

    #[test]
    fn passthrough_serializes_as_is() {
        let input = json!({ "routeId": "r-0", "routeParts": [] });
        let Value::Object(fields) = input.clone() else {
            unreachable!()
        };

        let route = Route::Passthrough(fields);
        assert!(route.is_passthrough());
        assert!(route.as_normalized().is_none());
        assert_eq!(serde_json::to_value(&route).unwrap(), input);
    }

    #[test]
    fn normalized_round_trips() {
        let mut fields = Map::new();
        fields.insert("routeId".into(), Value::from("r1"));
        let route = Route::Normalized(flat(
            vec![segment(SegmentKind::Vehicle), segment(SegmentKind::Walk)],
            fields,
        ));

        let json = serde_json::to_string(&route).unwrap();
        let parsed: Route = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, route);
    }
}
