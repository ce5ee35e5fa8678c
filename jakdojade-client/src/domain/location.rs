//! Search endpoints: addresses and stop points.

use serde::{Deserialize, Serialize};

/// A geographic coordinate.
///
/// The provider names the axes `y_lat` and `x_lon` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees
    #[serde(rename = "y_lat")]
    pub lat: f64,
    /// Longitude in degrees
    #[serde(rename = "x_lon")]
    pub lon: f64,
}

impl Coordinate {
    /// Creates a coordinate from latitude and longitude.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// What kind of place a [`Location`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocationType {
    /// A street address
    Address,
    /// A public transport stop
    StopPoint,
}

/// A route search start or destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Provider city identifier, e.g. `WARSZAWA`
    pub city_symbol: String,
    pub coordinate: Coordinate,
    pub location_type: LocationType,
    /// Display name
    pub location_name: String,
    /// Stop code, set for stop points
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_code: Option<String>,
}

impl Location {
    /// An address location.
    pub fn address(
        city_symbol: impl Into<String>,
        name: impl Into<String>,
        coordinate: Coordinate,
    ) -> Self {
        Self {
            city_symbol: city_symbol.into(),
            coordinate,
            location_type: LocationType::Address,
            location_name: name.into(),
            location_code: None,
        }
    }

    /// A stop point location with its provider stop code.
    pub fn stop_point(
        city_symbol: impl Into<String>,
        name: impl Into<String>,
        code: impl Into<String>,
        coordinate: Coordinate,
    ) -> Self {
        Self {
            city_symbol: city_symbol.into(),
            coordinate,
            location_type: LocationType::StopPoint,
            location_name: name.into(),
            location_code: Some(code.into()),
        }
    }
}
