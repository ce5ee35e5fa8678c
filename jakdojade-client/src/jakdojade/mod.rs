//! Jakdojade API client.
//!
//! This module provides an HTTP client for the Jakdojade journey planner
//! used by the jakdojade.pl web app.
//!
//! Key characteristics of the API:
//! - Every data request is signed with HMAC-SHA512 using credentials from
//!   an anonymous device registration
//! - Route search responses are deeply nested and loosely typed; they are
//!   flattened into [`crate::domain::NormalizedRoute`]s
//! - Location lookups are returned as raw JSON

mod client;
mod convert;
mod error;
pub mod headers;
mod types;

pub use client::{
    DEFAULT_BASE_URL, DEFAULT_CITY_SYMBOL, JakdojadeClient, JakdojadeConfig, LOCATIONS_PATH,
    REGISTER_PATH, ROUTES_PATH, location_params, new_device_id,
};
pub use convert::{normalize_response, normalize_route};
pub use error::{ErrorKind, JakdojadeError};
pub use types::{
    Arrival, Departure, Line, LineDisplayName, LineStop, RawRoute, RawSearchResponse,
    RegisterResponse, RouteLine, RoutePart, RoutePartType, RouteSearchRequest, RouteStop,
    RouteVehicle, SearchQueryBody, SearchResponse, StopPoint, Timestamp,
};
