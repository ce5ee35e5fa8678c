//! Domain types for the Jakdojade client.
//!
//! This module holds the provider-independent model: what a search asks
//! for and what a flattened route looks like. Wire DTOs live in
//! [`crate::jakdojade`].

mod error;
mod location;
mod options;
mod query;
mod route;

pub use error::ValidationError;
pub use location::{Coordinate, Location, LocationType};
pub(crate) use options::push_unique;
pub use options::{Accessibility, AvoidChanges, ConnectionPreference, TransitOptions};
pub use query::{
    DEFAULT_ROUTES_COUNT, Engine, FetchType, QueryTimeType, RealtimeSearchMode, RoutesCorrelation,
    SearchQuery, TimeOptions,
};
pub use route::{
    DERIVED_FIELDS, NormalizedRoute, POINT, Route, Segment, SegmentKind, UNKNOWN, count_changes,
    without_derived_fields,
};
