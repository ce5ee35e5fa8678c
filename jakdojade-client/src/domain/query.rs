//! Route search query.
//!
//! A `SearchQuery` is the validated result of
//! [`RouteQueryBuilder::build`](crate::builder::RouteQueryBuilder::build).
//! Its wire shape nests most fields under `searchQuery`; see
//! [`RouteSearchRequest`](crate::jakdojade::RouteSearchRequest).

use std::fmt;

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};

use super::{ConnectionPreference, Coordinate, Location, TransitOptions};

/// Number of routes requested when not set explicitly.
pub const DEFAULT_ROUTES_COUNT: u32 = 6;

/// Routing engine selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Engine {
    #[default]
    Default,
}

/// Whether results are computed within the request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FetchType {
    #[default]
    Sync,
}

/// Correlation between returned routes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoutesCorrelation {
    #[default]
    None,
}

/// Whether live vehicle positions are taken into account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RealtimeSearchMode {
    #[default]
    RealtimeEnabled,
}

/// Whether the query time is a departure or an arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueryTimeType {
    Departure,
    Arrival,
}

/// When to travel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeOptions {
    /// ISO-8601 local time with offset, to the second
    pub date_time: String,
    pub query_time_type: QueryTimeType,
}

impl TimeOptions {
    /// Depart at the given time.
    pub fn departing<Tz: TimeZone>(at: &DateTime<Tz>) -> Self
    where
        Tz::Offset: fmt::Display,
    {
        Self {
            date_time: format_date_time(at),
            query_time_type: QueryTimeType::Departure,
        }
    }

    /// Arrive by the given time.
    pub fn arriving<Tz: TimeZone>(at: &DateTime<Tz>) -> Self
    where
        Tz::Offset: fmt::Display,
    {
        Self {
            date_time: format_date_time(at),
            query_time_type: QueryTimeType::Arrival,
        }
    }

    /// Depart now, in the local time zone.
    pub fn depart_now() -> Self {
        Self::departing(&Local::now())
    }
}

/// Format as `2024-05-01T18:00:00+02:00`, dropping sub-second precision.
fn format_date_time<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    at.format("%Y-%m-%dT%H:%M:%S%:z").to_string()
}

/// A complete, validated route search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub engine: Engine,
    pub fetch_type: FetchType,
    pub routes_correlation: RoutesCorrelation,
    /// Device position, if known
    pub user_location: Option<Coordinate>,
    pub start: Location,
    pub destination: Location,
    pub time_options: TimeOptions,
    pub realtime_search_mode: RealtimeSearchMode,
    /// Always at least 1
    pub routes_count: u32,
    pub public_transport_options: TransitOptions,
    pub connection_preference: ConnectionPreference,
}
