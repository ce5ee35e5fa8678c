//! Fluent construction of route searches.
//!
//! The builder is a plain value: every method takes it by value and
//! returns the updated builder, and [`RouteQueryBuilder::build`] borrows it,
//! so one builder can produce many queries.

use std::fmt;

use chrono::{DateTime, TimeZone};

use crate::domain::{
    Accessibility, AvoidChanges, ConnectionPreference, Coordinate, DEFAULT_ROUTES_COUNT, Engine,
    FetchType, Location, RealtimeSearchMode, RoutesCorrelation, SearchQuery, TimeOptions,
    TransitOptions, ValidationError, push_unique,
};

/// Builder for [`SearchQuery`].
///
/// # Examples
///
/// ```
/// use jakdojade_client::builder::RouteQueryBuilder;
/// use jakdojade_client::domain::{AvoidChanges, Coordinate, Location};
///
/// let query = RouteQueryBuilder::new()
///     .from(Location::address("WARSZAWA", "Plac Defilad 1", Coordinate::new(52.2319, 21.0067)))
///     .to(Location::stop_point("WARSZAWA", "Międzynarodowa", "209802", Coordinate::new(52.22997, 21.068713)))
///     .avoid_line(509)
///     .avoid_line("509")
///     .avoid_changes(AvoidChanges::AvoidChanges)
///     .build()
///     .unwrap();
///
/// assert_eq!(query.public_transport_options.avoid_lines, vec!["509"]);
/// ```
#[derive(Debug, Clone)]
pub struct RouteQueryBuilder {
    start: Option<Location>,
    destination: Option<Location>,
    time_options: Option<TimeOptions>,
    user_location: Option<Coordinate>,
    routes_count: u32,
    options: TransitOptions,
    connection_preference: ConnectionPreference,
}

impl Default for RouteQueryBuilder {
    fn default() -> Self {
        Self {
            start: None,
            destination: None,
            time_options: None,
            user_location: None,
            routes_count: DEFAULT_ROUTES_COUNT,
            options: TransitOptions::default(),
            connection_preference: ConnectionPreference::default(),
        }
    }
}

impl RouteQueryBuilder {
    /// Create a builder with provider defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the start location.
    pub fn from(mut self, location: Location) -> Self {
        self.start = Some(location);
        self
    }

    /// Set the destination.
    pub fn to(mut self, location: Location) -> Self {
        self.destination = Some(location);
        self
    }

    /// Depart at the given time.
    pub fn departing_at<Tz: TimeZone>(mut self, at: &DateTime<Tz>) -> Self
    where
        Tz::Offset: fmt::Display,
    {
        self.time_options = Some(TimeOptions::departing(at));
        self
    }

    /// Arrive by the given time.
    pub fn arriving_at<Tz: TimeZone>(mut self, at: &DateTime<Tz>) -> Self
    where
        Tz::Offset: fmt::Display,
    {
        self.time_options = Some(TimeOptions::arriving(at));
        self
    }

    /// Set prepared time options.
    pub fn time_options(mut self, time_options: TimeOptions) -> Self {
        self.time_options = Some(time_options);
        self
    }

    /// Report the device position to the provider.
    pub fn user_location(mut self, coordinate: Coordinate) -> Self {
        self.user_location = Some(coordinate);
        self
    }

    /// Number of routes to request. Must be at least 1.
    pub fn routes_count(mut self, count: u32) -> Self {
        self.routes_count = count;
        self
    }

    /// Avoid a line. Numeric line numbers are stored as strings.
    pub fn avoid_line(mut self, line: impl ToString) -> Self {
        push_unique(&mut self.options.avoid_lines, line.to_string());
        self
    }

    /// Prefer a line. Numeric line numbers are stored as strings.
    pub fn prefer_line(mut self, line: impl ToString) -> Self {
        push_unique(&mut self.options.preferred_lines, line.to_string());
        self
    }

    /// Avoid a vehicle type, e.g. `VEHICLE_TYPE_TRAIN`.
    pub fn avoid_vehicle(mut self, vehicle_type: impl Into<String>) -> Self {
        push_unique(&mut self.options.avoid_vehicles, vehicle_type.into());
        self
    }

    /// Exclude a vehicle type entirely.
    pub fn prohibit_vehicle(mut self, vehicle_type: impl Into<String>) -> Self {
        push_unique(&mut self.options.prohibited_vehicles, vehicle_type.into());
        self
    }

    /// Exclude an operator.
    pub fn prohibit_operator(mut self, operator: impl Into<String>) -> Self {
        push_unique(&mut self.options.prohibited_operators, operator.into());
        self
    }

    /// Avoid a line type.
    pub fn avoid_line_type(mut self, line_type: impl Into<String>) -> Self {
        push_unique(&mut self.options.avoid_line_types, line_type.into());
        self
    }

    pub fn avoid_changes(mut self, mode: AvoidChanges) -> Self {
        self.options.avoid_changes = mode;
        self
    }

    pub fn connection_type(mut self, preference: ConnectionPreference) -> Self {
        self.connection_preference = preference;
        self
    }

    /// Minimum minutes to allow for each change.
    pub fn forced_change_time(mut self, minutes: u32) -> Self {
        self.options.forced_change_time = Some(minutes);
        self
    }

    /// Only use wheelchair-accessible vehicles.
    pub fn wheelchair_accessible(mut self) -> Self {
        self.options.accessibility_options = Accessibility::AllVehiclesWheelchairAccessible;
        self
    }

    /// Current transit options.
    pub fn options(&self) -> &TransitOptions {
        &self.options
    }

    /// Validate and produce the query.
    ///
    /// Start and destination are required. Without explicit time options
    /// the query departs now, evaluated at each call. The builder is left
    /// untouched.
    pub fn build(&self) -> Result<SearchQuery, ValidationError> {
        let start = self
            .start
            .clone()
            .ok_or(ValidationError::MissingField("start"))?;
        let destination = self
            .destination
            .clone()
            .ok_or(ValidationError::MissingField("destination"))?;

        if self.routes_count == 0 {
            return Err(ValidationError::InvalidRoutesCount(self.routes_count));
        }

        let time_options = self
            .time_options
            .clone()
            .unwrap_or_else(TimeOptions::depart_now);

        Ok(SearchQuery {
            engine: Engine::default(),
            fetch_type: FetchType::default(),
            routes_correlation: RoutesCorrelation::default(),
            user_location: self.user_location,
            start,
            destination,
            time_options,
            realtime_search_mode: RealtimeSearchMode::default(),
            routes_count: self.routes_count,
            public_transport_options: self.options.clone(),
            connection_preference: self.connection_preference,
        })
    }
}
