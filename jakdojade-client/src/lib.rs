//! Client for the Jakdojade public transit journey planner.
//!
//! Registers an anonymous device, signs requests the way the jakdojade.pl
//! web app does, builds route searches, and flattens the provider's route
//! responses into segments.

pub mod builder;
pub mod cache;
pub mod domain;
pub mod jakdojade;
pub mod session;
pub mod sign;
