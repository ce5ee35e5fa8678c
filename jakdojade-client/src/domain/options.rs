//! Public transport preferences for a route search.

use serde::{Deserialize, Serialize};

/// How strongly to avoid changing vehicles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AvoidChanges {
    #[default]
    Default,
    /// Direct connections only
    NoChanges,
    /// Prefer fewer changes
    AvoidChanges,
}

/// Accessibility requirements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Accessibility {
    #[default]
    None,
    AllVehiclesWheelchairAccessible,
}

/// Ranking preference for returned connections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectionPreference {
    #[default]
    Optimal,
    Fast,
    Convenient,
}

/// Line, vehicle and operator filters for a search.
///
/// List fields hold distinct values in insertion order. Line numbers are
/// stored as strings, which is how the provider expects them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransitOptions {
    pub avoid_changes: AvoidChanges,
    pub avoid_vehicles: Vec<String>,
    pub prohibited_vehicles: Vec<String>,
    pub prohibited_operators: Vec<String>,
    pub avoid_line_types: Vec<String>,
    pub accessibility_options: Accessibility,
    pub preferred_lines: Vec<String>,
    pub avoid_lines: Vec<String>,
    /// Minimum minutes allowed for a change; `null` on the wire when unset
    pub forced_change_time: Option<u32>,
}

/// Append `value` unless it is already present.
///
/// Returns true if the value was added.
pub(crate) fn push_unique(list: &mut Vec<String>, value: String) -> bool {
    if list.contains(&value) {
        return false;
    }
    list.push(value);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_match_provider_defaults() {
        assert_eq!(
            serde_json::to_value(TransitOptions::default()).unwrap(),
            json!({
                "avoidChanges": "DEFAULT",
                "avoidVehicles": [],
                "prohibitedVehicles": [],
                "prohibitedOperators": [],
                "avoidLineTypes": [],
                "accessibilityOptions": "NONE",
                "preferredLines": [],
                "avoidLines": [],
                "forcedChangeTime": null
            })
        );
    }

    #[test]
    fn enum_wire_names() {
        assert_eq!(
            serde_json::to_value(AvoidChanges::NoChanges).unwrap(),
            "NO_CHANGES"
        );
        assert_eq!(
            serde_json::to_value(AvoidChanges::AvoidChanges).unwrap(),
            "AVOID_CHANGES"
        );
        assert_eq!(
            serde_json::to_value(Accessibility::AllVehiclesWheelchairAccessible).unwrap(),
            "ALL_VEHICLES_WHEELCHAIR_ACCESSIBLE"
        );
        assert_eq!(
            serde_json::to_value(ConnectionPreference::Convenient).unwrap(),
            "CONVENIENT"
        );
    }

    #[test]
    fn missing_fields_take_defaults() {
        let opts: TransitOptions = serde_json::from_value(json!({ "avoidLines": ["509"] })).unwrap();
        assert_eq!(opts.avoid_lines, vec!["509"]);
        assert_eq!(opts.avoid_changes, AvoidChanges::Default);
        assert_eq!(opts.forced_change_time, None);
    }

    #[test]
    fn push_unique_skips_duplicates() {
        let mut list = Vec::new();
        assert!(push_unique(&mut list, "509".to_string()));
        assert!(push_unique(&mut list, "159".to_string()));
        assert!(!push_unique(&mut list, "509".to_string()));
        assert_eq!(list, vec!["509", "159"]);
    }
}
