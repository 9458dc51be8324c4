//! Campus and restaurant model.

use serde::{Deserialize, Serialize};

/// WGS84 coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Upstream menu data shape served for a restaurant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// Weekday-indexed `LunchMenus` fetched over the network
    WeeklySetMenu,
    /// Flat daily course mapping with per-language titles
    CourseList,
    /// Weekday-indexed `LunchMenus` read from bundled data
    StaticWeekly,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKind::WeeklySetMenu => write!(f, "weekly_set_menu"),
            ProviderKind::CourseList => write!(f, "course_list"),
            ProviderKind::StaticWeekly => write!(f, "static_weekly"),
        }
    }
}

/// The cafeteria serving a campus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    /// Slug (e.g., "fazer-karamalmi")
    pub name: String,

    /// Human-readable name
    pub display_name: String,

    /// Provider-side restaurant identifier
    pub id: u32,

    /// Which adapter normalizes this restaurant's menus
    pub provider: ProviderKind,
}

/// A university campus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campus {
    /// Display name, also the lookup key (case-insensitive)
    pub name: String,

    /// Location used for weather and nearby stops
    pub coords: Coordinates,

    pub restaurant: Restaurant,
}

impl Campus {
    pub fn new(name: impl Into<String>, coords: Coordinates, restaurant: Restaurant) -> Self {
        Self {
            name: name.into(),
            coords,
            restaurant,
        }
    }

    /// Whether `query` names this campus, ignoring case and surrounding whitespace.
    pub fn matches(&self, query: &str) -> bool {
        self.name.to_lowercase() == query.trim().to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn campus() -> Campus {
        Campus::new(
            "Myyrmäki",
            Coordinates::new(60.2586191, 24.8454723),
            Restaurant {
                name: "sodexo-myyrmaki".to_string(),
                display_name: "Sodexo Myyrmäki".to_string(),
                id: 152,
                provider: ProviderKind::CourseList,
            },
        )
    }

    #[test]
    fn test_campus_matches_case_insensitive() {
        let campus = campus();
        assert!(campus.matches("myyrmäki"));
        assert!(campus.matches("MYYRMÄKI "));
        assert!(!campus.matches("myllypuro"));
    }

    #[test]
    fn test_provider_kind_serialization() {
        let json = serde_json::to_string(&ProviderKind::WeeklySetMenu).unwrap();
        assert_eq!(json, "\"weekly_set_menu\"");

        let kind: ProviderKind = serde_json::from_str("\"static_weekly\"").unwrap();
        assert_eq!(kind, ProviderKind::StaticWeekly);
    }

    #[test]
    fn test_provider_kind_display_matches_serde() {
        for kind in [
            ProviderKind::WeeklySetMenu,
            ProviderKind::CourseList,
            ProviderKind::StaticWeekly,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind));
        }
    }
}
