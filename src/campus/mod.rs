//! Campus directory.
//!
//! Campuses are looked up by name, case-insensitively. A request that names
//! no campus falls back to the configured default.

use thiserror::Error;

use crate::models::{Campus, Coordinates, ProviderKind, Restaurant};

/// Default campus when none is requested.
pub const DEFAULT_CAMPUS: &str = "Karamalmi";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CampusError {
    #[error("Unknown campus: {0}")]
    Unknown(String),
}

/// The built-in campus list.
pub fn default_campuses() -> Vec<Campus> {
    vec![
        Campus::new(
            "Arabia",
            Coordinates::new(60.21015476867742, 24.976743641873423),
            Restaurant {
                name: "compass-arabia".to_string(),
                display_name: "Compass Arabia".to_string(),
                id: 0,
                provider: ProviderKind::StaticWeekly,
            },
        ),
        Campus::new(
            "Karamalmi",
            Coordinates::new(60.2238794, 24.758149),
            Restaurant {
                name: "fazer-karamalmi".to_string(),
                display_name: "Fazer Karamalmi".to_string(),
                id: 270540,
                provider: ProviderKind::WeeklySetMenu,
            },
        ),
        Campus::new(
            "Myllypuro",
            Coordinates::new(60.2236145, 25.0783509),
            Restaurant {
                name: "sodexo-myllypuro".to_string(),
                display_name: "Sodexo Myllypuro".to_string(),
                id: 158,
                provider: ProviderKind::CourseList,
            },
        ),
        Campus::new(
            "Myyrmäki",
            Coordinates::new(60.2586191, 24.8454723),
            Restaurant {
                name: "sodexo-myyrmaki".to_string(),
                display_name: "Sodexo Myyrmäki".to_string(),
                id: 152,
                provider: ProviderKind::CourseList,
            },
        ),
    ]
}

/// Named campuses plus the fallback choice.
#[derive(Debug, Clone)]
pub struct CampusDirectory {
    campuses: Vec<Campus>,
    default_campus: String,
}

impl CampusDirectory {
    pub fn new(campuses: Vec<Campus>, default_campus: impl Into<String>) -> Self {
        Self {
            campuses,
            default_campus: default_campus.into(),
        }
    }

    pub fn campuses(&self) -> &[Campus] {
        &self.campuses
    }

    /// Find a campus by name.
    pub fn find(&self, name: &str) -> Option<&Campus> {
        self.campuses.iter().find(|c| c.matches(name))
    }

    /// Resolve a requested campus, using the default when the request is empty.
    pub fn resolve(&self, requested: Option<&str>) -> Result<&Campus, CampusError> {
        let name = match requested.map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => self.default_campus.as_str(),
        };
        self.find(name)
            .ok_or_else(|| CampusError::Unknown(name.to_string()))
    }
}

impl Default for CampusDirectory {
    fn default() -> Self {
        Self::new(default_campuses(), DEFAULT_CAMPUS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_campuses() {
        let campuses = default_campuses();
        let names: Vec<&str> = campuses.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Arabia", "Karamalmi", "Myllypuro", "Myyrmäki"]);
    }

    #[test]
    fn test_default_campus_providers() {
        let directory = CampusDirectory::default();
        let provider = |name: &str| directory.find(name).unwrap().restaurant.provider;

        assert_eq!(provider("arabia"), ProviderKind::StaticWeekly);
        assert_eq!(provider("karamalmi"), ProviderKind::WeeklySetMenu);
        assert_eq!(provider("myllypuro"), ProviderKind::CourseList);
        assert_eq!(provider("myyrmäki"), ProviderKind::CourseList);
    }

    #[test]
    fn test_resolve_named() {
        let directory = CampusDirectory::default();
        let campus = directory.resolve(Some("MYLLYPURO")).unwrap();
        assert_eq!(campus.restaurant.id, 158);
    }

    #[test]
    fn test_resolve_falls_back_to_default() {
        let directory = CampusDirectory::default();
        assert_eq!(directory.resolve(None).unwrap().name, "Karamalmi");
        assert_eq!(directory.resolve(Some("  ")).unwrap().name, "Karamalmi");
    }

    #[test]
    fn test_resolve_unknown() {
        let directory = CampusDirectory::default();
        assert_eq!(
            directory.resolve(Some("Otaniemi")).unwrap_err(),
            CampusError::Unknown("Otaniemi".to_string())
        );
    }
}
