//! Menu display lines.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One formatted, display-ready dish or set menu.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MenuLine(String);

impl MenuLine {
    pub fn new(line: impl Into<String>) -> Self {
        Self(line.into())
    }

    /// Get the line as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MenuLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for MenuLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MenuLine({})", self.0)
    }
}

impl From<String> for MenuLine {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for MenuLine {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Placeholder for a missing price or diet list.
pub const MISSING_FIELD: &str = "-";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_line_serializes_as_plain_string() {
        let line = MenuLine::from("Lounas: Kalakeitto (L, G) 2,70€");
        let json = serde_json::to_string(&line).unwrap();
        assert_eq!(json, "\"Lounas: Kalakeitto (L, G) 2,70€\"");
    }

    #[test]
    fn test_menu_line_display() {
        let line = MenuLine::new("Pasta (VEG, -) 2.70");
        assert_eq!(line.to_string(), "Pasta (VEG, -) 2.70");
        assert_eq!(line.as_str(), "Pasta (VEG, -) 2.70");
    }
}
