//! Display languages and the localized strings the normalizers emit.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Display language for provider requests and placeholder texts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Finnish
    #[default]
    Fi,
    /// English
    En,
}

impl Language {
    /// Two-letter code used in provider query strings.
    pub fn code(&self) -> &'static str {
        match self {
            Language::Fi => "fi",
            Language::En => "en",
        }
    }

    /// Localized display strings for this language.
    pub fn strings(&self) -> &'static Strings {
        match self {
            Language::Fi => &FINNISH,
            Language::En => &ENGLISH,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Error for unrecognised language codes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown language: {0} (expected 'fi' or 'en')")]
pub struct UnknownLanguage(pub String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fi" => Ok(Language::Fi),
            "en" => Ok(Language::En),
            other => Err(UnknownLanguage(other.to_string())),
        }
    }
}

/// Per-language placeholder and label texts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Strings {
    /// Label for an arrival that has already passed on today's clock
    pub departs_tomorrow: &'static str,
    /// Notice shown in place of a section whose data could not be loaded
    pub no_data: &'static str,
    /// Allergen text for courses without allergen info
    pub no_allergens: &'static str,
    /// Prefix for the apparent temperature
    pub feels_like: &'static str,
}

/// Label for the first arrival of a stop whose time has come. Not localized.
pub const NOW_LABEL: &str = "NOW";

/// Single line shown for a stop without arrivals. Not localized.
pub const NO_DEPARTURES_LABEL: &str = "No upcoming departures";

static FINNISH: Strings = Strings {
    departs_tomorrow: "lähtee huomenna",
    no_data: "Tietoja ei saatavilla",
    no_allergens: "Ei allergeenejä",
    feels_like: "Tuntuu kuin",
};

static ENGLISH: Strings = Strings {
    departs_tomorrow: "departs tomorrow",
    no_data: "No data available",
    no_allergens: "No allergens",
    feels_like: "Feels like",
};
