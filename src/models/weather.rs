//! Normalized weather forecast model.

use serde::{Deserialize, Serialize};

/// Weather conditions at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSample {
    /// Local clock time, "H:MM"
    pub time: String,

    /// Temperature in °C, unrounded
    pub temp: f64,

    /// Apparent temperature in °C, unrounded
    pub feels_like: f64,

    pub description: String,

    pub icon_url: String,
}

/// Current conditions plus the hourly forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRecord {
    pub current: WeatherSample,

    /// Hourly samples in provider order; at least [`ForecastRecord::MIN_HOURLY`]
    pub hourly: Vec<WeatherSample>,
}

impl ForecastRecord {
    /// Minimum hourly samples a record is built from.
    pub const MIN_HOURLY: usize = 5;

    /// The upcoming hours shown next to current conditions.
    ///
    /// Index 0 overlaps the current hour and is skipped.
    pub fn next_hours(&self) -> &[WeatherSample] {
        let end = self.hourly.len().min(Self::MIN_HOURLY);
        self.hourly.get(1..end).unwrap_or(&[])
    }
}
