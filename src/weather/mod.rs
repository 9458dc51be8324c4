//! OpenWeather one-call forecast client and normalizer.
//!
//! The provider returns `current` conditions and an `hourly` array; both
//! are reshaped into [`WeatherSample`]s with a local "H:MM" time and a
//! deterministic icon URL. Temperatures are passed through unrounded.

use chrono::{Local, TimeZone};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use crate::clock::format_clock_time;
use crate::fetch::{FetchError, Fetcher};
use crate::models::{Coordinates, ForecastRecord, Language, WeatherSample};

/// Default one-call endpoint.
pub const DEFAULT_ONECALL_URL: &str = "https://api.openweathermap.org/data/2.5/onecall";

/// Icon URLs are this prefix, the icon code (e.g., "10d") and ".png".
const ICON_URL_PREFIX: &str = "https://openweathermap.org/img/wn/";

/// Errors from fetching or normalizing a forecast.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Weather transport error: {0}")]
    Transport(#[from] FetchError),

    #[error("Malformed forecast payload: {0}")]
    MalformedPayload(String),

    #[error("Forecast JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No OpenWeather API key configured")]
    MissingApiKey,
}

// ── One-call response types ─────────────────────────────────────────────────

/// The subset of the one-call response the normalizer reads.
#[derive(Debug, Clone, Deserialize)]
pub struct OneCallResponse {
    #[serde(default)]
    pub current: Option<RawSample>,

    #[serde(default)]
    pub hourly: Vec<RawSample>,
}

/// One `current` or `hourly` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSample {
    /// Unix timestamp, seconds
    pub dt: i64,
    pub temp: f64,
    pub feels_like: f64,
    #[serde(default)]
    pub weather: Vec<RawCondition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCondition {
    #[serde(default)]
    pub description: String,
    pub icon: String,
}

// ── Normalization ───────────────────────────────────────────────────────────

/// Build the icon URL for a provider icon code.
pub fn icon_url(icon: &str) -> String {
    format!("{}{}.png", ICON_URL_PREFIX, icon)
}

fn to_sample<Tz: TimeZone>(
    raw: &RawSample,
    tz: &Tz,
    position: &str,
) -> Result<WeatherSample, WeatherError> {
    let condition = raw.weather.first().ok_or_else(|| {
        WeatherError::MalformedPayload(format!("{} sample has no weather conditions", position))
    })?;

    Ok(WeatherSample {
        time: format_clock_time(raw.dt, tz),
        temp: raw.temp,
        feels_like: raw.feels_like,
        description: condition.description.clone(),
        icon_url: icon_url(&condition.icon),
    })
}

/// Reshape a one-call payload into a [`ForecastRecord`].
///
/// Fails instead of returning a partial record when `current` is missing,
/// a sample has no conditions, or fewer than
/// [`ForecastRecord::MIN_HOURLY`] hourly entries are present.
pub fn normalize_forecast<Tz: TimeZone>(
    payload: &OneCallResponse,
    tz: &Tz,
) -> Result<ForecastRecord, WeatherError> {
    let current = payload
        .current
        .as_ref()
        .ok_or_else(|| WeatherError::MalformedPayload("missing current block".to_string()))?;

    if payload.hourly.len() < ForecastRecord::MIN_HOURLY {
        return Err(WeatherError::MalformedPayload(format!(
            "expected at least {} hourly samples, got {}",
            ForecastRecord::MIN_HOURLY,
            payload.hourly.len()
        )));
    }

    let current = to_sample(current, tz, "current")?;
    let hourly = payload
        .hourly
        .iter()
        .enumerate()
        .map(|(i, raw)| to_sample(raw, tz, &format!("hourly[{}]", i)))
        .collect::<Result<Vec<_>, _>>()?;

    debug!("Normalized forecast with {} hourly samples", hourly.len());
    Ok(ForecastRecord { current, hourly })
}

/// Decode and normalize a raw one-call JSON document.
pub fn parse_forecast<Tz: TimeZone>(json: &str, tz: &Tz) -> Result<ForecastRecord, WeatherError> {
    let payload: OneCallResponse = serde_json::from_str(json)?;
    normalize_forecast(&payload, tz)
}

// ── Client ──────────────────────────────────────────────────────────────────

/// One-call forecast client.
pub struct WeatherClient {
    fetcher: Fetcher,
    base_url: Url,
    api_key: Option<String>,
}

impl WeatherClient {
    pub fn new(fetcher: Fetcher, base_url: Url, api_key: Option<String>) -> Self {
        Self {
            fetcher,
            base_url,
            api_key,
        }
    }

    /// Request URL for a location; `lang` selects the description language.
    pub fn forecast_url(&self, coords: Coordinates, language: Language) -> Result<Url, WeatherError> {
        let api_key = self.api_key.as_deref().ok_or(WeatherError::MissingApiKey)?;
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("lat", &coords.latitude.to_string())
            .append_pair("lon", &coords.longitude.to_string())
            .append_pair("exclude", "minutely,daily,alerts")
            .append_pair("units", "metric")
            .append_pair("lang", language.code())
            .append_pair("appid", api_key);
        Ok(url)
    }

    /// Fetch and normalize the forecast, formatting times in local time.
    pub async fn hourly_forecast(
        &self,
        coords: Coordinates,
        language: Language,
    ) -> Result<ForecastRecord, WeatherError> {
        let url = self.forecast_url(coords, language)?;
        info!(
            "Weather: fetching forecast for {},{}",
            coords.latitude, coords.longitude
        );
        let payload: OneCallResponse = self.fetcher.get_json(&url).await?;
        normalize_forecast(&payload, &Local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn raw_entry(dt: i64, temp: f64, icon: &str) -> serde_json::Value {
        json!({
            "dt": dt,
            "temp": temp,
            "feels_like": temp - 4.0,
            "humidity": 80,
            "weather": [{"id": 600, "main": "Snow", "description": "lumisade", "icon": icon}]
        })
    }

    fn payload(hourly_count: usize) -> serde_json::Value {
        // 2021-03-08T09:41:00Z, then whole hours from 09:00
        let hourly: Vec<_> = (0..hourly_count)
            .map(|i| raw_entry(1_615_194_000 + 3600 * i as i64, -2.0 + i as f64, "13d"))
            .collect();
        json!({
            "lat": 60.22,
            "lon": 24.76,
            "timezone": "Europe/Helsinki",
            "current": raw_entry(1_615_196_460, -1.37, "13n"),
            "hourly": hourly
        })
    }

    #[test]
    fn test_normalize_forecast_current() {
        let record = parse_forecast(&payload(48).to_string(), &Utc).unwrap();

        assert_eq!(
            record.current,
            WeatherSample {
                time: "9:41".to_string(),
                temp: -1.37,
                feels_like: -1.37 - 4.0,
                description: "lumisade".to_string(),
                icon_url: "https://openweathermap.org/img/wn/13n.png".to_string(),
            }
        );
    }

    #[test]
    fn test_normalize_forecast_hourly_in_provider_order() {
        let record = parse_forecast(&payload(48).to_string(), &Utc).unwrap();

        assert_eq!(record.hourly.len(), 48);
        let times: Vec<&str> = record.hourly[..5].iter().map(|s| s.time.as_str()).collect();
        assert_eq!(times, vec!["9:00", "10:00", "11:00", "12:00", "13:00"]);
        assert_eq!(record.hourly[3].temp, 1.0);
    }

    #[test]
    fn test_temperatures_not_rounded() {
        let record = parse_forecast(&payload(5).to_string(), &Utc).unwrap();
        assert_eq!(record.current.temp, -1.37);
    }

    #[test]
    fn test_exactly_five_hourly_is_enough() {
        let record = parse_forecast(&payload(5).to_string(), &Utc).unwrap();
        assert_eq!(record.next_hours().len(), 4);
    }

    #[test]
    fn test_too_few_hourly_is_malformed() {
        let err = parse_forecast(&payload(4).to_string(), &Utc).unwrap_err();
        assert!(matches!(err, WeatherError::MalformedPayload(_)));
    }

    #[test]
    fn test_missing_current_is_malformed() {
        let mut value = payload(48);
        value.as_object_mut().unwrap().remove("current");
        let err = parse_forecast(&value.to_string(), &Utc).unwrap_err();
        assert!(matches!(err, WeatherError::MalformedPayload(_)));
    }

    #[test]
    fn test_missing_conditions_is_malformed() {
        let mut value = payload(6);
        value["hourly"][2]["weather"] = json!([]);
        let err = parse_forecast(&value.to_string(), &Utc).unwrap_err();
        match err {
            WeatherError::MalformedPayload(msg) => assert!(msg.contains("hourly[2]")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_not_json_is_json_error() {
        let err = parse_forecast("<html>", &Utc).unwrap_err();
        assert!(matches!(err, WeatherError::Json(_)));
    }

    #[test]
    fn test_icon_url() {
        assert_eq!(icon_url("04d"), "https://openweathermap.org/img/wn/04d.png");
    }

    #[test]
    fn test_forecast_url() {
        let client = WeatherClient::new(
            Fetcher::with_defaults().unwrap(),
            Url::parse(DEFAULT_ONECALL_URL).unwrap(),
            Some("key123".to_string()),
        );
        let url = client
            .forecast_url(Coordinates::new(60.2238794, 24.758149), Language::En)
            .unwrap();
        let query = url.query().unwrap();

        assert!(url.as_str().starts_with(DEFAULT_ONECALL_URL));
        assert!(query.contains("lat=60.2238794"));
        assert!(query.contains("lon=24.758149"));
        assert!(query.contains("units=metric"));
        assert!(query.contains("lang=en"));
        assert!(query.contains("appid=key123"));
    }

    #[test]
    fn test_forecast_url_requires_key() {
        let client = WeatherClient::new(
            Fetcher::with_defaults().unwrap(),
            Url::parse(DEFAULT_ONECALL_URL).unwrap(),
            None,
        );
        let err = client
            .forecast_url(Coordinates::new(60.0, 24.0), Language::Fi)
            .unwrap_err();
        assert!(matches!(err, WeatherError::MissingApiKey));
    }
}
