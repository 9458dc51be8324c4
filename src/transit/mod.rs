//! Digitransit stops-by-radius client and departure classification.
//!
//! The GraphQL API returns nearby stops with their upcoming stop times.
//! Arrival times are seconds since midnight of the service day, so each one
//! is compared against the wall clock and classified as a countdown, "now"
//! or "departs tomorrow". All Digitransit specifics live in this module.

use chrono::{DateTime, Local, TimeZone};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

use crate::clock::{format_countdown, seconds_until_arrival};
use crate::fetch::{FetchError, Fetcher};
use crate::models::{
    Coordinates, Departure, DepartureStatus, Language, Stop, StopArrival, NO_DEPARTURES_LABEL,
    NOW_LABEL,
};

/// Default HSL routing endpoint.
pub const DEFAULT_GRAPHQL_URL: &str =
    "https://api.digitransit.fi/routing/v1/routers/hsl/index/graphql";

/// Header carrying the Digitransit API subscription key.
const SUBSCRIPTION_KEY_HEADER: &str = "digitransit-subscription-key";

/// Errors from fetching or normalizing stop data.
#[derive(Debug, Error)]
pub enum TransitError {
    #[error("Transit transport error: {0}")]
    Transport(#[from] FetchError),

    #[error("Malformed transit payload: {0}")]
    MalformedPayload(String),

    #[error("Transit JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ── GraphQL response types ──────────────────────────────────────────────────

/// Top-level GraphQL response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlResponse {
    #[serde(default)]
    pub data: Option<StopsData>,

    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlError {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopsData {
    #[serde(default)]
    pub stops_by_radius: Option<StopConnection>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StopConnection {
    #[serde(default)]
    pub edges: Vec<StopEdge>,
}

/// One result of the radius search.
#[derive(Debug, Clone, Deserialize)]
pub struct StopEdge {
    pub node: StopNode,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StopNode {
    #[serde(default)]
    pub stop: Option<RawStop>,

    /// Distance from the query point in meters
    #[serde(default)]
    pub distance: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStop {
    pub gtfs_id: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub stoptimes_without_patterns: Option<Vec<RawStoptime>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStoptime {
    /// Seconds since midnight of the service day
    pub realtime_arrival: i64,
    #[serde(default)]
    pub arrival_delay: Option<i64>,
    #[serde(default)]
    pub service_day: Option<i64>,
    #[serde(default)]
    pub headsign: Option<String>,
    #[serde(default)]
    pub trip: Option<RawTrip>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawTrip {
    #[serde(default)]
    pub route: Option<RawRoute>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRoute {
    #[serde(default)]
    pub short_name: Option<String>,
}

impl RawStoptime {
    fn route_short_name(&self) -> &str {
        self.trip
            .as_ref()
            .and_then(|t| t.route.as_ref())
            .and_then(|r| r.short_name.as_deref())
            .unwrap_or("")
    }
}

/// Pull the stop edges out of a GraphQL response.
///
/// A response without `data.stopsByRadius` (typically one carrying only
/// `errors`) is malformed.
pub fn extract_edges(response: GraphQlResponse) -> Result<Vec<StopEdge>, TransitError> {
    match response.data.and_then(|d| d.stops_by_radius) {
        Some(connection) => Ok(connection.edges),
        None => {
            let messages: Vec<&str> = response.errors.iter().map(|e| e.message.as_str()).collect();
            Err(TransitError::MalformedPayload(if messages.is_empty() {
                "missing data.stopsByRadius".to_string()
            } else {
                format!("missing data.stopsByRadius: {}", messages.join("; "))
            }))
        }
    }
}

// ── Classification ──────────────────────────────────────────────────────────

/// Classify an arrival by its countdown and its position in the stop's list.
///
/// Only the first arrival of a stop can be "now"; any later arrival with a
/// non-positive countdown is taken to be tomorrow's service.
pub fn classify_arrival(position: usize, seconds_until: i64) -> DepartureStatus {
    if seconds_until > 0 {
        DepartureStatus::Countdown(seconds_until)
    } else if position > 0 {
        DepartureStatus::DepartsTomorrow
    } else {
        DepartureStatus::Now
    }
}

fn departure_text(status: DepartureStatus, arrival: &StopArrival, language: Language) -> String {
    let headsign = arrival.headsign.as_deref().unwrap_or("");
    match status {
        DepartureStatus::Countdown(seconds) => format!(
            "{} {} - {}",
            format_countdown(seconds),
            headsign,
            arrival.route_short_name
        ),
        DepartureStatus::Now => format!(
            "{} {} - {}",
            NOW_LABEL, headsign, arrival.route_short_name
        ),
        DepartureStatus::DepartsTomorrow => language.strings().departs_tomorrow.to_string(),
        DepartureStatus::NoDepartures => NO_DEPARTURES_LABEL.to_string(),
    }
}

fn normalize_stop<Tz: TimeZone>(
    raw: &RawStop,
    distance: Option<u32>,
    now: &DateTime<Tz>,
    language: Language,
) -> Stop {
    let arrivals: Vec<StopArrival> = raw
        .stoptimes_without_patterns
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|st| StopArrival {
            realtime_arrival: st.realtime_arrival,
            headsign: st.headsign.clone(),
            route_short_name: st.route_short_name().to_string(),
        })
        .collect();

    let mut departures: Vec<Departure> = arrivals
        .iter()
        .enumerate()
        .map(|(position, arrival)| {
            let status =
                classify_arrival(position, seconds_until_arrival(arrival.realtime_arrival, now));
            Departure::new(status, departure_text(status, arrival, language))
        })
        .collect();

    if departures.is_empty() {
        departures.push(Departure::new(
            DepartureStatus::NoDepartures,
            NO_DEPARTURES_LABEL,
        ));
    }

    Stop {
        id: raw.gtfs_id.clone(),
        name: raw.name.clone(),
        coords: Coordinates::new(raw.lat, raw.lon),
        distance_meters: distance,
        arrivals,
        departures,
    }
}

/// Normalize stop edges into [`Stop`]s, keeping provider order throughout.
///
/// Edges without a stop are skipped.
pub fn normalize_stops<Tz: TimeZone>(
    edges: &[StopEdge],
    now: &DateTime<Tz>,
    language: Language,
) -> Vec<Stop> {
    let stops: Vec<Stop> = edges
        .iter()
        .filter_map(|edge| match &edge.node.stop {
            Some(raw) => Some(normalize_stop(raw, edge.node.distance, now, language)),
            None => {
                warn!("Transit: skipping edge without a stop");
                None
            }
        })
        .collect();

    debug!("Normalized {} stops", stops.len());
    stops
}

// ── Client ──────────────────────────────────────────────────────────────────

/// Build the stops-by-radius query document.
pub fn stops_by_radius_query(coords: Coordinates, radius_meters: u32, first: u32) -> String {
    format!(
        r#"{{
  stopsByRadius(lat: {lat}, lon: {lon}, radius: {radius}, first: {first}) {{
    edges {{
      node {{
        stop {{
          gtfsId
          name
          lat
          lon
          stoptimesWithoutPatterns {{
            realtimeArrival
            arrivalDelay
            serviceDay
            headsign
            trip {{
              route {{
                shortName
              }}
            }}
          }}
        }}
        distance
      }}
    }}
  }}
}}"#,
        lat = coords.latitude,
        lon = coords.longitude,
        radius = radius_meters,
        first = first,
    )
}

/// Digitransit GraphQL client.
pub struct TransitClient {
    fetcher: Fetcher,
    endpoint: Url,
    api_key: Option<String>,
}

impl TransitClient {
    pub fn new(fetcher: Fetcher, endpoint: Url, api_key: Option<String>) -> Self {
        Self {
            fetcher,
            endpoint,
            api_key,
        }
    }

    /// Fetch the raw stop edges around a location.
    pub async fn stops_by_radius(
        &self,
        coords: Coordinates,
        radius_meters: u32,
        first: u32,
    ) -> Result<Vec<StopEdge>, TransitError> {
        let query = stops_by_radius_query(coords, radius_meters, first);
        let headers: Vec<(&str, &str)> = self
            .api_key
            .as_deref()
            .map(|key| vec![(SUBSCRIPTION_KEY_HEADER, key)])
            .unwrap_or_default();

        info!(
            "Transit: stops within {}m of {},{}",
            radius_meters, coords.latitude, coords.longitude
        );
        let response: GraphQlResponse = self
            .fetcher
            .post_graphql(&self.endpoint, &query, &headers)
            .await?;
        let edges = extract_edges(response)?;
        info!("Transit: found {} stops", edges.len());
        Ok(edges)
    }

    /// Fetch and normalize nearby stops against the local wall clock.
    pub async fn nearby_stops(
        &self,
        coords: Coordinates,
        radius_meters: u32,
        first: u32,
        language: Language,
    ) -> Result<Vec<Stop>, TransitError> {
        let edges = self.stops_by_radius(coords, radius_meters, first).await?;
        Ok(normalize_stops(&edges, &Local::now(), language))
    }
}
