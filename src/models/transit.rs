//! Public-transit stop and departure model.

use serde::{Deserialize, Serialize};

use super::Coordinates;

/// One scheduled or real-time arrival at a stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopArrival {
    /// Seconds since local midnight of the service day (may exceed 86400)
    pub realtime_arrival: i64,

    /// Destination text shown on the vehicle
    pub headsign: Option<String>,

    /// Route number (e.g., "550")
    pub route_short_name: String,
}

/// How an arrival was classified against the current time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "seconds", rename_all = "snake_case")]
pub enum DepartureStatus {
    /// Arrives in this many seconds
    Countdown(i64),
    /// First arrival of the stop with a non-positive countdown
    Now,
    /// Later arrival with a non-positive countdown
    DepartsTomorrow,
    /// Placeholder for a stop without any arrivals
    NoDepartures,
}

/// A display line for one departure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Departure {
    pub status: DepartureStatus,
    pub text: String,
}

impl Departure {
    pub fn new(status: DepartureStatus, text: impl Into<String>) -> Self {
        Self {
            status,
            text: text.into(),
        }
    }
}

/// A stop near the queried location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    /// GTFS identifier (e.g., "HSL:4150201")
    pub id: String,

    pub name: String,

    pub coords: Coordinates,

    /// Distance from the query point, meters
    pub distance_meters: Option<u32>,

    /// Arrivals in provider order, unfiltered; may be empty
    pub arrivals: Vec<StopArrival>,

    /// Display lines; never empty
    pub departures: Vec<Departure>,
}
