//! # Campus Briefing
//!
//! Weather, public-transit departures and cafeteria menus for university
//! campuses, normalized from several third-party provider APIs.
//!
//! ## Architecture
//!
//! - **clock**: seconds-since-midnight arithmetic and display formatting
//! - **models**: Uniform display records (menu lines, stops, forecasts, campuses)
//! - **fetch**: Shared HTTP transport for every provider client
//! - **menu**: Menu provider adapters behind the `MenuProvider` trait
//! - **transit**: Stops-by-radius GraphQL client and departure classification
//! - **weather**: One-call forecast client and normalizer
//! - **campus**: Built-in campus directory and lookup
//! - **briefing**: Per-campus orchestration with per-section fallbacks
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod briefing;
pub mod campus;
pub mod clock;
pub mod config;
pub mod fetch;
pub mod menu;
pub mod models;
pub mod transit;
pub mod weather;

pub use models::*;

use chrono::NaiveDate;

/// Parse an ISO date (`YYYY-MM-DD`) as used by the menu endpoints.
pub fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}
