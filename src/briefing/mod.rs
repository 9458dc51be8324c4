//! Per-campus briefing: weather, nearby stops and today's menu.
//!
//! The three sections are loaded one after another. A failure in one
//! section is logged and replaced by a localized "no data" notice without
//! affecting the others; nothing is retried.

use std::fmt::Display;

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

use crate::config::AppConfig;
use crate::fetch::{FetchError, Fetcher};
use crate::menu::{MenuError, MenuProviders, StaticWeeklyMenuProvider};
use crate::models::{Campus, ForecastRecord, Language, MenuLine, Stop};
use crate::transit::{TransitClient, TransitError};
use crate::weather::{WeatherClient, WeatherError};

/// Errors building the service from configuration.
#[derive(Debug, Error)]
pub enum BriefingError {
    #[error("Invalid URL for {name}: {message}")]
    InvalidUrl { name: &'static str, message: String },

    #[error("HTTP client error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Static menu error: {0}")]
    Menu(#[from] MenuError),
}

/// A briefing section that either loaded or was replaced by a notice.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum Section<T> {
    Available(T),
    Unavailable { notice: String },
}

impl<T> Section<T> {
    /// Turn a section result into a section, logging the failure.
    pub fn from_result<E: Display>(name: &str, result: Result<T, E>, language: Language) -> Self {
        match result {
            Ok(value) => Section::Available(value),
            Err(e) => {
                warn!("{} unavailable: {}", name, e);
                Section::Unavailable {
                    notice: language.strings().no_data.to_string(),
                }
            }
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Section::Available(_))
    }

    pub fn available(&self) -> Option<&T> {
        match self {
            Section::Available(value) => Some(value),
            Section::Unavailable { .. } => None,
        }
    }
}

/// Everything shown for one campus.
#[derive(Debug, Clone, Serialize)]
pub struct CampusBriefing {
    pub campus: Campus,
    pub language: Language,
    pub date: NaiveDate,
    pub weather: Section<ForecastRecord>,
    pub stops: Section<Vec<Stop>>,
    pub menu: Section<Vec<MenuLine>>,
}

/// Provider clients wired together from configuration.
pub struct BriefingService {
    weather: WeatherClient,
    transit: TransitClient,
    menus: MenuProviders,
    radius_meters: u32,
    max_stops: u32,
}

fn parse_url(name: &'static str, url: &str) -> Result<Url, BriefingError> {
    Url::parse(url).map_err(|e| BriefingError::InvalidUrl {
        name,
        message: e.to_string(),
    })
}

impl BriefingService {
    pub fn new(
        weather: WeatherClient,
        transit: TransitClient,
        menus: MenuProviders,
        radius_meters: u32,
        max_stops: u32,
    ) -> Self {
        Self {
            weather,
            transit,
            menus,
            radius_meters,
            max_stops,
        }
    }

    /// Build every client from configuration, sharing one HTTP client.
    pub fn from_config(config: &AppConfig) -> Result<Self, BriefingError> {
        let fetcher = Fetcher::new(config.http.fetcher_config())?;

        let weather = WeatherClient::new(
            fetcher.clone(),
            parse_url("weather.base_url", &config.weather.base_url)?,
            config.weather.api_key.clone(),
        );
        let transit = TransitClient::new(
            fetcher.clone(),
            parse_url("transit.endpoint", &config.transit.endpoint)?,
            config.transit.api_key.clone(),
        );

        let bundled = match &config.menus.static_path {
            Some(path) => StaticWeeklyMenuProvider::from_path(path)?,
            None => StaticWeeklyMenuProvider::bundled()?,
        };
        let menus = MenuProviders::from_urls(
            fetcher,
            &config.menus.weekly_base_url,
            &config.menus.course_base_url,
            bundled,
        );

        Ok(Self::new(
            weather,
            transit,
            menus,
            config.transit.radius_meters,
            config.transit.max_stops,
        ))
    }

    pub async fn weather(
        &self,
        campus: &Campus,
        language: Language,
    ) -> Result<ForecastRecord, WeatherError> {
        self.weather.hourly_forecast(campus.coords, language).await
    }

    pub async fn stops(&self, campus: &Campus, language: Language) -> Result<Vec<Stop>, TransitError> {
        self.transit
            .nearby_stops(campus.coords, self.radius_meters, self.max_stops, language)
            .await
    }

    pub async fn menu(
        &self,
        campus: &Campus,
        language: Language,
        date: NaiveDate,
    ) -> Result<Vec<MenuLine>, MenuError> {
        self.menus.daily_menu(&campus.restaurant, language, date).await
    }

    /// Load all three sections for a campus.
    pub async fn briefing(
        &self,
        campus: &Campus,
        language: Language,
        date: NaiveDate,
    ) -> CampusBriefing {
        info!("Building briefing for {} ({})", campus.name, language);

        let weather = Section::from_result("Weather", self.weather(campus, language).await, language);
        let stops = Section::from_result("Stops", self.stops(campus, language).await, language);
        let menu = Section::from_result("Menu", self.menu(campus, language, date).await, language);

        CampusBriefing {
            campus: campus.clone(),
            language,
            date,
            weather,
            stops,
            menu,
        }
    }
}
