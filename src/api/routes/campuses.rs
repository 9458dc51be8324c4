use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::briefing::CampusBriefing;
use crate::models::{Campus, ForecastRecord, Language, MenuLine, Stop};
use crate::parse_iso_date;

// ── Query parameters ────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct CampusParams {
    /// Language code (`fi` or `en`), defaults to the configured language
    pub lang: Option<String>,
    /// ISO date for menus, defaults to today
    pub date: Option<String>,
}

impl CampusParams {
    fn language(&self, default: Language) -> Result<Language, ApiError> {
        match self.lang.as_deref().map(str::trim) {
            None | Some("") => Ok(default),
            Some(code) => code
                .parse::<Language>()
                .map_err(|e| ApiError::BadRequest(e.to_string())),
        }
    }

    fn date(&self) -> Result<NaiveDate, ApiError> {
        match self.date.as_deref() {
            None => Ok(Local::now().date_naive()),
            Some(raw) => parse_iso_date(raw)
                .ok_or_else(|| ApiError::BadRequest(format!("Invalid date: {}", raw))),
        }
    }
}

// ── Responses ───────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct CampusListResponse {
    pub default_campus: String,
    pub campuses: Vec<Campus>,
}

#[derive(Debug, Serialize)]
pub struct WeatherResponse {
    pub campus: String,
    pub language: Language,
    pub forecast: ForecastRecord,
}

#[derive(Debug, Serialize)]
pub struct StopsResponse {
    pub campus: String,
    pub language: Language,
    pub stops: Vec<Stop>,
}

#[derive(Debug, Serialize)]
pub struct MenuResponse {
    pub campus: String,
    pub restaurant: String,
    pub language: Language,
    pub date: NaiveDate,
    pub lines: Vec<MenuLine>,
}

fn find_campus<'a>(state: &'a AppState, name: &str) -> Result<&'a Campus, ApiError> {
    Ok(state.campuses.resolve(Some(name))?)
}

// ── Handlers ────────────────────────────────────────────────────

/// GET /api/campuses
pub async fn list_campuses(State(state): State<AppState>) -> Json<CampusListResponse> {
    let default_campus = state
        .campuses
        .resolve(None)
        .map(|c| c.name.clone())
        .unwrap_or_default();

    Json(CampusListResponse {
        default_campus,
        campuses: state.campuses.campuses().to_vec(),
    })
}

/// GET /api/campuses/:campus/weather
pub async fn campus_weather(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<CampusParams>,
) -> Result<Json<WeatherResponse>, ApiError> {
    let campus = find_campus(&state, &name)?;
    let language = params.language(state.default_language)?;
    let forecast = state.service.weather(campus, language).await?;

    Ok(Json(WeatherResponse {
        campus: campus.name.clone(),
        language,
        forecast,
    }))
}

/// GET /api/campuses/:campus/stops
pub async fn campus_stops(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<CampusParams>,
) -> Result<Json<StopsResponse>, ApiError> {
    let campus = find_campus(&state, &name)?;
    let language = params.language(state.default_language)?;
    let stops = state.service.stops(campus, language).await?;

    Ok(Json(StopsResponse {
        campus: campus.name.clone(),
        language,
        stops,
    }))
}

/// GET /api/campuses/:campus/menu
pub async fn campus_menu(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<CampusParams>,
) -> Result<Json<MenuResponse>, ApiError> {
    let campus = find_campus(&state, &name)?;
    let language = params.language(state.default_language)?;
    let date = params.date()?;
    let lines = state.service.menu(campus, language, date).await?;

    Ok(Json(MenuResponse {
        campus: campus.name.clone(),
        restaurant: campus.restaurant.display_name.clone(),
        language,
        date,
        lines,
    }))
}

/// GET /api/campuses/:campus/briefing
///
/// Always 200 for a known campus; failed sections carry a notice instead.
pub async fn campus_briefing(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<CampusParams>,
) -> Result<Json<CampusBriefing>, ApiError> {
    let campus = find_campus(&state, &name)?;
    let language = params.language(state.default_language)?;
    let date = params.date()?;

    Ok(Json(state.service.briefing(campus, language, date).await))
}
