//! REST API endpoints.
//!
//! Axum-based HTTP API serving normalized weather, stop and menu data per
//! campus as JSON.

pub mod routes;
pub mod state;

use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::campus::CampusError;
use crate::menu::MenuError;
use crate::transit::TransitError;
use crate::weather::WeatherError;
use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Upstream provider failed: {0}")]
    Upstream(String),

    #[error("Upstream payload unusable: {0}")]
    Unprocessable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Upstream(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
            ApiError::Unprocessable(_) => (StatusCode::UNPROCESSABLE_ENTITY, "NO_DATA"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<CampusError> for ApiError {
    fn from(e: CampusError) -> Self {
        ApiError::NotFound(e.to_string())
    }
}

impl From<WeatherError> for ApiError {
    fn from(e: WeatherError) -> Self {
        match e {
            WeatherError::Transport(_) => ApiError::Upstream(e.to_string()),
            WeatherError::MalformedPayload(_) | WeatherError::Json(_) => {
                ApiError::Unprocessable(e.to_string())
            }
            WeatherError::MissingApiKey => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<TransitError> for ApiError {
    fn from(e: TransitError) -> Self {
        match e {
            TransitError::Transport(_) => ApiError::Upstream(e.to_string()),
            TransitError::MalformedPayload(_) | TransitError::Json(_) => {
                ApiError::Unprocessable(e.to_string())
            }
        }
    }
}

impl From<MenuError> for ApiError {
    fn from(e: MenuError) -> Self {
        match e {
            MenuError::Transport(_) => ApiError::Upstream(e.to_string()),
            MenuError::MalformedPayload(_) | MenuError::Json(_) => {
                ApiError::Unprocessable(e.to_string())
            }
            MenuError::Io(_) => ApiError::Internal(e.to_string()),
        }
    }
}

fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origin == "*" {
        return layer.allow_origin(Any);
    }
    match HeaderValue::from_str(origin) {
        Ok(value) => layer.allow_origin(value),
        Err(_) => {
            warn!("Invalid CORS origin {:?}, allowing any", origin);
            layer.allow_origin(Any)
        }
    }
}

/// Build the API router.
pub fn build_router(state: AppState, cors_origin: &str) -> Router {
    Router::new()
        .route("/api/campuses", get(routes::campuses::list_campuses))
        .route(
            "/api/campuses/:campus/weather",
            get(routes::campuses::campus_weather),
        )
        .route(
            "/api/campuses/:campus/stops",
            get(routes::campuses::campus_stops),
        )
        .route("/api/campuses/:campus/menu", get(routes::campuses::campus_menu))
        .route(
            "/api/campuses/:campus/briefing",
            get(routes::campuses::campus_briefing),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origin))
        .with_state(state)
}
