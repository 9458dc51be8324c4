//! Cafeteria menu provider adapters.
//!
//! Each restaurant chain serves its menus in a different JSON shape. Every
//! shape has one adapter implementing [`MenuProvider`], and every adapter
//! produces the same ordered list of [`MenuLine`]s for one day. Which
//! adapter serves a restaurant is decided by its [`ProviderKind`], resolved
//! through [`MenuProviders`].

pub mod bundled;
pub mod courses;
pub mod weekly;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use thiserror::Error;
use tracing::info;

use crate::fetch::{FetchError, Fetcher};
use crate::models::{Language, MenuLine, ProviderKind, Restaurant};

pub use bundled::StaticWeeklyMenuProvider;
pub use courses::CourseListProvider;
pub use weekly::WeeklySetMenuProvider;

/// Errors that can occur while loading a menu.
#[derive(Debug, Error)]
pub enum MenuError {
    #[error("Menu transport error: {0}")]
    Transport(#[from] FetchError),

    #[error("Malformed menu payload: {0}")]
    MalformedPayload(String),

    #[error("Menu JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A source of daily menus for one provider shape.
#[async_trait]
pub trait MenuProvider: Send + Sync {
    /// Provider identifier for logging.
    fn name(&self) -> &'static str;

    /// Menu lines for `date` in source order; empty when nothing is served.
    async fn daily_menu(
        &self,
        restaurant_id: u32,
        language: Language,
        date: NaiveDate,
    ) -> Result<Vec<MenuLine>, MenuError>;
}

/// Index into a Monday-first week (Monday = 0 .. Sunday = 6).
pub fn weekday_index(date: NaiveDate) -> usize {
    let sunday_based = date.weekday().num_days_from_sunday() as usize;
    (sunday_based + 6) % 7
}

/// One adapter per [`ProviderKind`], built once at startup.
pub struct MenuProviders {
    weekly: WeeklySetMenuProvider,
    courses: CourseListProvider,
    bundled: StaticWeeklyMenuProvider,
}

impl MenuProviders {
    pub fn new(
        weekly: WeeklySetMenuProvider,
        courses: CourseListProvider,
        bundled: StaticWeeklyMenuProvider,
    ) -> Self {
        Self {
            weekly,
            courses,
            bundled,
        }
    }

    /// Build all adapters from base URLs, sharing one fetcher.
    pub fn from_urls(
        fetcher: Fetcher,
        weekly_base_url: &str,
        course_base_url: &str,
        bundled: StaticWeeklyMenuProvider,
    ) -> Self {
        Self::new(
            WeeklySetMenuProvider::new(fetcher.clone(), weekly_base_url),
            CourseListProvider::new(fetcher, course_base_url),
            bundled,
        )
    }

    /// The adapter for a provider kind.
    pub fn provider(&self, kind: ProviderKind) -> &dyn MenuProvider {
        match kind {
            ProviderKind::WeeklySetMenu => &self.weekly,
            ProviderKind::CourseList => &self.courses,
            ProviderKind::StaticWeekly => &self.bundled,
        }
    }

    /// Load a restaurant's menu for `date` through its configured adapter.
    pub async fn daily_menu(
        &self,
        restaurant: &Restaurant,
        language: Language,
        date: NaiveDate,
    ) -> Result<Vec<MenuLine>, MenuError> {
        let provider = self.provider(restaurant.provider);
        info!(
            "Menu: {} for {} ({}) on {}",
            provider.name(),
            restaurant.display_name,
            restaurant.id,
            date
        );
        let lines = provider.daily_menu(restaurant.id, language, date).await?;
        info!("Menu: {} lines for {}", lines.len(), restaurant.display_name);
        Ok(lines)
    }
}

/// Treat empty strings from providers as absent.
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

/// Serve `body` as JSON at `path` on an ephemeral local port, returning the base URL.
#[cfg(test)]
pub(crate) async fn serve_fixture(path: &str, body: serde_json::Value) -> String {
    let app = axum::Router::new().route(
        path,
        axum::routing::get(move || async move { axum::Json(body) }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}
