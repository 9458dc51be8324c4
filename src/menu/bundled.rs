//! Weekly set menus from a local JSON document.
//!
//! Used for restaurants without a public API. The document has the same
//! `LunchMenus` shape as the network weekly endpoint; by default the copy
//! compiled into the binary is used.

use std::path::Path;

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::{debug, info};

use super::weekly::{parse_daily_menu, WeeklyMenu};
use super::{weekday_index, MenuError, MenuProvider};
use crate::models::{Language, MenuLine};

/// Week of Compass menus shipped with the crate.
const BUNDLED_WEEK: &str = include_str!("../../assets/compass-week.json");

/// Static weekly menu adapter.
#[derive(Debug, Clone)]
pub struct StaticWeeklyMenuProvider {
    menu: WeeklyMenu,
}

impl StaticWeeklyMenuProvider {
    /// Parse a weekly menu document.
    pub fn from_json(json: &str) -> Result<Self, MenuError> {
        let menu: WeeklyMenu = serde_json::from_str(json)?;
        Ok(Self { menu })
    }

    /// Use the week compiled into the binary.
    pub fn bundled() -> Result<Self, MenuError> {
        Self::from_json(BUNDLED_WEEK)
    }

    /// Read a weekly menu document from disk.
    pub fn from_path(path: &Path) -> Result<Self, MenuError> {
        info!("Loading static weekly menu from {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }
}

#[async_trait]
impl MenuProvider for StaticWeeklyMenuProvider {
    fn name(&self) -> &'static str {
        "static_weekly"
    }

    /// The document carries one language and one restaurant, so both
    /// arguments other than the date are ignored.
    async fn daily_menu(
        &self,
        restaurant_id: u32,
        _language: Language,
        date: NaiveDate,
    ) -> Result<Vec<MenuLine>, MenuError> {
        debug!("Static weekly menu for restaurant {}", restaurant_id);
        parse_daily_menu(&self.menu, weekday_index(date))
    }
}
