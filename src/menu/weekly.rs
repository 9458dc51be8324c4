//! Weekly set-menu shape (`LunchMenus` indexed Monday-first).
//!
//! Served over the network by the Fazer week endpoint and also used by the
//! bundled Compass data, so the parsing rule here is shared.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::{non_empty, weekday_index, MenuError, MenuProvider};
use crate::fetch::{FetchError, Fetcher};
use crate::models::{Language, MenuLine, MISSING_FIELD};

/// Default Fazer API host.
pub const DEFAULT_BASE_URL: &str = "https://www.fazerfoodco.fi";

// ── Custom deserializers ────────────────────────────────────────────────────

/// Prices arrive as strings ("2,70") or occasionally as bare numbers.
pub(super) fn deserialize_price<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Price {
        Text(String),
        Number(f64),
    }
    let maybe: Option<Price> = Option::deserialize(deserializer)?;
    Ok(maybe.map(|p| match p {
        Price::Text(s) => s,
        Price::Number(n) => n.to_string(),
    }))
}

// ── Weekly response types ───────────────────────────────────────────────────

/// A week of set menus.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WeeklyMenu {
    #[serde(default)]
    pub lunch_menus: Vec<DayMenu>,
}

/// One weekday's set menus.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DayMenu {
    #[serde(default)]
    pub day_of_week: Option<String>,

    #[serde(default)]
    pub date: Option<String>,

    #[serde(default)]
    pub set_menus: Vec<SetMenu>,
}

/// A priced set of one or more dishes.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SetMenu {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "deserialize_price")]
    pub price: Option<String>,

    #[serde(default)]
    pub meals: Vec<Meal>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Meal {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub diets: Option<Vec<String>>,
}

impl Meal {
    fn display(&self) -> String {
        let diets = match &self.diets {
            Some(diets) if !diets.is_empty() => diets.join(", "),
            _ => MISSING_FIELD.to_string(),
        };
        format!("{} ({})", self.name, diets)
    }
}

impl SetMenu {
    /// `"{name}: {dish (diets)}, ... {price}€"`, without the prefix when unnamed.
    pub fn to_line(&self) -> MenuLine {
        let dishes: Vec<String> = self.meals.iter().map(Meal::display).collect();
        let dishes = dishes.join(", ");
        let price = non_empty(self.price.as_deref()).unwrap_or(MISSING_FIELD);

        match non_empty(self.name.as_deref()) {
            Some(name) => MenuLine::new(format!("{}: {} {}€", name, dishes, price)),
            None => MenuLine::new(format!("{} {}€", dishes, price)),
        }
    }
}

/// Lines for one weekday (Monday = 0), in source order.
///
/// The week must contain an entry for `weekday`; a day with no set menus
/// yields an empty list.
pub fn parse_daily_menu(menu: &WeeklyMenu, weekday: usize) -> Result<Vec<MenuLine>, MenuError> {
    let day = menu.lunch_menus.get(weekday).ok_or_else(|| {
        MenuError::MalformedPayload(format!(
            "no LunchMenus entry for weekday {} ({} days present)",
            weekday,
            menu.lunch_menus.len()
        ))
    })?;

    Ok(day.set_menus.iter().map(SetMenu::to_line).collect())
}

// ── Provider ────────────────────────────────────────────────────────────────

/// Fazer weekly menu API adapter.
pub struct WeeklySetMenuProvider {
    fetcher: Fetcher,
    base_url: String,
}

impl WeeklySetMenuProvider {
    pub fn new(fetcher: Fetcher, base_url: &str) -> Self {
        Self {
            fetcher,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Week endpoint URL for the week containing `date`.
    pub fn week_url(
        &self,
        restaurant_id: u32,
        language: Language,
        date: NaiveDate,
    ) -> Result<Url, MenuError> {
        let url_str = format!(
            "{}/api/restaurant/menu/week?language={}&restaurantPageId={}&weekDate={}",
            self.base_url,
            language.code(),
            restaurant_id,
            date.format("%Y-%m-%d")
        );
        Url::parse(&url_str).map_err(|e| {
            MenuError::Transport(FetchError::InvalidUrl(format!("Bad weekly menu URL: {}", e)))
        })
    }
}

#[async_trait]
impl MenuProvider for WeeklySetMenuProvider {
    fn name(&self) -> &'static str {
        "weekly_set_menu"
    }

    async fn daily_menu(
        &self,
        restaurant_id: u32,
        language: Language,
        date: NaiveDate,
    ) -> Result<Vec<MenuLine>, MenuError> {
        let url = self.week_url(restaurant_id, language, date)?;
        let menu: WeeklyMenu = self.fetcher.get_json(&url).await?;
        debug!("Weekly menu has {} days", menu.lunch_menus.len());
        parse_daily_menu(&menu, weekday_index(date))
    }
}
