//! Daily course-list shape (Sodexo `daily_json`).
//!
//! The endpoint serves today's courses as an object keyed by course number,
//! each course carrying both Finnish and English titles. Both language
//! variants are built side by side and the requested one is returned.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use super::weekly::deserialize_price;
use super::{non_empty, MenuError, MenuProvider};
use crate::fetch::{FetchError, Fetcher};
use crate::models::{Language, MenuLine, MISSING_FIELD};

/// Default Sodexo host.
pub const DEFAULT_BASE_URL: &str = "https://www.sodexo.fi";

// ── Daily response types ────────────────────────────────────────────────────

/// The daily response envelope. `courses` is an object, or an empty array
/// on days the restaurant is closed.
#[derive(Debug, Clone, Deserialize)]
pub struct DailyCourses {
    #[serde(default)]
    pub courses: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Course {
    #[serde(default)]
    pub title_fi: Option<String>,

    #[serde(default)]
    pub title_en: Option<String>,

    #[serde(default)]
    pub dietcodes: Option<String>,

    #[serde(default, deserialize_with = "deserialize_price")]
    pub price: Option<String>,

    #[serde(default, rename = "additionalDietInfo")]
    pub additional_diet_info: Option<AdditionalDietInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdditionalDietInfo {
    #[serde(default)]
    pub allergens: Option<String>,
}

/// Both language variants of one day's course lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseLines {
    pub fi: Vec<MenuLine>,
    pub en: Vec<MenuLine>,
}

impl CourseLines {
    pub fn for_language(self, language: Language) -> Vec<MenuLine> {
        match language {
            Language::Fi => self.fi,
            Language::En => self.en,
        }
    }
}

impl Course {
    fn line(&self, language: Language) -> MenuLine {
        let (own, other) = match language {
            Language::Fi => (&self.title_fi, &self.title_en),
            Language::En => (&self.title_en, &self.title_fi),
        };
        let title = non_empty(own.as_deref())
            .or_else(|| non_empty(other.as_deref()))
            .unwrap_or("");
        let diets = non_empty(self.dietcodes.as_deref()).unwrap_or(MISSING_FIELD);
        let allergens = non_empty(
            self.additional_diet_info
                .as_ref()
                .and_then(|info| info.allergens.as_deref()),
        )
        .unwrap_or(language.strings().no_allergens);
        let price = non_empty(self.price.as_deref()).unwrap_or(MISSING_FIELD);

        MenuLine::new(format!("{} ({}, {}) {}", title, diets, allergens, price))
    }
}

/// A key that JavaScript would treat as an array index.
fn array_index(key: &str) -> Option<u32> {
    key.parse::<u32>()
        .ok()
        .filter(|n| *n < u32::MAX && n.to_string() == key)
}

/// Course values in JavaScript object order: index-like keys ascending,
/// then the remaining keys in document order.
fn ordered_course_values(courses: &Value) -> Result<Vec<&Value>, MenuError> {
    match courses {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => Ok(items.iter().collect()),
        Value::Object(map) => {
            let mut indexed: Vec<(u32, &Value)> = Vec::new();
            let mut named: Vec<&Value> = Vec::new();
            for (key, value) in map {
                match array_index(key) {
                    Some(index) => indexed.push((index, value)),
                    None => named.push(value),
                }
            }
            indexed.sort_by_key(|(index, _)| *index);
            Ok(indexed.into_iter().map(|(_, v)| v).chain(named).collect())
        }
        other => Err(MenuError::MalformedPayload(format!(
            "courses is neither an object nor an array: {}",
            other
        ))),
    }
}

/// Build the Finnish and English lines for a daily course payload.
pub fn parse_courses(daily: &DailyCourses) -> Result<CourseLines, MenuError> {
    let mut lines = CourseLines::default();
    for value in ordered_course_values(&daily.courses)? {
        let course = Course::deserialize(value)?;
        lines.fi.push(course.line(Language::Fi));
        lines.en.push(course.line(Language::En));
    }
    Ok(lines)
}

// ── Provider ────────────────────────────────────────────────────────────────

/// Sodexo daily JSON adapter.
pub struct CourseListProvider {
    fetcher: Fetcher,
    base_url: String,
}

impl CourseListProvider {
    pub fn new(fetcher: Fetcher, base_url: &str) -> Self {
        Self {
            fetcher,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Daily endpoint URL for one restaurant and date.
    pub fn daily_url(&self, restaurant_id: u32, date: NaiveDate) -> Result<Url, MenuError> {
        let url_str = format!(
            "{}/ruokalistat/output/daily_json/{}/{}",
            self.base_url,
            restaurant_id,
            date.format("%Y-%m-%d")
        );
        Url::parse(&url_str).map_err(|e| {
            MenuError::Transport(FetchError::InvalidUrl(format!("Bad daily menu URL: {}", e)))
        })
    }
}

#[async_trait]
impl MenuProvider for CourseListProvider {
    fn name(&self) -> &'static str {
        "course_list"
    }

    async fn daily_menu(
        &self,
        restaurant_id: u32,
        language: Language,
        date: NaiveDate,
    ) -> Result<Vec<MenuLine>, MenuError> {
        let url = self.daily_url(restaurant_id, date)?;
        let daily: DailyCourses = self.fetcher.get_json(&url).await?;
        Ok(parse_courses(&daily)?.for_language(language))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn daily(courses: Value) -> DailyCourses {
        serde_json::from_value(json!({
            "meta": {"generated_timestamp": 1615190400, "ref_url": "https://www.sodexo.fi/ravintolat/metropolia-myyrmaki"},
            "courses": courses
        }))
        .unwrap()
    }

    fn strings(lines: &[MenuLine]) -> Vec<&str> {
        lines.iter().map(|l| l.as_str()).collect()
    }

    #[test]
    fn test_both_languages_built() {
        let lines = parse_courses(&daily(json!({
            "1": {
                "title_fi": "Kalaleike",
                "title_en": "Fish steak",
                "category": "Lounas",
                "dietcodes": "L, M",
                "price": "2,70 / 5,71 €",
                "additionalDietInfo": {"allergens": "Kala, Vehnä"}
            }
        })))
        .unwrap();

        assert_eq!(strings(&lines.fi), vec!["Kalaleike (L, M, Kala, Vehnä) 2,70 / 5,71 €"]);
        assert_eq!(strings(&lines.en), vec!["Fish steak (L, M, Kala, Vehnä) 2,70 / 5,71 €"]);
    }

    #[test]
    fn test_missing_allergens_use_language_placeholder() {
        let lines = parse_courses(&daily(json!({
            "1": {"title_fi": "Puuro", "title_en": "Porridge", "dietcodes": "VEG", "price": "1,20"},
            "2": {"title_fi": "Keitto", "title_en": "Soup", "dietcodes": "G", "price": "2,70",
                  "additionalDietInfo": {}}
        })))
        .unwrap();

        assert_eq!(
            strings(&lines.fi),
            vec!["Puuro (VEG, Ei allergeenejä) 1,20", "Keitto (G, Ei allergeenejä) 2,70"]
        );
        assert_eq!(
            strings(&lines.en),
            vec!["Porridge (VEG, No allergens) 1,20", "Soup (G, No allergens) 2,70"]
        );
    }

    #[test]
    fn test_language_placeholders_never_cross() {
        let lines = parse_courses(&daily(json!({
            "1": {"title_fi": "A", "title_en": "A", "additionalDietInfo": {"allergens": "Selleri"}},
            "2": {"title_fi": "B", "title_en": "B"},
            "3": {"title_fi": "C", "title_en": "C", "additionalDietInfo": null}
        })))
        .unwrap();

        let fi = lines.clone().for_language(Language::Fi);
        let en = lines.for_language(Language::En);
        assert!(fi.iter().all(|l| !l.as_str().contains("No allergens")));
        assert!(en.iter().all(|l| !l.as_str().contains("Ei allergeenejä")));
        assert_eq!(fi.len(), 3);
        assert_eq!(en.len(), 3);
    }

    #[test]
    fn test_missing_optional_fields_fall_back() {
        let lines = parse_courses(&daily(json!({"1": {"title_fi": "Salaatti"}}))).unwrap();

        assert_eq!(strings(&lines.fi), vec!["Salaatti (-, Ei allergeenejä) -"]);
        // English title falls back to the Finnish one
        assert_eq!(strings(&lines.en), vec!["Salaatti (-, No allergens) -"]);
    }

    #[test]
    fn test_numeric_keys_in_numeric_order() {
        let lines = parse_courses(&daily(json!({
            "10": {"title_fi": "kymmenes"},
            "2": {"title_fi": "toinen"},
            "1": {"title_fi": "ensimmäinen"},
            "extra": {"title_fi": "lisä"}
        })))
        .unwrap();

        let titles: Vec<&str> = lines
            .fi
            .iter()
            .map(|l| l.as_str().split(' ').next().unwrap())
            .collect();
        assert_eq!(titles, vec!["ensimmäinen", "toinen", "kymmenes", "lisä"]);
    }

    #[test]
    fn test_closed_day_array_is_empty() {
        let lines = parse_courses(&daily(json!([]))).unwrap();
        assert!(lines.fi.is_empty());
        assert!(lines.en.is_empty());
    }

    #[test]
    fn test_missing_courses_is_empty() {
        let daily: DailyCourses = serde_json::from_value(json!({"meta": {}})).unwrap();
        assert_eq!(parse_courses(&daily).unwrap(), CourseLines::default());
    }

    #[test]
    fn test_scalar_courses_is_malformed() {
        let err = parse_courses(&daily(json!("closed"))).unwrap_err();
        assert!(matches!(err, MenuError::MalformedPayload(_)));
    }

    #[test]
    fn test_array_index() {
        assert_eq!(array_index("0"), Some(0));
        assert_eq!(array_index("12"), Some(12));
        assert_eq!(array_index("012"), None);
        assert_eq!(array_index("-1"), None);
        assert_eq!(array_index("a"), None);
    }

    #[test]
    fn test_numeric_price_does_not_sink_the_day() {
        let lines = parse_courses(&daily(json!({
            "1": {"title_fi": "Keitto", "title_en": "Soup", "dietcodes": "L", "price": 2.7},
            "2": {"title_fi": "Puuro", "title_en": "Porridge", "dietcodes": "VEG", "price": "1,20"}
        })))
        .unwrap();

        assert_eq!(
            strings(&lines.en),
            vec!["Soup (L, No allergens) 2.7", "Porridge (VEG, No allergens) 1,20"]
        );
    }

    #[tokio::test]
    async fn test_daily_menu_returns_requested_language() {
        let base_url = crate::menu::serve_fixture(
            "/ruokalistat/output/daily_json/152/2021-03-11",
            json!({
                "meta": {"generated_timestamp": 1615449600},
                "courses": {
                    "1": {"title_fi": "Kalakeitto", "title_en": "Fish soup", "dietcodes": "G, L",
                          "price": "2,70", "additionalDietInfo": {"allergens": "Kala"}},
                    "2": {"title_fi": "Kasvispata", "title_en": "Vegetable stew", "dietcodes": "VEG",
                          "price": "2,70"}
                }
            }),
        )
        .await;
        let provider = CourseListProvider::new(Fetcher::with_defaults().unwrap(), &base_url);

        // 2021-03-11 is a Thursday
        let thursday = NaiveDate::from_ymd_opt(2021, 3, 11).unwrap();
        let lines = provider.daily_menu(152, Language::En, thursday).await.unwrap();

        assert_eq!(
            strings(&lines),
            vec![
                "Fish soup (G, L, Kala) 2,70",
                "Vegetable stew (VEG, No allergens) 2,70"
            ]
        );
    }

    #[test]
    fn test_daily_url() {
        let provider = CourseListProvider::new(Fetcher::with_defaults().unwrap(), DEFAULT_BASE_URL);
        let url = provider
            .daily_url(152, NaiveDate::from_ymd_opt(2021, 3, 8).unwrap())
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.sodexo.fi/ruokalistat/output/daily_json/152/2021-03-08"
        );
    }
}
