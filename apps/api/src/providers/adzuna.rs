//! Adzuna adapter.
//!
//! Adzuna differs from the RapidAPI boards in every respect: country and
//! page are path segments, there is no boolean query syntax, only one
//! location per call, and records need mapping into `JobListing`s.

use serde_json::Value;

use crate::filters::{
    int_or, non_empty_str, sanitize, FilterMap, FilterValue, ProviderQuery, ADVANCED_TITLE_FILTER,
    ADZUNA_KEYS, LOCATION_FILTER, LOCATION_OR_DELIMITER, TITLE_FILTER, TITLE_OR_DELIMITER,
};
use crate::models::JobListing;

pub const BASE_URL: &str = "https://api.adzuna.com/v1/api/jobs";

const DEFAULT_COUNTRY: &str = "us";
const DEFAULT_DISTANCE_KM: i64 = 50;
const DEFAULT_RESULTS_PER_PAGE: i64 = 50;

/// Path segments plus sanitized query for one Adzuna search call.
#[derive(Debug, Clone, PartialEq)]
pub struct AdzunaSearch {
    pub country: String,
    pub page: i64,
    pub query: ProviderQuery,
}

impl AdzunaSearch {
    pub fn url(&self) -> String {
        format!("{BASE_URL}/{}/search/{}", self.country, self.page)
    }
}

/// Derives Adzuna's request shape from canonical filters.
pub fn derive_search(filters: &FilterMap) -> AdzunaSearch {
    let mut derived: FilterMap = ADZUNA_KEYS
        .iter()
        .filter_map(|key| filters.get(*key).map(|v| (key.to_string(), v.clone())))
        .collect();

    if let Some(title) = title_words(filters) {
        derived.insert("title_only".to_string(), FilterValue::Str(title));
    }
    if let Some(location) = first_location(filters) {
        derived.insert("where".to_string(), FilterValue::from(location));
    }

    let positive = |key: &str| filters.get(key).and_then(FilterValue::as_int).filter(|n| *n > 0);
    let results_per_page = positive("limit")
        .or_else(|| positive("results_per_page"))
        .unwrap_or(DEFAULT_RESULTS_PER_PAGE);
    derived.insert(
        "distance".to_string(),
        FilterValue::Int(int_or(filters, "distance", DEFAULT_DISTANCE_KM)),
    );
    derived.insert(
        "results_per_page".to_string(),
        FilterValue::Int(results_per_page),
    );

    let page = match filters.get("offset").and_then(FilterValue::as_int) {
        Some(offset) if offset >= 0 => offset / results_per_page + 1,
        _ => int_or(filters, "page", 1).max(1),
    };

    AdzunaSearch {
        country: country(filters),
        page,
        query: sanitize(&derived, ADZUNA_KEYS),
    }
}

/// Adzuna has no boolean syntax: the OR'd title query degrades to a bag of
/// words with grouping and quotes removed.
fn title_words(filters: &FilterMap) -> Option<String> {
    let raw = non_empty_str(filters, ADVANCED_TITLE_FILTER)
        .or_else(|| non_empty_str(filters, TITLE_FILTER))?;
    let cleaned: String = raw
        .replace(TITLE_OR_DELIMITER, " ")
        .chars()
        .filter(|c| !matches!(c, '(' | ')' | '\'' | '"'))
        .collect();
    let words = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    (!words.is_empty()).then_some(words)
}

/// One location per call: the first listed, which is the most specific.
fn first_location(filters: &FilterMap) -> Option<&str> {
    let raw = non_empty_str(filters, LOCATION_FILTER)?;
    let first = raw
        .split(LOCATION_OR_DELIMITER)
        .next()
        .unwrap_or(raw)
        .trim();
    (!first.is_empty()).then_some(first)
}

/// Lower-cased ISO country code. Anything that is not plain letters would
/// end up in the URL path, so it falls back to the default.
fn country(filters: &FilterMap) -> String {
    non_empty_str(filters, "country")
        .filter(|c| c.chars().all(|ch| ch.is_ascii_alphabetic()))
        .unwrap_or(DEFAULT_COUNTRY)
        .to_ascii_lowercase()
}

/// Maps one raw Adzuna record into the canonical listing shape.
pub fn map_record(item: &Value) -> JobListing {
    let text = |v: Option<&Value>| v.and_then(Value::as_str).map(str::to_string);
    let created = text(item.get("created"));
    let location = item
        .pointer("/location/display_name")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty());

    JobListing {
        id: id_string(item.get("id")),
        title: text(item.get("title")),
        organization: text(item.pointer("/company/display_name")),
        locations_derived: location.map(|l| vec![l.to_string()]).unwrap_or_default(),
        location_type: None,
        url: text(item.get("redirect_url")),
        date_posted: created.clone(),
        date_created: created,
        description_text: text(item.get("description")),
        rating: None,
    }
}

fn id_string(id: Option<&Value>) -> String {
    match id {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn filters(pairs: &[(&str, &str)]) -> FilterMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), FilterValue::from(*v)))
            .collect()
    }

    #[test]
    fn test_where_takes_first_location() {
        let search = derive_search(&filters(&[("location_filter", "California OR United States")]));
        assert_eq!(search.query["where"], "California");
    }

    #[test]
    fn test_page_from_offset_and_limit() {
        let search = derive_search(&filters(&[("limit", "25"), ("offset", "50")]));
        assert_eq!(search.page, 3);
        assert_eq!(search.query["results_per_page"], "25");
        assert!(search.url().ends_with("/us/search/3"));
    }

    #[test]
    fn test_results_per_page_precedence() {
        let search = derive_search(&filters(&[("results_per_page", "20")]));
        assert_eq!(search.query["results_per_page"], "20");

        let search = derive_search(&filters(&[("results_per_page", "20"), ("limit", "30")]));
        assert_eq!(search.query["results_per_page"], "30");

        let search = derive_search(&filters(&[("results_per_page", "0")]));
        assert_eq!(search.query["results_per_page"], "50");

        let search = derive_search(&filters(&[("results_per_page", "20"), ("offset", "40")]));
        assert_eq!(search.page, 3);
    }

    #[test]
    fn test_explicit_page_without_offset() {
        let search = derive_search(&filters(&[("page", "4")]));
        assert_eq!(search.page, 4);
        assert!(!search.query.contains_key("page"));
    }

    #[test]
    fn test_defaults() {
        let search = derive_search(&FilterMap::new());
        assert_eq!(search.country, "us");
        assert_eq!(search.page, 1);
        assert_eq!(search.query["distance"], "50");
        assert_eq!(search.query["results_per_page"], "50");
        assert!(!search.query.contains_key("where"));
        assert!(!search.query.contains_key("title_only"));
    }

    #[test]
    fn test_bad_distance_falls_back() {
        let search = derive_search(&filters(&[("distance", "nearby")]));
        assert_eq!(search.query["distance"], "50");
        let search = derive_search(&filters(&[("distance", "10")]));
        assert_eq!(search.query["distance"], "10");
    }

    #[test]
    fn test_country_is_lowercased_path_segment() {
        let search = derive_search(&filters(&[("country", "GB")]));
        assert_eq!(search.url(), "https://api.adzuna.com/v1/api/jobs/gb/search/1");
        assert!(!search.query.contains_key("country"));

        let search = derive_search(&filters(&[("country", "../admin")]));
        assert_eq!(search.country, "us");
    }

    #[test]
    fn test_title_only_degrades_boolean_query() {
        let search = derive_search(&filters(&[(
            "advanced_title_filter",
            "(DevOps | 'Site Reliability Engineer')",
        )]));
        assert_eq!(search.query["title_only"], "DevOps Site Reliability Engineer");
    }

    #[test]
    fn test_title_only_falls_back_to_title_filter() {
        let search = derive_search(&filters(&[("title_filter", "Data Analyst")]));
        assert_eq!(search.query["title_only"], "Data Analyst");
    }

    #[test]
    fn test_extension_keys_pass_through() {
        let search = derive_search(&filters(&[("max_days_old", "7"), ("remote", "true")]));
        assert_eq!(search.query["max_days_old"], "7");
        assert!(!search.query.contains_key("remote"));
    }

    #[test]
    fn test_map_record() {
        let raw = json!({
            "id": 4_977_412_000_i64,
            "title": "Platform Engineer",
            "company": {"display_name": "Acme"},
            "location": {"display_name": "Austin, Travis County"},
            "redirect_url": "https://www.adzuna.com/land/ad/4977412000",
            "created": "2024-12-01T17:34:00Z",
            "description": "Kubernetes and AWS"
        });
        let listing = map_record(&raw);
        assert_eq!(listing.id, "4977412000");
        assert_eq!(listing.organization.as_deref(), Some("Acme"));
        assert_eq!(listing.locations_derived, vec!["Austin, Travis County".to_string()]);
        assert_eq!(listing.location_type, None);
        assert_eq!(listing.date_posted.as_deref(), Some("2024-12-01T17:34:00Z"));
        assert_eq!(listing.date_posted, listing.date_created);
        assert_eq!(listing.description_text.as_deref(), Some("Kubernetes and AWS"));
    }

    #[test]
    fn test_map_record_without_nested_objects() {
        let listing = map_record(&json!({"id": "abc", "title": "Intern"}));
        assert_eq!(listing.id, "abc");
        assert!(listing.organization.is_none());
        assert!(listing.locations_derived.is_empty());
    }
}
