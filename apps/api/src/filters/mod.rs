//! Canonical filter vocabulary and the two pure passes applied to inbound
//! filters before any provider sees them: key normalization and sanitization.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub mod normalize;
pub mod sanitize;

pub use normalize::normalize_keys;
pub use sanitize::sanitize;

/// A single filter value as it arrives from a query string, form field or
/// model output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl FilterValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FilterValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Integer view of the value. Strings are parsed after trimming.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            FilterValue::Int(n) => Some(*n),
            FilterValue::Str(s) => s.trim().parse().ok(),
            FilterValue::Bool(_) => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, FilterValue::Str(s) if s.is_empty())
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Bool(true) => f.write_str("true"),
            FilterValue::Bool(false) => f.write_str("false"),
            FilterValue::Int(n) => write!(f, "{n}"),
            FilterValue::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::Str(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        FilterValue::Str(s)
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        FilterValue::Bool(b)
    }
}

impl From<i64> for FilterValue {
    fn from(n: i64) -> Self {
        FilterValue::Int(n)
    }
}

/// Canonical filters keyed by snake_case vocabulary name. An absent key means
/// "not specified".
pub type FilterMap = BTreeMap<String, FilterValue>;

/// Sanitized, provider-ready query: every value is a non-empty string.
pub type ProviderQuery = BTreeMap<String, String>;

pub const TITLE_FILTER: &str = "title_filter";
pub const ADVANCED_TITLE_FILTER: &str = "advanced_title_filter";
pub const LOCATION_FILTER: &str = "location_filter";
pub const DESCRIPTION_FILTER: &str = "description_filter";

/// OR operator of the RapidAPI full-text title search.
pub const TITLE_OR_DELIMITER: &str = "|";
/// Separator between locations in `location_filter`.
pub const LOCATION_OR_DELIMITER: &str = " OR ";

/// Keys understood by all three RapidAPI job boards.
pub const BASE_KEYS: &[&str] = &[
    TITLE_FILTER,
    ADVANCED_TITLE_FILTER,
    LOCATION_FILTER,
    DESCRIPTION_FILTER,
    "description_type",
    "remote",
    "offset",
    "limit",
    "date_filter",
];

pub const INTERNSHIP_KEYS: &[&str] = &["agency", "include_ai", "ai_work_arrangement_filter"];

pub const JOB_KEYS: &[&str] = &[
    "organization_filter",
    "source",
    "include_ai",
    "ai_employment_type_filter",
    "ai_work_arrangement_filter",
    "ai_has_salary",
    "ai_experience_level_filter",
    "ai_visa_sponsorship_filter",
    "include_li",
    "li_organization_slug_filter",
    "li_organization_slug_exclusion_filter",
    "li_industry_filter",
    "li_organization_specialties_filter",
    "li_organization_description_filter",
];

/// Query keys Adzuna accepts once the canonical filters have been derived.
pub const ADZUNA_KEYS: &[&str] = &[
    "title_only",
    "what",
    "where",
    "distance",
    "results_per_page",
    "max_days_old",
    "sort_by",
    "salary_min",
    "full_time",
    "permanent",
];

/// Keys validated as non-negative integers, with the value used when the
/// supplied one does not parse.
pub const PAGINATION_DEFAULTS: &[(&str, i64)] = &[
    ("limit", 15),
    ("offset", 0),
    ("page", 1),
    ("results_per_page", 50),
    ("distance", 50),
];

pub fn pagination_default(key: &str) -> Option<i64> {
    PAGINATION_DEFAULTS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, d)| *d)
}

/// Integer view of `filters[key]`, or `default` when missing or unparsable.
pub fn int_or(filters: &FilterMap, key: &str, default: i64) -> i64 {
    filters
        .get(key)
        .and_then(FilterValue::as_int)
        .unwrap_or(default)
}

/// Non-empty string view of `filters[key]`.
pub fn non_empty_str<'a>(filters: &'a FilterMap, key: &str) -> Option<&'a str> {
    filters
        .get(key)
        .and_then(FilterValue::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
