use serde::{Deserialize, Serialize};

/// Work arrangement reported by the RapidAPI boards. Adzuna has no equivalent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocationType {
    #[serde(rename = "TELECOMMUTE")]
    Telecommute,
}

/// Canonical job record returned to the front-end. Lives for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobListing {
    pub id: String,
    pub title: Option<String>,
    pub organization: Option<String>,
    pub locations_derived: Vec<String>,
    pub location_type: Option<LocationType>,
    pub url: Option<String>,
    pub date_posted: Option<String>,
    pub date_created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_text: Option<String>,
    /// 0.0 – 10.0, one decimal place. Set only by the job rater.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn listing() -> JobListing {
        JobListing {
            id: "42".to_string(),
            title: Some("Platform Engineer".to_string()),
            organization: Some("Acme".to_string()),
            locations_derived: vec!["Austin, Texas".to_string()],
            location_type: None,
            url: None,
            date_posted: Some("2024-12-01T17:34:00Z".to_string()),
            date_created: Some("2024-12-01T17:34:00Z".to_string()),
            description_text: None,
            rating: None,
        }
    }

    #[test]
    fn test_unrated_listing_omits_rating_field() {
        let value = serde_json::to_value(listing()).unwrap();
        assert!(value.get("rating").is_none());
        assert!(value.get("description_text").is_none());
        assert_eq!(value["location_type"], json!(null));
    }

    #[test]
    fn test_location_type_wire_name() {
        let json = serde_json::to_string(&LocationType::Telecommute).unwrap();
        assert_eq!(json, r#""TELECOMMUTE""#);
    }
}
