//! Provider adapters: one descriptor per upstream job board.
//!
//! Request construction is pure (`build_request`) so the translation from
//! canonical filters to each provider's schema is testable without a network.
//! `JobBoardClient` executes a built request: one GET, one timeout,
//! no retries. Handlers only see the `JobSource` trait.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::Config;
use crate::filters::{
    sanitize, FilterMap, ProviderQuery, ADZUNA_KEYS, BASE_KEYS, INTERNSHIP_KEYS, JOB_KEYS,
};
use crate::models::JobListing;

pub mod adzuna;
pub mod extract;

pub use extract::{extract_list, extract_list_mut};

/// Page size requested from the RapidAPI boards when the caller sets none.
const DEFAULT_PAGE_SIZE: &str = "15";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Jobs,
    Internships,
    YcJobs,
    Adzuna,
}

/// How a provider authenticates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    /// Shared gateway key header plus a per-provider host header.
    RapidApi { host: &'static str },
    /// `app_id` / `app_key` query parameters plus a mandatory User-Agent.
    AdzunaApp,
}

/// Static description of one upstream API.
#[derive(Debug)]
pub struct ProviderDescriptor {
    pub name: &'static str,
    pub url: &'static str,
    pub auth: AuthScheme,
    /// Groups of filter keys the provider accepts.
    pub key_groups: &'static [&'static [&'static str]],
    /// Set when raw records are not already in the canonical listing shape.
    pub map_record: Option<fn(&Value) -> JobListing>,
}

impl ProviderDescriptor {
    pub fn allowed_keys(&self) -> Vec<&'static str> {
        let mut keys: Vec<&'static str> = self.key_groups.iter().flat_map(|g| g.iter().copied()).collect();
        keys.sort_unstable();
        keys.dedup();
        keys
    }
}

static JOBS: ProviderDescriptor = ProviderDescriptor {
    name: "jobs",
    url: "https://active-jobs-db.p.rapidapi.com/active-ats-7d",
    auth: AuthScheme::RapidApi {
        host: "active-jobs-db.p.rapidapi.com",
    },
    key_groups: &[BASE_KEYS, JOB_KEYS],
    map_record: None,
};

static INTERNSHIPS: ProviderDescriptor = ProviderDescriptor {
    name: "internships",
    url: "https://internships-api.p.rapidapi.com/active-jb-7d",
    auth: AuthScheme::RapidApi {
        host: "internships-api.p.rapidapi.com",
    },
    key_groups: &[BASE_KEYS, INTERNSHIP_KEYS],
    map_record: None,
};

static YC_JOBS: ProviderDescriptor = ProviderDescriptor {
    name: "yc_jobs",
    url: "https://free-y-combinator-jobs-api.p.rapidapi.com/active-jb-7d",
    auth: AuthScheme::RapidApi {
        host: "free-y-combinator-jobs-api.p.rapidapi.com",
    },
    key_groups: &[BASE_KEYS],
    map_record: None,
};

static ADZUNA: ProviderDescriptor = ProviderDescriptor {
    name: "adzuna",
    url: adzuna::BASE_URL,
    auth: AuthScheme::AdzunaApp,
    key_groups: &[ADZUNA_KEYS],
    map_record: Some(adzuna::map_record),
};

impl Provider {
    pub const ALL: [Provider; 4] = [
        Provider::Jobs,
        Provider::Internships,
        Provider::YcJobs,
        Provider::Adzuna,
    ];

    pub fn descriptor(self) -> &'static ProviderDescriptor {
        match self {
            Provider::Jobs => &JOBS,
            Provider::Internships => &INTERNSHIPS,
            Provider::YcJobs => &YC_JOBS,
            Provider::Adzuna => &ADZUNA,
        }
    }

    pub fn name(self) -> &'static str {
        self.descriptor().name
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{provider} request failed: {source}")]
    Transport {
        provider: &'static str,
        source: reqwest::Error,
    },

    #[error("{provider} returned HTTP {status}: {body}")]
    Status {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("{provider} returned an unreadable body: {source}")]
    Decode {
        provider: &'static str,
        source: reqwest::Error,
    },
}

impl FetchError {
    pub fn provider(&self) -> &'static str {
        match self {
            FetchError::Transport { provider, .. }
            | FetchError::Status { provider, .. }
            | FetchError::Decode { provider, .. } => provider,
        }
    }
}

/// A fully-built upstream request. Credentials are kept apart from the
/// query so the query can be logged.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    pub provider: Provider,
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub query: ProviderQuery,
    pub credentials: Vec<(&'static str, String)>,
}

/// Translates canonical filters into one provider's request shape.
pub fn build_request(provider: Provider, filters: &FilterMap, config: &Config) -> ProviderRequest {
    let descriptor = provider.descriptor();
    match descriptor.auth {
        AuthScheme::RapidApi { host } => {
            let mut query = sanitize(filters, &descriptor.allowed_keys());
            query
                .entry("limit".to_string())
                .or_insert_with(|| DEFAULT_PAGE_SIZE.to_string());
            ProviderRequest {
                provider,
                url: descriptor.url.to_string(),
                headers: vec![
                    ("x-rapidapi-key", config.rapidapi_key.clone()),
                    ("x-rapidapi-host", host.to_string()),
                ],
                query,
                credentials: Vec::new(),
            }
        }
        AuthScheme::AdzunaApp => {
            let search = adzuna::derive_search(filters);
            ProviderRequest {
                provider,
                url: search.url(),
                headers: vec![("user-agent", config.adzuna_user_agent.clone())],
                query: search.query,
                credentials: vec![
                    ("app_id", config.adzuna_app_id.clone()),
                    ("app_key", config.adzuna_app_key.clone()),
                ],
            }
        }
    }
}

/// Anything that answers a provider search with the provider's raw payload.
///
/// Carried in `AppState` as `Arc<dyn JobSource>`.
#[async_trait]
pub trait JobSource: Send + Sync {
    async fn fetch(&self, provider: Provider, filters: &FilterMap) -> Result<Value, FetchError>;
}

/// HTTP client shared by every provider adapter.
#[derive(Clone)]
pub struct JobBoardClient {
    http: Client,
    config: Config,
}

impl JobBoardClient {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.upstream_timeout_secs))
            .build()?;
        Ok(Self { http, config })
    }

    async fn execute(&self, request: ProviderRequest) -> Result<Value, FetchError> {
        let provider = request.provider.name();
        debug!(provider, url = %request.url, query = ?request.query, "Query about to be sent");

        let mut builder = self
            .http
            .get(&request.url)
            .query(&request.query)
            .query(&request.credentials);
        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }

        let response = builder
            .send()
            .await
            .map_err(|source| FetchError::Transport { provider, source })?;

        let status = response.status();
        info!(provider, status = status.as_u16(), "Response from external API");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                provider,
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|source| FetchError::Decode { provider, source })
    }
}

#[async_trait]
impl JobSource for JobBoardClient {
    async fn fetch(&self, provider: Provider, filters: &FilterMap) -> Result<Value, FetchError> {
        let request = build_request(provider, filters, &self.config);
        self.execute(request).await
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::FilterValue;

    fn filters(pairs: &[(&str, &str)]) -> FilterMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), FilterValue::from(*v)))
            .collect()
    }

    #[test]
    fn test_rapidapi_request_carries_key_and_host_headers() {
        let config = Config::for_tests();
        let request = build_request(Provider::Internships, &filters(&[("title_filter", "Intern")]), &config);
        assert_eq!(request.url, "https://internships-api.p.rapidapi.com/active-jb-7d");
        assert!(request
            .headers
            .contains(&("x-rapidapi-key", "test-rapidapi-key".to_string())));
        assert!(request
            .headers
            .contains(&("x-rapidapi-host", "internships-api.p.rapidapi.com".to_string())));
        assert!(request.credentials.is_empty());
    }

    #[test]
    fn test_rapidapi_request_defaults_page_size() {
        let config = Config::for_tests();
        let request = build_request(Provider::YcJobs, &FilterMap::new(), &config);
        assert_eq!(request.query["limit"], "15");

        let request = build_request(Provider::YcJobs, &filters(&[("limit", "40")]), &config);
        assert_eq!(request.query["limit"], "40");
    }

    #[test]
    fn test_provider_allow_lists_differ() {
        let config = Config::for_tests();
        let input = filters(&[
            ("organization_filter", "Stripe"),
            ("agency", "false"),
            ("location_filter", "Canada"),
        ]);

        let jobs = build_request(Provider::Jobs, &input, &config);
        assert!(jobs.query.contains_key("organization_filter"));
        assert!(!jobs.query.contains_key("agency"));

        let internships = build_request(Provider::Internships, &input, &config);
        assert!(internships.query.contains_key("agency"));
        assert!(!internships.query.contains_key("organization_filter"));

        let yc = build_request(Provider::YcJobs, &input, &config);
        assert_eq!(yc.query.len(), 2);
        assert_eq!(yc.query["location_filter"], "Canada");
    }

    #[test]
    fn test_rapidapi_query_never_leaves_allow_list() {
        let config = Config::for_tests();
        let input = filters(&[("title_filter", "x"), ("injected", "y"), ("app_key", "z")]);
        for provider in [Provider::Jobs, Provider::Internships, Provider::YcJobs] {
            let allowed = provider.descriptor().allowed_keys();
            let request = build_request(provider, &input, &config);
            assert!(request.query.keys().all(|k| allowed.contains(&k.as_str())));
            assert!(request.query.values().all(|v| !v.is_empty()));
        }
    }

    #[test]
    fn test_adzuna_request_uses_app_credentials_and_user_agent() {
        let config = Config::for_tests();
        let request = build_request(Provider::Adzuna, &FilterMap::new(), &config);
        assert_eq!(request.url, "https://api.adzuna.com/v1/api/jobs/us/search/1");
        assert_eq!(
            request.headers,
            vec![("user-agent", "career-builder/1.0".to_string())]
        );
        assert!(request.credentials.contains(&("app_id", "test-app-id".to_string())));
        assert!(request.credentials.contains(&("app_key", "test-app-key".to_string())));
        assert!(!request.query.contains_key("app_key"));
    }

    #[test]
    fn test_only_adzuna_maps_records() {
        for provider in Provider::ALL {
            let maps = provider.descriptor().map_record.is_some();
            assert_eq!(maps, provider == Provider::Adzuna, "{}", provider.name());
        }
    }

    #[test]
    fn test_fetch_error_names_provider() {
        let err = FetchError::Status {
            provider: "yc_jobs",
            status: 429,
            body: "slow down".to_string(),
        };
        assert_eq!(err.provider(), "yc_jobs");
        assert!(err.to_string().contains("yc_jobs"));
        assert!(err.to_string().contains("429"));
    }
}
