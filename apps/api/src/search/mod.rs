//! Search pipeline: normalize → provider fetch → (map) → optional rating.

use bytes::Bytes;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::filters::{normalize_keys, FilterMap, FilterValue};
use crate::matching::job_rater::rate_jobs;
use crate::models::JobListing;
use crate::providers::{extract_list, extract_list_mut, Provider};
use crate::resume;
use crate::state::AppState;

pub mod handlers;

/// Request key that asks for rating without a résumé. Never forwarded.
const RATE_KEY: &str = "rate";

#[derive(Debug, Default)]
pub struct SearchRequest {
    pub filters: FilterMap,
    pub resume_pdf: Option<Bytes>,
}

/// Runs one search against one provider. Returns the provider payload as-is
/// (with ratings attached) or, for providers whose records need mapping, a
/// `{"results": [...]}` envelope of `JobListing`s.
pub async fn run_search(
    state: &AppState,
    provider: Provider,
    request: SearchRequest,
) -> Result<Value, AppError> {
    let mut filters = normalize_keys(request.filters);
    let rate_requested = filters.remove(RATE_KEY).is_some_and(|v| is_truthy(&v));

    let mut payload = state.jobs.fetch(provider, &filters).await?;

    let resume_text = match request.resume_pdf {
        Some(pdf) => resume_text_or_none(pdf).await,
        None => None,
    };
    let should_rate = rate_requested || resume_text.is_some();

    if let Some(map_record) = provider.descriptor().map_record {
        let mut listings: Vec<JobListing> = extract_list(&payload).iter().map(map_record).collect();
        info!(provider = provider.name(), count = listings.len(), "Mapped provider records");
        if should_rate {
            rate_jobs(&mut listings, resume_text.as_deref(), state.llm.as_ref()).await;
        }
        return Ok(json!({ "results": listings }));
    }

    if should_rate {
        rate_jobs(
            extract_list_mut(&mut payload),
            resume_text.as_deref(),
            state.llm.as_ref(),
        )
        .await;
    }
    Ok(payload)
}

/// Résumé text only feeds rating, so an unreadable upload degrades to
/// "no résumé" instead of failing the search.
async fn resume_text_or_none(pdf: Bytes) -> Option<String> {
    match resume::extract_text(pdf).await {
        Ok(text) if !text.trim().is_empty() => Some(text),
        Ok(_) => {
            warn!("Uploaded résumé has no extractable text; skipping rating context");
            None
        }
        Err(e) => {
            warn!("Ignoring unreadable résumé: {e}");
            None
        }
    }
}

fn is_truthy(value: &FilterValue) -> bool {
    match value {
        FilterValue::Bool(b) => *b,
        FilterValue::Int(n) => *n != 0,
        FilterValue::Str(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes"),
    }
}
