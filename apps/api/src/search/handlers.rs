//! Axum route handlers for the provider search endpoints.

use std::collections::HashMap;

use axum::{
    extract::{Multipart, Query, State},
    Json,
};
use bytes::Bytes;
use serde_json::Value;

use crate::errors::AppError;
use crate::filters::{FilterMap, FilterValue};
use crate::providers::Provider;
use crate::search::{run_search, SearchRequest};
use crate::state::AppState;

/// Multipart field carrying the résumé PDF.
pub const RESUME_FIELD: &str = "resume";

/// GET /fetch_{provider}
///
/// Every query-string key is a filter; unknown keys are dropped before the
/// upstream call.
pub async fn handle_search_query(
    provider: Provider,
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, AppError> {
    let filters = params
        .into_iter()
        .map(|(k, v)| (k, FilterValue::Str(v)))
        .collect();
    let payload = run_search(
        &state,
        provider,
        SearchRequest {
            filters,
            resume_pdf: None,
        },
    )
    .await?;
    Ok(Json(payload))
}

/// POST /fetch_{provider}
///
/// Multipart form: text fields are filters, the `resume` file (optional)
/// turns on rating against that résumé.
pub async fn handle_search_upload(
    provider: Provider,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    let form = read_upload_form(multipart).await?;
    let payload = run_search(
        &state,
        provider,
        SearchRequest {
            filters: form.filters,
            resume_pdf: form.resume,
        },
    )
    .await?;
    Ok(Json(payload))
}

/// A parsed multipart upload: filter fields plus an optional résumé.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub filters: FilterMap,
    pub resume: Option<Bytes>,
}

pub async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == RESUME_FIELD {
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Invalid résumé upload: {e}")))?;
            if !data.is_empty() {
                form.resume = Some(data);
            }
        } else {
            let text = field
                .text()
                .await
                .map_err(|e| AppError::Validation(format!("Invalid form field '{name}': {e}")))?;
            form.filters.insert(name, FilterValue::Str(text));
        }
    }

    Ok(form)
}
