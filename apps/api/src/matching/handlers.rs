//! Axum route handlers for résumé-driven filter generation.

use axum::{
    extract::{Multipart, State},
    Json,
};

use crate::errors::AppError;
use crate::matching::filter_generator::{generate_filters, GeneratedFilters};
use crate::resume;
use crate::search::handlers::{read_upload_form, RESUME_FIELD};
use crate::state::AppState;

/// POST /generate_filters
///
/// Multipart form with a `resume` PDF. Returns the `advanced_title_filter`
/// and `location_filter` the model derived from it.
pub async fn handle_generate_filters(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<GeneratedFilters>, AppError> {
    let form = read_upload_form(multipart).await?;
    let pdf = form
        .resume
        .ok_or_else(|| AppError::Validation(format!("a '{RESUME_FIELD}' PDF file is required")))?;

    let resume_text = resume::extract_text(pdf)
        .await
        .map_err(|e| AppError::UnprocessableEntity(e.to_string()))?;
    if resume_text.trim().is_empty() {
        return Err(AppError::UnprocessableEntity(
            "the uploaded PDF contains no extractable text".to_string(),
        ));
    }

    let filters = generate_filters(&resume_text, state.llm.as_ref()).await?;
    Ok(Json(filters))
}
