//! Résumé plaintext: PDF extraction and prompt-budget truncation.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResumeError {
    #[error("could not extract text from PDF: {0}")]
    Extract(String),
}

/// Extracts plaintext from an uploaded PDF. Pages without a text layer
/// contribute nothing. CPU-bound: call from `spawn_blocking`.
pub fn pdf_to_text(pdf_bytes: &[u8]) -> Result<String, ResumeError> {
    pdf_extract::extract_text_from_mem(pdf_bytes).map_err(|e| ResumeError::Extract(e.to_string()))
}

/// Async wrapper that keeps PDF parsing off the request executor.
pub async fn extract_text(pdf_bytes: bytes::Bytes) -> Result<String, ResumeError> {
    tokio::task::spawn_blocking(move || pdf_to_text(&pdf_bytes))
        .await
        .map_err(|e| ResumeError::Extract(e.to_string()))?
}

/// First `max_chars` characters of `text`, never splitting a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
