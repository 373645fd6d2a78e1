//! Filter Generator: derives canonical search filters from résumé text.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::filters::{ADVANCED_TITLE_FILTER, LOCATION_FILTER, LOCATION_OR_DELIMITER};
use crate::llm_client::json::parse_model_json;
use crate::llm_client::{ChatMessage, ChatModel, ChatRequest, LlmError};
use crate::matching::prompts::{FILTER_PROMPT_TEMPLATE, FILTER_SYSTEM};
use crate::resume::truncate_chars;

/// Résumé characters sent to the model.
pub const RESUME_CHAR_BUDGET: usize = 7000;
/// Low temperature: the same résumé should yield the same filters.
const FILTER_TEMPERATURE: f32 = 0.2;

/// Validated model output: the two canonical filters the UI pre-fills.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneratedFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advanced_title_filter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_filter: Option<String>,
}

impl GeneratedFilters {
    /// Keeps only the generator's keys; nulls, blanks and non-text values are
    /// dropped. A list of strings is joined with the key's delimiter.
    pub fn from_model_value(value: &Value) -> Result<Self, LlmError> {
        let object = value.as_object().ok_or(LlmError::UnexpectedShape(
            "filter reply is not a JSON object",
        ))?;
        Ok(Self {
            advanced_title_filter: object
                .get(ADVANCED_TITLE_FILTER)
                .and_then(|v| text_value(v, " | ")),
            location_filter: object
                .get(LOCATION_FILTER)
                .and_then(|v| text_value(v, LOCATION_OR_DELIMITER)),
        })
    }
}

fn text_value(value: &Value, delimiter: &str) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(delimiter),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

pub fn build_filter_prompt(resume_text: &str) -> String {
    FILTER_PROMPT_TEMPLATE.replace(
        "{resume_text}",
        truncate_chars(resume_text, RESUME_CHAR_BUDGET),
    )
}

/// Parses a raw model reply: blank check, fence strip, two-stage JSON parse,
/// schema validation.
pub fn parse_filter_reply(reply: &str) -> Result<GeneratedFilters, LlmError> {
    if reply.trim().is_empty() {
        return Err(LlmError::EmptyContent);
    }
    let value = parse_model_json(reply)?;
    GeneratedFilters::from_model_value(&value)
}

/// Asks the model for search filters matching `resume_text`.
pub async fn generate_filters(
    resume_text: &str,
    llm: &dyn ChatModel,
) -> Result<GeneratedFilters, AppError> {
    let request = ChatRequest {
        messages: vec![
            ChatMessage::system(FILTER_SYSTEM),
            ChatMessage::user(build_filter_prompt(resume_text)),
        ],
        temperature: FILTER_TEMPERATURE,
        json_mode: true,
    };

    let filters = async {
        let reply = llm.complete(request).await?;
        debug!("LLM filter response: {reply}");
        parse_filter_reply(&reply)
    }
    .await
    .map_err(|e| AppError::Llm(format!("Filter generation failed: {e}")))?;

    info!(
        has_title = filters.advanced_title_filter.is_some(),
        has_location = filters.location_filter.is_some(),
        "Generated search filters from résumé"
    );
    Ok(filters)
}
