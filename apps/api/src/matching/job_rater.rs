//! Job Rater: scores listings against a résumé with one LLM call.
//!
//! Rating is an enhancement: every failure is logged and swallowed, and the
//! listings are returned exactly as they were.

use std::collections::HashMap;

use serde_json::{json, Value};
use tracing::{info, warn};

use crate::llm_client::json::parse_fenced_json;
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::llm_client::{ChatMessage, ChatModel, ChatRequest, LlmError};
use crate::matching::prompts::RATING_SYSTEM_TEMPLATE;
use crate::models::JobListing;
use crate::resume::truncate_chars;

/// Résumé characters sent alongside the listings.
pub const RESUME_CHAR_BUDGET: usize = 8000;
/// Moderate temperature: some spread between similar listings is wanted.
const RATING_TEMPERATURE: f32 = 0.5;

/// A job record the rater can read and annotate.
pub trait RateableJob {
    fn job_id(&self) -> Option<String>;
    /// Reduced projection sent to the model.
    fn shortlist_entry(&self) -> Value;
    fn set_rating(&mut self, rating: f64);
}

impl RateableJob for JobListing {
    fn job_id(&self) -> Option<String> {
        (!self.id.is_empty()).then(|| self.id.clone())
    }

    fn shortlist_entry(&self) -> Value {
        json!({
            "id": self.id,
            "date_posted": self.date_posted,
            "title": self.title,
            "organization": self.organization,
            "description_text": self.description_text,
        })
    }

    fn set_rating(&mut self, rating: f64) {
        self.rating = Some(rating);
    }
}

/// Raw provider records are rated in place.
impl RateableJob for Value {
    fn job_id(&self) -> Option<String> {
        match self.get("id")? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    fn shortlist_entry(&self) -> Value {
        let field = |key: &str| self.get(key).cloned().unwrap_or(Value::Null);
        json!({
            "id": field("id"),
            "date_posted": field("date_posted"),
            "title": field("title"),
            "organization": field("organization"),
            "description_text": field("description_text"),
        })
    }

    fn set_rating(&mut self, rating: f64) {
        if let Some(record) = self.as_object_mut() {
            record.insert("rating".to_string(), json!(rating));
        }
    }
}

/// Rates `jobs` against `resume_text`, attaching `rating` to every job the
/// model scored. Never fails.
pub async fn rate_jobs<J: RateableJob>(jobs: &mut [J], resume_text: Option<&str>, llm: &dyn ChatModel) {
    if jobs.is_empty() {
        return;
    }

    let ratings = match request_ratings(jobs, resume_text, llm).await {
        Ok(ratings) => ratings,
        Err(e) => {
            warn!("Rating LLM call failed: {e}");
            return;
        }
    };

    let rated = apply_ratings(jobs, &ratings);
    info!(rated, total = jobs.len(), "Job-fit ratings attached");
}

async fn request_ratings<J: RateableJob>(
    jobs: &[J],
    resume_text: Option<&str>,
    llm: &dyn ChatModel,
) -> Result<HashMap<String, f64>, LlmError> {
    let request = ChatRequest {
        messages: vec![
            ChatMessage::system(RATING_SYSTEM_TEMPLATE.replace("{json_only}", JSON_ONLY_INSTRUCTION)),
            ChatMessage::user(build_rating_prompt(jobs, resume_text)?),
        ],
        temperature: RATING_TEMPERATURE,
        json_mode: false,
    };

    let reply = llm.complete(request).await?;
    parse_ratings(&reply)
}

pub fn build_rating_prompt<J: RateableJob>(
    jobs: &[J],
    resume_text: Option<&str>,
) -> Result<String, serde_json::Error> {
    let shortlist: Vec<Value> = jobs.iter().map(RateableJob::shortlist_entry).collect();

    let mut parts = Vec::with_capacity(2);
    if let Some(resume) = resume_text.filter(|r| !r.trim().is_empty()) {
        parts.push(format!(
            "Résumé:\n{}",
            truncate_chars(resume, RESUME_CHAR_BUDGET)
        ));
    }
    parts.push(format!(
        "Job listings JSON:\n{}",
        serde_json::to_string(&shortlist)?
    ));
    Ok(parts.join("\n\n"))
}

/// Parses the `{job_id: score}` reply. Scores that are not numbers (or
/// numeric strings) are skipped.
pub fn parse_ratings(reply: &str) -> Result<HashMap<String, f64>, LlmError> {
    let value = parse_fenced_json(reply)?;
    let object = value
        .as_object()
        .ok_or(LlmError::UnexpectedShape("rating reply is not a JSON object"))?;

    Ok(object
        .iter()
        .filter_map(|(id, score)| match coerce_score(score) {
            Some(score) => Some((id.clone(), score)),
            None => {
                warn!(job_id = %id, "Ignoring non-numeric rating {score}");
                None
            }
        })
        .collect())
}

/// Numeric view of a score, clamped to 0.0 – 10.0 and rounded to one decimal.
fn coerce_score(score: &Value) -> Option<f64> {
    let raw = match score {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    raw.is_finite()
        .then(|| ((raw.clamp(0.0, 10.0)) * 10.0).round() / 10.0)
}

fn apply_ratings<J: RateableJob>(jobs: &mut [J], ratings: &HashMap<String, f64>) -> usize {
    let mut rated = 0;
    for job in jobs.iter_mut() {
        let Some(rating) = job.job_id().and_then(|id| ratings.get(&id).copied()) else {
            continue;
        };
        job.set_rating(rating);
        rated += 1;
    }
    rated
}
