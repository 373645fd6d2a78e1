// Résumé-driven matching: filter generation and job rating.
// All LLM calls go through llm_client::ChatModel.

pub mod filter_generator;
pub mod handlers;
pub mod job_rater;
pub mod prompts;
