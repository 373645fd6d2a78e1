use anyhow::{bail, Context, Result};

const GROQ_CHAT_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
const GROQ_DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
const OPENAI_DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Which chat-completions backend the LLM client talks to.
/// Both speak the OpenAI-compatible wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmBackend {
    Groq,
    OpenAi,
}

impl LlmBackend {
    pub fn endpoint(self) -> &'static str {
        match self {
            LlmBackend::Groq => GROQ_CHAT_URL,
            LlmBackend::OpenAi => OPENAI_CHAT_URL,
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            LlmBackend::Groq => GROQ_DEFAULT_MODEL,
            LlmBackend::OpenAi => OPENAI_DEFAULT_MODEL,
        }
    }
}

/// Application configuration loaded from environment variables.
/// Startup fails if any required credential is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub rapidapi_key: String,
    pub adzuna_app_id: String,
    pub adzuna_app_key: String,
    pub adzuna_user_agent: String,
    pub llm_backend: LlmBackend,
    pub llm_api_key: String,
    pub llm_model: String,
    pub upstream_timeout_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let (llm_backend, llm_api_key) = match (optional_env("GROQ_API_KEY"), optional_env("OPENAI_API_KEY")) {
            (Some(key), _) => (LlmBackend::Groq, key),
            (None, Some(key)) => (LlmBackend::OpenAi, key),
            (None, None) => bail!("OPENAI_API_KEY (or GROQ_API_KEY) is not set"),
        };

        Ok(Config {
            rapidapi_key: require_env("RAPIDAPI_KEY")?,
            adzuna_app_id: require_env("ADZUNA_APP_ID")?,
            adzuna_app_key: require_env("ADZUNA_APP_KEY")?,
            adzuna_user_agent: optional_env("ADZUNA_USER_AGENT")
                .unwrap_or_else(|| "career-builder/1.0".to_string()),
            llm_model: optional_env("LLM_MODEL")
                .unwrap_or_else(|| llm_backend.default_model().to_string()),
            llm_backend,
            llm_api_key,
            upstream_timeout_secs: optional_env("UPSTREAM_TIMEOUT_SECS")
                .unwrap_or_else(|| "15".to_string())
                .parse::<u64>()
                .context("UPSTREAM_TIMEOUT_SECS must be a whole number of seconds")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    optional_env(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Reads a variable, treating an empty value the same as an unset one.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
impl Config {
    /// Fixed configuration for unit tests; never touches the environment.
    pub fn for_tests() -> Self {
        Config {
            rapidapi_key: "test-rapidapi-key".to_string(),
            adzuna_app_id: "test-app-id".to_string(),
            adzuna_app_key: "test-app-key".to_string(),
            adzuna_user_agent: "career-builder/1.0".to_string(),
            llm_backend: LlmBackend::Groq,
            llm_api_key: "test-llm-key".to_string(),
            llm_model: GROQ_DEFAULT_MODEL.to_string(),
            upstream_timeout_secs: 15,
            port: 8080,
            rust_log: "info".to_string(),
        }
    }
}
