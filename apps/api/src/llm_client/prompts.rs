// Cross-cutting prompt fragments shared by every LLM caller.
// Each feature keeps its own prompts.rs alongside it.

/// Appended to system prompts that expect a bare JSON object back.
pub const JSON_ONLY_INSTRUCTION: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";
