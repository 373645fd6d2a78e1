// LLM prompt constants for résumé-driven filter generation and job rating.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for filter generation.
pub const FILTER_SYSTEM: &str = "You are a helpful job hunting assistant. \
    The goal is to maximize the breadth of jobs the user can and should apply to, \
    while favouring the jobs they are most likely to want and do well at, \
    judged from the information available to you.";

/// Filter generation prompt. Replace `{resume_text}` before sending.
pub const FILTER_PROMPT_TEMPLATE: &str = r#"You are a job API filter generator.
Analyse the résumé and output ONLY a JSON object with exactly the keys below.

advanced_title_filter (STRING)
- Relevant job titles, skills and technologies taken from the résumé.
- Separate terms with " | ", e.g. 'DevOps Engineer' | Kubernetes | 'Site Reliability Engineer' | AWS
- Wrap every multi-word phrase in single quotes: 'Cloud Engineer', not Cloud Engineer.
- Single words stay unquoted.
- Include both specific and general forms ('Kubernetes Administrator' and Kubernetes).

location_filter (STRING)
- Full names only ("United States", "New York", "United Kingdom"), no abbreviations.
- Separate locations with " OR ".
- Order from most specific to least specific: Austin OR Texas OR United States
- Only use locations the résumé states the candidate lives in or wants to work in.

OUTPUT (STRICT)
{"advanced_title_filter": "...", "location_filter": "..."}

---
RESUME:
{resume_text}
---
Generate JSON now:"#;

/// System prompt for job rating. Replace `{json_only}` before sending.
pub const RATING_SYSTEM_TEMPLATE: &str = "You are a career-match assistant.\n\
    Rate each job from 0.0 to 10.0, with exactly one decimal place, for how well it fits \
    the candidate's résumé. Use whole values sparingly.\n\
    Weigh experience level most heavily: the years and seniority a listing asks for must \
    match or nearly match what the résumé shows. Someone with 1-2 years of experience is a \
    poor fit (below 5.0) for a senior role, and someone with 10-12 years is a poor fit for \
    an entry-level listing. Skill overlap between the résumé and the listing comes second; \
    loose keyword overlap alone is not a strong fit.\n\
    Return ONLY a JSON object whose keys are the job ids and whose values are the ratings. \
    {json_only}";
