// Enrichment LLM prompt templates.
// All prompts for the enrichment pipeline are defined here.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for every enrichment generation call.
pub const ENRICHMENT_SYSTEM: &str = "\
You are an AI assistant for GitTalent, a recruiting platform for software developers. \
You write accurate, concise professional summaries from the data you are given. \
You MUST respond with valid JSON only — no markdown fences, no explanations.";

/// Primary prompt for the raw-document strategy.
/// Replace `{grounding_instruction}`, `{profile_url}`, `{dashboard_block}` and `{page_content}`.
pub const PROFILE_ENHANCE_PROMPT_TEMPLATE: &str = r#"Analyze a developer's GitHub profile page AND their self-declared GitTalent dashboard information, then suggest profile improvements.

{grounding_instruction}

GITHUB PROFILE URL: {profile_url}

{dashboard_block}

GITHUB PROFILE PAGE CONTENT (raw HTML, primary source):
<<<BEGIN PAGE>>>
{page_content}
<<<END PAGE>>>

OUTPUT SCHEMA (return exactly this structure):
{
  "bioSuggestion": "string — a concise, engaging first-person professional bio of 2-3 sentences",
  "skillSuggestions": ["string — key technical skills"],
  "techStack": ["string — languages and frameworks visible in the profile"]
}

RULES:
1. Prioritize the GitHub page for technical achievements and activity (repository languages, pinned projects, profile README).
2. Use the dashboard skills and projects as additional context to highlight what the developer wants to emphasize.
3. skillSuggestions is a consolidated list without duplicates; leave it empty if no skill can be clearly identified.
4. If all sources are insufficient for a meaningful bio, bioSuggestion must say: "Could not generate a bio suggestion due to limited information from your GitHub profile and dashboard inputs."
5. Return ONLY the JSON object — nothing else, no code fences."#;

/// Primary prompt for the structured-API strategy (recruiter-facing summary).
/// Replace `{grounding_instruction}`, `{profile_block}`, `{repositories_block}` and `{dashboard_block}`.
pub const CANDIDATE_SHORTLIST_PROMPT_TEMPLATE: &str = r#"You are helping a recruiter screen a candidate. Analyze structured data from the candidate's GitHub profile, obtained via the GitHub API.

{grounding_instruction}

GITHUB PROFILE DATA:
{profile_block}

REPOSITORIES (up to 50 non-forked, most recently updated first):
{repositories_block}

{dashboard_block}

OUTPUT SCHEMA (return exactly this structure):
{
  "bioSuggestion": "string — a concise summary of the candidate: bio, key skills suggested by repository languages and descriptions, standout projects (consider stars and recency). Mention if the bio is missing or there are few repositories.",
  "skillSuggestions": ["string — technical skills evidenced by the data"],
  "techStack": ["string — distinct languages and technologies from repository languages, names and descriptions"],
  "flaggedItems": ["string — 2-3 noteworthy items, positive or areas for attention"]
}

RULES:
1. Base everything ONLY on the data above.
2. flaggedItems examples: "Owns a highly starred repository: <name> (Stars: <count>)", "Actively maintains projects, last update on <date>", "Limited public repository activity." If nothing stands out, use a single item: "Profile data appears standard."
3. techStack and skillSuggestions are empty arrays if nothing can be confidently identified.
4. Return ONLY the JSON object — nothing else, no code fences."#;

/// Fallback prompt: dashboard data only. The external source is deliberately absent.
/// Replace `{grounding_instruction}`, `{disclosure}` and `{dashboard_block}`.
pub const DASHBOARD_FALLBACK_PROMPT_TEMPLATE: &str = r#"Write a professional bio for a developer using ONLY the self-declared information from their GitTalent dashboard below.

{grounding_instruction}

{dashboard_block}

OUTPUT SCHEMA (return exactly this structure):
{
  "bioSuggestion": "string — a concise first-person professional bio of 2-3 sentences",
  "skillSuggestions": ["string"]
}

RULES:
1. Begin bioSuggestion with exactly: "{disclosure}"
2. Do NOT mention GitHub, repositories, profile pages, fetching, errors or any other external source.
3. skillSuggestions must list exactly the dashboard skills given above, and nothing else.
4. Return ONLY the JSON object — nothing else, no code fences."#;

/// Opening every fallback bio carries, so readers know it rests on self-declared data.
pub const DASHBOARD_DISCLOSURE: &str = "Based on your dashboard profile,";
