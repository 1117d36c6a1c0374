// Shared prompt fragments used across LLM callers.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// System prompt fragment for short plain-prose replies.
pub const PLAIN_PROSE_SYSTEM: &str = "You are a concise business analyst. \
    Respond with plain prose only. \
    Do NOT use markdown, bullet points, headings or JSON.";
