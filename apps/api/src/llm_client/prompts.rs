// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// Output-format rules appended to every prompt that expects JSON back.
pub const JSON_ONLY_INSTRUCTION: &str = "\
IMPORTANT:
- Respond ONLY with the JSON object — no text before or after.
- Do NOT wrap the JSON in markdown code fences.
- Do NOT include explanations or apologies.";
