// Repository analysis: prompt, inference call, lenient parsing, derived report.
// All LLM calls go through llm_client, never to Gemini directly.

pub mod analyzer;
pub mod handlers;
pub mod models;
pub mod parser;
pub mod prompts;
pub mod repo_url;
pub mod report;
