//! Prompt template for repository analysis.

use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;

pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"Analyze this GitHub repository: {repo_url}

If the README is missing or lacks detail, inspect the entire codebase — including file structure, code comments, file extensions, import statements, and config files (like package.json, requirements.txt, pom.xml, Cargo.toml) — to understand the project and identify technologies used.

Return your findings in the following strict JSON structure:
{
  "summary": "A comprehensive overview of what the project does and its key features",
  "technologies": ["List all detected technologies, frameworks, and languages used"],
  "faangScores": {
    "meta": 0,
    "amazon": 0,
    "apple": 0,
    "netflix": 0,
    "google": 0
  },
  "suggestions": {
    "meta": ["3-4 dynamic, context-aware improvements for Meta alignment"],
    "amazon": ["3-4 dynamic, context-aware improvements for Amazon alignment"],
    "apple": ["3-4 dynamic, context-aware improvements for Apple alignment"],
    "netflix": ["3-4 dynamic, context-aware improvements for Netflix alignment"],
    "google": ["3-4 dynamic, context-aware improvements for Google alignment"]
  },
  "resumeSnippet": "A professional, concise project description suitable for a resume"
}

{json_only}
- Use integer values between 0 and 10 for faangScores.
- In 'technologies', include both backend and frontend stacks, databases, hosting, cloud, etc.

When analyzing FAANG alignment:
- Do NOT use fixed criteria. Assess how the project aligns with each company's known product domains, engineering focus, and cultural values.
- Tailor suggestions to this specific project: architecture, scalability, algorithmic complexity, real-time behavior, UX/UI quality, infra integration, cloud readiness, test coverage, documentation.

Examples:
- A full-stack web app: assess how well it uses the modern tools, frameworks, and structure that companies like Google or Meta expect.
- An ML repo: suggest improvements for data handling, model explainability, or deployment aligned with Amazon or Apple standards.
- A CLI tool: evaluate abstraction, usability, and packaging in ways Google or Netflix might care about.

Also analyze:
1. Code readability, modularity, and maintainability
2. Deployment readiness and DevOps practices
3. Testing coverage and CI integration
4. Security, error handling, and logging
5. Scalability and performance engineering
"#;

/// Builds the analysis prompt for one repository URL.
pub fn build_analysis_prompt(repo_url: &str) -> String {
    ANALYSIS_PROMPT_TEMPLATE
        .replace("{json_only}", JSON_ONLY_INSTRUCTION)
        .replace("{repo_url}", repo_url)
}
