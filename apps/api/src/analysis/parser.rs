//! Turns the model's free text into an `AnalysisResult`.
//!
//! The model output is untrusted: every field is validated and every score is
//! normalized so the result always has all five companies with scores in 0–10.

use std::sync::OnceLock;

use regex_lite::Regex;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::analysis::models::{AnalysisResult, Company, CompanyScores, CompanySuggestions};

pub const MIN_SCORE: u8 = 0;
pub const MAX_SCORE: u8 = 10;

/// The cleaned text was not a JSON object. Recovered by the caller, never surfaced.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("payload is JSON but not an object")]
    NotAnObject,
}

/// Removes a surrounding Markdown code fence, tagged `json` or untagged.
/// An opening fence without a closing one is still dropped.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(body) = text.strip_prefix("```") else {
        return text;
    };
    let body = body.strip_prefix("json").unwrap_or(body).trim_start();
    body.strip_suffix("```").map(str::trim).unwrap_or(body)
}

fn leading_integer_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*([+-]?[0-9]+)").expect("leading integer pattern is valid")
    })
}

/// Reads the integer a string starts with ("8/10" → 8). `None` if it has none.
fn leading_integer(s: &str) -> Option<i64> {
    let digits = leading_integer_regex().captures(s)?.get(1)?.as_str();
    // Overflowing literals saturate in the direction of their sign.
    Some(digits.parse::<i64>().unwrap_or(if digits.starts_with('-') {
        i64::MIN
    } else {
        i64::MAX
    }))
}

fn clamp_score(n: i64) -> u8 {
    n.clamp(MIN_SCORE as i64, MAX_SCORE as i64) as u8
}

/// Maps any JSON value to a score in 0–10. Values with no readable integer become 0.
pub fn normalize_score(value: &Value) -> u8 {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                clamp_score(i)
            } else if n.as_u64().is_some() {
                MAX_SCORE
            } else {
                n.as_f64()
                    .map(|f| clamp_score(f.trunc() as i64))
                    .unwrap_or(MIN_SCORE)
            }
        }
        Value::String(s) => leading_integer(s).map(clamp_score).unwrap_or(MIN_SCORE),
        _ => MIN_SCORE,
    }
}

fn string_field(obj: &Map<String, Value>, key: &str) -> String {
    obj.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Keeps the string items of an array; a bare string becomes a one-item list.
fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        Some(Value::String(s)) => vec![s.clone()],
        _ => Vec::new(),
    }
}

/// Parses fenced or bare model output into a normalized `AnalysisResult`.
pub fn parse_analysis(text: &str) -> Result<AnalysisResult, PayloadError> {
    let cleaned = strip_json_fences(text);
    let value: Value = serde_json::from_str(cleaned)?;
    let obj = value.as_object().ok_or(PayloadError::NotAnObject)?;

    let raw_scores = obj.get("faangScores").and_then(Value::as_object);
    let raw_suggestions = obj.get("suggestions").and_then(Value::as_object);

    let mut faang_scores = CompanyScores::default();
    let mut suggestions = CompanySuggestions::default();
    for company in Company::ALL {
        let score = raw_scores
            .and_then(|m| m.get(company.key()))
            .map(normalize_score)
            .unwrap_or(MIN_SCORE);
        faang_scores.set(company, score);
        suggestions.set(
            company,
            string_list(raw_suggestions.and_then(|m| m.get(company.key()))),
        );
    }

    Ok(AnalysisResult {
        summary: string_field(obj, "summary"),
        technologies: string_list(obj.get("technologies")),
        faang_scores,
        suggestions,
        resume_snippet: string_field(obj, "resumeSnippet"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const WELL_FORMED: &str = r#"{
        "summary": "A terminal UI for browsing logs.",
        "technologies": ["Rust", "Tokio", "Ratatui"],
        "faangScores": { "meta": 6, "amazon": 7, "apple": 5, "netflix": 8, "google": 7 },
        "suggestions": {
            "meta": ["Add telemetry", "Document the plugin API", "Add fuzz tests"],
            "amazon": ["Ship a CloudWatch sink", "Add load tests", "Publish SLOs"],
            "apple": ["Polish key bindings", "Add accessibility modes", "Support macOS unified logs"],
            "netflix": ["Add chaos tests", "Stream from Kafka", "Expose metrics", "Add tracing"],
            "google": ["Increase test coverage", "Add benchmarks", "Write a design doc"]
        },
        "resumeSnippet": "Built a Rust log explorer handling 1M lines/s."
    }"#;

    #[test]
    fn test_strip_fences_around_analysis_payload() {
        let tagged = "```json\n{\"summary\": \"CLI\", \"faangScores\": {\"google\": 9}}\n```";
        assert_eq!(
            strip_json_fences(tagged),
            "{\"summary\": \"CLI\", \"faangScores\": {\"google\": 9}}"
        );

        let untagged = "  ```\n{\"technologies\": [\"Rust\"]}\n```  ";
        assert_eq!(strip_json_fences(untagged), "{\"technologies\": [\"Rust\"]}");
    }

    #[test]
    fn test_strip_fences_leaves_bare_payload_alone() {
        let bare = "{\"resumeSnippet\": \"Built a CLI\"}";
        assert_eq!(strip_json_fences(bare), bare);
        let refusal = "Sorry, I cannot browse GitHub.";
        assert_eq!(strip_json_fences(refusal), refusal);
    }

    #[test]
    fn test_strip_fences_with_unclosed_fence() {
        let truncated = "```json\n{\"summary\": \"cut off\"}";
        assert_eq!(strip_json_fences(truncated), "{\"summary\": \"cut off\"}");
        assert_eq!(parse_analysis(truncated).unwrap().summary, "cut off");
    }

    #[test]
    fn test_strip_json_fences_is_idempotent() {
        let once = strip_json_fences("```json\n{\"a\": [1, 2]}\n```");
        assert_eq!(strip_json_fences(once), once);
    }

    #[test]
    fn test_normalize_score_reads_leading_integer() {
        assert_eq!(normalize_score(&json!("8/10")), 8);
        assert_eq!(normalize_score(&json!(" 7 out of 10")), 7);
        assert_eq!(normalize_score(&json!("n/a")), 0);
        assert_eq!(normalize_score(&json!("")), 0);
    }

    #[test]
    fn test_normalize_score_clamps_into_range() {
        assert_eq!(normalize_score(&json!(42)), 10);
        assert_eq!(normalize_score(&json!(-3)), 0);
        assert_eq!(normalize_score(&json!("-2")), 0);
        assert_eq!(normalize_score(&json!("99999999999999999999999")), 10);
        assert_eq!(normalize_score(&json!(18446744073709551615u64)), 10);
    }

    #[test]
    fn test_normalize_score_truncates_floats() {
        assert_eq!(normalize_score(&json!(7.9)), 7);
        assert_eq!(normalize_score(&json!(0.5)), 0);
    }

    #[test]
    fn test_normalize_score_is_total() {
        let inputs = [
            json!(null),
            json!(true),
            json!([8]),
            json!({ "score": 8 }),
            json!("ten"),
            json!(1e300),
            json!(-1e300),
            json!(3),
        ];
        for input in inputs {
            let score = normalize_score(&input);
            assert!(score <= MAX_SCORE, "{input} -> {score}");
        }
    }

    #[test]
    fn test_parse_well_formed_payload() {
        let result = parse_analysis(WELL_FORMED).unwrap();
        assert_eq!(result.summary, "A terminal UI for browsing logs.");
        assert_eq!(result.technologies, vec!["Rust", "Tokio", "Ratatui"]);
        assert_eq!(result.faang_scores.netflix, 8);
        assert_eq!(result.suggestions.netflix.len(), 4);
        assert_eq!(result.resume_snippet, "Built a Rust log explorer handling 1M lines/s.");
    }

    #[test]
    fn test_parse_fenced_payload_matches_bare_payload() {
        let fenced = format!("```json\n{WELL_FORMED}\n```");
        assert_eq!(parse_analysis(&fenced).unwrap(), parse_analysis(WELL_FORMED).unwrap());
    }

    #[test]
    fn test_parse_normalizes_string_scores() {
        let text = r#"{
            "summary": "s", "technologies": [], "resumeSnippet": "r",
            "faangScores": { "meta": "8/10", "amazon": "n/a", "apple": 4, "netflix": "6", "google": null },
            "suggestions": {}
        }"#;
        let scores = parse_analysis(text).unwrap().faang_scores;
        assert_eq!(
            scores,
            CompanyScores { meta: 8, amazon: 0, apple: 4, netflix: 6, google: 0 }
        );
    }

    #[test]
    fn test_parse_fills_missing_companies() {
        let text = r#"{ "summary": "s", "faangScores": { "google": 9 } }"#;
        let result = parse_analysis(text).unwrap();
        assert_eq!(result.faang_scores.google, 9);
        assert_eq!(result.faang_scores.meta, 0);
        assert!(result.suggestions.apple.is_empty());
        assert!(result.technologies.is_empty());
        assert_eq!(result.resume_snippet, "");
    }

    #[test]
    fn test_parse_keeps_only_string_items() {
        let text = r#"{
            "technologies": ["Go", 3, null, "Redis"],
            "suggestions": { "meta": "Add a GraphQL layer", "amazon": ["Use SQS", {"x": 1}] }
        }"#;
        let result = parse_analysis(text).unwrap();
        assert_eq!(result.technologies, vec!["Go", "Redis"]);
        assert_eq!(result.suggestions.meta, vec!["Add a GraphQL layer"]);
        assert_eq!(result.suggestions.amazon, vec!["Use SQS"]);
    }

    #[test]
    fn test_parse_rejects_non_json() {
        assert!(matches!(parse_analysis("not json"), Err(PayloadError::Json(_))));
    }

    #[test]
    fn test_parse_rejects_non_object_json() {
        assert!(matches!(parse_analysis("[1, 2, 3]"), Err(PayloadError::NotAnObject)));
        assert!(matches!(parse_analysis("\"hello\""), Err(PayloadError::NotAnObject)));
    }
}
