//! Derived views over an `AnalysisResult`: grouped tech stack,
//! per-company fit labels, and export naming.

use chrono::NaiveDate;
use serde::Serialize;

use crate::analysis::models::{AnalysisResult, Company};
use crate::analysis::repo_url::short_repo_name;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TechCategory {
    Languages,
    Frontend,
    Backend,
    Database,
    Devops,
    Testing,
    Other,
}

/// Keyword lists checked in order; a technology lands in the first category
/// with a keyword it contains. Matching is case-sensitive.
const CATEGORY_KEYWORDS: &[(TechCategory, &[&str])] = &[
    (
        TechCategory::Languages,
        &[
            "JavaScript", "TypeScript", "Python", "Java", "C#", "Ruby", "Go", "Rust", "PHP",
            "Swift", "Kotlin",
        ],
    ),
    (
        TechCategory::Frontend,
        &[
            "React", "Vue", "Angular", "Svelte", "Next.js", "HTML", "CSS", "SCSS", "Tailwind",
            "Bootstrap",
        ],
    ),
    (
        TechCategory::Backend,
        &[
            "Node.js", "Express", "Django", "Flask", "Spring", "Laravel", "Rails", "ASP.NET",
            "FastAPI",
        ],
    ),
    (
        TechCategory::Database,
        &[
            "MongoDB", "PostgreSQL", "MySQL", "SQLite", "Redis", "Firebase", "Supabase",
            "DynamoDB",
        ],
    ),
    (
        TechCategory::Devops,
        &[
            "Docker", "Kubernetes", "AWS", "GCP", "Azure", "CI/CD", "GitHub Actions", "Jenkins",
            "Terraform",
        ],
    ),
    (
        TechCategory::Testing,
        &[
            "Jest", "Mocha", "Cypress", "Selenium", "PyTest", "JUnit", "Enzyme",
            "Testing Library",
        ],
    ),
];

const CATEGORY_ORDER: [TechCategory; 7] = [
    TechCategory::Languages,
    TechCategory::Frontend,
    TechCategory::Backend,
    TechCategory::Database,
    TechCategory::Devops,
    TechCategory::Testing,
    TechCategory::Other,
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TechGroup {
    pub category: TechCategory,
    pub technologies: Vec<String>,
}

fn categorize(tech: &str) -> TechCategory {
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| tech.contains(k)))
        .map(|(category, _)| *category)
        .unwrap_or(TechCategory::Other)
}

/// Groups technologies by category, keeping input order within each group and
/// omitting empty groups.
pub fn categorize_technologies(technologies: &[String]) -> Vec<TechGroup> {
    let assigned: Vec<(TechCategory, &String)> =
        technologies.iter().map(|t| (categorize(t), t)).collect();

    CATEGORY_ORDER
        .iter()
        .filter_map(|&category| {
            let technologies: Vec<String> = assigned
                .iter()
                .filter(|(c, _)| *c == category)
                .map(|(_, t)| (*t).clone())
                .collect();
            (!technologies.is_empty()).then_some(TechGroup {
                category,
                technologies,
            })
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FitLabel {
    Excellent,
    Good,
    Moderate,
    NeedsImprovement,
}

impl FitLabel {
    pub fn for_score(score: u8) -> Self {
        match score {
            8..=u8::MAX => FitLabel::Excellent,
            6..=7 => FitLabel::Good,
            4..=5 => FitLabel::Moderate,
            _ => FitLabel::NeedsImprovement,
        }
    }

    pub fn feedback(self) -> &'static str {
        match self {
            FitLabel::Excellent => "Excellent fit!",
            FitLabel::Good => "Good fit",
            FitLabel::Moderate => "Moderate fit",
            FitLabel::NeedsImprovement => "Could use improvement",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CompanyFit {
    pub company: Company,
    pub name: &'static str,
    pub score: u8,
    pub label: FitLabel,
    pub feedback: &'static str,
}

/// Everything the results view renders for one analysis.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub repo_url: String,
    pub repo_name: String,
    pub analysis: AnalysisResult,
    pub tech_stack: Vec<TechGroup>,
    pub fit: Vec<CompanyFit>,
}

impl AnalysisReport {
    pub fn build(repo_url: &str, analysis: AnalysisResult) -> Self {
        let fit = analysis
            .faang_scores
            .iter()
            .map(|(company, score)| {
                let label = FitLabel::for_score(score);
                CompanyFit {
                    company,
                    name: company.display_name(),
                    score,
                    label,
                    feedback: label.feedback(),
                }
            })
            .collect();

        Self {
            repo_url: repo_url.to_string(),
            repo_name: short_repo_name(repo_url),
            tech_stack: categorize_technologies(&analysis.technologies),
            fit,
            analysis,
        }
    }
}

/// Download name for an exported analysis.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("devlens-analysis-{}.json", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn techs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_categorize_by_substring_in_category_order() {
        let groups = categorize_technologies(&techs(&[
            "TypeScript",
            "React 18",
            "PostgreSQL 15",
            "Docker Compose",
            "Jest",
            "Prisma",
        ]));

        let as_pairs: Vec<(TechCategory, Vec<String>)> = groups
            .into_iter()
            .map(|g| (g.category, g.technologies))
            .collect();
        assert_eq!(
            as_pairs,
            vec![
                (TechCategory::Languages, techs(&["TypeScript"])),
                (TechCategory::Frontend, techs(&["React 18"])),
                (TechCategory::Database, techs(&["PostgreSQL 15"])),
                (TechCategory::Devops, techs(&["Docker Compose"])),
                (TechCategory::Testing, techs(&["Jest"])),
                (TechCategory::Other, techs(&["Prisma"])),
            ]
        );
    }

    #[test]
    fn test_first_matching_category_wins() {
        // "JavaScript" contains "Java"; "Google Cloud" contains "Go".
        assert_eq!(categorize("JavaScript"), TechCategory::Languages);
        assert_eq!(categorize("Google Cloud"), TechCategory::Languages);
        assert_eq!(categorize("Node.js"), TechCategory::Backend);
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        assert_eq!(categorize("react"), TechCategory::Other);
    }

    #[test]
    fn test_empty_input_has_no_groups() {
        assert!(categorize_technologies(&[]).is_empty());
    }

    #[test]
    fn test_fit_label_thresholds() {
        assert_eq!(FitLabel::for_score(10).feedback(), "Excellent fit!");
        assert_eq!(FitLabel::for_score(8), FitLabel::Excellent);
        assert_eq!(FitLabel::for_score(7), FitLabel::Good);
        assert_eq!(FitLabel::for_score(6), FitLabel::Good);
        assert_eq!(FitLabel::for_score(5), FitLabel::Moderate);
        assert_eq!(FitLabel::for_score(4), FitLabel::Moderate);
        assert_eq!(FitLabel::for_score(3).feedback(), "Could use improvement");
        assert_eq!(FitLabel::for_score(0), FitLabel::NeedsImprovement);
    }

    #[test]
    fn test_report_lists_every_company() {
        let report = AnalysisReport::build(
            "https://github.com/octo/cat",
            AnalysisResult::fallback(),
        );
        assert_eq!(report.repo_name, "octo/cat");
        assert_eq!(report.fit.len(), Company::ALL.len());
        assert!(report.fit.iter().all(|f| f.label == FitLabel::Moderate));
        assert_eq!(report.tech_stack[0].category, TechCategory::Other);
    }

    #[test]
    fn test_export_file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(export_file_name(date), "devlens-analysis-2024-03-09.json");
    }
}
