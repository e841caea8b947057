use serde::{Deserialize, Serialize};

/// The five companies every analysis is scored against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Company {
    Meta,
    Amazon,
    Apple,
    Netflix,
    Google,
}

impl Company {
    /// Canonical order, used for iteration and tie-breaking.
    pub const ALL: [Company; 5] = [
        Company::Meta,
        Company::Amazon,
        Company::Apple,
        Company::Netflix,
        Company::Google,
    ];

    /// JSON key used in `faangScores` and `suggestions`.
    pub fn key(self) -> &'static str {
        match self {
            Company::Meta => "meta",
            Company::Amazon => "amazon",
            Company::Apple => "apple",
            Company::Netflix => "netflix",
            Company::Google => "google",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Company::Meta => "Meta",
            Company::Amazon => "Amazon",
            Company::Apple => "Apple",
            Company::Netflix => "Netflix",
            Company::Google => "Google",
        }
    }
}

/// Fit score per company, 0–10. All five keys are always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyScores {
    pub meta: u8,
    pub amazon: u8,
    pub apple: u8,
    pub netflix: u8,
    pub google: u8,
}

impl CompanyScores {
    pub fn uniform(score: u8) -> Self {
        Self {
            meta: score,
            amazon: score,
            apple: score,
            netflix: score,
            google: score,
        }
    }

    pub fn get(&self, company: Company) -> u8 {
        match company {
            Company::Meta => self.meta,
            Company::Amazon => self.amazon,
            Company::Apple => self.apple,
            Company::Netflix => self.netflix,
            Company::Google => self.google,
        }
    }

    pub fn set(&mut self, company: Company, score: u8) {
        let slot = match company {
            Company::Meta => &mut self.meta,
            Company::Amazon => &mut self.amazon,
            Company::Apple => &mut self.apple,
            Company::Netflix => &mut self.netflix,
            Company::Google => &mut self.google,
        };
        *slot = score;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Company, u8)> + '_ {
        Company::ALL.into_iter().map(move |c| (c, self.get(c)))
    }

    /// Highest-scoring company. Ties go to the earlier company in `Company::ALL`.
    pub fn top(&self) -> (Company, u8) {
        self.iter()
            .fold((Company::Meta, self.meta), |best, (company, score)| {
                if score > best.1 {
                    (company, score)
                } else {
                    best
                }
            })
    }
}

/// Improvement suggestions per company.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanySuggestions {
    pub meta: Vec<String>,
    pub amazon: Vec<String>,
    pub apple: Vec<String>,
    pub netflix: Vec<String>,
    pub google: Vec<String>,
}

impl CompanySuggestions {
    pub fn set(&mut self, company: Company, items: Vec<String>) {
        let slot = match company {
            Company::Meta => &mut self.meta,
            Company::Amazon => &mut self.amazon,
            Company::Apple => &mut self.apple,
            Company::Netflix => &mut self.netflix,
            Company::Google => &mut self.google,
        };
        *slot = items;
    }
}

/// Structured result of one repository analysis.
/// Field names on the wire match the JSON shape requested from the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub summary: String,
    pub technologies: Vec<String>,
    pub faang_scores: CompanyScores,
    pub suggestions: CompanySuggestions,
    pub resume_snippet: String,
}

pub const FALLBACK_SCORE: u8 = 5;

impl AnalysisResult {
    /// Neutral placeholder returned when the model's text cannot be parsed.
    pub fn fallback() -> Self {
        let one = |s: &str| vec![s.to_string()];
        Self {
            summary: "Failed to parse API response. This is a fallback response.".to_string(),
            technologies: one("Unknown"),
            faang_scores: CompanyScores::uniform(FALLBACK_SCORE),
            suggestions: CompanySuggestions {
                meta: one("Improve React component structure"),
                amazon: one("Implement microservices"),
                apple: one("Enhance UI/UX"),
                netflix: one("Improve data handling"),
                google: one("Improve testing coverage"),
            },
            resume_snippet: "A project that demonstrates web development practices.".to_string(),
        }
    }
}
