//! Filter criteria and sort modes for the visible candidate list.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::models::AnalysisResult;

/// Three independent, conjunctive criteria. A zero or empty criterion is inactive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterCriteria {
    /// Inclusive minimum job fit score.
    pub min_score: f64,
    /// Inclusive minimum years, via the lossy experience extraction.
    pub min_experience: f64,
    /// Case-insensitive substring matched against each key skill.
    pub skill: String,
}

impl FilterCriteria {
    pub fn is_active(&self) -> bool {
        self.min_score > 0.0 || self.min_experience > 0.0 || !self.skill.is_empty()
    }

    pub fn matches(&self, result: &AnalysisResult) -> bool {
        let score_ok = self.min_score <= 0.0 || result.job_fit_score() >= self.min_score;
        let experience_ok =
            self.min_experience <= 0.0 || result.experience_years() >= self.min_experience;
        let skill_ok = self.skill.is_empty() || !self.matching_skills(result).is_empty();
        score_ok && experience_ok && skill_ok
    }

    /// Key skills that contain the skill filter, in the candidate's order.
    /// Empty when the skill filter is inactive.
    pub fn matching_skills<'a>(&self, result: &'a AnalysisResult) -> Vec<&'a str> {
        if self.skill.is_empty() {
            return Vec::new();
        }
        let needle = self.skill.to_lowercase();
        result
            .profile
            .key_skills
            .iter()
            .filter(|s| s.to_lowercase().contains(&needle))
            .map(String::as_str)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    /// Upload order.
    #[default]
    None,
    /// Job fit score, highest first.
    Score,
    /// Parsed years of experience, highest first.
    Experience,
}

/// Sorts in place. Stable: equal keys keep their sequence order.
pub fn sort_results(results: &mut [&AnalysisResult], mode: SortMode) {
    match mode {
        SortMode::None => {}
        SortMode::Score => results.sort_by(|a, b| descending(a.job_fit_score(), b.job_fit_score())),
        SortMode::Experience => {
            results.sort_by(|a, b| descending(a.experience_years(), b.experience_years()))
        }
    }
}

/// Unordered values (NaN) compare equal so they keep their position.
fn descending(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}
