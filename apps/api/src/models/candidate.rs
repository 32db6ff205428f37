use serde::{Deserialize, Deserializer, Serialize};

/// One educational qualification as extracted from a résumé.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub degree: String,
    pub institution: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
}

/// The extracted candidate data without the local identifier.
///
/// This is what the remote model returns for an analysis, and what gets sent
/// back to it for a comparison. The id never leaves the process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateProfile {
    pub candidate_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub key_skills: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub education: Vec<Education>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_experience: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub suitable_job_roles: Vec<String>,
    /// Nominally 1–10. Out-of-range values are kept as returned.
    pub job_fit_score: f64,
    pub job_fit_score_reason: String,
}

/// Models sometimes answer `null` for a field they found nothing for.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One analyzed candidate held in the session collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Locally allocated, unique within the collection.
    pub id: String,
    #[serde(flatten)]
    pub profile: CandidateProfile,
}

impl AnalysisResult {
    pub fn new(id: String, profile: CandidateProfile) -> Self {
        Self { id, profile }
    }

    pub fn candidate_name(&self) -> &str {
        &self.profile.candidate_name
    }

    pub fn job_fit_score(&self) -> f64 {
        self.profile.job_fit_score
    }

    /// Years of experience parsed from the free-text `totalExperience` field.
    pub fn experience_years(&self) -> f64 {
        parse_experience_years(&self.profile.total_experience)
    }

    pub fn score_tier(&self) -> ScoreTier {
        ScoreTier::from_score(self.profile.job_fit_score)
    }
}

/// Lossy text-to-number extraction: the first integer or decimal substring,
/// or 0 when the text carries no digits.
///
/// `"8+ years"` → 8, `"Less than 1 year"` → 1, `"3.5 yrs"` → 3.5.
pub fn parse_experience_years(experience: &str) -> f64 {
    let Some(start) = experience.find(|c: char| c.is_ascii_digit()) else {
        return 0.0;
    };
    let rest = &experience[start..];

    let int_len = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let mut end = int_len;

    // Optional fractional part: a dot followed by zero or more digits.
    if rest[int_len..].starts_with('.') {
        let frac = &rest[int_len + 1..];
        let frac_len = frac
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(frac.len());
        end = int_len + 1 + frac_len;
    }

    rest[..end]
        .trim_end_matches('.')
        .parse::<f64>()
        .unwrap_or(0.0)
}

/// Display band for a job fit score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreTier {
    Strong,
    Moderate,
    Weak,
}

impl ScoreTier {
    pub fn from_score(score: f64) -> Self {
        if score >= 8.0 {
            ScoreTier::Strong
        } else if score >= 5.0 {
            ScoreTier::Moderate
        } else {
            ScoreTier::Weak
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_experience_plus_suffix() {
        assert_eq!(parse_experience_years("8+ years"), 8.0);
    }

    #[test]
    fn test_experience_leading_words() {
        assert_eq!(parse_experience_years("Less than 1 year"), 1.0);
    }

    #[test]
    fn test_experience_empty_and_no_digits() {
        assert_eq!(parse_experience_years(""), 0.0);
        assert_eq!(parse_experience_years("several years"), 0.0);
    }

    #[test]
    fn test_experience_decimal() {
        assert_eq!(parse_experience_years("approx. 3.5 years"), 3.5);
    }

    #[test]
    fn test_experience_takes_first_number_only() {
        assert_eq!(parse_experience_years("10 years (2 as lead)"), 10.0);
    }

    #[test]
    fn test_experience_trailing_dot_is_not_fractional() {
        assert_eq!(parse_experience_years("Over 5. Mostly backend"), 5.0);
    }

    #[test]
    fn test_null_list_and_text_fields_deserialize_as_empty() {
        let profile: CandidateProfile = serde_json::from_value(serde_json::json!({
            "candidateName": "Jane Doe",
            "keySkills": ["Rust"],
            "education": null,
            "totalExperience": null,
            "suitableJobRoles": null,
            "jobFitScore": 6.0,
            "jobFitScoreReason": "Fine."
        }))
        .unwrap();

        assert!(profile.education.is_empty());
        assert_eq!(profile.total_experience, "");
        assert!(profile.suitable_job_roles.is_empty());
    }

    #[test]
    fn test_score_tier_bands() {
        assert_eq!(ScoreTier::from_score(9.1), ScoreTier::Strong);
        assert_eq!(ScoreTier::from_score(8.0), ScoreTier::Strong);
        assert_eq!(ScoreTier::from_score(5.0), ScoreTier::Moderate);
        assert_eq!(ScoreTier::from_score(4.9), ScoreTier::Weak);
    }

    #[test]
    fn test_analysis_result_serializes_flat_camel_case() {
        let result = AnalysisResult::new(
            "abc".to_string(),
            CandidateProfile {
                candidate_name: "Ada Lovelace".to_string(),
                email: None,
                phone: Some("555-0100".to_string()),
                key_skills: vec!["Mathematics".to_string()],
                education: vec![],
                total_experience: "10 years".to_string(),
                suitable_job_roles: vec!["Analyst".to_string()],
                job_fit_score: 9.0,
                job_fit_score_reason: "Pioneer.".to_string(),
            },
        );

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["id"], "abc");
        assert_eq!(value["candidateName"], "Ada Lovelace");
        assert_eq!(value["jobFitScore"], 9.0);
        assert_eq!(value["phone"], "555-0100");
        assert!(value.get("email").is_none());
    }
}
