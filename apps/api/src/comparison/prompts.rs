// Comparison LLM prompt templates.

use crate::llm_client::prompts::{RECRUITER_PERSONA, STRICT_SCHEMA_INSTRUCTION};

/// Used when no job description has been provided.
pub const GENERIC_ROLE: &str = "A general professional role.";

pub const COMPARISON_PROMPT_TEMPLATE: &str = r#"{persona} I have provided you with JSON data for {count} candidates. Your task is to perform a comparative analysis of these candidates for a specific job role.

Job Description:
---
{job_description}
---

Candidate Data:
---
{candidate_data}
---

Based on the job description and the candidate data, provide a detailed comparison. Identify the best-fit candidate, explain your reasoning, and list the key strengths and weaknesses for each candidate. Refer to each candidate by the exact candidateName given in the data.

{strict}"#;

pub fn build_comparison_prompt(job_description: &str, count: usize, candidate_data: &str) -> String {
    let job_description = match job_description.trim() {
        "" => GENERIC_ROLE,
        jd => jd,
    };

    COMPARISON_PROMPT_TEMPLATE
        .replace("{persona}", RECRUITER_PERSONA)
        .replace("{count}", &count.to_string())
        .replace("{job_description}", job_description)
        .replace("{candidate_data}", candidate_data)
        .replace("{strict}", STRICT_SCHEMA_INSTRUCTION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_job_description_uses_generic_role() {
        let prompt = build_comparison_prompt("   ", 2, "[]");
        assert!(prompt.contains("---\nA general professional role.\n---"));
    }

    #[test]
    fn test_prompt_embeds_count_and_data() {
        let prompt = build_comparison_prompt("Data engineer", 3, "[{\"candidateName\":\"A\"}]");
        assert!(prompt.contains("JSON data for 3 candidates"));
        assert!(prompt.contains("Data engineer"));
        assert!(prompt.contains("[{\"candidateName\":\"A\"}]"));
    }
}
