// Analysis LLM prompt templates.

use crate::llm_client::prompts::{RECRUITER_PERSONA, STRICT_SCHEMA_INSTRUCTION};

pub const ANALYSIS_TASK: &str = "\
Analyze the following resume file and extract the specified information.";

pub const JOB_CONTEXT_TEMPLATE: &str = "\
Your analysis MUST be performed in the context of the following job description. \
The 'jobFitScore' must reflect how well the candidate matches this specific job description. \
'suitableJobRoles' should be roles similar to the one described that the candidate might also be a good fit for.

Job Description:
---
{job_description}
---";

pub const GENERAL_SCORE_INSTRUCTION: &str = "\
The 'jobFitScore' should be a general assessment of the candidate's profile strength \
based on their experience and skills.";

/// Builds the analysis instruction. A blank job description means a
/// context-free score.
pub fn build_analysis_prompt(job_description: Option<&str>) -> String {
    let context = match job_description.map(str::trim).filter(|jd| !jd.is_empty()) {
        Some(jd) => JOB_CONTEXT_TEMPLATE.replace("{job_description}", jd),
        None => GENERAL_SCORE_INSTRUCTION.to_string(),
    };

    format!("{RECRUITER_PERSONA} {ANALYSIS_TASK} {STRICT_SCHEMA_INSTRUCTION}\n\n{context}")
}
