// Shared prompt constants.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// Persona used by both the analysis and comparison instructions.
pub const RECRUITER_PERSONA: &str = "You are an expert AI HR Recruiter.";

/// Appended to every instruction. The response schema is also sent as
/// `responseSchema`, but the model is told explicitly as well.
pub const STRICT_SCHEMA_INSTRUCTION: &str = "\
    Your output MUST be in a structured JSON format that strictly adheres to the provided schema. \
    Do not include any text outside of the JSON object.";
