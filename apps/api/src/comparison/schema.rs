use serde_json::{json, Value};

/// Response schema for a cross-candidate comparison, in the Gemini
/// `responseSchema` dialect.
pub fn comparison_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "bestFitCandidateName": {
                "type": "STRING",
                "description": "The full name of the candidate who is the best fit for the job."
            },
            "recommendationReason": {
                "type": "STRING",
                "description": "A detailed, multi-sentence paragraph explaining why the recommended candidate is the best fit, comparing them against the others."
            },
            "candidateComparison": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "candidateName": { "type": "STRING" },
                        "strengths": {
                            "type": "ARRAY",
                            "items": { "type": "STRING" },
                            "description": "A list of 2-3 key strengths for this candidate relevant to the job description."
                        },
                        "weaknesses": {
                            "type": "ARRAY",
                            "items": { "type": "STRING" },
                            "description": "A list of 1-2 potential weaknesses or areas for improvement for this candidate."
                        }
                    },
                    "required": ["candidateName", "strengths", "weaknesses"]
                }
            }
        },
        "required": ["bestFitCandidateName", "recommendationReason", "candidateComparison"]
    })
}
