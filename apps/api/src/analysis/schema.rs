use serde_json::{json, Value};

/// Response schema for a single résumé analysis, in the Gemini
/// `responseSchema` dialect.
pub fn analysis_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "candidateName": {
                "type": "STRING",
                "description": "The full name of the candidate."
            },
            "email": {
                "type": "STRING",
                "description": "The candidate's primary email address, if available."
            },
            "phone": {
                "type": "STRING",
                "description": "The candidate's primary phone number, if available."
            },
            "keySkills": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "A list of the candidate's most important technical and soft skills. Maximum 10 skills."
            },
            "education": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "degree": {
                            "type": "STRING",
                            "description": "The degree obtained, e.g., 'Bachelor of Science in Computer Science'."
                        },
                        "institution": {
                            "type": "STRING",
                            "description": "The name of the university or institution."
                        },
                        "year": {
                            "type": "STRING",
                            "description": "The year of graduation or completion, e.g., '2020'."
                        }
                    },
                    "required": ["degree", "institution"]
                },
                "description": "A list of the candidate's educational qualifications."
            },
            "totalExperience": {
                "type": "STRING",
                "description": "A concise summary of the candidate's total years of professional experience, e.g., '8+ years'."
            },
            "suitableJobRoles": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "A list of 3-5 job roles the candidate would be a good fit for."
            },
            "jobFitScore": {
                "type": "NUMBER",
                "description": "A score from 1 to 10 indicating the overall suitability and strength of the candidate's profile. 1 is low, 10 is excellent."
            },
            "jobFitScoreReason": {
                "type": "STRING",
                "description": "A brief, one-sentence explanation for the job fit score, highlighting the main reasons."
            }
        },
        "required": [
            "candidateName",
            "keySkills",
            "education",
            "totalExperience",
            "suitableJobRoles",
            "jobFitScore",
            "jobFitScoreReason"
        ]
    })
}
