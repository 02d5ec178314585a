// LLM prompt constants for resume analysis.

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;

pub const RESUME_SYSTEM: &str = JSON_ONLY_SYSTEM;

/// Resume extraction template. `{resume_text}` is replaced before sending.
pub const RESUME_ANALYSIS_PROMPT_TEMPLATE: &str = r#"You are an expert resume parser. Analyze the following resume text and extract structured information.

RESUME TEXT:
{resume_text}

Return a JSON object with this EXACT schema:
{
  "personalInfo": {
    "name": "Full name",
    "email": "Email address",
    "phone": "Phone number",
    "location": "Location/Address"
  },
  "skills": ["Technical and soft skills"],
  "experience": [
    {
      "company": "Company name",
      "position": "Job title",
      "duration": "Employment duration",
      "description": "Job description and achievements"
    }
  ],
  "education": [
    {
      "institution": "School/University name",
      "degree": "Degree type and field",
      "year": "Graduation year or duration"
    }
  ],
  "experienceSummary": "Brief summary of overall experience",
  "yearsOfExperience": 5,
  "seniorityLevel": "Junior"
}

"yearsOfExperience" is a number of years of professional experience.
"seniorityLevel" MUST be one of: "Junior", "Mid", "Senior".
If information is not available, use null or empty arrays."#;

pub fn build_resume_prompt(resume_text: &str) -> String {
    RESUME_ANALYSIS_PROMPT_TEMPLATE.replace("{resume_text}", resume_text.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resume_text_is_inlined() {
        let prompt = build_resume_prompt("  Ada Lovelace\nAnalytical engines  ");
        assert!(prompt.contains("RESUME TEXT:\nAda Lovelace\nAnalytical engines\n"));
        assert!(!prompt.contains("{resume_text}"));
    }
}
