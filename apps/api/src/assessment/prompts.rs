// LLM prompt constants for candidate assessment.
// Reuses the JSON-only fragment from llm_client::prompts.

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::models::application::ResumeData;
use crate::models::job::JobRow;

pub const ASSESSMENT_SYSTEM: &str = JSON_ONLY_SYSTEM;

/// Assessment prompt template. Every `{placeholder}` is replaced before sending.
pub const ASSESSMENT_PROMPT_TEMPLATE: &str = r#"You are an expert recruiter. Analyze this candidate's resume against the job requirements and provide a comprehensive assessment.

CANDIDATE RESUME DATA:
Name: {name}
Skills: {skills}
Experience: {experience_summary}
Education: {education}
Years of Experience: {years}
Seniority Level: {seniority}

JOB REQUIREMENTS:
Title: {title}
Company: {company}
Required Skills: {job_skills}
Job Description: {description}
Requirements: {requirements}

Return a JSON object with this EXACT schema (no extra fields). All scores are integers from 0 to 100.
{
  "overallScore": 85,
  "skillsMatch": 80,
  "experienceMatch": 90,
  "qualificationMatch": 75,
  "recommendation": "Highly Recommended",
  "recommendationReason": "Brief explanation for the recommendation",
  "keyStrengths": ["Candidate strengths relevant to this role"],
  "concerns": ["Potential concerns or gaps"],
  "summary": "2-3 sentence summary of the candidate's fit for this role",
  "matchedSkills": ["Skills shared by candidate and job"],
  "missingSkills": ["Important skills the candidate lacks"],
  "experienceLevel": "Assessment of the candidate's experience level for this role",
  "cultureFit": 80,
  "growthPotential": 85
}

"recommendation" MUST be one of: "Highly Recommended", "Recommended", "Consider", "Not Recommended".
Be thorough and fair."#;

/// Fills the assessment template from a resume and a job.
pub fn build_assessment_prompt(resume: &ResumeData, job: &JobRow) -> String {
    let education = resume
        .education
        .iter()
        .map(|e| {
            format!(
                "{} from {}",
                e.degree.as_deref().unwrap_or("Degree"),
                e.institution.as_deref().unwrap_or("Unknown institution")
            )
        })
        .collect::<Vec<_>>();

    ASSESSMENT_PROMPT_TEMPLATE
        .replace("{name}", resume.candidate_name().unwrap_or("Unknown"))
        .replace("{skills}", &join_or(&resume.skills, "None listed"))
        .replace(
            "{experience_summary}",
            resume
                .experience_summary
                .as_deref()
                .unwrap_or("No experience summary"),
        )
        .replace("{education}", &join_or(&education, "No education info"))
        .replace(
            "{years}",
            &resume
                .years_of_experience
                .map(|y| y.to_string())
                .unwrap_or_else(|| "Unknown".to_string()),
        )
        .replace(
            "{seniority}",
            resume.seniority_level.as_deref().unwrap_or("Unknown"),
        )
        .replace("{title}", &job.title)
        .replace("{company}", job.company_or_default())
        .replace("{job_skills}", &join_or(&job.skills, "None specified"))
        .replace("{description}", &job.description)
        .replace("{requirements}", &job.requirements)
}

fn join_or(items: &[String], empty: &str) -> String {
    if items.is_empty() {
        empty.to_string()
    } else {
        items.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::application::EducationItem;
    use crate::models::job::sample_job;

    #[test]
    fn test_prompt_fills_every_placeholder() {
        let resume = ResumeData {
            skills: vec!["Rust".to_string(), "Go".to_string()],
            education: vec![EducationItem {
                institution: Some("MIT".to_string()),
                degree: Some("BSc".to_string()),
                year: None,
            }],
            years_of_experience: Some(6.0),
            ..Default::default()
        };
        let job = sample_job(&["Rust"], "Own the ingestion pipeline");
        let prompt = build_assessment_prompt(&resume, &job);

        assert!(prompt.contains("Skills: Rust, Go"));
        assert!(prompt.contains("Education: BSc from MIT"));
        assert!(prompt.contains("Years of Experience: 6"));
        assert!(prompt.contains("Name: Unknown"));
        assert!(prompt.contains("Company: Acme"));
        assert!(prompt.contains("Job Description: Own the ingestion pipeline"));
        for placeholder in [
            "{name}",
            "{skills}",
            "{experience_summary}",
            "{education}",
            "{years}",
            "{seniority}",
            "{title}",
            "{company}",
            "{job_skills}",
            "{description}",
            "{requirements}",
        ] {
            assert!(!prompt.contains(placeholder), "unfilled {placeholder}");
        }
    }

    #[test]
    fn test_prompt_uses_fallback_labels() {
        let job = sample_job(&[], "desc");
        let prompt = build_assessment_prompt(&ResumeData::default(), &job);
        assert!(prompt.contains("Skills: None listed"));
        assert!(prompt.contains("Required Skills: None specified"));
        assert!(prompt.contains("Seniority Level: Unknown"));
    }
}
