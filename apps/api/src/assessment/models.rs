use serde::{Deserialize, Serialize};

/// Recommendation tier. Serialized with the human-readable labels stored on
/// applications and returned by the AI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "Highly Recommended")]
    HighlyRecommended,
    #[serde(rename = "Recommended")]
    Recommended,
    #[serde(rename = "Consider")]
    Consider,
    #[serde(rename = "Not Recommended")]
    NotRecommended,
}

impl Recommendation {
    /// Fixed thresholds: ≥80, ≥65, ≥50, else not recommended.
    pub fn from_score(score: u32) -> Self {
        if score >= 80 {
            Recommendation::HighlyRecommended
        } else if score >= 65 {
            Recommendation::Recommended
        } else if score >= 50 {
            Recommendation::Consider
        } else {
            Recommendation::NotRecommended
        }
    }
}

/// Which path produced an assessment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssessmentSource {
    #[default]
    Ai,
    Heuristic,
}

/// Candidate-vs-job assessment. Identical shape on the AI and fallback paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiAssessment {
    pub overall_score: u32,
    pub skills_match: u32,
    pub experience_match: u32,
    pub qualification_match: u32,
    pub recommendation: Recommendation,
    pub recommendation_reason: String,
    #[serde(default)]
    pub key_strengths: Vec<String>,
    #[serde(default)]
    pub concerns: Vec<String>,
    pub summary: String,
    #[serde(default)]
    pub matched_skills: Vec<String>,
    #[serde(default)]
    pub missing_skills: Vec<String>,
    pub experience_level: String,
    pub culture_fit: u32,
    pub growth_potential: u32,
    #[serde(default)]
    pub assessed_by: AssessmentSource,
}

impl AiAssessment {
    /// Checks that every score is a percentage. Returns the first offending field.
    pub fn validate(&self) -> Result<(), String> {
        let scores = [
            ("overallScore", self.overall_score),
            ("skillsMatch", self.skills_match),
            ("experienceMatch", self.experience_match),
            ("qualificationMatch", self.qualification_match),
            ("cultureFit", self.culture_fit),
            ("growthPotential", self.growth_potential),
        ];
        for (field, value) in scores {
            if value > 100 {
                return Err(format!("{field} out of range: {value}"));
            }
        }
        Ok(())
    }
}
