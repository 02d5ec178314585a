//! Heuristic assessment built from the Match Scorer.
//!
//! Maps a `MatchResult` into the full `AiAssessment` shape so consumers can't
//! tell which path produced a record, apart from `assessed_by`.

use crate::assessment::models::{AiAssessment, AssessmentSource, Recommendation};
use crate::matching::scorer::{normalize_skill, score, MatchInput};
use crate::models::application::ResumeData;
use crate::models::job::JobRow;

const QUALIFICATION_MATCH: u32 = 75;
const CULTURE_FIT: u32 = 75;
const GROWTH_POTENTIAL: u32 = 80;
const DEFAULT_EXPERIENCE_LEVEL: &str = "Mid";

/// Builds an assessment from the deterministic scorer. Never fails.
pub fn heuristic_assessment(resume: &ResumeData, job: &JobRow) -> AiAssessment {
    let candidate_text = resume.free_text();
    let result = score(&MatchInput {
        candidate_skills: &resume.skills,
        job_skills: &job.skills,
        candidate_text: &candidate_text,
        job_text: &job.description,
    });

    let matched_normalized: Vec<String> = result
        .matched_skills
        .iter()
        .map(|s| normalize_skill(s))
        .collect();
    let missing_skills: Vec<String> = job
        .skills
        .iter()
        .filter(|s| !s.trim().is_empty())
        .filter(|s| !matched_normalized.contains(&normalize_skill(s)))
        .cloned()
        .collect();

    let skills_match = skills_match_percentage(result.matched_skills.len(), &job.skills);
    let matched_count = result.matched_skills.len();

    AiAssessment {
        overall_score: result.score,
        skills_match,
        experience_match: experience_match(resume.seniority_level.as_deref()),
        qualification_match: QUALIFICATION_MATCH,
        recommendation: Recommendation::from_score(result.score),
        recommendation_reason: format!(
            "Candidate shows {skills_match}% skills match with {matched_count} relevant skills."
        ),
        key_strengths: result.matched_skills.iter().take(3).cloned().collect(),
        concerns: missing_skills.iter().take(2).cloned().collect(),
        summary: format!(
            "Candidate has relevant experience and {matched_count} matching skills for this {} position.",
            job.title
        ),
        matched_skills: result.matched_skills,
        missing_skills,
        experience_level: resume
            .seniority_level
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(DEFAULT_EXPERIENCE_LEVEL)
            .to_string(),
        culture_fit: CULTURE_FIT,
        growth_potential: GROWTH_POTENTIAL,
        assessed_by: AssessmentSource::Heuristic,
    }
}

fn skills_match_percentage(matched: usize, job_skills: &[String]) -> u32 {
    let total = job_skills.iter().filter(|s| !s.trim().is_empty()).count();
    if total == 0 {
        return 0;
    }
    ((matched as f64 / total as f64) * 100.0).round() as u32
}

/// Senior and lead → 85, mid → 70, anything else → 50.
///
/// Compared case-insensitively after trimming, so "senior", "LEAD" and " Mid "
/// all count. A case-sensitive check on exactly "Senior"/"Mid" would give 50
/// for those and for "Lead".
fn experience_match(seniority: Option<&str>) -> u32 {
    match seniority.map(|s| s.trim().to_lowercase()).as_deref() {
        Some("senior") | Some("lead") => 85,
        Some("mid") => 70,
        _ => 50,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job::sample_job;

    fn resume(skills: &[&str], summary: &str, seniority: Option<&str>) -> ResumeData {
        ResumeData {
            skills: skills.iter().map(|s| s.to_string()).collect(),
            experience_summary: Some(summary.to_string()),
            seniority_level: seniority.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_overall_score_is_scorer_output() {
        let job = sample_job(&["React", "Node.js"], "Build our web platform");
        let assessment = heuristic_assessment(&resume(&["react", "node.js"], "", None), &job);
        assert_eq!(assessment.overall_score, 80);
        assert_eq!(assessment.skills_match, 100);
        assert_eq!(assessment.recommendation, Recommendation::HighlyRecommended);
        assert_eq!(assessment.assessed_by, AssessmentSource::Heuristic);
    }

    #[test]
    fn test_recommendation_follows_threshold_of_score() {
        let job = sample_job(&["Rust", "Go", "Kafka", "SQL"], "Platform team");
        for (skills, expected) in [
            (vec!["Rust", "Go", "Kafka", "SQL"], Recommendation::HighlyRecommended),
            (vec!["Rust", "Go", "Kafka"], Recommendation::Consider),
            (vec!["Rust"], Recommendation::NotRecommended),
        ] {
            let assessment = heuristic_assessment(&resume(&skills, "", None), &job);
            assert_eq!(
                assessment.recommendation,
                Recommendation::from_score(assessment.overall_score)
            );
            assert_eq!(assessment.recommendation, expected);
        }
    }

    #[test]
    fn test_missing_skills_and_concerns() {
        let job = sample_job(&["Rust", "Go", "Kafka", "SQL"], "Platform team");
        let assessment = heuristic_assessment(&resume(&["Go"], "", None), &job);
        assert_eq!(assessment.matched_skills, vec!["Go".to_string()]);
        assert_eq!(
            assessment.missing_skills,
            vec!["Rust".to_string(), "Kafka".to_string(), "SQL".to_string()]
        );
        assert_eq!(assessment.concerns, vec!["Rust".to_string(), "Kafka".to_string()]);
        assert_eq!(assessment.key_strengths, vec!["Go".to_string()]);
        assert_eq!(assessment.skills_match, 25);
    }

    #[test]
    fn test_summary_text_mentions_title_and_count() {
        let job = sample_job(&["Rust"], "Systems");
        let assessment = heuristic_assessment(&resume(&["Rust"], "", None), &job);
        assert_eq!(
            assessment.summary,
            "Candidate has relevant experience and 1 matching skills for this Backend Engineer position."
        );
        assert_eq!(
            assessment.recommendation_reason,
            "Candidate shows 100% skills match with 1 relevant skills."
        );
    }

    #[test]
    fn test_experience_match_from_seniority() {
        assert_eq!(experience_match(Some("Senior")), 85);
        assert_eq!(experience_match(Some("lead")), 85);
        assert_eq!(experience_match(Some("Mid")), 70);
        assert_eq!(experience_match(Some(" LEAD ")), 85);
        assert_eq!(experience_match(Some("mid")), 70);
        assert_eq!(experience_match(Some("Junior")), 50);
        assert_eq!(experience_match(None), 50);
    }

    #[test]
    fn test_experience_level_defaults_to_mid() {
        let job = sample_job(&["Rust"], "Systems");
        let assessment = heuristic_assessment(&resume(&[], "", None), &job);
        assert_eq!(assessment.experience_level, "Mid");

        let assessment = heuristic_assessment(&resume(&[], "", Some("Senior")), &job);
        assert_eq!(assessment.experience_level, "Senior");
    }

    #[test]
    fn test_seniority_level_feeds_bonus() {
        let job = sample_job(&["Rust"], "Senior Rust engineer wanted");
        let assessment = heuristic_assessment(&resume(&["Rust"], "", Some("Senior")), &job);
        assert_eq!(assessment.overall_score, 90);
    }

    #[test]
    fn test_job_without_skills() {
        let job = sample_job(&[], "Generalist");
        let assessment = heuristic_assessment(&resume(&["Rust"], "", None), &job);
        assert_eq!(assessment.overall_score, 0);
        assert_eq!(assessment.skills_match, 0);
        assert!(assessment.missing_skills.is_empty());
        assert_eq!(assessment.recommendation, Recommendation::NotRecommended);
        assert!(assessment.validate().is_ok());
    }
}
