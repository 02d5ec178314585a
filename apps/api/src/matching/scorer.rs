//! Match Scorer — deterministic, explainable skill/experience match between one
//! candidate and one job.
//!
//! Used directly by batch match generation and as the fallback behind the AI
//! assessment path. Pure function of its inputs: no I/O, no clock, no randomness.
//!
//! Algorithm:
//! 1. Normalize skill labels (trim + lower-case) on both sides.
//! 2. Exact match: normalized job skill present in the candidate's skill list.
//! 3. Partial match: remaining job skills found as a substring of the candidate's
//!    lower-cased free text.
//! 4. base = exact/total × 0.8 × 100 + partial/total × 0.3 × 100
//! 5. +10 when job text and candidate text share a seniority keyword.
//! 6. score = clamp(round(base + bonus), 0, 100)
//!
//! Known limitation: partial matching is plain substring containment, so "Java"
//! is matched by a resume that only mentions "JavaScript".
//! Blank job skill labels are skipped, not counted: `["", "Rust"]` against an
//! exact "Rust" scores 80, not 40.

use serde::{Deserialize, Serialize};

/// Weight of a job skill listed verbatim in the candidate's skills.
pub const EXACT_MATCH_WEIGHT: f64 = 0.8;
/// Weight of a job skill only mentioned in the candidate's free text.
pub const PARTIAL_MATCH_WEIGHT: f64 = 0.3;
/// Flat bonus when both texts share a seniority keyword.
pub const SENIORITY_BONUS: f64 = 10.0;
/// Lower-case keywords checked by substring in both texts for the seniority bonus.
pub const SENIORITY_KEYWORDS: [&str; 5] = ["senior", "lead", "manager", "architect", "principal"];

pub const MAX_SCORE: u32 = 100;

/// Everything the scorer reads for one (candidate, job) pair.
#[derive(Debug, Clone, Copy)]
pub struct MatchInput<'a> {
    pub candidate_skills: &'a [String],
    pub job_skills: &'a [String],
    /// Resume body or a synthesized candidate summary.
    pub candidate_text: &'a str,
    /// Job description.
    pub job_text: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub score: u32, // 0 – 100
    /// Job skills in their original casing and listed order.
    pub matched_skills: Vec<String>,
}

impl MatchResult {
    fn empty() -> Self {
        Self {
            score: 0,
            matched_skills: vec![],
        }
    }
}

/// Normalized form of a skill label, used only for comparison.
pub fn normalize_skill(skill: &str) -> String {
    skill.trim().to_lowercase()
}

/// Trims labels, drops blanks and keeps the first spelling of each
/// normalized skill, in input order.
pub fn dedup_skills<S: AsRef<str>>(skills: &[S]) -> Vec<String> {
    let mut seen = Vec::<String>::new();
    let mut unique = Vec::new();
    for skill in skills.iter().map(|s| s.as_ref().trim()) {
        let normalized = normalize_skill(skill);
        if normalized.is_empty() || seen.contains(&normalized) {
            continue;
        }
        seen.push(normalized);
        unique.push(skill.to_string());
    }
    unique
}

/// Scores one candidate against one job.
///
/// Job skills that are blank after trimming are ignored. With no usable job
/// skills the result is a score of 0 with nothing matched.
pub fn score(input: &MatchInput<'_>) -> MatchResult {
    let job_skills: Vec<(&String, String)> = input
        .job_skills
        .iter()
        .map(|skill| (skill, normalize_skill(skill)))
        .filter(|(_, normalized)| !normalized.is_empty())
        .collect();

    if job_skills.is_empty() {
        return MatchResult::empty();
    }

    let candidate_skills: Vec<String> = input
        .candidate_skills
        .iter()
        .map(|s| normalize_skill(s))
        .collect();
    let candidate_text = input.candidate_text.to_lowercase();
    let job_text = input.job_text.to_lowercase();

    let exact: Vec<&str> = job_skills
        .iter()
        .map(|(_, normalized)| normalized.as_str())
        .filter(|skill| candidate_skills.iter().any(|c| c == skill))
        .collect();

    let partial: Vec<&str> = job_skills
        .iter()
        .map(|(_, normalized)| normalized.as_str())
        .filter(|skill| !exact.contains(skill) && candidate_text.contains(skill))
        .collect();

    let total = job_skills.len() as f64;
    let exact_score = (exact.len() as f64 / total) * EXACT_MATCH_WEIGHT * 100.0;
    let partial_score = (partial.len() as f64 / total) * PARTIAL_MATCH_WEIGHT * 100.0;

    let mut raw = exact_score + partial_score;
    if shares_seniority_keyword(&job_text, &candidate_text) {
        raw += SENIORITY_BONUS;
    }

    let score = finalize_score(raw);

    let matched_skills = job_skills
        .iter()
        .filter(|(_, normalized)| {
            exact.contains(&normalized.as_str()) || partial.contains(&normalized.as_str())
        })
        .map(|(original, _)| (*original).clone())
        .collect();

    MatchResult {
        score,
        matched_skills,
    }
}

/// Rounds to nearest and clamps to 0..=100. Clamping is applied last.
fn finalize_score(raw: f64) -> u32 {
    (raw.round() as i64).clamp(0, MAX_SCORE as i64) as u32
}

/// True when the same seniority keyword appears in both lower-cased texts.
fn shares_seniority_keyword(job_text: &str, candidate_text: &str) -> bool {
    SENIORITY_KEYWORDS
        .iter()
        .any(|kw| job_text.contains(kw) && candidate_text.contains(kw))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn skills(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn run(candidate: &[&str], job: &[&str], candidate_text: &str, job_text: &str) -> MatchResult {
        let candidate_skills = skills(candidate);
        let job_skills = skills(job);
        score(&MatchInput {
            candidate_skills: &candidate_skills,
            job_skills: &job_skills,
            candidate_text,
            job_text,
        })
    }

    #[test]
    fn test_full_exact_match_scores_80() {
        let result = run(
            &["React", "Node.js"],
            &["React", "Node.js"],
            "Built web apps",
            "We build web apps",
        );
        assert_eq!(result.score, 80);
        assert_eq!(result.matched_skills, skills(&["React", "Node.js"]));
    }

    #[test]
    fn test_partial_only_match_scores_30() {
        let result = run(
            &[],
            &["Python"],
            "Backend developer experienced in python scripting and automation",
            "Data tooling role",
        );
        assert_eq!(result.score, 30);
        assert_eq!(result.matched_skills, skills(&["Python"]));
    }

    #[test]
    fn test_no_match_scores_zero() {
        let result = run(&["Java"], &["Rust"], "Enterprise Java developer", "Systems role");
        assert_eq!(result.score, 0);
        assert!(result.matched_skills.is_empty());
    }

    #[test]
    fn test_seniority_bonus_tips_score_to_82() {
        // 9 of 10 exact → 72, plus the shared "senior" keyword → 82
        let job: Vec<String> = (0..10).map(|i| format!("skill{i}")).collect();
        let candidate: Vec<String> = job.iter().take(9).cloned().collect();
        let result = score(&MatchInput {
            candidate_skills: &candidate,
            job_skills: &job,
            candidate_text: "Senior engineer with a decade of experience",
            job_text: "We are hiring a senior engineer",
        });
        assert_eq!(result.score, 82);
        assert_eq!(result.matched_skills.len(), 9);
    }

    #[test]
    fn test_seniority_bonus_requires_both_sides() {
        let job_only = run(&["Go"], &["Go"], "Backend developer", "Lead backend developer");
        assert_eq!(job_only.score, 80);

        let candidate_only = run(&["Go"], &["Go"], "Lead backend developer", "Backend developer");
        assert_eq!(candidate_only.score, 80);

        let both = run(&["Go"], &["Go"], "Lead backend developer", "Lead backend developer");
        assert_eq!(both.score, 90);
    }

    #[test]
    fn test_seniority_bonus_requires_same_keyword() {
        let result = run(&["Go"], &["Go"], "Engineering manager", "Principal engineer");
        assert_eq!(result.score, 80);
    }

    #[test]
    fn test_full_exact_match_with_bonus_is_the_formula_ceiling() {
        let result = run(
            &["Rust", "Tokio"],
            &["Rust", "Tokio"],
            "Principal engineer: rust, tokio",
            "Principal engineer",
        );
        assert_eq!(result.score, 90);
    }

    #[test]
    fn test_raw_score_above_100_clamps_to_100() {
        assert_eq!(finalize_score(80.0 + 30.0 + SENIORITY_BONUS), 100);
        assert_eq!(finalize_score(100.4), 100);
        assert_eq!(finalize_score(-3.0), 0);
    }

    #[test]
    fn test_duplicate_job_skills_count_in_denominator() {
        let result = run(&["Rust"], &["Rust", "rust ", "Go"], "", "");
        // 2/3 × 80 = 53.3
        assert_eq!(result.score, 53);
        assert_eq!(result.matched_skills, skills(&["Rust", "rust "]));
    }

    #[test]
    fn test_empty_job_skills_returns_zero() {
        let result = run(&["Rust"], &[], "Senior Rust engineer", "Senior role");
        assert_eq!(result, MatchResult::empty());
    }

    #[test]
    fn test_blank_job_skills_are_ignored() {
        let result = run(&["Rust"], &["  ", "Rust"], "anything", "anything");
        assert_eq!(result.score, 80);
        assert_eq!(result.matched_skills, skills(&["Rust"]));
        assert_eq!(run(&["Rust"], &["", "Rust"], "", "").score, 80);

        let only_blank = run(&[], &[""], "anything at all", "");
        assert_eq!(only_blank, MatchResult::empty());
    }

    #[test]
    fn test_dedup_skills_is_unicode_case_insensitive() {
        let unique = dedup_skills(&[" Ärzte-CRM ", "ärzte-crm", "ΣQL", "σql", "", "Go"]);
        assert_eq!(unique, skills(&["Ärzte-CRM", "ΣQL", "Go"]));
    }

    #[test]
    fn test_normalization_is_case_and_whitespace_insensitive() {
        let result = run(&["  react "], &["React"], "", "");
        assert_eq!(result.score, 80);
        assert_eq!(result.matched_skills, skills(&["React"]));
    }

    #[test]
    fn test_matched_skills_keep_job_casing_and_order() {
        let result = run(
            &["typescript"],
            &["GraphQL", "TypeScript", "Docker"],
            "Shipped graphql gateways",
            "",
        );
        assert_eq!(result.matched_skills, skills(&["GraphQL", "TypeScript"]));
    }

    #[test]
    fn test_substring_false_positive_is_preserved() {
        let result = run(&[], &["Java", "JavaScript"], "Frontend javascript developer", "");
        assert_eq!(result.matched_skills, skills(&["Java", "JavaScript"]));
        assert_eq!(result.score, 30);
    }

    #[test]
    fn test_exact_match_not_double_counted_as_partial() {
        let result = run(&["SQL"], &["SQL"], "Wrote a lot of sql", "");
        assert_eq!(result.score, 80);
        assert_eq!(result.matched_skills.len(), 1);
    }

    #[test]
    fn test_rounding_to_nearest() {
        // 1/3 × 80 = 26.67 → 27
        let result = run(&["A"], &["A", "B", "C"], "", "");
        assert_eq!(result.score, 27);
        // 1/3 × 30 = 10
        let result = run(&[], &["A", "B", "C"], "a", "");
        assert_eq!(result.score, 10);
    }

    #[test]
    fn test_score_is_deterministic() {
        let first = run(&["Rust"], &["Rust", "Go"], "lead go developer", "lead role");
        for _ in 0..10 {
            assert_eq!(
                run(&["Rust"], &["Rust", "Go"], "lead go developer", "lead role"),
                first
            );
        }
    }

    #[test]
    fn test_adding_exact_skill_never_decreases_score() {
        let job = ["Rust", "Go", "Kafka", "SQL"];
        let mut candidate: Vec<&str> = vec![];
        let text = "go and kafka in production";
        let mut previous = run(&candidate, &job, text, "").score;
        for skill in job {
            candidate.push(skill);
            let next = run(&candidate, &job, text, "").score;
            assert!(next >= previous, "{next} < {previous} after adding {skill}");
            previous = next;
        }
    }

    #[test]
    fn test_range_and_subset_invariants() {
        let cases: Vec<(Vec<&str>, Vec<&str>, &str, &str)> = vec![
            (vec![], vec![], "", ""),
            (vec!["a"], vec!["A", "b", "c"], "b c senior", "senior"),
            (vec!["x", "y"], vec!["X", "Y"], "lead", "lead"),
            (vec![], vec!["Kotlin"], "", "manager"),
        ];
        for (candidate, job, ctext, jtext) in cases {
            let result = run(&candidate, &job, ctext, jtext);
            assert!(result.score <= MAX_SCORE);
            let normalized_job: Vec<String> = job.iter().map(|s| normalize_skill(s)).collect();
            for skill in &result.matched_skills {
                assert!(normalized_job.contains(&normalize_skill(skill)));
            }
        }
    }
}
