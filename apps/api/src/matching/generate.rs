//! Match generation — scores candidates against jobs and persists the results.
//!
//! Every (candidate, job) pair is independent. Scoring is pure and runs in a
//! plain loop; persistence replaces the previous results for the affected
//! scope inside one transaction. Only pairs with a positive score are stored.

use serde::Serialize;
use sqlx::{FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::matching::scorer::{score, MatchInput, MatchResult};
use crate::models::job::JobRow;
use crate::models::user::UserRow;

/// One scored pair, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredPair {
    pub candidate_id: Uuid,
    pub job_id: Uuid,
    pub result: MatchResult,
}

/// Scores a candidate profile against one job.
pub fn score_candidate_for_job(candidate: &UserRow, job: &JobRow) -> MatchResult {
    let candidate_text = candidate.candidate_text();
    score(&MatchInput {
        candidate_skills: &candidate.skills,
        job_skills: &job.skills,
        candidate_text: &candidate_text,
        job_text: &job.description,
    })
}

/// Scores every candidate against every job, keeping pairs with score > 0.
/// Output order: jobs in input order, candidates in input order within a job.
pub fn score_all_pairs(jobs: &[JobRow], candidates: &[UserRow]) -> Vec<ScoredPair> {
    let texts: Vec<String> = candidates.iter().map(UserRow::candidate_text).collect();

    let mut pairs = Vec::new();
    for job in jobs {
        for (candidate, candidate_text) in candidates.iter().zip(&texts) {
            let result = score(&MatchInput {
                candidate_skills: &candidate.skills,
                job_skills: &job.skills,
                candidate_text,
                job_text: &job.description,
            });
            if result.score > 0 {
                pairs.push(ScoredPair {
                    candidate_id: candidate.id,
                    job_id: job.id,
                    result,
                });
            }
        }
    }
    pairs
}

// ────────────────────────────────────────────────────────────────────────────
// Persistence
// ────────────────────────────────────────────────────────────────────────────

/// Recomputes matches for all active jobs owned by a recruiter.
/// Returns the number of stored matches.
pub async fn regenerate_recruiter_matches(
    pool: &PgPool,
    recruiter_id: Uuid,
) -> Result<usize, sqlx::Error> {
    let jobs = sqlx::query_as::<_, JobRow>(
        "SELECT * FROM jobs WHERE recruiter_id = $1 AND status = 'active' ORDER BY created_at",
    )
    .bind(recruiter_id)
    .fetch_all(pool)
    .await?;

    let candidates = fetch_active_candidates(pool).await?;
    let pairs = score_all_pairs(&jobs, &candidates);

    let mut tx = pool.begin().await?;
    sqlx::query(
        "DELETE FROM matches WHERE job_id IN (SELECT id FROM jobs WHERE recruiter_id = $1)",
    )
    .bind(recruiter_id)
    .execute(&mut *tx)
    .await?;
    for pair in &pairs {
        insert_match(&mut tx, pair).await?;
    }
    tx.commit().await?;

    info!(
        "Generated {} matches for recruiter {} ({} jobs x {} candidates)",
        pairs.len(),
        recruiter_id,
        jobs.len(),
        candidates.len()
    );
    Ok(pairs.len())
}

/// Recomputes one candidate's matches against every active job.
pub async fn refresh_candidate_matches(
    pool: &PgPool,
    candidate_id: Uuid,
) -> Result<usize, sqlx::Error> {
    let candidate = sqlx::query_as::<_, UserRow>(
        "SELECT * FROM users WHERE id = $1 AND role = 'candidate' AND is_active",
    )
    .bind(candidate_id)
    .fetch_optional(pool)
    .await?;

    let jobs = sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE status = 'active'")
        .fetch_all(pool)
        .await?;

    let pairs = match &candidate {
        Some(c) => score_all_pairs(&jobs, std::slice::from_ref(c)),
        None => vec![],
    };

    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM matches WHERE candidate_id = $1")
        .bind(candidate_id)
        .execute(&mut *tx)
        .await?;
    for pair in &pairs {
        insert_match(&mut tx, pair).await?;
    }
    tx.commit().await?;

    info!(
        "Refreshed {} matches for candidate {} across {} active jobs",
        pairs.len(),
        candidate_id,
        jobs.len()
    );
    Ok(pairs.len())
}

async fn fetch_active_candidates(pool: &PgPool) -> Result<Vec<UserRow>, sqlx::Error> {
    sqlx::query_as::<_, UserRow>(
        "SELECT * FROM users WHERE role = 'candidate' AND is_active ORDER BY created_at",
    )
    .fetch_all(pool)
    .await
}

async fn insert_match(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    pair: &ScoredPair,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO matches (candidate_id, job_id, score, matched_skills)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (candidate_id, job_id)
        DO UPDATE SET score = EXCLUDED.score,
                      matched_skills = EXCLUDED.matched_skills,
                      created_at = NOW()
        "#,
    )
    .bind(pair.candidate_id)
    .bind(pair.job_id)
    .bind(pair.result.score as i32)
    .bind(&pair.result.matched_skills)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Listing
// ────────────────────────────────────────────────────────────────────────────

/// A stored match joined with the names a dashboard shows.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MatchListItem {
    pub id: Uuid,
    pub candidate_id: Uuid,
    pub candidate_name: String,
    pub job_id: Uuid,
    pub job_title: String,
    pub score: i32,
    pub matched_skills: Vec<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

const MATCH_LIST_SELECT: &str = r#"
    SELECT m.id, m.candidate_id, u.name AS candidate_name, m.job_id,
           j.title AS job_title, m.score, m.matched_skills, m.created_at
    FROM matches m
    JOIN jobs j ON j.id = m.job_id
    JOIN users u ON u.id = m.candidate_id
"#;

pub async fn list_recruiter_matches(
    pool: &PgPool,
    recruiter_id: Uuid,
) -> Result<Vec<MatchListItem>, sqlx::Error> {
    sqlx::query_as::<_, MatchListItem>(&format!(
        "{MATCH_LIST_SELECT} WHERE j.recruiter_id = $1 ORDER BY m.score DESC, m.created_at DESC"
    ))
    .bind(recruiter_id)
    .fetch_all(pool)
    .await
}

pub async fn list_candidate_matches(
    pool: &PgPool,
    candidate_id: Uuid,
) -> Result<Vec<MatchListItem>, sqlx::Error> {
    sqlx::query_as::<_, MatchListItem>(&format!(
        "{MATCH_LIST_SELECT} WHERE m.candidate_id = $1 AND j.status = 'active' \
         ORDER BY m.score DESC, m.created_at DESC"
    ))
    .bind(candidate_id)
    .fetch_all(pool)
    .await
}
