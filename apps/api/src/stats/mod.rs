//! Dashboard statistics for recruiters and candidates.
//!
//! Counters are computed in SQL with `FILTER` aggregates, one round trip per
//! group. The status breakdown always lists every status, zero-filled.

pub mod handlers;

use std::collections::BTreeMap;

use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::models::application::ApplicationStatus;

const RECENT_WINDOW_DAYS: i32 = 30;
const TOP_JOBS_LIMIT: i64 = 5;

#[derive(Debug, Clone, Serialize)]
pub struct RecruiterStats {
    pub total_jobs: i64,
    pub active_jobs: i64,
    pub total_applications: i64,
    pub pending_applications: i64,
    pub recent_applications: i64,
    pub application_status_breakdown: BTreeMap<String, i64>,
    pub top_performing_jobs: Vec<TopJob>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TopJob {
    pub job_id: Uuid,
    pub job_title: String,
    pub applications: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CandidateStats {
    pub total_applications: i64,
    pub pending_applications: i64,
    pub accepted_applications: i64,
    pub rejected_applications: i64,
    pub recent_applications: i64,
    pub application_status_breakdown: BTreeMap<String, i64>,
    pub average_match_score: f64,
    pub best_match_score: i32,
}

#[derive(Debug, FromRow)]
struct ApplicationCounters {
    total: i64,
    pending: i64,
    accepted: i64,
    rejected: i64,
    recent: i64,
    average_score: Option<f64>,
    best_score: Option<i32>,
}

/// Zero-filled per-status counts. Unknown statuses from the store are kept.
pub fn status_breakdown(rows: Vec<(String, i64)>) -> BTreeMap<String, i64> {
    let mut breakdown: BTreeMap<String, i64> = ApplicationStatus::ALL
        .iter()
        .map(|s| (s.as_str().to_string(), 0))
        .collect();
    for (status, count) in rows {
        *breakdown.entry(status).or_insert(0) += count;
    }
    breakdown
}

/// Average rounded to one decimal place; 0 when there is nothing to average.
fn round_average(value: Option<f64>) -> f64 {
    value.map(|v| (v * 10.0).round() / 10.0).unwrap_or(0.0)
}

/// Shared counter query; `owner_column` is a fixed column name, never user input.
async fn application_counters(
    pool: &PgPool,
    owner_column: &'static str,
    owner_id: Uuid,
) -> Result<ApplicationCounters, sqlx::Error> {
    sqlx::query_as::<_, ApplicationCounters>(&format!(
        r#"
        SELECT COUNT(*) AS total,
               COUNT(*) FILTER (WHERE status = 'pending') AS pending,
               COUNT(*) FILTER (WHERE status = 'accepted') AS accepted,
               COUNT(*) FILTER (WHERE status = 'rejected') AS rejected,
               COUNT(*) FILTER (WHERE applied_at >= NOW() - make_interval(days => $2)) AS recent,
               AVG(match_score)::FLOAT8 AS average_score,
               MAX(match_score) AS best_score
        FROM applications
        WHERE {owner_column} = $1
        "#
    ))
    .bind(owner_id)
    .bind(RECENT_WINDOW_DAYS)
    .fetch_one(pool)
    .await
}

async fn breakdown_for(
    pool: &PgPool,
    owner_column: &'static str,
    owner_id: Uuid,
) -> Result<BTreeMap<String, i64>, sqlx::Error> {
    let rows = sqlx::query_as::<_, (String, i64)>(&format!(
        "SELECT status, COUNT(*) FROM applications WHERE {owner_column} = $1 GROUP BY status"
    ))
    .bind(owner_id)
    .fetch_all(pool)
    .await?;
    Ok(status_breakdown(rows))
}

pub async fn recruiter_stats(pool: &PgPool, recruiter_id: Uuid) -> Result<RecruiterStats, sqlx::Error> {
    let (total_jobs, active_jobs): (i64, i64) = sqlx::query_as(
        r#"
        SELECT COUNT(*), COUNT(*) FILTER (WHERE status = 'active')
        FROM jobs
        WHERE recruiter_id = $1
        "#,
    )
    .bind(recruiter_id)
    .fetch_one(pool)
    .await?;

    let counters = application_counters(pool, "recruiter_id", recruiter_id).await?;
    let application_status_breakdown = breakdown_for(pool, "recruiter_id", recruiter_id).await?;

    let top_performing_jobs = sqlx::query_as::<_, TopJob>(
        r#"
        SELECT job_id, job_title, COUNT(*) AS applications
        FROM applications
        WHERE recruiter_id = $1
        GROUP BY job_id, job_title
        ORDER BY applications DESC, job_title
        LIMIT $2
        "#,
    )
    .bind(recruiter_id)
    .bind(TOP_JOBS_LIMIT)
    .fetch_all(pool)
    .await?;

    Ok(RecruiterStats {
        total_jobs,
        active_jobs,
        total_applications: counters.total,
        pending_applications: counters.pending,
        recent_applications: counters.recent,
        application_status_breakdown,
        top_performing_jobs,
    })
}

pub async fn candidate_stats(pool: &PgPool, candidate_id: Uuid) -> Result<CandidateStats, sqlx::Error> {
    let counters = application_counters(pool, "candidate_id", candidate_id).await?;
    let application_status_breakdown = breakdown_for(pool, "candidate_id", candidate_id).await?;

    Ok(CandidateStats {
        total_applications: counters.total,
        pending_applications: counters.pending,
        accepted_applications: counters.accepted,
        rejected_applications: counters.rejected,
        recent_applications: counters.recent,
        application_status_breakdown,
        average_match_score: round_average(counters.average_score),
        best_match_score: counters.best_score.unwrap_or(0),
    })
}
