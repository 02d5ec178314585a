//! Job persistence and listing queries.

use std::collections::HashSet;

use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::jobs::validation::JobDraft;
use crate::models::job::{JobRow, JobStatus, JOB_TYPES};
use crate::pagination::Page;

/// Filter value meaning "no filter" in dashboard dropdowns.
const ALL: &str = "all";

/// Escapes LIKE wildcards and wraps the term for a contains-match.
pub fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn active_filter(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case(ALL))
}

// ────────────────────────────────────────────────────────────────────────────
// Writes
// ────────────────────────────────────────────────────────────────────────────

pub async fn insert_job(
    pool: &PgPool,
    recruiter_id: Uuid,
    draft: &JobDraft,
) -> Result<JobRow, sqlx::Error> {
    sqlx::query_as::<_, JobRow>(
        r#"
        INSERT INTO jobs (recruiter_id, title, company, description, requirements,
                          location, job_type, salary, skills, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING *
        "#,
    )
    .bind(recruiter_id)
    .bind(&draft.title)
    .bind(&draft.company)
    .bind(&draft.description)
    .bind(&draft.requirements)
    .bind(&draft.location)
    .bind(&draft.job_type)
    .bind(&draft.salary)
    .bind(&draft.skills)
    .bind(draft.status.as_str())
    .fetch_one(pool)
    .await
}

/// Updates a job owned by `recruiter_id`. `None` when no such job exists.
pub async fn update_job(
    pool: &PgPool,
    recruiter_id: Uuid,
    job_id: Uuid,
    draft: &JobDraft,
) -> Result<Option<JobRow>, sqlx::Error> {
    sqlx::query_as::<_, JobRow>(
        r#"
        UPDATE jobs
        SET title = $3, company = $4, description = $5, requirements = $6,
            location = $7, job_type = $8, salary = $9, skills = $10, status = $11,
            updated_at = NOW()
        WHERE id = $1 AND recruiter_id = $2
        RETURNING *
        "#,
    )
    .bind(job_id)
    .bind(recruiter_id)
    .bind(&draft.title)
    .bind(&draft.company)
    .bind(&draft.description)
    .bind(&draft.requirements)
    .bind(&draft.location)
    .bind(&draft.job_type)
    .bind(&draft.salary)
    .bind(&draft.skills)
    .bind(draft.status.as_str())
    .fetch_optional(pool)
    .await
}

/// Deletes a job owned by `recruiter_id`; applications and matches cascade.
/// Returns whether a row was deleted.
pub async fn delete_job(pool: &PgPool, recruiter_id: Uuid, job_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM jobs WHERE id = $1 AND recruiter_id = $2")
        .bind(job_id)
        .bind(recruiter_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

// ────────────────────────────────────────────────────────────────────────────
// Reads
// ────────────────────────────────────────────────────────────────────────────

pub async fn get_recruiter_job(
    pool: &PgPool,
    recruiter_id: Uuid,
    job_id: Uuid,
) -> Result<Option<JobRow>, sqlx::Error> {
    sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = $1 AND recruiter_id = $2")
        .bind(job_id)
        .bind(recruiter_id)
        .fetch_optional(pool)
        .await
}

pub async fn get_job(pool: &PgPool, job_id: Uuid) -> Result<Option<JobRow>, sqlx::Error> {
    sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = $1")
        .bind(job_id)
        .fetch_optional(pool)
        .await
}

#[derive(Debug, Default, Clone)]
pub struct RecruiterJobFilters {
    pub status: Option<JobStatus>,
    pub search: Option<String>,
}

fn push_recruiter_filters(
    qb: &mut QueryBuilder<'_, Postgres>,
    recruiter_id: Uuid,
    filters: &RecruiterJobFilters,
) {
    qb.push(" WHERE recruiter_id = ").push_bind(recruiter_id);

    if let Some(status) = filters.status {
        qb.push(" AND status = ").push_bind(status.as_str());
    }

    if let Some(search) = active_filter(filters.search.as_deref()) {
        let pattern = like_pattern(search);
        qb.push(" AND (title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR company ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR location ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

/// Recruiter's jobs, newest first, with the total matching count.
pub async fn list_recruiter_jobs(
    pool: &PgPool,
    recruiter_id: Uuid,
    filters: &RecruiterJobFilters,
    page: Page,
) -> Result<(Vec<JobRow>, i64), sqlx::Error> {
    let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM jobs");
    push_recruiter_filters(&mut count, recruiter_id, filters);
    let total: i64 = count.build_query_scalar().fetch_one(pool).await?;

    let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM jobs");
    push_recruiter_filters(&mut qb, recruiter_id, filters);
    qb.push(" ORDER BY created_at DESC LIMIT ")
        .push_bind(page.limit)
        .push(" OFFSET ")
        .push_bind(page.offset());
    let jobs = qb.build_query_as::<JobRow>().fetch_all(pool).await?;

    Ok((jobs, total))
}

/// Job board filters for candidates. Only active jobs are ever listed.
#[derive(Debug, Default, Clone)]
pub struct JobBoardFilters {
    pub search: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    /// Comma-separated skill fragments; a job matches when any of its skills
    /// contains any fragment.
    pub skills: Option<String>,
}

impl JobBoardFilters {
    fn skill_patterns(&self) -> Vec<String> {
        self.skills
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(like_pattern)
            .collect()
    }

    /// Job type filter, if it names a known type.
    fn job_type(&self) -> Option<&str> {
        active_filter(self.job_type.as_deref()).filter(|t| JOB_TYPES.contains(t))
    }
}

fn push_board_filters(qb: &mut QueryBuilder<'_, Postgres>, filters: &JobBoardFilters) {
    qb.push(" WHERE status = ").push_bind(JobStatus::Active.as_str());

    if let Some(search) = active_filter(filters.search.as_deref()) {
        let pattern = like_pattern(search);
        qb.push(" AND (title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR company ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }

    if let Some(location) = active_filter(filters.location.as_deref()) {
        qb.push(" AND location ILIKE ").push_bind(like_pattern(location));
    }

    if let Some(job_type) = filters.job_type() {
        qb.push(" AND job_type = ").push_bind(job_type.to_string());
    }

    let patterns = filters.skill_patterns();
    if !patterns.is_empty() {
        qb.push(" AND EXISTS (SELECT 1 FROM unnest(skills) AS s WHERE s ILIKE ANY(")
            .push_bind(patterns)
            .push("))");
    }
}

/// Active jobs for the job board, newest first, with the total matching count.
pub async fn list_active_jobs(
    pool: &PgPool,
    filters: &JobBoardFilters,
    page: Page,
) -> Result<(Vec<JobRow>, i64), sqlx::Error> {
    let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM jobs");
    push_board_filters(&mut count, filters);
    let total: i64 = count.build_query_scalar().fetch_one(pool).await?;

    let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM jobs");
    push_board_filters(&mut qb, filters);
    qb.push(" ORDER BY created_at DESC LIMIT ")
        .push_bind(page.limit)
        .push(" OFFSET ")
        .push_bind(page.offset());
    let jobs = qb.build_query_as::<JobRow>().fetch_all(pool).await?;

    Ok((jobs, total))
}

/// Which of `job_ids` the candidate has already applied to.
pub async fn applied_job_ids(
    pool: &PgPool,
    candidate_id: Uuid,
    job_ids: &[Uuid],
) -> Result<HashSet<Uuid>, sqlx::Error> {
    if job_ids.is_empty() {
        return Ok(HashSet::new());
    }

    let ids: Vec<Uuid> = sqlx::query_scalar(
        "SELECT job_id FROM applications WHERE candidate_id = $1 AND job_id = ANY($2)",
    )
    .bind(candidate_id)
    .bind(job_ids)
    .fetch_all(pool)
    .await?;

    Ok(ids.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("rust"), "%rust%");
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
        assert_eq!(like_pattern("c:\\"), "%c:\\\\%");
    }

    #[test]
    fn test_all_means_no_filter() {
        assert_eq!(active_filter(Some("all")), None);
        assert_eq!(active_filter(Some("  ")), None);
        assert_eq!(active_filter(None), None);
        assert_eq!(active_filter(Some(" Berlin ")), Some("Berlin"));
    }

    #[test]
    fn test_skill_patterns_split_and_trim() {
        let filters = JobBoardFilters {
            skills: Some("rust, ,Go ".to_string()),
            ..Default::default()
        };
        assert_eq!(filters.skill_patterns(), vec!["%rust%", "%Go%"]);
    }

    #[test]
    fn test_unknown_job_type_ignored() {
        let filters = JobBoardFilters {
            job_type: Some("Freelance".to_string()),
            ..Default::default()
        };
        assert_eq!(filters.job_type(), None);

        let filters = JobBoardFilters {
            job_type: Some("Contract".to_string()),
            ..Default::default()
        };
        assert_eq!(filters.job_type(), Some("Contract"));
    }

    #[test]
    fn test_board_query_shape() {
        let filters = JobBoardFilters {
            search: Some("engineer".to_string()),
            location: Some("all".to_string()),
            job_type: None,
            skills: Some("rust".to_string()),
        };
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM jobs");
        push_board_filters(&mut qb, &filters);
        let sql = qb.sql();
        assert!(sql.contains("WHERE status = $1"));
        assert!(sql.contains("description ILIKE $4"));
        assert!(!sql.contains("location ILIKE"));
        assert!(sql.contains("ILIKE ANY($5)"));
    }
}
