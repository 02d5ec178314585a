//! Application queries for both sides of the marketplace.

use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::jobs::store::like_pattern;
use crate::models::application::{ApplicationRow, ApplicationStatus};
use crate::pagination::Page;

/// Candidate's own applications, newest first.
pub async fn list_candidate_applications(
    pool: &PgPool,
    candidate_id: Uuid,
) -> Result<Vec<ApplicationRow>, sqlx::Error> {
    sqlx::query_as::<_, ApplicationRow>(
        "SELECT * FROM applications WHERE candidate_id = $1 ORDER BY applied_at DESC",
    )
    .bind(candidate_id)
    .fetch_all(pool)
    .await
}

pub async fn find_application(
    pool: &PgPool,
    candidate_id: Uuid,
    job_id: Uuid,
) -> Result<Option<ApplicationRow>, sqlx::Error> {
    sqlx::query_as::<_, ApplicationRow>(
        "SELECT * FROM applications WHERE candidate_id = $1 AND job_id = $2",
    )
    .bind(candidate_id)
    .bind(job_id)
    .fetch_optional(pool)
    .await
}

#[derive(Debug, Default, Clone)]
pub struct ApplicationFilters {
    pub status: Option<ApplicationStatus>,
    pub job_id: Option<Uuid>,
    pub search: Option<String>,
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, recruiter_id: Uuid, filters: &ApplicationFilters) {
    qb.push(" WHERE recruiter_id = ").push_bind(recruiter_id);

    if let Some(status) = filters.status {
        qb.push(" AND status = ").push_bind(status.as_str());
    }

    if let Some(job_id) = filters.job_id {
        qb.push(" AND job_id = ").push_bind(job_id);
    }

    if let Some(search) = filters.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let pattern = like_pattern(search);
        qb.push(" AND (candidate_name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR job_title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR company ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

/// Applications to the recruiter's jobs, newest first, with the total count.
pub async fn list_recruiter_applications(
    pool: &PgPool,
    recruiter_id: Uuid,
    filters: &ApplicationFilters,
    page: Page,
) -> Result<(Vec<ApplicationRow>, i64), sqlx::Error> {
    let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM applications");
    push_filters(&mut count, recruiter_id, filters);
    let total: i64 = count.build_query_scalar().fetch_one(pool).await?;

    let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM applications");
    push_filters(&mut qb, recruiter_id, filters);
    qb.push(" ORDER BY applied_at DESC LIMIT ")
        .push_bind(page.limit)
        .push(" OFFSET ")
        .push_bind(page.offset());
    let applications = qb.build_query_as::<ApplicationRow>().fetch_all(pool).await?;

    Ok((applications, total))
}

/// Sets status and feedback on an application addressed to `recruiter_id`.
pub async fn update_status(
    pool: &PgPool,
    recruiter_id: Uuid,
    application_id: Uuid,
    status: ApplicationStatus,
    feedback: &str,
) -> Result<Option<ApplicationRow>, sqlx::Error> {
    sqlx::query_as::<_, ApplicationRow>(
        r#"
        UPDATE applications
        SET status = $3, feedback = $4, updated_at = NOW()
        WHERE id = $1 AND recruiter_id = $2
        RETURNING *
        "#,
    )
    .bind(application_id)
    .bind(recruiter_id)
    .bind(status.as_str())
    .bind(feedback)
    .fetch_optional(pool)
    .await
}
