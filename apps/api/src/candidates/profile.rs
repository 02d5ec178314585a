//! Candidate profile reads and partial updates.
//!
//! Identity fields (`email`, `role`) belong to the identity provider and are
//! never written here. Every other profile field is optional in an update:
//! absent means unchanged, an empty string clears the value.

use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::scorer::dedup_skills;
use crate::models::user::UserRow;

const MAX_NAME_LEN: usize = 120;
const MAX_SKILLS: usize = 100;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub position: Option<String>,
    pub bio: Option<String>,
    pub skills: Option<Vec<String>>,
    pub experience: Option<String>,
    pub education: Option<String>,
    pub resume_text: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub portfolio_url: Option<String>,
}

impl ProfileUpdate {
    /// Trims every field and rejects values the profile cannot hold.
    pub fn validate(self) -> Result<Self, AppError> {
        let name = trimmed(self.name);
        if let Some(name) = &name {
            if name.is_empty() || name.chars().count() > MAX_NAME_LEN {
                return Err(AppError::Validation(format!(
                    "name must be between 1 and {MAX_NAME_LEN} characters"
                )));
            }
        }

        let skills = self.skills.map(|skills| dedup_skills(&skills));
        if skills.as_ref().is_some_and(|s| s.len() > MAX_SKILLS) {
            return Err(AppError::Validation(format!(
                "at most {MAX_SKILLS} skills are allowed"
            )));
        }

        let linkedin_url = checked_url("linkedin_url", self.linkedin_url)?;
        let github_url = checked_url("github_url", self.github_url)?;
        let portfolio_url = checked_url("portfolio_url", self.portfolio_url)?;

        Ok(Self {
            name,
            phone: trimmed(self.phone),
            location: trimmed(self.location),
            position: trimmed(self.position),
            bio: trimmed(self.bio),
            skills,
            experience: trimmed(self.experience),
            education: trimmed(self.education),
            resume_text: trimmed(self.resume_text),
            linkedin_url,
            github_url,
            portfolio_url,
        })
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string())
}

fn checked_url(field: &str, value: Option<String>) -> Result<Option<String>, AppError> {
    let value = trimmed(value);
    match value.as_deref() {
        Some(url) if !url.is_empty() && !(url.starts_with("https://") || url.starts_with("http://")) => {
            Err(AppError::Validation(format!(
                "{field} must be an http(s) URL"
            )))
        }
        _ => Ok(value),
    }
}

pub async fn fetch_candidate(pool: &PgPool, candidate_id: Uuid) -> Result<UserRow, AppError> {
    sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1 AND role = 'candidate'")
        .bind(candidate_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Candidate profile not found".to_string()))
}

pub async fn update_profile(
    pool: &PgPool,
    candidate_id: Uuid,
    update: &ProfileUpdate,
) -> Result<UserRow, AppError> {
    sqlx::query_as::<_, UserRow>(
        r#"
        UPDATE users
        SET name          = COALESCE($2, name),
            phone         = COALESCE($3, phone),
            location      = COALESCE($4, location),
            position      = COALESCE($5, position),
            bio           = COALESCE($6, bio),
            skills        = COALESCE($7, skills),
            experience    = COALESCE($8, experience),
            education     = COALESCE($9, education),
            resume_text   = COALESCE($10, resume_text),
            linkedin_url  = COALESCE($11, linkedin_url),
            github_url    = COALESCE($12, github_url),
            portfolio_url = COALESCE($13, portfolio_url),
            updated_at    = NOW()
        WHERE id = $1 AND role = 'candidate'
        RETURNING *
        "#,
    )
    .bind(candidate_id)
    .bind(&update.name)
    .bind(&update.phone)
    .bind(&update.location)
    .bind(&update.position)
    .bind(&update.bio)
    .bind(&update.skills)
    .bind(&update.experience)
    .bind(&update.education)
    .bind(&update.resume_text)
    .bind(&update.linkedin_url)
    .bind(&update.github_url)
    .bind(&update.portfolio_url)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Candidate profile not found".to_string()))
}
