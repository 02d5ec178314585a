//! Bearer-token authentication.
//!
//! Tokens are issued by the upstream identity provider (HS256, shared secret)
//! and carry the user id in `sub` plus a `role` claim. Every protected route
//! uses one of the extractors below.

use axum::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::Role;

#[derive(Clone)]
pub struct AuthConfig {
    decoding_key: DecodingKey,
}

impl AuthConfig {
    pub fn from_secret(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub role: Role,
    pub exp: usize,
}

/// Any authenticated user.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub role: Role,
}

/// An authenticated recruiter. Rejects other roles with 403.
#[derive(Debug, Clone, Copy)]
pub struct RecruiterUser(pub Uuid);

/// An authenticated candidate. Rejects other roles with 403.
#[derive(Debug, Clone, Copy)]
pub struct CandidateUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    AuthConfig: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = AuthConfig::from_ref(state);

        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("missing Authorization header".into()))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("expected Bearer token".into()))?;

        let data = decode::<Claims>(
            token,
            &config.decoding_key,
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|err| AppError::Unauthorized(format!("invalid token: {err}")))?;

        Ok(AuthUser {
            user_id: data.claims.sub,
            role: data.claims.role,
        })
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RecruiterUser
where
    AuthConfig: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        match user.role {
            Role::Recruiter => Ok(RecruiterUser(user.user_id)),
            Role::Candidate => Err(AppError::Forbidden),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CandidateUser
where
    AuthConfig: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        match user.role {
            Role::Candidate => Ok(CandidateUser(user.user_id)),
            Role::Recruiter => Err(AppError::Forbidden),
        }
    }
}

/// Signs a token the way the identity provider does. Test-only.
#[cfg(test)]
pub(crate) fn issue_test_token(secret: &str, user_id: Uuid, role: Role) -> String {
    use jsonwebtoken::{encode, EncodingKey, Header};

    let exp = (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp() as usize;
    encode(
        &Header::new(Algorithm::HS256),
        &Claims {
            sub: user_id,
            role,
            exp,
        },
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[derive(Clone)]
    struct TestState(AuthConfig);

    impl FromRef<TestState> for AuthConfig {
        fn from_ref(input: &TestState) -> AuthConfig {
            input.0.clone()
        }
    }

    fn parts_with(header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    fn state() -> TestState {
        TestState(AuthConfig::from_secret("secret"))
    }

    #[tokio::test]
    async fn test_valid_token_yields_user() {
        let id = Uuid::new_v4();
        let token = issue_test_token("secret", id, Role::Recruiter);
        let mut parts = parts_with(Some(&format!("Bearer {token}")));

        let user = AuthUser::from_request_parts(&mut parts, &state()).await.unwrap();
        assert_eq!(user.user_id, id);
        assert_eq!(user.role, Role::Recruiter);
    }

    #[tokio::test]
    async fn test_missing_header_is_unauthorized() {
        let mut parts = parts_with(None);
        let err = AuthUser::from_request_parts(&mut parts, &state()).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_wrong_secret_is_unauthorized() {
        let token = issue_test_token("other-secret", Uuid::new_v4(), Role::Candidate);
        let mut parts = parts_with(Some(&format!("Bearer {token}")));
        let err = AuthUser::from_request_parts(&mut parts, &state()).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_non_bearer_scheme_is_unauthorized() {
        let mut parts = parts_with(Some("Basic dXNlcjpwYXNz"));
        let err = AuthUser::from_request_parts(&mut parts, &state()).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_role_extractors() {
        let id = Uuid::new_v4();
        let token = issue_test_token("secret", id, Role::Candidate);
        let header = format!("Bearer {token}");

        let mut parts = parts_with(Some(&header));
        let candidate = CandidateUser::from_request_parts(&mut parts, &state()).await.unwrap();
        assert_eq!(candidate.0, id);

        let mut parts = parts_with(Some(&header));
        let err = RecruiterUser::from_request_parts(&mut parts, &state()).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
    }
}
