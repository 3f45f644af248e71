/// Account service - registration and login
use crate::config::AuthConfig;
use crate::db::user_repo;
use crate::error::{AppError, Result};
use crate::models::AuthorSummary;
use crate::security::{password, token};
use sqlx::PgPool;

pub struct AccountService {
    pool: PgPool,
    auth: AuthConfig,
}

impl AccountService {
    pub fn new(pool: PgPool, auth: AuthConfig) -> Self {
        Self { pool, auth }
    }

    /// Register a new author. Email must be unused; the password is stored
    /// as an Argon2id PHC hash.
    pub async fn register(&self, name: &str, email: &str, raw_password: &str) -> Result<AuthorSummary> {
        if user_repo::find_by_email(&self.pool, email).await?.is_some() {
            return Err(AppError::Conflict(
                "User with this email already exists".into(),
            ));
        }

        let password_hash = password::hash_password(raw_password)?;
        let user = user_repo::insert(&self.pool, name, email, &password_hash).await?;

        tracing::info!(user_id = %user.id, "user registered");

        Ok(user_repo::to_summary(&user))
    }

    /// Verify credentials and issue a bearer token. Unknown email and wrong
    /// password produce the same error to avoid account enumeration.
    pub async fn login(&self, email: &str, raw_password: &str) -> Result<(String, AuthorSummary)> {
        let user = user_repo::find_by_email(&self.pool, email)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid email or password".into()))?;

        if !password::verify_password(raw_password, &user.password_hash)? {
            return Err(AppError::Unauthorized("Invalid email or password".into()));
        }

        let token = token::issue_token(&self.auth.jwt_secret, &user, self.auth.token_expiry_hours)?;

        Ok((token, user_repo::to_summary(&user)))
    }
}
