//! User repository for the local auth service.
//!
//! Accounts are unique by email. OAuth sign-ins are matched first by the
//! provider's subject id, then by email (linking the provider to an existing
//! local account), and only then create a new account.

use crate::{DbError, Result as DbErrorResult};

use tp_core::{OAuthProvider, User};

use std::panic::Location;

use chrono::DateTime;
use error_location::ErrorLocation;
use log::info;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

const USER_COLUMNS: &str =
    "id, email, name, password_hash, google_id, facebook_id, avatar_url, created_at";

/// Profile returned by an OAuth provider after a successful code exchange
#[derive(Debug, Clone)]
pub struct OAuthProfile {
    pub provider: OAuthProvider,
    pub subject: String,
    pub email: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new account. A taken email yields `DbError::Duplicate`.
    pub async fn create(&self, user: &User) -> DbErrorResult<()> {
        sqlx::query(
            r#"
                INSERT INTO users (
                    id, email, name, password_hash, google_id, facebook_id, avatar_url, created_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user.id.to_string())
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(&user.google_id)
        .bind(&user.facebook_id)
        .bind(&user.avatar_url)
        .bind(user.created_at.timestamp())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn find_by_id(&self, id: Uuid) -> DbErrorResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| map_user(&r)).transpose()
    }

    pub async fn find_by_email(&self, email: &str) -> DbErrorResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| map_user(&r)).transpose()
    }

    pub async fn find_by_provider(
        &self,
        provider: OAuthProvider,
        subject: &str,
    ) -> DbErrorResult<Option<User>> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE {} = ?",
            provider_column(provider)
        );
        let row = sqlx::query(&sql)
            .bind(subject)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| map_user(&r)).transpose()
    }

    /// Resolve the account for an OAuth sign-in, creating or linking as needed
    pub async fn upsert_oauth(&self, profile: &OAuthProfile) -> DbErrorResult<User> {
        if let Some(user) = self
            .find_by_provider(profile.provider, &profile.subject)
            .await?
        {
            return Ok(user);
        }

        if let Some(mut user) = self.find_by_email(&profile.email).await? {
            let sql = format!(
                "UPDATE users SET {} = ?, avatar_url = COALESCE(avatar_url, ?), name = COALESCE(name, ?) WHERE id = ?",
                provider_column(profile.provider)
            );
            sqlx::query(&sql)
                .bind(&profile.subject)
                .bind(&profile.avatar_url)
                .bind(&profile.name)
                .bind(user.id.to_string())
                .execute(&self.pool)
                .await?;

            info!(
                "Linked {} account to existing user {}",
                profile.provider, user.id
            );
            user.link_provider(profile.provider, profile.subject.clone());
            if user.avatar_url.is_none() {
                user.avatar_url = profile.avatar_url.clone();
            }
            if user.name.is_none() {
                user.name = profile.name.clone();
            }
            return Ok(user);
        }

        let user = User::from_oauth(
            profile.provider,
            profile.subject.clone(),
            profile.email.clone(),
            profile.name.clone(),
            profile.avatar_url.clone(),
        );
        self.create(&user).await?;
        info!("Created user {} from {} sign-in", user.id, profile.provider);

        Ok(user)
    }

    pub async fn count(&self) -> DbErrorResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

fn provider_column(provider: OAuthProvider) -> &'static str {
    match provider {
        OAuthProvider::Google => "google_id",
        OAuthProvider::Facebook => "facebook_id",
    }
}

#[track_caller]
fn corrupt(message: String) -> DbError {
    DbError::CorruptRow {
        table: "users",
        message,
        location: ErrorLocation::from(Location::caller()),
    }
}

fn map_user(row: &SqliteRow) -> DbErrorResult<User> {
    let id: String = row.try_get("id")?;
    let created_at: i64 = row.try_get("created_at")?;

    Ok(User {
        id: Uuid::parse_str(&id).map_err(|e| corrupt(format!("Invalid UUID in users.id: {}", e)))?,
        email: row.try_get("email")?,
        name: row.try_get("name")?,
        password_hash: row.try_get("password_hash")?,
        google_id: row.try_get("google_id")?,
        facebook_id: row.try_get("facebook_id")?,
        avatar_url: row.try_get("avatar_url")?,
        created_at: DateTime::from_timestamp(created_at, 0)
            .ok_or_else(|| corrupt("Invalid timestamp in users.created_at".to_string()))?,
    })
}
