//! Users and their API tokens.
//!
//! Tokens are opaque random strings handed out when a user is created and
//! looked up on every authenticated request.

use crate::catalog::unique_to_validation;
use crate::db::Database;
use crate::error::{Result, ValidationErrors};
use crate::types::User;
use chrono::Utc;
use rand::distr::Alphanumeric;
use rand::Rng;
use tracing::info;

const TOKEN_LENGTH: usize = 40;

impl Database {
    /// Create a user with a fresh token.
    pub async fn create_user(&self, username: &str) -> Result<User> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ValidationErrors::single("username", "This field may not be blank.").into());
        }

        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (username, token, created_at) VALUES (?, ?, ?) \
             RETURNING id, username, token, created_at",
        )
        .bind(username)
        .bind(generate_token())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| unique_to_validation(e, "username", "A user with that username already exists."))?;

        info!("Created user {} ({})", user.id, user.username);
        Ok(user)
    }

    /// The user owning `token`, if any
    pub async fn find_user_by_token(&self, token: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, token, created_at FROM users WHERE token = ?",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }
}

fn generate_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}
