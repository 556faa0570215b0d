use sqlx::PgPool;
use tracing::error;

use crate::auth;
use crate::database::manager::DatabaseError;
use crate::database::models::User;

/// Admin account lookups and credential checks.
pub struct UserStore {
    pool: PgPool,
}

impl UserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, hashed_password, is_superuser FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Verify credentials. `None` covers both an unknown username and a
    /// wrong password, so callers cannot tell the two apart.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, DatabaseError> {
        let Some(user) = self.get_by_username(username).await? else {
            return Ok(None);
        };

        match auth::verify_password(password, &user.hashed_password) {
            Ok(true) => Ok(Some(user)),
            Ok(false) => Ok(None),
            Err(e) => {
                // A stored hash we cannot parse means the account is unusable,
                // not that the caller is unauthorized in an interesting way
                error!("Stored password hash for '{}' is invalid: {}", username, e);
                Ok(None)
            }
        }
    }

    pub async fn create(
        &self,
        username: &str,
        hashed_password: &str,
        is_superuser: bool,
    ) -> Result<User, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (username, hashed_password, is_superuser) VALUES ($1, $2, $3) \
             RETURNING id, username, hashed_password, is_superuser",
        )
        .bind(username)
        .bind(hashed_password)
        .bind(is_superuser)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }
}
