use crate::db::{models::User, DbPool};
use crate::error::{Error, Result};
use crate::vocabulary::canonicalize;
use chrono::Utc;
use sqlx::{Acquire, Sqlite};

/// Create a user; the display name is stored title-cased
pub async fn create_user(pool: &DbPool, name: &str) -> Result<User> {
    let name = canonicalize(name);
    if name.is_empty() {
        return Err(Error::Validation("User name cannot be empty".to_string()));
    }

    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (name, created_at) VALUES (?, ?) RETURNING *",
    )
    .bind(&name)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(user)
}

/// Get user by ID
pub async fn get_user<'a, A>(conn: A, user_id: i64) -> Result<User>
where
    A: Acquire<'a, Database = Sqlite>,
{
    let mut conn = conn.acquire().await?;
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| Error::NotFound(format!("User {user_id} not found")))?;

    Ok(user)
}
