use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use thiserror::Error;
use uuid::Uuid;

use crate::models::UserRow;
use shared::{CreateUserRequest, User};

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found")]
    NotFound,
    #[error("User already exists")]
    UserAlreadyExists,
    #[error("The fallback user cannot be deleted")]
    SentinelUser,
    #[error("Invalid id: {0}")]
    InvalidId(#[from] uuid::Error),
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

pub async fn create_user(pool: &SqlitePool, request: &CreateUserRequest) -> Result<User, UserError> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO users (id, username, email, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(id.to_string())
    .bind(&request.username)
    .bind(&request.email)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await;

    match result {
        Ok(_) => Ok(User {
            id,
            username: request.username.clone(),
            email: request.email.clone(),
            created_at: now,
            updated_at: now,
        }),
        Err(sqlx::Error::Database(e)) if e.message().contains("UNIQUE constraint failed") => {
            Err(UserError::UserAlreadyExists)
        }
        Err(e) => Err(UserError::DatabaseError(e)),
    }
}

pub async fn get_user_by_id(pool: &SqlitePool, user_id: &Uuid) -> Result<Option<User>, UserError> {
    let user: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE id = ?")
        .bind(user_id.to_string())
        .fetch_optional(pool)
        .await?;

    Ok(user.map(|u| u.to_shared()).transpose()?)
}

pub async fn get_user_by_username(pool: &SqlitePool, username: &str) -> Result<Option<User>, UserError> {
    let user: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(pool)
        .await?;

    Ok(user.map(|u| u.to_shared()).transpose()?)
}

/// Get the fallback user that takes over ownership and edits of deleted
/// accounts, creating it on first use.
///
/// Safe to call concurrently: the unique constraint on `username` lets
/// exactly one insert win and every caller reads back the same row.
pub async fn get_sentinel_user(pool: &SqlitePool, username: &str) -> Result<User, UserError> {
    let mut conn = pool.acquire().await?;
    sentinel_user(&mut *conn, username).await
}

async fn sentinel_user(conn: &mut SqliteConnection, username: &str) -> Result<User, UserError> {
    let now = Utc::now();

    let inserted = sqlx::query(
        r#"
        INSERT INTO users (id, username, email, created_at, updated_at)
        VALUES (?, ?, '', ?, ?)
        ON CONFLICT(username) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(username)
    .bind(now)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    if inserted.rows_affected() > 0 {
        log::info!("Created fallback user '{}'", username);
    }

    let user: UserRow = sqlx::query_as("SELECT * FROM users WHERE username = ?")
        .bind(username)
        .fetch_one(&mut *conn)
        .await?;

    Ok(user.to_shared()?)
}

/// Delete a user account.
///
/// Households owned by the user and locations or food items last edited by
/// them are handed over to the fallback user in the same transaction, and
/// the user's memberships are removed by cascade.
pub async fn delete_user(
    pool: &SqlitePool,
    user_id: &Uuid,
    sentinel_username: &str,
) -> Result<(), UserError> {
    let mut tx = pool.begin().await?;

    // Created inside the transaction so a failed delete leaves no trace
    let sentinel = sentinel_user(&mut *tx, sentinel_username).await?;
    if sentinel.id == *user_id {
        return Err(UserError::SentinelUser);
    }

    let sentinel_id = sentinel.id.to_string();
    let user_id_str = user_id.to_string();

    let households = sqlx::query("UPDATE households SET owner_id = ? WHERE owner_id = ?")
        .bind(&sentinel_id)
        .bind(&user_id_str)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    let locations = sqlx::query("UPDATE storage_locations SET edited_by = ? WHERE edited_by = ?")
        .bind(&sentinel_id)
        .bind(&user_id_str)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    let items = sqlx::query("UPDATE food_items SET edited_by = ? WHERE edited_by = ?")
        .bind(&sentinel_id)
        .bind(&user_id_str)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(&user_id_str)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        // Dropping the transaction rolls the reassignments back
        return Err(UserError::NotFound);
    }

    tx.commit().await?;

    log::info!(
        "Deleted user {}; reassigned {} households, {} storage locations and {} food items to '{}'",
        user_id,
        households,
        locations,
        items,
        sentinel.username
    );

    Ok(())
}
