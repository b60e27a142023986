use chrono::Utc;
use sqlx::SqlitePool;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{MemberRow, UserRow};
use shared::{Member, MemberWithUser};

#[derive(Debug, Error)]
pub enum MemberError {
    #[error("Membership not found")]
    NotFound,
    #[error("User is already a member of this household")]
    AlreadyMember,
    #[error("User or household does not exist")]
    InvalidReference,
    #[error("Invalid id: {0}")]
    InvalidId(#[from] uuid::Error),
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

pub async fn add_member(
    pool: &SqlitePool,
    household_id: &Uuid,
    user_id: &Uuid,
) -> Result<Member, MemberError> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO household_members (id, household_id, user_id, joined_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(id.to_string())
    .bind(household_id.to_string())
    .bind(user_id.to_string())
    .bind(now)
    .execute(pool)
    .await;

    match result {
        Ok(_) => Ok(Member {
            id,
            household_id: *household_id,
            user_id: *user_id,
            joined_at: now,
        }),
        Err(sqlx::Error::Database(e)) if e.message().contains("UNIQUE constraint failed") => {
            Err(MemberError::AlreadyMember)
        }
        Err(sqlx::Error::Database(e)) if e.message().contains("FOREIGN KEY constraint failed") => {
            Err(MemberError::InvalidReference)
        }
        Err(e) => Err(MemberError::DatabaseError(e)),
    }
}

pub async fn is_member(pool: &SqlitePool, household_id: &Uuid, user_id: &Uuid) -> Result<bool, MemberError> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM household_members WHERE household_id = ? AND user_id = ?",
    )
    .bind(household_id.to_string())
    .bind(user_id.to_string())
    .fetch_one(pool)
    .await?;

    Ok(count > 0)
}

pub async fn list_members(pool: &SqlitePool, household_id: &Uuid) -> Result<Vec<MemberWithUser>, MemberError> {
    let members: Vec<MemberRow> = sqlx::query_as(
        "SELECT * FROM household_members WHERE household_id = ? ORDER BY joined_at ASC, rowid ASC",
    )
    .bind(household_id.to_string())
    .fetch_all(pool)
    .await?;

    let mut result = Vec::with_capacity(members.len());
    for m in members {
        let user: UserRow = sqlx::query_as("SELECT * FROM users WHERE id = ?")
            .bind(&m.user_id)
            .fetch_one(pool)
            .await?;

        result.push(MemberWithUser {
            member: m.to_shared()?,
            user: user.to_shared()?,
        });
    }

    Ok(result)
}

pub async fn remove_member(pool: &SqlitePool, household_id: &Uuid, user_id: &Uuid) -> Result<(), MemberError> {
    let result = sqlx::query("DELETE FROM household_members WHERE household_id = ? AND user_id = ?")
        .bind(household_id.to_string())
        .bind(user_id.to_string())
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(MemberError::NotFound);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use crate::services::{fixtures, households, users};

    #[tokio::test]
    async fn test_add_and_list_members() {
        let pool = test_pool().await;
        let owner = fixtures::user(&pool, "sam").await;
        let flatmate = fixtures::user(&pool, "tara").await;
        let household = fixtures::household(&pool, &owner, "Shared house").await;

        let member = add_member(&pool, &household.id, &flatmate.id).await.unwrap();
        assert_eq!(member.household_id, household.id);
        assert_eq!(member.user_id, flatmate.id);

        let members = list_members(&pool, &household.id).await.unwrap();
        let names: Vec<String> = members.iter().map(|m| m.to_string()).collect();
        assert_eq!(names, vec!["sam", "tara"]);
    }

    #[tokio::test]
    async fn test_add_member_twice() {
        let pool = test_pool().await;
        let owner = fixtures::user(&pool, "uma").await;
        let household = fixtures::household(&pool, &owner, "Duplex").await;

        let result = add_member(&pool, &household.id, &owner.id).await;

        assert!(matches!(result, Err(MemberError::AlreadyMember)));
    }

    #[tokio::test]
    async fn test_add_member_unknown_household() {
        let pool = test_pool().await;
        let user = fixtures::user(&pool, "victor").await;

        let result = add_member(&pool, &Uuid::new_v4(), &user.id).await;

        assert!(matches!(result, Err(MemberError::InvalidReference)));
    }

    #[tokio::test]
    async fn test_member_removed_with_household() {
        let pool = test_pool().await;
        let owner = fixtures::user(&pool, "wendy").await;
        let flatmate = fixtures::user(&pool, "xavier").await;
        let household = fixtures::household(&pool, &owner, "Bungalow").await;
        add_member(&pool, &household.id, &flatmate.id).await.unwrap();

        households::delete_household(&pool, &household.id).await.unwrap();

        assert!(!is_member(&pool, &household.id, &flatmate.id).await.unwrap());
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM household_members")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_member_removed_with_user() {
        let pool = test_pool().await;
        let owner = fixtures::user(&pool, "yara").await;
        let flatmate = fixtures::user(&pool, "zoe").await;
        let household = fixtures::household(&pool, &owner, "Houseboat").await;
        add_member(&pool, &household.id, &flatmate.id).await.unwrap();

        users::delete_user(&pool, &flatmate.id, "admin").await.unwrap();

        let members = list_members(&pool, &household.id).await.unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].user.id, owner.id);
    }

    #[tokio::test]
    async fn test_remove_member() {
        let pool = test_pool().await;
        let owner = fixtures::user(&pool, "abel").await;
        let flatmate = fixtures::user(&pool, "bea").await;
        let household = fixtures::household(&pool, &owner, "Villa").await;
        add_member(&pool, &household.id, &flatmate.id).await.unwrap();

        remove_member(&pool, &household.id, &flatmate.id).await.unwrap();
        assert!(!is_member(&pool, &household.id, &flatmate.id).await.unwrap());

        let result = remove_member(&pool, &household.id, &flatmate.id).await;
        assert!(matches!(result, Err(MemberError::NotFound)));
    }
}
