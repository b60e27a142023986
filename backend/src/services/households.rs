use chrono::Utc;
use sqlx::SqlitePool;
use thiserror::Error;
use uuid::Uuid;

use crate::models::HouseholdRow;
use shared::{CreateHouseholdRequest, Household, UpdateHouseholdRequest, ValidationError};

#[derive(Debug, Error)]
pub enum HouseholdError {
    #[error("Household not found")]
    NotFound,
    #[error("Owner does not exist")]
    UnknownOwner,
    #[error("New owner is not a member of this household")]
    NotAMember,
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("Invalid id: {0}")]
    InvalidId(#[from] uuid::Error),
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Create a household owned by `owner_id`. The owner is enrolled as its
/// first member.
pub async fn create_household(
    pool: &SqlitePool,
    owner_id: &Uuid,
    request: &CreateHouseholdRequest,
) -> Result<Household, HouseholdError> {
    request.validate()?;

    let id = Uuid::new_v4();
    let now = Utc::now();

    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        INSERT INTO households (id, name, owner_id, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(id.to_string())
    .bind(&request.name)
    .bind(owner_id.to_string())
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await;

    match result {
        Ok(_) => {}
        Err(sqlx::Error::Database(e)) if e.message().contains("FOREIGN KEY constraint failed") => {
            return Err(HouseholdError::UnknownOwner);
        }
        Err(e) => return Err(HouseholdError::DatabaseError(e)),
    }

    sqlx::query(
        r#"
        INSERT INTO household_members (id, household_id, user_id, joined_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(id.to_string())
    .bind(owner_id.to_string())
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(Household {
        id,
        name: request.name.clone(),
        owner_id: *owner_id,
        created_at: now,
        updated_at: now,
    })
}

pub async fn get_household(pool: &SqlitePool, household_id: &Uuid) -> Result<Option<Household>, HouseholdError> {
    let household: Option<HouseholdRow> = sqlx::query_as("SELECT * FROM households WHERE id = ?")
        .bind(household_id.to_string())
        .fetch_optional(pool)
        .await?;

    Ok(household.map(|h| h.to_shared()).transpose()?)
}

pub async fn list_households(pool: &SqlitePool) -> Result<Vec<Household>, HouseholdError> {
    let households: Vec<HouseholdRow> = sqlx::query_as("SELECT * FROM households ORDER BY name ASC")
        .fetch_all(pool)
        .await?;

    Ok(households
        .iter()
        .map(|h| h.to_shared())
        .collect::<Result<_, _>>()?)
}

pub async fn list_user_households(pool: &SqlitePool, user_id: &Uuid) -> Result<Vec<Household>, HouseholdError> {
    let households: Vec<HouseholdRow> = sqlx::query_as(
        r#"
        SELECT h.* FROM households h
        JOIN household_members m ON h.id = m.household_id
        WHERE m.user_id = ?
        ORDER BY h.created_at DESC
        "#,
    )
    .bind(user_id.to_string())
    .fetch_all(pool)
    .await?;

    Ok(households
        .iter()
        .map(|h| h.to_shared())
        .collect::<Result<_, _>>()?)
}

pub async fn update_household(
    pool: &SqlitePool,
    household_id: &Uuid,
    request: &UpdateHouseholdRequest,
) -> Result<Household, HouseholdError> {
    request.validate()?;

    let mut household: HouseholdRow = sqlx::query_as("SELECT * FROM households WHERE id = ?")
        .bind(household_id.to_string())
        .fetch_optional(pool)
        .await?
        .ok_or(HouseholdError::NotFound)?;

    if let Some(ref name) = request.name {
        household.name = name.clone();
    }

    let now = Utc::now();
    household.updated_at = now;

    sqlx::query("UPDATE households SET name = ?, updated_at = ? WHERE id = ?")
        .bind(&household.name)
        .bind(now)
        .bind(household_id.to_string())
        .execute(pool)
        .await?;

    Ok(household.to_shared()?)
}

/// Hand the household to another of its members.
pub async fn transfer_ownership(
    pool: &SqlitePool,
    household_id: &Uuid,
    new_owner_id: &Uuid,
) -> Result<Household, HouseholdError> {
    let mut tx = pool.begin().await?;

    let mut household: HouseholdRow = sqlx::query_as("SELECT * FROM households WHERE id = ?")
        .bind(household_id.to_string())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(HouseholdError::NotFound)?;

    let is_member = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM household_members WHERE household_id = ? AND user_id = ?",
    )
    .bind(household_id.to_string())
    .bind(new_owner_id.to_string())
    .fetch_one(&mut *tx)
    .await?;

    if is_member == 0 {
        return Err(HouseholdError::NotAMember);
    }

    let now = Utc::now();
    household.owner_id = new_owner_id.to_string();
    household.updated_at = now;

    sqlx::query("UPDATE households SET owner_id = ?, updated_at = ? WHERE id = ?")
        .bind(&household.owner_id)
        .bind(now)
        .bind(household_id.to_string())
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(household.to_shared()?)
}

/// Delete a household. Members, storage locations and the food items in
/// those locations go with it through the schema's cascades.
pub async fn delete_household(pool: &SqlitePool, household_id: &Uuid) -> Result<(), HouseholdError> {
    let result = sqlx::query("DELETE FROM households WHERE id = ?")
        .bind(household_id.to_string())
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(HouseholdError::NotFound);
    }

    log::debug!("Deleted household {} and its inventory", household_id);

    Ok(())
}
