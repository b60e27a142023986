use chrono::Utc;
use sqlx::SqlitePool;
use thiserror::Error;
use uuid::Uuid;

use crate::models::StorageLocationRow;
use shared::{
    CreateStorageLocationRequest, StorageLocation, UpdateStorageLocationRequest, ValidationError,
};

#[derive(Debug, Error)]
pub enum StorageLocationError {
    #[error("Storage location not found")]
    NotFound,
    #[error("Household or editing user does not exist")]
    InvalidReference,
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("Invalid id: {0}")]
    InvalidId(#[from] uuid::Error),
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

pub async fn create_location(
    pool: &SqlitePool,
    household_id: &Uuid,
    editor_id: &Uuid,
    request: &CreateStorageLocationRequest,
) -> Result<StorageLocation, StorageLocationError> {
    request.validate()?;

    let id = Uuid::new_v4();
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO storage_locations
            (id, household_id, name, storage_temperature, storage_type, edited_by, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(id.to_string())
    .bind(household_id.to_string())
    .bind(&request.name)
    .bind(request.storage_temperature)
    .bind(request.storage_type.as_str())
    .bind(editor_id.to_string())
    .bind(now)
    .bind(now)
    .execute(pool)
    .await;

    match result {
        Ok(_) => Ok(StorageLocation {
            id,
            household_id: *household_id,
            name: request.name.clone(),
            storage_temperature: request.storage_temperature,
            storage_type: request.storage_type,
            edited_by: *editor_id,
            created_at: now,
            updated_at: now,
        }),
        Err(sqlx::Error::Database(e)) if e.message().contains("FOREIGN KEY constraint failed") => {
            Err(StorageLocationError::InvalidReference)
        }
        Err(e) => Err(StorageLocationError::DatabaseError(e)),
    }
}

pub async fn get_location(
    pool: &SqlitePool,
    location_id: &Uuid,
) -> Result<Option<StorageLocation>, StorageLocationError> {
    let location: Option<StorageLocationRow> =
        sqlx::query_as("SELECT * FROM storage_locations WHERE id = ?")
            .bind(location_id.to_string())
            .fetch_optional(pool)
            .await?;

    Ok(location.map(|l| l.to_shared()).transpose()?)
}

pub async fn list_locations(
    pool: &SqlitePool,
    household_id: &Uuid,
) -> Result<Vec<StorageLocation>, StorageLocationError> {
    let locations: Vec<StorageLocationRow> = sqlx::query_as(
        "SELECT * FROM storage_locations WHERE household_id = ? ORDER BY name ASC",
    )
    .bind(household_id.to_string())
    .fetch_all(pool)
    .await?;

    Ok(locations
        .iter()
        .map(|l| l.to_shared())
        .collect::<Result<_, _>>()?)
}

/// Apply `request` and record `editor_id` as the last editor.
pub async fn update_location(
    pool: &SqlitePool,
    location_id: &Uuid,
    editor_id: &Uuid,
    request: &UpdateStorageLocationRequest,
) -> Result<StorageLocation, StorageLocationError> {
    request.validate()?;

    let mut location: StorageLocationRow =
        sqlx::query_as("SELECT * FROM storage_locations WHERE id = ?")
            .bind(location_id.to_string())
            .fetch_optional(pool)
            .await?
            .ok_or(StorageLocationError::NotFound)?;

    if let Some(ref name) = request.name {
        location.name = name.clone();
    }
    if let Some(temperature) = request.storage_temperature {
        location.storage_temperature = temperature;
    }
    if let Some(storage_type) = request.storage_type {
        location.storage_type = storage_type.as_str().to_string();
    }
    location.edited_by = editor_id.to_string();
    location.updated_at = Utc::now();

    let result = sqlx::query(
        r#"
        UPDATE storage_locations
        SET name = ?, storage_temperature = ?, storage_type = ?, edited_by = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&location.name)
    .bind(location.storage_temperature)
    .bind(&location.storage_type)
    .bind(&location.edited_by)
    .bind(location.updated_at)
    .bind(location_id.to_string())
    .execute(pool)
    .await;

    match result {
        Ok(_) => Ok(location.to_shared()?),
        Err(sqlx::Error::Database(e)) if e.message().contains("FOREIGN KEY constraint failed") => {
            Err(StorageLocationError::InvalidReference)
        }
        Err(e) => Err(StorageLocationError::DatabaseError(e)),
    }
}

/// Delete a storage location together with the food items kept in it.
pub async fn delete_location(pool: &SqlitePool, location_id: &Uuid) -> Result<(), StorageLocationError> {
    let result = sqlx::query("DELETE FROM storage_locations WHERE id = ?")
        .bind(location_id.to_string())
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(StorageLocationError::NotFound);
    }

    log::debug!("Deleted storage location {} and its food items", location_id);

    Ok(())
}
