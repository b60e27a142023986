use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{FoodItemRow, ProductRow, UserRow};
use shared::{
    CreateFoodItemRequest, FoodItem, FoodItemDetails, UpdateFoodItemRequest, ValidationError,
};

#[derive(Debug, Error)]
pub enum FoodItemError {
    #[error("Food item not found")]
    NotFound,
    #[error("Product, storage location or editing user does not exist")]
    InvalidReference,
    #[error("Storage location belongs to another household")]
    ForeignLocation,
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("Invalid id: {0}")]
    InvalidId(#[from] uuid::Error),
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

pub async fn create_item(
    pool: &SqlitePool,
    location_id: &Uuid,
    editor_id: &Uuid,
    request: &CreateFoodItemRequest,
) -> Result<FoodItem, FoodItemError> {
    request.validate()?;

    let id = Uuid::new_v4();
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO food_items
            (id, food_id, location_id, quantity, remarks, expiry_date, threshold, package, edited_by, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(id.to_string())
    .bind(request.food_id.map(|id| id.to_string()))
    .bind(location_id.to_string())
    .bind(request.quantity)
    .bind(&request.remarks)
    .bind(request.expiry_date)
    .bind(request.threshold)
    .bind(request.package.as_str())
    .bind(editor_id.to_string())
    .bind(now)
    .bind(now)
    .execute(pool)
    .await;

    match result {
        Ok(_) => Ok(FoodItem {
            id,
            food_id: request.food_id,
            location_id: *location_id,
            quantity: request.quantity,
            remarks: request.remarks.clone(),
            expiry_date: request.expiry_date,
            threshold: request.threshold,
            package: request.package,
            edited_by: *editor_id,
            created_at: now,
            updated_at: now,
        }),
        Err(sqlx::Error::Database(e)) if e.message().contains("FOREIGN KEY constraint failed") => {
            Err(FoodItemError::InvalidReference)
        }
        Err(e) => Err(FoodItemError::DatabaseError(e)),
    }
}

pub async fn get_item(pool: &SqlitePool, item_id: &Uuid) -> Result<Option<FoodItem>, FoodItemError> {
    let item: Option<FoodItemRow> = sqlx::query_as("SELECT * FROM food_items WHERE id = ?")
        .bind(item_id.to_string())
        .fetch_optional(pool)
        .await?;

    Ok(item.map(|i| i.to_shared()).transpose()?)
}

/// Load an item along with its product and last editor.
pub async fn get_item_details(
    pool: &SqlitePool,
    item_id: &Uuid,
) -> Result<Option<FoodItemDetails>, FoodItemError> {
    match get_item(pool, item_id).await? {
        Some(item) => Ok(Some(load_details(pool, item).await?)),
        None => Ok(None),
    }
}

async fn load_details(pool: &SqlitePool, item: FoodItem) -> Result<FoodItemDetails, FoodItemError> {
    let food = match item.food_id {
        Some(food_id) => {
            let product: Option<ProductRow> = sqlx::query_as("SELECT * FROM products WHERE id = ?")
                .bind(food_id.to_string())
                .fetch_optional(pool)
                .await?;
            product.map(|p| p.to_shared()).transpose()?
        }
        None => None,
    };

    let editor: UserRow = sqlx::query_as("SELECT * FROM users WHERE id = ?")
        .bind(item.edited_by.to_string())
        .fetch_one(pool)
        .await?;

    Ok(FoodItemDetails {
        item,
        food,
        editor: editor.to_shared()?,
    })
}

/// Items in one storage location, soonest expiry first. Items without an
/// expiry date come last.
pub async fn list_items(pool: &SqlitePool, location_id: &Uuid) -> Result<Vec<FoodItem>, FoodItemError> {
    let items: Vec<FoodItemRow> = sqlx::query_as(
        r#"
        SELECT * FROM food_items
        WHERE location_id = ?
        ORDER BY expiry_date IS NULL, expiry_date ASC, created_at ASC
        "#,
    )
    .bind(location_id.to_string())
    .fetch_all(pool)
    .await?;

    Ok(items
        .iter()
        .map(|i| i.to_shared())
        .collect::<Result<_, _>>()?)
}

pub async fn list_household_items(
    pool: &SqlitePool,
    household_id: &Uuid,
) -> Result<Vec<FoodItem>, FoodItemError> {
    let items: Vec<FoodItemRow> = sqlx::query_as(
        r#"
        SELECT f.* FROM food_items f
        JOIN storage_locations l ON f.location_id = l.id
        WHERE l.household_id = ?
        ORDER BY f.expiry_date IS NULL, f.expiry_date ASC, f.created_at ASC
        "#,
    )
    .bind(household_id.to_string())
    .fetch_all(pool)
    .await?;

    Ok(items
        .iter()
        .map(|i| i.to_shared())
        .collect::<Result<_, _>>()?)
}

/// Items of a household whose warning threshold is reached on `today`,
/// expired ones included, soonest expiry first.
pub async fn list_expiring_items(
    pool: &SqlitePool,
    household_id: &Uuid,
    today: NaiveDate,
) -> Result<Vec<FoodItemDetails>, FoodItemError> {
    let items = list_household_items(pool, household_id).await?;

    let mut expiring = Vec::new();
    for item in items {
        // Items without an expiry date never reach their threshold
        if item.hit_threshold(today) == Ok(true) {
            expiring.push(load_details(pool, item).await?);
        }
    }

    Ok(expiring)
}

/// Apply `request` and record `editor_id` as the last editor.
pub async fn update_item(
    pool: &SqlitePool,
    item_id: &Uuid,
    editor_id: &Uuid,
    request: &UpdateFoodItemRequest,
) -> Result<FoodItem, FoodItemError> {
    request.validate()?;

    let mut item: FoodItemRow = sqlx::query_as("SELECT * FROM food_items WHERE id = ?")
        .bind(item_id.to_string())
        .fetch_optional(pool)
        .await?
        .ok_or(FoodItemError::NotFound)?;

    if let Some(food_id) = request.food_id {
        item.food_id = food_id.map(|id| id.to_string());
    }
    if let Some(location_id) = request.location_id {
        let location_id = location_id.to_string();
        if location_id != item.location_id {
            ensure_same_household(pool, &item.location_id, &location_id).await?;
        }
        item.location_id = location_id;
    }
    if let Some(quantity) = request.quantity {
        item.quantity = quantity;
    }
    if let Some(ref remarks) = request.remarks {
        item.remarks = remarks.clone();
    }
    if let Some(expiry_date) = request.expiry_date {
        item.expiry_date = expiry_date;
    }
    if let Some(threshold) = request.threshold {
        item.threshold = threshold;
    }
    if let Some(package) = request.package {
        item.package = package.as_str().to_string();
    }
    item.edited_by = editor_id.to_string();
    item.updated_at = Utc::now();

    let result = sqlx::query(
        r#"
        UPDATE food_items
        SET food_id = ?, location_id = ?, quantity = ?, remarks = ?, expiry_date = ?,
            threshold = ?, package = ?, edited_by = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&item.food_id)
    .bind(&item.location_id)
    .bind(item.quantity)
    .bind(&item.remarks)
    .bind(item.expiry_date)
    .bind(item.threshold)
    .bind(&item.package)
    .bind(&item.edited_by)
    .bind(item.updated_at)
    .bind(item_id.to_string())
    .execute(pool)
    .await;

    match result {
        Ok(_) => Ok(item.to_shared()?),
        Err(sqlx::Error::Database(e)) if e.message().contains("FOREIGN KEY constraint failed") => {
            Err(FoodItemError::InvalidReference)
        }
        Err(e) => Err(FoodItemError::DatabaseError(e)),
    }
}

/// Items only move between storage locations of the same household.
async fn ensure_same_household(pool: &SqlitePool, from: &str, to: &str) -> Result<(), FoodItemError> {
    let target: String = sqlx::query_scalar("SELECT household_id FROM storage_locations WHERE id = ?")
        .bind(to)
        .fetch_optional(pool)
        .await?
        .ok_or(FoodItemError::InvalidReference)?;

    let current: String = sqlx::query_scalar("SELECT household_id FROM storage_locations WHERE id = ?")
        .bind(from)
        .fetch_one(pool)
        .await?;

    if target != current {
        return Err(FoodItemError::ForeignLocation);
    }

    Ok(())
}

pub async fn delete_item(pool: &SqlitePool, item_id: &Uuid) -> Result<(), FoodItemError> {
    let result = sqlx::query("DELETE FROM food_items WHERE id = ?")
        .bind(item_id.to_string())
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(FoodItemError::NotFound);
    }

    Ok(())
}
