use chrono::Utc;
use sqlx::SqlitePool;
use thiserror::Error;
use uuid::Uuid;

use crate::models::ProductRow;
use shared::{CreateProductRequest, Product};

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Product not found")]
    NotFound,
    #[error("Invalid id: {0}")]
    InvalidId(#[from] uuid::Error),
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

pub async fn create_product(
    pool: &SqlitePool,
    request: &CreateProductRequest,
) -> Result<Product, ProductError> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO products (id, name, brand, image, weight_per_pack, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(id.to_string())
    .bind(&request.name)
    .bind(&request.brand)
    .bind(&request.image)
    .bind(&request.weight_per_pack)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(Product {
        id,
        name: request.name.clone(),
        brand: request.brand.clone(),
        image: request.image.clone(),
        weight_per_pack: request.weight_per_pack.clone(),
        created_at: now,
    })
}

pub async fn get_product(pool: &SqlitePool, product_id: &Uuid) -> Result<Option<Product>, ProductError> {
    let product: Option<ProductRow> = sqlx::query_as("SELECT * FROM products WHERE id = ?")
        .bind(product_id.to_string())
        .fetch_optional(pool)
        .await?;

    Ok(product.map(|p| p.to_shared()).transpose()?)
}

/// Delete a catalog product. Food items pointing at it keep existing with
/// their product link cleared.
pub async fn delete_product(pool: &SqlitePool, product_id: &Uuid) -> Result<(), ProductError> {
    let result = sqlx::query("DELETE FROM products WHERE id = ?")
        .bind(product_id.to_string())
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ProductError::NotFound);
    }

    Ok(())
}
