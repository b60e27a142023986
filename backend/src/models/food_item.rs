use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use shared::Package;
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for food items
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct FoodItemRow {
    pub id: String,
    pub food_id: Option<String>,
    pub location_id: String,
    pub quantity: i32,
    pub remarks: String,
    pub expiry_date: Option<NaiveDate>,
    pub threshold: i32,
    pub package: String,
    pub edited_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FoodItemRow {
    pub fn to_shared(&self) -> Result<shared::FoodItem, uuid::Error> {
        Ok(shared::FoodItem {
            id: Uuid::parse_str(&self.id)?,
            food_id: self.food_id.as_deref().map(Uuid::parse_str).transpose()?,
            location_id: Uuid::parse_str(&self.location_id)?,
            quantity: self.quantity,
            remarks: self.remarks.clone(),
            expiry_date: self.expiry_date,
            threshold: self.threshold,
            package: self.package.parse::<Package>().unwrap_or_default(),
            edited_by: Uuid::parse_str(&self.edited_by)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
