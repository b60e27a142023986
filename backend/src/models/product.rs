use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for catalog products
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ProductRow {
    pub id: String,
    pub name: String,
    pub brand: Option<String>,
    pub image: Option<String>,
    pub weight_per_pack: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ProductRow {
    pub fn to_shared(&self) -> Result<shared::Product, uuid::Error> {
        Ok(shared::Product {
            id: Uuid::parse_str(&self.id)?,
            name: self.name.clone(),
            brand: self.brand.clone(),
            image: self.image.clone(),
            weight_per_pack: self.weight_per_pack.clone(),
            created_at: self.created_at,
        })
    }
}
