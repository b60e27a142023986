use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for households
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct HouseholdRow {
    pub id: String,
    pub name: String,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl HouseholdRow {
    pub fn to_shared(&self) -> Result<shared::Household, uuid::Error> {
        Ok(shared::Household {
            id: Uuid::parse_str(&self.id)?,
            name: self.name.clone(),
            owner_id: Uuid::parse_str(&self.owner_id)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
