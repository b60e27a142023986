use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::StorageType;
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for storage locations
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct StorageLocationRow {
    pub id: String,
    pub household_id: String,
    pub name: String,
    pub storage_temperature: Option<i32>,
    pub storage_type: String,
    pub edited_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StorageLocationRow {
    pub fn to_shared(&self) -> Result<shared::StorageLocation, uuid::Error> {
        Ok(shared::StorageLocation {
            id: Uuid::parse_str(&self.id)?,
            household_id: Uuid::parse_str(&self.household_id)?,
            name: self.name.clone(),
            storage_temperature: self.storage_temperature,
            storage_type: self.storage_type.parse::<StorageType>().unwrap_or_default(),
            edited_by: Uuid::parse_str(&self.edited_by)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
