use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Maximum length of household and storage location names.
pub const MAX_NAME_LEN: usize = 50;

/// Maximum length of food item remarks.
pub const MAX_REMARKS_LEN: usize = 600;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Name must not be blank")]
    BlankName,
    #[error("Name must be at most {max} characters")]
    NameTooLong { max: usize },
    #[error("Remarks must be at most {max} characters")]
    RemarksTooLong { max: usize },
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::BlankName);
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::NameTooLong { max: MAX_NAME_LEN });
    }
    Ok(())
}

fn validate_remarks(remarks: &str) -> Result<(), ValidationError> {
    if remarks.chars().count() > MAX_REMARKS_LEN {
        return Err(ValidationError::RemarksTooLong { max: MAX_REMARKS_LEN });
    }
    Ok(())
}

/// Deserialize a present field into `Some`, so that an explicit `null`
/// becomes `Some(None)` while a missing field stays `None`.
fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

// ============================================================================
// User Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
}

// ============================================================================
// Product Types
// ============================================================================

/// Catalog entry a food item can point at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub brand: Option<String>,
    pub image: Option<String>,
    pub weight_per_pack: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub brand: Option<String>,
    pub image: Option<String>,
    pub weight_per_pack: Option<String>,
}

// ============================================================================
// Household Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Household {
    pub id: Uuid,
    pub name: String,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl fmt::Display for Household {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateHouseholdRequest {
    pub name: String,
}

impl CreateHouseholdRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name(&self.name)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateHouseholdRequest {
    pub name: Option<String>,
}

impl UpdateHouseholdRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.name {
            Some(ref name) => validate_name(name),
            None => Ok(()),
        }
    }
}

// ============================================================================
// Member Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: Uuid,
    pub household_id: Uuid,
    pub user_id: Uuid,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberWithUser {
    pub member: Member,
    pub user: User,
}

impl fmt::Display for MemberWithUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.user.username)
    }
}

// ============================================================================
// Storage Location Types
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StorageType {
    Cabinet,
    #[default]
    Cupboard,
    CounterTop,
    Fridge,
    Freezer,
    Pantry,
    Others,
}

impl StorageType {
    pub const ALL: [StorageType; 7] = [
        StorageType::Cabinet,
        StorageType::Cupboard,
        StorageType::CounterTop,
        StorageType::Fridge,
        StorageType::Freezer,
        StorageType::Pantry,
        StorageType::Others,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageType::Cabinet => "cabinet",
            StorageType::Cupboard => "cupboard",
            StorageType::CounterTop => "counter-top",
            StorageType::Fridge => "fridge",
            StorageType::Freezer => "freezer",
            StorageType::Pantry => "pantry",
            StorageType::Others => "others",
        }
    }

    /// Human readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            StorageType::Cabinet => "Cabinet",
            StorageType::Cupboard => "Cupboard",
            StorageType::CounterTop => "Counter",
            StorageType::Fridge => "Refrigerator",
            StorageType::Freezer => "Freezer",
            StorageType::Pantry => "Pantry",
            StorageType::Others => "Others",
        }
    }
}

impl FromStr for StorageType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cabinet" => Ok(StorageType::Cabinet),
            "cupboard" => Ok(StorageType::Cupboard),
            "counter-top" => Ok(StorageType::CounterTop),
            "fridge" => Ok(StorageType::Fridge),
            "freezer" => Ok(StorageType::Freezer),
            "pantry" => Ok(StorageType::Pantry),
            "others" => Ok(StorageType::Others),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageLocation {
    pub id: Uuid,
    pub household_id: Uuid,
    pub name: String,
    /// Degrees Celsius
    pub storage_temperature: Option<i32>,
    pub storage_type: StorageType,
    pub edited_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl fmt::Display for StorageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateStorageLocationRequest {
    pub name: String,
    pub storage_temperature: Option<i32>,
    #[serde(default)]
    pub storage_type: StorageType,
}

impl CreateStorageLocationRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name(&self.name)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateStorageLocationRequest {
    pub name: Option<String>,
    /// `Some(None)` clears the temperature
    #[serde(default, deserialize_with = "deserialize_some", skip_serializing_if = "Option::is_none")]
    pub storage_temperature: Option<Option<i32>>,
    pub storage_type: Option<StorageType>,
}

impl UpdateStorageLocationRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.name {
            Some(ref name) => validate_name(name),
            None => Ok(()),
        }
    }
}

// ============================================================================
// Food Item Types
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Package {
    Bar,
    Bottle,
    Box,
    #[default]
    Pack,
    Roll,
    Tin,
}

impl Package {
    pub const ALL: [Package; 6] = [
        Package::Bar,
        Package::Bottle,
        Package::Box,
        Package::Pack,
        Package::Roll,
        Package::Tin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Package::Bar => "bar",
            Package::Bottle => "bottle",
            Package::Box => "box",
            Package::Pack => "pack",
            Package::Roll => "roll",
            Package::Tin => "tin",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Package::Bar => "Bar",
            Package::Bottle => "Bottle",
            Package::Box => "Box",
            Package::Pack => "Pack",
            Package::Roll => "Roll",
            Package::Tin => "Tin",
        }
    }
}

impl FromStr for Package {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bar" => Ok(Package::Bar),
            "bottle" => Ok(Package::Bottle),
            "box" => Ok(Package::Box),
            "pack" => Ok(Package::Pack),
            "roll" => Ok(Package::Roll),
            "tin" => Ok(Package::Tin),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodItem {
    pub id: Uuid,
    /// Linked catalog product, cleared when the product is deleted
    pub food_id: Option<Uuid>,
    pub location_id: Uuid,
    /// Number of packages
    pub quantity: i32,
    pub remarks: String,
    pub expiry_date: Option<NaiveDate>,
    /// Days before expiry at which the item is flagged
    pub threshold: i32,
    pub package: Package,
    pub edited_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A food item together with the records it references.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodItemDetails {
    pub item: FoodItem,
    pub food: Option<Product>,
    pub editor: User,
}

impl fmt::Display for FoodItemDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.food {
            Some(ref food) => write!(f, "{} bought by {}", food.name, self.editor.username),
            None => write!(f, "unknown food bought by {}", self.editor.username),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFoodItemRequest {
    pub food_id: Option<Uuid>,
    pub quantity: i32,
    #[serde(default)]
    pub remarks: String,
    pub expiry_date: Option<NaiveDate>,
    pub threshold: i32,
    #[serde(default)]
    pub package: Package,
}

impl CreateFoodItemRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_remarks(&self.remarks)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateFoodItemRequest {
    /// `Some(None)` unlinks the product
    #[serde(default, deserialize_with = "deserialize_some", skip_serializing_if = "Option::is_none")]
    pub food_id: Option<Option<Uuid>>,
    /// Must belong to the same household as the current location
    pub location_id: Option<Uuid>,
    pub quantity: Option<i32>,
    pub remarks: Option<String>,
    /// `Some(None)` clears the expiry date
    #[serde(default, deserialize_with = "deserialize_some", skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<Option<NaiveDate>>,
    pub threshold: Option<i32>,
    pub package: Option<Package>,
}

impl UpdateFoodItemRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.remarks {
            Some(ref remarks) => validate_remarks(remarks),
            None => Ok(()),
        }
    }
}
