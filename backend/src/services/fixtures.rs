//! Record builders shared by the service tests.

use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::services::{food_items, households, products, storage_locations, users};
use shared::{
    CreateFoodItemRequest, CreateHouseholdRequest, CreateProductRequest,
    CreateStorageLocationRequest, FoodItem, Household, Package, Product, StorageLocation,
    StorageType, User,
};

pub async fn user(pool: &SqlitePool, username: &str) -> User {
    users::create_user(
        pool,
        &shared::CreateUserRequest {
            username: username.to_string(),
            email: format!("{}@example.com", username),
        },
    )
    .await
    .unwrap()
}

pub async fn household(pool: &SqlitePool, owner: &User, name: &str) -> Household {
    households::create_household(
        pool,
        &owner.id,
        &CreateHouseholdRequest {
            name: name.to_string(),
        },
    )
    .await
    .unwrap()
}

pub async fn location(
    pool: &SqlitePool,
    household: &Household,
    editor: &User,
    name: &str,
) -> StorageLocation {
    storage_locations::create_location(
        pool,
        &household.id,
        &editor.id,
        &CreateStorageLocationRequest {
            name: name.to_string(),
            storage_temperature: None,
            storage_type: StorageType::Cupboard,
        },
    )
    .await
    .unwrap()
}

pub async fn product(pool: &SqlitePool, name: &str) -> Product {
    products::create_product(
        pool,
        &CreateProductRequest {
            name: name.to_string(),
            brand: Some("Acme".to_string()),
            image: None,
            weight_per_pack: Some("250g".to_string()),
        },
    )
    .await
    .unwrap()
}

pub async fn item(
    pool: &SqlitePool,
    location: &StorageLocation,
    editor: &User,
    expiry_date: Option<NaiveDate>,
) -> FoodItem {
    food_items::create_item(
        pool,
        &location.id,
        &editor.id,
        &CreateFoodItemRequest {
            food_id: None,
            quantity: 1,
            remarks: String::new(),
            expiry_date,
            threshold: 3,
            package: Package::Pack,
        },
    )
    .await
    .unwrap()
}
