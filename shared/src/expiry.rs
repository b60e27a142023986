//! Values derived from a food item's expiry date and linked product.
//!
//! Nothing here is stored. Every computation takes the reference day as an
//! argument; use [`today`] for the local calendar date.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{FoodItem, FoodItemDetails};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ExpiryError {
    #[error("Food item has no expiry date")]
    NoExpiryDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProductLinkError {
    #[error("Food item is not linked to a product")]
    Unlinked,
}

/// Where an item stands relative to its expiry date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryStatus {
    Fresh,
    NearExpiry,
    Expired,
}

/// The current local calendar date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

impl FoodItem {
    /// Signed number of whole days from `today` until the expiry date.
    /// Negative once the date has passed.
    pub fn days_until_expiry(&self, today: NaiveDate) -> Result<i64, ExpiryError> {
        let expiry_date = self.expiry_date.ok_or(ExpiryError::NoExpiryDate)?;
        Ok(expiry_date.signed_duration_since(today).num_days())
    }

    pub fn hit_threshold(&self, today: NaiveDate) -> Result<bool, ExpiryError> {
        Ok(self.days_until_expiry(today)? <= i64::from(self.threshold))
    }

    /// An item is considered expired on its expiry date itself.
    pub fn is_expired(&self, today: NaiveDate) -> Result<bool, ExpiryError> {
        Ok(self.days_until_expiry(today)? <= 0)
    }

    pub fn expiry_status(&self, today: NaiveDate) -> Result<ExpiryStatus, ExpiryError> {
        if self.is_expired(today)? {
            Ok(ExpiryStatus::Expired)
        } else if self.hit_threshold(today)? {
            Ok(ExpiryStatus::NearExpiry)
        } else {
            Ok(ExpiryStatus::Fresh)
        }
    }
}

impl FoodItemDetails {
    pub fn food_name(&self) -> Result<&str, ProductLinkError> {
        self.food
            .as_ref()
            .map(|food| food.name.as_str())
            .ok_or(ProductLinkError::Unlinked)
    }

    pub fn food_image(&self) -> Result<Option<&str>, ProductLinkError> {
        self.food
            .as_ref()
            .map(|food| food.image.as_deref())
            .ok_or(ProductLinkError::Unlinked)
    }

    pub fn food_brand(&self) -> Result<Option<&str>, ProductLinkError> {
        self.food
            .as_ref()
            .map(|food| food.brand.as_deref())
            .ok_or(ProductLinkError::Unlinked)
    }

    pub fn food_weight(&self) -> Result<Option<&str>, ProductLinkError> {
        self.food
            .as_ref()
            .map(|food| food.weight_per_pack.as_deref())
            .ok_or(ProductLinkError::Unlinked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Package, Product, User};
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn item(expiry_in_days: Option<i64>, threshold: i32) -> FoodItem {
        let now = Utc::now();
        FoodItem {
            id: Uuid::new_v4(),
            food_id: None,
            location_id: Uuid::new_v4(),
            quantity: 1,
            remarks: String::new(),
            expiry_date: expiry_in_days.map(|days| day() + Duration::days(days)),
            threshold,
            package: Package::Pack,
            edited_by: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        }
    }

    fn details(food: Option<Product>) -> FoodItemDetails {
        let now = Utc::now();
        FoodItemDetails {
            item: item(Some(1), 1),
            food,
            editor: User {
                id: Uuid::new_v4(),
                username: "bob".to_string(),
                email: "bob@example.com".to_string(),
                created_at: now,
                updated_at: now,
            },
        }
    }

    #[test]
    fn test_days_until_expiry() {
        assert_eq!(item(Some(5), 2).days_until_expiry(day()), Ok(5));
        assert_eq!(item(Some(-3), 2).days_until_expiry(day()), Ok(-3));
        assert_eq!(item(Some(0), 2).days_until_expiry(day()), Ok(0));
    }

    #[test]
    fn test_days_until_expiry_across_month_boundary() {
        let mut food = item(None, 0);
        food.expiry_date = NaiveDate::from_ymd_opt(2024, 3, 1);
        let today = NaiveDate::from_ymd_opt(2024, 2, 28).unwrap();

        // 2024 is a leap year
        assert_eq!(food.days_until_expiry(today), Ok(2));
    }

    #[test]
    fn test_hit_threshold() {
        assert_eq!(item(Some(5), 5).hit_threshold(day()), Ok(true));
        assert_eq!(item(Some(6), 5).hit_threshold(day()), Ok(false));
        assert_eq!(item(Some(-1), 0).hit_threshold(day()), Ok(true));
    }

    #[test]
    fn test_is_expired() {
        assert_eq!(item(Some(0), 3).is_expired(day()), Ok(true));
        assert_eq!(item(Some(-4), 3).is_expired(day()), Ok(true));
        assert_eq!(item(Some(1), 3).is_expired(day()), Ok(false));
    }

    #[test]
    fn test_expiry_status() {
        assert_eq!(item(Some(10), 3).expiry_status(day()), Ok(ExpiryStatus::Fresh));
        assert_eq!(item(Some(3), 3).expiry_status(day()), Ok(ExpiryStatus::NearExpiry));
        assert_eq!(item(Some(0), 3).expiry_status(day()), Ok(ExpiryStatus::Expired));
    }

    #[test]
    fn test_missing_expiry_date_is_an_error() {
        let food = item(None, 3);

        assert_eq!(food.days_until_expiry(day()), Err(ExpiryError::NoExpiryDate));
        assert_eq!(food.hit_threshold(day()), Err(ExpiryError::NoExpiryDate));
        assert_eq!(food.is_expired(day()), Err(ExpiryError::NoExpiryDate));
        assert_eq!(food.expiry_status(day()), Err(ExpiryError::NoExpiryDate));
    }

    #[test]
    fn test_product_pass_through() {
        let linked = details(Some(Product {
            id: Uuid::new_v4(),
            name: "Oat milk".to_string(),
            brand: Some("Oatly".to_string()),
            image: Some("products/oat-milk.png".to_string()),
            weight_per_pack: None,
            created_at: Utc::now(),
        }));

        assert_eq!(linked.food_name(), Ok("Oat milk"));
        assert_eq!(linked.food_brand(), Ok(Some("Oatly")));
        assert_eq!(linked.food_image(), Ok(Some("products/oat-milk.png")));
        assert_eq!(linked.food_weight(), Ok(None));
    }

    #[test]
    fn test_pass_through_without_product() {
        let unlinked = details(None);

        assert_eq!(unlinked.food_name(), Err(ProductLinkError::Unlinked));
        assert_eq!(unlinked.food_image(), Err(ProductLinkError::Unlinked));
        assert_eq!(unlinked.food_brand(), Err(ProductLinkError::Unlinked));
        assert_eq!(unlinked.food_weight(), Err(ProductLinkError::Unlinked));
    }
}
