pub mod users;
pub mod products;
pub mod households;
pub mod members;
pub mod storage_locations;
pub mod food_items;

#[cfg(test)]
pub(crate) mod fixtures;
