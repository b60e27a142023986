pub mod user;
pub mod product;
pub mod household;
pub mod member;
pub mod storage_location;
pub mod food_item;

pub use user::*;
pub use product::*;
pub use household::*;
pub use member::*;
pub use storage_location::*;
pub use food_item::*;
