pub mod expiry;
pub mod types;

pub use expiry::*;
pub use types::*;
