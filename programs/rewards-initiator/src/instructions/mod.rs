pub mod admin;
pub mod initialize;
pub mod upkeep;

pub use admin::*;
pub use initialize::*;
pub use upkeep::*;
