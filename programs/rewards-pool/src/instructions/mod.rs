pub mod admin;
pub mod initialize;
pub mod rewards;
pub mod stake;
pub mod tokens;

pub use admin::*;
pub use initialize::*;
pub use rewards::*;
pub use stake::*;
pub use tokens::*;
