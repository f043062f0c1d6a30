pub mod controller;
pub mod staker;

pub use controller::*;
pub use staker::*;
