pub mod initiator;

pub use initiator::*;
