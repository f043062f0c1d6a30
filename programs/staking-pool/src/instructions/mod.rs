// =============================================================================
// Instructions Module
// =============================================================================

// Setup
pub mod initialize;
pub mod share_accounts;

// Priority pool operations
pub mod deposit;
pub mod withdraw;

// Rewards initiator operations
pub mod update_strategy_rewards;

// Permissionless operations
pub mod donate;
pub mod wrapped;

// Owner operations
pub mod admin;
pub mod fees;
pub mod strategies;

// The #[derive(Accounts)] macro generates helper types that need to be at crate root
pub use admin::*;
pub use deposit::*;
pub use donate::*;
pub use fees::*;
pub use initialize::*;
pub use share_accounts::*;
pub use strategies::*;
pub use update_strategy_rewards::*;
pub use withdraw::*;
pub use wrapped::*;
