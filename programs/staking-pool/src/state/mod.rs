// =============================================================================
// State Module
// =============================================================================
// Account structures owned by the staking pool program:
// - StakingPool:  share ledger totals, fee list, strategy list, roles
// - ShareAccount: one owner's pool shares
// - WrappedToken: non-rebasing wrapper over pool balance
// =============================================================================

pub mod pool;
pub mod share_account;
pub mod wrapped_token;

pub use pool::*;
pub use share_account::*;
pub use wrapped_token::*;
