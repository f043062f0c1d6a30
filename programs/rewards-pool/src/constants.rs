// =============================================================================
// Rewards Pool Constants
// =============================================================================

// PDA Seeds
pub const CONTROLLER_SEED: &[u8] = b"controller";
pub const STAKE_VAULT_SEED: &[u8] = b"stake_vault";
pub const REWARD_VAULT_SEED: &[u8] = b"reward_vault";
pub const STAKER_SEED: &[u8] = b"staker";

/// Maximum number of reward tokens per controller. Staker accounts reserve
/// one checkpoint per reward token.
pub const MAX_REWARD_TOKENS: usize = 8;

/// Layout version written into RewardsPoolController accounts
pub const STATE_VERSION: u8 = 1;
