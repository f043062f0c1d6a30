// =============================================================================
// Rewards Initiator Constants
// =============================================================================

/// Seed for the RewardsInitiator PDA, which holds the rewards initiator role
/// on its staking pool
/// Full seed: ["rewards_initiator", staking_pool_pubkey]
pub const REWARDS_INITIATOR_SEED: &[u8] = b"rewards_initiator";

/// Maximum number of whitelisted manual callers
pub const MAX_WHITELIST: usize = 16;

/// Layout version written into RewardsInitiator accounts
pub const STATE_VERSION: u8 = 1;
