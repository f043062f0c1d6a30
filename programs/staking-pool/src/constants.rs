// =============================================================================
// Staking Pool Constants
// =============================================================================

// =============================================================================
// PDA SEEDS
// =============================================================================

/// Seed for the StakingPool account PDA
/// Full seed: ["staking_pool", token_mint_pubkey]
pub const STAKING_POOL_SEED: &[u8] = b"staking_pool";

/// Seed for the vault token account PDA (holds idle underlying)
/// Full seed: ["vault", staking_pool_pubkey]
pub const VAULT_SEED: &[u8] = b"vault";

/// Seed for a ShareAccount PDA (one per owner per pool)
/// Full seed: ["shares", staking_pool_pubkey, owner_pubkey]
pub const SHARES_SEED: &[u8] = b"shares";

/// Seed for the WrappedToken account PDA
/// Full seed: ["wrapped_token", staking_pool_pubkey]
pub const WRAPPED_TOKEN_SEED: &[u8] = b"wrapped_token";

/// Seed for the wrapped token SPL mint
/// Full seed: ["wrapped_mint", wrapped_token_pubkey]
pub const WRAPPED_MINT_SEED: &[u8] = b"wrapped_mint";

// =============================================================================
// LIST LIMITS
// =============================================================================
// Every list the pool iterates is bounded so a single instruction always fits
// in the compute budget.

/// Maximum number of strategies attached to one pool
pub const MAX_STRATEGIES: usize = 16;

/// Maximum number of fee receivers
pub const MAX_FEES: usize = 8;

/// Accounts each strategy contributes to `remaining_accounts` on deposit and
/// withdraw: [strategy_program, strategy_state, deposit_account, strategy_authority]
pub const ACCOUNTS_PER_STRATEGY: usize = 4;

// =============================================================================
// FEES (basis points, 1 BPS = 0.01%)
// =============================================================================

/// Upper bound on the sum of all fee receivers' basis points (40%)
pub const MAX_TOTAL_FEES_BPS: u32 = 4_000;

// =============================================================================
// SCHEMA
// =============================================================================

/// Layout version written by this program into every state account
pub const STATE_VERSION: u8 = 1;
