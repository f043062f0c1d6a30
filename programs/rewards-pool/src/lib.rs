// =============================================================================
// Rewards Pool
// =============================================================================
//
// Stake one token, earn any number of reward tokens:
// - The controller keeps the staking ledger and the list of reward tokens
// - Each reward token streams to stakers pro rata through its own
//   reward-per-token accumulator
// - Anyone may fund a reward token; stakers withdraw any subset of them
// =============================================================================

pub mod constants;
pub mod error;
pub mod events;
pub mod instructions;
pub mod state;

use anchor_lang::prelude::*;

pub use constants::*;
pub use error::*;
pub use instructions::*;
pub use state::*;

declare_id!("BDvc1TkQmhJYqdWNQRUSpUSHFKV8qfxcx3dTQrfaibYn");

#[program]
pub mod rewards_pool {
    use super::*;

    /// Create a controller and stake vault for a staking mint
    pub fn initialize(ctx: Context<InitializeController>) -> Result<()> {
        instructions::initialize::handler_initialize(ctx)
    }

    // =========================================================================
    // Staker Operations
    // =========================================================================

    pub fn stake(ctx: Context<Stake>, amount: u64) -> Result<()> {
        instructions::stake::handler_stake(ctx, amount)
    }

    pub fn withdraw(ctx: Context<WithdrawStake>, amount: u64) -> Result<()> {
        instructions::stake::handler_withdraw(ctx, amount)
    }

    /// Withdraw settled rewards for the reward tokens at `indices`
    ///
    /// remaining_accounts: `[reward_vault, recipient_token_account]` per index
    pub fn withdraw_rewards<'info>(
        ctx: Context<'_, '_, 'info, 'info, WithdrawRewards<'info>>,
        indices: Vec<u32>,
    ) -> Result<()> {
        instructions::rewards::handler_withdraw_rewards(ctx, indices)
    }

    /// View: withdrawable amount per reward token, in list order
    pub fn withdrawable_rewards(ctx: Context<WithdrawableRewards>, owner: Pubkey) -> Result<Vec<u64>> {
        instructions::rewards::handler_withdrawable_rewards(ctx, owner)
    }

    // =========================================================================
    // Funding
    // =========================================================================

    /// Add `amount` of a reward token for current stakers. Fails when
    /// nothing is staked.
    pub fn distribute_rewards(ctx: Context<DistributeRewards>, index: u32, amount: u64) -> Result<()> {
        instructions::rewards::handler_distribute_rewards(ctx, index, amount)
    }

    // =========================================================================
    // Owner Operations
    // =========================================================================

    pub fn add_token(ctx: Context<AddToken>) -> Result<()> {
        instructions::tokens::handler_add_token(ctx)
    }

    /// Drop a reward token, sweeping its vault to the owner
    pub fn remove_token(ctx: Context<RemoveToken>, index: u32) -> Result<()> {
        instructions::tokens::handler_remove_token(ctx, index)
    }

    pub fn transfer_ownership(ctx: Context<ConfigureController>, new_owner: Pubkey) -> Result<()> {
        instructions::admin::handler_transfer_ownership(ctx, new_owner)
    }

    pub fn migrate(ctx: Context<MigrateController>) -> Result<()> {
        instructions::admin::handler_migrate(ctx)
    }
}
