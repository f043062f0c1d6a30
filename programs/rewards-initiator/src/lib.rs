// =============================================================================
// Rewards Initiator
// =============================================================================
//
// Decides when a staking pool reconciles its strategies. Holds the pool's
// rewards initiator role through its PDA and signs the reconciliation CPI.
//
// - Keepers poll check_upkeep and call perform_upkeep to recognise losses
//   promptly, so nobody withdraws at a stale, too-high rate
// - Whitelisted callers realise rewards in batches through update_rewards
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

declare_id!("G35vmqZdcgPdgApnQREhPqrYyfknEHFag1Kne6PZdkPP");

#[program]
pub mod rewards_initiator {
    use super::*;

    /// Create the initiator for a staking pool (pool owner only)
    pub fn initialize(
        ctx: Context<InitializeRewardsInitiator>,
        distribution_controller: Pubkey,
    ) -> Result<()> {
        instructions::initialize::handler_initialize(ctx, distribution_controller)
    }

    // =========================================================================
    // Automation
    // =========================================================================

    /// View: which strategies lost value since their last reconciliation
    ///
    /// remaining_accounts: every strategy state of the pool, in list order
    pub fn check_upkeep<'info>(
        ctx: Context<'_, '_, 'info, 'info, CheckUpkeep<'info>>,
    ) -> Result<UpkeepCheck> {
        instructions::upkeep::handler_check_upkeep(ctx)
    }

    /// Reconcile the strategies listed in `perform_data`; fails unless their
    /// aggregate deposit change is negative
    pub fn perform_upkeep<'info>(
        ctx: Context<'_, '_, 'info, 'info, Reconcile<'info>>,
        perform_data: Vec<u8>,
    ) -> Result<()> {
        instructions::upkeep::handler_perform_upkeep(ctx, perform_data)
    }

    // =========================================================================
    // Whitelisted Callers
    // =========================================================================

    /// Reconcile any subset of strategies, rewards included
    pub fn update_rewards<'info>(
        ctx: Context<'_, '_, 'info, 'info, Reconcile<'info>>,
        indices: Vec<u32>,
        data: Vec<u8>,
    ) -> Result<()> {
        instructions::upkeep::handler_update_rewards(ctx, indices, data)
    }

    // =========================================================================
    // Owner Operations
    // =========================================================================

    pub fn whitelist_caller(
        ctx: Context<ConfigureInitiator>,
        caller: Pubkey,
        allowed: bool,
    ) -> Result<()> {
        instructions::admin::handler_whitelist_caller(ctx, caller, allowed)
    }

    pub fn set_distribution_controller(
        ctx: Context<ConfigureInitiator>,
        distribution_controller: Pubkey,
    ) -> Result<()> {
        instructions::admin::handler_set_distribution_controller(ctx, distribution_controller)
    }

    pub fn transfer_ownership(ctx: Context<ConfigureInitiator>, new_owner: Pubkey) -> Result<()> {
        instructions::admin::handler_transfer_ownership(ctx, new_owner)
    }

    pub fn migrate(ctx: Context<MigrateInitiator>) -> Result<()> {
        instructions::admin::handler_migrate(ctx)
    }
}
