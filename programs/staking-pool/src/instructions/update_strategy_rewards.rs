// =============================================================================
// Update Strategy Rewards Instruction
// =============================================================================
// Reconciles the deposit change of a caller-chosen subset of strategies into
// the share ledger. Only the rewards initiator may call it.
//
// - Rewards (net change > 0) raise total_staked and mint fee shares
// - Slashing (net change < 0) lowers total_staked; every holder shares the loss
// - Each given strategy's cached total is reset to what it reports now
//
// remaining_accounts:
//   [strategy_state; indices.len()]   one per index, same order as `indices`
//   [fee ShareAccount; fees.len()]    one per fee receiver, fee-list order
// =============================================================================

use anchor_lang::prelude::*;
use shared_lib::{Role, Versioned};

use crate::constants::*;
use crate::error::StakingPoolError;
use crate::events::StrategyRewardsUpdatedEvent;
use crate::state::{ShareAccount, StakingPool, StrategyRewards};
use crate::strategy;

#[derive(Accounts)]
pub struct UpdateStrategyRewards<'info> {
    /// Must hold the rewards initiator role
    pub rewards_initiator: Signer<'info>,

    #[account(
        mut,
        seeds = [STAKING_POOL_SEED, pool.token_mint.as_ref()],
        bump = pool.bump,
        constraint = pool.is_current() @ StakingPoolError::SchemaVersionMismatch
    )]
    pub pool: Box<Account<'info, StakingPool>>,
}

#[derive(Accounts)]
pub struct GetStrategyRewards<'info> {
    #[account(
        seeds = [STAKING_POOL_SEED, pool.token_mint.as_ref()],
        bump = pool.bump
    )]
    pub pool: Box<Account<'info, StakingPool>>,
}

/// Read the reported total of each indexed strategy from its state account
fn collect_reports(
    pool: &StakingPool,
    pool_key: &Pubkey,
    indices: &[u32],
    states: &[AccountInfo],
) -> Result<Vec<(u32, u64)>> {
    require!(
        states.len() >= indices.len(),
        StakingPoolError::InvalidRemainingAccounts
    );

    indices
        .iter()
        .zip(states)
        .map(|(&index, state)| {
            let entry = pool.strategy(index)?;
            Ok((index, strategy::read_report(state, entry, pool_key)?.total_deposits))
        })
        .collect()
}

pub fn handler_update_strategy_rewards<'info>(
    ctx: Context<'_, '_, 'info, 'info, UpdateStrategyRewards<'info>>,
    indices: Vec<u32>,
    data: Vec<u8>,
) -> Result<()> {
    require!(
        ctx.accounts
            .pool
            .access
            .permits(Role::RewardsInitiator, &ctx.accounts.rewards_initiator.key()),
        StakingPoolError::Unauthorized
    );

    let pool_key = ctx.accounts.pool.key();
    let fee_count = ctx.accounts.pool.fees.len();

    require!(
        ctx.remaining_accounts.len() == indices.len() + fee_count,
        StakingPoolError::InvalidRemainingAccounts
    );
    ctx.accounts.pool.validate_indices(&indices)?;

    let (states, fee_accounts) = ctx.remaining_accounts.split_at(indices.len());

    // =========================================================================
    // Reconcile
    // =========================================================================

    let reports = collect_reports(&ctx.accounts.pool, &pool_key, &indices, states)?;
    let fees = ctx.accounts.pool.fees.clone();
    let outcome = ctx.accounts.pool.reconcile(&reports)?;

    // =========================================================================
    // Credit Fee Shares
    // =========================================================================

    for ((fee, info), &shares) in fees.iter().zip(fee_accounts).zip(&outcome.fee_shares) {
        let mut share_account = Account::<ShareAccount>::try_from(info)?;
        require_keys_eq!(share_account.pool, pool_key, StakingPoolError::InvalidFeeReceiver);
        require_keys_eq!(
            share_account.owner,
            fee.receiver,
            StakingPoolError::InvalidFeeReceiver
        );

        if shares > 0 {
            share_account.credit(shares)?;
            share_account.exit(&crate::ID)?;
            msg!("Fee receiver {} minted {} shares", fee.receiver, shares);
        }
    }

    // =========================================================================
    // Log Results
    // =========================================================================

    let pool = &ctx.accounts.pool;
    let fee_shares: u64 = outcome.fee_shares.iter().sum();

    emit!(StrategyRewardsUpdatedEvent {
        staking_pool: pool_key,
        indices,
        net_change: outcome.net_change,
        fee_shares,
        total_staked: pool.total_staked,
        total_shares: pool.total_shares,
        data,
    });

    msg!("Net deposit change: {}", outcome.net_change);
    msg!("Fee shares minted: {}", fee_shares);
    msg!("New total staked: {}", pool.total_staked);
    msg!("New total shares: {}", pool.total_shares);

    Ok(())
}

/// View: net change and fees a reconciliation of `indices` would produce now.
/// remaining_accounts: one strategy state per index.
pub fn handler_get_strategy_rewards<'info>(
    ctx: Context<'_, '_, 'info, 'info, GetStrategyRewards<'info>>,
    indices: Vec<u32>,
) -> Result<StrategyRewards> {
    let pool = &ctx.accounts.pool;
    pool.validate_indices(&indices)?;

    let reports = collect_reports(pool, &pool.key(), &indices, ctx.remaining_accounts)?;
    pool.preview_rewards(&reports)
}
