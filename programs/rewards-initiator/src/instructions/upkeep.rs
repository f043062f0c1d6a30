// =============================================================================
// Upkeep Instructions
// =============================================================================
// - check_upkeep:   view for keepers, lists strategies with a loss
// - perform_upkeep: keeper entry point, reconciles losses only
// - update_rewards: whitelisted entry point, reconciles anything
//
// perform_upkeep and update_rewards forward every remaining account to the
// staking pool's update_strategy_rewards: one strategy state per index, then
// one fee ShareAccount per fee receiver.
// =============================================================================

use anchor_lang::prelude::*;
use shared_lib::Versioned;
use staking_pool::program::StakingPool as StakingPoolProgram;
use staking_pool::state::StakingPool;
use staking_pool::strategy::read_report;

use crate::constants::*;
use crate::error::RewardsInitiatorError;
use crate::events::RewardsRoundCompletedEvent;
use crate::state::{check_upkeep, decode_indices, deposit_changes, ensure_loss, RewardsInitiator, UpkeepCheck};

#[derive(Accounts)]
pub struct CheckUpkeep<'info> {
    #[account(
        seeds = [REWARDS_INITIATOR_SEED, staking_pool.key().as_ref()],
        bump = rewards_initiator.bump
    )]
    pub rewards_initiator: Account<'info, RewardsInitiator>,

    #[account(address = rewards_initiator.staking_pool @ RewardsInitiatorError::StakingPoolMismatch)]
    pub staking_pool: Box<Account<'info, StakingPool>>,
}

#[derive(Accounts)]
pub struct Reconcile<'info> {
    /// Keeper on the upkeep path, whitelisted caller on the manual path
    pub caller: Signer<'info>,

    #[account(
        mut,
        seeds = [REWARDS_INITIATOR_SEED, staking_pool.key().as_ref()],
        bump = rewards_initiator.bump,
        constraint = rewards_initiator.is_current() @ RewardsInitiatorError::SchemaVersionMismatch
    )]
    pub rewards_initiator: Account<'info, RewardsInitiator>,

    #[account(
        mut,
        address = rewards_initiator.staking_pool @ RewardsInitiatorError::StakingPoolMismatch
    )]
    pub staking_pool: Box<Account<'info, StakingPool>>,

    pub staking_pool_program: Program<'info, StakingPoolProgram>,
}

/// Reported totals for `indices`, read from the leading remaining accounts
fn read_reports(
    pool: &Account<StakingPool>,
    indices: &[u32],
    states: &[AccountInfo],
) -> Result<Vec<(u32, u64)>> {
    require!(
        states.len() >= indices.len(),
        RewardsInitiatorError::InvalidRemainingAccounts
    );

    indices
        .iter()
        .zip(states)
        .map(|(&index, state)| {
            let entry = pool.strategy(index)?;
            Ok((index, read_report(state, entry, &pool.key())?.total_deposits))
        })
        .collect()
}

/// CPI into the staking pool, then count the round
fn reconcile<'info>(
    ctx: Context<'_, '_, 'info, 'info, Reconcile<'info>>,
    indices: Vec<u32>,
    data: Vec<u8>,
    automated: bool,
) -> Result<()> {
    let staking_pool_key = ctx.accounts.staking_pool.key();
    let bump = [ctx.accounts.rewards_initiator.bump];
    let seeds: &[&[u8]] = &[REWARDS_INITIATOR_SEED, staking_pool_key.as_ref(), &bump];
    let signer_seeds = &[seeds];

    let cpi_ctx = CpiContext::new_with_signer(
        ctx.accounts.staking_pool_program.to_account_info(),
        staking_pool::cpi::accounts::UpdateStrategyRewards {
            rewards_initiator: ctx.accounts.rewards_initiator.to_account_info(),
            pool: ctx.accounts.staking_pool.to_account_info(),
        },
        signer_seeds,
    )
    .with_remaining_accounts(ctx.remaining_accounts.to_vec());

    staking_pool::cpi::update_strategy_rewards(cpi_ctx, indices.clone(), data)?;

    let initiator = &mut ctx.accounts.rewards_initiator;
    let round = initiator.complete_round()?;

    emit!(RewardsRoundCompletedEvent {
        staking_pool: staking_pool_key,
        distribution_controller: initiator.distribution_controller,
        round,
        indices,
        automated,
    });

    msg!("Reconciliation round {} completed", round);
    Ok(())
}

/// View: strategies whose deposit change is strictly negative.
/// remaining_accounts: every strategy state of the pool, in list order.
pub fn handler_check_upkeep<'info>(
    ctx: Context<'_, '_, 'info, 'info, CheckUpkeep<'info>>,
) -> Result<UpkeepCheck> {
    let pool = &ctx.accounts.staking_pool;
    require!(
        ctx.remaining_accounts.len() == pool.strategies.len(),
        RewardsInitiatorError::InvalidRemainingAccounts
    );

    let all: Vec<u32> = (0..pool.strategies.len() as u32).collect();
    let reported: Vec<u64> = read_reports(pool, &all, ctx.remaining_accounts)?
        .into_iter()
        .map(|(_, total)| total)
        .collect();

    check_upkeep(pool, &reported)
}

/// Keeper path: reconcile the strategies in `perform_data` if, together,
/// they lost value.
pub fn handler_perform_upkeep<'info>(
    ctx: Context<'_, '_, 'info, 'info, Reconcile<'info>>,
    perform_data: Vec<u8>,
) -> Result<()> {
    let indices = decode_indices(&perform_data)?;
    require!(!indices.is_empty(), RewardsInitiatorError::NoStrategiesToUpdate);

    let reports = read_reports(&ctx.accounts.staking_pool, &indices, ctx.remaining_accounts)?;
    let changes = deposit_changes(&ctx.accounts.staking_pool, &reports)?;
    let aggregate = ensure_loss(&indices, &changes)?;

    msg!("Upkeep recognising loss of {} across {:?}", aggregate, indices);
    reconcile(ctx, indices, Vec::new(), true)
}

/// Manual path: any subset, rewards included
pub fn handler_update_rewards<'info>(
    ctx: Context<'_, '_, 'info, 'info, Reconcile<'info>>,
    indices: Vec<u32>,
    data: Vec<u8>,
) -> Result<()> {
    require!(
        ctx.accounts
            .rewards_initiator
            .is_whitelisted(&ctx.accounts.caller.key()),
        RewardsInitiatorError::Unauthorized
    );

    reconcile(ctx, indices, data, false)
}
