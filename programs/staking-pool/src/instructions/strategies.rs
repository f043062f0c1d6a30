// =============================================================================
// Strategy Management Instructions
// =============================================================================
// Owner-only edits of the ordered strategy list. List order is allocation
// order on deposit and the reverse of withdrawal order.
// =============================================================================

use anchor_lang::prelude::*;
use anchor_spl::token::TokenAccount;
use shared_lib::{Role, Versioned};

use crate::constants::*;
use crate::error::StakingPoolError;
use crate::events::{StrategyAddedEvent, StrategyRemovedEvent};
use crate::instructions::admin::ConfigurePool;
use crate::state::{StakingPool, StrategyEntry};
use crate::strategy;

#[derive(Accounts)]
pub struct AddStrategy<'info> {
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [STAKING_POOL_SEED, pool.token_mint.as_ref()],
        bump = pool.bump,
        constraint = pool.is_current() @ StakingPoolError::SchemaVersionMismatch
    )]
    pub pool: Box<Account<'info, StakingPool>>,

    /// CHECK: Decoded through the common strategy prefix in the handler
    #[account(owner = strategy_program.key() @ StakingPoolError::InvalidStrategyAccount)]
    pub strategy_state: UncheckedAccount<'info>,

    /// CHECK: Any executable program implementing the strategy instructions
    #[account(executable)]
    pub strategy_program: UncheckedAccount<'info>,

    /// Where the pool sends underlying before calling the strategy's deposit
    #[account(
        constraint = deposit_account.mint == pool.token_mint @ StakingPoolError::InvalidTokenMint
    )]
    pub deposit_account: Account<'info, TokenAccount>,
}

pub fn handler_add_strategy(ctx: Context<AddStrategy>) -> Result<()> {
    let pool = &mut ctx.accounts.pool;
    require!(
        pool.access.permits(Role::Owner, &ctx.accounts.owner.key()),
        StakingPoolError::Unauthorized
    );

    let report = strategy::decode_report(&ctx.accounts.strategy_state.try_borrow_data()?)?;
    require_keys_eq!(report.pool, pool.key(), StakingPoolError::StrategyPoolMismatch);

    // A strategy reporting any deposits is rejected by add_strategy
    let entry = StrategyEntry {
        strategy_state: ctx.accounts.strategy_state.key(),
        strategy_program: ctx.accounts.strategy_program.key(),
        deposit_account: ctx.accounts.deposit_account.key(),
        total_deposits: report.total_deposits,
    };
    let index = pool.add_strategy(entry)?;

    emit!(StrategyAddedEvent {
        staking_pool: pool.key(),
        strategy_state: entry.strategy_state,
        strategy_program: entry.strategy_program,
        index,
    });

    msg!("Strategy {} added at index {}", entry.strategy_state, index);
    msg!("Max deposits: {}, min deposits: {}", report.max_deposits, report.min_deposits);
    Ok(())
}

pub fn handler_remove_strategy(ctx: Context<ConfigurePool>, index: u32) -> Result<()> {
    ctx.accounts.require_owner()?;

    let pool = &mut ctx.accounts.pool;
    let removed = pool.remove_strategy(index)?;

    emit!(StrategyRemovedEvent {
        staking_pool: pool.key(),
        strategy_state: removed.strategy_state,
        index,
    });

    msg!("Strategy {} removed from index {}", removed.strategy_state, index);
    Ok(())
}

pub fn handler_reorder_strategies(ctx: Context<ConfigurePool>, order: Vec<u32>) -> Result<()> {
    ctx.accounts.require_owner()?;
    ctx.accounts.pool.reorder_strategies(&order)?;

    msg!("Strategies reordered: {:?}", order);
    Ok(())
}
