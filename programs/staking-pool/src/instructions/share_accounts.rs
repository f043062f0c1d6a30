// =============================================================================
// Share Account Instructions
// =============================================================================
// - open_share_account: permissionless creation of an owner's ledger entry
// - transfer_shares:    move balance between two share accounts
// - balance_of / shares_of: views
// =============================================================================

use anchor_lang::prelude::*;
use shared_lib::Versioned;

use crate::constants::*;
use crate::error::StakingPoolError;
use crate::events::SharesTransferredEvent;
use crate::state::{ShareAccount, StakingPool};

#[derive(Accounts)]
pub struct OpenShareAccount<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,

    #[account(
        seeds = [STAKING_POOL_SEED, pool.token_mint.as_ref()],
        bump = pool.bump
    )]
    pub pool: Box<Account<'info, StakingPool>>,

    /// CHECK: Any key may own shares; only used as a PDA seed
    pub owner: UncheckedAccount<'info>,

    #[account(
        init,
        payer = payer,
        space = 8 + ShareAccount::INIT_SPACE,
        seeds = [SHARES_SEED, pool.key().as_ref(), owner.key().as_ref()],
        bump
    )]
    pub share_account: Account<'info, ShareAccount>,

    pub system_program: Program<'info, System>,
}

pub fn handler_open_share_account(ctx: Context<OpenShareAccount>) -> Result<()> {
    let share_account = &mut ctx.accounts.share_account;
    share_account.pool = ctx.accounts.pool.key();
    share_account.owner = ctx.accounts.owner.key();
    share_account.shares = 0;
    share_account.bump = ctx.bumps.share_account;

    msg!("Share account opened for {}", share_account.owner);
    Ok(())
}

#[derive(Accounts)]
pub struct TransferShares<'info> {
    pub sender: Signer<'info>,

    #[account(
        seeds = [STAKING_POOL_SEED, pool.token_mint.as_ref()],
        bump = pool.bump,
        constraint = pool.is_current() @ StakingPoolError::SchemaVersionMismatch
    )]
    pub pool: Box<Account<'info, StakingPool>>,

    #[account(
        mut,
        seeds = [SHARES_SEED, pool.key().as_ref(), sender.key().as_ref()],
        bump = from.bump
    )]
    pub from: Account<'info, ShareAccount>,

    #[account(
        mut,
        constraint = to.pool == pool.key() @ StakingPoolError::InvalidShareAccount,
        constraint = to.key() != from.key() @ StakingPoolError::InvalidShareAccount
    )]
    pub to: Account<'info, ShareAccount>,
}

/// Move `amount` of the sender's balance. Converted to shares at the current
/// rate, rounded down.
pub fn handler_transfer_shares(ctx: Context<TransferShares>, amount: u64) -> Result<()> {
    let pool = &ctx.accounts.pool;
    let shares = pool.shares_for_transfer(amount, ctx.accounts.from.shares)?;

    ctx.accounts.from.debit(shares)?;
    ctx.accounts.to.credit(shares)?;

    emit!(SharesTransferredEvent {
        staking_pool: pool.key(),
        from: ctx.accounts.from.owner,
        to: ctx.accounts.to.owner,
        amount,
        shares,
    });

    msg!("Transferred {} ({} shares) to {}", amount, shares, ctx.accounts.to.owner);
    Ok(())
}

#[derive(Accounts)]
pub struct ShareView<'info> {
    pub pool: Box<Account<'info, StakingPool>>,

    #[account(
        constraint = share_account.pool == pool.key() @ StakingPoolError::InvalidShareAccount
    )]
    pub share_account: Account<'info, ShareAccount>,
}

/// View: rebasing balance of a share account
pub fn handler_balance_of(ctx: Context<ShareView>) -> Result<u64> {
    ctx.accounts
        .pool
        .balance_of(ctx.accounts.share_account.shares)
}

/// View: raw shares of a share account
pub fn handler_shares_of(ctx: Context<ShareView>) -> Result<u64> {
    Ok(ctx.accounts.share_account.shares)
}
