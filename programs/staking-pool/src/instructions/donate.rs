use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};
use shared_lib::Versioned;

use crate::constants::*;
use crate::error::StakingPoolError;
use crate::events::DonationEvent;
use crate::state::StakingPool;

/// Underlying sent to the vault without minting shares.
/// Every holder's balance rises pro rata.
#[derive(Accounts)]
pub struct DonateTokens<'info> {
    pub donor: Signer<'info>,

    #[account(
        mut,
        seeds = [STAKING_POOL_SEED, pool.token_mint.as_ref()],
        bump = pool.bump,
        constraint = pool.is_current() @ StakingPoolError::SchemaVersionMismatch
    )]
    pub pool: Box<Account<'info, StakingPool>>,

    #[account(
        mut,
        constraint = source.mint == pool.token_mint @ StakingPoolError::InvalidTokenMint
    )]
    pub source: Account<'info, TokenAccount>,

    #[account(
        mut,
        seeds = [VAULT_SEED, pool.key().as_ref()],
        bump = pool.vault_bump
    )]
    pub vault: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

pub fn handler_donate_tokens(ctx: Context<DonateTokens>, amount: u64) -> Result<()> {
    ctx.accounts.pool.record_donation(amount)?;

    token::transfer(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.source.to_account_info(),
                to: ctx.accounts.vault.to_account_info(),
                authority: ctx.accounts.donor.to_account_info(),
            },
        ),
        amount,
    )?;

    let pool = &ctx.accounts.pool;
    emit!(DonationEvent {
        staking_pool: pool.key(),
        donor: ctx.accounts.donor.key(),
        amount,
        total_staked: pool.total_staked,
    });

    msg!("Donated {}, new total staked: {}", amount, pool.total_staked);
    Ok(())
}
