// =============================================================================
// Initialize Instruction
// =============================================================================
// Creates a staking pool for one underlying token:
// - StakingPool PDA ["staking_pool", token_mint]
// - Vault token account PDA ["vault", staking_pool] owned by the pool
//
// The signer becomes the owner. Priority pool and rewards initiator are set
// up front because no deposit or reconciliation can happen without them.
// =============================================================================

use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};
use shared_lib::{AccessPolicy, Role};

use crate::constants::*;
use crate::error::StakingPoolError;
use crate::state::StakingPool;

#[derive(Accounts)]
pub struct InitializeStakingPool<'info> {
    /// Becomes the pool owner
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(
        init,
        payer = owner,
        space = 8 + StakingPool::INIT_SPACE,
        seeds = [STAKING_POOL_SEED, token_mint.key().as_ref()],
        bump
    )]
    pub pool: Box<Account<'info, StakingPool>>,

    /// The underlying asset
    pub token_mint: Account<'info, Mint>,

    #[account(
        init,
        payer = owner,
        token::mint = token_mint,
        token::authority = pool,
        seeds = [VAULT_SEED, pool.key().as_ref()],
        bump
    )]
    pub vault: Account<'info, TokenAccount>,

    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
}

pub fn handler_initialize(
    ctx: Context<InitializeStakingPool>,
    priority_pool: Pubkey,
    rewards_initiator: Pubkey,
) -> Result<()> {
    let mut access = AccessPolicy::with_owner(ctx.accounts.owner.key());
    access
        .assign(Role::PriorityPool, priority_pool)
        .map_err(StakingPoolError::from)?;
    access
        .assign(Role::RewardsInitiator, rewards_initiator)
        .map_err(StakingPoolError::from)?;

    let pool = &mut ctx.accounts.pool;
    pool.version = STATE_VERSION;
    pool.access = access;
    pool.token_mint = ctx.accounts.token_mint.key();
    pool.vault = ctx.accounts.vault.key();
    pool.wrapped_token = Pubkey::default();
    pool.total_staked = 0;
    pool.total_shares = 0;
    pool.fees = Vec::new();
    pool.strategies = Vec::new();
    pool.bump = ctx.bumps.pool;
    pool.vault_bump = ctx.bumps.vault;

    msg!("Staking pool initialized for mint {}", pool.token_mint);
    msg!("Owner: {}", access.owner);
    msg!("Priority pool: {}", priority_pool);
    msg!("Rewards initiator: {}", rewards_initiator);

    Ok(())
}
