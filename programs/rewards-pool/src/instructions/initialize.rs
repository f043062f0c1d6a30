use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};
use shared_lib::AccessPolicy;

use crate::constants::*;
use crate::state::RewardsPoolController;

/// Create a controller for one staking token, together with its stake vault.
/// The signer becomes the owner.
#[derive(Accounts)]
pub struct InitializeController<'info> {
    #[account(mut)]
    pub owner: Signer<'info>,

    pub staking_mint: Account<'info, Mint>,

    #[account(
        init,
        payer = owner,
        space = 8 + RewardsPoolController::INIT_SPACE,
        seeds = [CONTROLLER_SEED, staking_mint.key().as_ref()],
        bump
    )]
    pub controller: Account<'info, RewardsPoolController>,

    #[account(
        init,
        payer = owner,
        seeds = [STAKE_VAULT_SEED, controller.key().as_ref()],
        bump,
        token::mint = staking_mint,
        token::authority = controller
    )]
    pub stake_vault: Account<'info, TokenAccount>,

    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
}

pub fn handler_initialize(ctx: Context<InitializeController>) -> Result<()> {
    let controller = &mut ctx.accounts.controller;
    controller.version = STATE_VERSION;
    controller.access = AccessPolicy::with_owner(ctx.accounts.owner.key());
    controller.staking_mint = ctx.accounts.staking_mint.key();
    controller.stake_vault = ctx.accounts.stake_vault.key();
    controller.total_staked = 0;
    controller.next_pool_id = 0;
    controller.pools = Vec::new();
    controller.bump = ctx.bumps.controller;
    controller.stake_vault_bump = ctx.bumps.stake_vault;

    msg!("Rewards pool controller {} created", controller.key());
    msg!("Staking mint: {}", controller.staking_mint);
    msg!("Stake vault: {}", controller.stake_vault);
    Ok(())
}
