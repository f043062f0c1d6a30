use anchor_lang::prelude::*;
use shared_lib::{AccessPolicy, Role};
use staking_pool::state::StakingPool;

use crate::constants::*;
use crate::error::RewardsInitiatorError;
use crate::state::RewardsInitiator;

/// Create the initiator for a staking pool. Only the pool owner may do this;
/// afterwards the pool's rewards initiator role must be pointed at the new PDA.
#[derive(Accounts)]
pub struct InitializeRewardsInitiator<'info> {
    #[account(mut)]
    pub owner: Signer<'info>,

    pub staking_pool: Box<Account<'info, StakingPool>>,

    #[account(
        init,
        payer = owner,
        space = 8 + RewardsInitiator::INIT_SPACE,
        seeds = [REWARDS_INITIATOR_SEED, staking_pool.key().as_ref()],
        bump
    )]
    pub rewards_initiator: Account<'info, RewardsInitiator>,

    pub system_program: Program<'info, System>,
}

pub fn handler_initialize(
    ctx: Context<InitializeRewardsInitiator>,
    distribution_controller: Pubkey,
) -> Result<()> {
    require!(
        ctx.accounts
            .staking_pool
            .access
            .permits(Role::Owner, &ctx.accounts.owner.key()),
        RewardsInitiatorError::Unauthorized
    );
    require!(
        distribution_controller != Pubkey::default(),
        RewardsInitiatorError::InvalidAddress
    );

    let initiator = &mut ctx.accounts.rewards_initiator;
    initiator.version = STATE_VERSION;
    initiator.access = AccessPolicy::with_owner(ctx.accounts.owner.key());
    initiator.staking_pool = ctx.accounts.staking_pool.key();
    initiator.distribution_controller = distribution_controller;
    initiator.whitelist = Vec::new();
    initiator.rounds_completed = 0;
    initiator.bump = ctx.bumps.rewards_initiator;

    msg!("Rewards initiator {} created", initiator.key());
    msg!("Staking pool: {}", initiator.staking_pool);
    msg!("Distribution controller: {}", distribution_controller);
    Ok(())
}
