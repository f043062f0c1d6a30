use anchor_lang::prelude::*;
use shared_lib::{migrate, Role, Versioned};

use crate::constants::*;
use crate::error::RewardsInitiatorError;
use crate::events::{CallerWhitelistedEvent, DistributionControllerSetEvent};
use crate::state::RewardsInitiator;

#[derive(Accounts)]
pub struct ConfigureInitiator<'info> {
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [REWARDS_INITIATOR_SEED, rewards_initiator.staking_pool.as_ref()],
        bump = rewards_initiator.bump,
        constraint = rewards_initiator.is_current() @ RewardsInitiatorError::SchemaVersionMismatch
    )]
    pub rewards_initiator: Account<'info, RewardsInitiator>,
}

#[derive(Accounts)]
pub struct MigrateInitiator<'info> {
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [REWARDS_INITIATOR_SEED, rewards_initiator.staking_pool.as_ref()],
        bump = rewards_initiator.bump
    )]
    pub rewards_initiator: Account<'info, RewardsInitiator>,
}

fn require_owner(initiator: &RewardsInitiator, signer: &Signer) -> Result<()> {
    require!(
        initiator.access.permits(Role::Owner, &signer.key()),
        RewardsInitiatorError::Unauthorized
    );
    Ok(())
}

pub fn handler_whitelist_caller(
    ctx: Context<ConfigureInitiator>,
    caller: Pubkey,
    allowed: bool,
) -> Result<()> {
    require_owner(&ctx.accounts.rewards_initiator, &ctx.accounts.owner)?;

    let initiator = &mut ctx.accounts.rewards_initiator;
    if initiator.set_whitelisted(caller, allowed)? {
        emit!(CallerWhitelistedEvent {
            rewards_initiator: initiator.key(),
            caller,
            allowed,
        });
    }

    msg!("Caller {} whitelisted: {}", caller, allowed);
    Ok(())
}

pub fn handler_set_distribution_controller(
    ctx: Context<ConfigureInitiator>,
    distribution_controller: Pubkey,
) -> Result<()> {
    require_owner(&ctx.accounts.rewards_initiator, &ctx.accounts.owner)?;
    require!(
        distribution_controller != Pubkey::default(),
        RewardsInitiatorError::InvalidAddress
    );

    let initiator = &mut ctx.accounts.rewards_initiator;
    let previous = initiator.distribution_controller;
    initiator.distribution_controller = distribution_controller;

    emit!(DistributionControllerSetEvent {
        rewards_initiator: initiator.key(),
        previous,
        distribution_controller,
    });

    msg!("Distribution controller changed from {} to {}", previous, distribution_controller);
    Ok(())
}

pub fn handler_transfer_ownership(ctx: Context<ConfigureInitiator>, new_owner: Pubkey) -> Result<()> {
    require_owner(&ctx.accounts.rewards_initiator, &ctx.accounts.owner)?;

    let previous = ctx
        .accounts
        .rewards_initiator
        .access
        .assign(Role::Owner, new_owner)
        .map_err(RewardsInitiatorError::from)?;

    msg!("Owner changed from {} to {}", previous, new_owner);
    Ok(())
}

pub fn handler_migrate(ctx: Context<MigrateInitiator>) -> Result<()> {
    require_owner(&ctx.accounts.rewards_initiator, &ctx.accounts.owner)?;

    let step = migrate(&mut *ctx.accounts.rewards_initiator).map_err(RewardsInitiatorError::from)?;
    msg!("Rewards initiator at version {} (was {})", step.to, step.from);
    Ok(())
}
