use anchor_lang::prelude::*;
use shared_lib::{migrate, Role, Versioned};

use crate::constants::*;
use crate::error::RewardsPoolError;
use crate::state::RewardsPoolController;

#[derive(Accounts)]
pub struct ConfigureController<'info> {
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [CONTROLLER_SEED, controller.staking_mint.as_ref()],
        bump = controller.bump,
        constraint = controller.is_current() @ RewardsPoolError::SchemaVersionMismatch
    )]
    pub controller: Account<'info, RewardsPoolController>,
}

#[derive(Accounts)]
pub struct MigrateController<'info> {
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [CONTROLLER_SEED, controller.staking_mint.as_ref()],
        bump = controller.bump
    )]
    pub controller: Account<'info, RewardsPoolController>,
}

pub fn handler_transfer_ownership(ctx: Context<ConfigureController>, new_owner: Pubkey) -> Result<()> {
    let controller = &mut ctx.accounts.controller;
    require!(
        controller.access.permits(Role::Owner, &ctx.accounts.owner.key()),
        RewardsPoolError::Unauthorized
    );

    let previous = controller
        .access
        .assign(Role::Owner, new_owner)
        .map_err(RewardsPoolError::from)?;

    msg!("Owner changed from {} to {}", previous, new_owner);
    Ok(())
}

pub fn handler_migrate(ctx: Context<MigrateController>) -> Result<()> {
    require!(
        ctx.accounts
            .controller
            .access
            .permits(Role::Owner, &ctx.accounts.owner.key()),
        RewardsPoolError::Unauthorized
    );

    let step = migrate(&mut *ctx.accounts.controller).map_err(RewardsPoolError::from)?;
    msg!("Controller at version {} (was {})", step.to, step.from);
    Ok(())
}
