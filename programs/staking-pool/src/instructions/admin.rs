// =============================================================================
// Admin Instructions
// =============================================================================
// Owner-only configuration of the staking pool:
// - set_priority_pool / set_rewards_initiator / set_wrapped_token / transfer_ownership
// - migrate (lift stored state to the current schema version)
//
// Role setters reject the default pubkey: a role held by the all-zero key can
// never sign again.
// =============================================================================

use anchor_lang::prelude::*;
use shared_lib::{migrate, Role, Versioned};

use crate::constants::*;
use crate::error::StakingPoolError;
use crate::events::RoleAssignedEvent;
use crate::state::{StakingPool, WrappedToken};

/// Accounts shared by every owner-only configuration instruction
#[derive(Accounts)]
pub struct ConfigurePool<'info> {
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [STAKING_POOL_SEED, pool.token_mint.as_ref()],
        bump = pool.bump,
        constraint = pool.is_current() @ StakingPoolError::SchemaVersionMismatch
    )]
    pub pool: Box<Account<'info, StakingPool>>,
}

impl<'info> ConfigurePool<'info> {
    pub fn require_owner(&self) -> Result<()> {
        require!(
            self.pool.access.permits(Role::Owner, &self.owner.key()),
            StakingPoolError::Unauthorized
        );
        Ok(())
    }
}

#[derive(Accounts)]
pub struct MigrateStakingPool<'info> {
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [STAKING_POOL_SEED, pool.token_mint.as_ref()],
        bump = pool.bump
    )]
    pub pool: Box<Account<'info, StakingPool>>,
}

#[derive(Accounts)]
pub struct MigrateWrappedToken<'info> {
    pub owner: Signer<'info>,

    #[account(
        seeds = [STAKING_POOL_SEED, pool.token_mint.as_ref()],
        bump = pool.bump
    )]
    pub pool: Box<Account<'info, StakingPool>>,

    #[account(
        mut,
        seeds = [WRAPPED_TOKEN_SEED, pool.key().as_ref()],
        bump = wrapped_token.bump
    )]
    pub wrapped_token: Account<'info, WrappedToken>,
}

fn assign_role(ctx: Context<ConfigurePool>, role: Role, label: &str, holder: Pubkey) -> Result<()> {
    ctx.accounts.require_owner()?;

    let pool_key = ctx.accounts.pool.key();
    let previous = ctx
        .accounts
        .pool
        .access
        .assign(role, holder)
        .map_err(StakingPoolError::from)?;

    emit!(RoleAssignedEvent {
        staking_pool: pool_key,
        role: label.to_string(),
        previous,
        holder,
    });

    msg!("{} changed from {} to {}", label, previous, holder);
    Ok(())
}

pub fn handler_set_priority_pool(ctx: Context<ConfigurePool>, priority_pool: Pubkey) -> Result<()> {
    assign_role(ctx, Role::PriorityPool, "priority_pool", priority_pool)
}

pub fn handler_set_rewards_initiator(
    ctx: Context<ConfigurePool>,
    rewards_initiator: Pubkey,
) -> Result<()> {
    assign_role(ctx, Role::RewardsInitiator, "rewards_initiator", rewards_initiator)
}

pub fn handler_transfer_ownership(ctx: Context<ConfigurePool>, new_owner: Pubkey) -> Result<()> {
    assign_role(ctx, Role::Owner, "owner", new_owner)
}

pub fn handler_set_wrapped_token(ctx: Context<ConfigurePool>, wrapped_token: Pubkey) -> Result<()> {
    ctx.accounts.require_owner()?;
    require!(
        wrapped_token != Pubkey::default(),
        StakingPoolError::InvalidAddress
    );

    let pool = &mut ctx.accounts.pool;
    let previous = pool.wrapped_token;
    pool.wrapped_token = wrapped_token;

    emit!(RoleAssignedEvent {
        staking_pool: pool.key(),
        role: "wrapped_token".to_string(),
        previous,
        holder: wrapped_token,
    });

    msg!("Wrapped token changed from {} to {}", previous, wrapped_token);
    Ok(())
}

pub fn handler_migrate(ctx: Context<MigrateStakingPool>) -> Result<()> {
    let pool = &mut ctx.accounts.pool;
    require!(
        pool.access.permits(Role::Owner, &ctx.accounts.owner.key()),
        StakingPoolError::Unauthorized
    );

    let step = migrate(&mut ***pool).map_err(StakingPoolError::from)?;
    if step.is_noop() {
        msg!("Staking pool already at version {}", step.to);
    } else {
        msg!("Staking pool migrated from version {} to {}", step.from, step.to);
    }
    Ok(())
}

pub fn handler_migrate_wrapped_token(ctx: Context<MigrateWrappedToken>) -> Result<()> {
    require!(
        ctx.accounts
            .pool
            .access
            .permits(Role::Owner, &ctx.accounts.owner.key()),
        StakingPoolError::Unauthorized
    );

    let step = migrate(&mut *ctx.accounts.wrapped_token).map_err(StakingPoolError::from)?;
    msg!("Wrapped token at version {} (was {})", step.to, step.from);
    Ok(())
}
