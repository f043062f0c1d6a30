// =============================================================================
// Stake / Withdraw
// =============================================================================
// Both settle every registered reward token at the staker's current balance
// before the balance moves, so no reward is lost or counted twice.
// =============================================================================

use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};
use shared_lib::Versioned;

use crate::constants::*;
use crate::error::RewardsPoolError;
use crate::events::{StakeWithdrawnEvent, StakedEvent};
use crate::state::{RewardsPoolController, Staker};

#[derive(Accounts)]
pub struct Stake<'info> {
    #[account(mut)]
    pub user: Signer<'info>,

    #[account(
        mut,
        seeds = [CONTROLLER_SEED, controller.staking_mint.as_ref()],
        bump = controller.bump,
        constraint = controller.is_current() @ RewardsPoolError::SchemaVersionMismatch
    )]
    pub controller: Account<'info, RewardsPoolController>,

    /// Created on first stake
    #[account(
        init_if_needed,
        payer = user,
        space = 8 + Staker::INIT_SPACE,
        seeds = [STAKER_SEED, controller.key().as_ref(), user.key().as_ref()],
        bump
    )]
    pub staker: Account<'info, Staker>,

    #[account(
        mut,
        token::authority = user,
        constraint = user_token_account.mint == controller.staking_mint @ RewardsPoolError::InvalidStakingMint
    )]
    pub user_token_account: Account<'info, TokenAccount>,

    #[account(mut, address = controller.stake_vault)]
    pub stake_vault: Account<'info, TokenAccount>,

    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
}

#[derive(Accounts)]
pub struct WithdrawStake<'info> {
    pub user: Signer<'info>,

    #[account(
        mut,
        seeds = [CONTROLLER_SEED, controller.staking_mint.as_ref()],
        bump = controller.bump,
        constraint = controller.is_current() @ RewardsPoolError::SchemaVersionMismatch
    )]
    pub controller: Account<'info, RewardsPoolController>,

    #[account(
        mut,
        seeds = [STAKER_SEED, controller.key().as_ref(), user.key().as_ref()],
        bump = staker.bump,
        constraint = staker.owner == user.key() @ RewardsPoolError::InvalidAuthority
    )]
    pub staker: Account<'info, Staker>,

    #[account(
        mut,
        constraint = user_token_account.mint == controller.staking_mint @ RewardsPoolError::InvalidStakingMint
    )]
    pub user_token_account: Account<'info, TokenAccount>,

    #[account(mut, address = controller.stake_vault)]
    pub stake_vault: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

pub fn handler_stake(ctx: Context<Stake>, amount: u64) -> Result<()> {
    require!(amount > 0, RewardsPoolError::InvalidAmount);

    token::transfer(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.user_token_account.to_account_info(),
                to: ctx.accounts.stake_vault.to_account_info(),
                authority: ctx.accounts.user.to_account_info(),
            },
        ),
        amount,
    )?;

    let controller = &mut ctx.accounts.controller;
    let staker = &mut ctx.accounts.staker;
    staker.open_if_new(controller.key(), ctx.accounts.user.key(), ctx.bumps.staker);
    staker.record_stake(amount, &controller.pools)?;
    controller.record_stake(amount)?;

    emit!(StakedEvent {
        controller: controller.key(),
        owner: staker.owner,
        amount,
        staked_amount: staker.staked_amount,
        total_staked: controller.total_staked,
    });

    msg!(
        "Staked {}. User total: {}, Pool total: {}",
        amount,
        staker.staked_amount,
        controller.total_staked
    );
    Ok(())
}

pub fn handler_withdraw(ctx: Context<WithdrawStake>, amount: u64) -> Result<()> {
    require!(amount > 0, RewardsPoolError::InvalidAmount);

    let controller = &mut ctx.accounts.controller;
    let staker = &mut ctx.accounts.staker;
    staker.record_withdrawal(amount, &controller.pools)?;
    controller.record_withdrawal(amount)?;

    let staking_mint = controller.staking_mint;
    let seeds = &[CONTROLLER_SEED, staking_mint.as_ref(), &[controller.bump]];
    let signer_seeds = &[&seeds[..]];

    token::transfer(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.stake_vault.to_account_info(),
                to: ctx.accounts.user_token_account.to_account_info(),
                authority: controller.to_account_info(),
            },
            signer_seeds,
        ),
        amount,
    )?;

    emit!(StakeWithdrawnEvent {
        controller: controller.key(),
        owner: staker.owner,
        amount,
        staked_amount: staker.staked_amount,
        total_staked: controller.total_staked,
    });

    msg!(
        "Withdrew {}. User remaining: {}, Pool total: {}",
        amount,
        staker.staked_amount,
        controller.total_staked
    );
    Ok(())
}
