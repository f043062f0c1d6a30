// =============================================================================
// Reward Funding and Payout
// =============================================================================
// - distribute_rewards:   anyone funds one reward token; rejected while
//                         nothing is staked
// - withdraw_rewards:     a staker settles every token, then collects the
//                         selected ones
// - withdrawable_rewards: view, one amount per reward token in list order
// =============================================================================

use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};
use shared_lib::Versioned;

use crate::constants::*;
use crate::error::RewardsPoolError;
use crate::events::{RewardsDistributedEvent, RewardsWithdrawnEvent};
use crate::state::{RewardsPoolController, Staker};

/// Fund one reward token. Anyone may distribute.
#[derive(Accounts)]
pub struct DistributeRewards<'info> {
    pub funder: Signer<'info>,

    #[account(
        mut,
        seeds = [CONTROLLER_SEED, controller.staking_mint.as_ref()],
        bump = controller.bump,
        constraint = controller.is_current() @ RewardsPoolError::SchemaVersionMismatch
    )]
    pub controller: Account<'info, RewardsPoolController>,

    #[account(mut, token::authority = funder)]
    pub source: Account<'info, TokenAccount>,

    #[account(mut)]
    pub reward_vault: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

/// Pay out settled rewards of the selected tokens.
///
/// remaining_accounts: `[reward_vault, recipient_token_account]` per index
#[derive(Accounts)]
pub struct WithdrawRewards<'info> {
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

    pub token_program: Program<'info, Token>,
}

#[derive(Accounts)]
#[instruction(owner: Pubkey)]
pub struct WithdrawableRewards<'info> {
    #[account(
        seeds = [CONTROLLER_SEED, controller.staking_mint.as_ref()],
        bump = controller.bump
    )]
    pub controller: Account<'info, RewardsPoolController>,

    #[account(
        seeds = [STAKER_SEED, controller.key().as_ref(), owner.as_ref()],
        bump = staker.bump
    )]
    pub staker: Account<'info, Staker>,
}

pub fn handler_distribute_rewards(
    ctx: Context<DistributeRewards>,
    index: u32,
    amount: u64,
) -> Result<()> {
    let controller = &mut ctx.accounts.controller;
    let total_staked = controller.total_staked;
    let pool = controller.pool_mut(index)?;

    require_keys_eq!(
        ctx.accounts.reward_vault.key(),
        pool.reward_vault,
        RewardsPoolError::InvalidRewardVault
    );
    require_keys_eq!(
        ctx.accounts.source.mint,
        pool.reward_mint,
        RewardsPoolError::InvalidRewardMint
    );

    let reward_per_token = pool.distribute(amount, total_staked)?;
    let pool_id = pool.id;

    token::transfer(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.source.to_account_info(),
                to: ctx.accounts.reward_vault.to_account_info(),
                authority: ctx.accounts.funder.to_account_info(),
            },
        ),
        amount,
    )?;

    emit!(RewardsDistributedEvent {
        controller: controller.key(),
        pool_id,
        funder: ctx.accounts.funder.key(),
        amount,
        reward_per_token,
    });

    msg!(
        "Distributed {} to pool {} across {} staked, reward per token now {}",
        amount,
        pool_id,
        total_staked,
        reward_per_token
    );
    Ok(())
}

pub fn handler_withdraw_rewards<'info>(
    ctx: Context<'_, '_, 'info, 'info, WithdrawRewards<'info>>,
    indices: Vec<u32>,
) -> Result<()> {
    require!(
        ctx.remaining_accounts.len() == indices.len() * 2,
        RewardsPoolError::InvalidRemainingAccounts
    );

    let controller_info = ctx.accounts.controller.to_account_info();
    let controller = &mut ctx.accounts.controller;
    let staker = &mut ctx.accounts.staker;
    staker.settle(&controller.pools)?;

    let staking_mint = controller.staking_mint;
    let bump = [controller.bump];
    let seeds: &[&[u8]] = &[CONTROLLER_SEED, staking_mint.as_ref(), &bump];
    let signer_seeds = &[seeds];

    let mut pool_ids = Vec::with_capacity(indices.len());
    let mut amounts = Vec::with_capacity(indices.len());

    for (&index, accounts) in indices.iter().zip(ctx.remaining_accounts.chunks(2)) {
        let (vault, recipient) = (&accounts[0], &accounts[1]);
        let pool = controller.pool_mut(index)?;

        require_keys_eq!(vault.key(), pool.reward_vault, RewardsPoolError::InvalidRewardVault);
        let recipient_account = Account::<TokenAccount>::try_from(recipient)?;
        require_keys_eq!(
            recipient_account.mint,
            pool.reward_mint,
            RewardsPoolError::InvalidRewardMint
        );

        let amount = staker.take_rewards(pool.id)?;
        if amount > 0 {
            token::transfer(
                CpiContext::new_with_signer(
                    ctx.accounts.token_program.to_account_info(),
                    Transfer {
                        from: vault.clone(),
                        to: recipient.clone(),
                        authority: controller_info.clone(),
                    },
                    signer_seeds,
                ),
                amount,
            )?;
            pool.record_payout(amount)?;
        }

        pool_ids.push(pool.id);
        amounts.push(amount);
    }

    let total: u64 = amounts
        .iter()
        .try_fold(0u64, |sum, amount| sum.checked_add(*amount))
        .ok_or(RewardsPoolError::MathOverflow)?;
    require!(total > 0, RewardsPoolError::NoRewards);

    emit!(RewardsWithdrawnEvent {
        controller: controller.key(),
        owner: staker.owner,
        pool_ids,
        amounts: amounts.clone(),
    });

    msg!("Withdrew rewards {:?} for {}", amounts, staker.owner);
    Ok(())
}

/// View: rewards `owner` could withdraw from each token, in list order
pub fn handler_withdrawable_rewards(
    ctx: Context<WithdrawableRewards>,
    _owner: Pubkey,
) -> Result<Vec<u64>> {
    ctx.accounts.staker.withdrawable(&ctx.accounts.controller.pools)
}
