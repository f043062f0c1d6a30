// =============================================================================
// Reward Token Management (owner only)
// =============================================================================
// - add_token:    register a reward mint and create its vault
// - remove_token: sweep the vault's residual balance to the owner, then drop
//                 the entry. Stakers' checkpoints for it are pruned the next
//                 time they settle.
// =============================================================================

use anchor_lang::prelude::*;
use anchor_spl::token::{self, Mint, Token, TokenAccount, Transfer};
use shared_lib::{Role, Versioned};

use crate::constants::*;
use crate::error::RewardsPoolError;
use crate::events::{RewardTokenAddedEvent, RewardTokenRemovedEvent};
use crate::state::RewardsPoolController;

#[derive(Accounts)]
pub struct AddToken<'info> {
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [CONTROLLER_SEED, controller.staking_mint.as_ref()],
        bump = controller.bump,
        constraint = controller.is_current() @ RewardsPoolError::SchemaVersionMismatch
    )]
    pub controller: Account<'info, RewardsPoolController>,

    pub reward_mint: Account<'info, Mint>,

    /// Reused when a removed token is added back
    #[account(
        init_if_needed,
        payer = owner,
        seeds = [REWARD_VAULT_SEED, controller.key().as_ref(), reward_mint.key().as_ref()],
        bump,
        token::mint = reward_mint,
        token::authority = controller
    )]
    pub reward_vault: Account<'info, TokenAccount>,

    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
}

#[derive(Accounts)]
pub struct RemoveToken<'info> {
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [CONTROLLER_SEED, controller.staking_mint.as_ref()],
        bump = controller.bump,
        constraint = controller.is_current() @ RewardsPoolError::SchemaVersionMismatch
    )]
    pub controller: Account<'info, RewardsPoolController>,

    #[account(mut)]
    pub reward_vault: Account<'info, TokenAccount>,

    /// Receives whatever is left in the vault
    #[account(mut, token::authority = owner)]
    pub owner_token_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

fn require_owner(controller: &RewardsPoolController, signer: &Signer) -> Result<()> {
    require!(
        controller.access.permits(Role::Owner, &signer.key()),
        RewardsPoolError::Unauthorized
    );
    Ok(())
}

pub fn handler_add_token(ctx: Context<AddToken>) -> Result<()> {
    require_owner(&ctx.accounts.controller, &ctx.accounts.owner)?;

    let reward_mint = ctx.accounts.reward_mint.key();
    let reward_vault = ctx.accounts.reward_vault.key();
    let controller = &mut ctx.accounts.controller;
    let pool_id = controller.add_token(reward_mint, reward_vault, ctx.bumps.reward_vault)?;

    emit!(RewardTokenAddedEvent {
        controller: controller.key(),
        pool_id,
        reward_mint,
        reward_vault,
    });

    msg!(
        "Reward token {} added as pool {} ({} registered)",
        reward_mint,
        pool_id,
        controller.pools.len()
    );
    Ok(())
}

pub fn handler_remove_token(ctx: Context<RemoveToken>, index: u32) -> Result<()> {
    require_owner(&ctx.accounts.controller, &ctx.accounts.owner)?;

    let pool = ctx.accounts.controller.pool(index)?.clone();
    require_keys_eq!(
        ctx.accounts.reward_vault.key(),
        pool.reward_vault,
        RewardsPoolError::InvalidRewardVault
    );
    require_keys_eq!(
        ctx.accounts.owner_token_account.mint,
        pool.reward_mint,
        RewardsPoolError::InvalidRewardMint
    );

    let swept = ctx.accounts.reward_vault.amount;
    if swept > 0 {
        let staking_mint = ctx.accounts.controller.staking_mint;
        let seeds = &[
            CONTROLLER_SEED,
            staking_mint.as_ref(),
            &[ctx.accounts.controller.bump],
        ];
        let signer_seeds = &[&seeds[..]];

        token::transfer(
            CpiContext::new_with_signer(
                ctx.accounts.token_program.to_account_info(),
                Transfer {
                    from: ctx.accounts.reward_vault.to_account_info(),
                    to: ctx.accounts.owner_token_account.to_account_info(),
                    authority: ctx.accounts.controller.to_account_info(),
                },
                signer_seeds,
            ),
            swept,
        )?;
    }

    let controller = &mut ctx.accounts.controller;
    controller.remove_token(index)?;

    emit!(RewardTokenRemovedEvent {
        controller: controller.key(),
        pool_id: pool.id,
        reward_mint: pool.reward_mint,
        swept,
    });

    msg!(
        "Reward token {} removed, {} swept to owner",
        pool.reward_mint,
        swept
    );
    Ok(())
}
