// =============================================================================
// Withdraw Instruction
// =============================================================================
// The priority pool withdraws underlying on behalf of an account.
//
// Flow:
// 1. Burn shares worth `amount` (rounded up, capped at the account's shares)
// 2. Source liquidity: idle vault balance first, then strategies from the
//    last to the first, never taking a strategy below its min_deposits floor
// 3. Check that every strategy actually delivered what it was asked for
// 4. Send `amount` from the vault to the receiver
//
// `data` is forwarded untouched to every strategy withdraw call.
// remaining_accounts: same layout as deposit.
// =============================================================================

use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};
use shared_lib::{Role, Versioned};

use crate::constants::*;
use crate::error::StakingPoolError;
use crate::events::WithdrawEvent;
use crate::state::{plan_withdrawal, ShareAccount, StakingPool};
use crate::strategy::{self, PoolSide, StrategyAccounts};

#[derive(Accounts)]
pub struct WithdrawFromPool<'info> {
    /// Must hold the priority pool role
    pub priority_pool: Signer<'info>,

    #[account(
        mut,
        seeds = [STAKING_POOL_SEED, pool.token_mint.as_ref()],
        bump = pool.bump,
        constraint = pool.is_current() @ StakingPoolError::SchemaVersionMismatch
    )]
    pub pool: Box<Account<'info, StakingPool>>,

    /// CHECK: Owner of the shares being burned; only used as a PDA seed
    pub account: UncheckedAccount<'info>,

    #[account(
        mut,
        seeds = [SHARES_SEED, pool.key().as_ref(), account.key().as_ref()],
        bump = share_account.bump
    )]
    pub share_account: Account<'info, ShareAccount>,

    /// Destination of the withdrawn underlying
    #[account(
        mut,
        constraint = receiver.mint == pool.token_mint @ StakingPoolError::InvalidTokenMint
    )]
    pub receiver: Account<'info, TokenAccount>,

    #[account(
        mut,
        seeds = [VAULT_SEED, pool.key().as_ref()],
        bump = pool.vault_bump
    )]
    pub vault: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

pub fn handler_withdraw<'info>(
    ctx: Context<'_, '_, 'info, 'info, WithdrawFromPool<'info>>,
    amount: u64,
    data: Vec<u8>,
) -> Result<()> {
    require!(
        ctx.accounts
            .pool
            .access
            .permits(Role::PriorityPool, &ctx.accounts.priority_pool.key()),
        StakingPoolError::Unauthorized
    );

    let pool_key = ctx.accounts.pool.key();
    let pool_info = ctx.accounts.pool.to_account_info();

    // =========================================================================
    // Burn Shares
    // =========================================================================

    let held = ctx.accounts.share_account.shares;
    let shares_burned = ctx.accounts.pool.record_withdrawal(amount, held)?;
    ctx.accounts.share_account.debit(shares_burned)?;

    // =========================================================================
    // Plan Liquidity
    // =========================================================================

    let strategies =
        StrategyAccounts::from_remaining(ctx.remaining_accounts, &ctx.accounts.pool.strategies)?;

    let pool = &ctx.accounts.pool;
    let withdrawable = strategies
        .iter()
        .zip(pool.strategies.iter())
        .enumerate()
        .map(|(index, (accounts, entry))| {
            let report = strategy::read_report(&accounts.state, entry, &pool_key)?;
            pool.strategy_withdrawable(index as u32, report.total_deposits, report.min_deposits)
        })
        .collect::<Result<Vec<u64>>>()?;

    let idle = ctx.accounts.vault.amount;
    let (from_vault, plan) = plan_withdrawal(idle, &withdrawable, amount)?;
    let from_strategies = amount - from_vault;

    // =========================================================================
    // Pull From Strategies
    // =========================================================================

    let token_mint = ctx.accounts.pool.token_mint;
    let bump = [ctx.accounts.pool.bump];
    let pool_seeds: &[&[u8]] = &[STAKING_POOL_SEED, token_mint.as_ref(), &bump];
    let signer_seeds = &[pool_seeds];

    let vault_info = ctx.accounts.vault.to_account_info();
    let token_program_info = ctx.accounts.token_program.to_account_info();

    if from_strategies > 0 {
        let pool_side = PoolSide {
            pool: &pool_info,
            vault: &vault_info,
            token_program: &token_program_info,
            signer_seeds,
        };

        for (index, (accounts, &take)) in strategies.iter().zip(plan.iter()).enumerate().rev() {
            if take == 0 {
                continue;
            }
            strategy::withdraw(accounts, &pool_side, take, &data)?;
            ctx.accounts
                .pool
                .record_strategy_withdrawal(index as u32, take)?;
            msg!("Strategy {} returned {}", index, take);
        }

        ctx.accounts.vault.reload()?;
        let received = ctx.accounts.vault.amount.saturating_sub(idle);
        require!(
            received >= from_strategies,
            StakingPoolError::StrategyWithdrawShortfall
        );
    }

    // =========================================================================
    // Transfer Underlying: Vault -> Receiver
    // =========================================================================

    token::transfer(
        CpiContext::new_with_signer(
            token_program_info,
            Transfer {
                from: vault_info,
                to: ctx.accounts.receiver.to_account_info(),
                authority: pool_info,
            },
            signer_seeds,
        ),
        amount,
    )?;

    let pool = &ctx.accounts.pool;

    emit!(WithdrawEvent {
        staking_pool: pool_key,
        account: ctx.accounts.account.key(),
        receiver: ctx.accounts.receiver.key(),
        amount,
        shares_burned,
        from_vault,
        from_strategies,
        total_staked: pool.total_staked,
        total_shares: pool.total_shares,
    });

    msg!("Withdrew {} for {} shares", amount, shares_burned);
    msg!("From vault: {}, from strategies: {}", from_vault, from_strategies);
    msg!("New total staked: {}", pool.total_staked);

    Ok(())
}
