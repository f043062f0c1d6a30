// =============================================================================
// Deposit Instruction
// =============================================================================
// The priority pool deposits underlying on behalf of an account.
//
// Flow:
// 1. Mint shares to the account at the current rate
// 2. Pull the underlying from the priority pool into the vault
// 3. Walk the strategy list in order, filling each strategy's free room
//    (max_deposits - total_deposits) until the amount is used up
// 4. Anything no strategy could take stays idle in the vault
//
// remaining_accounts: [strategy_program, strategy_state, deposit_account,
// strategy_authority] for every registered strategy, in list order.
// =============================================================================

use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};
use shared_lib::{Role, Versioned};

use crate::constants::*;
use crate::error::StakingPoolError;
use crate::events::DepositEvent;
use crate::state::{allocate_deposit, ShareAccount, StakingPool};
use crate::strategy::{self, PoolSide, StrategyAccounts};

#[derive(Accounts)]
pub struct DepositToPool<'info> {
    // =========================================================================
    // Signers
    // =========================================================================

    /// Must hold the priority pool role. Pays for the share account on first deposit.
    #[account(mut)]
    pub priority_pool: Signer<'info>,

    // =========================================================================
    // Pool Accounts
    // =========================================================================

    #[account(
        mut,
        seeds = [STAKING_POOL_SEED, pool.token_mint.as_ref()],
        bump = pool.bump,
        constraint = pool.is_current() @ StakingPoolError::SchemaVersionMismatch
    )]
    pub pool: Box<Account<'info, StakingPool>>,

    /// CHECK: Any key may own shares; only used as a PDA seed
    pub account: UncheckedAccount<'info>,

    #[account(
        init_if_needed,
        payer = priority_pool,
        space = 8 + ShareAccount::INIT_SPACE,
        seeds = [SHARES_SEED, pool.key().as_ref(), account.key().as_ref()],
        bump
    )]
    pub share_account: Account<'info, ShareAccount>,

    // =========================================================================
    // Token Accounts
    // =========================================================================

    /// Priority pool's token account (source of funds)
    #[account(
        mut,
        constraint = source.mint == pool.token_mint @ StakingPoolError::InvalidTokenMint
    )]
    pub source: Account<'info, TokenAccount>,

    #[account(
        mut,
        seeds = [VAULT_SEED, pool.key().as_ref()],
        bump = pool.vault_bump
    )]
    pub vault: Account<'info, TokenAccount>,

    // =========================================================================
    // Programs
    // =========================================================================

    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
}

pub fn handler_deposit<'info>(
    ctx: Context<'_, '_, 'info, 'info, DepositToPool<'info>>,
    amount: u64,
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
    let account_key = ctx.accounts.account.key();

    // =========================================================================
    // Mint Shares
    // =========================================================================

    let shares = ctx.accounts.pool.record_deposit(amount)?;

    let share_account = &mut ctx.accounts.share_account;
    share_account.open_if_new(pool_key, account_key, ctx.bumps.share_account);
    share_account.credit(shares)?;

    // =========================================================================
    // Transfer Underlying: Priority Pool -> Vault
    // =========================================================================

    token::transfer(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.source.to_account_info(),
                to: ctx.accounts.vault.to_account_info(),
                authority: ctx.accounts.priority_pool.to_account_info(),
            },
        ),
        amount,
    )?;

    // =========================================================================
    // Allocate Across Strategies
    // =========================================================================

    let strategies =
        StrategyAccounts::from_remaining(ctx.remaining_accounts, &ctx.accounts.pool.strategies)?;

    let room = strategies
        .iter()
        .zip(ctx.accounts.pool.strategies.iter())
        .map(|(accounts, entry)| {
            Ok(strategy::read_report(&accounts.state, entry, &pool_key)?.deposit_room())
        })
        .collect::<Result<Vec<u64>>>()?;

    let (allocations, unallocated) = allocate_deposit(&room, amount);

    let token_mint = ctx.accounts.pool.token_mint;
    let bump = [ctx.accounts.pool.bump];
    let pool_seeds: &[&[u8]] = &[STAKING_POOL_SEED, token_mint.as_ref(), &bump];
    let signer_seeds = &[pool_seeds];

    let vault_info = ctx.accounts.vault.to_account_info();
    let token_program_info = ctx.accounts.token_program.to_account_info();
    let pool_side = PoolSide {
        pool: &pool_info,
        vault: &vault_info,
        token_program: &token_program_info,
        signer_seeds,
    };

    for (index, (accounts, &allocation)) in strategies.iter().zip(allocations.iter()).enumerate() {
        if allocation == 0 {
            continue;
        }

        token::transfer(
            CpiContext::new_with_signer(
                token_program_info.clone(),
                Transfer {
                    from: vault_info.clone(),
                    to: accounts.deposit_account.clone(),
                    authority: pool_info.clone(),
                },
                signer_seeds,
            ),
            allocation,
        )?;
        strategy::deposit(accounts, &pool_side, allocation)?;

        ctx.accounts
            .pool
            .record_strategy_deposit(index as u32, allocation)?;
        msg!("Strategy {} received {}", index, allocation);
    }

    // =========================================================================
    // Log Results
    // =========================================================================

    let pool = &ctx.accounts.pool;

    emit!(DepositEvent {
        staking_pool: pool_key,
        account: account_key,
        amount,
        shares_minted: shares,
        allocations,
        unallocated,
        total_staked: pool.total_staked,
        total_shares: pool.total_shares,
    });

    msg!("Deposited {} for {} shares", amount, shares);
    msg!("Idle after allocation: {}", unallocated);
    msg!("New total staked: {}", pool.total_staked);
    msg!("New total shares: {}", pool.total_shares);

    Ok(())
}
