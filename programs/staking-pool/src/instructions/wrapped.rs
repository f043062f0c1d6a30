// =============================================================================
// Wrapped Token Instructions
// =============================================================================
// A non-rebasing SPL token over pool balance.
//
// - wrap(amount):   move `amount` of the holder's pool balance to the wrapper,
//                   mint wrapped tokens at the wrapper's current rate
// - unwrap(amount): burn `amount` wrapped tokens, move the pool balance they
//                   redeem back to the holder
// - transfer_and_call(amount, data): two-step variant of wrap. Step one moves
//                   the balance to the registered receiver, step two delivers
//                   a TokenTransferMessage that the receiver answers by minting
//
// The wrapper's holding is read before any balance moves, so wrapping and
// unwrapping never change another holder's claim.
// =============================================================================

use anchor_lang::prelude::*;
use anchor_spl::token::{self, Burn, Mint, MintTo, Token, TokenAccount};
use shared_lib::{Role, Versioned};

use crate::constants::*;
use crate::error::StakingPoolError;
use crate::events::{UnwrapEvent, WrapEvent};
use crate::state::{
    underlying_by_wrapped, wrapped_by_underlying, ShareAccount, StakingPool,
    TokenTransferMessage, TokenTransferReceiver, WrappedToken,
};

// =============================================================================
// Initialize
// =============================================================================

#[derive(Accounts)]
pub struct InitializeWrappedToken<'info> {
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [STAKING_POOL_SEED, pool.token_mint.as_ref()],
        bump = pool.bump,
        constraint = pool.is_current() @ StakingPoolError::SchemaVersionMismatch
    )]
    pub pool: Box<Account<'info, StakingPool>>,

    #[account(address = pool.token_mint @ StakingPoolError::InvalidTokenMint)]
    pub token_mint: Account<'info, Mint>,

    #[account(
        init,
        payer = owner,
        space = 8 + WrappedToken::INIT_SPACE,
        seeds = [WRAPPED_TOKEN_SEED, pool.key().as_ref()],
        bump
    )]
    pub wrapped_token: Account<'info, WrappedToken>,

    #[account(
        init,
        payer = owner,
        mint::decimals = token_mint.decimals,
        mint::authority = wrapped_token,
        seeds = [WRAPPED_MINT_SEED, wrapped_token.key().as_ref()],
        bump
    )]
    pub wrapped_mint: Account<'info, Mint>,

    /// The wrapper's own pool balance
    #[account(
        init,
        payer = owner,
        space = 8 + ShareAccount::INIT_SPACE,
        seeds = [SHARES_SEED, pool.key().as_ref(), wrapped_token.key().as_ref()],
        bump
    )]
    pub wrapper_shares: Account<'info, ShareAccount>,

    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
}

pub fn handler_initialize_wrapped_token(ctx: Context<InitializeWrappedToken>) -> Result<()> {
    require!(
        ctx.accounts
            .pool
            .access
            .permits(Role::Owner, &ctx.accounts.owner.key()),
        StakingPoolError::Unauthorized
    );

    let pool_key = ctx.accounts.pool.key();
    let wrapped_key = ctx.accounts.wrapped_token.key();

    let wrapper_shares = &mut ctx.accounts.wrapper_shares;
    wrapper_shares.pool = pool_key;
    wrapper_shares.owner = wrapped_key;
    wrapper_shares.shares = 0;
    wrapper_shares.bump = ctx.bumps.wrapper_shares;

    let wrapped_token = &mut ctx.accounts.wrapped_token;
    wrapped_token.version = STATE_VERSION;
    wrapped_token.pool = pool_key;
    wrapped_token.mint = ctx.accounts.wrapped_mint.key();
    wrapped_token.share_account = wrapper_shares.key();
    wrapped_token.bump = ctx.bumps.wrapped_token;
    wrapped_token.mint_bump = ctx.bumps.wrapped_mint;

    ctx.accounts.pool.wrapped_token = wrapped_key;

    msg!("Wrapped token {} registered", wrapped_key);
    msg!("Wrapped mint: {}", wrapped_token.mint);
    Ok(())
}

// =============================================================================
// Wrap / Unwrap
// =============================================================================

#[derive(Accounts)]
pub struct WrapTokens<'info> {
    #[account(mut)]
    pub holder: Signer<'info>,

    #[account(
        seeds = [STAKING_POOL_SEED, pool.token_mint.as_ref()],
        bump = pool.bump,
        constraint = pool.is_current() @ StakingPoolError::SchemaVersionMismatch
    )]
    pub pool: Box<Account<'info, StakingPool>>,

    #[account(
        seeds = [WRAPPED_TOKEN_SEED, pool.key().as_ref()],
        bump = wrapped_token.bump,
        constraint = wrapped_token.key() == pool.wrapped_token @ StakingPoolError::InvalidWrappedToken,
        constraint = wrapped_token.is_current() @ StakingPoolError::SchemaVersionMismatch
    )]
    pub wrapped_token: Account<'info, WrappedToken>,

    #[account(mut, address = wrapped_token.mint @ StakingPoolError::InvalidWrappedToken)]
    pub wrapped_mint: Account<'info, Mint>,

    #[account(
        init_if_needed,
        payer = holder,
        space = 8 + ShareAccount::INIT_SPACE,
        seeds = [SHARES_SEED, pool.key().as_ref(), holder.key().as_ref()],
        bump
    )]
    pub holder_shares: Account<'info, ShareAccount>,

    #[account(mut, address = wrapped_token.share_account @ StakingPoolError::InvalidShareAccount)]
    pub wrapper_shares: Account<'info, ShareAccount>,

    #[account(
        mut,
        constraint = holder_wrapped.mint == wrapped_mint.key() @ StakingPoolError::InvalidTokenMint
    )]
    pub holder_wrapped: Account<'info, TokenAccount>,

    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
}

/// Transfer-and-call: same accounts as a wrap, but the wrapper is addressed as
/// the transfer receiver and must be the one registered on the pool.
#[derive(Accounts)]
pub struct TransferAndCall<'info> {
    #[account(mut)]
    pub sender: Signer<'info>,

    #[account(
        seeds = [STAKING_POOL_SEED, pool.token_mint.as_ref()],
        bump = pool.bump,
        constraint = pool.is_current() @ StakingPoolError::SchemaVersionMismatch
    )]
    pub pool: Box<Account<'info, StakingPool>>,

    #[account(
        constraint = receiver.key() == pool.wrapped_token @ StakingPoolError::InvalidCallbackReceiver,
        constraint = receiver.is_current() @ StakingPoolError::SchemaVersionMismatch
    )]
    pub receiver: Account<'info, WrappedToken>,

    #[account(mut, address = receiver.mint @ StakingPoolError::InvalidWrappedToken)]
    pub wrapped_mint: Account<'info, Mint>,

    #[account(
        mut,
        seeds = [SHARES_SEED, pool.key().as_ref(), sender.key().as_ref()],
        bump = sender_shares.bump
    )]
    pub sender_shares: Account<'info, ShareAccount>,

    #[account(mut, address = receiver.share_account @ StakingPoolError::InvalidShareAccount)]
    pub receiver_shares: Account<'info, ShareAccount>,

    #[account(
        mut,
        constraint = sender_wrapped.mint == wrapped_mint.key() @ StakingPoolError::InvalidTokenMint
    )]
    pub sender_wrapped: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

/// Move `amount` of pool balance between share accounts, returning shares moved
fn move_balance(
    pool: &StakingPool,
    from: &mut ShareAccount,
    to: &mut ShareAccount,
    amount: u64,
) -> Result<u64> {
    let shares = pool.shares_for_transfer(amount, from.shares)?;
    from.debit(shares)?;
    to.credit(shares)?;
    Ok(shares)
}

fn mint_wrapped<'info>(
    token_program: AccountInfo<'info>,
    mint: AccountInfo<'info>,
    to: AccountInfo<'info>,
    wrapped_token: &Account<'info, WrappedToken>,
    amount: u64,
) -> Result<()> {
    let seeds: &[&[u8]] = &[
        WRAPPED_TOKEN_SEED,
        wrapped_token.pool.as_ref(),
        &[wrapped_token.bump],
    ];

    token::mint_to(
        CpiContext::new_with_signer(
            token_program,
            MintTo {
                mint,
                to,
                authority: wrapped_token.to_account_info(),
            },
            &[seeds],
        ),
        amount,
    )
}

pub fn handler_wrap(ctx: Context<WrapTokens>, amount: u64) -> Result<()> {
    let pool_key = ctx.accounts.pool.key();
    let holder_key = ctx.accounts.holder.key();
    ctx.accounts
        .holder_shares
        .open_if_new(pool_key, holder_key, ctx.bumps.holder_shares);

    let held = ctx.accounts.pool.balance_of(ctx.accounts.wrapper_shares.shares)?;
    let supply = ctx.accounts.wrapped_mint.supply;

    let wrapped = wrapped_by_underlying(amount, supply, held)?;
    require!(wrapped > 0, StakingPoolError::ShareAmountZero);

    move_balance(
        &ctx.accounts.pool,
        &mut ctx.accounts.holder_shares,
        &mut ctx.accounts.wrapper_shares,
        amount,
    )?;

    mint_wrapped(
        ctx.accounts.token_program.to_account_info(),
        ctx.accounts.wrapped_mint.to_account_info(),
        ctx.accounts.holder_wrapped.to_account_info(),
        &ctx.accounts.wrapped_token,
        wrapped,
    )?;

    emit!(WrapEvent {
        wrapped_token: ctx.accounts.wrapped_token.key(),
        account: holder_key,
        underlying_amount: amount,
        wrapped_amount: wrapped,
    });

    msg!("Wrapped {} into {} wrapped tokens", amount, wrapped);
    Ok(())
}

pub fn handler_unwrap(ctx: Context<WrapTokens>, amount: u64) -> Result<()> {
    require!(amount > 0, StakingPoolError::InvalidAmount);

    let pool_key = ctx.accounts.pool.key();
    let holder_key = ctx.accounts.holder.key();
    ctx.accounts
        .holder_shares
        .open_if_new(pool_key, holder_key, ctx.bumps.holder_shares);

    let held = ctx.accounts.pool.balance_of(ctx.accounts.wrapper_shares.shares)?;
    let supply = ctx.accounts.wrapped_mint.supply;

    let underlying = underlying_by_wrapped(amount, supply, held)?;
    require!(underlying > 0, StakingPoolError::ShareAmountZero);

    token::burn(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            Burn {
                mint: ctx.accounts.wrapped_mint.to_account_info(),
                from: ctx.accounts.holder_wrapped.to_account_info(),
                authority: ctx.accounts.holder.to_account_info(),
            },
        ),
        amount,
    )?;

    move_balance(
        &ctx.accounts.pool,
        &mut ctx.accounts.wrapper_shares,
        &mut ctx.accounts.holder_shares,
        underlying,
    )?;

    emit!(UnwrapEvent {
        wrapped_token: ctx.accounts.wrapped_token.key(),
        account: holder_key,
        wrapped_amount: amount,
        underlying_amount: underlying,
    });

    msg!("Unwrapped {} wrapped tokens into {}", amount, underlying);
    Ok(())
}

pub fn handler_transfer_and_call(
    ctx: Context<TransferAndCall>,
    amount: u64,
    data: Vec<u8>,
) -> Result<()> {
    // Step one: the value moves to the receiver
    let held_before = ctx.accounts.pool.balance_of(ctx.accounts.receiver_shares.shares)?;
    let supply = ctx.accounts.wrapped_mint.supply;

    move_balance(
        &ctx.accounts.pool,
        &mut ctx.accounts.sender_shares,
        &mut ctx.accounts.receiver_shares,
        amount,
    )?;

    // Step two: the receiver is told who sent what
    let message = TokenTransferMessage {
        sender: ctx.accounts.sender.key(),
        amount,
        data,
    };
    let wrapped = ctx
        .accounts
        .receiver
        .on_token_transfer(&message, held_before, supply)?;

    mint_wrapped(
        ctx.accounts.token_program.to_account_info(),
        ctx.accounts.wrapped_mint.to_account_info(),
        ctx.accounts.sender_wrapped.to_account_info(),
        &ctx.accounts.receiver,
        wrapped,
    )?;

    emit!(WrapEvent {
        wrapped_token: ctx.accounts.receiver.key(),
        account: message.sender,
        underlying_amount: amount,
        wrapped_amount: wrapped,
    });

    msg!("Transfer-and-call: {} in, {} wrapped out", amount, wrapped);
    Ok(())
}

// =============================================================================
// Views
// =============================================================================

#[derive(Accounts)]
pub struct WrappedView<'info> {
    pub pool: Box<Account<'info, StakingPool>>,

    #[account(
        constraint = wrapped_token.key() == pool.wrapped_token @ StakingPoolError::InvalidWrappedToken
    )]
    pub wrapped_token: Account<'info, WrappedToken>,

    #[account(address = wrapped_token.mint @ StakingPoolError::InvalidWrappedToken)]
    pub wrapped_mint: Account<'info, Mint>,

    #[account(address = wrapped_token.share_account @ StakingPoolError::InvalidShareAccount)]
    pub wrapper_shares: Account<'info, ShareAccount>,
}

impl<'info> WrappedView<'info> {
    fn held(&self) -> Result<u64> {
        self.pool.balance_of(self.wrapper_shares.shares)
    }
}

pub fn handler_get_wrapped_by_underlying(ctx: Context<WrappedView>, amount: u64) -> Result<u64> {
    wrapped_by_underlying(amount, ctx.accounts.wrapped_mint.supply, ctx.accounts.held()?)
}

pub fn handler_get_underlying_by_wrapped(ctx: Context<WrappedView>, amount: u64) -> Result<u64> {
    underlying_by_wrapped(amount, ctx.accounts.wrapped_mint.supply, ctx.accounts.held()?)
}
