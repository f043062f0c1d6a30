// =============================================================================
// Staking Pool
// =============================================================================
//
// Pools depositor funds and spreads them across an ordered list of external
// yield strategies:
// - Depositors hold shares; balance = shares * total_staked / total_shares
// - Strategy rewards and slashing are reconciled into total_staked, so
//   every balance rebases without touching shares
// - Positive reconciliations mint fee shares to the fee receivers
// - A wrapped token gives a non-rebasing view over pool balance
//
// Deposits and withdrawals come only from the priority pool, reconciliation
// only from the rewards initiator, configuration only from the owner.
// =============================================================================

pub mod constants;
pub mod error;
pub mod events;
pub mod instructions;
pub mod state;
pub mod strategy;

use anchor_lang::prelude::*;

pub use constants::*;
pub use error::*;
pub use instructions::*;
pub use state::*;

declare_id!("5UjUqb6Eu9gUcYq68vSqDj3Wx4FG9dPz24jP221ou8sz");

#[program]
pub mod staking_pool {
    use super::*;

    // =========================================================================
    // Setup
    // =========================================================================

    /// Create the pool and its vault for one underlying token.
    /// The signer becomes owner.
    pub fn initialize(
        ctx: Context<InitializeStakingPool>,
        priority_pool: Pubkey,
        rewards_initiator: Pubkey,
    ) -> Result<()> {
        instructions::initialize::handler_initialize(ctx, priority_pool, rewards_initiator)
    }

    /// Create an empty share account for `owner` (anyone may pay)
    pub fn open_share_account(ctx: Context<OpenShareAccount>) -> Result<()> {
        instructions::share_accounts::handler_open_share_account(ctx)
    }

    // =========================================================================
    // Priority Pool Operations
    // =========================================================================

    /// Deposit `amount` on behalf of `account` and allocate it across strategies
    ///
    /// remaining_accounts: [strategy_program, strategy_state, deposit_account,
    /// strategy_authority] per registered strategy, in list order
    pub fn deposit<'info>(
        ctx: Context<'_, '_, 'info, 'info, DepositToPool<'info>>,
        amount: u64,
    ) -> Result<()> {
        instructions::deposit::handler_deposit(ctx, amount)
    }

    /// Withdraw `amount` of `account`'s balance to `receiver`
    ///
    /// `data` is passed through to each strategy's withdraw.
    /// remaining_accounts: same layout as deposit
    pub fn withdraw<'info>(
        ctx: Context<'_, '_, 'info, 'info, WithdrawFromPool<'info>>,
        amount: u64,
        data: Vec<u8>,
    ) -> Result<()> {
        instructions::withdraw::handler_withdraw(ctx, amount, data)
    }

    // =========================================================================
    // Rewards Initiator Operations
    // =========================================================================

    /// Reconcile the deposit change of the strategies at `indices`
    ///
    /// remaining_accounts: one strategy state per index, then one ShareAccount
    /// per fee receiver in fee-list order
    pub fn update_strategy_rewards<'info>(
        ctx: Context<'_, '_, 'info, 'info, UpdateStrategyRewards<'info>>,
        indices: Vec<u32>,
        data: Vec<u8>,
    ) -> Result<()> {
        instructions::update_strategy_rewards::handler_update_strategy_rewards(ctx, indices, data)
    }

    /// View: net change and total fees reconciling `indices` would produce
    pub fn get_strategy_rewards<'info>(
        ctx: Context<'_, '_, 'info, 'info, GetStrategyRewards<'info>>,
        indices: Vec<u32>,
    ) -> Result<StrategyRewards> {
        instructions::update_strategy_rewards::handler_get_strategy_rewards(ctx, indices)
    }

    // =========================================================================
    // Share Ledger
    // =========================================================================

    /// Move `amount` of the signer's balance to another share account
    pub fn transfer_shares(ctx: Context<TransferShares>, amount: u64) -> Result<()> {
        instructions::share_accounts::handler_transfer_shares(ctx, amount)
    }

    /// Add underlying to the pool without minting shares
    pub fn donate_tokens(ctx: Context<DonateTokens>, amount: u64) -> Result<()> {
        instructions::donate::handler_donate_tokens(ctx, amount)
    }

    pub fn balance_of(ctx: Context<ShareView>) -> Result<u64> {
        instructions::share_accounts::handler_balance_of(ctx)
    }

    pub fn shares_of(ctx: Context<ShareView>) -> Result<u64> {
        instructions::share_accounts::handler_shares_of(ctx)
    }

    // =========================================================================
    // Wrapped Token
    // =========================================================================

    /// Create and register the wrapped token (owner only)
    pub fn initialize_wrapped_token(ctx: Context<InitializeWrappedToken>) -> Result<()> {
        instructions::wrapped::handler_initialize_wrapped_token(ctx)
    }

    pub fn wrap(ctx: Context<WrapTokens>, amount: u64) -> Result<()> {
        instructions::wrapped::handler_wrap(ctx, amount)
    }

    pub fn unwrap(ctx: Context<WrapTokens>, amount: u64) -> Result<()> {
        instructions::wrapped::handler_unwrap(ctx, amount)
    }

    /// Move `amount` of balance to the registered wrapped token, then deliver
    /// the transfer message so it mints the sender's wrapped tokens
    pub fn transfer_and_call(
        ctx: Context<TransferAndCall>,
        amount: u64,
        data: Vec<u8>,
    ) -> Result<()> {
        instructions::wrapped::handler_transfer_and_call(ctx, amount, data)
    }

    pub fn get_wrapped_by_underlying(ctx: Context<WrappedView>, amount: u64) -> Result<u64> {
        instructions::wrapped::handler_get_wrapped_by_underlying(ctx, amount)
    }

    pub fn get_underlying_by_wrapped(ctx: Context<WrappedView>, amount: u64) -> Result<u64> {
        instructions::wrapped::handler_get_underlying_by_wrapped(ctx, amount)
    }

    // =========================================================================
    // Owner Operations
    // =========================================================================

    /// Append a strategy to the end of the list
    pub fn add_strategy(ctx: Context<AddStrategy>) -> Result<()> {
        instructions::strategies::handler_add_strategy(ctx)
    }

    /// Detach the strategy at `index`; it must hold no deposits
    pub fn remove_strategy(ctx: Context<ConfigurePool>, index: u32) -> Result<()> {
        instructions::strategies::handler_remove_strategy(ctx, index)
    }

    /// New position `i` takes the strategy at old index `order[i]`
    pub fn reorder_strategies(ctx: Context<ConfigurePool>, order: Vec<u32>) -> Result<()> {
        instructions::strategies::handler_reorder_strategies(ctx, order)
    }

    pub fn add_fee(ctx: Context<ConfigurePool>, receiver: Pubkey, basis_points: u16) -> Result<()> {
        instructions::fees::handler_add_fee(ctx, receiver, basis_points)
    }

    /// Zero basis points removes the fee
    pub fn update_fee(
        ctx: Context<ConfigurePool>,
        index: u32,
        receiver: Pubkey,
        basis_points: u16,
    ) -> Result<()> {
        instructions::fees::handler_update_fee(ctx, index, receiver, basis_points)
    }

    pub fn set_priority_pool(ctx: Context<ConfigurePool>, priority_pool: Pubkey) -> Result<()> {
        instructions::admin::handler_set_priority_pool(ctx, priority_pool)
    }

    pub fn set_rewards_initiator(
        ctx: Context<ConfigurePool>,
        rewards_initiator: Pubkey,
    ) -> Result<()> {
        instructions::admin::handler_set_rewards_initiator(ctx, rewards_initiator)
    }

    pub fn set_wrapped_token(ctx: Context<ConfigurePool>, wrapped_token: Pubkey) -> Result<()> {
        instructions::admin::handler_set_wrapped_token(ctx, wrapped_token)
    }

    pub fn transfer_ownership(ctx: Context<ConfigurePool>, new_owner: Pubkey) -> Result<()> {
        instructions::admin::handler_transfer_ownership(ctx, new_owner)
    }

    /// Lift pool state to the current schema version
    pub fn migrate(ctx: Context<MigrateStakingPool>) -> Result<()> {
        instructions::admin::handler_migrate(ctx)
    }

    pub fn migrate_wrapped_token(ctx: Context<MigrateWrappedToken>) -> Result<()> {
        instructions::admin::handler_migrate_wrapped_token(ctx)
    }
}
