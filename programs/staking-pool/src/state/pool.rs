// =============================================================================
// StakingPool State Account
// =============================================================================
// The StakingPool is the ledger behind the rebasing pool share:
//
//   balance_of(account) = shares[account] * total_staked / total_shares
//
// - Deposits mint shares at the current rate and raise total_staked
// - Withdrawals burn shares at the current rate and lower total_staked
// - Reconciliation folds each strategy's signed deposit change into
//   total_staked, so every holder's balance moves without touching shares
// - Positive reconciliations mint fee shares to the fee receivers
//
// total_staked equals idle vault balance plus the cached total of every
// strategy right after a reconciliation over all strategies. Between partial
// reconciliations the unreconciled strategies may drift from their cache.
// =============================================================================

use anchor_lang::prelude::*;
use shared_lib::{apply_bp, mul_div, mul_div_ceil, AccessPolicy, Versioned};

use crate::constants::*;
use crate::error::StakingPoolError;

/// The main StakingPool account.
///
/// PDA derived from ["staking_pool", token_mint_pubkey].
#[account]
#[derive(InitSpace)]
pub struct StakingPool {
    /// Schema version this account was written with
    pub version: u8,

    /// Owner, priority pool and rewards initiator
    pub access: AccessPolicy,

    /// The underlying asset
    pub token_mint: Pubkey,

    /// PDA-owned token account holding idle underlying
    pub vault: Pubkey,

    /// WrappedToken registered as transfer-and-call receiver
    /// Default pubkey until the owner registers one
    pub wrapped_token: Pubkey,

    /// Total underlying owned by share holders (vault + strategies)
    pub total_staked: u64,

    /// Total shares across all ShareAccounts
    pub total_shares: u64,

    /// Fee receivers paid on every positive reconciliation
    #[max_len(MAX_FEES)]
    pub fees: Vec<Fee>,

    /// Strategies in allocation order
    #[max_len(MAX_STRATEGIES)]
    pub strategies: Vec<StrategyEntry>,

    pub bump: u8,
    pub vault_bump: u8,
}

/// A fee receiver and its cut of positive reconciliations
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub struct Fee {
    /// Owner of the ShareAccount credited with fee shares
    pub receiver: Pubkey,
    pub basis_points: u16,
}

/// A strategy attached to the pool
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub struct StrategyEntry {
    /// Strategy state account, owned by `strategy_program`
    pub strategy_state: Pubkey,

    /// Program implementing the strategy's deposit/withdraw instructions
    pub strategy_program: Pubkey,

    /// Token account deposits are transferred into
    pub deposit_account: Pubkey,

    /// Strategy value as of the last reconciliation or transfer.
    /// deposit_change = reported total_deposits - this
    pub total_deposits: u64,
}

/// Outcome of folding strategy deposit changes into the pool
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reconciliation {
    pub net_change: i64,
    /// Underlying owed to each fee receiver, in fee-list order
    pub fee_amounts: Vec<u64>,
    /// Shares minted to each fee receiver, in fee-list order
    pub fee_shares: Vec<u64>,
}

/// Returned by the `get_strategy_rewards` view
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct StrategyRewards {
    pub net_change: i64,
    pub total_fees: u64,
}

impl StakingPool {
    // =========================================================================
    // Share Conversions
    // =========================================================================

    /// Shares worth `amount` of underlying at the current rate (rounded down)
    ///
    /// - Empty pool (no shares or nothing staked): 1:1
    /// - Otherwise: amount * total_shares / total_staked
    pub fn shares_by_stake(&self, amount: u64) -> Result<u64> {
        if self.total_shares == 0 || self.total_staked == 0 {
            return Ok(amount);
        }
        Ok(mul_div(amount, self.total_shares, self.total_staked).map_err(StakingPoolError::from)?)
    }

    /// Underlying claimed by `shares` at the current rate (rounded down)
    pub fn stake_by_shares(&self, shares: u64) -> Result<u64> {
        if self.total_shares == 0 {
            return Ok(0);
        }
        Ok(mul_div(shares, self.total_staked, self.total_shares).map_err(StakingPoolError::from)?)
    }

    /// Rebasing balance of an account holding `shares`
    pub fn balance_of(&self, shares: u64) -> Result<u64> {
        self.stake_by_shares(shares)
    }

    // =========================================================================
    // Ledger Updates
    // =========================================================================

    /// Mint shares for a deposit and raise total_staked.
    ///
    /// Returns the number of shares to credit to the depositor.
    pub fn record_deposit(&mut self, amount: u64) -> Result<u64> {
        require!(amount > 0, StakingPoolError::InvalidAmount);

        let shares = self.shares_by_stake(amount)?;
        require!(shares > 0, StakingPoolError::ShareAmountZero);

        self.total_staked = self
            .total_staked
            .checked_add(amount)
            .ok_or(StakingPoolError::MathOverflow)?;
        self.total_shares = self
            .total_shares
            .checked_add(shares)
            .ok_or(StakingPoolError::MathOverflow)?;

        Ok(shares)
    }

    /// Burn shares for a withdrawal of `amount` underlying and lower total_staked.
    ///
    /// Shares burned are rounded up (capped at what the account holds) so the
    /// rounding never shifts value from the remaining holders to the withdrawer.
    pub fn record_withdrawal(&mut self, amount: u64, account_shares: u64) -> Result<u64> {
        require!(amount > 0, StakingPoolError::InvalidAmount);
        require!(
            amount <= self.balance_of(account_shares)?,
            StakingPoolError::InsufficientBalance
        );

        let shares = mul_div_ceil(amount, self.total_shares, self.total_staked)
            .map_err(StakingPoolError::from)?
            .min(account_shares);

        self.total_staked = self
            .total_staked
            .checked_sub(amount)
            .ok_or(StakingPoolError::MathUnderflow)?;
        self.total_shares = self
            .total_shares
            .checked_sub(shares)
            .ok_or(StakingPoolError::MathUnderflow)?;

        Ok(shares)
    }

    /// Shares that move when an account holding `sender_shares` transfers
    /// `amount` of its balance. Totals are unchanged by transfers.
    pub fn shares_for_transfer(&self, amount: u64, sender_shares: u64) -> Result<u64> {
        require!(amount > 0, StakingPoolError::InvalidAmount);
        require!(
            amount <= self.balance_of(sender_shares)?,
            StakingPoolError::InsufficientBalance
        );

        let shares = self.shares_by_stake(amount)?.min(sender_shares);
        require!(shares > 0, StakingPoolError::ShareAmountZero);
        Ok(shares)
    }

    /// Underlying added without minting shares raises every holder's balance
    pub fn record_donation(&mut self, amount: u64) -> Result<()> {
        require!(amount > 0, StakingPoolError::InvalidAmount);
        self.total_staked = self
            .total_staked
            .checked_add(amount)
            .ok_or(StakingPoolError::MathOverflow)?;
        Ok(())
    }

    // =========================================================================
    // Strategy List
    // =========================================================================

    pub fn strategy(&self, index: u32) -> Result<&StrategyEntry> {
        self.strategies
            .get(index as usize)
            .ok_or_else(|| error!(StakingPoolError::IndexOutOfRange))
    }

    /// Attach a strategy. It must start empty: value it already holds was
    /// never deposited by the pool and is not counted in total_staked.
    pub fn add_strategy(&mut self, entry: StrategyEntry) -> Result<u32> {
        require!(
            self.strategies.len() < MAX_STRATEGIES,
            StakingPoolError::TooManyStrategies
        );
        require!(entry.total_deposits == 0, StakingPoolError::StrategyInUse);
        require!(
            !self
                .strategies
                .iter()
                .any(|s| s.strategy_state == entry.strategy_state),
            StakingPoolError::StrategyExists
        );

        self.strategies.push(entry);
        Ok((self.strategies.len() - 1) as u32)
    }

    /// Detach a strategy. Later strategies shift down one index.
    pub fn remove_strategy(&mut self, index: u32) -> Result<StrategyEntry> {
        let entry = *self.strategy(index)?;
        require!(entry.total_deposits == 0, StakingPoolError::StrategyInUse);
        Ok(self.strategies.remove(index as usize))
    }

    /// Rearrange strategies so that new position `i` holds old index `order[i]`
    pub fn reorder_strategies(&mut self, order: &[u32]) -> Result<()> {
        require!(
            order.len() == self.strategies.len(),
            StakingPoolError::InvalidStrategyOrder
        );

        let mut seen = vec![false; order.len()];
        for &index in order {
            let slot = seen
                .get_mut(index as usize)
                .ok_or(StakingPoolError::InvalidStrategyOrder)?;
            require!(!*slot, StakingPoolError::InvalidStrategyOrder);
            *slot = true;
        }

        self.strategies = order
            .iter()
            .map(|&index| self.strategies[index as usize])
            .collect();
        Ok(())
    }

    pub fn record_strategy_deposit(&mut self, index: u32, amount: u64) -> Result<()> {
        let entry = self
            .strategies
            .get_mut(index as usize)
            .ok_or(StakingPoolError::IndexOutOfRange)?;
        entry.total_deposits = entry
            .total_deposits
            .checked_add(amount)
            .ok_or(StakingPoolError::MathOverflow)?;
        Ok(())
    }

    /// Liquidity the pool may pull from strategy `index` down to its floor.
    ///
    /// Bounded by the lower of the reported and cached totals, so a withdrawal
    /// moves both by the same amount and leaves the strategy's unreconciled
    /// deposit change as it was.
    pub fn strategy_withdrawable(
        &self,
        index: u32,
        reported_total: u64,
        min_deposits: u64,
    ) -> Result<u64> {
        let cached = self.strategy(index)?.total_deposits;
        Ok(reported_total.min(cached).saturating_sub(min_deposits))
    }

    /// Lower the cache after pulling `amount` out of a strategy. `amount` must
    /// fit within `strategy_withdrawable`.
    pub fn record_strategy_withdrawal(&mut self, index: u32, amount: u64) -> Result<()> {
        let entry = self
            .strategies
            .get_mut(index as usize)
            .ok_or(StakingPoolError::IndexOutOfRange)?;
        entry.total_deposits = entry
            .total_deposits
            .checked_sub(amount)
            .ok_or(StakingPoolError::MathUnderflow)?;
        Ok(())
    }

    // =========================================================================
    // Fee List
    // =========================================================================

    pub fn total_fee_bps(&self) -> u32 {
        self.fees.iter().map(|fee| fee.basis_points as u32).sum()
    }

    pub fn add_fee(&mut self, receiver: Pubkey, basis_points: u16) -> Result<()> {
        require!(receiver != Pubkey::default(), StakingPoolError::InvalidAddress);
        require!(self.fees.len() < MAX_FEES, StakingPoolError::TooManyFees);
        require!(
            self.total_fee_bps() + basis_points as u32 <= MAX_TOTAL_FEES_BPS,
            StakingPoolError::FeeExceedsLimit
        );

        self.fees.push(Fee {
            receiver,
            basis_points,
        });
        Ok(())
    }

    /// Replace the fee at `index`; zero basis points removes it
    pub fn update_fee(&mut self, index: u32, receiver: Pubkey, basis_points: u16) -> Result<()> {
        let index = index as usize;
        require!(index < self.fees.len(), StakingPoolError::IndexOutOfRange);

        if basis_points == 0 {
            self.fees.remove(index);
            return Ok(());
        }

        require!(receiver != Pubkey::default(), StakingPoolError::InvalidAddress);
        let others = self.total_fee_bps() - self.fees[index].basis_points as u32;
        require!(
            others + basis_points as u32 <= MAX_TOTAL_FEES_BPS,
            StakingPoolError::FeeExceedsLimit
        );

        self.fees[index] = Fee {
            receiver,
            basis_points,
        };
        Ok(())
    }

    // =========================================================================
    // Reconciliation
    // =========================================================================

    /// Reject out-of-range and repeated indices; a repeat would count a
    /// strategy's change twice.
    pub fn validate_indices(&self, indices: &[u32]) -> Result<()> {
        require!(!indices.is_empty(), StakingPoolError::NoStrategiesToUpdate);

        let mut seen = vec![false; self.strategies.len()];
        for &index in indices {
            let slot = seen
                .get_mut(index as usize)
                .ok_or(StakingPoolError::IndexOutOfRange)?;
            require!(!*slot, StakingPoolError::DuplicateStrategyIndex);
            *slot = true;
        }
        Ok(())
    }

    /// Signed change of strategy `index` given the total it reports now
    pub fn deposit_change(&self, index: u32, reported_total: u64) -> Result<i64> {
        let cached = self.strategy(index)?.total_deposits;
        i64::try_from(reported_total as i128 - cached as i128)
            .map_err(|_| error!(StakingPoolError::MathOverflow))
    }

    /// Sum of deposit changes over `(index, reported_total)` pairs
    pub fn net_deposit_change(&self, reports: &[(u32, u64)]) -> Result<i64> {
        reports.iter().try_fold(0i64, |net, &(index, reported)| {
            net.checked_add(self.deposit_change(index, reported)?)
                .ok_or_else(|| error!(StakingPoolError::MathOverflow))
        })
    }

    /// Underlying owed to each fee receiver for a net change (zero unless positive)
    pub fn fee_amounts(&self, net_change: i64) -> Result<Vec<u64>> {
        if net_change <= 0 {
            return Ok(vec![0; self.fees.len()]);
        }
        self.fees
            .iter()
            .map(|fee| {
                Ok(apply_bp(net_change as u64, fee.basis_points).map_err(StakingPoolError::from)?)
            })
            .collect()
    }

    /// Preview of a reconciliation without touching state
    pub fn preview_rewards(&self, reports: &[(u32, u64)]) -> Result<StrategyRewards> {
        self.validate_indices(&reports.iter().map(|(i, _)| *i).collect::<Vec<_>>())?;
        let net_change = self.net_deposit_change(reports)?;
        let total_fees = self.fee_amounts(net_change)?.iter().sum();
        Ok(StrategyRewards {
            net_change,
            total_fees,
        })
    }

    /// Fold reported strategy totals into the pool.
    ///
    /// 1. net_change = sum of (reported - cached) over the given strategies
    /// 2. the cache of each given strategy is reset to its reported total
    /// 3. total_staked moves by net_change (losses are shared by all holders)
    /// 4. on a positive net_change, fee shares are minted so each receiver's
    ///    balance at the new rate equals its fee amount:
    ///      to_mint = total_fees * total_shares / (total_staked - total_fees)
    ///    split between receivers pro rata to their fee amounts
    pub fn reconcile(&mut self, reports: &[(u32, u64)]) -> Result<Reconciliation> {
        self.validate_indices(&reports.iter().map(|(i, _)| *i).collect::<Vec<_>>())?;
        let net_change = self.net_deposit_change(reports)?;

        for &(index, reported) in reports {
            self.strategies[index as usize].total_deposits = reported;
        }

        self.total_staked = if net_change >= 0 {
            self.total_staked
                .checked_add(net_change as u64)
                .ok_or(StakingPoolError::MathOverflow)?
        } else {
            self.total_staked
                .checked_sub(net_change.unsigned_abs())
                .ok_or(StakingPoolError::MathUnderflow)?
        };

        let fee_amounts = self.fee_amounts(net_change)?;
        let fee_shares = self.fee_shares(&fee_amounts)?;

        let minted: u64 = fee_shares.iter().sum();
        self.total_shares = self
            .total_shares
            .checked_add(minted)
            .ok_or(StakingPoolError::MathOverflow)?;

        Ok(Reconciliation {
            net_change,
            fee_amounts,
            fee_shares,
        })
    }

    /// Shares per receiver for fee amounts, against the already-updated total_staked
    fn fee_shares(&self, fee_amounts: &[u64]) -> Result<Vec<u64>> {
        let total_fees = fee_amounts
            .iter()
            .try_fold(0u64, |acc, &fee| acc.checked_add(fee))
            .ok_or(StakingPoolError::MathOverflow)?;

        if total_fees == 0 {
            return Ok(vec![0; fee_amounts.len()]);
        }

        if self.total_shares == 0 {
            // Nobody else holds a claim, fees are minted 1:1
            return Ok(fee_amounts.to_vec());
        }

        let value_without_fees = self
            .total_staked
            .checked_sub(total_fees)
            .ok_or(StakingPoolError::MathUnderflow)?;
        let to_mint = mul_div(total_fees, self.total_shares, value_without_fees)
            .map_err(StakingPoolError::from)?;

        fee_amounts
            .iter()
            .map(|&fee| Ok(mul_div(to_mint, fee, total_fees).map_err(StakingPoolError::from)?))
            .collect()
    }
}

// =============================================================================
// Allocation Planning
// =============================================================================

/// Split `amount` across strategies in list order, each taking as much as its
/// free room allows. Returns the per-strategy allocation and the remainder that
/// stays idle in the vault.
pub fn allocate_deposit(room: &[u64], amount: u64) -> (Vec<u64>, u64) {
    let mut remaining = amount;
    let allocations = room
        .iter()
        .map(|&free| {
            let take = free.min(remaining);
            remaining -= take;
            take
        })
        .collect();
    (allocations, remaining)
}

/// Source `amount` of liquidity: idle vault balance first, then strategies
/// from the last one to the first, each down to its minimum deposits.
///
/// Returns (amount from vault, amount per strategy in list order).
pub fn plan_withdrawal(idle: u64, withdrawable: &[u64], amount: u64) -> Result<(u64, Vec<u64>)> {
    let from_vault = idle.min(amount);
    let mut remaining = amount - from_vault;
    let mut plan = vec![0; withdrawable.len()];

    for (index, &available) in withdrawable.iter().enumerate().rev() {
        if remaining == 0 {
            break;
        }
        let take = available.min(remaining);
        plan[index] = take;
        remaining -= take;
    }

    require!(remaining == 0, StakingPoolError::InsufficientLiquidity);
    Ok((from_vault, plan))
}

impl Versioned for StakingPool {
    const LATEST_VERSION: u8 = STATE_VERSION;

    fn version(&self) -> u8 {
        self.version
    }

    fn set_version(&mut self, version: u8) {
        self.version = version;
    }

    fn upgrade_step(&mut self, _from: u8) {
        // Version 1 is the first layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::assert_error;

    fn pool() -> StakingPool {
        StakingPool {
            version: STATE_VERSION,
            access: AccessPolicy::with_owner(Pubkey::new_unique()),
            token_mint: Pubkey::new_unique(),
            vault: Pubkey::new_unique(),
            wrapped_token: Pubkey::default(),
            total_staked: 0,
            total_shares: 0,
            fees: vec![],
            strategies: vec![],
            bump: 255,
            vault_bump: 254,
        }
    }

    fn strategy(total_deposits: u64) -> StrategyEntry {
        StrategyEntry {
            strategy_state: Pubkey::new_unique(),
            strategy_program: Pubkey::new_unique(),
            deposit_account: Pubkey::new_unique(),
            total_deposits,
        }
    }

    #[test]
    fn first_deposit_mints_one_to_one() {
        let mut pool = pool();
        assert_eq!(pool.record_deposit(1_000).unwrap(), 1_000);
        assert_eq!(pool.total_staked, 1_000);
        assert_eq!(pool.total_shares, 1_000);
        assert_eq!(pool.balance_of(1_000).unwrap(), 1_000);
    }

    #[test]
    fn deposits_after_rewards_mint_at_current_rate() {
        let mut pool = pool();
        pool.record_deposit(1_000).unwrap();
        pool.record_donation(1_000).unwrap();

        // 2 underlying per share now
        assert_eq!(pool.record_deposit(500).unwrap(), 250);
        assert_eq!(pool.balance_of(250).unwrap(), 500);
        assert_eq!(pool.balance_of(1_000).unwrap(), 2_000);
    }

    #[test]
    fn donation_without_shares_mints_first_deposit_one_to_one() {
        let mut pool = pool();
        pool.record_donation(50).unwrap();
        assert_eq!(pool.record_deposit(100).unwrap(), 100);
        assert_eq!(pool.balance_of(100).unwrap(), 150);
    }

    #[test]
    fn zero_amounts_are_rejected() {
        let mut pool = pool();
        assert_error(pool.record_deposit(0), StakingPoolError::InvalidAmount);
        assert_error(pool.record_withdrawal(0, 10), StakingPoolError::InvalidAmount);
        assert_error(pool.record_donation(0), StakingPoolError::InvalidAmount);
    }

    #[test]
    fn withdrawal_cannot_exceed_balance() {
        let mut pool = pool();
        let shares = pool.record_deposit(1_000).unwrap();
        assert_error(
            pool.record_withdrawal(1_001, shares),
            StakingPoolError::InsufficientBalance,
        );
    }

    #[test]
    fn withdrawal_rounds_burned_shares_up() {
        let mut pool = pool();
        let alice = pool.record_deposit(1_000).unwrap();
        let bob = pool.record_deposit(1_000).unwrap();
        pool.record_donation(1).unwrap();

        // 2001 staked over 2000 shares: 1 underlying costs 1 share after rounding up
        let burned = pool.record_withdrawal(1, alice).unwrap();
        assert_eq!(burned, 1);
        assert!(pool.balance_of(bob).unwrap() >= 1_000);

        // full exit burns exactly what is held
        let balance = pool.balance_of(alice - burned).unwrap();
        assert_eq!(pool.record_withdrawal(balance, alice - burned).unwrap(), alice - burned);
    }

    #[test]
    fn transfer_converts_balance_to_shares() {
        let mut pool = pool();
        let shares = pool.record_deposit(1_000).unwrap();
        pool.record_donation(1_000).unwrap();

        assert_eq!(pool.shares_for_transfer(400, shares).unwrap(), 200);
        assert_error(
            pool.shares_for_transfer(2_001, shares),
            StakingPoolError::InsufficientBalance,
        );
        assert_error(pool.shares_for_transfer(1, shares), StakingPoolError::ShareAmountZero);
    }

    #[test]
    fn greedy_allocation_fills_strategies_in_order() {
        // capacities 200, 200, 10000 with nothing deposited yet
        let (allocations, idle) = allocate_deposit(&[200, 200, 10_000], 1_000);
        assert_eq!(allocations, vec![200, 200, 600]);
        assert_eq!(idle, 0);
    }

    #[test]
    fn allocation_overflow_stays_idle() {
        let (allocations, idle) = allocate_deposit(&[100, 0, 50], 300);
        assert_eq!(allocations, vec![100, 0, 50]);
        assert_eq!(idle, 150);

        let (allocations, idle) = allocate_deposit(&[], 300);
        assert!(allocations.is_empty());
        assert_eq!(idle, 300);
    }

    #[test]
    fn withdrawal_uses_vault_first_then_strategies_last_to_first() {
        let (from_vault, plan) = plan_withdrawal(100, &[50, 80, 30], 190).unwrap();
        assert_eq!(from_vault, 100);
        assert_eq!(plan, vec![0, 60, 30]);
    }

    #[test]
    fn withdrawal_skips_strategies_at_their_floor() {
        let (from_vault, plan) = plan_withdrawal(0, &[40, 0, 0], 40).unwrap();
        assert_eq!(from_vault, 0);
        assert_eq!(plan, vec![40, 0, 0]);

        assert_error(
            plan_withdrawal(10, &[40, 0], 51),
            StakingPoolError::InsufficientLiquidity,
        );
    }

    #[test]
    fn add_strategy_rejects_duplicates_and_overflow() {
        let mut pool = pool();
        let entry = strategy(0);
        assert_eq!(pool.add_strategy(entry).unwrap(), 0);
        assert_error(pool.add_strategy(entry), StakingPoolError::StrategyExists);

        for _ in 1..MAX_STRATEGIES {
            pool.add_strategy(strategy(0)).unwrap();
        }
        assert_error(pool.add_strategy(strategy(0)), StakingPoolError::TooManyStrategies);
    }

    #[test]
    fn strategy_holding_value_cannot_be_attached() {
        let mut pool = pool();
        assert_error(pool.add_strategy(strategy(10)), StakingPoolError::StrategyInUse);
        assert!(pool.strategies.is_empty());
    }

    #[test]
    fn remove_strategy_checks_range_and_usage() {
        let mut pool = pool();
        let idle = strategy(0);
        pool.add_strategy(strategy(0)).unwrap();
        pool.add_strategy(idle).unwrap();
        pool.record_strategy_deposit(0, 10).unwrap();

        assert_error(pool.remove_strategy(2), StakingPoolError::IndexOutOfRange);
        assert_error(pool.remove_strategy(0), StakingPoolError::StrategyInUse);
        assert_eq!(pool.remove_strategy(1).unwrap(), idle);
        assert_eq!(pool.strategies.len(), 1);
    }

    #[test]
    fn reorder_requires_a_permutation() {
        let mut pool = pool();
        let entries: Vec<_> = (0..3).map(|_| strategy(0)).collect();
        for entry in &entries {
            pool.add_strategy(*entry).unwrap();
        }

        assert_error(pool.reorder_strategies(&[0, 0, 1]), StakingPoolError::InvalidStrategyOrder);
        assert_error(pool.reorder_strategies(&[0, 1]), StakingPoolError::InvalidStrategyOrder);
        assert_error(pool.reorder_strategies(&[0, 1, 3]), StakingPoolError::InvalidStrategyOrder);

        pool.reorder_strategies(&[2, 0, 1]).unwrap();
        assert_eq!(pool.strategies, vec![entries[2], entries[0], entries[1]]);
    }

    #[test]
    fn fee_list_enforces_cap_and_removal() {
        let mut pool = pool();
        let treasury = Pubkey::new_unique();
        pool.add_fee(treasury, 3_000).unwrap();
        assert_error(
            pool.add_fee(Pubkey::new_unique(), 1_001),
            StakingPoolError::FeeExceedsLimit,
        );
        pool.add_fee(Pubkey::new_unique(), 1_000).unwrap();
        assert_eq!(pool.total_fee_bps(), 4_000);

        assert_error(pool.update_fee(0, treasury, 3_001), StakingPoolError::FeeExceedsLimit);
        pool.update_fee(0, treasury, 2_000).unwrap();
        assert_eq!(pool.total_fee_bps(), 3_000);

        pool.update_fee(1, Pubkey::default(), 0).unwrap();
        assert_eq!(pool.fees, vec![Fee { receiver: treasury, basis_points: 2_000 }]);
        assert_error(pool.update_fee(1, treasury, 10), StakingPoolError::IndexOutOfRange);
    }

    #[test]
    fn reconcile_rejects_bad_batches() {
        let mut pool = pool();
        pool.add_strategy(strategy(0)).unwrap();
        pool.add_strategy(strategy(0)).unwrap();

        assert_error(pool.reconcile(&[]), StakingPoolError::NoStrategiesToUpdate);
        assert_error(pool.reconcile(&[(2, 0)]), StakingPoolError::IndexOutOfRange);
        assert_error(
            pool.reconcile(&[(1, 5), (1, 5)]),
            StakingPoolError::DuplicateStrategyIndex,
        );
    }

    #[test]
    fn positive_reconciliation_pays_fee_receiver_its_cut() {
        let mut pool = pool();
        pool.add_strategy(strategy(0)).unwrap();
        pool.add_fee(Pubkey::new_unique(), 1_000).unwrap();

        let depositor = pool.record_deposit(1_000_000).unwrap();
        pool.record_strategy_deposit(0, 1_000_000).unwrap();

        let outcome = pool.reconcile(&[(0, 1_100_000)]).unwrap();
        assert_eq!(outcome.net_change, 100_000);
        assert_eq!(outcome.fee_amounts, vec![10_000]);
        assert_eq!(pool.total_staked, 1_100_000);
        assert_eq!(pool.strategies[0].total_deposits, 1_100_000);

        let fee_balance = pool.balance_of(outcome.fee_shares[0]).unwrap();
        let depositor_balance = pool.balance_of(depositor).unwrap();
        assert!(fee_balance.abs_diff(10_000) <= 1, "fee balance {fee_balance}");
        assert!(depositor_balance.abs_diff(1_090_000) <= 1, "depositor balance {depositor_balance}");
    }

    #[test]
    fn fee_shares_split_pro_rata_between_receivers() {
        let mut pool = pool();
        pool.add_strategy(strategy(0)).unwrap();
        pool.add_fee(Pubkey::new_unique(), 300).unwrap();
        pool.add_fee(Pubkey::new_unique(), 100).unwrap();
        pool.record_deposit(10_000_000).unwrap();
        pool.record_strategy_deposit(0, 10_000_000).unwrap();

        let outcome = pool.reconcile(&[(0, 11_000_000)]).unwrap();
        assert_eq!(outcome.fee_amounts, vec![30_000, 10_000]);

        let first = pool.balance_of(outcome.fee_shares[0]).unwrap();
        let second = pool.balance_of(outcome.fee_shares[1]).unwrap();
        assert!(first.abs_diff(30_000) <= 1);
        assert!(second.abs_diff(10_000) <= 1);
    }

    #[test]
    fn slashing_is_socialised_and_mints_no_fees() {
        let mut pool = pool();
        pool.add_strategy(strategy(0)).unwrap();
        pool.add_strategy(strategy(0)).unwrap();
        pool.add_fee(Pubkey::new_unique(), 1_000).unwrap();

        let alice = pool.record_deposit(600).unwrap();
        let bob = pool.record_deposit(400).unwrap();
        pool.record_strategy_deposit(0, 500).unwrap();
        pool.record_strategy_deposit(1, 500).unwrap();

        let outcome = pool.reconcile(&[(0, 450), (1, 550)]).unwrap();
        assert_eq!(outcome.net_change, 0);
        assert_eq!(outcome.fee_shares, vec![0]);

        let outcome = pool.reconcile(&[(1, 450)]).unwrap();
        assert_eq!(outcome.net_change, -100);
        assert_eq!(outcome.fee_shares, vec![0]);
        assert_eq!(pool.total_staked, 900);
        assert_eq!(pool.total_shares, 1_000);
        assert_eq!(pool.balance_of(alice).unwrap(), 540);
        assert_eq!(pool.balance_of(bob).unwrap(), 360);
    }

    #[test]
    fn partial_reconciliation_only_resets_given_strategies() {
        let mut pool = pool();
        pool.add_strategy(strategy(0)).unwrap();
        pool.add_strategy(strategy(0)).unwrap();
        pool.record_deposit(200).unwrap();
        pool.record_strategy_deposit(0, 100).unwrap();
        pool.record_strategy_deposit(1, 100).unwrap();

        pool.reconcile(&[(1, 130)]).unwrap();
        assert_eq!(pool.strategies[0].total_deposits, 100);
        assert_eq!(pool.strategies[1].total_deposits, 130);
        assert_eq!(pool.deposit_change(0, 90).unwrap(), -10);
        assert_eq!(pool.total_staked, 230);
    }

    #[test]
    fn preview_matches_reconcile_without_mutation() {
        let mut pool = pool();
        pool.add_strategy(strategy(0)).unwrap();
        pool.add_fee(Pubkey::new_unique(), 500).unwrap();
        pool.record_deposit(1_000).unwrap();
        pool.record_strategy_deposit(0, 1_000).unwrap();

        let preview = pool.preview_rewards(&[(0, 1_200)]).unwrap();
        assert_eq!(preview, StrategyRewards { net_change: 200, total_fees: 10 });
        assert_eq!(pool.total_staked, 1_000);

        let outcome = pool.reconcile(&[(0, 1_200)]).unwrap();
        assert_eq!(outcome.net_change, preview.net_change);
        assert_eq!(outcome.fee_amounts.iter().sum::<u64>(), preview.total_fees);
    }

    #[test]
    fn withdrawal_leaves_unreconciled_gain_in_place() {
        let mut pool = pool();
        pool.add_strategy(strategy(0)).unwrap();
        pool.add_strategy(strategy(0)).unwrap();
        let shares = pool.record_deposit(200).unwrap();
        pool.record_strategy_deposit(0, 100).unwrap();
        pool.record_strategy_deposit(1, 100).unwrap();

        // strategy 1 earned 50 that nobody reconciled yet
        let mut reported = [100u64, 150];
        let withdrawable: Vec<u64> = (0..2)
            .map(|i| pool.strategy_withdrawable(i, reported[i as usize], 0).unwrap())
            .collect();
        assert_eq!(withdrawable, vec![100, 100]);

        let (from_vault, plan) = plan_withdrawal(0, &withdrawable, 150).unwrap();
        assert_eq!((from_vault, plan.clone()), (0, vec![50, 100]));

        pool.record_withdrawal(150, shares).unwrap();
        for (index, take) in plan.into_iter().enumerate() {
            pool.record_strategy_withdrawal(index as u32, take).unwrap();
            reported[index] -= take;
        }
        assert_eq!(pool.deposit_change(1, reported[1]).unwrap(), 50);

        pool.reconcile(&[(0, reported[0]), (1, reported[1])]).unwrap();
        let cached: u64 = pool.strategies.iter().map(|s| s.total_deposits).sum();
        assert_eq!(pool.total_staked, cached);
        assert_eq!(pool.total_staked, 100);
        assert_eq!(pool.balance_of(pool.total_shares).unwrap(), 100);
    }

    #[test]
    fn strategy_withdrawal_cannot_exceed_cache() {
        let mut pool = pool();
        pool.add_strategy(strategy(0)).unwrap();
        pool.record_strategy_deposit(0, 40).unwrap();

        assert_eq!(pool.strategy_withdrawable(0, 90, 10).unwrap(), 30);
        assert_eq!(pool.strategy_withdrawable(0, 25, 10).unwrap(), 15);
        assert_error(pool.record_strategy_withdrawal(0, 41), StakingPoolError::MathUnderflow);
    }
}
