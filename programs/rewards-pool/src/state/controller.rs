// =============================================================================
// RewardsPoolController State Account
// =============================================================================
// One staking ledger, many reward tokens. Each reward token is a RewardsPool
// entry with its own vault and reward-per-token accumulator:
//
//   reward_per_token += amount * PRECISION / total_staked   (on distribute)
//   earned = staked * (reward_per_token - paid) / PRECISION (per staker)
//
// Stakers settle every pool before their balance changes, see Staker.
// =============================================================================

use anchor_lang::prelude::*;
use shared_lib::{AccessPolicy, Versioned, REWARD_PRECISION};

use crate::constants::*;
use crate::error::RewardsPoolError;

/// PDA derived from ["controller", staking_mint]
#[account]
#[derive(InitSpace)]
pub struct RewardsPoolController {
    pub version: u8,

    /// Only the owner role is used
    pub access: AccessPolicy,

    pub staking_mint: Pubkey,

    /// PDA token account ["stake_vault", controller]
    pub stake_vault: Pubkey,

    pub total_staked: u64,

    /// Id handed to the next reward token, never reused
    pub next_pool_id: u32,

    #[max_len(MAX_REWARD_TOKENS)]
    pub pools: Vec<RewardsPool>,

    pub bump: u8,
    pub stake_vault_bump: u8,
}

/// Accounting for one reward token
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq, InitSpace)]
pub struct RewardsPool {
    pub id: u32,
    pub reward_mint: Pubkey,
    /// PDA token account ["reward_vault", controller, reward_mint]
    pub reward_vault: Pubkey,
    pub reward_vault_bump: u8,
    /// Cumulative rewards per staked unit, scaled by REWARD_PRECISION
    pub reward_per_token: u128,
    pub total_distributed: u64,
    pub total_withdrawn: u64,
}

impl RewardsPool {
    pub fn new(id: u32, reward_mint: Pubkey, reward_vault: Pubkey, reward_vault_bump: u8) -> Self {
        Self {
            id,
            reward_mint,
            reward_vault,
            reward_vault_bump,
            reward_per_token: 0,
            total_distributed: 0,
            total_withdrawn: 0,
        }
    }

    /// Spread `amount` over everything currently staked
    pub fn distribute(&mut self, amount: u64, total_staked: u64) -> Result<u128> {
        require!(amount > 0, RewardsPoolError::NoRewards);
        require!(total_staked > 0, RewardsPoolError::NothingStaked);

        let increment = (amount as u128)
            .checked_mul(REWARD_PRECISION)
            .ok_or(RewardsPoolError::MathOverflow)?
            .checked_div(total_staked as u128)
            .ok_or(RewardsPoolError::DivisionByZero)?;

        self.reward_per_token = self
            .reward_per_token
            .checked_add(increment)
            .ok_or(RewardsPoolError::MathOverflow)?;
        self.total_distributed = self
            .total_distributed
            .checked_add(amount)
            .ok_or(RewardsPoolError::MathOverflow)?;

        Ok(self.reward_per_token)
    }

    pub fn record_payout(&mut self, amount: u64) -> Result<()> {
        self.total_withdrawn = self
            .total_withdrawn
            .checked_add(amount)
            .ok_or(RewardsPoolError::MathOverflow)?;
        Ok(())
    }
}

impl RewardsPoolController {
    pub fn pool(&self, index: u32) -> Result<&RewardsPool> {
        self.pools
            .get(index as usize)
            .ok_or_else(|| error!(RewardsPoolError::IndexOutOfRange))
    }

    pub fn pool_mut(&mut self, index: u32) -> Result<&mut RewardsPool> {
        self.pools
            .get_mut(index as usize)
            .ok_or_else(|| error!(RewardsPoolError::IndexOutOfRange))
    }

    /// Register a reward token, returning its pool id
    pub fn add_token(
        &mut self,
        reward_mint: Pubkey,
        reward_vault: Pubkey,
        reward_vault_bump: u8,
    ) -> Result<u32> {
        require!(
            !self.pools.iter().any(|pool| pool.reward_mint == reward_mint),
            RewardsPoolError::TokenAlreadyAdded
        );
        require!(
            self.pools.len() < MAX_REWARD_TOKENS,
            RewardsPoolError::TooManyRewardTokens
        );

        let id = self.next_pool_id;
        self.next_pool_id = id.checked_add(1).ok_or(RewardsPoolError::MathOverflow)?;
        self.pools
            .push(RewardsPool::new(id, reward_mint, reward_vault, reward_vault_bump));
        Ok(id)
    }

    /// Drop a reward token. Later entries shift down one index.
    pub fn remove_token(&mut self, index: u32) -> Result<RewardsPool> {
        self.pool(index)?;
        Ok(self.pools.remove(index as usize))
    }

    pub fn record_stake(&mut self, amount: u64) -> Result<()> {
        self.total_staked = self
            .total_staked
            .checked_add(amount)
            .ok_or(RewardsPoolError::MathOverflow)?;
        Ok(())
    }

    pub fn record_withdrawal(&mut self, amount: u64) -> Result<()> {
        self.total_staked = self
            .total_staked
            .checked_sub(amount)
            .ok_or(RewardsPoolError::MathUnderflow)?;
        Ok(())
    }
}

impl Versioned for RewardsPoolController {
    const LATEST_VERSION: u8 = STATE_VERSION;

    fn version(&self) -> u8 {
        self.version
    }

    fn set_version(&mut self, version: u8) {
        self.version = version;
    }

    fn upgrade_step(&mut self, _from: u8) {}
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::assert_error;

    pub(crate) fn controller() -> RewardsPoolController {
        RewardsPoolController {
            version: STATE_VERSION,
            access: AccessPolicy::with_owner(Pubkey::new_unique()),
            staking_mint: Pubkey::new_unique(),
            stake_vault: Pubkey::new_unique(),
            total_staked: 0,
            next_pool_id: 0,
            pools: Vec::new(),
            bump: 255,
            stake_vault_bump: 254,
        }
    }

    #[test]
    fn add_token_rejects_duplicates_and_full_list() {
        let mut controller = controller();
        let mint = Pubkey::new_unique();
        assert_eq!(controller.add_token(mint, Pubkey::new_unique(), 1).unwrap(), 0);
        assert_error(
            controller.add_token(mint, Pubkey::new_unique(), 1),
            RewardsPoolError::TokenAlreadyAdded,
        );

        for _ in 1..MAX_REWARD_TOKENS {
            controller
                .add_token(Pubkey::new_unique(), Pubkey::new_unique(), 1)
                .unwrap();
        }
        assert_error(
            controller.add_token(Pubkey::new_unique(), Pubkey::new_unique(), 1),
            RewardsPoolError::TooManyRewardTokens,
        );
    }

    #[test]
    fn removed_token_can_return_under_a_new_id() {
        let mut controller = controller();
        let first = Pubkey::new_unique();
        let second = Pubkey::new_unique();
        controller.add_token(first, Pubkey::new_unique(), 1).unwrap();
        controller.add_token(second, Pubkey::new_unique(), 1).unwrap();

        let removed = controller.remove_token(0).unwrap();
        assert_eq!(removed.reward_mint, first);
        assert_eq!(controller.pools.len(), 1);
        assert_eq!(controller.pool(0).unwrap().reward_mint, second);
        assert_error(controller.remove_token(1), RewardsPoolError::IndexOutOfRange);

        assert_eq!(controller.add_token(first, Pubkey::new_unique(), 1).unwrap(), 2);
    }

    #[test]
    fn distribute_requires_amount_and_stake() {
        let mut pool = RewardsPool::new(0, Pubkey::new_unique(), Pubkey::new_unique(), 1);
        assert_error(pool.distribute(0, 1_000), RewardsPoolError::NoRewards);
        assert_error(pool.distribute(100, 0), RewardsPoolError::NothingStaked);

        pool.distribute(900, 1_500).unwrap();
        assert_eq!(pool.reward_per_token, 600_000_000_000_000_000);
        assert_eq!(pool.total_distributed, 900);
    }

    #[test]
    fn withdrawal_cannot_exceed_total_staked() {
        let mut controller = controller();
        controller.record_stake(100).unwrap();
        controller.record_withdrawal(40).unwrap();
        assert_eq!(controller.total_staked, 60);
        assert_error(controller.record_withdrawal(61), RewardsPoolError::MathUnderflow);
    }
}
