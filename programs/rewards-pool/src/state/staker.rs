// =============================================================================
// Staker State Account
// =============================================================================
// One position per (controller, owner). For every reward token the staker
// keeps a checkpoint:
//
//   earned = accrued + staked * (reward_per_token - reward_per_token_paid) / PRECISION
//
// settle() folds earned into accrued and moves paid up to the pool's current
// reward_per_token. It runs before every stake change and every payout.
// =============================================================================

use anchor_lang::prelude::*;
use shared_lib::REWARD_PRECISION;

use crate::constants::MAX_REWARD_TOKENS;
use crate::error::RewardsPoolError;
use crate::state::RewardsPool;

/// Individual staker position
///
/// PDA derived from ["staker", controller, owner]. Holds one checkpoint per
/// reward token; a pool without a checkpoint counts as never paid.
#[account]
#[derive(InitSpace)]
pub struct Staker {
    pub controller: Pubkey,
    pub owner: Pubkey,
    pub staked_amount: u64,
    #[max_len(MAX_REWARD_TOKENS)]
    pub checkpoints: Vec<RewardCheckpoint>,
    pub bump: u8,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub struct RewardCheckpoint {
    pub pool_id: u32,
    /// Pool reward_per_token when this staker was last settled
    pub reward_per_token_paid: u128,
    /// Settled but not yet withdrawn
    pub accrued: u64,
}

impl Staker {
    /// Fill in identity fields of an account created with init_if_needed
    pub fn open_if_new(&mut self, controller: Pubkey, owner: Pubkey, bump: u8) {
        if self.owner == Pubkey::default() {
            self.controller = controller;
            self.owner = owner;
            self.bump = bump;
        }
    }

    pub fn checkpoint(&self, pool_id: u32) -> Option<&RewardCheckpoint> {
        self.checkpoints.iter().find(|c| c.pool_id == pool_id)
    }

    /// Everything owed from `pool`, settled or not
    pub fn earned(&self, pool: &RewardsPool) -> Result<u64> {
        let (paid, accrued) = self
            .checkpoint(pool.id)
            .map(|c| (c.reward_per_token_paid, c.accrued))
            .unwrap_or((0, 0));

        let delta = pool
            .reward_per_token
            .checked_sub(paid)
            .ok_or(RewardsPoolError::MathUnderflow)?;
        let pending = (self.staked_amount as u128)
            .checked_mul(delta)
            .ok_or(RewardsPoolError::MathOverflow)?
            / REWARD_PRECISION;
        let pending = u64::try_from(pending).map_err(|_| RewardsPoolError::MathOverflow)?;

        Ok(accrued
            .checked_add(pending)
            .ok_or(RewardsPoolError::MathOverflow)?)
    }

    /// Amount withdrawable from each pool, in list order
    pub fn withdrawable(&self, pools: &[RewardsPool]) -> Result<Vec<u64>> {
        pools.iter().map(|pool| self.earned(pool)).collect()
    }

    /// Settle every pool at the current balance. Checkpoints of pools that
    /// are no longer registered are dropped.
    pub fn settle(&mut self, pools: &[RewardsPool]) -> Result<()> {
        let checkpoints = pools
            .iter()
            .map(|pool| {
                Ok(RewardCheckpoint {
                    pool_id: pool.id,
                    reward_per_token_paid: pool.reward_per_token,
                    accrued: self.earned(pool)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        self.checkpoints = checkpoints;
        Ok(())
    }

    pub fn record_stake(&mut self, amount: u64, pools: &[RewardsPool]) -> Result<()> {
        self.settle(pools)?;
        self.staked_amount = self
            .staked_amount
            .checked_add(amount)
            .ok_or(RewardsPoolError::MathOverflow)?;
        Ok(())
    }

    pub fn record_withdrawal(&mut self, amount: u64, pools: &[RewardsPool]) -> Result<()> {
        require!(
            self.staked_amount >= amount,
            RewardsPoolError::InsufficientStake
        );
        self.settle(pools)?;
        self.staked_amount -= amount;
        Ok(())
    }

    /// Zero the settled rewards of one pool, returning them. Call `settle`
    /// first so the checkpoint exists.
    pub fn take_rewards(&mut self, pool_id: u32) -> Result<u64> {
        let checkpoint = self
            .checkpoints
            .iter_mut()
            .find(|c| c.pool_id == pool_id)
            .ok_or(RewardsPoolError::IndexOutOfRange)?;
        Ok(std::mem::take(&mut checkpoint.accrued))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::assert_error;
    use crate::state::controller::tests::controller;
    use crate::state::RewardsPoolController;

    fn staker() -> Staker {
        let mut staker = Staker {
            controller: Pubkey::default(),
            owner: Pubkey::default(),
            staked_amount: 0,
            checkpoints: Vec::new(),
            bump: 0,
        };
        staker.open_if_new(Pubkey::new_unique(), Pubkey::new_unique(), 253);
        staker
    }

    fn stake(controller: &mut RewardsPoolController, staker: &mut Staker, amount: u64) {
        staker.record_stake(amount, &controller.pools).unwrap();
        controller.record_stake(amount).unwrap();
    }

    fn distribute(controller: &mut RewardsPoolController, index: u32, amount: u64) {
        let total_staked = controller.total_staked;
        controller
            .pool_mut(index)
            .unwrap()
            .distribute(amount, total_staked)
            .unwrap();
    }

    fn two_token_controller() -> RewardsPoolController {
        let mut controller = controller();
        controller
            .add_token(Pubkey::new_unique(), Pubkey::new_unique(), 1)
            .unwrap();
        controller
            .add_token(Pubkey::new_unique(), Pubkey::new_unique(), 1)
            .unwrap();
        controller
    }

    #[test]
    fn rewards_split_by_stake_per_token() {
        let mut controller = two_token_controller();
        let mut alice = staker();
        let mut bob = staker();
        stake(&mut controller, &mut alice, 1_000);
        stake(&mut controller, &mut bob, 500);

        distribute(&mut controller, 0, 900);
        distribute(&mut controller, 1, 300);

        assert_eq!(alice.withdrawable(&controller.pools).unwrap(), vec![600, 200]);
        assert_eq!(bob.withdrawable(&controller.pools).unwrap(), vec![300, 100]);
    }

    #[test]
    fn stake_change_neither_loses_nor_duplicates_rewards() {
        let mut controller = two_token_controller();
        let mut alice = staker();
        let mut bob = staker();
        stake(&mut controller, &mut alice, 1_000);
        stake(&mut controller, &mut bob, 1_000);

        distribute(&mut controller, 0, 200);
        stake(&mut controller, &mut alice, 1_000);
        distribute(&mut controller, 0, 300);

        assert_eq!(alice.withdrawable(&controller.pools).unwrap(), vec![300, 0]);
        assert_eq!(bob.withdrawable(&controller.pools).unwrap(), vec![200, 0]);

        alice.record_withdrawal(2_000, &controller.pools).unwrap();
        controller.record_withdrawal(2_000).unwrap();
        distribute(&mut controller, 0, 100);

        assert_eq!(alice.withdrawable(&controller.pools).unwrap(), vec![300, 0]);
        assert_eq!(bob.withdrawable(&controller.pools).unwrap(), vec![300, 0]);
    }

    #[test]
    fn late_staker_earns_only_later_rewards() {
        let mut controller = two_token_controller();
        let mut alice = staker();
        let mut bob = staker();
        stake(&mut controller, &mut alice, 1_000);
        distribute(&mut controller, 1, 500);

        stake(&mut controller, &mut bob, 1_000);
        distribute(&mut controller, 1, 500);

        assert_eq!(alice.withdrawable(&controller.pools).unwrap(), vec![0, 750]);
        assert_eq!(bob.withdrawable(&controller.pools).unwrap(), vec![0, 250]);
    }

    #[test]
    fn take_rewards_touches_one_token() {
        let mut controller = two_token_controller();
        let mut alice = staker();
        stake(&mut controller, &mut alice, 1_000);
        distribute(&mut controller, 0, 400);
        distribute(&mut controller, 1, 70);

        alice.settle(&controller.pools).unwrap();
        assert_eq!(alice.take_rewards(controller.pools[0].id).unwrap(), 400);
        assert_eq!(alice.take_rewards(controller.pools[0].id).unwrap(), 0);
        assert_eq!(alice.withdrawable(&controller.pools).unwrap(), vec![0, 70]);
    }

    #[test]
    fn removed_token_checkpoints_are_pruned() {
        let mut controller = two_token_controller();
        let mut alice = staker();
        stake(&mut controller, &mut alice, 1_000);
        distribute(&mut controller, 0, 100);

        let removed = controller.remove_token(0).unwrap();
        alice.settle(&controller.pools).unwrap();
        assert!(alice.checkpoint(removed.id).is_none());
        assert_eq!(alice.checkpoints.len(), 1);

        // A fresh token starts from zero even though the staker never saw it
        controller
            .add_token(removed.reward_mint, Pubkey::new_unique(), 1)
            .unwrap();
        distribute(&mut controller, 1, 50);
        assert_eq!(alice.withdrawable(&controller.pools).unwrap(), vec![0, 50]);
    }

    #[test]
    fn withdrawal_beyond_stake_fails() {
        let mut controller = two_token_controller();
        let mut alice = staker();
        stake(&mut controller, &mut alice, 10);
        assert_error(
            alice.record_withdrawal(11, &controller.pools),
            RewardsPoolError::InsufficientStake,
        );
    }
}
