// =============================================================================
// RewardsInitiator State Account
// =============================================================================
// The initiator decides when a staking pool reconciles its strategies.
//
// Two paths lead to a reconciliation:
// - Automation: check_upkeep reports strategies whose deposit change is
//   strictly negative; perform_upkeep reconciles them, but only if their
//   aggregate change is negative. Keepers can never mint fee shares.
// - Manual: whitelisted callers reconcile any subset, rewards included.
//
// "Needs reconciliation" is never stored, it is recomputed from the strategy
// state accounts on every call.
// =============================================================================

use anchor_lang::prelude::*;
use shared_lib::{AccessPolicy, Versioned};
use staking_pool::state::StakingPool;

use crate::constants::*;
use crate::error::RewardsInitiatorError;

/// PDA derived from ["rewards_initiator", staking_pool]
#[account]
#[derive(InitSpace)]
pub struct RewardsInitiator {
    pub version: u8,

    /// Only the owner role is used
    pub access: AccessPolicy,

    pub staking_pool: Pubkey,

    /// Cross-chain controller notified of every completed round
    pub distribution_controller: Pubkey,

    /// Callers allowed to reconcile through update_rewards
    #[max_len(MAX_WHITELIST)]
    pub whitelist: Vec<Pubkey>,

    pub rounds_completed: u64,

    pub bump: u8,
}

/// Result of check_upkeep
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct UpkeepCheck {
    pub upkeep_needed: bool,
    /// Encoded index list to hand back to perform_upkeep
    pub perform_data: Vec<u8>,
}

impl RewardsInitiator {
    pub fn is_whitelisted(&self, caller: &Pubkey) -> bool {
        self.whitelist.contains(caller)
    }

    /// Add or drop a caller. Returns whether the list changed.
    pub fn set_whitelisted(&mut self, caller: Pubkey, allowed: bool) -> Result<bool> {
        let position = self.whitelist.iter().position(|key| *key == caller);
        match (position, allowed) {
            (None, true) => {
                require!(caller != Pubkey::default(), RewardsInitiatorError::InvalidAddress);
                require!(
                    self.whitelist.len() < MAX_WHITELIST,
                    RewardsInitiatorError::WhitelistFull
                );
                self.whitelist.push(caller);
                Ok(true)
            }
            (Some(index), false) => {
                self.whitelist.remove(index);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Count a finished reconciliation round
    pub fn complete_round(&mut self) -> Result<u64> {
        self.rounds_completed = self
            .rounds_completed
            .checked_add(1)
            .ok_or(RewardsInitiatorError::MathOverflow)?;
        Ok(self.rounds_completed)
    }
}

impl Versioned for RewardsInitiator {
    const LATEST_VERSION: u8 = STATE_VERSION;

    fn version(&self) -> u8 {
        self.version
    }

    fn set_version(&mut self, version: u8) {
        self.version = version;
    }

    fn upgrade_step(&mut self, _from: u8) {}
}

// =============================================================================
// Upkeep Logic
// =============================================================================

/// Deposit change of each `(index, reported_total)` pair
pub fn deposit_changes(pool: &StakingPool, reports: &[(u32, u64)]) -> Result<Vec<i64>> {
    reports
        .iter()
        .map(|&(index, reported)| pool.deposit_change(index, reported))
        .collect()
}

/// Indices whose deposit change is strictly negative, ascending
pub fn negative_indices(reports: &[(u32, u64)], changes: &[i64]) -> Vec<u32> {
    let mut indices: Vec<u32> = reports
        .iter()
        .zip(changes)
        .filter(|&(_, change)| *change < 0)
        .map(|(&(index, _), _)| index)
        .collect();
    indices.sort_unstable();
    indices
}

/// Evaluate every strategy of the pool; `reported` holds one total per
/// strategy in list order.
pub fn check_upkeep(pool: &StakingPool, reported: &[u64]) -> Result<UpkeepCheck> {
    require!(
        reported.len() == pool.strategies.len(),
        RewardsInitiatorError::InvalidRemainingAccounts
    );

    let reports: Vec<(u32, u64)> = reported
        .iter()
        .enumerate()
        .map(|(index, &total)| (index as u32, total))
        .collect();
    let changes = deposit_changes(pool, &reports)?;
    let indices = negative_indices(&reports, &changes);

    Ok(UpkeepCheck {
        upkeep_needed: !indices.is_empty(),
        perform_data: encode_indices(&indices)?,
    })
}

/// Gate for the automation path: a non-empty batch whose aggregate change is
/// negative.
pub fn ensure_loss(indices: &[u32], changes: &[i64]) -> Result<i64> {
    require!(!indices.is_empty(), RewardsInitiatorError::NoStrategiesToUpdate);

    let aggregate = changes
        .iter()
        .try_fold(0i64, |acc, &change| acc.checked_add(change))
        .ok_or(RewardsInitiatorError::MathOverflow)?;
    require!(aggregate < 0, RewardsInitiatorError::PositiveDepositChange);
    Ok(aggregate)
}

/// Borsh `Vec<u32>`
pub fn encode_indices(indices: &[u32]) -> Result<Vec<u8>> {
    let mut data = Vec::with_capacity(4 + indices.len() * 4);
    indices
        .to_vec()
        .serialize(&mut data)
        .map_err(|_| error!(RewardsInitiatorError::InvalidPerformData))?;
    Ok(data)
}

pub fn decode_indices(data: &[u8]) -> Result<Vec<u32>> {
    Vec::<u32>::try_from_slice(data).map_err(|_| error!(RewardsInitiatorError::InvalidPerformData))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::assert_error;
    use staking_pool::state::{allocate_deposit, StrategyEntry};

    /// Three strategies with capacities 200, 200 and 10000, filled by one
    /// deposit of 1000.
    fn funded_pool() -> (StakingPool, Vec<u64>) {
        let mut pool = StakingPool {
            version: staking_pool::STATE_VERSION,
            access: AccessPolicy::with_owner(Pubkey::new_unique()),
            token_mint: Pubkey::new_unique(),
            vault: Pubkey::new_unique(),
            wrapped_token: Pubkey::default(),
            total_staked: 0,
            total_shares: 0,
            fees: vec![],
            strategies: vec![],
            bump: 255,
            vault_bump: 255,
        };
        for _ in 0..3 {
            pool.add_strategy(StrategyEntry {
                strategy_state: Pubkey::new_unique(),
                strategy_program: Pubkey::new_unique(),
                deposit_account: Pubkey::new_unique(),
                total_deposits: 0,
            })
            .unwrap();
        }

        pool.record_deposit(1_000).unwrap();
        let (allocations, idle) = allocate_deposit(&[200, 200, 10_000], 1_000);
        assert_eq!(idle, 0);
        for (index, amount) in allocations.iter().enumerate() {
            pool.record_strategy_deposit(index as u32, *amount).unwrap();
        }
        (pool, allocations)
    }

    #[test]
    fn healthy_strategies_need_no_upkeep() {
        let (pool, reported) = funded_pool();
        assert_eq!(reported, vec![200, 200, 600]);

        let check = check_upkeep(&pool, &reported).unwrap();
        assert!(!check.upkeep_needed);
        assert!(decode_indices(&check.perform_data).unwrap().is_empty());
    }

    #[test]
    fn slashed_strategies_are_reported() {
        let (pool, _) = funded_pool();

        let check = check_upkeep(&pool, &[200, 200, 580]).unwrap();
        assert!(check.upkeep_needed);
        assert_eq!(decode_indices(&check.perform_data).unwrap(), vec![2]);

        let check = check_upkeep(&pool, &[170, 200, 580]).unwrap();
        assert_eq!(decode_indices(&check.perform_data).unwrap(), vec![0, 2]);
    }

    #[test]
    fn rewards_alone_never_trigger_upkeep() {
        let (pool, _) = funded_pool();
        let check = check_upkeep(&pool, &[250, 200, 700]).unwrap();
        assert!(!check.upkeep_needed);

        // a reward next to a loss only reports the loss
        let check = check_upkeep(&pool, &[250, 190, 700]).unwrap();
        assert_eq!(decode_indices(&check.perform_data).unwrap(), vec![1]);
    }

    #[test]
    fn check_requires_every_strategy() {
        let (pool, _) = funded_pool();
        assert_error(
            check_upkeep(&pool, &[200, 200]),
            RewardsInitiatorError::InvalidRemainingAccounts,
        );
    }

    #[test]
    fn loss_gate_rejects_empty_and_non_negative_batches() {
        assert_error(ensure_loss(&[], &[]), RewardsInitiatorError::NoStrategiesToUpdate);
        assert_error(
            ensure_loss(&[0, 2], &[30, -20]),
            RewardsInitiatorError::PositiveDepositChange,
        );
        assert_error(ensure_loss(&[1], &[0]), RewardsInitiatorError::PositiveDepositChange);
        assert_eq!(ensure_loss(&[0, 2], &[-30, -20]).unwrap(), -50);
    }

    #[test]
    fn perform_data_rejects_garbage() {
        assert_error(decode_indices(&[1, 2, 3]), RewardsInitiatorError::InvalidPerformData);
        let mut data = encode_indices(&[4, 7]).unwrap();
        assert_eq!(decode_indices(&data).unwrap(), vec![4, 7]);
        data.push(0);
        assert_error(decode_indices(&data), RewardsInitiatorError::InvalidPerformData);
    }

    #[test]
    fn whitelist_adds_removes_and_caps() {
        let mut initiator = RewardsInitiator {
            version: STATE_VERSION,
            access: AccessPolicy::with_owner(Pubkey::new_unique()),
            staking_pool: Pubkey::new_unique(),
            distribution_controller: Pubkey::new_unique(),
            whitelist: vec![],
            rounds_completed: 0,
            bump: 255,
        };
        let caller = Pubkey::new_unique();

        assert!(initiator.set_whitelisted(caller, true).unwrap());
        assert!(!initiator.set_whitelisted(caller, true).unwrap());
        assert!(initiator.is_whitelisted(&caller));
        assert!(initiator.set_whitelisted(caller, false).unwrap());
        assert!(!initiator.is_whitelisted(&caller));

        for _ in 0..MAX_WHITELIST {
            initiator.set_whitelisted(Pubkey::new_unique(), true).unwrap();
        }
        assert_error(
            initiator.set_whitelisted(caller, true),
            RewardsInitiatorError::WhitelistFull,
        );

        assert_eq!(initiator.complete_round().unwrap(), 1);
        assert_eq!(initiator.complete_round().unwrap(), 2);
    }
}
