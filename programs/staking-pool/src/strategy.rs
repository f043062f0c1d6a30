// =============================================================================
// Strategy Interface
// =============================================================================
// Strategies are external programs. The pool talks to them two ways:
//
// 1. Reads: every strategy state account starts with a common prefix
//    (discriminator, pool, total_deposits, max_deposits, min_deposits).
//    Capacity, floor and deposit change are all derived from it.
//
// 2. Calls: `deposit(amount)` and `withdraw(amount, data)` instructions,
//    signed by the pool PDA. Account order for both:
//      0. strategy state       (writable)
//      1. staking pool PDA     (signer)
//      2. deposit account      (writable)
//      3. strategy authority
//      4. pool vault           (writable)
//      5. token program
// =============================================================================

use anchor_lang::prelude::*;
use anchor_lang::solana_program::{
    instruction::{AccountMeta, Instruction},
    program::invoke_signed,
};

use crate::constants::ACCOUNTS_PER_STRATEGY;
use crate::error::StakingPoolError;
use crate::state::StrategyEntry;

/// sha256("account:StrategyState")[..8]
pub const STRATEGY_STATE_DISCRIMINATOR: [u8; 8] = [83, 18, 224, 109, 174, 100, 39, 139];

/// sha256("global:deposit")[..8]
pub const DEPOSIT_IX_DISCRIMINATOR: [u8; 8] = [242, 35, 198, 137, 82, 225, 242, 182];

/// sha256("global:withdraw")[..8]
pub const WITHDRAW_IX_DISCRIMINATOR: [u8; 8] = [183, 18, 70, 156, 148, 109, 161, 34];

/// Common prefix of every strategy state account
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct StrategyReport {
    pub discriminator: [u8; 8],

    /// StakingPool the strategy serves
    pub pool: Pubkey,

    /// Value held now, including unreconciled rewards and slashing
    pub total_deposits: u64,

    pub max_deposits: u64,
    pub min_deposits: u64,
}

impl StrategyReport {
    /// Free capacity for new deposits
    pub fn deposit_room(&self) -> u64 {
        self.max_deposits.saturating_sub(self.total_deposits)
    }
}

/// Decode the common prefix from raw account data
pub fn decode_report(data: &[u8]) -> Result<StrategyReport> {
    let mut slice = data;
    let report = StrategyReport::deserialize(&mut slice)
        .map_err(|_| error!(StakingPoolError::InvalidStrategyState))?;
    require!(
        report.discriminator == STRATEGY_STATE_DISCRIMINATOR,
        StakingPoolError::InvalidStrategyState
    );
    Ok(report)
}

/// Read a registered strategy's state account.
///
/// The account must be the registered one, owned by the registered program,
/// and must report the given pool.
pub fn read_report(
    state: &AccountInfo,
    entry: &StrategyEntry,
    pool: &Pubkey,
) -> Result<StrategyReport> {
    require_keys_eq!(
        state.key(),
        entry.strategy_state,
        StakingPoolError::InvalidStrategyAccount
    );
    require_keys_eq!(
        *state.owner,
        entry.strategy_program,
        StakingPoolError::InvalidStrategyAccount
    );

    let report = decode_report(&state.try_borrow_data()?)?;
    require_keys_eq!(report.pool, *pool, StakingPoolError::StrategyPoolMismatch);
    Ok(report)
}

/// Accounts needed to move funds in or out of one strategy
#[derive(Clone)]
pub struct StrategyAccounts<'info> {
    pub program: AccountInfo<'info>,
    pub state: AccountInfo<'info>,
    pub deposit_account: AccountInfo<'info>,
    pub authority: AccountInfo<'info>,
}

impl<'info> StrategyAccounts<'info> {
    /// Split remaining accounts into one group of four per registered
    /// strategy: [program, state, deposit_account, authority].
    pub fn from_remaining(
        remaining: &[AccountInfo<'info>],
        entries: &[StrategyEntry],
    ) -> Result<Vec<Self>> {
        require!(
            remaining.len() == entries.len() * ACCOUNTS_PER_STRATEGY,
            StakingPoolError::InvalidRemainingAccounts
        );

        remaining
            .chunks(ACCOUNTS_PER_STRATEGY)
            .zip(entries)
            .map(|(group, entry)| {
                require_keys_eq!(
                    group[0].key(),
                    entry.strategy_program,
                    StakingPoolError::InvalidStrategyAccount
                );
                require_keys_eq!(
                    group[2].key(),
                    entry.deposit_account,
                    StakingPoolError::InvalidStrategyAccount
                );
                Ok(Self {
                    program: group[0].clone(),
                    state: group[1].clone(),
                    deposit_account: group[2].clone(),
                    authority: group[3].clone(),
                })
            })
            .collect()
    }
}

/// Pool-side accounts every strategy call carries
pub struct PoolSide<'a, 'info> {
    pub pool: &'a AccountInfo<'info>,
    pub vault: &'a AccountInfo<'info>,
    pub token_program: &'a AccountInfo<'info>,
    pub signer_seeds: &'a [&'a [&'a [u8]]],
}

/// Borsh encoding of `deposit(amount: u64)`
pub fn encode_deposit(amount: u64) -> Vec<u8> {
    let mut data = Vec::with_capacity(16);
    data.extend_from_slice(&DEPOSIT_IX_DISCRIMINATOR);
    data.extend_from_slice(&amount.to_le_bytes());
    data
}

/// Borsh encoding of `withdraw(amount: u64, data: Vec<u8>)`
pub fn encode_withdraw(amount: u64, payload: &[u8]) -> Vec<u8> {
    let mut data = Vec::with_capacity(20 + payload.len());
    data.extend_from_slice(&WITHDRAW_IX_DISCRIMINATOR);
    data.extend_from_slice(&amount.to_le_bytes());
    data.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    data.extend_from_slice(payload);
    data
}

fn invoke_strategy(strategy: &StrategyAccounts, pool: &PoolSide, data: Vec<u8>) -> Result<()> {
    let instruction = Instruction {
        program_id: strategy.program.key(),
        accounts: vec![
            AccountMeta::new(strategy.state.key(), false),
            AccountMeta::new_readonly(pool.pool.key(), true),
            AccountMeta::new(strategy.deposit_account.key(), false),
            AccountMeta::new_readonly(strategy.authority.key(), false),
            AccountMeta::new(pool.vault.key(), false),
            AccountMeta::new_readonly(pool.token_program.key(), false),
        ],
        data,
    };

    invoke_signed(
        &instruction,
        &[
            strategy.state.clone(),
            pool.pool.clone(),
            strategy.deposit_account.clone(),
            strategy.authority.clone(),
            pool.vault.clone(),
            pool.token_program.clone(),
            strategy.program.clone(),
        ],
        pool.signer_seeds,
    )?;
    Ok(())
}

/// Tell a strategy that `amount` landed in its deposit account
pub fn deposit(strategy: &StrategyAccounts, pool: &PoolSide, amount: u64) -> Result<()> {
    invoke_strategy(strategy, pool, encode_deposit(amount))
}

/// Ask a strategy to send `amount` back to the pool vault
pub fn withdraw(strategy: &StrategyAccounts, pool: &PoolSide, amount: u64, data: &[u8]) -> Result<()> {
    invoke_strategy(strategy, pool, encode_withdraw(amount, data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::assert_error;

    fn report_bytes(discriminator: [u8; 8], pool: Pubkey) -> Vec<u8> {
        let mut data = discriminator.to_vec();
        data.extend_from_slice(pool.as_ref());
        data.extend_from_slice(&600u64.to_le_bytes());
        data.extend_from_slice(&1_000u64.to_le_bytes());
        data.extend_from_slice(&100u64.to_le_bytes());
        // strategy-specific fields follow the prefix
        data.extend_from_slice(&[7u8; 32]);
        data
    }

    #[test]
    fn prefix_decodes_and_ignores_trailing_fields() {
        let pool = Pubkey::new_unique();
        let report = decode_report(&report_bytes(STRATEGY_STATE_DISCRIMINATOR, pool)).unwrap();
        assert_eq!(report.pool, pool);
        assert_eq!(report.deposit_room(), 400);
    }

    #[test]
    fn foreign_accounts_are_rejected() {
        let data = report_bytes([0; 8], Pubkey::new_unique());
        assert_error(decode_report(&data), StakingPoolError::InvalidStrategyState);
        assert_error(decode_report(&data[..20]), StakingPoolError::InvalidStrategyState);
    }

    #[test]
    fn full_strategy_has_no_room() {
        let report = StrategyReport {
            discriminator: STRATEGY_STATE_DISCRIMINATOR,
            pool: Pubkey::new_unique(),
            total_deposits: 50,
            max_deposits: 40,
            min_deposits: 80,
        };
        assert_eq!(report.deposit_room(), 0);
    }

    #[test]
    fn withdraw_data_is_length_prefixed() {
        let data = encode_withdraw(5, &[1, 2, 3]);
        assert_eq!(&data[..8], &WITHDRAW_IX_DISCRIMINATOR);
        assert_eq!(&data[8..16], &5u64.to_le_bytes());
        assert_eq!(&data[16..20], &3u32.to_le_bytes());
        assert_eq!(&data[20..], &[1, 2, 3]);
        assert_eq!(encode_deposit(9).len(), 16);
    }
}
