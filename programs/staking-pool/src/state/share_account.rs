use anchor_lang::prelude::*;

use crate::error::StakingPoolError;

/// Pool shares held by one owner.
///
/// PDA derived from ["shares", staking_pool, owner]. The owner may be a
/// wallet or another PDA (the wrapped token holds its backing shares here).
#[account]
#[derive(InitSpace)]
pub struct ShareAccount {
    pub pool: Pubkey,
    pub owner: Pubkey,
    pub shares: u64,
    pub bump: u8,
}

impl ShareAccount {
    /// Fill in identity fields of an account created with init_if_needed
    pub fn open_if_new(&mut self, pool: Pubkey, owner: Pubkey, bump: u8) {
        if self.owner == Pubkey::default() {
            self.pool = pool;
            self.owner = owner;
            self.bump = bump;
        }
    }

    pub fn credit(&mut self, shares: u64) -> Result<()> {
        self.shares = self
            .shares
            .checked_add(shares)
            .ok_or(StakingPoolError::MathOverflow)?;
        Ok(())
    }

    pub fn debit(&mut self, shares: u64) -> Result<()> {
        self.shares = self
            .shares
            .checked_sub(shares)
            .ok_or(StakingPoolError::InsufficientShares)?;
        Ok(())
    }
}
