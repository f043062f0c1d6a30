// =============================================================================
// WrappedToken State Account
// =============================================================================
// Non-rebasing wrapper over pool balance. The wrapper holds pool shares in its
// own ShareAccount and issues an SPL token against them:
//
//   wrapped / wrapped_supply == underlying / held
//
// where `held` is the wrapper's pool balance. Rewards raise `held` while the
// wrapped supply stays put, so each wrapped token redeems for more over time.
// =============================================================================

use anchor_lang::prelude::*;
use shared_lib::{mul_div, Versioned};

use crate::constants::STATE_VERSION;
use crate::error::StakingPoolError;

/// PDA derived from ["wrapped_token", staking_pool]
#[account]
#[derive(InitSpace)]
pub struct WrappedToken {
    pub version: u8,

    pub pool: Pubkey,

    /// SPL mint of the wrapped token, authority is this account
    pub mint: Pubkey,

    /// ShareAccount holding the shares backing the wrapped supply
    pub share_account: Pubkey,

    pub bump: u8,
    pub mint_bump: u8,
}

/// Wrapped tokens minted for `amount` of pool balance.
///
/// `supply` and `held` are read before the pool balance moves in. An
/// outstanding supply with nothing held behind it is fully slashed; minting
/// against it would hand the newcomer's value to the existing holders.
pub fn wrapped_by_underlying(amount: u64, supply: u64, held: u64) -> Result<u64> {
    if supply == 0 {
        return Ok(amount);
    }
    require!(held > 0, StakingPoolError::ShareAmountZero);
    Ok(mul_div(amount, supply, held).map_err(StakingPoolError::from)?)
}

/// Pool balance redeemed by `amount` wrapped tokens
pub fn underlying_by_wrapped(amount: u64, supply: u64, held: u64) -> Result<u64> {
    if supply == 0 {
        return Ok(0);
    }
    Ok(mul_div(amount, held, supply).map_err(StakingPoolError::from)?)
}

/// Second step of a transfer-and-call: the value has already moved to the
/// receiver, the message tells it who sent how much.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct TokenTransferMessage {
    pub sender: Pubkey,
    pub amount: u64,
    pub data: Vec<u8>,
}

/// Receiver side of transfer-and-call
pub trait TokenTransferReceiver {
    /// Handle a delivered transfer. `held_before` is the receiver's pool
    /// balance before the transfer landed. Returns the wrapped amount owed to
    /// the sender.
    fn on_token_transfer(
        &self,
        message: &TokenTransferMessage,
        held_before: u64,
        wrapped_supply: u64,
    ) -> Result<u64>;
}

impl TokenTransferReceiver for WrappedToken {
    fn on_token_transfer(
        &self,
        message: &TokenTransferMessage,
        held_before: u64,
        wrapped_supply: u64,
    ) -> Result<u64> {
        require!(message.amount > 0, StakingPoolError::InvalidAmount);
        let wrapped = wrapped_by_underlying(message.amount, wrapped_supply, held_before)?;
        require!(wrapped > 0, StakingPoolError::ShareAmountZero);
        Ok(wrapped)
    }
}

impl Versioned for WrappedToken {
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
mod tests {
    use super::*;
    use crate::error::assert_error;

    fn wrapper() -> WrappedToken {
        WrappedToken {
            version: STATE_VERSION,
            pool: Pubkey::new_unique(),
            mint: Pubkey::new_unique(),
            share_account: Pubkey::new_unique(),
            bump: 255,
            mint_bump: 254,
        }
    }

    #[test]
    fn first_wrap_is_one_to_one() {
        assert_eq!(wrapped_by_underlying(500, 0, 0).unwrap(), 500);
        assert_eq!(underlying_by_wrapped(500, 0, 0).unwrap(), 0);
    }

    #[test]
    fn rewards_raise_the_redemption_rate() {
        // 1000 wrapped backed by 1500 underlying after rewards
        assert_eq!(wrapped_by_underlying(300, 1_000, 1_500).unwrap(), 200);
        assert_eq!(underlying_by_wrapped(200, 1_000, 1_500).unwrap(), 300);
    }

    #[test]
    fn wrap_against_slashed_backing_fails() {
        assert_error(wrapped_by_underlying(500, 1_000, 0), StakingPoolError::ShareAmountZero);
        // shares sent to the wrapper with no supply out are not a problem
        assert_eq!(wrapped_by_underlying(500, 0, 200).unwrap(), 500);
    }

    #[test]
    fn unwrap_of_wrap_returns_amount_at_stable_rate() {
        let (supply, held) = (3_000u64, 4_000u64);
        let wrapped = wrapped_by_underlying(400, supply, held).unwrap();
        let back = underlying_by_wrapped(wrapped, supply + wrapped, held + 400).unwrap();
        assert_eq!(back, 400);

        // unfavourable rounding loses at most one unit
        let wrapped = wrapped_by_underlying(7, supply, held).unwrap();
        let back = underlying_by_wrapped(wrapped, supply + wrapped, held + 7).unwrap();
        assert!(7 - back <= 1);
    }

    #[test]
    fn transfer_message_mints_like_wrap() {
        let message = TokenTransferMessage {
            sender: Pubkey::new_unique(),
            amount: 300,
            data: vec![],
        };
        assert_eq!(wrapper().on_token_transfer(&message, 1_500, 1_000).unwrap(), 200);

        let dust = TokenTransferMessage { amount: 1, ..message.clone() };
        assert_error(
            wrapper().on_token_transfer(&dust, 1_500, 1_000),
            StakingPoolError::ShareAmountZero,
        );

        let empty = TokenTransferMessage { amount: 0, ..message };
        assert_error(
            wrapper().on_token_transfer(&empty, 0, 0),
            StakingPoolError::InvalidAmount,
        );
    }
}
