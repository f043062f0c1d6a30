use anchor_lang::prelude::*;
use shared_lib::{AccessError, Classify, ErrorKind, MathError, MigrationError};

#[error_code]
pub enum RewardsPoolError {
    // =========================================================================
    // Authorization Errors
    // =========================================================================

    #[msg("Unauthorized: owner only")]
    Unauthorized,

    #[msg("Staker account belongs to another owner")]
    InvalidAuthority,

    // =========================================================================
    // Capacity Errors
    // =========================================================================

    #[msg("Insufficient staked balance")]
    InsufficientStake,

    #[msg("Reward token list is full")]
    TooManyRewardTokens,

    // =========================================================================
    // Invariant Guard Errors
    // =========================================================================

    #[msg("No rewards to distribute or withdraw")]
    NoRewards,

    /// Rewards deposited with nothing staked could never be attributed
    #[msg("Nothing is staked, rewards cannot be distributed")]
    NothingStaked,

    // =========================================================================
    // State Errors
    // =========================================================================

    #[msg("Reward token already added")]
    TokenAlreadyAdded,

    #[msg("Reward pool index out of range")]
    IndexOutOfRange,

    #[msg("Account schema version does not match program")]
    SchemaVersionMismatch,

    #[msg("Account schema version is newer than this program")]
    UnsupportedSchemaVersion,

    // =========================================================================
    // Math Errors
    // =========================================================================

    #[msg("Math overflow")]
    MathOverflow,

    #[msg("Math underflow")]
    MathUnderflow,

    #[msg("Division by zero")]
    DivisionByZero,

    // =========================================================================
    // Validation Errors
    // =========================================================================

    #[msg("Invalid amount: must be greater than zero")]
    InvalidAmount,

    #[msg("Token account mint is not the staking mint")]
    InvalidStakingMint,

    #[msg("Token account mint is not the reward mint")]
    InvalidRewardMint,

    #[msg("Reward vault does not match the reward pool")]
    InvalidRewardVault,

    #[msg("Remaining accounts do not match the expected layout")]
    InvalidRemainingAccounts,

    #[msg("Address must not be the default pubkey")]
    InvalidAddress,
}

impl Classify for RewardsPoolError {
    fn kind(&self) -> ErrorKind {
        use RewardsPoolError::*;
        match self {
            Unauthorized | InvalidAuthority => ErrorKind::Authorization,
            InsufficientStake | TooManyRewardTokens => ErrorKind::Capacity,
            NoRewards | NothingStaked => ErrorKind::InvariantGuard,
            TokenAlreadyAdded | IndexOutOfRange | SchemaVersionMismatch
            | UnsupportedSchemaVersion => ErrorKind::State,
            MathOverflow | MathUnderflow | DivisionByZero => ErrorKind::Arithmetic,
            InvalidAmount | InvalidStakingMint | InvalidRewardMint | InvalidRewardVault
            | InvalidRemainingAccounts | InvalidAddress => ErrorKind::Validation,
        }
    }
}

impl From<MathError> for RewardsPoolError {
    fn from(err: MathError) -> Self {
        match err {
            MathError::Overflow => RewardsPoolError::MathOverflow,
            MathError::DivisionByZero => RewardsPoolError::DivisionByZero,
        }
    }
}

impl From<AccessError> for RewardsPoolError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::ZeroHolder => RewardsPoolError::InvalidAddress,
        }
    }
}

impl From<MigrationError> for RewardsPoolError {
    fn from(err: MigrationError) -> Self {
        match err {
            MigrationError::FromFuture { .. } => RewardsPoolError::UnsupportedSchemaVersion,
        }
    }
}

/// Assert that `result` failed with `expected`
#[cfg(test)]
pub(crate) fn assert_error<T: std::fmt::Debug>(result: Result<T>, expected: RewardsPoolError) {
    match result {
        Err(anchor_lang::error::Error::AnchorError(err)) => {
            assert_eq!(err.error_code_number, u32::from(expected), "{}", err.error_msg)
        }
        other => panic!("expected {expected}, got {other:?}"),
    }
}
