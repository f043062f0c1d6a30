// =============================================================================
// Staking Pool Error Codes
// =============================================================================
// Grouped by the kind of failure. `Classify` maps every variant onto the shared
// taxonomy so keepers and clients can react to the kind rather than the code.
// =============================================================================

use anchor_lang::prelude::*;
use shared_lib::{AccessError, Classify, ErrorKind, MathError, MigrationError};

#[error_code]
pub enum StakingPoolError {
    // =========================================================================
    // Authorization Errors
    // =========================================================================

    /// Signer does not hold the role this instruction requires
    #[msg("Unauthorized - signer does not hold the required role")]
    Unauthorized,

    // =========================================================================
    // Capacity Errors
    // =========================================================================

    /// Account balance is smaller than the requested amount
    #[msg("Insufficient balance for operation")]
    InsufficientBalance,

    #[msg("Insufficient shares")]
    InsufficientShares,

    /// Idle balance plus every strategy's withdrawable amount cannot cover the request
    #[msg("Insufficient liquidity across vault and strategies")]
    InsufficientLiquidity,

    #[msg("Maximum number of strategies reached")]
    TooManyStrategies,

    #[msg("Maximum number of fee receivers reached")]
    TooManyFees,

    // =========================================================================
    // Invariant Guard Errors
    // =========================================================================

    #[msg("No strategies to update")]
    NoStrategiesToUpdate,

    /// Sum of fee basis points would exceed MAX_TOTAL_FEES_BPS
    #[msg("Total fees exceed limit")]
    FeeExceedsLimit,

    // =========================================================================
    // State Errors
    // =========================================================================

    #[msg("Strategy is already attached")]
    StrategyExists,

    /// Strategies still holding deposits cannot be removed
    #[msg("Strategy still holds deposits")]
    StrategyInUse,

    #[msg("Index out of range")]
    IndexOutOfRange,

    #[msg("Strategy index appears more than once")]
    DuplicateStrategyIndex,

    #[msg("Strategy order must be a permutation of current indices")]
    InvalidStrategyOrder,

    /// State was written by another program version, run migrate first
    #[msg("Account schema version does not match program")]
    SchemaVersionMismatch,

    #[msg("Account schema version is newer than this program")]
    UnsupportedSchemaVersion,

    // =========================================================================
    // External Call Errors
    // =========================================================================

    /// A strategy returned less liquidity to the vault than it was asked for
    #[msg("Strategy returned less than requested")]
    StrategyWithdrawShortfall,

    #[msg("Strategy state account could not be decoded")]
    InvalidStrategyState,

    #[msg("Strategy state belongs to another pool")]
    StrategyPoolMismatch,

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

    #[msg("Amount must be greater than zero")]
    InvalidAmount,

    #[msg("Share amount rounds to zero")]
    ShareAmountZero,

    #[msg("Token account mint does not match pool token")]
    InvalidTokenMint,

    #[msg("Remaining accounts do not match the expected layout")]
    InvalidRemainingAccounts,

    #[msg("Strategy account does not match registered strategy")]
    InvalidStrategyAccount,

    #[msg("Fee receiver share account does not match fee list")]
    InvalidFeeReceiver,

    #[msg("Share account does not belong to this pool or owner")]
    InvalidShareAccount,

    #[msg("Wrapped token is not the one registered on the pool")]
    InvalidWrappedToken,

    /// transfer_and_call only delivers to the registered wrapped token
    #[msg("Transfer receiver has no registered callback")]
    InvalidCallbackReceiver,

    #[msg("Address must not be the default pubkey")]
    InvalidAddress,
}

impl Classify for StakingPoolError {
    fn kind(&self) -> ErrorKind {
        use StakingPoolError::*;
        match self {
            Unauthorized => ErrorKind::Authorization,
            InsufficientBalance | InsufficientShares | InsufficientLiquidity | TooManyStrategies
            | TooManyFees => ErrorKind::Capacity,
            NoStrategiesToUpdate | FeeExceedsLimit => ErrorKind::InvariantGuard,
            StrategyExists | StrategyInUse | IndexOutOfRange | DuplicateStrategyIndex
            | InvalidStrategyOrder | SchemaVersionMismatch | UnsupportedSchemaVersion => {
                ErrorKind::State
            }
            StrategyWithdrawShortfall | InvalidStrategyState | StrategyPoolMismatch => {
                ErrorKind::ExternalCall
            }
            MathOverflow | MathUnderflow | DivisionByZero => ErrorKind::Arithmetic,
            InvalidAmount | ShareAmountZero | InvalidTokenMint | InvalidRemainingAccounts
            | InvalidStrategyAccount | InvalidFeeReceiver | InvalidShareAccount
            | InvalidWrappedToken | InvalidCallbackReceiver | InvalidAddress => {
                ErrorKind::Validation
            }
        }
    }
}

impl From<MathError> for StakingPoolError {
    fn from(err: MathError) -> Self {
        match err {
            MathError::Overflow => StakingPoolError::MathOverflow,
            MathError::DivisionByZero => StakingPoolError::DivisionByZero,
        }
    }
}

impl From<AccessError> for StakingPoolError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::ZeroHolder => StakingPoolError::InvalidAddress,
        }
    }
}

impl From<MigrationError> for StakingPoolError {
    fn from(err: MigrationError) -> Self {
        match err {
            MigrationError::FromFuture { .. } => StakingPoolError::UnsupportedSchemaVersion,
        }
    }
}

/// Assert that `result` failed with `expected`
#[cfg(test)]
pub(crate) fn assert_error<T: std::fmt::Debug>(result: Result<T>, expected: StakingPoolError) {
    match result {
        Err(anchor_lang::error::Error::AnchorError(err)) => {
            assert_eq!(err.error_code_number, u32::from(expected), "{}", err.error_msg)
        }
        other => panic!("expected {expected}, got {other:?}"),
    }
}
