use anchor_lang::prelude::*;
use shared_lib::{AccessError, Classify, ErrorKind, MigrationError};

#[error_code]
pub enum RewardsInitiatorError {
    // =========================================================================
    // Authorization Errors
    // =========================================================================

    /// Signer is not the owner, or not whitelisted for manual updates
    #[msg("Unauthorized - signer does not hold the required role")]
    Unauthorized,

    // =========================================================================
    // Capacity Errors
    // =========================================================================

    #[msg("Whitelist is full")]
    WhitelistFull,

    // =========================================================================
    // Invariant Guard Errors
    // =========================================================================

    #[msg("No strategies to update")]
    NoStrategiesToUpdate,

    /// The upkeep path only recognises losses
    #[msg("Aggregate deposit change is not negative")]
    PositiveDepositChange,

    // =========================================================================
    // State Errors
    // =========================================================================

    #[msg("Account schema version does not match program")]
    SchemaVersionMismatch,

    #[msg("Account schema version is newer than this program")]
    UnsupportedSchemaVersion,

    // =========================================================================
    // Math Errors
    // =========================================================================

    #[msg("Math overflow")]
    MathOverflow,

    // =========================================================================
    // Validation Errors
    // =========================================================================

    #[msg("Perform data is not an encoded index list")]
    InvalidPerformData,

    #[msg("Remaining accounts do not match the expected layout")]
    InvalidRemainingAccounts,

    #[msg("Staking pool does not match the initiator")]
    StakingPoolMismatch,

    #[msg("Address must not be the default pubkey")]
    InvalidAddress,
}

impl Classify for RewardsInitiatorError {
    fn kind(&self) -> ErrorKind {
        use RewardsInitiatorError::*;
        match self {
            Unauthorized => ErrorKind::Authorization,
            WhitelistFull => ErrorKind::Capacity,
            NoStrategiesToUpdate | PositiveDepositChange => ErrorKind::InvariantGuard,
            SchemaVersionMismatch | UnsupportedSchemaVersion => ErrorKind::State,
            MathOverflow => ErrorKind::Arithmetic,
            InvalidPerformData | InvalidRemainingAccounts | StakingPoolMismatch
            | InvalidAddress => ErrorKind::Validation,
        }
    }
}

impl From<AccessError> for RewardsInitiatorError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::ZeroHolder => RewardsInitiatorError::InvalidAddress,
        }
    }
}

impl From<MigrationError> for RewardsInitiatorError {
    fn from(err: MigrationError) -> Self {
        match err {
            MigrationError::FromFuture { .. } => RewardsInitiatorError::UnsupportedSchemaVersion,
        }
    }
}

/// Assert that `result` failed with `expected`
#[cfg(test)]
pub(crate) fn assert_error<T: std::fmt::Debug>(result: Result<T>, expected: RewardsInitiatorError) {
    match result {
        Err(anchor_lang::error::Error::AnchorError(err)) => {
            assert_eq!(err.error_code_number, u32::from(expected), "{}", err.error_msg)
        }
        other => panic!("expected {expected}, got {other:?}"),
    }
}
