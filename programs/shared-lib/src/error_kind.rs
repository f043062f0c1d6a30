/// Coarse classification shared by every program error.
///
/// Each program keeps its own `#[error_code]` enum (Anchor assigns the codes)
/// and maps every variant onto one of these kinds, so clients and keepers can
/// decide how to react without knowing each program's variant list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller lacks the role the operation demands
    Authorization,
    /// Not enough room, balance or liquidity to satisfy the request
    Capacity,
    /// A safety gate refused the request (positive delta, empty batch, fee cap)
    InvariantGuard,
    /// The request conflicts with stored state (duplicates, missing or in-use entries)
    State,
    /// A strategy or collaborator call failed or misbehaved
    ExternalCall,
    /// Checked arithmetic failed
    Arithmetic,
    /// Malformed input or mismatched accounts
    Validation,
}

pub trait Classify {
    fn kind(&self) -> ErrorKind;
}
