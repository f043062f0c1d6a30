// =============================================================================
// Shared Library
// =============================================================================
// Pieces every staking program consults the same way:
// - access:     one policy object answering "may this key act in this role?"
// - error_kind: the error taxonomy each program error maps onto
// - math:       checked mul-div and basis-point helpers
// - version:    versioned account schemas and their migration walk
// =============================================================================

pub mod access;
pub mod error_kind;
pub mod math;
pub mod version;

pub use access::*;
pub use error_kind::*;
pub use math::*;
pub use version::*;
