/// 100% expressed in basis points
pub const BASIS_POINTS_100_PERCENT: u16 = 10_000;

/// Fixed-point scale of reward-per-token accumulators (18 decimals)
pub const REWARD_PRECISION: u128 = 1_000_000_000_000_000_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MathError {
    Overflow,
    DivisionByZero,
}

/// amount * numerator / denominator, rounded down, with a u128 intermediate.
pub fn mul_div(amount: u64, numerator: u64, denominator: u64) -> Result<u64, MathError> {
    if denominator == 0 {
        return Err(MathError::DivisionByZero);
    }
    let result = (amount as u128) * (numerator as u128) / (denominator as u128);
    u64::try_from(result).map_err(|_| MathError::Overflow)
}

/// amount * numerator / denominator, rounded up.
pub fn mul_div_ceil(amount: u64, numerator: u64, denominator: u64) -> Result<u64, MathError> {
    if denominator == 0 {
        return Err(MathError::DivisionByZero);
    }
    let product = (amount as u128) * (numerator as u128);
    let result = product.div_ceil(denominator as u128);
    u64::try_from(result).map_err(|_| MathError::Overflow)
}

/// Apply basis points to an amount, rounded down
pub fn apply_bp(amount: u64, bp: u16) -> Result<u64, MathError> {
    mul_div(amount, bp as u64, BASIS_POINTS_100_PERCENT as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mul_div_rounds_down_and_ceil_rounds_up() {
        assert_eq!(mul_div(10, 1, 3), Ok(3));
        assert_eq!(mul_div_ceil(10, 1, 3), Ok(4));
        assert_eq!(mul_div_ceil(9, 1, 3), Ok(3));
    }

    #[test]
    fn mul_div_survives_large_intermediates() {
        assert_eq!(mul_div(u64::MAX, u64::MAX, u64::MAX), Ok(u64::MAX));
        assert_eq!(mul_div(u64::MAX, 2, 1), Err(MathError::Overflow));
        assert_eq!(mul_div(1, 1, 0), Err(MathError::DivisionByZero));
    }

    #[test]
    fn apply_bp_takes_fraction() {
        assert_eq!(apply_bp(1_000, 250), Ok(25));
        assert_eq!(apply_bp(999, 1), Ok(0));
        assert_eq!(apply_bp(1_000, BASIS_POINTS_100_PERCENT), Ok(1_000));
    }
}
