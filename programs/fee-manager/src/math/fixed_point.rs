use anchor_lang::prelude::*;

use crate::constants::{RAY, WAD_TO_RAY};
use crate::error::ErrorCode;

// Expanded away from the prelude glob: the generated impls name `Result`
// and must see the two-parameter std alias, not Anchor's.
mod u256 {
    uint::construct_uint! {
        pub struct U256(4);
    }
}
pub use u256::U256;

fn narrow(value: U256) -> Result<u128> {
    if value > U256::from(u128::MAX) {
        return Err(ErrorCode::MathOverflow.into());
    }
    Ok(value.low_u128())
}

/// Multiply two RAY values: (a * b) / RAY, rounding down
pub fn ray_mul(a: u128, b: u128) -> Result<u128> {
    let product = U256::from(a) * U256::from(b);
    narrow(product / U256::from(RAY))
}

/// Divide two RAY values: (a * RAY) / b, rounding down
pub fn ray_div(a: u128, b: u128) -> Result<u128> {
    if b == 0 {
        return Err(ErrorCode::DivisionByZero.into());
    }
    let scaled = U256::from(a) * U256::from(RAY);
    narrow(scaled / U256::from(b))
}

/// (a * b) / denominator with a 256-bit intermediate, rounding down
pub fn mul_div(a: u128, b: u128, denominator: u128) -> Result<u128> {
    if denominator == 0 {
        return Err(ErrorCode::DivisionByZero.into());
    }
    let product = U256::from(a) * U256::from(b);
    narrow(product / U256::from(denominator))
}

/// Raise a RAY factor to an integer power by repeated squaring.
/// Every intermediate multiply floors, so the result never over-states growth.
pub fn ray_pow(base: u128, mut exp: u64) -> Result<u128> {
    let mut result = RAY;
    let mut acc = base;
    while exp > 0 {
        if exp & 1 == 1 {
            result = ray_mul(result, acc)?;
        }
        exp >>= 1;
        if exp > 0 {
            acc = ray_mul(acc, acc)?;
        }
    }
    Ok(result)
}

/// Convert a WAD value to RAY precision
pub fn wad_to_ray(value: u128) -> Result<u128> {
    value
        .checked_mul(WAD_TO_RAY)
        .ok_or(ErrorCode::MathOverflow.into())
}

/// Convert a RAY value back to WAD precision, rounding down
pub fn ray_to_wad(value: u128) -> u128 {
    value / WAD_TO_RAY
}

/// Multiply a value by basis points: (value * bps) / 10_000
pub fn bps_mul(value: u128, bps: u64) -> Result<u128> {
    mul_div(value, bps as u128, crate::constants::BPS_DENOMINATOR as u128)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::WAD;

    #[test]
    fn ray_mul_identity() {
        assert_eq!(ray_mul(RAY, RAY).unwrap(), RAY);
        assert_eq!(ray_mul(3 * RAY, RAY).unwrap(), 3 * RAY);
    }

    #[test]
    fn ray_mul_rounds_down() {
        // 1.5 * 1.5 = 2.25
        let x = RAY + RAY / 2;
        assert_eq!(ray_mul(x, x).unwrap(), 2 * RAY + RAY / 4);
        // (RAY + 1) * (RAY + 1) / RAY floors the cross term away
        assert_eq!(ray_mul(RAY + 1, RAY + 1).unwrap(), RAY + 2);
    }

    #[test]
    fn ray_mul_overflow_detected() {
        let big = u128::MAX;
        assert!(ray_mul(big, big).is_err());
    }

    #[test]
    fn ray_div_by_zero_rejected() {
        assert!(ray_div(RAY, 0).is_err());
        assert!(mul_div(1, 1, 0).is_err());
    }

    #[test]
    fn ray_pow_edge_exponents() {
        assert_eq!(ray_pow(2 * RAY, 0).unwrap(), RAY);
        assert_eq!(ray_pow(2 * RAY, 1).unwrap(), 2 * RAY);
        assert_eq!(ray_pow(2 * RAY, 10).unwrap(), 1024 * RAY);
    }

    #[test]
    fn ray_pow_fractional_base() {
        // 1.000001^2 = 1.000002000001
        let base = RAY + RAY / 1_000_000;
        let expected = RAY + 2 * (RAY / 1_000_000) + RAY / 1_000_000_000_000;
        assert_eq!(ray_pow(base, 2).unwrap(), expected);
    }

    #[test]
    fn wad_ray_round_trip() {
        assert_eq!(ray_to_wad(wad_to_ray(WAD).unwrap()), WAD);
        assert_eq!(wad_to_ray(WAD).unwrap(), RAY);
    }

    #[test]
    fn bps_mul_basic() {
        assert_eq!(bps_mul(10_000, 250).unwrap(), 250);
        assert_eq!(bps_mul(1, 9_999).unwrap(), 0);
    }
}
