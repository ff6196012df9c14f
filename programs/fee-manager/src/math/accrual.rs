use anchor_lang::prelude::*;

use crate::constants::RAY;
use crate::error::ErrorCode;
use crate::math::fixed_point::{mul_div, ray_pow};

/// Number of new shares that dilute the current supply by exactly the
/// compounded rate over the elapsed interval:
/// `supply * (rate^elapsed - 1)`, floor-rounded so holders are never
/// over-diluted.
///
/// `scaled_per_second_rate` is the full per-second growth factor in RAY
/// precision (>= RAY for a non-negative fee rate).
pub fn shares_due(
    scaled_per_second_rate: u128,
    shares_supply: u64,
    seconds_elapsed: u64,
) -> Result<u64> {
    if seconds_elapsed == 0 || shares_supply == 0 {
        return Ok(0);
    }

    let growth = ray_pow(scaled_per_second_rate, seconds_elapsed)?;
    let gain = growth
        .checked_sub(RAY)
        .ok_or(ErrorCode::MathUnderflow)?;
    let due = mul_div(shares_supply as u128, gain, RAY)?;
    u64::try_from(due).map_err(|_| ErrorCode::MathOverflow.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{SECONDS_PER_YEAR, WAD};
    use crate::math::rate::annual_rate_to_scaled_per_second;

    const SUPPLY: u64 = 1_000_000_000_000_000_000; // 1e18 shares

    #[test]
    fn zero_elapsed_is_zero() {
        let rate = annual_rate_to_scaled_per_second(WAD as u64 / 10).unwrap();
        assert_eq!(shares_due(rate, SUPPLY, 0).unwrap(), 0);
    }

    #[test]
    fn zero_supply_is_zero() {
        let rate = annual_rate_to_scaled_per_second(WAD as u64 / 10).unwrap();
        assert_eq!(shares_due(rate, 0, SECONDS_PER_YEAR).unwrap(), 0);
    }

    #[test]
    fn identity_rate_accrues_nothing() {
        assert_eq!(shares_due(RAY, SUPPLY, SECONDS_PER_YEAR).unwrap(), 0);
    }

    #[test]
    fn ten_percent_for_ten_seconds() {
        // 1e18 * ((1.1)^(10/31536000) - 1) = ~3.022e10 shares
        let rate = annual_rate_to_scaled_per_second(WAD as u64 / 10).unwrap();
        let due = shares_due(rate, SUPPLY, 10).unwrap();
        assert!(due > 29_000_000_000, "due {due}");
        assert!(due < 31_000_000_000, "due {due}");
    }

    #[test]
    fn ten_percent_for_one_year() {
        let rate = annual_rate_to_scaled_per_second(WAD as u64 / 10).unwrap();
        let due = shares_due(rate, SUPPLY, SECONDS_PER_YEAR).unwrap();
        // floor bias keeps the yearly accrual at or just under 10%
        assert!(due <= SUPPLY / 10);
        assert!(due > SUPPLY / 10 - SUPPLY / 10_000_000);
    }

    #[test]
    fn monotonic_in_elapsed_time() {
        let rate = annual_rate_to_scaled_per_second(WAD as u64 / 50).unwrap();
        let mut prev = 0u64;
        for elapsed in [1u64, 60, 3_600, 86_400, 604_800, SECONDS_PER_YEAR] {
            let due = shares_due(rate, SUPPLY, elapsed).unwrap();
            assert!(due >= prev, "due {due} regressed below {prev}");
            prev = due;
        }
    }
}
