use anchor_lang::prelude::*;

use crate::constants::{MAX_ANNUAL_RATE_WAD, RAY, SECONDS_PER_YEAR};
use crate::error::ErrorCode;
use crate::math::fixed_point::{ray_pow, ray_to_wad, wad_to_ray};

/// Convert an annual rate (WAD fraction, e.g. 0.1e18 = 10%) into the
/// per-second growth factor in RAY precision: `(1 + annual)^(1/31536000)`.
///
/// The factor is found by binary search for the greatest RAY value whose
/// yearly compounding does not exceed the annual target, so the conversion
/// rounds down and never over-states the fee rate.
pub fn annual_rate_to_scaled_per_second(annual_rate_wad: u64) -> Result<u128> {
    require!(
        annual_rate_wad <= MAX_ANNUAL_RATE_WAD,
        ErrorCode::RateOutOfRange
    );
    if annual_rate_wad == 0 {
        return Ok(RAY);
    }

    let annual_ray = wad_to_ray(annual_rate_wad as u128)?;
    let target = RAY
        .checked_add(annual_ray)
        .ok_or(ErrorCode::MathOverflow)?;

    // (1 + x)^n >= 1 + n*x bounds the root from above
    let mut lo = RAY;
    let mut hi = RAY + annual_ray / (SECONDS_PER_YEAR as u128) + 1;
    while lo < hi {
        let mid = lo + (hi - lo + 1) / 2;
        if ray_pow(mid, SECONDS_PER_YEAR)? <= target {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }
    Ok(lo)
}

/// Invert a per-second growth factor back to the annual WAD rate it
/// compounds to over one year.
pub fn scaled_per_second_to_annual_rate(scaled_per_second_rate: u128) -> Result<u64> {
    require!(scaled_per_second_rate >= RAY, ErrorCode::RateOutOfRange);
    let yearly = ray_pow(scaled_per_second_rate, SECONDS_PER_YEAR)?;
    let annual_ray = yearly
        .checked_sub(RAY)
        .ok_or(ErrorCode::MathUnderflow)?;
    u64::try_from(ray_to_wad(annual_ray)).map_err(|_| ErrorCode::RateOutOfRange.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::WAD;

    #[test]
    fn zero_rate_is_identity_factor() {
        assert_eq!(annual_rate_to_scaled_per_second(0).unwrap(), RAY);
        assert_eq!(scaled_per_second_to_annual_rate(RAY).unwrap(), 0);
    }

    #[test]
    fn factor_never_below_ray() {
        for rate in [1u64, 1_000, WAD as u64 / 100, WAD as u64] {
            assert!(annual_rate_to_scaled_per_second(rate).unwrap() >= RAY);
        }
    }

    #[test]
    fn ten_percent_annual_factor() {
        // (1.1)^(1/31536000) - 1 = 3.0222e-9, i.e. ~3.0222e18 in RAY units
        let factor = annual_rate_to_scaled_per_second(WAD as u64 / 10).unwrap();
        let delta = factor - RAY;
        assert!(delta > 3_015_000_000_000_000_000);
        assert!(delta < 3_030_000_000_000_000_000);
    }

    #[test]
    fn round_trip_within_tolerance() {
        let rates: [u64; 5] = [
            WAD as u64 / 1_000, // 0.1%
            WAD as u64 / 100,   // 1%
            WAD as u64 / 10,    // 10%
            WAD as u64 / 2,     // 50%
            WAD as u64,         // 100%
        ];
        for rate in rates {
            let factor = annual_rate_to_scaled_per_second(rate).unwrap();
            let back = scaled_per_second_to_annual_rate(factor).unwrap();
            // floor bias means back <= rate; relative error bounded by 1e-9
            assert!(back <= rate, "rate {rate} inverted to larger {back}");
            assert!(
                rate - back <= rate / 1_000_000_000 + 1,
                "rate {rate} round-tripped to {back}"
            );
        }
    }

    #[test]
    fn known_one_percent_factor_inverts() {
        // (1.01)^(1/31536000) in RAY units
        let back = scaled_per_second_to_annual_rate(1_000_000_000_315_522_921_573_372_069).unwrap();
        let one_percent = WAD as u64 / 100;
        assert!(back.abs_diff(one_percent) <= 10, "inverted to {back}");
    }

    #[test]
    fn oversized_factor_compounds_past_ceiling() {
        // validation in fee configuration bounds the factor by compounding
        // it over a year; a factor well past the 1000% root must land above
        // the annual ceiling
        let max_factor = annual_rate_to_scaled_per_second(MAX_ANNUAL_RATE_WAD).unwrap();
        let back = scaled_per_second_to_annual_rate(max_factor + 10_000_000_000_000_000_000).unwrap();
        assert!(back > MAX_ANNUAL_RATE_WAD);
    }

    #[test]
    fn rate_above_ceiling_rejected() {
        let err = annual_rate_to_scaled_per_second(MAX_ANNUAL_RATE_WAD + 1).unwrap_err();
        assert_eq!(err, ErrorCode::RateOutOfRange.into());
    }

    #[test]
    fn factor_below_ray_rejected() {
        assert!(scaled_per_second_to_annual_rate(RAY - 1).is_err());
    }
}
