use anchor_lang::prelude::*;

use crate::constants::{INITIAL_NAV_PER_SHARE, WAD};
use crate::error::ErrorCode;
use crate::math::fixed_point::mul_div;

/// NAV per share in WAD precision from the fund's quote vault balance.
/// 1.0 when no shares exist yet.
pub fn nav_per_share(vault_balance: u64, total_shares: u64) -> Result<u128> {
    if total_shares == 0 {
        return Ok(INITIAL_NAV_PER_SHARE);
    }
    mul_div(vault_balance as u128, WAD, total_shares as u128)
}

/// Shares minted for a quote deposit at the given NAV: amount * WAD / nav
pub fn shares_for_amount(amount: u64, nav_per_share: u128) -> Result<u64> {
    let shares = mul_div(amount as u128, WAD, nav_per_share)?;
    u64::try_from(shares).map_err(|_| ErrorCode::MathOverflow.into())
}

/// Quote returned for burned shares at the given NAV: shares * nav / WAD
pub fn amount_for_shares(shares: u64, nav_per_share: u128) -> Result<u64> {
    let amount = mul_div(shares as u128, nav_per_share, WAD)?;
    u64::try_from(amount).map_err(|_| ErrorCode::MathOverflow.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_fund_prices_at_one() {
        assert_eq!(nav_per_share(0, 0).unwrap(), WAD);
        assert_eq!(nav_per_share(1_000_000, 0).unwrap(), WAD);
    }

    #[test]
    fn nav_tracks_vault_balance() {
        // 2_000_000 quote over 1_000_000 shares = 2.0 per share
        assert_eq!(nav_per_share(2_000_000, 1_000_000).unwrap(), 2 * WAD);
    }

    #[test]
    fn share_amount_round_trip() {
        let nav = nav_per_share(3_000_000, 2_000_000).unwrap(); // 1.5
        let shares = shares_for_amount(300, nav).unwrap();
        assert_eq!(shares, 200);
        assert_eq!(amount_for_shares(shares, nav).unwrap(), 300);
    }
}
