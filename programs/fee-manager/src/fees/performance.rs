use anchor_lang::prelude::*;

use crate::error::ErrorCode;
use crate::fees::{SettlementInstruction, SettlementKind};
use crate::math::fixed_point::{bps_mul, mul_div};
use crate::state::FeeLedger;

/// Settle the high-water-mark performance fee.
///
/// The outstanding bucket is levelled to the share of unrealized gain above
/// the high-water mark, so a price fall after a mint claws the excess back
/// via a burn. The mark itself only moves at crystallization (payout).
pub fn settle(
    ledger: &mut FeeLedger,
    net_shares_supply: u64,
    nav_per_share: u128,
    now: i64,
) -> Result<SettlementInstruction> {
    if ledger.last_settled == 0 {
        // Activation: start measuring from the current price, no
        // retroactive fee on appreciation before the fee existed
        if nav_per_share > ledger.high_water_mark {
            ledger.high_water_mark = nav_per_share;
        }
        ledger.last_share_price = nav_per_share;
        ledger.record_settlement(now)?;
        return Ok(SettlementInstruction::none());
    }

    ledger.elapsed_since(now)?;
    ledger.last_share_price = nav_per_share;
    ledger.record_settlement(now)?;

    let target = target_outstanding(ledger, net_shares_supply, nav_per_share)?;
    let current = ledger.shares_outstanding;
    if target > current {
        Ok(SettlementInstruction {
            kind: SettlementKind::MintOutstanding,
            shares_due: target - current,
        })
    } else if target < current {
        Ok(SettlementInstruction {
            kind: SettlementKind::BurnOutstanding,
            shares_due: current - target,
        })
    } else {
        Ok(SettlementInstruction::none())
    }
}

/// Record the share price a hook observed without settling
pub fn update(ledger: &mut FeeLedger, nav_per_share: u128, _now: i64) -> Result<()> {
    ledger.last_share_price = nav_per_share;
    Ok(())
}

/// Raise the high-water mark at payout, to the last *settled* share price.
/// Appreciation since that settlement stays below the mark and remains
/// chargeable at the next settle. Returns whether the mark moved.
pub fn crystallize(ledger: &mut FeeLedger) -> bool {
    if ledger.last_share_price > ledger.high_water_mark {
        ledger.high_water_mark = ledger.last_share_price;
        return true;
    }
    false
}

/// Shares the bucket should hold: rate_bps of the gain above the mark,
/// expressed in shares at the current price
fn target_outstanding(
    ledger: &FeeLedger,
    net_shares_supply: u64,
    nav_per_share: u128,
) -> Result<u64> {
    if net_shares_supply == 0
        || nav_per_share == 0
        || nav_per_share <= ledger.high_water_mark
    {
        return Ok(0);
    }
    let gain = nav_per_share - ledger.high_water_mark;
    let gain_shares = mul_div(net_shares_supply as u128, gain, nav_per_share)?;
    let due = bps_mul(gain_shares, ledger.rate_bps)?;
    u64::try_from(due).map_err(|_| ErrorCode::MathOverflow.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{INITIAL_NAV_PER_SHARE, WAD};
    use crate::fees::{FeeKind, SettlementPolicy};
    use crate::math::nav::nav_per_share;

    const SUPPLY: u64 = 1_000_000;

    fn perf_ledger(rate_bps: u64) -> FeeLedger {
        let mut ledger = FeeLedger::default();
        ledger.fee_kind = FeeKind::Performance as u8;
        ledger.settlement_policy = SettlementPolicy::Outstanding as u8;
        ledger.rate_bps = rate_bps;
        ledger.high_water_mark = INITIAL_NAV_PER_SHARE;
        ledger
    }

    #[test]
    fn activation_raises_mark_without_charging() {
        let mut ledger = perf_ledger(2_000);
        let instr = settle(&mut ledger, SUPPLY, 3 * WAD, 100).unwrap();
        assert_eq!(instr.kind, SettlementKind::None);
        assert_eq!(ledger.high_water_mark, 3 * WAD);
        assert_eq!(ledger.last_settled, 100);
    }

    #[test]
    fn gain_above_mark_mints_outstanding() {
        let mut ledger = perf_ledger(2_000);
        settle(&mut ledger, SUPPLY, WAD, 100).unwrap();
        // price up 50%: gain-equivalent shares = supply/3, fee = 20% of that
        let instr = settle(&mut ledger, SUPPLY, WAD + WAD / 2, 200).unwrap();
        assert_eq!(instr.kind, SettlementKind::MintOutstanding);
        let expected = (SUPPLY as u128 / 3 * 2_000 / 10_000) as u64;
        assert!(instr.shares_due.abs_diff(expected) <= 1);
    }

    #[test]
    fn price_fall_claws_back() {
        let mut ledger = perf_ledger(2_000);
        settle(&mut ledger, SUPPLY, WAD, 100).unwrap();
        let minted = settle(&mut ledger, SUPPLY, 2 * WAD, 200).unwrap();
        ledger.add_outstanding(minted.shares_due).unwrap();

        let instr = settle(&mut ledger, SUPPLY, WAD + WAD / 4, 300).unwrap();
        assert_eq!(instr.kind, SettlementKind::BurnOutstanding);
        assert!(instr.shares_due > 0);
        assert!(instr.shares_due < minted.shares_due);
    }

    #[test]
    fn full_fall_below_mark_empties_bucket() {
        let mut ledger = perf_ledger(2_000);
        settle(&mut ledger, SUPPLY, WAD, 100).unwrap();
        let minted = settle(&mut ledger, SUPPLY, 2 * WAD, 200).unwrap();
        ledger.add_outstanding(minted.shares_due).unwrap();

        let instr = settle(&mut ledger, SUPPLY, WAD / 2, 300).unwrap();
        assert_eq!(instr.kind, SettlementKind::BurnOutstanding);
        assert_eq!(instr.shares_due, minted.shares_due);
    }

    #[test]
    fn crystallize_moves_mark_to_settled_price_once() {
        let mut ledger = perf_ledger(2_000);
        settle(&mut ledger, SUPPLY, WAD, 100).unwrap();
        settle(&mut ledger, SUPPLY, 2 * WAD, 200).unwrap();
        assert!(crystallize(&mut ledger));
        assert_eq!(ledger.high_water_mark, 2 * WAD);
        assert!(!crystallize(&mut ledger));
        assert_eq!(ledger.high_water_mark, 2 * WAD);
    }

    #[test]
    fn payout_does_not_forgive_unsettled_gain() {
        let mut ledger = perf_ledger(2_000);
        settle(&mut ledger, SUPPLY, WAD, 100).unwrap();
        let minted = settle(&mut ledger, SUPPLY, 2 * WAD, 200).unwrap();
        ledger.add_outstanding(minted.shares_due).unwrap();

        // price runs to 3.0 before the admin pays the bucket out
        let bucket = ledger.shares_outstanding;
        ledger.sub_outstanding(bucket).unwrap();
        assert!(crystallize(&mut ledger));
        assert_eq!(ledger.high_water_mark, 2 * WAD);

        // the 2.0 -> 3.0 gain is still chargeable afterwards
        let instr = settle(&mut ledger, SUPPLY, 3 * WAD, 300).unwrap();
        assert_eq!(instr.kind, SettlementKind::MintOutstanding);
        assert!(instr.shares_due > 0);
    }

    #[test]
    fn management_dilution_reprices_performance_gain() {
        // a prior fee's mint raises supply, so the gain must be repriced
        // from the same vault balance instead of a pre-hook snapshot
        let vault = 2_000_000u64;
        let mut ledger = perf_ledger(2_000);
        settle(&mut ledger, SUPPLY, WAD, 100).unwrap();

        let diluted = SUPPLY + SUPPLY / 100;
        let stale_nav = nav_per_share(vault, SUPPLY).unwrap();
        let repriced_nav = nav_per_share(vault, diluted).unwrap();
        assert!(repriced_nav < stale_nav);

        let stale = settle(&mut ledger.clone(), diluted, stale_nav, 200).unwrap();
        let repriced = settle(&mut ledger, diluted, repriced_nav, 200).unwrap();
        assert!(repriced.shares_due < stale.shares_due);
    }

    #[test]
    fn settled_level_is_stable_at_same_price() {
        let mut ledger = perf_ledger(2_000);
        settle(&mut ledger, SUPPLY, WAD, 100).unwrap();
        let minted = settle(&mut ledger, SUPPLY, 2 * WAD, 200).unwrap();
        ledger.add_outstanding(minted.shares_due).unwrap();
        let instr = settle(&mut ledger, SUPPLY, 2 * WAD, 300).unwrap();
        assert_eq!(instr.kind, SettlementKind::None);
    }
}
