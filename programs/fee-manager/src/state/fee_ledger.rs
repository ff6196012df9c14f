use anchor_lang::prelude::*;

use crate::error::ErrorCode;
use crate::fees::{FeeKind, Hook, SettlementPolicy};

/// Per-(fund, fee kind) settlement ledger.
///
/// Lifecycle: created once by `configure_fee` (rate immutable thereafter),
/// `last_settled` advanced on every settlement, never deleted.
#[account]
#[derive(Default)]
pub struct FeeLedger {
    pub fund: Pubkey,
    pub fee_kind: u8,
    pub settlement_policy: u8,

    /// Hook bitmasks declaring this fee's settle/update capability sets
    pub settle_hooks: u8,
    pub update_hooks: u8,

    /// Per-second growth factor in RAY precision (management accrual).
    /// Invariant: >= 1e27 once configured.
    pub scaled_per_second_rate: u128,
    /// Gain share in basis points (performance accrual)
    pub rate_bps: u64,

    /// Timestamp of the last settlement; 0 = never settled
    pub last_settled: i64,
    /// Shares minted as fee compensation but not yet paid out
    pub shares_outstanding: u64,

    /// High-water mark of NAV per share, WAD precision (performance)
    pub high_water_mark: u128,
    /// Share price observed at the most recent settle/update
    pub last_share_price: u128,

    pub bump: u8,

    // Reserved for future use
    pub _reserved: [u8; 32],
}

impl FeeLedger {
    pub const LEN: usize = 8  // discriminator
        + 32  // fund
        + 1   // fee_kind
        + 1   // settlement_policy
        + 1   // settle_hooks
        + 1   // update_hooks
        + 16  // scaled_per_second_rate
        + 8   // rate_bps
        + 8   // last_settled
        + 8   // shares_outstanding
        + 16  // high_water_mark
        + 16  // last_share_price
        + 1   // bump
        + 32; // reserved

    pub fn kind(&self) -> Result<FeeKind> {
        FeeKind::from_u8(self.fee_kind)
    }

    pub fn policy(&self) -> Result<SettlementPolicy> {
        SettlementPolicy::from_u8(self.settlement_policy)
    }

    pub fn settles_on(&self, hook: Hook) -> bool {
        self.settle_hooks & hook.mask() != 0
    }

    pub fn updates_on(&self, hook: Hook) -> bool {
        self.update_hooks & hook.mask() != 0
    }

    /// Seconds since the last settlement. Zero when never settled, so the
    /// first settlement charges nothing retroactively.
    pub fn elapsed_since(&self, now: i64) -> Result<u64> {
        if self.last_settled == 0 {
            return Ok(0);
        }
        let delta = now
            .checked_sub(self.last_settled)
            .ok_or(ErrorCode::MathOverflow)?;
        require!(delta >= 0, ErrorCode::NotMonotonic);
        Ok(delta as u64)
    }

    /// Advance the settlement clock. Rejects timestamp regression except
    /// from the never-settled state.
    pub fn record_settlement(&mut self, now: i64) -> Result<()> {
        if self.last_settled != 0 {
            require!(now >= self.last_settled, ErrorCode::NotMonotonic);
        }
        self.last_settled = now;
        Ok(())
    }

    pub fn add_outstanding(&mut self, shares: u64) -> Result<()> {
        self.shares_outstanding = self
            .shares_outstanding
            .checked_add(shares)
            .ok_or(ErrorCode::MathOverflow)?;
        Ok(())
    }

    pub fn sub_outstanding(&mut self, shares: u64) -> Result<()> {
        self.shares_outstanding = self
            .shares_outstanding
            .checked_sub(shares)
            .ok_or(ErrorCode::OutstandingUnderflow)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_settled_accepts_any_timestamp() {
        let mut ledger = FeeLedger::default();
        assert_eq!(ledger.elapsed_since(1_700_000_000).unwrap(), 0);
        ledger.record_settlement(5).unwrap();
        assert_eq!(ledger.last_settled, 5);
    }

    #[test]
    fn settlement_clock_is_monotonic() {
        let mut ledger = FeeLedger::default();
        ledger.record_settlement(100).unwrap();
        ledger.record_settlement(100).unwrap();
        ledger.record_settlement(200).unwrap();
        let err = ledger.record_settlement(199).unwrap_err();
        assert_eq!(err, ErrorCode::NotMonotonic.into());
        assert_eq!(ledger.last_settled, 200);
    }

    #[test]
    fn elapsed_rejects_regression() {
        let mut ledger = FeeLedger::default();
        ledger.record_settlement(1_000).unwrap();
        assert_eq!(ledger.elapsed_since(1_060).unwrap(), 60);
        assert!(ledger.elapsed_since(999).is_err());
    }

    #[test]
    fn outstanding_bucket_checked() {
        let mut ledger = FeeLedger::default();
        ledger.add_outstanding(10).unwrap();
        ledger.sub_outstanding(10).unwrap();
        let err = ledger.sub_outstanding(1).unwrap_err();
        assert_eq!(err, ErrorCode::OutstandingUnderflow.into());
    }
}
