use anchor_lang::prelude::*;

use crate::constants::MAX_ENABLED_FEES;
use crate::error::ErrorCode;
use crate::fees::FeeKind;

#[account]
#[derive(Default)]
pub struct Fund {
    /// Stable fund identity; survives controller migration
    pub fund_id: [u8; 32],

    /// May configure fees and trigger payouts
    pub admin: Pubkey,
    /// Lifecycle controller allowed to dispatch fee hooks
    pub controller: Pubkey,
    /// Receives settled fee shares
    pub fee_recipient: Pubkey,

    // Token configuration
    pub quote_mint: Pubkey,
    pub share_mint: Pubkey,
    pub fund_vault: Pubkey,
    /// Program-owned account holding fee shares minted but not yet paid out
    pub outstanding_shares_account: Pubkey,

    // Share accounting
    pub total_shares: u64,
    pub shares_outstanding_total: u64,

    // Enabled fees in registration order
    pub fee_order: [u8; MAX_ENABLED_FEES],
    pub fee_count: u8,

    pub created_at: i64,
    pub bump: u8,

    // Reserved for future use
    pub _reserved: [u8; 32],
}

impl Fund {
    pub const LEN: usize = 8  // discriminator
        + 32  // fund_id
        + 32  // admin
        + 32  // controller
        + 32  // fee_recipient
        + 32  // quote_mint
        + 32  // share_mint
        + 32  // fund_vault
        + 32  // outstanding_shares_account
        + 8   // total_shares
        + 8   // shares_outstanding_total
        + MAX_ENABLED_FEES // fee_order
        + 1   // fee_count
        + 8   // created_at
        + 1   // bump
        + 32; // reserved

    pub fn is_fee_enabled(&self, kind: FeeKind) -> bool {
        self.fee_order[..self.fee_count as usize]
            .iter()
            .any(|&raw| raw == kind as u8)
    }

    pub fn register_fee(&mut self, kind: FeeKind) -> Result<()> {
        require!(!self.is_fee_enabled(kind), ErrorCode::AlreadyConfigured);
        require!(
            (self.fee_count as usize) < MAX_ENABLED_FEES,
            ErrorCode::TooManyFees
        );
        self.fee_order[self.fee_count as usize] = kind as u8;
        self.fee_count += 1;
        Ok(())
    }

    /// Supply base for accrual: total shares excluding fee shares already
    /// set aside as outstanding, so fees never compound on uncollected fees.
    pub fn net_shares_supply(&self) -> Result<u64> {
        self.total_shares
            .checked_sub(self.shares_outstanding_total)
            .ok_or(ErrorCode::MathUnderflow.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_fund_has_no_enabled_fees() {
        let fund = Fund::default();
        assert_eq!(fund.fee_count, 0);
        assert!(fund.fee_order[..fund.fee_count as usize].is_empty());
        assert!(!fund.is_fee_enabled(FeeKind::Management));
        assert!(!fund.is_fee_enabled(FeeKind::Performance));
    }

    #[test]
    fn fee_registration_order_preserved() {
        let mut fund = Fund::default();
        fund.register_fee(FeeKind::Performance).unwrap();
        fund.register_fee(FeeKind::Management).unwrap();
        assert_eq!(fund.fee_count, 2);
        assert_eq!(fund.fee_order[0], FeeKind::Performance as u8);
        assert_eq!(fund.fee_order[1], FeeKind::Management as u8);
    }

    #[test]
    fn duplicate_registration_rejected() {
        let mut fund = Fund::default();
        fund.register_fee(FeeKind::Management).unwrap();
        let err = fund.register_fee(FeeKind::Management).unwrap_err();
        assert_eq!(err, ErrorCode::AlreadyConfigured.into());
    }

    #[test]
    fn net_supply_excludes_outstanding() {
        let mut fund = Fund::default();
        fund.total_shares = 1_000;
        fund.shares_outstanding_total = 40;
        assert_eq!(fund.net_shares_supply().unwrap(), 960);
    }
}
