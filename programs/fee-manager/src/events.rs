use anchor_lang::prelude::*;

// Fund lifecycle events
#[event]
pub struct FundInitialized {
    pub fund: Pubkey,
    pub fund_id: [u8; 32],
    pub admin: Pubkey,
    pub controller: Pubkey,
    pub fee_recipient: Pubkey,
    pub quote_mint: Pubkey,
    pub share_mint: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct SharesBought {
    pub fund: Pubkey,
    pub buyer: Pubkey,
    pub amount_in: u64,
    pub shares_minted: u64,
    pub nav_per_share: u128,
    pub timestamp: i64,
}

#[event]
pub struct SharesRedeemed {
    pub fund: Pubkey,
    pub redeemer: Pubkey,
    pub shares_burned: u64,
    pub amount_returned: u64,
    pub nav_per_share: u128,
    pub timestamp: i64,
}

// Fee events
#[event]
pub struct FeeEnabled {
    pub fund: Pubkey,
    pub fee_kind: u8,
    pub scaled_per_second_rate: u128,
    pub rate_bps: u64,
    pub settlement_policy: u8,
    pub timestamp: i64,
}

#[event]
pub struct FeeSettled {
    pub fund: Pubkey,
    pub fee_kind: u8,
    pub hook: u8,
    pub settlement_kind: u8,
    pub shares_due: u64,
    pub total_shares_after: u64,
    pub shares_outstanding_after: u64,
    pub timestamp: i64,
}

#[event]
pub struct SharesOutstandingPaidOut {
    pub fund: Pubkey,
    pub fee_kind: u8,
    pub shares: u64,
    pub recipient: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct HighWaterMarkUpdated {
    pub fund: Pubkey,
    pub fee_kind: u8,
    pub high_water_mark: u128,
    pub timestamp: i64,
}
