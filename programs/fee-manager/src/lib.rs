#![allow(ambiguous_glob_reexports)]

pub mod constants;
pub mod error;
pub mod events;
pub mod fees;
pub mod instructions;
pub mod math;
pub mod state;

use anchor_lang::prelude::*;

pub use constants::*;
pub use instructions::*;
pub use state::*;

use fees::Hook;

declare_id!("FeeManager111111111111111111111111111111111");

#[program]
pub mod fee_manager {
    use super::*;

    /// Create a fund: share mint, quote vault, and the outstanding-shares
    /// bucket, all owned by the fund PDA
    pub fn initialize_fund(
        ctx: Context<InitializeFund>,
        fund_id: [u8; 32],
        params: InitializeFundParams,
    ) -> Result<()> {
        instructions::initialize_fund::handler(ctx, fund_id, params)
    }

    /// One-time fee enablement for a fund; the rate is immutable afterwards
    pub fn configure_fee(
        ctx: Context<ConfigureFee>,
        fund_id: [u8; 32],
        fee_kind: u8,
        params: FeeParams,
    ) -> Result<()> {
        instructions::configure_fee::handler(ctx, fund_id, fee_kind, params)
    }

    /// Settle all enabled fees responding to the given hook (explicit tick)
    pub fn dispatch_hook(
        ctx: Context<DispatchHook>,
        fund_id: [u8; 32],
        hook: Hook,
    ) -> Result<()> {
        instructions::dispatch_hook::handler(ctx, fund_id, hook)
    }

    /// Buy fund shares at NAV; settles pre-buy fees first
    pub fn buy_shares(ctx: Context<BuyShares>, fund_id: [u8; 32], amount: u64) -> Result<()> {
        instructions::buy_shares::handler(ctx, fund_id, amount)
    }

    /// Redeem fund shares at NAV; settles pre-redeem fees first
    pub fn redeem_shares(
        ctx: Context<RedeemShares>,
        fund_id: [u8; 32],
        shares: u64,
    ) -> Result<()> {
        instructions::redeem_shares::handler(ctx, fund_id, shares)
    }

    /// Pay accumulated outstanding fee shares out to the fee recipient
    pub fn payout_outstanding(
        ctx: Context<PayoutOutstanding>,
        fund_id: [u8; 32],
        fee_kinds: Vec<u8>,
    ) -> Result<()> {
        instructions::payout_outstanding::handler(ctx, fund_id, fee_kinds)
    }
}
