use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::ErrorCode;
use crate::events::FeeEnabled;
use crate::fees::{default_settle_hooks, default_update_hooks, FeeKind, SettlementPolicy};
use crate::math::rate::scaled_per_second_to_annual_rate;
use crate::state::{FeeLedger, Fund};

#[derive(AnchorSerialize, AnchorDeserialize)]
pub enum FeeParams {
    Management {
        /// Per-second growth factor in RAY precision, e.g.
        /// 1000000000315522921573372069 ~= 1% per year
        scaled_per_second_rate: u128,
    },
    Performance {
        /// Share of gains above the high-water mark, in basis points
        rate_bps: u64,
    },
}

#[derive(Accounts)]
#[instruction(fund_id: [u8; 32], fee_kind: u8)]
pub struct ConfigureFee<'info> {
    #[account(mut)]
    pub admin: Signer<'info>,

    #[account(
        mut,
        seeds = [FUND_SEED, fund_id.as_ref()],
        bump = fund.bump,
        constraint = fund.admin == admin.key() @ ErrorCode::Unauthorized,
    )]
    pub fund: Account<'info, Fund>,

    #[account(
        init,
        payer = admin,
        space = FeeLedger::LEN,
        seeds = [FEE_LEDGER_SEED, fund_id.as_ref(), &[fee_kind]],
        bump,
    )]
    pub fee_ledger: Account<'info, FeeLedger>,

    pub system_program: Program<'info, System>,
}

pub fn handler(
    ctx: Context<ConfigureFee>,
    _fund_id: [u8; 32],
    fee_kind: u8,
    params: FeeParams,
) -> Result<()> {
    let kind = FeeKind::from_u8(fee_kind)?;
    let fund = &mut ctx.accounts.fund;
    require!(!fund.is_fee_enabled(kind), ErrorCode::AlreadyConfigured);

    let ledger = &mut ctx.accounts.fee_ledger;
    match (kind, params) {
        (FeeKind::Management, FeeParams::Management {
            scaled_per_second_rate,
        }) => {
            // One compounding pass bounds the factor; rejects factors
            // below RAY and annual rates past the ceiling
            let annual_rate_wad = scaled_per_second_to_annual_rate(scaled_per_second_rate)?;
            require!(
                annual_rate_wad <= MAX_ANNUAL_RATE_WAD,
                ErrorCode::RateOutOfRange
            );
            ledger.scaled_per_second_rate = scaled_per_second_rate;
            ledger.settlement_policy = SettlementPolicy::Direct as u8;
        }
        (FeeKind::Performance, FeeParams::Performance { rate_bps }) => {
            require!(
                rate_bps <= MAX_PERFORMANCE_FEE_BPS,
                ErrorCode::FeeExceedsMaximum
            );
            ledger.rate_bps = rate_bps;
            ledger.high_water_mark = INITIAL_NAV_PER_SHARE;
            ledger.settlement_policy = SettlementPolicy::Outstanding as u8;
        }
        _ => return Err(ErrorCode::InvalidParameter.into()),
    }

    ledger.fund = fund.key();
    ledger.fee_kind = kind as u8;
    ledger.settle_hooks = default_settle_hooks(kind);
    ledger.update_hooks = default_update_hooks(kind);
    ledger.last_settled = 0;
    ledger.shares_outstanding = 0;
    ledger.bump = ctx.bumps.fee_ledger;

    fund.register_fee(kind)?;

    let clock = Clock::get()?;
    emit!(FeeEnabled {
        fund: fund.key(),
        fee_kind: kind as u8,
        scaled_per_second_rate: ledger.scaled_per_second_rate,
        rate_bps: ledger.rate_bps,
        settlement_policy: ledger.settlement_policy,
        timestamp: clock.unix_timestamp,
    });

    Ok(())
}
