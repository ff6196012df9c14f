use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::*;
use crate::error::ErrorCode;
use crate::events::{HighWaterMarkUpdated, SharesOutstandingPaidOut};
use crate::fees::{performance, FeeKind};
use crate::state::{FeeLedger, Fund};

#[derive(Accounts)]
#[instruction(fund_id: [u8; 32])]
pub struct PayoutOutstanding<'info> {
    pub admin: Signer<'info>,

    #[account(
        mut,
        seeds = [FUND_SEED, fund_id.as_ref()],
        bump = fund.bump,
        constraint = fund.admin == admin.key() @ ErrorCode::Unauthorized,
    )]
    pub fund: Account<'info, Fund>,

    /// Fee recipient's share token account
    #[account(
        mut,
        constraint = recipient_share_account.mint == fund.share_mint @ ErrorCode::InvalidParameter,
        constraint = recipient_share_account.owner == fund.fee_recipient @ ErrorCode::InvalidParameter,
    )]
    pub recipient_share_account: Account<'info, TokenAccount>,

    #[account(
        mut,
        seeds = [OUTSTANDING_SHARES_SEED, fund_id.as_ref()],
        bump,
        constraint = outstanding_share_account.key() == fund.outstanding_shares_account @ ErrorCode::InvalidParameter,
    )]
    pub outstanding_share_account: Account<'info, TokenAccount>,

    #[account(
        mut,
        seeds = [FEE_LEDGER_SEED, fund_id.as_ref(), &[FeeKind::Management as u8]],
        bump,
    )]
    pub management_ledger: Option<Account<'info, FeeLedger>>,

    #[account(
        mut,
        seeds = [FEE_LEDGER_SEED, fund_id.as_ref(), &[FeeKind::Performance as u8]],
        bump,
    )]
    pub performance_ledger: Option<Account<'info, FeeLedger>>,

    pub token_program: Program<'info, Token>,
}

pub fn handler(
    ctx: Context<PayoutOutstanding>,
    fund_id: [u8; 32],
    fee_kinds: Vec<u8>,
) -> Result<()> {
    let clock = Clock::get()?;
    let now = clock.unix_timestamp;

    let fund_key = ctx.accounts.fund.key();
    let recipient = ctx.accounts.fund.fee_recipient;
    let bump = ctx.accounts.fund.bump;
    let fund_seeds = &[FUND_SEED, fund_id.as_ref(), &[bump]];
    let signer_seeds = &[&fund_seeds[..]];

    let fund_authority = ctx.accounts.fund.to_account_info();
    let outstanding_info = ctx.accounts.outstanding_share_account.to_account_info();
    let recipient_info = ctx.accounts.recipient_share_account.to_account_info();
    let token_program_info = ctx.accounts.token_program.to_account_info();

    for raw in fee_kinds {
        let kind = FeeKind::from_u8(raw)?;
        require!(
            ctx.accounts.fund.is_fee_enabled(kind),
            ErrorCode::UnknownFeeKind
        );
        let ledger = match kind {
            FeeKind::Management => ctx.accounts.management_ledger.as_mut(),
            FeeKind::Performance => ctx.accounts.performance_ledger.as_mut(),
        }
        .ok_or(ErrorCode::MissingFeeLedger)?;

        // Paying out realizes the gain the bucket was priced against; the
        // mark moves to the settled price, not the live one
        if kind == FeeKind::Performance && performance::crystallize(ledger) {
            emit!(HighWaterMarkUpdated {
                fund: fund_key,
                fee_kind: kind as u8,
                high_water_mark: ledger.high_water_mark,
                timestamp: now,
            });
        }

        let shares = ledger.shares_outstanding;
        if shares == 0 {
            continue;
        }

        token::transfer(
            CpiContext::new_with_signer(
                token_program_info.clone(),
                Transfer {
                    from: outstanding_info.clone(),
                    to: recipient_info.clone(),
                    authority: fund_authority.clone(),
                },
                signer_seeds,
            ),
            shares,
        )?;

        ledger.sub_outstanding(shares)?;
        let fund = &mut ctx.accounts.fund;
        fund.shares_outstanding_total = fund
            .shares_outstanding_total
            .checked_sub(shares)
            .ok_or(ErrorCode::OutstandingUnderflow)?;

        emit!(SharesOutstandingPaidOut {
            fund: fund_key,
            fee_kind: kind as u8,
            shares,
            recipient,
            timestamp: now,
        });
    }

    Ok(())
}
