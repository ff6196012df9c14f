use anchor_lang::prelude::*;
use anchor_spl::token::{self, Burn, Mint, MintTo, Token, TokenAccount};

use crate::constants::*;
use crate::error::ErrorCode;
use crate::events::FeeSettled;
use crate::fees::{self, FeeKind, Hook, SettlementInstruction, SettlementKind};
use crate::math::nav::nav_per_share;
use crate::state::{FeeLedger, Fund};

/// Accounts shared by every hook-dispatching path (explicit tick, buys,
/// redemptions), bundled so the runner can apply each fee's settlement to
/// the share ledger before the next fee computes its base.
pub(crate) struct HookAccounts<'a, 'info> {
    pub fund: &'a mut Account<'info, Fund>,
    pub management_ledger: Option<&'a mut Account<'info, FeeLedger>>,
    pub performance_ledger: Option<&'a mut Account<'info, FeeLedger>>,
    pub fund_authority: AccountInfo<'info>,
    pub share_mint: AccountInfo<'info>,
    pub recipient_shares: AccountInfo<'info>,
    pub outstanding_shares: AccountInfo<'info>,
    pub token_program: AccountInfo<'info>,
}

/// Dispatch one hook to every enabled fee in registration order.
///
/// Fees settle sequentially: a fee's mint or burn lands on the vault share
/// ledger before the next fee reads its supply base, and the share price is
/// recomputed from the changed supply, so later fees never price against a
/// stale snapshot.
pub(crate) fn run_hook(
    accs: &mut HookAccounts<'_, '_>,
    hook: Hook,
    vault_balance: u64,
    now: i64,
) -> Result<()> {
    let fund_id = accs.fund.fund_id;
    let bump = accs.fund.bump;
    let fund_key = accs.fund.key();
    let fund_seeds = &[FUND_SEED, fund_id.as_ref(), &[bump]];
    let signer_seeds = &[&fund_seeds[..]];

    for slot in 0..accs.fund.fee_count as usize {
        let kind = FeeKind::from_u8(accs.fund.fee_order[slot])?;
        let nav = nav_per_share(vault_balance, accs.fund.total_shares)?;
        let ledger = match kind {
            FeeKind::Management => accs.management_ledger.as_deref_mut(),
            FeeKind::Performance => accs.performance_ledger.as_deref_mut(),
        }
        .ok_or(ErrorCode::MissingFeeLedger)?;

        if ledger.updates_on(hook) {
            fees::update_fee(kind, ledger, nav, now)?;
        }
        if !ledger.settles_on(hook) {
            continue;
        }

        let net_supply = accs.fund.net_shares_supply()?;
        let instr = fees::settle_fee(kind, ledger, net_supply, nav, now)?;

        apply_settlement(
            instr,
            accs.fund,
            ledger,
            &accs.fund_authority,
            &accs.share_mint,
            &accs.recipient_shares,
            &accs.outstanding_shares,
            &accs.token_program,
            signer_seeds,
        )?;

        emit!(FeeSettled {
            fund: fund_key,
            fee_kind: kind as u8,
            hook: hook as u8,
            settlement_kind: instr.kind as u8,
            shares_due: instr.shares_due,
            total_shares_after: accs.fund.total_shares,
            shares_outstanding_after: ledger.shares_outstanding,
            timestamp: now,
        });
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn apply_settlement<'info>(
    instr: SettlementInstruction,
    fund: &mut Account<'info, Fund>,
    ledger: &mut FeeLedger,
    fund_authority: &AccountInfo<'info>,
    share_mint: &AccountInfo<'info>,
    recipient_shares: &AccountInfo<'info>,
    outstanding_shares: &AccountInfo<'info>,
    token_program: &AccountInfo<'info>,
    signer_seeds: &[&[&[u8]]],
) -> Result<()> {
    let due = instr.shares_due;
    match instr.kind {
        SettlementKind::None => {}
        SettlementKind::Mint => {
            token::mint_to(
                CpiContext::new_with_signer(
                    token_program.clone(),
                    MintTo {
                        mint: share_mint.clone(),
                        to: recipient_shares.clone(),
                        authority: fund_authority.clone(),
                    },
                    signer_seeds,
                ),
                due,
            )?;
            fund.total_shares = fund
                .total_shares
                .checked_add(due)
                .ok_or(ErrorCode::MathOverflow)?;
        }
        SettlementKind::MintOutstanding => {
            token::mint_to(
                CpiContext::new_with_signer(
                    token_program.clone(),
                    MintTo {
                        mint: share_mint.clone(),
                        to: outstanding_shares.clone(),
                        authority: fund_authority.clone(),
                    },
                    signer_seeds,
                ),
                due,
            )?;
            fund.total_shares = fund
                .total_shares
                .checked_add(due)
                .ok_or(ErrorCode::MathOverflow)?;
            fund.shares_outstanding_total = fund
                .shares_outstanding_total
                .checked_add(due)
                .ok_or(ErrorCode::MathOverflow)?;
            ledger.add_outstanding(due)?;
        }
        SettlementKind::BurnOutstanding => {
            token::burn(
                CpiContext::new_with_signer(
                    token_program.clone(),
                    Burn {
                        mint: share_mint.clone(),
                        from: outstanding_shares.clone(),
                        authority: fund_authority.clone(),
                    },
                    signer_seeds,
                ),
                due,
            )?;
            fund.total_shares = fund
                .total_shares
                .checked_sub(due)
                .ok_or(ErrorCode::MathUnderflow)?;
            fund.shares_outstanding_total = fund
                .shares_outstanding_total
                .checked_sub(due)
                .ok_or(ErrorCode::OutstandingUnderflow)?;
            ledger.sub_outstanding(due)?;
        }
    }
    Ok(())
}

#[derive(Accounts)]
#[instruction(fund_id: [u8; 32])]
pub struct DispatchHook<'info> {
    pub controller: Signer<'info>,

    #[account(
        mut,
        seeds = [FUND_SEED, fund_id.as_ref()],
        bump = fund.bump,
        constraint = fund.controller == controller.key() @ ErrorCode::Unauthorized,
    )]
    pub fund: Account<'info, Fund>,

    #[account(
        mut,
        seeds = [SHARE_MINT_SEED, fund_id.as_ref()],
        bump,
        constraint = share_mint.key() == fund.share_mint @ ErrorCode::InvalidParameter,
    )]
    pub share_mint: Account<'info, Mint>,

    /// Fund's quote vault, read for share pricing
    #[account(
        seeds = [FUND_VAULT_SEED, fund_id.as_ref()],
        bump,
        constraint = fund_vault.key() == fund.fund_vault @ ErrorCode::InvalidParameter,
    )]
    pub fund_vault: Account<'info, TokenAccount>,

    /// Fee recipient's share token account
    #[account(
        mut,
        constraint = recipient_share_account.mint == fund.share_mint @ ErrorCode::InvalidParameter,
        constraint = recipient_share_account.owner == fund.fee_recipient @ ErrorCode::InvalidParameter,
    )]
    pub recipient_share_account: Account<'info, TokenAccount>,

    /// Program-owned bucket for shares minted but not yet paid out
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

pub fn handler(ctx: Context<DispatchHook>, _fund_id: [u8; 32], hook: Hook) -> Result<()> {
    let clock = Clock::get()?;
    let vault_balance = ctx.accounts.fund_vault.amount;

    let fund_authority = ctx.accounts.fund.to_account_info();
    let share_mint = ctx.accounts.share_mint.to_account_info();
    let recipient_shares = ctx.accounts.recipient_share_account.to_account_info();
    let outstanding_shares = ctx.accounts.outstanding_share_account.to_account_info();
    let token_program = ctx.accounts.token_program.to_account_info();

    let mut accs = HookAccounts {
        fund: &mut ctx.accounts.fund,
        management_ledger: ctx.accounts.management_ledger.as_mut(),
        performance_ledger: ctx.accounts.performance_ledger.as_mut(),
        fund_authority,
        share_mint,
        recipient_shares,
        outstanding_shares,
        token_program,
    };
    run_hook(&mut accs, hook, vault_balance, clock.unix_timestamp)
}
