use anchor_lang::prelude::*;
use anchor_spl::token::{self, Burn, Mint, Token, TokenAccount, Transfer};

use crate::constants::*;
use crate::error::ErrorCode;
use crate::events::SharesRedeemed;
use crate::fees::{FeeKind, Hook};
use crate::instructions::dispatch_hook::{run_hook, HookAccounts};
use crate::math::nav::{amount_for_shares, nav_per_share};
use crate::state::{FeeLedger, Fund};

#[derive(Accounts)]
#[instruction(fund_id: [u8; 32])]
pub struct RedeemShares<'info> {
    #[account(mut)]
    pub redeemer: Signer<'info>,

    #[account(
        mut,
        seeds = [FUND_SEED, fund_id.as_ref()],
        bump = fund.bump,
    )]
    pub fund: Account<'info, Fund>,

    /// Redeemer's share token account
    #[account(
        mut,
        constraint = redeemer_share_account.mint == fund.share_mint @ ErrorCode::InvalidParameter,
        constraint = redeemer_share_account.owner == redeemer.key() @ ErrorCode::Unauthorized,
    )]
    pub redeemer_share_account: Account<'info, TokenAccount>,

    /// Redeemer's quote token account
    #[account(
        mut,
        constraint = redeemer_quote_account.mint == fund.quote_mint @ ErrorCode::InvalidParameter,
        constraint = redeemer_quote_account.owner == redeemer.key() @ ErrorCode::Unauthorized,
    )]
    pub redeemer_quote_account: Account<'info, TokenAccount>,

    #[account(
        mut,
        seeds = [SHARE_MINT_SEED, fund_id.as_ref()],
        bump,
        constraint = share_mint.key() == fund.share_mint @ ErrorCode::InvalidParameter,
    )]
    pub share_mint: Account<'info, Mint>,

    #[account(
        mut,
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

pub fn handler(ctx: Context<RedeemShares>, fund_id: [u8; 32], shares: u64) -> Result<()> {
    require!(shares > 0, ErrorCode::InvalidAmount);
    require!(
        ctx.accounts.redeemer_share_account.amount >= shares,
        ErrorCode::InsufficientShares
    );

    let clock = Clock::get()?;
    let now = clock.unix_timestamp;

    let fund_authority = ctx.accounts.fund.to_account_info();
    let share_mint_info = ctx.accounts.share_mint.to_account_info();
    let recipient_info = ctx.accounts.recipient_share_account.to_account_info();
    let outstanding_info = ctx.accounts.outstanding_share_account.to_account_info();
    let token_program_info = ctx.accounts.token_program.to_account_info();

    // Settle accrued fees first so the exiting investor carries their share
    // of the dilution
    let vault_balance = ctx.accounts.fund_vault.amount;
    {
        let mut accs = HookAccounts {
            fund: &mut ctx.accounts.fund,
            management_ledger: ctx.accounts.management_ledger.as_mut(),
            performance_ledger: ctx.accounts.performance_ledger.as_mut(),
            fund_authority: fund_authority.clone(),
            share_mint: share_mint_info.clone(),
            recipient_shares: recipient_info.clone(),
            outstanding_shares: outstanding_info.clone(),
            token_program: token_program_info.clone(),
        };
        run_hook(&mut accs, Hook::PreRedeemShares, vault_balance, now)?;
    }

    let nav = nav_per_share(
        ctx.accounts.fund_vault.amount,
        ctx.accounts.fund.total_shares,
    )?;
    let amount_out = amount_for_shares(shares, nav)?;
    require!(amount_out > 0, ErrorCode::InvalidAmount);
    require!(
        ctx.accounts.fund_vault.amount >= amount_out,
        ErrorCode::InsufficientFundLiquidity
    );

    // Burn shares from redeemer
    token::burn(
        CpiContext::new(
            token_program_info.clone(),
            Burn {
                mint: share_mint_info.clone(),
                from: ctx.accounts.redeemer_share_account.to_account_info(),
                authority: ctx.accounts.redeemer.to_account_info(),
            },
        ),
        shares,
    )?;

    // Transfer quote from fund vault to redeemer (fund PDA signs)
    let bump = ctx.accounts.fund.bump;
    let fund_seeds = &[FUND_SEED, fund_id.as_ref(), &[bump]];
    let signer_seeds = &[&fund_seeds[..]];
    token::transfer(
        CpiContext::new_with_signer(
            token_program_info.clone(),
            Transfer {
                from: ctx.accounts.fund_vault.to_account_info(),
                to: ctx.accounts.redeemer_quote_account.to_account_info(),
                authority: fund_authority.clone(),
            },
            signer_seeds,
        ),
        amount_out,
    )?;

    let fund = &mut ctx.accounts.fund;
    fund.total_shares = fund
        .total_shares
        .checked_sub(shares)
        .ok_or(ErrorCode::MathUnderflow)?;

    emit!(SharesRedeemed {
        fund: ctx.accounts.fund.key(),
        redeemer: ctx.accounts.redeemer.key(),
        shares_burned: shares,
        amount_returned: amount_out,
        nav_per_share: nav,
        timestamp: now,
    });

    Ok(())
}
