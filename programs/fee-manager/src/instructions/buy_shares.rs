use anchor_lang::prelude::*;
use anchor_spl::token::{self, Mint, MintTo, Token, TokenAccount, Transfer};

use crate::constants::*;
use crate::error::ErrorCode;
use crate::events::SharesBought;
use crate::fees::{FeeKind, Hook};
use crate::instructions::dispatch_hook::{run_hook, HookAccounts};
use crate::math::nav::{nav_per_share, shares_for_amount};
use crate::state::{FeeLedger, Fund};

#[derive(Accounts)]
#[instruction(fund_id: [u8; 32])]
pub struct BuyShares<'info> {
    #[account(mut)]
    pub buyer: Signer<'info>,

    #[account(
        mut,
        seeds = [FUND_SEED, fund_id.as_ref()],
        bump = fund.bump,
    )]
    pub fund: Account<'info, Fund>,

    /// Buyer's quote token account
    #[account(
        mut,
        constraint = buyer_quote_account.mint == fund.quote_mint @ ErrorCode::InvalidParameter,
        constraint = buyer_quote_account.owner == buyer.key() @ ErrorCode::Unauthorized,
    )]
    pub buyer_quote_account: Account<'info, TokenAccount>,

    /// Buyer's share token account
    #[account(
        mut,
        constraint = buyer_share_account.mint == fund.share_mint @ ErrorCode::InvalidParameter,
        constraint = buyer_share_account.owner == buyer.key() @ ErrorCode::Unauthorized,
    )]
    pub buyer_share_account: Account<'info, TokenAccount>,

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

pub fn handler(ctx: Context<BuyShares>, fund_id: [u8; 32], amount: u64) -> Result<()> {
    require!(amount > 0, ErrorCode::InvalidAmount);

    let clock = Clock::get()?;
    let now = clock.unix_timestamp;

    let fund_authority = ctx.accounts.fund.to_account_info();
    let share_mint_info = ctx.accounts.share_mint.to_account_info();
    let recipient_info = ctx.accounts.recipient_share_account.to_account_info();
    let outstanding_info = ctx.accounts.outstanding_share_account.to_account_info();
    let token_program_info = ctx.accounts.token_program.to_account_info();

    // Settle accrued fees before pricing the buy, so the entering investor
    // pays the post-dilution price
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
        run_hook(&mut accs, Hook::PreBuyShares, vault_balance, now)?;
    }

    let nav = nav_per_share(
        ctx.accounts.fund_vault.amount,
        ctx.accounts.fund.total_shares,
    )?;
    let shares_to_mint = shares_for_amount(amount, nav)?;
    require!(shares_to_mint > 0, ErrorCode::InvalidAmount);

    // Transfer quote from buyer to fund vault
    token::transfer(
        CpiContext::new(
            token_program_info.clone(),
            Transfer {
                from: ctx.accounts.buyer_quote_account.to_account_info(),
                to: ctx.accounts.fund_vault.to_account_info(),
                authority: ctx.accounts.buyer.to_account_info(),
            },
        ),
        amount,
    )?;

    // Mint shares to buyer (fund PDA signs as mint authority)
    let bump = ctx.accounts.fund.bump;
    let fund_seeds = &[FUND_SEED, fund_id.as_ref(), &[bump]];
    let signer_seeds = &[&fund_seeds[..]];
    token::mint_to(
        CpiContext::new_with_signer(
            token_program_info.clone(),
            MintTo {
                mint: share_mint_info.clone(),
                to: ctx.accounts.buyer_share_account.to_account_info(),
                authority: fund_authority.clone(),
            },
            signer_seeds,
        ),
        shares_to_mint,
    )?;

    let fund = &mut ctx.accounts.fund;
    fund.total_shares = fund
        .total_shares
        .checked_add(shares_to_mint)
        .ok_or(ErrorCode::MathOverflow)?;

    // Post-buy observers see the post-trade price
    ctx.accounts.fund_vault.reload()?;
    let vault_after = ctx.accounts.fund_vault.amount;
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
        run_hook(&mut accs, Hook::PostBuyShares, vault_after, now)?;
    }

    emit!(SharesBought {
        fund: ctx.accounts.fund.key(),
        buyer: ctx.accounts.buyer.key(),
        amount_in: amount,
        shares_minted: shares_to_mint,
        nav_per_share: nav,
        timestamp: now,
    });

    Ok(())
}
