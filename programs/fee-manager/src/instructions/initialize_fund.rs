use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::*;
use crate::events::FundInitialized;
use crate::state::Fund;

#[derive(AnchorSerialize, AnchorDeserialize)]
pub struct InitializeFundParams {
    /// Lifecycle controller allowed to dispatch fee hooks
    pub controller: Pubkey,
    /// Recipient of settled fee shares
    pub fee_recipient: Pubkey,
}

#[derive(Accounts)]
#[instruction(fund_id: [u8; 32])]
pub struct InitializeFund<'info> {
    #[account(mut)]
    pub admin: Signer<'info>,

    #[account(
        init,
        payer = admin,
        space = Fund::LEN,
        seeds = [FUND_SEED, fund_id.as_ref()],
        bump,
    )]
    pub fund: Account<'info, Fund>,

    /// The fund's quote currency mint
    pub quote_mint: Account<'info, Mint>,

    #[account(
        init,
        payer = admin,
        seeds = [SHARE_MINT_SEED, fund_id.as_ref()],
        bump,
        mint::decimals = 6,
        mint::authority = fund,
    )]
    pub share_mint: Account<'info, Mint>,

    #[account(
        init,
        payer = admin,
        seeds = [FUND_VAULT_SEED, fund_id.as_ref()],
        bump,
        token::mint = quote_mint,
        token::authority = fund,
    )]
    pub fund_vault: Account<'info, TokenAccount>,

    /// Program-owned bucket for fee shares minted but not yet paid out
    #[account(
        init,
        payer = admin,
        seeds = [OUTSTANDING_SHARES_SEED, fund_id.as_ref()],
        bump,
        token::mint = share_mint,
        token::authority = fund,
    )]
    pub outstanding_share_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}

pub fn handler(
    ctx: Context<InitializeFund>,
    fund_id: [u8; 32],
    params: InitializeFundParams,
) -> Result<()> {
    let clock = Clock::get()?;
    let fund = &mut ctx.accounts.fund;

    fund.fund_id = fund_id;
    fund.admin = ctx.accounts.admin.key();
    fund.controller = params.controller;
    fund.fee_recipient = params.fee_recipient;
    fund.quote_mint = ctx.accounts.quote_mint.key();
    fund.share_mint = ctx.accounts.share_mint.key();
    fund.fund_vault = ctx.accounts.fund_vault.key();
    fund.outstanding_shares_account = ctx.accounts.outstanding_share_account.key();
    fund.total_shares = 0;
    fund.shares_outstanding_total = 0;
    fund.fee_order = [0u8; MAX_ENABLED_FEES];
    fund.fee_count = 0;
    fund.created_at = clock.unix_timestamp;
    fund.bump = ctx.bumps.fund;
    fund._reserved = [0u8; 32];

    emit!(FundInitialized {
        fund: ctx.accounts.fund.key(),
        fund_id,
        admin: ctx.accounts.admin.key(),
        controller: params.controller,
        fee_recipient: params.fee_recipient,
        quote_mint: ctx.accounts.quote_mint.key(),
        share_mint: ctx.accounts.share_mint.key(),
        timestamp: clock.unix_timestamp,
    });

    Ok(())
}
