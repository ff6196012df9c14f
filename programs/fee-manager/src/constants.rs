use anchor_lang::prelude::*;

// PDA Seeds
#[constant]
pub const FUND_SEED: &[u8] = b"fund";
#[constant]
pub const FUND_VAULT_SEED: &[u8] = b"fund_vault";
#[constant]
pub const SHARE_MINT_SEED: &[u8] = b"share_mint";
#[constant]
pub const FEE_LEDGER_SEED: &[u8] = b"fee_ledger";
#[constant]
pub const OUTSTANDING_SHARES_SEED: &[u8] = b"outstanding_shares";

// WAD precision (1e18) for fixed-point math
pub const WAD: u128 = 1_000_000_000_000_000_000;

// RAY precision (1e27) for per-second growth factors
pub const RAY: u128 = 1_000_000_000_000_000_000_000_000_000;

// Scale difference between RAY and WAD
pub const WAD_TO_RAY: u128 = 1_000_000_000;

// Basis points denominator
pub const BPS_DENOMINATOR: u64 = 10_000;

// Accrual interval basis
pub const SECONDS_PER_YEAR: u64 = 31_536_000;

// Fee limits
pub const MAX_ANNUAL_RATE_WAD: u64 = 10_000_000_000_000_000_000; // 1000% per year
pub const MAX_PERFORMANCE_FEE_BPS: u64 = 3_000; // 30%

// Share pricing
pub const INITIAL_NAV_PER_SHARE: u128 = WAD; // 1.0

// Fee registration
pub const MAX_ENABLED_FEES: usize = 4;
