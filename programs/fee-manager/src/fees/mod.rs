use anchor_lang::prelude::*;

use crate::error::ErrorCode;
use crate::state::FeeLedger;

pub mod management;
pub mod performance;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum FeeKind {
    Management,
    Performance,
}

impl FeeKind {
    pub fn from_u8(raw: u8) -> Result<Self> {
        match raw {
            0 => Ok(FeeKind::Management),
            1 => Ok(FeeKind::Performance),
            _ => Err(ErrorCode::UnknownFeeKind.into()),
        }
    }
}

/// Trigger points a fee can declare, independently, for settlement and for
/// state refresh.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum Hook {
    Continuous,
    PreBuyShares,
    PostBuyShares,
    PreRedeemShares,
}

impl Hook {
    pub fn mask(self) -> u8 {
        1 << (self as u8)
    }
}

/// Whether settled shares go straight to the fee recipient or accumulate in
/// the outstanding bucket for deferred payout.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum SettlementPolicy {
    Direct,
    Outstanding,
}

impl SettlementPolicy {
    pub fn from_u8(raw: u8) -> Result<Self> {
        match raw {
            0 => Ok(SettlementPolicy::Direct),
            1 => Ok(SettlementPolicy::Outstanding),
            _ => Err(ErrorCode::InvalidParameter.into()),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SettlementKind {
    None,
    Mint,
    MintOutstanding,
    BurnOutstanding,
}

/// Transient settle result, applied to the share ledger by the dispatcher
/// within the same instruction.
#[derive(Clone, Copy, Debug)]
pub struct SettlementInstruction {
    pub kind: SettlementKind,
    pub shares_due: u64,
}

impl SettlementInstruction {
    pub fn none() -> Self {
        Self {
            kind: SettlementKind::None,
            shares_due: 0,
        }
    }
}

/// Settlement hook set each fee kind declares at configuration
pub fn default_settle_hooks(kind: FeeKind) -> u8 {
    match kind {
        FeeKind::Management | FeeKind::Performance => {
            Hook::Continuous.mask() | Hook::PreBuyShares.mask() | Hook::PreRedeemShares.mask()
        }
    }
}

/// Update-only hook set each fee kind declares at configuration
pub fn default_update_hooks(kind: FeeKind) -> u8 {
    match kind {
        FeeKind::Management => 0,
        FeeKind::Performance => Hook::PostBuyShares.mask(),
    }
}

pub fn settle_fee(
    kind: FeeKind,
    ledger: &mut FeeLedger,
    net_shares_supply: u64,
    nav_per_share: u128,
    now: i64,
) -> Result<SettlementInstruction> {
    match kind {
        FeeKind::Management => management::settle(ledger, net_shares_supply, now),
        FeeKind::Performance => performance::settle(ledger, net_shares_supply, nav_per_share, now),
    }
}

pub fn update_fee(
    kind: FeeKind,
    ledger: &mut FeeLedger,
    nav_per_share: u128,
    now: i64,
) -> Result<()> {
    match kind {
        FeeKind::Management => Ok(()),
        FeeKind::Performance => performance::update(ledger, nav_per_share, now),
    }
}
