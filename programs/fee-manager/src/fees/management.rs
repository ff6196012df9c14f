use anchor_lang::prelude::*;

use crate::fees::{SettlementInstruction, SettlementKind, SettlementPolicy};
use crate::math::accrual::shares_due;
use crate::state::FeeLedger;

/// Settle the time-based management accrual.
///
/// The very first settlement only stamps the clock: there is no retroactive
/// fee for time before the fee existed. Zero-due settlements still advance
/// `last_settled` so the next interval is measured from here.
pub fn settle(
    ledger: &mut FeeLedger,
    net_shares_supply: u64,
    now: i64,
) -> Result<SettlementInstruction> {
    if ledger.last_settled == 0 {
        ledger.record_settlement(now)?;
        return Ok(SettlementInstruction::none());
    }

    let elapsed = ledger.elapsed_since(now)?;
    let due = shares_due(ledger.scaled_per_second_rate, net_shares_supply, elapsed)?;
    ledger.record_settlement(now)?;

    if due == 0 {
        return Ok(SettlementInstruction::none());
    }

    let kind = match ledger.policy()? {
        SettlementPolicy::Direct => SettlementKind::Mint,
        SettlementPolicy::Outstanding => SettlementKind::MintOutstanding,
    };
    Ok(SettlementInstruction {
        kind,
        shares_due: due,
    })
}
