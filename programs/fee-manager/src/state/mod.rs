pub mod fee_ledger;
pub mod fund;

pub use fee_ledger::*;
pub use fund::*;
