pub mod buy_shares;
pub mod configure_fee;
pub mod dispatch_hook;
pub mod initialize_fund;
pub mod payout_outstanding;
pub mod redeem_shares;

pub use buy_shares::*;
pub use configure_fee::*;
pub use dispatch_hook::*;
pub use initialize_fund::*;
pub use payout_outstanding::*;
pub use redeem_shares::*;
