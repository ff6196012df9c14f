use anchor_lang::prelude::*;

#[error_code]
pub enum ErrorCode {
    // General
    #[msg("Math overflow")]
    MathOverflow,
    #[msg("Math underflow")]
    MathUnderflow,
    #[msg("Division by zero")]
    DivisionByZero,
    #[msg("Invalid amount: must be greater than zero")]
    InvalidAmount,
    #[msg("Invalid parameter")]
    InvalidParameter,
    #[msg("Unauthorized: signer may not perform this operation")]
    Unauthorized,

    // Rate conversion
    #[msg("Annual rate exceeds the supported ceiling")]
    RateOutOfRange,

    // Fee configuration
    #[msg("Fee already configured for this fund")]
    AlreadyConfigured,
    #[msg("Fee exceeds maximum allowed")]
    FeeExceedsMaximum,
    #[msg("Unknown fee kind")]
    UnknownFeeKind,
    #[msg("Fee ledger account missing for an enabled fee")]
    MissingFeeLedger,
    #[msg("Fee registration limit reached")]
    TooManyFees,

    // Settlement
    #[msg("Settlement timestamp precedes last settlement")]
    NotMonotonic,
    #[msg("Shares outstanding bucket underflow")]
    OutstandingUnderflow,

    // Fund shares
    #[msg("Insufficient share balance")]
    InsufficientShares,
    #[msg("Insufficient fund liquidity for redemption")]
    InsufficientFundLiquidity,
}
