//
// Copyright (c) Cryptic Dot
//
// Licensed under FusionAMM SDK Source-Available License v1.0
// See the LICENSE file in the project root for license information.
//

use thiserror::Error;

/// Every failure the engine can report. Running out of liquidity or hitting an
/// iteration cap is not an error: those outcomes are fields of the quote.
#[derive(Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid tick index")]
    InvalidTick,

    #[error("Sqrt price out of bounds")]
    InvalidSqrtPrice,

    #[error("Invalid bin id")]
    InvalidBinId,

    #[error("Invalid bin step")]
    InvalidBinStep,

    #[error("Invalid tick spacing")]
    InvalidTickSpacing,

    #[error("Arithmetic over- or underflow")]
    ArithmeticOverflow,

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Amount exceeds max u64")]
    AmountExceedsMaxU64,

    #[error("Zero tradable amount")]
    ZeroTradableAmount,

    #[error("Invalid fee rate")]
    InvalidFeeRate,

    #[error("Invalid timestamp")]
    InvalidTimestamp,

    #[error("Ticks are not strictly increasing or not aligned to the tick spacing")]
    InvalidTickSequence,

    #[error("Bins are not strictly increasing by id and price")]
    InvalidBinSequence,

    #[error("Current tick index does not match the current sqrt price")]
    TickIndexMismatch,

    #[error("Invalid slippage tolerance")]
    InvalidSlippageTolerance,
}
