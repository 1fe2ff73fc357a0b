//
// Copyright (c) Cryptic Dot
//
// Licensed under FusionAMM SDK Source-Available License v1.0
// See the LICENSE file in the project root for license information.
//
use crate::VolatilityState;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExactInSwapQuote {
    pub token_in: u64,
    pub token_est_out: u64,
    pub token_min_out: u64,
    pub trade_fee: u64,
    pub is_exceeded: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExactOutSwapQuote {
    pub token_out: u64,
    pub token_est_in: u64,
    pub token_max_in: u64,
    pub trade_fee: u64,
    pub is_exceeded: bool,
}

/// One tick interval filled by the CLMM simulator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClmmStepResult {
    pub sqrt_price_start: u128,
    pub sqrt_price_end: u128,
    pub tick_index_end: i32,
    /// Liquidity active while the step was filled.
    pub liquidity: u128,
    /// Input consumed by the price move, excluding any input-side fee.
    pub amount_in: u64,
    /// Output delivered to the trader, net of any output-side fee.
    pub amount_out: u64,
    pub fee_amount: u64,
    pub fee_rate: u64,
    pub crossed_tick_index: Option<i32>,
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClmmSwapQuote {
    /// Total paid by the trader, including an input-side fee.
    pub amount_in: u64,
    /// Total received by the trader, net of an output-side fee.
    pub amount_out: u64,
    pub fee_amount: u64,
    pub base_fee_amount: u64,
    pub dynamic_fee_amount: u64,
    pub protocol_fee_amount: u64,
    /// `true` when fees are denominated in the input token.
    pub fee_on_input: bool,
    pub after_sqrt_price: u128,
    pub after_tick_index: i32,
    pub after_liquidity: u128,
    /// The requested amount could not be fully filled with the supplied ticks or step budget.
    pub is_exceeded: bool,
    pub price_impact_bps: u32,
    pub step_results: Vec<ClmmStepResult>,
    /// Pool volatility after the simulated swap.
    pub volatility: VolatilityState,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BinSwapTermination {
    #[default]
    Filled,
    /// No further bin with output reserve in the swap direction.
    InsufficientLiquidity,
    IterationCapExceeded,
}

/// One bin touched by the DLMM simulator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BinStepResult {
    pub bin_id: u32,
    pub price: u128,
    /// Input taken by the bin, fee included.
    pub amount_in: u64,
    pub amount_out: u64,
    pub fee_amount: u64,
    pub fee_rate: u64,
    /// The bin's output reserve was fully consumed.
    pub drained: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DlmmSwapQuote {
    /// Total paid by the trader, fee included.
    pub amount_in: u64,
    pub amount_out: u64,
    /// Unfilled part of the requested amount (input for exact-in, output for exact-out).
    pub amount_left: u64,
    /// Always denominated in the input token.
    pub fee_amount: u64,
    pub base_fee_amount: u64,
    pub dynamic_fee_amount: u64,
    pub protocol_fee_amount: u64,
    pub after_bin_id: u32,
    pub after_price: u128,
    pub is_exceeded: bool,
    pub termination: BinSwapTermination,
    pub price_impact_bps: u32,
    pub bin_results: Vec<BinStepResult>,
    /// Pair volatility after the simulated swap.
    pub volatility: VolatilityState,
}
