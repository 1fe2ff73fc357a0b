//
// Copyright (c) Cryptic Dot
//
// Licensed under FusionAMM SDK Source-Available License v1.0
// See the LICENSE file in the project root for license information.
//
use crate::{ClmmFeeParameters, VolatilityState};

/// Which token the pool takes its swap fee in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CollectFeeMode {
    /// Fee is always taken from the output token.
    #[default]
    OnBoth,
    /// Fee is always taken in the quote token, on whichever side of the trade it is.
    OnQuote,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClmmPoolFacade {
    pub tick_spacing: u16,
    pub liquidity: u128,
    pub sqrt_price: u128,
    pub tick_current_index: i32,
    pub collect_fee_mode: CollectFeeMode,
    /// Token B (y) is the quote token.
    pub is_quote_y: bool,
    pub fee_parameters: ClmmFeeParameters,
    pub volatility: VolatilityState,
}

impl ClmmPoolFacade {
    /// Whether the fee of a swap in the given direction is taken from the input token.
    pub fn collect_fee_on_input(&self, a_to_b: bool) -> bool {
        match self.collect_fee_mode {
            CollectFeeMode::OnBoth => false,
            CollectFeeMode::OnQuote => a_to_b != self.is_quote_y,
        }
    }
}
