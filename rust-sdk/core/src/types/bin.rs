//
// Copyright (c) Cryptic Dot
//
// Licensed under FusionAMM SDK Source-Available License v1.0
// See the LICENSE file in the project root for license information.
//
use crate::{VolatilityParameters, VolatilityState};

/// A populated liquidity bin. Bins passed to a simulation must be sorted by `bin_id`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BinFacade {
    pub bin_id: u32,
    pub reserve_x: u64,
    pub reserve_y: u64,
    /// Q64.64 price of x in y, derived from the id when absent.
    pub price: Option<u128>,
    pub total_supply: u128,
    pub fee_growth_x: u128,
    pub fee_growth_y: u128,
}

impl BinFacade {
    pub fn new(bin_id: u32, reserve_x: u64, reserve_y: u64) -> Self {
        Self {
            bin_id,
            reserve_x,
            reserve_y,
            ..Self::default()
        }
    }

    /// Reserve handed out by a swap in the given direction.
    pub fn reserve_out(&self, swap_for_y: bool) -> u64 {
        if swap_for_y {
            self.reserve_y
        } else {
            self.reserve_x
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DlmmFeeParameters {
    pub base_factor: u16,
    pub filter_period: u16,
    pub decay_period: u16,
    pub reduction_factor: u16,
    pub variable_fee_control: u32,
    pub max_volatility_accumulator: u32,
    pub protocol_share: u16,
}

impl DlmmFeeParameters {
    pub fn volatility_parameters(&self) -> VolatilityParameters {
        VolatilityParameters {
            filter_period: self.filter_period,
            decay_period: self.decay_period,
            reduction_factor: self.reduction_factor,
            max_volatility_accumulator: self.max_volatility_accumulator,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PairFacade {
    pub active_id: u32,
    pub bin_step: u16,
    pub parameters: DlmmFeeParameters,
    pub volatility: VolatilityState,
}
