//
// Copyright (c) Cryptic Dot
//
// Licensed under FusionAMM SDK Source-Available License v1.0
// See the LICENSE file in the project root for license information.
//
use crate::VolatilityParameters;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FeeSchedulerMode {
    #[default]
    Linear,
    Exponential,
}

/// Time based decay from `cliff_fee_numerator` toward the static fee.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeeSchedulerFacade {
    pub enabled: bool,
    pub cliff_fee_numerator: u64,
    pub number_of_period: u16,
    /// Length of one period in milliseconds.
    pub period_frequency: u64,
    /// Absolute decrement per period in linear mode, basis points per period in exponential mode.
    pub reduction_factor: u64,
    pub mode: FeeSchedulerMode,
    /// Unix timestamp in milliseconds.
    pub activation_timestamp: u64,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DynamicFeeFacade {
    pub enabled: bool,
    pub filter_period: u16,
    pub decay_period: u16,
    pub reduction_factor: u16,
    pub variable_fee_control: u32,
    pub max_volatility_accumulator: u32,
}

impl DynamicFeeFacade {
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
pub struct ClmmFeeParameters {
    pub base_factor: u16,
    /// Basis points of every collected fee that goes to the protocol.
    pub protocol_share: u16,
    pub fee_scheduler: FeeSchedulerFacade,
    pub dynamic_fee: DynamicFeeFacade,
}

/// Fee rates in parts per [crate::FEE_RATE_PRECISION].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeeRates {
    pub base_fee_rate: u64,
    pub variable_fee_rate: u64,
    pub total_fee_rate: u64,
}
