//
// Copyright (c) Cryptic Dot
//
// Licensed under FusionAMM SDK Source-Available License v1.0
// See the LICENSE file in the project root for license information.
//

/// Volatility bookkeeping carried by a pool or pair between swaps.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VolatilityState {
    pub volatility_accumulator: u32,
    pub volatility_reference: u32,
    /// Tick index (CLMM) or bin id (DLMM) the accumulator is measured from.
    pub id_reference: i32,
    /// Unix timestamp in seconds.
    pub time_of_last_update: u64,
}

/// Static configuration of a volatility tracker. Periods are in seconds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VolatilityParameters {
    pub filter_period: u16,
    pub decay_period: u16,
    /// Basis points of the accumulator kept as the new reference.
    pub reduction_factor: u16,
    pub max_volatility_accumulator: u32,
}
