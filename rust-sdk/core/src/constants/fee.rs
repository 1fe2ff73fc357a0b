//
// Copyright (c) Cryptic Dot
//
// Licensed under FusionAMM SDK Source-Available License v1.0
// See the LICENSE file in the project root for license information.
//

/// Fee rates are expressed in parts per this value.
pub const FEE_RATE_PRECISION: u64 = 1_000_000_000;

/// Protocol-wide ceiling for base + variable fee (50%).
pub const MAX_TOTAL_FEE_RATE: u64 = 500_000_000;

/// Denominator of reduction factors and protocol shares.
pub const BASIS_POINT_MAX: u64 = 10_000;

/// Static fee rate is `base_factor * step * BASE_FEE_MULTIPLIER`.
pub const BASE_FEE_MULTIPLIER: u64 = 10;

/// Volatility added to the accumulator for every step of distance from the reference id.
pub const VOLATILITY_ACCUMULATOR_SCALE: u64 = 10;

/// Denominator of the squared variable fee term.
pub const VARIABLE_FEE_DENOMINATOR: u128 = 100;

pub const MAX_SLIPPAGE_TOLERANCE_BPS: u16 = 10_000;
