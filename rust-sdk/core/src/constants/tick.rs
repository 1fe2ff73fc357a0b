//
// Copyright (c) Cryptic Dot
//
// Licensed under FusionAMM SDK Source-Available License v1.0
// See the LICENSE file in the project root for license information.
//

/// The minimum tick index.
pub const MIN_TICK_INDEX: i32 = -443636;

/// The maximum tick index.
pub const MAX_TICK_INDEX: i32 = 443636;

/// Sqrt price (Q64.64) at [MIN_TICK_INDEX].
pub const MIN_SQRT_PRICE: u128 = 4295048016;

/// Sqrt price (Q64.64) at [MAX_TICK_INDEX].
pub const MAX_SQRT_PRICE: u128 = 79226673515401279992447579055;

/// Largest tick spacing a pool may be configured with.
pub const MAX_TICK_SPACING: u16 = 32768; // 2^15
