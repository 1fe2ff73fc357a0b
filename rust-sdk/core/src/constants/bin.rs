//
// Copyright (c) Cryptic Dot
//
// Licensed under FusionAMM SDK Source-Available License v1.0
// See the LICENSE file in the project root for license information.
//

/// Bin ids are 24-bit unsigned integers.
pub const MAX_BIN_ID: u32 = (1 << 24) - 1;

/// The bin id whose price is exactly 1.0.
pub const REAL_ID_SHIFT: u32 = 1 << 23;

/// Largest bin step, in basis points.
pub const MAX_BIN_STEP: u16 = 500;
