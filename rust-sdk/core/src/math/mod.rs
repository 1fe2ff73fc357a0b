//
// Copyright (c) Cryptic Dot
//
// Licensed under FusionAMM SDK Source-Available License v1.0
// See the LICENSE file in the project root for license information.
//

mod bin;
mod bin_sequence;
mod fee;
mod fixed_point;
mod tick;
mod tick_sequence;
mod token;
mod volatility;

#[cfg(feature = "floats")]
mod price;

pub use bin::*;
pub use bin_sequence::*;
pub use fee::*;
pub use fixed_point::*;
pub use tick::*;
pub use tick_sequence::*;
pub use token::*;
pub use volatility::*;

#[cfg(feature = "floats")]
pub use price::*;
