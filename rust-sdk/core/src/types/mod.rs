//
// Copyright (c) Cryptic Dot
//
// Licensed under FusionAMM SDK Source-Available License v1.0
// See the LICENSE file in the project root for license information.
//
mod bin;
mod fees;
mod pool;
mod swap;
mod tick;
mod volatility;

pub use bin::*;
pub use fees::*;
pub use pool::*;
pub use swap::*;
pub use tick::*;
pub use volatility::*;
