//
// Copyright (c) Cryptic Dot
//
// Licensed under FusionAMM SDK Source-Available License v1.0
// See the LICENSE file in the project root for license information.
//

mod clmm_swap;
mod dlmm_swap;
mod route;

pub use clmm_swap::*;
pub use dlmm_swap::*;
pub use route::*;
