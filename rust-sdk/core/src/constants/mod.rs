//
// Copyright (c) Cryptic Dot
//
// Licensed under FusionAMM SDK Source-Available License v1.0
// See the LICENSE file in the project root for license information.
//

mod bin;
mod error;
mod fee;
mod tick;

pub use bin::*;
pub use error::*;
pub use fee::*;
pub use tick::*;
