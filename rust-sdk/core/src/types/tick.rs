//
// Copyright (c) Cryptic Dot
//
// Licensed under FusionAMM SDK Source-Available License v1.0
// See the LICENSE file in the project root for license information.
//
use crate::{tick_index_to_sqrt_price, CoreError};

/// An initialized tick as read from chain. Ticks passed to a simulation must be sorted by `index`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickFacade {
    pub index: i32,
    /// Q64.64 sqrt price at `index`, derived from the index when absent.
    pub sqrt_price: Option<u128>,
    /// Liquidity added when the tick is crossed left to right.
    pub liquidity_net: i128,
}

impl TickFacade {
    pub fn new(index: i32, liquidity_net: i128) -> Self {
        Self {
            index,
            sqrt_price: None,
            liquidity_net,
        }
    }

    pub fn try_sqrt_price(&self) -> Result<u128, CoreError> {
        match self.sqrt_price {
            Some(sqrt_price) => Ok(sqrt_price),
            None => tick_index_to_sqrt_price(self.index),
        }
    }
}
