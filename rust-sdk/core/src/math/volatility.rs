//
// Copyright (c) Cryptic Dot
//
// Licensed under FusionAMM SDK Source-Available License v1.0
// See the LICENSE file in the project root for license information.
//
use crate::{CoreError, VolatilityParameters, VolatilityState, BASIS_POINT_MAX, VOLATILITY_ACCUMULATOR_SCALE};

/// Scratch copy of a pool's or pair's volatility state for the duration of one simulation.
///
/// The tracker owns its state by value, so a simulation never writes back into the
/// snapshot it was built from. The final state is handed back with the quote.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct VolatilityTracker {
    state: VolatilityState,
    parameters: VolatilityParameters,
    step_divisor: u32,
}

impl VolatilityTracker {
    /// # Parameters
    /// - `state` - The volatility state read from chain
    /// - `parameters` - Filter/decay periods, reduction factor and accumulator cap
    /// - `step_divisor` - Distance unit between ids: the tick spacing for CLMM, 1 for DLMM
    pub fn new(state: VolatilityState, parameters: VolatilityParameters, step_divisor: u16) -> Self {
        Self {
            state,
            parameters,
            step_divisor: step_divisor.max(1) as u32,
        }
    }

    pub fn state(&self) -> VolatilityState {
        self.state
    }

    pub fn volatility_accumulator(&self) -> u32 {
        self.state.volatility_accumulator
    }

    /// Age the references at the start of a swap.
    ///
    /// # Parameters
    /// - `active_id` - Tick index or bin id active before the swap
    /// - `timestamp` - Current unix time in seconds
    ///
    /// # Returns
    /// - [CoreError::InvalidTimestamp] if `timestamp` is older than the last update
    pub fn update_references(&mut self, active_id: i32, timestamp: u64) -> Result<(), CoreError> {
        let elapsed = timestamp
            .checked_sub(self.state.time_of_last_update)
            .ok_or(CoreError::InvalidTimestamp)?;

        if elapsed >= self.parameters.filter_period as u64 {
            self.state.id_reference = active_id;
            self.state.volatility_reference = if elapsed < self.parameters.decay_period as u64 {
                let reference = self.state.volatility_accumulator as u64 * self.parameters.reduction_factor as u64 / BASIS_POINT_MAX;
                u32::try_from(reference).unwrap_or(u32::MAX)
            } else {
                0
            };
        }

        self.state.time_of_last_update = timestamp;
        Ok(())
    }

    /// Recompute the accumulator for the id the swap has reached.
    ///
    /// # Returns
    /// - `u32`: The new volatility accumulator, bounded by `max_volatility_accumulator`
    pub fn update_accumulator(&mut self, active_id: i32) -> u32 {
        let distance = (active_id as i64 - self.state.id_reference as i64).unsigned_abs() / self.step_divisor as u64;
        let accumulator = (self.state.volatility_reference as u64)
            .saturating_add(distance.saturating_mul(VOLATILITY_ACCUMULATOR_SCALE))
            .min(self.parameters.max_volatility_accumulator as u64);
        // bounded by a u32 maximum
        self.state.volatility_accumulator = accumulator as u32;
        self.state.volatility_accumulator
    }
}
