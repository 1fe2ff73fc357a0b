//
// Copyright (c) Cryptic Dot
//
// Licensed under FusionAMM SDK Source-Available License v1.0
// See the LICENSE file in the project root for license information.
//
use crate::{CoreError, MAX_SLIPPAGE_TOLERANCE_BPS};
use std::{error::Error, sync::Mutex};

/// The default number of tick intervals a CLMM quote may walk.
pub const DEFAULT_CLMM_MAX_SWAP_STEPS: usize = 40;

/// The currently selected number of tick intervals a CLMM quote may walk.
pub static CLMM_MAX_SWAP_STEPS: Mutex<usize> = Mutex::new(DEFAULT_CLMM_MAX_SWAP_STEPS);

/// Sets the number of tick intervals a CLMM quote may walk.
pub fn set_clmm_max_swap_steps(steps: usize) -> Result<(), Box<dyn Error>> {
    *CLMM_MAX_SWAP_STEPS.try_lock()? = steps;
    Ok(())
}

/// The default number of bins a DLMM quote may visit.
pub const DEFAULT_DLMM_MAX_BIN_ITERATIONS: usize = 70;

/// The currently selected number of bins a DLMM quote may visit.
pub static DLMM_MAX_BIN_ITERATIONS: Mutex<usize> = Mutex::new(DEFAULT_DLMM_MAX_BIN_ITERATIONS);

/// Sets the number of bins a DLMM quote may visit.
pub fn set_dlmm_max_bin_iterations(iterations: usize) -> Result<(), Box<dyn Error>> {
    *DLMM_MAX_BIN_ITERATIONS.try_lock()? = iterations;
    Ok(())
}

/// The default slippage tolerance, expressed in basis points. Value of 100 is equivalent to 1%.
pub const DEFAULT_SLIPPAGE_TOLERANCE_BPS: u16 = 100;

/// The currently selected slippage tolerance, expressed in basis points.
pub static SLIPPAGE_TOLERANCE_BPS: Mutex<u16> = Mutex::new(DEFAULT_SLIPPAGE_TOLERANCE_BPS);

/// Sets the currently selected slippage tolerance, expressed in basis points.
pub fn set_slippage_tolerance_bps(tolerance: u16) -> Result<(), Box<dyn Error>> {
    if tolerance > MAX_SLIPPAGE_TOLERANCE_BPS {
        return Err(CoreError::InvalidSlippageTolerance.into());
    }
    *SLIPPAGE_TOLERANCE_BPS.try_lock()? = tolerance;
    Ok(())
}

/// Resets the configuration to its default values.
pub fn reset_configuration() -> Result<(), Box<dyn Error>> {
    *CLMM_MAX_SWAP_STEPS.try_lock()? = DEFAULT_CLMM_MAX_SWAP_STEPS;
    *DLMM_MAX_BIN_ITERATIONS.try_lock()? = DEFAULT_DLMM_MAX_BIN_ITERATIONS;
    *SLIPPAGE_TOLERANCE_BPS.try_lock()? = DEFAULT_SLIPPAGE_TOLERANCE_BPS;
    Ok(())
}

// Readers block instead of failing so that quotes running on several threads never
// trip over each other. A poisoned value falls back to its default.
fn read_setting<T: Copy>(setting: &Mutex<T>, default: T) -> T {
    setting.lock().map_or(default, |value| *value)
}

pub(crate) fn clmm_max_swap_steps() -> usize {
    read_setting(&CLMM_MAX_SWAP_STEPS, DEFAULT_CLMM_MAX_SWAP_STEPS)
}

pub(crate) fn dlmm_max_bin_iterations() -> usize {
    read_setting(&DLMM_MAX_BIN_ITERATIONS, DEFAULT_DLMM_MAX_BIN_ITERATIONS)
}

pub(crate) fn slippage_tolerance_bps() -> u16 {
    read_setting(&SLIPPAGE_TOLERANCE_BPS, DEFAULT_SLIPPAGE_TOLERANCE_BPS)
}
