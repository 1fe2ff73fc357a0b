//
// Copyright (c) Cryptic Dot
//
// Licensed under FusionAMM SDK Source-Available License v1.0
// See the LICENSE file in the project root for license information.
//
use crate::{
    pow_q64, try_mul_div, try_mul_shr, ClmmPoolFacade, CoreError, FeeRates, FeeSchedulerFacade, FeeSchedulerMode, BASE_FEE_MULTIPLIER,
    BASIS_POINT_MAX, MAX_TOTAL_FEE_RATE, ONE_Q64, Q64_RESOLUTION, VARIABLE_FEE_DENOMINATOR,
};

/// Static fee rate of a pool or pair: `base_factor * step * 10`.
///
/// `step` is the tick spacing of a CLMM pool or the bin step of a DLMM pair.
pub fn get_static_fee_rate(base_factor: u16, step: u16) -> u64 {
    base_factor as u64 * step as u64 * BASE_FEE_MULTIPLIER
}

/// Variable fee rate for a volatility accumulator: `ceil((acc * step)^2 * variable_fee_control / 100)`.
///
/// Saturates at `u64::MAX`; the total fee is capped afterwards anyway.
pub fn get_variable_fee_rate(volatility_accumulator: u32, step: u16, variable_fee_control: u32) -> u64 {
    if variable_fee_control == 0 {
        return 0;
    }
    let volatility = volatility_accumulator as u128 * step as u128;
    let variable_fee = (volatility * volatility * variable_fee_control as u128).div_ceil(VARIABLE_FEE_DENOMINATOR);
    u64::try_from(variable_fee).unwrap_or(u64::MAX)
}

/// Combine a base and a variable fee rate, capped at [MAX_TOTAL_FEE_RATE].
pub fn get_total_fee_rate(base_fee_rate: u64, variable_fee_rate: u64) -> u64 {
    base_fee_rate.saturating_add(variable_fee_rate).min(MAX_TOTAL_FEE_RATE)
}

/// Base fee of a scheduled pool at `timestamp` (milliseconds).
///
/// Before activation, with the scheduler disabled, and once every period has elapsed,
/// the static fee rate applies.
pub fn try_get_scheduled_base_fee_rate(scheduler: &FeeSchedulerFacade, static_fee_rate: u64, timestamp: u64) -> Result<u64, CoreError> {
    if !scheduler.enabled || timestamp < scheduler.activation_timestamp {
        return Ok(static_fee_rate);
    }
    if scheduler.period_frequency == 0 {
        return Err(CoreError::DivisionByZero);
    }

    let number_of_period = scheduler.number_of_period as u64;
    let period = ((timestamp - scheduler.activation_timestamp) / scheduler.period_frequency).min(number_of_period);
    if period == number_of_period {
        return Ok(static_fee_rate);
    }

    match scheduler.mode {
        FeeSchedulerMode::Linear => {
            let reduction = scheduler
                .reduction_factor
                .checked_mul(period)
                .ok_or(CoreError::ArithmeticOverflow)?;
            scheduler
                .cliff_fee_numerator
                .checked_sub(reduction)
                .ok_or(CoreError::ArithmeticOverflow)
        }
        FeeSchedulerMode::Exponential => {
            let reduction_x64 = ((scheduler.reduction_factor as u128) << Q64_RESOLUTION) / BASIS_POINT_MAX as u128;
            let base = ONE_Q64.checked_sub(reduction_x64).ok_or(CoreError::ArithmeticOverflow)?;
            // period < number_of_period <= u16::MAX
            let factor = pow_q64(base, period as i32).ok_or(CoreError::ArithmeticOverflow)?;
            let fee = try_mul_shr(scheduler.cliff_fee_numerator as u128, factor, Q64_RESOLUTION, false)?;
            u64::try_from(fee).map_err(|_| CoreError::ArithmeticOverflow)
        }
    }
}

/// Fee rates of a CLMM pool at `timestamp` (milliseconds) for a given volatility accumulator.
///
/// # Parameters
/// - `pool` - The pool snapshot
/// - `volatility_accumulator` - The accumulator after the latest update
/// - `timestamp` - Current unix time in milliseconds
///
/// # Returns
/// - `FeeRates`: base, variable and capped total fee rate
pub fn try_get_clmm_fee_rates(pool: &ClmmPoolFacade, volatility_accumulator: u32, timestamp: u64) -> Result<FeeRates, CoreError> {
    let fee_parameters = &pool.fee_parameters;
    let static_fee_rate = get_static_fee_rate(fee_parameters.base_factor, pool.tick_spacing);
    let base_fee_rate = try_get_scheduled_base_fee_rate(&fee_parameters.fee_scheduler, static_fee_rate, timestamp)?;

    let dynamic_fee = &fee_parameters.dynamic_fee;
    let variable_fee_rate = if dynamic_fee.enabled {
        get_variable_fee_rate(volatility_accumulator, pool.tick_spacing, dynamic_fee.variable_fee_control)
    } else {
        0
    };

    Ok(FeeRates {
        base_fee_rate,
        variable_fee_rate,
        total_fee_rate: get_total_fee_rate(base_fee_rate, variable_fee_rate),
    })
}

/// Split a collected fee into its base and dynamic parts, proportionally to the rates.
///
/// # Returns
/// - `(u64, u64)`: base part (rounded down) and dynamic part
pub fn try_split_fee_amount(fee_amount: u64, fee_rates: &FeeRates) -> Result<(u64, u64), CoreError> {
    let rate_sum = fee_rates.base_fee_rate as u128 + fee_rates.variable_fee_rate as u128;
    if rate_sum == 0 {
        return Ok((fee_amount, 0));
    }
    let base_fee_amount = try_mul_div(fee_amount, fee_rates.base_fee_rate as u128, rate_sum, false)?;
    Ok((base_fee_amount, fee_amount - base_fee_amount))
}

/// Protocol's part of a collected fee: `fee_amount * protocol_share / 10_000`.
pub fn try_get_protocol_fee_amount(fee_amount: u64, protocol_share: u16) -> Result<u64, CoreError> {
    if protocol_share as u64 > BASIS_POINT_MAX {
        return Err(CoreError::InvalidFeeRate);
    }
    try_mul_div(fee_amount, protocol_share as u128, BASIS_POINT_MAX as u128, false)
}
