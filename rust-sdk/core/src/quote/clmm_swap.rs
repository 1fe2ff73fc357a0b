//
// Copyright (c) Cryptic Dot
//
// Modification based on Orca Whirlpools (https://github.com/orca-so/whirlpools),
// originally licensed under the Apache License, Version 2.0, prior to February 26, 2025.
//
// Modifications licensed under FusionAMM SDK Source-Available License v1.0
// See the LICENSE file in the project root for license information.
//
use crate::{
    get_price_impact_bps, is_tick_index_consistent, sqrt_price_to_tick_index, try_apply_swap_fee, try_get_amount_delta_a,
    try_get_amount_delta_b, try_get_clmm_fee_rates, try_get_fee_for_net_amount, try_get_fee_on_amount, try_get_max_amount_with_slippage_tolerance,
    try_get_min_amount_with_slippage_tolerance, try_get_next_liquidity, try_get_next_sqrt_price_from_a, try_get_next_sqrt_price_from_b,
    try_get_protocol_fee_amount, try_reverse_apply_swap_fee, try_split_fee_amount, ClmmPoolFacade, ClmmStepResult,
    ClmmSwapQuote, CoreError, ExactInSwapQuote, ExactOutSwapQuote, TickFacade, TickSequence, VolatilityTracker, MAX_SQRT_PRICE,
    MIN_SQRT_PRICE,
};
use crate::config;
use ethnum::U256;
use log::{debug, trace, warn};

/// Computes the exact input quote of a CLMM swap.
///
/// # Arguments
/// - `token_in`: The input token amount.
/// - `specified_token_a`: If `true`, the input token is token A. Otherwise, it is token B.
/// - `slippage_tolerance_bps`: The slippage tolerance in basis points, the configured default when `None`.
/// - `pool`: The pool state.
/// - `ticks`: The initialized ticks around the current price, sorted by index.
/// - `timestamp`: The current unix time in milliseconds.
///
/// # Returns
/// The exact input swap quote, with `is_exceeded` set when the input could not be fully used.
pub fn clmm_swap_quote_by_input_token(
    token_in: u64,
    specified_token_a: bool,
    slippage_tolerance_bps: Option<u16>,
    pool: &ClmmPoolFacade,
    ticks: &[TickFacade],
    timestamp: u64,
) -> Result<ExactInSwapQuote, CoreError> {
    let slippage_tolerance_bps = slippage_tolerance_bps.unwrap_or_else(config::slippage_tolerance_bps);
    let quote = simulate_clmm_swap(pool, ticks, token_in, specified_token_a, true, timestamp, config::clmm_max_swap_steps())?;
    let token_min_out = try_get_min_amount_with_slippage_tolerance(quote.amount_out, slippage_tolerance_bps)?;

    Ok(ExactInSwapQuote {
        token_in: quote.amount_in,
        token_est_out: quote.amount_out,
        token_min_out,
        trade_fee: quote.fee_amount,
        is_exceeded: quote.is_exceeded,
    })
}

/// Computes the exact output quote of a CLMM swap.
///
/// # Arguments
/// - `token_out`: The output token amount.
/// - `specified_token_a`: If `true`, the output token is token A. Otherwise, it is token B.
/// - `slippage_tolerance_bps`: The slippage tolerance in basis points, the configured default when `None`.
/// - `pool`: The pool state.
/// - `ticks`: The initialized ticks around the current price, sorted by index.
/// - `timestamp`: The current unix time in milliseconds.
///
/// # Returns
/// The exact output swap quote, with `is_exceeded` set when the output could not be fully bought.
pub fn clmm_swap_quote_by_output_token(
    token_out: u64,
    specified_token_a: bool,
    slippage_tolerance_bps: Option<u16>,
    pool: &ClmmPoolFacade,
    ticks: &[TickFacade],
    timestamp: u64,
) -> Result<ExactOutSwapQuote, CoreError> {
    let slippage_tolerance_bps = slippage_tolerance_bps.unwrap_or_else(config::slippage_tolerance_bps);
    let quote = simulate_clmm_swap(pool, ticks, token_out, !specified_token_a, false, timestamp, config::clmm_max_swap_steps())?;
    let token_max_in = try_get_max_amount_with_slippage_tolerance(quote.amount_in, slippage_tolerance_bps)?;

    Ok(ExactOutSwapQuote {
        token_out: quote.amount_out,
        token_est_in: quote.amount_in,
        token_max_in,
        trade_fee: quote.fee_amount,
        is_exceeded: quote.is_exceeded,
    })
}

/// Simulates a swap against a CLMM pool, walking the supplied initialized ticks.
///
/// # Arguments
/// - `pool`: The pool state. It is never modified; volatility is tracked on a copy and
///   returned in the quote.
/// - `ticks`: The initialized ticks, sorted by index.
/// - `amount`: The input amount when `specified_input`, the output amount otherwise.
/// - `a_to_b`: The direction of the swap.
/// - `specified_input`: Whether `amount` is the input or the output.
/// - `timestamp`: The current unix time in milliseconds.
/// - `max_swap_steps`: The number of tick intervals the swap may walk.
///
/// # Returns
/// The swap quote. Running out of ticks or steps is reported through `is_exceeded`.
pub fn simulate_clmm_swap(
    pool: &ClmmPoolFacade,
    ticks: &[TickFacade],
    amount: u64,
    a_to_b: bool,
    specified_input: bool,
    timestamp: u64,
    max_swap_steps: usize,
) -> Result<ClmmSwapQuote, CoreError> {
    if amount == 0 {
        return Err(CoreError::ZeroTradableAmount);
    }
    let tick_sequence = TickSequence::new(ticks, pool.tick_spacing)?;
    if !(MIN_SQRT_PRICE..=MAX_SQRT_PRICE).contains(&pool.sqrt_price) {
        return Err(CoreError::InvalidSqrtPrice);
    }
    if !is_tick_index_consistent(pool.tick_current_index, pool.sqrt_price)? {
        return Err(CoreError::TickIndexMismatch);
    }

    let fee_on_input = pool.collect_fee_on_input(a_to_b);
    let dynamic_fee = &pool.fee_parameters.dynamic_fee;
    let mut volatility_tracker = VolatilityTracker::new(pool.volatility, dynamic_fee.volatility_parameters(), pool.tick_spacing);
    if dynamic_fee.enabled {
        volatility_tracker.update_references(pool.tick_current_index, timestamp / 1000)?;
    }

    let mut amount_remaining = amount;
    let mut amount_in = 0u64;
    let mut amount_out = 0u64;
    let mut fee_amount = 0u64;
    let mut base_fee_amount = 0u64;
    let mut dynamic_fee_amount = 0u64;
    let mut current_sqrt_price = pool.sqrt_price;
    let mut current_tick_index = pool.tick_current_index;
    let mut current_liquidity = pool.liquidity;
    let mut step_results: Vec<ClmmStepResult> = Vec::new();
    let mut is_exceeded = false;

    while amount_remaining > 0 {
        if step_results.len() >= max_swap_steps {
            warn!(target: "log", "CLMM swap stopped after {} steps with {} left", step_results.len(), amount_remaining);
            is_exceeded = true;
            break;
        }

        let next_tick = if a_to_b {
            tick_sequence.prev_initialized_tick(current_tick_index)
        } else {
            tick_sequence.next_initialized_tick(current_tick_index)
        };
        let Some((next_tick, next_tick_sqrt_price)) = next_tick else {
            is_exceeded = true;
            break;
        };

        let volatility_accumulator = if dynamic_fee.enabled {
            volatility_tracker.update_accumulator(current_tick_index)
        } else {
            volatility_tracker.volatility_accumulator()
        };
        let fee_rates = try_get_clmm_fee_rates(pool, volatility_accumulator, timestamp)?;

        let step_quote = compute_swap_step(
            amount_remaining,
            fee_rates.total_fee_rate,
            current_liquidity,
            current_sqrt_price,
            next_tick_sqrt_price,
            a_to_b,
            specified_input,
            fee_on_input,
        )?;

        let step_amount_in = if fee_on_input {
            step_quote.amount_in.checked_add(step_quote.fee_amount).ok_or(CoreError::ArithmeticOverflow)?
        } else {
            step_quote.amount_in
        };
        amount_remaining = if specified_input {
            amount_remaining.checked_sub(step_amount_in)
        } else {
            amount_remaining.checked_sub(step_quote.amount_out)
        }
        .ok_or(CoreError::ArithmeticOverflow)?;
        amount_in = amount_in.checked_add(step_amount_in).ok_or(CoreError::ArithmeticOverflow)?;
        amount_out = amount_out.checked_add(step_quote.amount_out).ok_or(CoreError::ArithmeticOverflow)?;
        fee_amount = fee_amount.checked_add(step_quote.fee_amount).ok_or(CoreError::ArithmeticOverflow)?;

        let (step_base_fee, step_dynamic_fee) = try_split_fee_amount(step_quote.fee_amount, &fee_rates)?;
        base_fee_amount += step_base_fee;
        dynamic_fee_amount += step_dynamic_fee;

        let step_liquidity = current_liquidity;
        let mut crossed_tick_index = None;
        if step_quote.next_sqrt_price == next_tick_sqrt_price {
            current_liquidity = try_get_next_liquidity(current_liquidity, next_tick.liquidity_net, a_to_b)?;
            current_tick_index = if a_to_b { next_tick.index - 1 } else { next_tick.index };
            crossed_tick_index = Some(next_tick.index);
        } else if step_quote.next_sqrt_price != current_sqrt_price {
            current_tick_index = sqrt_price_to_tick_index(step_quote.next_sqrt_price)?;
        }

        trace!(
            target: "log",
            "CLMM step {}: sqrt price {} -> {}, in {}, out {}, fee {} at rate {}",
            step_results.len(),
            current_sqrt_price,
            step_quote.next_sqrt_price,
            step_quote.amount_in,
            step_quote.amount_out,
            step_quote.fee_amount,
            fee_rates.total_fee_rate
        );

        step_results.push(ClmmStepResult {
            sqrt_price_start: current_sqrt_price,
            sqrt_price_end: step_quote.next_sqrt_price,
            tick_index_end: current_tick_index,
            liquidity: step_liquidity,
            amount_in: step_quote.amount_in,
            amount_out: step_quote.amount_out,
            fee_amount: step_quote.fee_amount,
            fee_rate: fee_rates.total_fee_rate,
            crossed_tick_index,
        });

        current_sqrt_price = step_quote.next_sqrt_price;
    }

    let protocol_fee_amount = try_get_protocol_fee_amount(fee_amount, pool.fee_parameters.protocol_share)?;
    let price_impact_bps = get_price_impact_bps(get_spot_amount_out(amount_in, pool.sqrt_price, a_to_b), amount_out);

    debug!(
        target: "log",
        "CLMM swap a_to_b={} specified_input={} amount={}: in {}, out {}, fee {}, steps {}, exceeded {}",
        a_to_b,
        specified_input,
        amount,
        amount_in,
        amount_out,
        fee_amount,
        step_results.len(),
        is_exceeded
    );

    Ok(ClmmSwapQuote {
        amount_in,
        amount_out,
        fee_amount,
        base_fee_amount,
        dynamic_fee_amount,
        protocol_fee_amount,
        fee_on_input,
        after_sqrt_price: current_sqrt_price,
        after_tick_index: current_tick_index,
        after_liquidity: current_liquidity,
        is_exceeded,
        price_impact_bps,
        step_results,
        volatility: volatility_tracker.state(),
    })
}

// Private functions

#[derive(PartialEq, Debug, Default)]
struct SwapStepQuote {
    amount_in: u64,
    amount_out: u64,
    next_sqrt_price: u128,
    fee_amount: u64,
}

#[allow(clippy::too_many_arguments)]
fn compute_swap_step(
    amount_remaining: u64,
    fee_rate: u64,
    current_liquidity: u128,
    current_sqrt_price: u128,
    target_sqrt_price: u128,
    a_to_b: bool,
    specified_input: bool,
    fee_on_input: bool,
) -> Result<SwapStepQuote, CoreError> {
    // The part of the remaining amount that may move the price
    let amount_calculated = match (specified_input, fee_on_input) {
        (true, true) => try_apply_swap_fee(amount_remaining, fee_rate)?,
        (false, false) => match try_reverse_apply_swap_fee(amount_remaining, fee_rate) {
            Err(CoreError::AmountExceedsMaxU64) => u64::MAX,
            result => result?,
        },
        _ => amount_remaining,
    };

    // Any error that is not AmountExceedsMaxU64 is not recoverable
    let initial_amount_fixed_delta = try_get_amount_fixed_delta(current_sqrt_price, target_sqrt_price, current_liquidity, a_to_b, specified_input);
    let is_initial_amount_fixed_overflow = initial_amount_fixed_delta == Err(CoreError::AmountExceedsMaxU64);

    let next_sqrt_price = if !is_initial_amount_fixed_overflow && initial_amount_fixed_delta? <= amount_calculated {
        target_sqrt_price
    } else {
        try_get_next_sqrt_price(current_sqrt_price, current_liquidity, amount_calculated, a_to_b, specified_input)?
    };

    let is_max_swap = next_sqrt_price == target_sqrt_price;

    let amount_unfixed_delta = try_get_amount_unfixed_delta(current_sqrt_price, next_sqrt_price, current_liquidity, a_to_b, specified_input)?;

    // If the swap is not at the max, we need to readjust the amount of the fixed token we are using
    let amount_fixed_delta = if !is_max_swap || is_initial_amount_fixed_overflow {
        try_get_amount_fixed_delta(current_sqrt_price, next_sqrt_price, current_liquidity, a_to_b, specified_input)?
    } else {
        initial_amount_fixed_delta?
    };

    if fee_on_input {
        let (amount_in, mut amount_out) = if specified_input {
            (amount_fixed_delta, amount_unfixed_delta)
        } else {
            (amount_unfixed_delta, amount_fixed_delta)
        };

        // Cap output amount if using output
        if !specified_input && amount_out > amount_remaining {
            amount_out = amount_remaining;
        }

        let fee_amount = if specified_input && !is_max_swap {
            amount_remaining - amount_in
        } else {
            try_get_fee_for_net_amount(amount_in, fee_rate)?
        };

        return Ok(SwapStepQuote {
            amount_in,
            amount_out,
            next_sqrt_price,
            fee_amount,
        });
    }

    // Fee is taken from the output: a partial exact-in step spends the whole remainder,
    // an exact-out step never hands out more than was asked for
    let (amount_in, gross_amount_out) = if specified_input {
        let amount_in = if is_max_swap { amount_fixed_delta } else { amount_remaining };
        (amount_in, amount_unfixed_delta)
    } else {
        (amount_unfixed_delta, amount_fixed_delta.min(amount_calculated))
    };

    let mut amount_out = gross_amount_out - try_get_fee_on_amount(gross_amount_out, fee_rate)?;
    if !specified_input && amount_out > amount_remaining {
        amount_out = amount_remaining;
    }

    Ok(SwapStepQuote {
        amount_in,
        amount_out,
        next_sqrt_price,
        fee_amount: gross_amount_out - amount_out,
    })
}

fn try_get_amount_fixed_delta(
    current_sqrt_price: u128,
    target_sqrt_price: u128,
    current_liquidity: u128,
    a_to_b: bool,
    specified_input: bool,
) -> Result<u64, CoreError> {
    if a_to_b == specified_input {
        try_get_amount_delta_a(current_sqrt_price, target_sqrt_price, current_liquidity, specified_input)
    } else {
        try_get_amount_delta_b(current_sqrt_price, target_sqrt_price, current_liquidity, specified_input)
    }
}

fn try_get_amount_unfixed_delta(
    current_sqrt_price: u128,
    target_sqrt_price: u128,
    current_liquidity: u128,
    a_to_b: bool,
    specified_input: bool,
) -> Result<u64, CoreError> {
    if specified_input == a_to_b {
        try_get_amount_delta_b(current_sqrt_price, target_sqrt_price, current_liquidity, !specified_input)
    } else {
        try_get_amount_delta_a(current_sqrt_price, target_sqrt_price, current_liquidity, !specified_input)
    }
}

fn try_get_next_sqrt_price(
    current_sqrt_price: u128,
    current_liquidity: u128,
    amount_calculated: u64,
    a_to_b: bool,
    specified_input: bool,
) -> Result<u128, CoreError> {
    if specified_input == a_to_b {
        try_get_next_sqrt_price_from_a(current_sqrt_price, current_liquidity, amount_calculated, specified_input)
    } else {
        try_get_next_sqrt_price_from_b(current_sqrt_price, current_liquidity, amount_calculated, specified_input)
    }
}

/// Output the whole input would buy at the pre-trade price.
fn get_spot_amount_out(amount_in: u64, sqrt_price: u128, a_to_b: bool) -> u128 {
    let price_x128 = U256::from(sqrt_price) * U256::from(sqrt_price);
    let spot_amount_out = if a_to_b {
        (U256::from(amount_in) * price_x128) >> 128u32
    } else {
        (U256::from(amount_in) << 128u32) / price_x128
    };
    if spot_amount_out > U256::from(u128::MAX) {
        u128::MAX
    } else {
        spot_amount_out.as_u128()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{tick_index_to_sqrt_price, ClmmFeeParameters, CollectFeeMode, DynamicFeeFacade, FeeSchedulerFacade, FeeSchedulerMode, VolatilityState};
    use rstest::rstest;

    const ONE: u128 = 1 << 64;

    fn test_pool(sqrt_price: u128, sufficient_liq: bool, collect_fee_mode: CollectFeeMode) -> ClmmPoolFacade {
        let tick_current_index = sqrt_price_to_tick_index(sqrt_price).unwrap();
        let liquidity = if sufficient_liq { 100_000_000 } else { 265_000 };
        ClmmPoolFacade {
            tick_spacing: 10,
            liquidity,
            sqrt_price,
            tick_current_index,
            collect_fee_mode,
            is_quote_y: true,
            fee_parameters: ClmmFeeParameters {
                base_factor: 30_000,
                ..ClmmFeeParameters::default()
            },
            ..ClmmPoolFacade::default()
        }
    }

    fn test_ticks() -> Vec<TickFacade> {
        (-20..=20)
            .filter(|i| *i != 0)
            .map(|i| TickFacade::new(i * 10, if i < 0 { 1_000 } else { -1_000 }))
            .collect()
    }

    fn crossing_pool() -> ClmmPoolFacade {
        ClmmPoolFacade {
            tick_spacing: 64,
            liquidity: 1_000_000_000,
            sqrt_price: ONE,
            tick_current_index: 0,
            ..ClmmPoolFacade::default()
        }
    }

    fn crossing_ticks() -> Vec<TickFacade> {
        vec![
            TickFacade::new(-128, 500_000_000),
            TickFacade::new(-64, 500_000_000),
            TickFacade::new(64, -500_000_000),
            TickFacade::new(128, -500_000_000),
        ]
    }

    fn dynamic_fee_pool() -> ClmmPoolFacade {
        ClmmPoolFacade {
            fee_parameters: ClmmFeeParameters {
                base_factor: 1_000,
                protocol_share: 2_000,
                dynamic_fee: DynamicFeeFacade {
                    enabled: true,
                    filter_period: 30,
                    decay_period: 600,
                    reduction_factor: 5_000,
                    variable_fee_control: 1_000,
                    max_volatility_accumulator: 350_000,
                },
                ..ClmmFeeParameters::default()
            },
            volatility: VolatilityState {
                volatility_accumulator: 30,
                volatility_reference: 5,
                id_reference: 0,
                time_of_last_update: 1_700_000_090,
            },
            ..crossing_pool()
        }
    }

    #[test]
    fn test_exact_in_a_to_b_simple() {
        let pool = test_pool(ONE, true, CollectFeeMode::OnBoth);
        let result = simulate_clmm_swap(&pool, &test_ticks(), 1000, true, true, 0, 40).unwrap();
        assert_eq!(result.amount_in, 1000);
        assert_eq!(result.amount_out, 996);
        assert_eq!(result.fee_amount, 3);
        assert!(!result.fee_on_input);
        assert_eq!(result.after_sqrt_price, 18446559608113470482);
        assert_eq!(result.after_tick_index, -1);
        assert!(!result.is_exceeded);
    }

    #[test]
    fn test_exact_in_b_to_a_fee_on_input() {
        let pool = test_pool(ONE, true, CollectFeeMode::OnQuote);
        let result = simulate_clmm_swap(&pool, &test_ticks(), 1000, false, true, 0, 40).unwrap();
        assert_eq!(result.amount_in, 1000);
        assert_eq!(result.amount_out, 996);
        assert_eq!(result.fee_amount, 3);
        assert!(result.fee_on_input);
        assert_eq!(result.after_sqrt_price, 18446927987747966500);
        assert_eq!(result.after_tick_index, 0);
    }

    #[test]
    fn test_exact_out_a_to_b_simple() {
        let pool = test_pool(ONE, true, CollectFeeMode::OnBoth);
        let result = simulate_clmm_swap(&pool, &test_ticks(), 1000, true, false, 0, 40).unwrap();
        assert_eq!(result.amount_in, 1005);
        assert_eq!(result.amount_out, 1000);
        assert_eq!(result.fee_amount, 4);
        assert_eq!(result.after_sqrt_price, 18446558868399051572);
    }

    #[test]
    fn test_exact_out_b_to_a_fee_on_input() {
        let pool = test_pool(ONE, true, CollectFeeMode::OnQuote);
        let result = simulate_clmm_swap(&pool, &test_ticks(), 1000, false, false, 0, 40).unwrap();
        assert_eq!(result.amount_in, 1005);
        assert_eq!(result.amount_out, 1000);
        assert_eq!(result.fee_amount, 4);
        assert_eq!(result.after_sqrt_price, 18446928542994981566);
    }

    #[test]
    fn test_exact_in_a_to_b_crosses_ticks() {
        let pool = test_pool(ONE, false, CollectFeeMode::OnBoth);
        let result = simulate_clmm_swap(&pool, &test_ticks(), 1000, true, true, 0, 40).unwrap();
        assert_eq!(result.amount_in, 1000);
        assert_eq!(result.amount_out, 981);
        assert_eq!(result.fee_amount, 8);
        assert_eq!(result.after_sqrt_price, 18376760186254903002);
        assert_eq!(result.after_tick_index, -77);
        assert_eq!(result.after_liquidity, 258_000);
        assert_eq!(result.step_results.len(), 8);
        assert_eq!(result.price_impact_bps, 190);
    }

    #[test]
    fn test_exact_out_b_to_a_crosses_ticks() {
        let pool = test_pool(ONE, false, CollectFeeMode::OnQuote);
        let result = simulate_clmm_swap(&pool, &test_ticks(), 1000, false, false, 0, 40).unwrap();
        assert_eq!(result.amount_in, 1019);
        assert_eq!(result.amount_out, 1000);
        assert_eq!(result.fee_amount, 8);
        assert_eq!(result.after_sqrt_price, 18517755834789040996);
        assert_eq!(result.after_tick_index, 76);
    }

    #[test]
    fn test_zero_fee_matches_constant_liquidity_formula() {
        let liquidity: u128 = 5_000_000_000;
        let amount: u64 = 1_000_000;
        let pool = ClmmPoolFacade {
            tick_spacing: 1,
            liquidity,
            sqrt_price: ONE,
            tick_current_index: 0,
            ..ClmmPoolFacade::default()
        };
        let ticks = [TickFacade::new(-100_000, liquidity as i128), TickFacade::new(100_000, -(liquidity as i128))];
        let result = simulate_clmm_swap(&pool, &ticks, amount, true, true, 0, 40).unwrap();

        // sqrt_price' = L * sqrt_price / (L + amount * sqrt_price), with sqrt_price = 1
        let denominator = liquidity + amount as u128;
        let expected_sqrt_price = (liquidity << 64).div_ceil(denominator);
        let expected_amount_out = (liquidity * (ONE - expected_sqrt_price)) >> 64;

        assert_eq!(result.after_sqrt_price, expected_sqrt_price);
        assert_eq!(result.amount_out as u128, expected_amount_out);
        assert_eq!(result.amount_out, 999_800);
        assert_eq!(result.fee_amount, 0);
        assert!(!result.is_exceeded);
    }

    #[test]
    fn test_cross_one_tick_a_to_b() {
        let result = simulate_clmm_swap(&crossing_pool(), &crossing_ticks(), 4_000_000, true, true, 0, 40).unwrap();
        let first_step = result.step_results[0];
        assert_eq!(first_step.crossed_tick_index, Some(-64));
        assert_eq!(Ok(first_step.sqrt_price_end), tick_index_to_sqrt_price(-64));
        assert_eq!(first_step.sqrt_price_end, 18387811781193591352);
        assert_eq!(first_step.tick_index_end, -65);
        assert_eq!(first_step.amount_in, 3_204_965);
        assert_eq!(result.step_results[1].liquidity, 1_000_000_000 - 500_000_000);
        assert_eq!(result.step_results.len(), 2);
        assert_eq!(result.amount_out, 3_983_438);
        assert_eq!(result.after_sqrt_price, 18358713401064770620);
        assert_eq!(result.after_tick_index, -96);
        assert_eq!(result.after_liquidity, 500_000_000);
        assert!(!result.is_exceeded);
    }

    #[test]
    fn test_cross_one_tick_b_to_a() {
        let result = simulate_clmm_swap(&crossing_pool(), &crossing_ticks(), 4_000_000, false, true, 0, 40).unwrap();
        let first_step = result.step_results[0];
        assert_eq!(first_step.crossed_tick_index, Some(64));
        assert_eq!(first_step.sqrt_price_end, 18505865242158250041);
        assert_eq!(first_step.tick_index_end, 64);
        assert_eq!(result.after_liquidity, 1_000_000_000 - 500_000_000);
        assert_eq!(result.amount_out, 3_983_438);
        assert_eq!(result.after_sqrt_price, 18535196856507533387);
        assert_eq!(result.after_tick_index, 95);
    }

    #[test]
    fn test_running_out_of_ticks_is_exceeded() {
        let result = simulate_clmm_swap(&crossing_pool(), &crossing_ticks(), 1_000_000_000, true, true, 0, 40).unwrap();
        assert!(result.is_exceeded);
        assert_eq!(result.amount_in, 4_812_584);
        assert_eq!(result.amount_out, 4_786_984);
        assert_eq!(result.after_sqrt_price, 18329067761203520168);
        assert_eq!(result.after_tick_index, -129);
        assert_eq!(result.after_liquidity, 0);
    }

    #[test]
    fn test_step_cap_is_exceeded() {
        let result = simulate_clmm_swap(&crossing_pool(), &crossing_ticks(), 4_000_000, true, true, 0, 1).unwrap();
        assert!(result.is_exceeded);
        assert_eq!(result.step_results.len(), 1);
        assert_eq!(result.amount_in, 3_204_965);
        assert_eq!(result.amount_out, 3_194_725);
        assert_eq!(result.after_tick_index, -65);
    }

    #[test]
    fn test_dynamic_fee() {
        let pool = dynamic_fee_pool();
        let result = simulate_clmm_swap(&pool, &crossing_ticks(), 4_000_000, true, true, 1_700_000_100_000, 40).unwrap();
        assert_eq!(result.step_results[0].fee_rate, 1_664_000);
        assert_eq!(result.step_results[1].fee_rate, 9_856_000);
        assert_eq!(result.amount_out, 3_970_347);
        assert_eq!(result.fee_amount, 13_091);
        assert_eq!(result.base_fee_amount, 2_549);
        assert_eq!(result.dynamic_fee_amount, 10_542);
        assert_eq!(result.protocol_fee_amount, 2_618);
        assert_eq!(
            result.volatility,
            VolatilityState {
                volatility_accumulator: 15,
                volatility_reference: 5,
                id_reference: 0,
                time_of_last_update: 1_700_000_100,
            }
        );
    }

    #[test]
    fn test_dynamic_fee_after_filter_period() {
        let pool = dynamic_fee_pool();
        let result = simulate_clmm_swap(&pool, &crossing_ticks(), 4_000_000, true, true, 1_700_000_200_000, 40).unwrap();
        assert_eq!(result.step_results[0].fee_rate, 9_856_000);
        assert_eq!(result.step_results[1].fee_rate, 26_240_000);
        assert_eq!(result.amount_out, 3_931_254);
        assert_eq!(result.fee_amount, 52_184);
        assert_eq!(result.volatility.volatility_reference, 15);
        assert_eq!(result.volatility.volatility_accumulator, 25);
    }

    #[test]
    fn test_fee_scheduler_and_dynamic_fee() {
        let mut pool = dynamic_fee_pool();
        pool.volatility.time_of_last_update = 1_700_000_000;
        pool.fee_parameters.fee_scheduler = FeeSchedulerFacade {
            enabled: true,
            cliff_fee_numerator: 50_000_000,
            number_of_period: 10,
            period_frequency: 1_000,
            reduction_factor: 1_000,
            mode: FeeSchedulerMode::Exponential,
            activation_timestamp: 1_700_000_000_000,
        };
        let result = simulate_clmm_swap(&pool, &crossing_ticks(), 4_000_000, true, true, 1_700_000_002_500, 40).unwrap();
        assert_eq!(result.step_results[0].fee_rate, 40_500_000 + 1_024_000);
        assert_eq!(result.amount_out, 3_811_568);
        assert_eq!(result.fee_amount, 171_870);
        assert_eq!(result.base_fee_amount, 161_329);
        assert_eq!(result.dynamic_fee_amount, 10_541);
    }

    #[test]
    fn test_simulation_leaves_snapshot_untouched() {
        let pool = dynamic_fee_pool();
        let ticks = crossing_ticks();
        let first = simulate_clmm_swap(&pool, &ticks, 4_000_000, true, true, 1_700_000_100_000, 40).unwrap();
        let second = simulate_clmm_swap(&pool, &ticks, 4_000_000, true, true, 1_700_000_100_000, 40).unwrap();
        assert_eq!(first, second);
        assert_eq!(pool, dynamic_fee_pool());
        assert_eq!(ticks, crossing_ticks());
    }

    #[test]
    fn test_fee_on_input_conservation() {
        let pool = test_pool(ONE, false, CollectFeeMode::OnQuote);
        let result = simulate_clmm_swap(&pool, &test_ticks(), 1000, false, true, 0, 40).unwrap();
        assert!(result.fee_on_input);
        let consumed: u64 = result.step_results.iter().map(|step| step.amount_in + step.fee_amount).sum();
        let step_out: u64 = result.step_results.iter().map(|step| step.amount_out).sum();
        assert_eq!(consumed, result.amount_in);
        assert_eq!(step_out, result.amount_out);
        assert_eq!(result.amount_in, 1000);
    }

    #[rstest]
    #[case(true, true, CollectFeeMode::OnBoth, true)]
    #[case(true, true, CollectFeeMode::OnQuote, false)]
    #[case(true, false, CollectFeeMode::OnBoth, true)]
    #[case(true, false, CollectFeeMode::OnQuote, false)]
    #[case(false, true, CollectFeeMode::OnBoth, true)]
    #[case(false, true, CollectFeeMode::OnQuote, true)]
    #[case(false, false, CollectFeeMode::OnBoth, true)]
    #[case(false, false, CollectFeeMode::OnQuote, true)]
    fn test_step_amounts_match_price_delta(
        #[case] a_to_b: bool,
        #[case] specified_input: bool,
        #[case] collect_fee_mode: CollectFeeMode,
        #[case] is_quote_y: bool,
    ) {
        let pool = ClmmPoolFacade {
            is_quote_y,
            ..test_pool(ONE, false, collect_fee_mode)
        };
        let result = simulate_clmm_swap(&pool, &test_ticks(), 1000, a_to_b, specified_input, 0, 40).unwrap();
        assert!(!result.is_exceeded);
        assert!(result.step_results.iter().any(|step| step.crossed_tick_index.is_some()));
        assert_eq!(result.fee_on_input, pool.collect_fee_on_input(a_to_b));

        for step in &result.step_results {
            let (expected_in, expected_out) = if a_to_b {
                (
                    try_get_amount_delta_a(step.sqrt_price_start, step.sqrt_price_end, step.liquidity, true).unwrap(),
                    try_get_amount_delta_b(step.sqrt_price_start, step.sqrt_price_end, step.liquidity, false).unwrap(),
                )
            } else {
                (
                    try_get_amount_delta_b(step.sqrt_price_start, step.sqrt_price_end, step.liquidity, true).unwrap(),
                    try_get_amount_delta_a(step.sqrt_price_start, step.sqrt_price_end, step.liquidity, false).unwrap(),
                )
            };
            // An output-side fee is carved out of the delivered amount
            let gross_amount_out = if result.fee_on_input {
                step.amount_out
            } else {
                step.amount_out + step.fee_amount
            };
            assert!(step.amount_in.abs_diff(expected_in) <= 1, "in {} vs {}", step.amount_in, expected_in);
            assert!(gross_amount_out.abs_diff(expected_out) <= 1, "out {} vs {}", gross_amount_out, expected_out);
        }
    }

    #[test]
    fn test_invalid_inputs() {
        let pool = test_pool(ONE, true, CollectFeeMode::OnBoth);
        let ticks = test_ticks();
        assert_eq!(simulate_clmm_swap(&pool, &ticks, 0, true, true, 0, 40), Err(CoreError::ZeroTradableAmount));

        let mismatched = ClmmPoolFacade {
            tick_current_index: 5,
            ..pool
        };
        assert_eq!(simulate_clmm_swap(&mismatched, &ticks, 1000, true, true, 0, 40), Err(CoreError::TickIndexMismatch));

        let out_of_bounds = ClmmPoolFacade { sqrt_price: 1, ..pool };
        assert_eq!(simulate_clmm_swap(&out_of_bounds, &ticks, 1000, true, true, 0, 40), Err(CoreError::InvalidSqrtPrice));

        let bad_spacing = ClmmPoolFacade { tick_spacing: 0, ..pool };
        assert_eq!(simulate_clmm_swap(&bad_spacing, &ticks, 1000, true, true, 0, 40), Err(CoreError::InvalidTickSpacing));

        let unaligned = [TickFacade::new(-15, 0)];
        assert_eq!(simulate_clmm_swap(&pool, &unaligned, 1000, true, true, 0, 40), Err(CoreError::InvalidTickSequence));

        let pool = dynamic_fee_pool();
        assert_eq!(
            simulate_clmm_swap(&pool, &crossing_ticks(), 1000, true, true, 1_700_000_089_999, 40),
            Err(CoreError::InvalidTimestamp)
        );
    }

    #[test]
    fn test_price_on_tick_boundary_below_is_accepted() {
        let pool = ClmmPoolFacade {
            tick_current_index: -1,
            ..test_pool(ONE, true, CollectFeeMode::OnBoth)
        };
        let result = simulate_clmm_swap(&pool, &test_ticks(), 1000, true, true, 0, 40).unwrap();
        assert_eq!(result.amount_out, 996);
    }

    #[test]
    fn test_swap_quote_by_input_token() {
        let pool = test_pool(ONE, true, CollectFeeMode::OnBoth);
        let result = clmm_swap_quote_by_input_token(1000, true, Some(1000), &pool, &test_ticks(), 0).unwrap();
        assert_eq!(result.token_in, 1000);
        assert_eq!(result.token_est_out, 996);
        assert_eq!(result.token_min_out, 896);
        assert_eq!(result.trade_fee, 3);
        assert!(!result.is_exceeded);
    }

    #[test]
    fn test_swap_quote_by_output_token() {
        let pool = test_pool(ONE, true, CollectFeeMode::OnBoth);
        let result = clmm_swap_quote_by_output_token(1000, false, Some(1000), &pool, &test_ticks(), 0).unwrap();
        assert_eq!(result.token_out, 1000);
        assert_eq!(result.token_est_in, 1005);
        assert_eq!(result.token_max_in, 1106);
        assert_eq!(result.trade_fee, 4);
    }
}
