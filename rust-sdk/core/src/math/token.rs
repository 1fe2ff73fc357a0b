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
    try_mul_div, CoreError, BASIS_POINT_MAX, FEE_RATE_PRECISION, MAX_SLIPPAGE_TOLERANCE_BPS, MAX_SQRT_PRICE, MIN_SQRT_PRICE,
};
use ethnum::U256;

/// Calculate the amount of token A between two sqrt prices for a given liquidity.
///
/// # Parameters
/// - `sqrt_price_1` - The first sqrt price
/// - `sqrt_price_2` - The second sqrt price
/// - `liquidity` - The liquidity active between the two prices
/// - `round_up` - Whether to round up the result
///
/// # Returns
/// - `u64`: The amount of token A
pub fn try_get_amount_delta_a(sqrt_price_1: u128, sqrt_price_2: u128, liquidity: u128, round_up: bool) -> Result<u64, CoreError> {
    let (sqrt_price_lower, sqrt_price_upper) = order_sqrt_prices(sqrt_price_1, sqrt_price_2);
    let sqrt_price_diff = sqrt_price_upper - sqrt_price_lower;
    if sqrt_price_diff == 0 || liquidity == 0 {
        return Ok(0);
    }

    let product = U256::from(liquidity)
        .checked_mul(U256::from(sqrt_price_diff))
        .ok_or(CoreError::ArithmeticOverflow)?;
    if product.leading_zeros() < 64 {
        return Err(CoreError::ArithmeticOverflow);
    }
    let numerator = product << 64u32;
    let denominator = U256::from(sqrt_price_lower)
        .checked_mul(U256::from(sqrt_price_upper))
        .ok_or(CoreError::ArithmeticOverflow)?;
    if denominator == U256::ZERO {
        return Err(CoreError::DivisionByZero);
    }

    let quotient = numerator / denominator;
    let remainder = numerator % denominator;
    let result = if round_up && remainder != U256::ZERO { quotient + U256::ONE } else { quotient };

    if result > U256::from(u64::MAX) {
        return Err(CoreError::AmountExceedsMaxU64);
    }
    Ok(result.as_u64())
}

/// Calculate the amount of token B between two sqrt prices for a given liquidity.
///
/// # Parameters
/// - `sqrt_price_1` - The first sqrt price
/// - `sqrt_price_2` - The second sqrt price
/// - `liquidity` - The liquidity active between the two prices
/// - `round_up` - Whether to round up the result
///
/// # Returns
/// - `u64`: The amount of token B
pub fn try_get_amount_delta_b(sqrt_price_1: u128, sqrt_price_2: u128, liquidity: u128, round_up: bool) -> Result<u64, CoreError> {
    let (sqrt_price_lower, sqrt_price_upper) = order_sqrt_prices(sqrt_price_1, sqrt_price_2);
    let sqrt_price_diff = sqrt_price_upper - sqrt_price_lower;

    let product = U256::from(liquidity)
        .checked_mul(U256::from(sqrt_price_diff))
        .ok_or(CoreError::ArithmeticOverflow)?;
    let quotient = product >> 64u32;
    let should_round = round_up && product & U256::from(u64::MAX) != U256::ZERO;
    let result = if should_round { quotient + U256::ONE } else { quotient };

    if result > U256::from(u64::MAX) {
        return Err(CoreError::AmountExceedsMaxU64);
    }
    Ok(result.as_u64())
}

/// Calculate the sqrt price reached after adding or removing an amount of token A.
///
/// # Parameters
/// - `current_sqrt_price` - The current sqrt price
/// - `current_liquidity` - The current liquidity
/// - `amount` - The amount of token A
/// - `specified_input` - The amount is added to the pool (true) or taken out of it (false)
///
/// # Returns
/// - `u128`: The next sqrt price, rounded up
pub fn try_get_next_sqrt_price_from_a(current_sqrt_price: u128, current_liquidity: u128, amount: u64, specified_input: bool) -> Result<u128, CoreError> {
    if amount == 0 {
        return Ok(current_sqrt_price);
    }

    let product = U256::from(current_sqrt_price) * U256::from(amount);
    let liquidity_x64 = U256::from(current_liquidity) << 64u32;
    let liquidity_sqrt_price = U256::from(current_liquidity)
        .checked_mul(U256::from(current_sqrt_price))
        .ok_or(CoreError::ArithmeticOverflow)?;
    if liquidity_sqrt_price.leading_zeros() < 64 {
        return Err(CoreError::ArithmeticOverflow);
    }
    let numerator = liquidity_sqrt_price << 64u32;

    let denominator = if specified_input {
        liquidity_x64.checked_add(product).ok_or(CoreError::ArithmeticOverflow)?
    } else {
        liquidity_x64.checked_sub(product).ok_or(CoreError::ArithmeticOverflow)?
    };
    if denominator == U256::ZERO {
        return Err(CoreError::DivisionByZero);
    }

    let quotient = numerator / denominator;
    let remainder = numerator % denominator;
    let result = if remainder != U256::ZERO { quotient + U256::ONE } else { quotient };

    check_sqrt_price_bounds(result)
}

/// Calculate the sqrt price reached after adding or removing an amount of token B.
///
/// # Parameters
/// - `current_sqrt_price` - The current sqrt price
/// - `current_liquidity` - The current liquidity
/// - `amount` - The amount of token B
/// - `specified_input` - The amount is added to the pool (true) or taken out of it (false)
///
/// # Returns
/// - `u128`: The next sqrt price, rounded toward the pool
pub fn try_get_next_sqrt_price_from_b(current_sqrt_price: u128, current_liquidity: u128, amount: u64, specified_input: bool) -> Result<u128, CoreError> {
    if amount == 0 {
        return Ok(current_sqrt_price);
    }
    if current_liquidity == 0 {
        return Err(CoreError::DivisionByZero);
    }

    let amount_x64 = (amount as u128) << 64;
    let quotient = amount_x64 / current_liquidity;
    let remainder = amount_x64 % current_liquidity;
    let delta = if !specified_input && remainder != 0 { quotient + 1 } else { quotient };

    let result = if specified_input {
        current_sqrt_price.checked_add(delta).ok_or(CoreError::ArithmeticOverflow)?
    } else {
        current_sqrt_price.checked_sub(delta).ok_or(CoreError::ArithmeticOverflow)?
    };

    check_sqrt_price_bounds(U256::from(result))
}

fn check_sqrt_price_bounds(sqrt_price: U256) -> Result<u128, CoreError> {
    if sqrt_price < U256::from(MIN_SQRT_PRICE) || sqrt_price > U256::from(MAX_SQRT_PRICE) {
        return Err(CoreError::InvalidSqrtPrice);
    }
    Ok(sqrt_price.as_u128())
}

fn order_sqrt_prices(sqrt_price_1: u128, sqrt_price_2: u128) -> (u128, u128) {
    if sqrt_price_1 < sqrt_price_2 {
        (sqrt_price_1, sqrt_price_2)
    } else {
        (sqrt_price_2, sqrt_price_1)
    }
}

fn check_fee_rate(fee_rate: u64) -> Result<(), CoreError> {
    if fee_rate >= FEE_RATE_PRECISION {
        return Err(CoreError::InvalidFeeRate);
    }
    Ok(())
}

/// The fee contained in a gross amount: `ceil(amount * fee_rate / FEE_RATE_PRECISION)`.
pub fn try_get_fee_on_amount(amount: u64, fee_rate: u64) -> Result<u64, CoreError> {
    check_fee_rate(fee_rate)?;
    try_mul_div(amount, fee_rate as u128, FEE_RATE_PRECISION as u128, true)
}

/// The fee to charge on top of a net amount so that it is `fee_rate` of the gross amount.
pub fn try_get_fee_for_net_amount(amount: u64, fee_rate: u64) -> Result<u64, CoreError> {
    check_fee_rate(fee_rate)?;
    try_mul_div(amount, fee_rate as u128, (FEE_RATE_PRECISION - fee_rate) as u128, true)
}

/// Deduct the swap fee from a gross amount.
///
/// # Parameters
/// - `amount` - The amount before the fee
/// - `fee_rate` - The fee rate in parts per `FEE_RATE_PRECISION`
///
/// # Returns
/// - `u64`: The amount left after the fee
pub fn try_apply_swap_fee(amount: u64, fee_rate: u64) -> Result<u64, CoreError> {
    let fee_amount = try_get_fee_on_amount(amount, fee_rate)?;
    Ok(amount - fee_amount)
}

/// Inverse of [try_apply_swap_fee]: the gross amount needed to end up with `amount`.
///
/// # Parameters
/// - `amount` - The amount after the fee
/// - `fee_rate` - The fee rate in parts per `FEE_RATE_PRECISION`
///
/// # Returns
/// - `u64`: The amount before the fee
pub fn try_reverse_apply_swap_fee(amount: u64, fee_rate: u64) -> Result<u64, CoreError> {
    check_fee_rate(fee_rate)?;
    try_mul_div(amount, FEE_RATE_PRECISION as u128, (FEE_RATE_PRECISION - fee_rate) as u128, true)
}

/// Minimum amount after slippage, rounded down.
///
/// # Parameters
/// - `amount` - The estimated amount
/// - `slippage_tolerance_bps` - The slippage tolerance in basis points
pub fn try_get_min_amount_with_slippage_tolerance(amount: u64, slippage_tolerance_bps: u16) -> Result<u64, CoreError> {
    if slippage_tolerance_bps > MAX_SLIPPAGE_TOLERANCE_BPS {
        return Err(CoreError::InvalidSlippageTolerance);
    }
    let numerator = BASIS_POINT_MAX - slippage_tolerance_bps as u64;
    try_mul_div(amount, numerator as u128, BASIS_POINT_MAX as u128, false)
}

/// Maximum amount after slippage, rounded up.
///
/// # Parameters
/// - `amount` - The estimated amount
/// - `slippage_tolerance_bps` - The slippage tolerance in basis points
pub fn try_get_max_amount_with_slippage_tolerance(amount: u64, slippage_tolerance_bps: u16) -> Result<u64, CoreError> {
    if slippage_tolerance_bps > MAX_SLIPPAGE_TOLERANCE_BPS {
        return Err(CoreError::InvalidSlippageTolerance);
    }
    let numerator = BASIS_POINT_MAX + slippage_tolerance_bps as u64;
    try_mul_div(amount, numerator as u128, BASIS_POINT_MAX as u128, true)
}

/// Apply a tick's `liquidity_net` to the active liquidity when crossing it.
///
/// Moving right (`a_to_b == false`) adds the net liquidity, moving left removes it.
pub fn try_get_next_liquidity(current_liquidity: u128, liquidity_net: i128, a_to_b: bool) -> Result<u128, CoreError> {
    let liquidity_net = if a_to_b {
        liquidity_net.checked_neg().ok_or(CoreError::ArithmeticOverflow)?
    } else {
        liquidity_net
    };
    current_liquidity
        .checked_add_signed(liquidity_net)
        .ok_or(CoreError::ArithmeticOverflow)
}

/// Shortfall of `amount_out` against the output the same input would buy at the
/// pre-trade price, in basis points.
pub fn get_price_impact_bps(spot_amount_out: u128, amount_out: u64) -> u32 {
    let amount_out = amount_out as u128;
    if spot_amount_out <= amount_out {
        return 0;
    }
    let shortfall = U256::from(spot_amount_out - amount_out) * U256::from(BASIS_POINT_MAX);
    (shortfall / U256::from(spot_amount_out)).as_u32()
}
