//
// Copyright (c) Cryptic Dot
//
// Licensed under FusionAMM SDK Source-Available License v1.0
// See the LICENSE file in the project root for license information.
//
use crate::{get_id_from_price, get_price_from_id, sqrt_price_to_tick_index, tick_index_to_sqrt_price, CoreError, MAX_SQRT_PRICE, MIN_SQRT_PRICE};
use libm::{floor, pow, sqrt};

const Q64_RESOLUTION: f64 = 18446744073709551616.0;

/// Convert a Q64.64 sqrt price into a human-readable price of token A in token B.
///
/// # Parameters
/// - `sqrt_price` - The sqrt price
/// - `decimals_a` - Decimals of token A
/// - `decimals_b` - Decimals of token B
pub fn sqrt_price_to_price(sqrt_price: u128, decimals_a: u8, decimals_b: u8) -> f64 {
    let power = pow(10f64, decimals_a as f64 - decimals_b as f64);
    let sqrt_price = sqrt_price as f64 / Q64_RESOLUTION;
    pow(sqrt_price, 2.0) * power
}

/// Convert a human-readable price of token A in token B into a Q64.64 sqrt price.
///
/// # Parameters
/// - `price` - The decimal-adjusted price
/// - `decimals_a` - Decimals of token A
/// - `decimals_b` - Decimals of token B
pub fn price_to_sqrt_price(price: f64, decimals_a: u8, decimals_b: u8) -> u128 {
    let power = pow(10f64, decimals_b as f64 - decimals_a as f64);
    (floor(sqrt(price * power) * Q64_RESOLUTION)) as u128
}

/// Invert a decimal-adjusted price: A in B becomes B in A.
pub fn invert_price(price: f64, decimals_a: u8, decimals_b: u8) -> f64 {
    let sqrt_price = price_to_sqrt_price(price, decimals_a, decimals_b);
    if sqrt_price == 0 {
        return 0.0;
    }
    let inverted = (u128::MAX / sqrt_price).clamp(MIN_SQRT_PRICE, MAX_SQRT_PRICE);
    sqrt_price_to_price(inverted, decimals_b, decimals_a)
}

/// Decimal-adjusted price at a tick index.
pub fn tick_index_to_price(tick_index: i32, decimals_a: u8, decimals_b: u8) -> Result<f64, CoreError> {
    Ok(sqrt_price_to_price(tick_index_to_sqrt_price(tick_index)?, decimals_a, decimals_b))
}

/// The tick index holding a decimal-adjusted price.
pub fn price_to_tick_index(price: f64, decimals_a: u8, decimals_b: u8) -> Result<i32, CoreError> {
    sqrt_price_to_tick_index(price_to_sqrt_price(price, decimals_a, decimals_b))
}

/// Decimal-adjusted price of token x in token y at a bin.
pub fn bin_id_to_price(bin_id: u32, bin_step: u16, decimals_x: u8, decimals_y: u8) -> Result<f64, CoreError> {
    let price = get_price_from_id(bin_id, bin_step)? as f64 / Q64_RESOLUTION;
    Ok(price * pow(10f64, decimals_x as f64 - decimals_y as f64))
}

/// The bin holding a decimal-adjusted price of token x in token y.
pub fn price_to_bin_id(price: f64, bin_step: u16, decimals_x: u8, decimals_y: u8) -> Result<u32, CoreError> {
    let price_q64 = floor(price * pow(10f64, decimals_y as f64 - decimals_x as f64) * Q64_RESOLUTION) as u128;
    get_id_from_price(price_q64, bin_step)
}

/// Realized price of a swap: output units per input unit, adjusted for decimals.
pub fn execution_price(amount_in: u64, amount_out: u64, decimals_in: u8, decimals_out: u8) -> f64 {
    if amount_in == 0 {
        return 0.0;
    }
    let amount_in = amount_in as f64 / pow(10f64, decimals_in as f64);
    let amount_out = amount_out as f64 / pow(10f64, decimals_out as f64);
    amount_out / amount_in
}
