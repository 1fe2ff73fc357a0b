//
// Copyright (c) Cryptic Dot
//
// Modification based on Orca Whirlpools (https://github.com/orca-so/whirlpools),
// originally licensed under the Apache License, Version 2.0, prior to February 26, 2025.
//
// Modifications licensed under FusionAMM SDK Source-Available License v1.0
// See the LICENSE file in the project root for license information.
//
use crate::{CoreError, MAX_SQRT_PRICE, MAX_TICK_INDEX, MIN_SQRT_PRICE, MIN_TICK_INDEX};
use ethnum::U256;

const LOG_B_2_X32: i128 = 59543866431248i128;
const BIT_PRECISION: u32 = 14;
const LOG_B_P_ERR_MARGIN_LOWER_X64: i128 = 184467440737095516i128; // 0.01
const LOG_B_P_ERR_MARGIN_UPPER_X64: i128 = 15793534762490258745i128; // 2^-precision / log_2_b + 0.01

/// sqrt(1.0001)^(2^i) in Q32.96, i = 0..=18.
const POSITIVE_TICK_RATIOS: [u128; 19] = [
    79232123823359799118286999567,
    79236085330515764027303304731,
    79244008939048815603706035061,
    79259858533276714757314932305,
    79291567232598584799939703904,
    79355022692464371645785046466,
    79482085999252804386437311141,
    79736823300114093921829183326,
    80248749790819932309965073892,
    81282483887344747381513967011,
    83390072131320151908154831281,
    87770609709833776024991924138,
    97234110755111693312479820773,
    119332217159966728226237229890,
    179736315981702064433883588727,
    407748233172238350107850275304,
    2098478828474011932436660412517,
    55581415166113811149459800483533,
    38992368544603139932233054999993551,
];

/// sqrt(1.0001)^-(2^i) in Q64.64, i = 0..=18.
const NEGATIVE_TICK_RATIOS: [u128; 19] = [
    18445821805675392311,
    18444899583751176498,
    18443055278223354162,
    18439367220385604838,
    18431993317065449817,
    18417254355718160513,
    18387811781193591352,
    18329067761203520168,
    18212142134806087854,
    17980523815641551639,
    17526086738831147013,
    16651378430235024244,
    15030750278693429944,
    12247334978882834399,
    8131365268884726200,
    3584323654723342297,
    696457651847595233,
    26294789957452057,
    37481735321082,
];

/// 1.0 in Q32.96.
const ONE_X96: u128 = 1 << 96;

/// Convert a tick index into a Q64.64 sqrt price.
///
/// # Parameters
/// - `tick_index` - A tick index in `[MIN_TICK_INDEX, MAX_TICK_INDEX]`
///
/// # Returns
/// * `u128`: The sqrt price
/// * [CoreError::InvalidTick] when the index is outside the domain
pub fn tick_index_to_sqrt_price(tick_index: i32) -> Result<u128, CoreError> {
    if !(MIN_TICK_INDEX..=MAX_TICK_INDEX).contains(&tick_index) {
        return Err(CoreError::InvalidTick);
    }
    Ok(sqrt_price_from_tick(tick_index))
}

// Valid for |tick_index| < 2^19, one past the domain included.
fn sqrt_price_from_tick(tick_index: i32) -> u128 {
    if tick_index >= 0 {
        sqrt_price_positive_tick(tick_index.unsigned_abs())
    } else {
        sqrt_price_negative_tick(tick_index.unsigned_abs())
    }
}

fn sqrt_price_positive_tick(abs_tick: u32) -> u128 {
    let mut ratio = if abs_tick & 1 != 0 {
        U256::from(POSITIVE_TICK_RATIOS[0])
    } else {
        U256::from(ONE_X96)
    };

    for (i, multiplier) in POSITIVE_TICK_RATIOS.iter().enumerate().skip(1) {
        if abs_tick & (1 << i) != 0 {
            ratio = (ratio * U256::from(*multiplier)) >> 96u32;
        }
    }

    (ratio >> 32u32).as_u128()
}

fn sqrt_price_negative_tick(abs_tick: u32) -> u128 {
    let mut ratio: u128 = if abs_tick & 1 != 0 {
        NEGATIVE_TICK_RATIOS[0]
    } else {
        1 << 64
    };

    for (i, multiplier) in NEGATIVE_TICK_RATIOS.iter().enumerate().skip(1) {
        if abs_tick & (1 << i) != 0 {
            ratio = (ratio * multiplier) >> 64;
        }
    }

    ratio
}

/// Convert a Q64.64 sqrt price into the greatest tick index whose sqrt price does not exceed it.
///
/// # Parameters
/// - `sqrt_price` - A sqrt price in `[MIN_SQRT_PRICE, MAX_SQRT_PRICE]`
///
/// # Returns
/// * `i32`: The tick index
/// * [CoreError::InvalidSqrtPrice] when the price is outside the domain
pub fn sqrt_price_to_tick_index(sqrt_price: u128) -> Result<i32, CoreError> {
    if !(MIN_SQRT_PRICE..=MAX_SQRT_PRICE).contains(&sqrt_price) {
        return Err(CoreError::InvalidSqrtPrice);
    }

    // Integer part of log2 is the most significant bit
    let msb: u32 = 128 - sqrt_price.leading_zeros() - 1;
    let log2p_integer_x32 = (msb as i128 - 64) << 32;

    // Fractional part: square r (Q1.63) and emit a bit whenever it reaches 2
    let mut bit: i128 = 0x8000_0000_0000_0000i128;
    let mut precision = 0;
    let mut log2p_fraction_x64 = 0;

    let mut r = if msb >= 64 {
        sqrt_price >> (msb - 63)
    } else {
        sqrt_price << (63 - msb)
    };

    while bit > 0 && precision < BIT_PRECISION {
        r *= r;
        let is_r_more_than_two = r >> 127_u32;
        r >>= 63 + is_r_more_than_two;
        log2p_fraction_x64 += bit * is_r_more_than_two as i128;
        bit >>= 1;
        precision += 1;
    }

    let log2p_fraction_x32 = log2p_fraction_x64 >> 32;
    let log2p_x32 = log2p_integer_x32 + log2p_fraction_x32;

    // log_sqrt(1.0001)(p) = log2(p) * log_sqrt(1.0001)(2)
    let logbp_x64 = log2p_x32 * LOG_B_2_X32;

    let tick_low = ((logbp_x64 - LOG_B_P_ERR_MARGIN_LOWER_X64) >> 64) as i32;
    let tick_high = ((logbp_x64 + LOG_B_P_ERR_MARGIN_UPPER_X64) >> 64) as i32;

    if tick_low == tick_high || sqrt_price_from_tick(tick_high) > sqrt_price {
        Ok(tick_low)
    } else {
        Ok(tick_high)
    }
}

/// Check whether a tick index lies on the tick spacing grid.
pub fn is_tick_initializable(tick_index: i32, tick_spacing: u16) -> bool {
    tick_spacing != 0 && tick_index % tick_spacing as i32 == 0
}

fn check_tick_spacing(tick_spacing: u16) -> Result<i32, CoreError> {
    if tick_spacing == 0 {
        return Err(CoreError::InvalidTickSpacing);
    }
    Ok(tick_spacing as i32)
}

/// Snap a tick index to the tick spacing grid.
///
/// # Parameters
/// - `tick_index` - The tick index
/// - `tick_spacing` - The tick spacing
/// - `round_up` - Round toward positive infinity instead of negative infinity
///
/// # Returns
/// - [CoreError::InvalidTickSpacing] if `tick_spacing` is zero
pub fn get_initializable_tick_index(tick_index: i32, tick_spacing: u16, round_up: bool) -> Result<i32, CoreError> {
    let tick_spacing = check_tick_spacing(tick_spacing)?;
    let floor = tick_index.div_euclid(tick_spacing) * tick_spacing;
    if round_up && floor != tick_index {
        Ok(floor + tick_spacing)
    } else {
        Ok(floor)
    }
}

/// The greatest initializable tick index strictly below `tick_index`.
pub fn get_prev_initializable_tick_index(tick_index: i32, tick_spacing: u16) -> Result<i32, CoreError> {
    let tick_spacing = check_tick_spacing(tick_spacing)?;
    let remainder = tick_index.rem_euclid(tick_spacing);
    if remainder == 0 {
        Ok(tick_index - tick_spacing)
    } else {
        Ok(tick_index - remainder)
    }
}

/// The smallest initializable tick index strictly above `tick_index`.
pub fn get_next_initializable_tick_index(tick_index: i32, tick_spacing: u16) -> Result<i32, CoreError> {
    let tick_spacing = check_tick_spacing(tick_spacing)?;
    Ok(tick_index - tick_index.rem_euclid(tick_spacing) + tick_spacing)
}

/// Order two tick indexes as (lower, upper).
pub fn order_tick_indexes(tick_index_1: i32, tick_index_2: i32) -> (i32, i32) {
    if tick_index_1 < tick_index_2 {
        (tick_index_1, tick_index_2)
    } else {
        (tick_index_2, tick_index_1)
    }
}

/// The tick index of the inverted price (token b priced in token a).
pub fn invert_tick_index(tick_index: i32) -> i32 {
    -tick_index
}

/// Check that `tick_index` is the tick implied by `sqrt_price`.
///
/// A price sitting exactly on a tick boundary may still be recorded in the tick below,
/// which is where a swap moving the price down leaves it.
pub fn is_tick_index_consistent(tick_index: i32, sqrt_price: u128) -> Result<bool, CoreError> {
    let implied = sqrt_price_to_tick_index(sqrt_price)?;
    if implied == tick_index {
        return Ok(true);
    }
    Ok(tick_index == implied - 1 && sqrt_price_from_tick(implied) == sqrt_price)
}
