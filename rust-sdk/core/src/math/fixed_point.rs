//
// Copyright (c) Cryptic Dot
//
// Licensed under FusionAMM SDK Source-Available License v1.0
// See the LICENSE file in the project root for license information.
//
use crate::CoreError;
use ethnum::U256;

pub const Q64_RESOLUTION: u32 = 64;

/// 1.0 in Q64.64.
pub const ONE_Q64: u128 = 1 << Q64_RESOLUTION;

/// Exponents at or above this value are rejected by [pow_q64].
pub const MAX_EXPONENTIAL: u32 = 0x80000;

fn try_u256_to_u128(value: U256) -> Result<u128, CoreError> {
    if value > U256::from(u128::MAX) {
        return Err(CoreError::ArithmeticOverflow);
    }
    Ok(value.as_u128())
}

fn try_u256_to_u64(value: U256) -> Result<u64, CoreError> {
    if value > U256::from(u64::MAX) {
        return Err(CoreError::AmountExceedsMaxU64);
    }
    Ok(value.as_u64())
}

fn div_rounding(numerator: U256, denominator: U256, round_up: bool) -> Result<U256, CoreError> {
    if denominator == U256::ZERO {
        return Err(CoreError::DivisionByZero);
    }
    let quotient = numerator / denominator;
    let remainder = numerator % denominator;
    if round_up && remainder != U256::ZERO {
        Ok(quotient + U256::ONE)
    } else {
        Ok(quotient)
    }
}

/// `a * b / denominator` with the product held in 256 bits.
pub fn try_mul_div_u128(a: u128, b: u128, denominator: u128, round_up: bool) -> Result<u128, CoreError> {
    let product = U256::from(a) * U256::from(b);
    try_u256_to_u128(div_rounding(product, U256::from(denominator), round_up)?)
}

/// `amount * numerator / denominator`, failing with [CoreError::AmountExceedsMaxU64] when the result does not fit.
pub fn try_mul_div(amount: u64, numerator: u128, denominator: u128, round_up: bool) -> Result<u64, CoreError> {
    let product = U256::from(amount) * U256::from(numerator);
    try_u256_to_u64(div_rounding(product, U256::from(denominator), round_up)?)
}

/// `(a * b) >> shift`, rounding up when any shifted-out bit is set.
pub fn try_mul_shr(a: u128, b: u128, shift: u32, round_up: bool) -> Result<u128, CoreError> {
    if shift >= 256 {
        return Err(CoreError::ArithmeticOverflow);
    }
    let product = U256::from(a) * U256::from(b);
    let quotient = product >> shift;
    let truncated = quotient << shift != product;
    let result = if round_up && truncated { quotient + U256::ONE } else { quotient };
    try_u256_to_u128(result)
}

/// `(a << shift) / b`, failing when the shift drops significant bits.
pub fn try_shl_div(a: u128, shift: u32, b: u128, round_up: bool) -> Result<u128, CoreError> {
    let numerator = U256::from(a).checked_shl(shift).ok_or(CoreError::ArithmeticOverflow)?;
    if numerator >> shift != U256::from(a) {
        return Err(CoreError::ArithmeticOverflow);
    }
    try_u256_to_u128(div_rounding(numerator, U256::from(b), round_up)?)
}

/// Raises a Q64.64 `base` to an integer power by repeated squaring.
///
/// Bases at or above one are inverted first so every intermediate product stays below 2^128,
/// and the result is inverted back at the end. Returns `None` when the exponent is too large
/// or the result underflows to zero.
pub fn pow_q64(base: u128, exp: i32) -> Option<u128> {
    if exp == 0 {
        return Some(ONE_Q64);
    }

    let mut invert = exp.is_negative();
    let exp = exp.unsigned_abs();
    if exp >= MAX_EXPONENTIAL {
        return None;
    }

    let mut squared_base = base;
    let mut result = ONE_Q64;

    if squared_base >= result {
        squared_base = u128::MAX.checked_div(squared_base)?;
        invert = !invert;
    }

    let mut bit = 1u32;
    while bit < MAX_EXPONENTIAL {
        if exp & bit != 0 {
            result = result.checked_mul(squared_base)? >> Q64_RESOLUTION;
        }
        squared_base = squared_base.checked_mul(squared_base)? >> Q64_RESOLUTION;
        bit <<= 1;
    }

    if result == 0 {
        return None;
    }

    if invert {
        result = u128::MAX.checked_div(result)?;
    }

    Some(result)
}
