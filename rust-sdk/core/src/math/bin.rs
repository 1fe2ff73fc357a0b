//
// Copyright (c) Cryptic Dot
//
// Licensed under FusionAMM SDK Source-Available License v1.0
// See the LICENSE file in the project root for license information.
//
use crate::{
    get_static_fee_rate, get_total_fee_rate, get_variable_fee_rate, pow_q64, try_get_fee_for_net_amount, try_get_fee_on_amount, try_mul_shr,
    try_shl_div, CoreError, FeeRates, PairFacade, BASIS_POINT_MAX, MAX_BIN_ID, MAX_BIN_STEP, MAX_EXPONENTIAL, ONE_Q64, Q64_RESOLUTION,
    REAL_ID_SHIFT,
};

/// Amounts exchanged with a single bin.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct BinSwapAmounts {
    /// Input taken by the bin, fee included.
    pub amount_in: u64,
    pub amount_out: u64,
    pub fee_amount: u64,
    /// The bin's output reserve is exhausted.
    pub drained: bool,
}

pub(crate) fn check_bin_step(bin_step: u16) -> Result<(), CoreError> {
    if bin_step == 0 || bin_step > MAX_BIN_STEP {
        return Err(CoreError::InvalidBinStep);
    }
    Ok(())
}

/// Q64.64 price of token x in token y for a bin: `(1 + bin_step / 10_000) ^ (bin_id - 2^23)`.
///
/// # Parameters
/// - `bin_id` - A 24-bit bin id
/// - `bin_step` - The bin step in basis points, `1..=500`
///
/// # Returns
/// - `u128`: The bin price
/// - [CoreError::InvalidBinId] when the id is outside 24 bits or its price is not representable
pub fn get_price_from_id(bin_id: u32, bin_step: u16) -> Result<u128, CoreError> {
    check_bin_step(bin_step)?;
    if bin_id > MAX_BIN_ID {
        return Err(CoreError::InvalidBinId);
    }

    let base = ONE_Q64 + ((bin_step as u128) << Q64_RESOLUTION) / BASIS_POINT_MAX as u128;
    let exponent = bin_id as i32 - REAL_ID_SHIFT as i32;
    pow_q64(base, exponent).ok_or(CoreError::InvalidBinId)
}

/// The greatest bin id whose price does not exceed `price`.
///
/// # Parameters
/// - `price` - A Q64.64 price of token x in token y
/// - `bin_step` - The bin step in basis points
///
/// # Returns
/// - `u32`: The bin id
/// - [CoreError::InvalidBinId] when no representable bin price is at or below `price`
pub fn get_id_from_price(price: u128, bin_step: u16) -> Result<u32, CoreError> {
    check_bin_step(bin_step)?;

    // Unrepresentable prices sit at the ends of the id range
    let is_at_or_below = |bin_id: u32| match get_price_from_id(bin_id, bin_step) {
        Ok(bin_price) => bin_price <= price,
        Err(_) => bin_id < REAL_ID_SHIFT,
    };

    let mut low = REAL_ID_SHIFT - (MAX_EXPONENTIAL - 1);
    let mut high = REAL_ID_SHIFT + (MAX_EXPONENTIAL - 1);
    if !is_at_or_below(low) {
        return Err(CoreError::InvalidBinId);
    }

    while low < high {
        let mid = low + (high - low + 1) / 2;
        if is_at_or_below(mid) {
            low = mid;
        } else {
            high = mid - 1;
        }
    }

    get_price_from_id(low, bin_step)?;
    Ok(low)
}

/// Output bought by `amount_in` at a bin price, rounded down.
///
/// Swapping for y multiplies by the price, swapping for x divides by it.
pub fn try_get_amount_out(amount_in: u64, price: u128, swap_for_y: bool) -> Result<u128, CoreError> {
    if swap_for_y {
        try_mul_shr(amount_in as u128, price, Q64_RESOLUTION, false)
    } else {
        try_shl_div(amount_in as u128, Q64_RESOLUTION, price, false)
    }
}

/// Input needed to buy `amount_out` at a bin price, rounded up.
pub fn try_get_amount_in(amount_out: u64, price: u128, swap_for_y: bool) -> Result<u128, CoreError> {
    if swap_for_y {
        try_shl_div(amount_out as u128, Q64_RESOLUTION, price, true)
    } else {
        try_mul_shr(amount_out as u128, price, Q64_RESOLUTION, true)
    }
}

/// Fee rates of a DLMM pair for a given volatility accumulator.
pub fn get_dlmm_fee_rates(pair: &PairFacade, volatility_accumulator: u32) -> FeeRates {
    let parameters = &pair.parameters;
    let base_fee_rate = get_static_fee_rate(parameters.base_factor, pair.bin_step);
    let variable_fee_rate = get_variable_fee_rate(volatility_accumulator, pair.bin_step, parameters.variable_fee_control);
    FeeRates {
        base_fee_rate,
        variable_fee_rate,
        total_fee_rate: get_total_fee_rate(base_fee_rate, variable_fee_rate),
    }
}

/// Input, fee included, that drains `reserve_out`, and the fee part of it.
fn try_get_max_amount_in(reserve_out: u64, price: u128, fee_rate: u64, swap_for_y: bool) -> Result<(u64, u64), CoreError> {
    let amount_in = try_get_amount_in(reserve_out, price, swap_for_y)?;
    let amount_in = u64::try_from(amount_in).map_err(|_| CoreError::AmountExceedsMaxU64)?;
    let fee_amount = try_get_fee_for_net_amount(amount_in, fee_rate)?;
    let max_amount_in = amount_in.checked_add(fee_amount).ok_or(CoreError::AmountExceedsMaxU64)?;
    Ok((max_amount_in, fee_amount))
}

/// Swap as much of `amount_in_left` as one bin can absorb.
///
/// # Parameters
/// - `reserve_out` - The bin's reserve of the output token
/// - `price` - The bin price
/// - `amount_in_left` - Input still to be swapped, fee included
/// - `fee_rate` - Total fee rate in parts per `FEE_RATE_PRECISION`
/// - `swap_for_y` - Direction of the swap
///
/// # Returns
/// - `BinSwapAmounts`: The bin is drained when the input covers its whole reserve,
///   otherwise the whole input is consumed at the bin price
pub fn try_swap_in_bin_exact_in(
    reserve_out: u64,
    price: u128,
    amount_in_left: u64,
    fee_rate: u64,
    swap_for_y: bool,
) -> Result<BinSwapAmounts, CoreError> {
    // A reserve that no u64 input can drain is filled partially
    let max_amount_in = match try_get_max_amount_in(reserve_out, price, fee_rate, swap_for_y) {
        Ok(max_amount_in) => Some(max_amount_in),
        Err(CoreError::AmountExceedsMaxU64) => None,
        Err(err) => return Err(err),
    };

    if let Some((max_amount_in, max_fee_amount)) = max_amount_in {
        if amount_in_left >= max_amount_in {
            return Ok(BinSwapAmounts {
                amount_in: max_amount_in,
                amount_out: reserve_out,
                fee_amount: max_fee_amount,
                drained: true,
            });
        }
    }

    let fee_amount = try_get_fee_on_amount(amount_in_left, fee_rate)?;
    let amount_out = try_get_amount_out(amount_in_left - fee_amount, price, swap_for_y)?.min(reserve_out as u128) as u64;

    Ok(BinSwapAmounts {
        amount_in: amount_in_left,
        amount_out,
        fee_amount,
        drained: amount_out == reserve_out,
    })
}

/// Buy as much of `amount_out_left` as one bin holds.
///
/// # Parameters
/// - `reserve_out` - The bin's reserve of the output token
/// - `price` - The bin price
/// - `amount_out_left` - Output still to be bought
/// - `fee_rate` - Total fee rate in parts per `FEE_RATE_PRECISION`
/// - `swap_for_y` - Direction of the swap
pub fn try_swap_in_bin_exact_out(
    reserve_out: u64,
    price: u128,
    amount_out_left: u64,
    fee_rate: u64,
    swap_for_y: bool,
) -> Result<BinSwapAmounts, CoreError> {
    let amount_out = amount_out_left.min(reserve_out);
    let amount_in = try_get_amount_in(amount_out, price, swap_for_y)?;
    let amount_in = u64::try_from(amount_in).map_err(|_| CoreError::AmountExceedsMaxU64)?;
    let fee_amount = try_get_fee_for_net_amount(amount_in, fee_rate)?;

    Ok(BinSwapAmounts {
        amount_in: amount_in.checked_add(fee_amount).ok_or(CoreError::AmountExceedsMaxU64)?,
        amount_out,
        fee_amount,
        drained: amount_out == reserve_out,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DlmmFeeParameters, VolatilityState};
    use rstest::rstest;

    const PRICE_PLUS_ONE_STEP_10: u128 = 18465190817783261167;

    #[rstest]
    #[case(REAL_ID_SHIFT, 10, ONE_Q64)]
    #[case(REAL_ID_SHIFT + 1, 10, PRICE_PLUS_ONE_STEP_10)]
    #[case(REAL_ID_SHIFT - 1, 10, 18428315757951600016)]
    #[case(REAL_ID_SHIFT + 100, 25, 23678699809202413098)]
    #[case(REAL_ID_SHIFT - 100, 25, 14370821441331513819)]
    fn test_price_from_id(#[case] bin_id: u32, #[case] bin_step: u16, #[case] expected: u128) {
        assert_eq!(get_price_from_id(bin_id, bin_step), Ok(expected));
        assert_eq!(get_id_from_price(expected, bin_step), Ok(bin_id));
        assert_eq!(get_id_from_price(expected + 1, bin_step), Ok(bin_id));
        assert_eq!(get_id_from_price(expected - 1, bin_step), Ok(bin_id - 1));
    }

    #[test]
    fn test_price_from_id_domain() {
        assert_eq!(get_price_from_id(REAL_ID_SHIFT, 0), Err(CoreError::InvalidBinStep));
        assert_eq!(get_price_from_id(REAL_ID_SHIFT, MAX_BIN_STEP + 1), Err(CoreError::InvalidBinStep));
        assert_eq!(get_price_from_id(MAX_BIN_ID + 1, 10), Err(CoreError::InvalidBinId));
        assert!(get_price_from_id(REAL_ID_SHIFT + 909, MAX_BIN_STEP).is_ok());
        assert_eq!(get_price_from_id(REAL_ID_SHIFT + 910, MAX_BIN_STEP), Err(CoreError::InvalidBinId));
        assert_eq!(get_price_from_id(REAL_ID_SHIFT - 910, MAX_BIN_STEP), Err(CoreError::InvalidBinId));
        assert_eq!(get_id_from_price(0, 10), Err(CoreError::InvalidBinId));
    }

    #[test]
    fn test_price_is_strictly_increasing() {
        for bin_step in [1, 10, 25, 100] {
            let mut previous = 0;
            for bin_id in REAL_ID_SHIFT - 2_000..REAL_ID_SHIFT + 2_000 {
                let price = get_price_from_id(bin_id, bin_step).unwrap();
                assert!(price > previous, "bin {bin_id} step {bin_step}");
                previous = price;
            }
        }
    }

    #[test]
    fn test_amount_conversions() {
        assert_eq!(try_get_amount_out(1_000, PRICE_PLUS_ONE_STEP_10, true), Ok(1_000));
        assert_eq!(try_get_amount_out(1_000, PRICE_PLUS_ONE_STEP_10, false), Ok(999));
        assert_eq!(try_get_amount_in(1_000, PRICE_PLUS_ONE_STEP_10, true), Ok(1_000));
        assert_eq!(try_get_amount_in(1_000, PRICE_PLUS_ONE_STEP_10, false), Ok(1_001));
        assert_eq!(try_get_amount_in(1, 0, true), Err(CoreError::DivisionByZero));
    }

    #[test]
    fn test_dlmm_fee_rates() {
        let pair = PairFacade {
            active_id: REAL_ID_SHIFT,
            bin_step: 10,
            parameters: DlmmFeeParameters {
                base_factor: 10_000,
                variable_fee_control: 40,
                ..DlmmFeeParameters::default()
            },
            volatility: VolatilityState::default(),
        };
        let fee_rates = get_dlmm_fee_rates(&pair, 1_000);
        assert_eq!(fee_rates.base_fee_rate, 1_000_000);
        assert_eq!(fee_rates.variable_fee_rate, 40_000_000);
        assert_eq!(fee_rates.total_fee_rate, 41_000_000);
    }

    #[rstest]
    #[case(ONE_Q64, 5_000, true, 1_004, 1_000, 4, true)]
    #[case(ONE_Q64, 500, true, 500, 498, 2, false)]
    #[case(PRICE_PLUS_ONE_STEP_10, 500, true, 500, 498, 2, false)]
    #[case(PRICE_PLUS_ONE_STEP_10, 500, false, 500, 497, 2, false)]
    #[case(PRICE_PLUS_ONE_STEP_10, 5_000, false, 1_005, 1_000, 4, true)]
    #[case(PRICE_PLUS_ONE_STEP_10, 5_000, true, 1_004, 1_000, 4, true)]
    fn test_swap_in_bin_exact_in(
        #[case] price: u128,
        #[case] amount_in_left: u64,
        #[case] swap_for_y: bool,
        #[case] amount_in: u64,
        #[case] amount_out: u64,
        #[case] fee_amount: u64,
        #[case] drained: bool,
    ) {
        let result = try_swap_in_bin_exact_in(1_000, price, amount_in_left, 3_000_000, swap_for_y).unwrap();
        assert_eq!(
            result,
            BinSwapAmounts {
                amount_in,
                amount_out,
                fee_amount,
                drained,
            }
        );
    }

    #[test]
    fn test_swap_in_bin_exact_in_undrainable_reserve() {
        // Draining needs more than u64::MAX of input at this price
        let result = try_swap_in_bin_exact_in(u64::MAX, ONE_Q64 / 4, 1_000_000, 0, true).unwrap();
        assert_eq!(result.amount_in, 1_000_000);
        assert_eq!(result.amount_out, 250_000);
        assert!(!result.drained);
    }

    #[rstest]
    #[case(400, true, 402, 400, 2, false)]
    #[case(400, false, 403, 400, 2, false)]
    #[case(4_000, true, 1_004, 1_000, 4, true)]
    fn test_swap_in_bin_exact_out(
        #[case] amount_out_left: u64,
        #[case] swap_for_y: bool,
        #[case] amount_in: u64,
        #[case] amount_out: u64,
        #[case] fee_amount: u64,
        #[case] drained: bool,
    ) {
        let result = try_swap_in_bin_exact_out(1_000, PRICE_PLUS_ONE_STEP_10, amount_out_left, 3_000_000, swap_for_y).unwrap();
        assert_eq!(
            result,
            BinSwapAmounts {
                amount_in,
                amount_out,
                fee_amount,
                drained,
            }
        );
    }
}
