//
// Copyright (c) Cryptic Dot
//
// Licensed under FusionAMM SDK Source-Available License v1.0
// See the LICENSE file in the project root for license information.
//
use crate::{
    get_dlmm_fee_rates, get_price_from_id, get_price_impact_bps, try_get_amount_out, try_get_max_amount_with_slippage_tolerance,
    try_get_min_amount_with_slippage_tolerance, try_get_protocol_fee_amount, try_split_fee_amount, try_swap_in_bin_exact_in, try_swap_in_bin_exact_out,
    BinFacade, BinSequence, BinStepResult, BinSwapTermination, CoreError, DlmmSwapQuote, ExactInSwapQuote, ExactOutSwapQuote, PairFacade,
    VolatilityTracker,
};
use crate::config;
use log::{debug, trace, warn};

/// Computes the quote for a DLMM swap with a fixed input amount.
///
/// # Arguments
/// - `token_in`: The amount of tokens to swap in.
/// - `specified_token_x`: Whether the input token is token x.
/// - `slippage_tolerance_bps`: The slippage tolerance in basis points, the configured default when `None`.
/// - `pair`: The pair state.
/// - `bins`: The populated bins around the active bin, sorted by id.
/// - `timestamp`: Current unix time in seconds.
///
/// # Returns
/// The exact input swap quote.
pub fn dlmm_swap_quote_by_input_token(
    token_in: u64,
    specified_token_x: bool,
    slippage_tolerance_bps: Option<u16>,
    pair: &PairFacade,
    bins: &[BinFacade],
    timestamp: u64,
) -> Result<ExactInSwapQuote, CoreError> {
    let slippage_tolerance_bps = slippage_tolerance_bps.unwrap_or_else(config::slippage_tolerance_bps);
    let quote = simulate_dlmm_swap(pair, bins, token_in, specified_token_x, true, timestamp, config::dlmm_max_bin_iterations())?;
    let token_min_out = try_get_min_amount_with_slippage_tolerance(quote.amount_out, slippage_tolerance_bps)?;

    Ok(ExactInSwapQuote {
        token_in: quote.amount_in,
        token_est_out: quote.amount_out,
        token_min_out,
        trade_fee: quote.fee_amount,
        is_exceeded: quote.is_exceeded,
    })
}

/// Computes the quote for a DLMM swap with a fixed output amount.
///
/// # Arguments
/// - `token_out`: The amount of tokens to receive.
/// - `specified_token_x`: Whether the output token is token x.
/// - `slippage_tolerance_bps`: The slippage tolerance in basis points, the configured default when `None`.
/// - `pair`: The pair state.
/// - `bins`: The populated bins around the active bin, sorted by id.
/// - `timestamp`: Current unix time in seconds.
///
/// # Returns
/// The exact output swap quote.
pub fn dlmm_swap_quote_by_output_token(
    token_out: u64,
    specified_token_x: bool,
    slippage_tolerance_bps: Option<u16>,
    pair: &PairFacade,
    bins: &[BinFacade],
    timestamp: u64,
) -> Result<ExactOutSwapQuote, CoreError> {
    let slippage_tolerance_bps = slippage_tolerance_bps.unwrap_or_else(config::slippage_tolerance_bps);
    let quote = simulate_dlmm_swap(pair, bins, token_out, !specified_token_x, false, timestamp, config::dlmm_max_bin_iterations())?;
    let token_max_in = try_get_max_amount_with_slippage_tolerance(quote.amount_in, slippage_tolerance_bps)?;

    Ok(ExactOutSwapQuote {
        token_out: quote.amount_out,
        token_est_in: quote.amount_in,
        token_max_in,
        trade_fee: quote.fee_amount,
        is_exceeded: quote.is_exceeded,
    })
}

/// Walks the pair's bins from the active bin in the swap direction.
///
/// Every bin trades at its own constant price. A bin is drained completely before the
/// next non-empty bin is visited. Running out of bins or reaching `max_bin_iterations`
/// is reported through `termination` together with the unfilled `amount_left`.
///
/// # Arguments
/// - `amount`: Input amount when `specified_input`, requested output amount otherwise.
/// - `swap_for_y`: Token x is sold for token y.
/// - `timestamp`: Current unix time in seconds.
pub fn simulate_dlmm_swap(
    pair: &PairFacade,
    bins: &[BinFacade],
    amount: u64,
    swap_for_y: bool,
    specified_input: bool,
    timestamp: u64,
    max_bin_iterations: usize,
) -> Result<DlmmSwapQuote, CoreError> {
    if amount == 0 {
        return Err(CoreError::ZeroTradableAmount);
    }
    let bin_sequence = BinSequence::new(bins, pair.bin_step)?;
    let active_price = get_price_from_id(pair.active_id, pair.bin_step)?;

    let mut volatility_tracker = VolatilityTracker::new(pair.volatility, pair.parameters.volatility_parameters(), 1);
    volatility_tracker.update_references(pair.active_id as i32, timestamp)?;

    let mut amount_left = amount;
    let mut amount_in = 0u64;
    let mut amount_out = 0u64;
    let mut fee_amount = 0u64;
    let mut base_fee_amount = 0u64;
    let mut dynamic_fee_amount = 0u64;
    let mut after_bin_id = pair.active_id;
    let mut after_price = active_price;
    let mut bin_results: Vec<BinStepResult> = Vec::new();
    let mut non_empty_bins = bin_sequence.non_empty_bins(pair.active_id, swap_for_y);

    let termination = loop {
        if amount_left == 0 {
            break BinSwapTermination::Filled;
        }
        if bin_results.len() >= max_bin_iterations {
            warn!(target: "log", "DLMM swap stopped after {} bins with {} left", bin_results.len(), amount_left);
            break BinSwapTermination::IterationCapExceeded;
        }
        let Some((bin, price)) = non_empty_bins.next() else {
            break BinSwapTermination::InsufficientLiquidity;
        };

        let volatility_accumulator = volatility_tracker.update_accumulator(bin.bin_id as i32);
        let fee_rates = get_dlmm_fee_rates(pair, volatility_accumulator);
        let reserve_out = bin.reserve_out(swap_for_y);

        let amounts = if specified_input {
            try_swap_in_bin_exact_in(reserve_out, price, amount_left, fee_rates.total_fee_rate, swap_for_y)?
        } else {
            try_swap_in_bin_exact_out(reserve_out, price, amount_left, fee_rates.total_fee_rate, swap_for_y)?
        };

        amount_left = if specified_input {
            amount_left.checked_sub(amounts.amount_in)
        } else {
            amount_left.checked_sub(amounts.amount_out)
        }
        .ok_or(CoreError::ArithmeticOverflow)?;
        amount_in = amount_in.checked_add(amounts.amount_in).ok_or(CoreError::ArithmeticOverflow)?;
        amount_out = amount_out.checked_add(amounts.amount_out).ok_or(CoreError::ArithmeticOverflow)?;
        fee_amount = fee_amount.checked_add(amounts.fee_amount).ok_or(CoreError::ArithmeticOverflow)?;

        let (bin_base_fee, bin_dynamic_fee) = try_split_fee_amount(amounts.fee_amount, &fee_rates)?;
        base_fee_amount += bin_base_fee;
        dynamic_fee_amount += bin_dynamic_fee;

        trace!(
            target: "log",
            "DLMM bin {}: in {}, out {}, fee {} at rate {}, drained {}",
            bin.bin_id,
            amounts.amount_in,
            amounts.amount_out,
            amounts.fee_amount,
            fee_rates.total_fee_rate,
            amounts.drained
        );

        bin_results.push(BinStepResult {
            bin_id: bin.bin_id,
            price,
            amount_in: amounts.amount_in,
            amount_out: amounts.amount_out,
            fee_amount: amounts.fee_amount,
            fee_rate: fee_rates.total_fee_rate,
            drained: amounts.drained,
        });
        after_bin_id = bin.bin_id;
        after_price = price;
    };

    let protocol_fee_amount = try_get_protocol_fee_amount(fee_amount, pair.parameters.protocol_share)?;
    let spot_amount_out = try_get_amount_out(amount_in, active_price, swap_for_y).unwrap_or(u128::MAX);
    let price_impact_bps = get_price_impact_bps(spot_amount_out, amount_out);

    debug!(
        target: "log",
        "DLMM swap swap_for_y={} specified_input={} amount={}: in {}, out {}, fee {}, bins {}, {:?}",
        swap_for_y,
        specified_input,
        amount,
        amount_in,
        amount_out,
        fee_amount,
        bin_results.len(),
        termination
    );

    Ok(DlmmSwapQuote {
        amount_in,
        amount_out,
        amount_left,
        fee_amount,
        base_fee_amount,
        dynamic_fee_amount,
        protocol_fee_amount,
        after_bin_id,
        after_price,
        is_exceeded: termination != BinSwapTermination::Filled,
        termination,
        price_impact_bps,
        bin_results,
        volatility: volatility_tracker.state(),
    })
}
