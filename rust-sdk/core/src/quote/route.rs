//
// Copyright (c) Cryptic Dot
//
// Licensed under FusionAMM SDK Source-Available License v1.0
// See the LICENSE file in the project root for license information.
//
use crate::config;
use crate::{simulate_clmm_swap, simulate_dlmm_swap, BinFacade, ClmmPoolFacade, ClmmSwapQuote, CoreError, DlmmSwapQuote, PairFacade, TickFacade};
use log::debug;

/// A pool snapshot that can be quoted against.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LiquiditySource {
    Clmm { pool: ClmmPoolFacade, ticks: Vec<TickFacade> },
    Dlmm { pair: PairFacade, bins: Vec<BinFacade> },
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SwapQuote {
    Clmm(ClmmSwapQuote),
    Dlmm(DlmmSwapQuote),
}

impl SwapQuote {
    pub fn amount_in(&self) -> u64 {
        match self {
            SwapQuote::Clmm(quote) => quote.amount_in,
            SwapQuote::Dlmm(quote) => quote.amount_in,
        }
    }

    pub fn amount_out(&self) -> u64 {
        match self {
            SwapQuote::Clmm(quote) => quote.amount_out,
            SwapQuote::Dlmm(quote) => quote.amount_out,
        }
    }

    pub fn fee_amount(&self) -> u64 {
        match self {
            SwapQuote::Clmm(quote) => quote.fee_amount,
            SwapQuote::Dlmm(quote) => quote.fee_amount,
        }
    }

    pub fn is_exceeded(&self) -> bool {
        match self {
            SwapQuote::Clmm(quote) => quote.is_exceeded,
            SwapQuote::Dlmm(quote) => quote.is_exceeded,
        }
    }

    pub fn price_impact_bps(&self) -> u32 {
        match self {
            SwapQuote::Clmm(quote) => quote.price_impact_bps,
            SwapQuote::Dlmm(quote) => quote.price_impact_bps,
        }
    }
}

/// Quote selling `amount` of the first token (a or x) for the second, or the reverse.
///
/// # Arguments
/// - `timestamp`: Current unix time in milliseconds. DLMM pairs are quoted in seconds.
pub fn quote_exact_in(source: &LiquiditySource, amount: u64, sell_first_token: bool, timestamp: u64) -> Result<SwapQuote, CoreError> {
    match source {
        LiquiditySource::Clmm { pool, ticks } => {
            simulate_clmm_swap(pool, ticks, amount, sell_first_token, true, timestamp, config::clmm_max_swap_steps()).map(SwapQuote::Clmm)
        }
        LiquiditySource::Dlmm { pair, bins } => simulate_dlmm_swap(
            pair,
            bins,
            amount,
            sell_first_token,
            true,
            timestamp / 1000,
            config::dlmm_max_bin_iterations(),
        )
        .map(SwapQuote::Dlmm),
    }
}

/// Quote every source and keep the best one.
///
/// Fully filled quotes beat exceeded ones, then the larger output wins. Ties keep the
/// earlier source.
///
/// # Returns
/// - `Option<(usize, SwapQuote)>`: Index of the winning source and its quote, `None` without sources
pub fn best_exact_in_quote(
    sources: &[LiquiditySource],
    amount: u64,
    sell_first_token: bool,
    timestamp: u64,
) -> Result<Option<(usize, SwapQuote)>, CoreError> {
    let mut best: Option<(usize, SwapQuote)> = None;
    for (index, source) in sources.iter().enumerate() {
        let quote = quote_exact_in(source, amount, sell_first_token, timestamp)?;
        let rank = (!quote.is_exceeded(), quote.amount_out());
        let is_better = match &best {
            Some((_, current)) => rank > (!current.is_exceeded(), current.amount_out()),
            None => true,
        };
        if is_better {
            best = Some((index, quote));
        }
    }

    if let Some((index, quote)) = &best {
        debug!(target: "log", "Best route for {} is source {} with out {}", amount, index, quote.amount_out());
    }
    Ok(best)
}
