//
// Copyright (c) Cryptic Dot
//
// Licensed under FusionAMM SDK Source-Available License v1.0
// See the LICENSE file in the project root for license information.
//
use super::bin::check_bin_step;
use crate::{get_price_from_id, BinFacade, CoreError};

/// Validated view over the populated bins handed to a DLMM simulation.
#[derive(Clone, Debug)]
pub struct BinSequence<'a> {
    bins: &'a [BinFacade],
    prices: Vec<u128>,
    bin_step: u16,
}

impl<'a> BinSequence<'a> {
    /// # Parameters
    /// - `bins` - Bins sorted by id
    /// - `bin_step` - The pair's bin step
    ///
    /// # Returns
    /// - [CoreError::InvalidBinSequence] if ids or prices are not strictly increasing, or a
    ///   bin carries a price that does not match its id
    pub fn new(bins: &'a [BinFacade], bin_step: u16) -> Result<Self, CoreError> {
        check_bin_step(bin_step)?;

        let mut prices: Vec<u128> = Vec::with_capacity(bins.len());
        let mut previous: Option<&BinFacade> = None;
        for bin in bins {
            let price = get_price_from_id(bin.bin_id, bin_step)?;
            if bin.price.is_some_and(|provided| provided != price) {
                return Err(CoreError::InvalidBinSequence);
            }
            if previous.is_some_and(|previous| previous.bin_id >= bin.bin_id) {
                return Err(CoreError::InvalidBinSequence);
            }
            if prices.last().is_some_and(|previous_price| *previous_price >= price) {
                return Err(CoreError::InvalidBinSequence);
            }

            prices.push(price);
            previous = Some(bin);
        }

        Ok(Self { bins, prices, bin_step })
    }

    pub fn bin_step(&self) -> u16 {
        self.bin_step
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Bins holding output reserve, walked from `start_id` (included) in the swap direction.
    ///
    /// Swapping for y walks toward lower ids, swapping for x toward higher ids. The start
    /// position is found by binary search over the populated bins.
    pub fn non_empty_bins(&self, start_id: u32, swap_for_y: bool) -> NonEmptyBins<'_, 'a> {
        let position = if swap_for_y {
            self.bins.partition_point(|bin| bin.bin_id <= start_id)
        } else {
            self.bins.partition_point(|bin| bin.bin_id < start_id)
        };
        NonEmptyBins {
            sequence: self,
            position,
            swap_for_y,
        }
    }
}

pub struct NonEmptyBins<'s, 'a> {
    sequence: &'s BinSequence<'a>,
    position: usize,
    swap_for_y: bool,
}

impl<'a> Iterator for NonEmptyBins<'_, 'a> {
    type Item = (&'a BinFacade, u128);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let index = if self.swap_for_y {
                self.position = self.position.checked_sub(1)?;
                self.position
            } else {
                let index = self.position;
                if index >= self.sequence.bins.len() {
                    return None;
                }
                self.position += 1;
                index
            };

            let bin = &self.sequence.bins[index];
            if bin.reserve_out(self.swap_for_y) > 0 {
                return Some((bin, self.sequence.prices[index]));
            }
        }
    }
}
