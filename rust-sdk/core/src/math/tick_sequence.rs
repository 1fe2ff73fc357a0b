//
// Copyright (c) Cryptic Dot
//
// Licensed under FusionAMM SDK Source-Available License v1.0
// See the LICENSE file in the project root for license information.
//
use crate::{tick_index_to_sqrt_price, CoreError, TickFacade, MAX_TICK_INDEX, MAX_TICK_SPACING, MIN_TICK_INDEX};

/// Validated view over the initialized ticks handed to a CLMM simulation.
#[derive(Clone, Debug)]
pub struct TickSequence<'a> {
    ticks: &'a [TickFacade],
    sqrt_prices: Vec<u128>,
    tick_spacing: u16,
}

impl<'a> TickSequence<'a> {
    /// # Parameters
    /// - `ticks` - Initialized ticks sorted by index
    /// - `tick_spacing` - The pool's tick spacing
    ///
    /// # Returns
    /// - [CoreError::InvalidTickSpacing] for a spacing outside `1..=MAX_TICK_SPACING`
    /// - [CoreError::InvalidTickSequence] if the ticks are not strictly increasing, not on the
    ///   spacing grid, out of range, or carry a sqrt price that does not match their index
    pub fn new(ticks: &'a [TickFacade], tick_spacing: u16) -> Result<Self, CoreError> {
        if tick_spacing == 0 || tick_spacing > MAX_TICK_SPACING {
            return Err(CoreError::InvalidTickSpacing);
        }

        let mut sqrt_prices = Vec::with_capacity(ticks.len());
        let mut previous_index: Option<i32> = None;
        for tick in ticks {
            if !(MIN_TICK_INDEX..=MAX_TICK_INDEX).contains(&tick.index) || tick.index % tick_spacing as i32 != 0 {
                return Err(CoreError::InvalidTickSequence);
            }
            if previous_index.is_some_and(|previous| previous >= tick.index) {
                return Err(CoreError::InvalidTickSequence);
            }

            let sqrt_price = tick_index_to_sqrt_price(tick.index)?;
            if tick.sqrt_price.is_some_and(|provided| provided != sqrt_price) {
                return Err(CoreError::InvalidTickSequence);
            }

            sqrt_prices.push(sqrt_price);
            previous_index = Some(tick.index);
        }

        Ok(Self {
            ticks,
            sqrt_prices,
            tick_spacing,
        })
    }

    pub fn tick_spacing(&self) -> u16 {
        self.tick_spacing
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    /// The greatest initialized tick at or below `tick_index`, with its sqrt price.
    pub fn prev_initialized_tick(&self, tick_index: i32) -> Option<(&'a TickFacade, u128)> {
        let position = self.ticks.partition_point(|tick| tick.index <= tick_index);
        let position = position.checked_sub(1)?;
        Some((&self.ticks[position], self.sqrt_prices[position]))
    }

    /// The smallest initialized tick strictly above `tick_index`, with its sqrt price.
    pub fn next_initialized_tick(&self, tick_index: i32) -> Option<(&'a TickFacade, u128)> {
        let position = self.ticks.partition_point(|tick| tick.index <= tick_index);
        let tick = self.ticks.get(position)?;
        Some((tick, self.sqrt_prices[position]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_ticks() -> Vec<TickFacade> {
        vec![
            TickFacade::new(-128, 1_000),
            TickFacade::new(-64, 500),
            TickFacade::new(64, -500),
            TickFacade::new(128, -1_000),
        ]
    }

    #[test]
    fn test_prev_initialized_tick() {
        let ticks = test_ticks();
        let sequence = TickSequence::new(&ticks, 64).unwrap();
        assert_eq!(sequence.prev_initialized_tick(0).map(|(tick, _)| tick.index), Some(-64));
        assert_eq!(sequence.prev_initialized_tick(64).map(|(tick, _)| tick.index), Some(64));
        assert_eq!(sequence.prev_initialized_tick(-65).map(|(tick, _)| tick.index), Some(-128));
        assert_eq!(sequence.prev_initialized_tick(-129), None);
    }

    #[test]
    fn test_next_initialized_tick() {
        let ticks = test_ticks();
        let sequence = TickSequence::new(&ticks, 64).unwrap();
        assert_eq!(sequence.next_initialized_tick(0).map(|(tick, _)| tick.index), Some(64));
        assert_eq!(sequence.next_initialized_tick(64).map(|(tick, _)| tick.index), Some(128));
        assert_eq!(sequence.next_initialized_tick(-1_000).map(|(tick, _)| tick.index), Some(-128));
        assert_eq!(sequence.next_initialized_tick(128), None);
    }

    #[test]
    fn test_sqrt_prices_are_resolved() {
        let ticks = test_ticks();
        let sequence = TickSequence::new(&ticks, 64).unwrap();
        let (_, sqrt_price) = sequence.next_initialized_tick(0).unwrap();
        assert_eq!(Ok(sqrt_price), tick_index_to_sqrt_price(64));
        assert_eq!(sequence.len(), 4);
        assert_eq!(sequence.tick_spacing(), 64);
    }

    #[test]
    fn test_empty_sequence() {
        let sequence = TickSequence::new(&[], 1).unwrap();
        assert!(sequence.is_empty());
        assert_eq!(sequence.prev_initialized_tick(0), None);
        assert_eq!(sequence.next_initialized_tick(0), None);
    }

    #[test]
    fn test_invalid_sequences() {
        let ticks = test_ticks();
        assert_eq!(TickSequence::new(&ticks, 0).err(), Some(CoreError::InvalidTickSpacing));
        assert_eq!(TickSequence::new(&ticks, MAX_TICK_SPACING + 1).err(), Some(CoreError::InvalidTickSpacing));
        assert_eq!(TickSequence::new(&ticks, 128).err(), Some(CoreError::InvalidTickSequence));

        let unordered = [TickFacade::new(64, 0), TickFacade::new(-64, 0)];
        assert_eq!(TickSequence::new(&unordered, 64).err(), Some(CoreError::InvalidTickSequence));

        let duplicated = [TickFacade::new(64, 0), TickFacade::new(64, 0)];
        assert_eq!(TickSequence::new(&duplicated, 64).err(), Some(CoreError::InvalidTickSequence));

        let out_of_range = [TickFacade::new(MAX_TICK_INDEX + 1, 0)];
        assert_eq!(TickSequence::new(&out_of_range, 1).err(), Some(CoreError::InvalidTickSequence));

        let wrong_price = [TickFacade {
            sqrt_price: Some(1 << 64),
            ..TickFacade::new(64, 0)
        }];
        assert_eq!(TickSequence::new(&wrong_price, 64).err(), Some(CoreError::InvalidTickSequence));
    }
}
