// Copyright 2020 Zachary Stewart
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Seeded pseudo-random engine used by placement, the AI and the simulator.
//!
//! The generator is an explicit xorshift64* stream whose initial state is derived from
//! the seed with a splitmix64 scramble. Output is a pure function of the seed and the
//! number of draws, so two engines built from the same seed always agree.

use rand::RngCore;
use thiserror::Error;

/// Multiplier applied to the xorshift state to produce each output word.
const XORSHIFT_STAR_MULTIPLIER: u64 = 0x2545_f491_4f6c_dd1d;

/// Replacement state used if the scrambled seed happens to be zero, which is a fixed
/// point of xorshift.
const NONZERO_STATE: u64 = 0x9e37_79b9_7f4a_7c15;

/// Scale for turning the top 53 bits of a word into a float in `[0, 1)`.
const F64_UNIT: f64 = 1.0 / (1u64 << 53) as f64;

/// Error returned when an engine operation is given input it cannot draw from.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
pub enum InvalidArgument {
    /// A choice was requested from an empty sequence.
    #[error("cannot choose from an empty sequence")]
    EmptyChoice,
    /// Weighted choice weights were negative, not finite, or summed to zero.
    #[error("weights must be finite, non-negative and sum to a positive total")]
    InvalidWeights,
    /// An integer range had `min > max`.
    #[error("invalid integer range: {min} > {max}")]
    InvertedRange { min: i64, max: i64 },
}

/// Deterministic random engine.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct DeterministicRng {
    /// Seed the engine was constructed with.
    seed: u64,
    /// Current xorshift state.
    state: u64,
    /// Number of words drawn since construction or the last reset.
    draws: u64,
}

impl DeterministicRng {
    /// Construct an engine whose output is fully determined by `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            state: initial_state(seed),
            draws: 0,
        }
    }

    /// The seed this engine was constructed with. Unaffected by draws.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of words drawn since construction or the last [`reset`][Self::reset].
    pub fn draws(&self) -> u64 {
        self.draws
    }

    /// Rewind to the state implied by the original seed.
    pub fn reset(&mut self) {
        self.state = initial_state(self.seed);
        self.draws = 0;
    }

    /// Draw a float uniformly from `[0, 1)`.
    pub fn next(&mut self) -> f64 {
        (self.step() >> 11) as f64 * F64_UNIT
    }

    /// Draw an integer uniformly from the inclusive range `[min, max]`. Always consumes
    /// exactly one draw, including when `min == max`.
    /// Panics if `min > max`; see [`try_next_int`][Self::try_next_int].
    pub fn next_int(&mut self, min: i64, max: i64) -> i64 {
        match self.try_next_int(min, max) {
            Ok(value) => value,
            Err(err) => panic!("{}", err),
        }
    }

    /// Draw an integer uniformly from the inclusive range `[min, max]`, returning an
    /// error instead of panicking when `min > max`.
    pub fn try_next_int(&mut self, min: i64, max: i64) -> Result<i64, InvalidArgument> {
        if min > max {
            return Err(InvalidArgument::InvertedRange { min, max });
        }
        let span = max as i128 - min as i128 + 1;
        let offset = ((self.next() * span as f64) as i128).min(span - 1);
        Ok((min as i128 + offset) as i64)
    }

    /// Draw a boolean with probability one half.
    pub fn next_boolean(&mut self) -> bool {
        self.next() < 0.5
    }

    /// Choose an element of `items` uniformly.
    pub fn next_choice<'a, T>(&mut self, items: &'a [T]) -> Result<&'a T, InvalidArgument> {
        if items.is_empty() {
            return Err(InvalidArgument::EmptyChoice);
        }
        let idx = self.next_int(0, items.len() as i64 - 1) as usize;
        Ok(&items[idx])
    }

    /// Choose an element of `items` with probability proportional to its weight.
    /// Zero-weight entries are never chosen.
    pub fn next_weighted<'a, T>(
        &mut self,
        items: &'a [(T, f64)],
    ) -> Result<&'a T, InvalidArgument> {
        if items.is_empty() {
            return Err(InvalidArgument::EmptyChoice);
        }
        if items.iter().any(|(_, w)| !w.is_finite() || *w < 0.0) {
            return Err(InvalidArgument::InvalidWeights);
        }
        let total: f64 = items.iter().map(|(_, w)| w).sum();
        if !(total > 0.0) {
            return Err(InvalidArgument::InvalidWeights);
        }
        let mut target = self.next() * total;
        let mut last = None;
        for (item, weight) in items {
            if *weight <= 0.0 {
                continue;
            }
            if target < *weight {
                return Ok(item);
            }
            target -= weight;
            last = Some(item);
        }
        // Float accumulation can leave a sliver past the final bucket.
        last.ok_or(InvalidArgument::InvalidWeights)
    }

    /// Advance the xorshift64* state and return the next output word.
    fn step(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        self.draws += 1;
        x.wrapping_mul(XORSHIFT_STAR_MULTIPLIER)
    }
}

/// Scramble the seed with splitmix64 so nearby seeds start far apart.
fn initial_state(seed: u64) -> u64 {
    let mut z = seed.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    match z ^ (z >> 31) {
        0 => NONZERO_STATE,
        state => state,
    }
}

impl RngCore for DeterministicRng {
    fn next_u32(&mut self) -> u32 {
        (self.step() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.step()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.step().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    #[test]
    fn reset_replays_the_sequence() {
        let mut rng = DeterministicRng::new(42);
        let first: Vec<f64> = (0..16).map(|_| rng.next()).collect();
        rng.reset();
        assert_eq!(rng.draws(), 0);
        let second: Vec<f64> = (0..16).map(|_| rng.next()).collect();
        assert_eq!(first, second);
        assert_eq!(rng.seed(), 42);
    }

    #[test]
    fn seed_zero_is_usable() {
        let mut rng = DeterministicRng::new(0);
        let values: Vec<u64> = (0..4).map(|_| rng.next_u64()).collect();
        assert!(values.iter().any(|&v| v != 0));
    }

    #[test]
    fn next_int_equal_bounds_consumes_one_draw() {
        let mut rng = DeterministicRng::new(7);
        assert_eq!(rng.next_int(5, 5), 5);
        assert_eq!(rng.draws(), 1);
    }

    #[test]
    fn next_int_covers_full_range() {
        let mut rng = DeterministicRng::new(99);
        let mut seen = [false; 4];
        for _ in 0..500 {
            let v = rng.next_int(-1, 2);
            assert!((-1..=2).contains(&v));
            seen[(v + 1) as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn inverted_range_is_rejected() {
        let mut rng = DeterministicRng::new(1);
        assert_eq!(
            rng.try_next_int(3, 2),
            Err(InvalidArgument::InvertedRange { min: 3, max: 2 })
        );
    }

    #[test]
    fn choice_from_empty_fails() {
        let mut rng = DeterministicRng::new(1);
        let empty: [u8; 0] = [];
        assert_eq!(rng.next_choice(&empty), Err(InvalidArgument::EmptyChoice));
    }

    #[test]
    fn weighted_choice_skips_zero_weights() {
        let mut rng = DeterministicRng::new(3);
        let items = [("never", 0.0), ("always", 2.5)];
        for _ in 0..100 {
            assert_eq!(*rng.next_weighted(&items).unwrap(), "always");
        }
        assert_eq!(
            rng.next_weighted(&[("a", 0.0)]),
            Err(InvalidArgument::InvalidWeights)
        );
        assert_eq!(
            rng.next_weighted(&[("a", -1.0), ("b", 3.0)]),
            Err(InvalidArgument::InvalidWeights)
        );
    }

    #[test]
    fn boolean_is_roughly_fair() {
        let mut rng = DeterministicRng::new(2024);
        let trues = (0..10_000).filter(|_| rng.next_boolean()).count();
        assert!(trues > 4_500 && trues < 5_500, "got {} trues", trues);
    }

    proptest! {
        #[test]
        fn equal_seeds_agree(seed in any::<u64>(), n in 0usize..200) {
            let mut a = DeterministicRng::new(seed);
            let mut b = DeterministicRng::new(seed);
            for _ in 0..n {
                prop_assert_eq!(a.next().to_bits(), b.next().to_bits());
            }
        }

        #[test]
        fn clone_reproduces_future(seed in any::<u64>(), skip in 0usize..50, n in 1usize..100) {
            let mut original = DeterministicRng::new(seed);
            for _ in 0..skip {
                original.next();
            }
            let mut copy = original.clone();
            for _ in 0..n {
                prop_assert_eq!(original.next_u64(), copy.next_u64());
            }
            prop_assert_eq!(copy.seed(), seed);
        }

        #[test]
        fn unit_float_in_range(seed in any::<u64>()) {
            let mut rng = DeterministicRng::new(seed);
            for _ in 0..64 {
                let v = rng.next();
                prop_assert!((0.0..1.0).contains(&v));
            }
        }
    }
}
