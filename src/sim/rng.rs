//! Seeded random number generator
//!
//! Mulberry32: one 32-bit word of state, advanced by a fixed odd increment and
//! scrambled with xor-shifts and odd multipliers. The whole simulation draws
//! from a single instance, so the order of draws is part of every spawner's
//! contract.

use serde::{Deserialize, Serialize};

/// Seed used when a zero seed is requested
pub const DEFAULT_SEED: u32 = 123_456_789;

const INCREMENT: u32 = 0x6D2B_79F5;
const TWO_POW_32: f64 = 4_294_967_296.0;

/// Deterministic random source shared by every spawner in an episode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeededRng {
    state: u32,
}

impl Default for SeededRng {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl SeededRng {
    pub fn new(seed: u32) -> Self {
        let mut rng = Self { state: 0 };
        rng.set_seed(seed);
        rng
    }

    /// Reset the stream. A zero seed is replaced by [`DEFAULT_SEED`].
    pub fn set_seed(&mut self, seed: u32) {
        self.state = if seed == 0 { DEFAULT_SEED } else { seed };
    }

    /// Uniform float in `[0, 1)`
    pub fn random(&mut self) -> f64 {
        self.state = self.state.wrapping_add(INCREMENT);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        (t ^ (t >> 14)) as f64 / TWO_POW_32
    }

    /// Integer in `[min, max]` inclusive
    pub fn range(&mut self, min: i32, max: i32) -> i32 {
        let span = (max as i64 - min as i64 + 1) as f64;
        ((self.random() * span).floor() as i64 + min as i64) as i32
    }

    /// Uniform float in `[min, max)`
    pub fn float(&mut self, min: f64, max: f64) -> f64 {
        self.random() * (max - min) + min
    }

    /// Pick one element. An empty slice yields `None` and consumes no draw.
    pub fn choice<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let idx = self.range(0, items.len() as i32 - 1) as usize;
        items.get(idx)
    }

    /// Raw state word, for exact replay
    pub fn state(&self) -> u32 {
        self.state
    }

    /// Restore a raw state word captured with [`SeededRng::state`]
    pub fn set_state(&mut self, state: u32) {
        self.state = state;
    }
}

/// Map a seed phrase to a numeric seed (31-multiplier string hash)
pub fn hash_seed(phrase: &str) -> u32 {
    let mut hash: i32 = 0;
    for unit in phrase.encode_utf16() {
        hash = (hash << 5).wrapping_sub(hash).wrapping_add(unit as i32);
    }
    hash.unsigned_abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_same_seed_same_stream() {
        let mut rng = SeededRng::new(42);
        let a = [rng.random(), rng.random(), rng.random()];
        rng.set_seed(42);
        let b = [rng.random(), rng.random(), rng.random()];
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_seed_uses_default() {
        let mut zero = SeededRng::new(0);
        let mut default = SeededRng::new(DEFAULT_SEED);
        assert_eq!(zero.state(), DEFAULT_SEED);
        assert_eq!(zero.random(), default.random());
    }

    #[test]
    fn test_known_first_draw() {
        // mulberry32 seeded with 1 starts at 0.6270739405881613
        let mut rng = SeededRng::new(1);
        assert!((rng.random() - 0.627_073_940_588_161_3).abs() < 1e-12);
    }

    #[test]
    fn test_state_restore_replays() {
        let mut rng = SeededRng::new(7);
        rng.random();
        let saved = rng.state();
        let expected: Vec<f64> = (0..5).map(|_| rng.random()).collect();

        let mut other = SeededRng::new(99);
        other.set_state(saved);
        let replayed: Vec<f64> = (0..5).map(|_| other.random()).collect();
        assert_eq!(expected, replayed);
    }

    #[test]
    fn test_choice_empty() {
        let mut rng = SeededRng::new(5);
        let before = rng.state();
        let empty: [u8; 0] = [];
        assert!(rng.choice(&empty).is_none());
        assert_eq!(rng.state(), before);
    }

    #[test]
    fn test_hash_seed() {
        assert_eq!(hash_seed(""), 0);
        assert_eq!(hash_seed("a"), 97);
        // "ab" = 97 * 31 + 98
        assert_eq!(hash_seed("ab"), 3105);
        assert_eq!(hash_seed("zombies"), hash_seed("zombies"));
    }

    proptest! {
        #[test]
        fn prop_random_in_unit_interval(seed in any::<u32>()) {
            let mut rng = SeededRng::new(seed);
            for _ in 0..32 {
                let x = rng.random();
                prop_assert!((0.0..1.0).contains(&x));
            }
        }

        #[test]
        fn prop_range_inclusive(seed in any::<u32>(), min in -50i32..50, width in 0i32..40) {
            let mut rng = SeededRng::new(seed);
            let max = min + width;
            for _ in 0..32 {
                let v = rng.range(min, max);
                prop_assert!(v >= min && v <= max);
            }
        }
    }
}
