//! Pseudorandom probe sequences for bucket lookups
//!
//! Every lookup walks a short, key-dependent sequence of candidate buckets.
//! The candidates come from a tiny noncryptographic generator, Bob Jenkins'
//! "small PRNG" (2007), seeded from the 64-bit key. It has no heap state and
//! one round costs a handful of adds and rotates.
//!
//! Assignments are only consistent across agents if every agent derives the
//! same sequence from the same key, so the seeding, the warm-up and the round
//! function here are a fixed contract. Changing any of them reassigns keys.
//!
//! The generator is exposed as a [`RngCore`] implementation for testing and
//! for callers that want to reproduce probe sequences outside an anchor. It
//! is not suitable for anything that needs unpredictable output.

use rand_core::RngCore;

/// Initial value of the first state word
const SEED_CONSTANT: u32 = 0xf1ea_5eed;

/// Rounds discarded after seeding, before any output is used
const WARMUP_ROUNDS: usize = 3;

/// Deterministic probe generator for one lookup key
///
/// The 64-bit key is folded to a 32-bit seed by XOR of its two halves, so
/// keys that differ only by swapping halves share a probe sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeRng {
    /// Generator state word a
    a: u32,
    /// Generator state word b
    b: u32,
    /// Generator state word c
    c: u32,
    /// Generator state word d, also the most recent output
    d: u32,
}

impl ProbeRng {
    /// Seed a new generator from a lookup key and run its warm-up rounds.
    #[inline(always)]
    pub fn new(key: u64) -> Self {
        let seed = (key as u32) ^ ((key >> 32) as u32);
        let mut rng = Self {
            a: SEED_CONSTANT,
            b: seed,
            c: seed,
            d: seed,
        };
        for _ in 0..WARMUP_ROUNDS {
            rng.round();
        }
        rng
    }

    /// One mixing round, returning the new value of `d`.
    #[inline(always)]
    fn round(&mut self) -> u32 {
        let e = self.a.wrapping_sub(self.b.rotate_left(27));
        self.a = self.b ^ self.c.rotate_left(17);
        self.b = self.c.wrapping_add(self.d);
        self.c = self.d.wrapping_add(e);
        self.d = e.wrapping_add(self.a);
        self.d
    }
}

impl RngCore for ProbeRng {
    /// Run one mixing round and return its 32-bit output.
    #[inline(always)]
    fn next_u32(&mut self) -> u32 {
        self.round()
    }

    /// Combine two rounds, low half first.
    fn next_u64(&mut self) -> u64 {
        rand_core::impls::next_u64_via_u32(self)
    }

    /// Fill `dest` with generator output.
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        rand_core::impls::fill_bytes_via_next(self, dest);
    }
}

/// Reduce a 32-bit probe into `[0, range)` with a multiply and shift.
///
/// This is Lemire's alternative to the modulo reduction: the high half of
/// `value * range`. It is not equal to `value % range`, and it carries a
/// slight bias unless `range` is a power of two. Lookups only need the
/// candidates to be approximately uniform, and they need this to be cheap.
///
/// `range` must be at most 2^32. With `range == 0` the result is 0.
#[inline(always)]
pub fn fast_range(value: u32, range: usize) -> usize {
    debug_assert!((range as u64) <= 1 << 32);
    ((u64::from(value) * range as u64) >> 32) as usize
}
