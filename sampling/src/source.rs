use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
use rand_core::RngCore;

const MAXF64: f64 = 9007199254740992.0;

/// Deterministic pseudo-random source backed by ChaCha8.
pub struct Source {
    source: ChaCha8Rng,
}

impl Source {
    pub fn new(seed: [u8; 32]) -> Source {
        Source {
            source: ChaCha8Rng::from_seed(seed),
        }
    }

    /// Returns a fresh seed and an independent source seeded with it.
    pub fn branch(&mut self) -> ([u8; 32], Self) {
        let seed: [u8; 32] = self.new_seed();
        (seed, Source::new(seed))
    }

    pub fn new_seed(&mut self) -> [u8; 32] {
        let mut seed: [u8; 32] = [0u8; 32];
        self.fill_bytes(&mut seed);
        seed
    }

    /// Returns a uniform value in [0, max) by rejection sampling on
    /// `next_u64() & mask`. `mask` must cover max-1.
    #[inline(always)]
    pub fn next_u64n(&mut self, max: u64, mask: u64) -> u64 {
        let mut x: u64 = self.next_u64() & mask;
        while x >= max {
            x = self.next_u64() & mask;
        }
        x
    }

    /// Returns a uniform value in [min, max).
    #[inline(always)]
    pub fn next_f64(&mut self, min: f64, max: f64) -> f64 {
        min + ((self.next_u64() << 11 >> 11) as f64) / MAXF64 * (max - min)
    }

    /// Returns -1 or 1 with probability p/2 each and 0 otherwise.
    #[inline(always)]
    pub fn next_ternary(&mut self, p: f64) -> i64 {
        let x: f64 = self.next_f64(0.0, 1.0);
        if x >= p {
            return 0;
        }
        if self.next_u32() & 1 == 1 {
            1
        } else {
            -1
        }
    }

    #[inline(always)]
    pub fn next_i64(&mut self) -> i64 {
        self.next_u64() as i64
    }
}

impl RngCore for Source {
    #[inline(always)]
    fn next_u32(&mut self) -> u32 {
        self.source.next_u32()
    }

    #[inline(always)]
    fn next_u64(&mut self) -> u64 {
        self.source.next_u64()
    }

    #[inline(always)]
    fn fill_bytes(&mut self, bytes: &mut [u8]) {
        self.source.fill_bytes(bytes)
    }
}
