use crate::error::{Error, Result};
use crate::modulus::prime::Prime;
use crate::modulus::MAX_MODULUS_BITS;
use primality_test::is_prime;

/// Enumerates primes q = 1 mod nth_root close to 2^bit_size,
/// upward from 2^bit_size + 1 and downward from 2^bit_size + 1 - nth_root.
pub struct NTTFriendlyPrimesGenerator {
    size: f64,
    bit_size: u64,
    next_prime: u64,
    prev_prime: u64,
    nth_root: u64,
    check_next_prime: bool,
    check_prev_prime: bool,
}

impl NTTFriendlyPrimesGenerator {
    /// Panics if nth_root is not a power of two or if bit_size is
    /// not in [log2(nth_root)+1, MAX_MODULUS_BITS].
    pub fn new(bit_size: u64, nth_root: u64) -> Self {
        assert!(
            nth_root & (nth_root - 1) == 0,
            "invalid nth_root={}: not a power of two",
            nth_root
        );
        assert!(
            bit_size <= MAX_MODULUS_BITS as u64 && (1u64 << bit_size) > nth_root,
            "invalid bit_size={} for nth_root={}",
            bit_size,
            nth_root
        );

        let next_prime: u64 = (1 << bit_size) + 1;
        let prev_prime: u64 = next_prime - nth_root;

        Self {
            size: bit_size as f64,
            bit_size,
            check_next_prime: true,
            check_prev_prime: true,
            nth_root,
            next_prime,
            prev_prime,
        }
    }

    fn exhausted(&self) -> Error {
        Error::PrimesExhausted {
            bit_size: self.bit_size,
            nth_root: self.nth_root,
        }
    }

    fn upstream_in_range(&self) -> bool {
        (self.next_prime as f64).log2() - self.size < 0.5
            && u64::BITS - self.next_prime.leading_zeros() <= MAX_MODULUS_BITS
    }

    fn downstream_in_range(&self) -> bool {
        self.prev_prime > self.nth_root && self.size - (self.prev_prime as f64).log2() < 0.5
    }

    pub fn next_upstream_primes(&mut self, k: usize) -> Result<Vec<Prime<u64>>> {
        (0..k).map(|_| self.next_upstream_prime()).collect()
    }

    pub fn next_downstream_primes(&mut self, k: usize) -> Result<Vec<Prime<u64>>> {
        (0..k).map(|_| self.next_downstream_prime()).collect()
    }

    pub fn next_alternating_primes(&mut self, k: usize) -> Result<Vec<Prime<u64>>> {
        (0..k).map(|_| self.next_alternating_prime()).collect()
    }

    pub fn next_upstream_prime(&mut self) -> Result<Prime<u64>> {
        while self.check_next_prime {
            if !self.upstream_in_range() {
                self.check_next_prime = false;
                break;
            }
            let candidate: u64 = self.next_prime;
            self.next_prime += self.nth_root;
            if is_prime(candidate) {
                return Prime::new_unchecked(candidate);
            }
        }
        Err(self.exhausted())
    }

    pub fn next_downstream_prime(&mut self) -> Result<Prime<u64>> {
        while self.check_prev_prime {
            if !self.downstream_in_range() {
                self.check_prev_prime = false;
                break;
            }
            let candidate: u64 = self.prev_prime;
            self.prev_prime -= self.nth_root;
            if is_prime(candidate) {
                return Prime::new_unchecked(candidate);
            }
        }
        Err(self.exhausted())
    }

    /// Alternates between the upstream and downstream sequences,
    /// falling back on the remaining one once the other is exhausted.
    pub fn next_alternating_prime(&mut self) -> Result<Prime<u64>> {
        loop {
            if !(self.check_next_prime || self.check_prev_prime) {
                return Err(self.exhausted());
            }

            if self.check_next_prime {
                if !self.upstream_in_range() {
                    self.check_next_prime = false;
                } else {
                    let candidate: u64 = self.next_prime;
                    self.next_prime += self.nth_root;
                    if is_prime(candidate) {
                        return Prime::new_unchecked(candidate);
                    }
                }
            }

            if self.check_prev_prime {
                if !self.downstream_in_range() {
                    self.check_prev_prime = false;
                } else {
                    let candidate: u64 = self.prev_prime;
                    self.prev_prime -= self.nth_root;
                    if is_prime(candidate) {
                        return Prime::new_unchecked(candidate);
                    }
                }
            }
        }
    }
}
