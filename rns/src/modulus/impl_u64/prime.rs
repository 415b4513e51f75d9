use crate::error::{Error, Result};
use crate::modulus::barrett::BarrettPrecomp;
use crate::modulus::montgomery::{Montgomery, MontgomeryPrecomp};
use crate::modulus::prime::Prime;
use crate::modulus::{MAX_MODULUS_BITS, ONCE};
use primality_test::is_prime;
use prime_factorization::Factorization;

impl Prime<u64> {
    /// Returns a new instance of Prime<u64>.
    /// Fails if q is not an odd prime or has more than [MAX_MODULUS_BITS] bits.
    pub fn new(q: u64) -> Result<Self> {
        if q < 3 || q & 1 == 0 || !is_prime(q) {
            return Err(Error::NotPrime(q));
        }
        Self::new_unchecked(q)
    }

    /// Returns a new instance of Prime<u64>.
    /// Does not check that q is prime.
    pub fn new_unchecked(q: u64) -> Result<Self> {
        if u64::BITS - q.leading_zeros() > MAX_MODULUS_BITS {
            return Err(Error::ModulusTooLarge {
                q,
                max_bits: MAX_MODULUS_BITS,
            });
        }

        let factors: Vec<u64> = Factorization::run(q - 1)
            .prime_factor_repr()
            .iter()
            .map(|(factor, _)| *factor)
            .collect();

        Ok(Self {
            q,
            two_q: q << 1,
            four_q: q << 2,
            factors,
            montgomery: MontgomeryPrecomp::new(q),
            barrett: BarrettPrecomp::new(q),
            phi: q - 1,
        })
    }

    #[inline(always)]
    pub fn q(&self) -> u64 {
        self.q
    }

    /// Returns x^exponent mod q.
    #[inline(always)]
    pub fn pow(&self, x: u64, exponent: u64) -> u64 {
        let x_mont: Montgomery<u64> = self.montgomery.prepare::<ONCE>(x);
        self.montgomery
            .unprepare::<ONCE>(self.montgomery.pow(x_mont, exponent))
    }

    /// Returns x^-1 mod q.
    /// User must ensure that x is not divisible by q.
    #[inline(always)]
    pub fn inv(&self, x: u64) -> u64 {
        self.pow(x, self.phi - 1)
    }

    /// Returns the smallest generator of the multiplicative group mod q.
    pub fn primitive_root(&self) -> u64 {
        let mut candidate: u64 = 1u64;
        loop {
            candidate += 1;
            if self
                .factors
                .iter()
                .all(|factor| self.pow(candidate, self.phi / factor) != 1)
            {
                return candidate;
            }
        }
    }

    /// Returns a primitive nth_root-th root of unity mod q.
    /// Fails if nth_root is not a power of two dividing q-1.
    pub fn primitive_nth_root(&self, nth_root: u64) -> Result<u64> {
        if nth_root < 2 || nth_root & (nth_root - 1) != 0 || self.phi % nth_root != 0 {
            return Err(Error::NoPrimitiveRoot {
                q: self.q,
                nth_root,
            });
        }

        let psi: u64 = self.pow(self.primitive_root(), self.phi / nth_root);

        debug_assert!(
            self.pow(psi, nth_root) == 1,
            "invalid nth primitive root: psi^nth_root != 1 mod q"
        );
        debug_assert!(
            self.pow(psi, nth_root >> 1) == self.q - 1,
            "invalid nth primitive root: psi^(nth_root/2) != -1 mod q"
        );

        Ok(psi)
    }
}
