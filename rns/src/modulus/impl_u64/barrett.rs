use crate::modulus::barrett::{Barrett, BarrettPrecomp};
use crate::modulus::ReduceOnce;
use crate::modulus::{BARRETT, BARRETTLAZY, FOURTIMES, NONE, ONCE, REDUCEMOD, TWICE};

impl BarrettPrecomp<u64> {
    pub fn new(q: u64) -> BarrettPrecomp<u64> {
        // q is odd, hence floor((2^128-1)/q) = floor(2^128/q).
        let big_r: u128 = u128::MAX / q as u128;
        let mut precomp: BarrettPrecomp<u64> = Self {
            q,
            two_q: q << 1,
            four_q: q << 2,
            lo: big_r as u64,
            hi: (big_r >> 64) as u64,
            one: Barrett(0, 0),
        };
        precomp.one = precomp.prepare(1);
        precomp
    }

    #[inline(always)]
    pub fn one(&self) -> Barrett<u64> {
        self.one
    }

    /// Applies a modular reduction on x based on REDUCE:
    /// - NONE: no modular reduction.
    /// - ONCE: subtracts q if x >= q.
    /// - TWICE: subtracts 2q if x >= 2q.
    /// - FOURTIMES: subtracts 4q if x >= 4q.
    /// - BARRETT: maps x to x mod q using Barrett reduction.
    /// - BARRETTLAZY: maps x to x mod q using Barrett reduction with values in [0, 2q-1].
    #[inline(always)]
    pub fn reduce_assign<const REDUCE: REDUCEMOD>(&self, x: &mut u64) {
        match REDUCE {
            NONE => {}
            ONCE => x.reduce_once_assign(self.q),
            TWICE => x.reduce_once_assign(self.two_q),
            FOURTIMES => x.reduce_once_assign(self.four_q),
            BARRETT => {
                let mhi: u64 = ((*x as u128 * self.hi as u128) >> 64) as u64;
                *x = x.wrapping_sub(mhi.wrapping_mul(self.q));
                x.reduce_once_assign(self.q);
            }
            BARRETTLAZY => {
                let mhi: u64 = ((*x as u128 * self.hi as u128) >> 64) as u64;
                *x = x.wrapping_sub(mhi.wrapping_mul(self.q));
            }
            _ => unreachable!("invalid REDUCE argument"),
        }
    }

    #[inline(always)]
    pub fn reduce<const REDUCE: REDUCEMOD>(&self, x: &u64) -> u64 {
        let mut r: u64 = *x;
        self.reduce_assign::<REDUCE>(&mut r);
        r
    }

    /// Returns x mod q in [0, 2q-1] for any x < 2^128.
    ///
    /// The quotient floor(x * floor(2^128/q) / 2^128) is computed exactly
    /// and underestimates floor(x/q) by at most one.
    #[inline(always)]
    pub fn reduce_u128_lazy(&self, x: u128) -> u64 {
        let (xhi, xlo) = ((x >> 64) as u64, x as u64);
        let lolo: u128 = (xlo as u128 * self.lo as u128) >> 64;
        // carries out of the middle sum only affect bits >= 64 of t
        let mid: u128 = (xlo as u128 * self.hi as u128)
            .wrapping_add(xhi as u128 * self.lo as u128)
            .wrapping_add(lolo);
        let t: u64 = xhi.wrapping_mul(self.hi).wrapping_add((mid >> 64) as u64);
        xlo.wrapping_sub(t.wrapping_mul(self.q))
    }

    /// Returns x mod q for any x < 2^128.
    #[inline(always)]
    pub fn reduce_u128(&self, x: u128) -> u64 {
        self.reduce_u128_lazy(x).reduce_once(self.q)
    }

    /// Returns a * b mod q using Barrett reduction of the 128-bit product.
    /// Output is in [0, 2q-1] before the reduction selected by REDUCE.
    #[inline(always)]
    pub fn mul_reduce<const REDUCE: REDUCEMOD>(&self, a: u64, b: u64) -> u64 {
        let mut r: u64 = self.reduce_u128_lazy(a as u128 * b as u128);
        self.reduce_assign::<REDUCE>(&mut r);
        r
    }

    /// Returns v with its quotient floor(v * 2^64 / q).
    #[inline(always)]
    pub fn prepare(&self, v: u64) -> Barrett<u64> {
        debug_assert!(v < self.q);
        let quotient: u64 = (((v as u128) << 64) / self.q as u128) as _;
        Barrett(v, quotient)
    }

    /// Returns lhs * rhs mod q for any rhs < 2^64.
    /// Output is in [0, 2q-1] before the reduction selected by REDUCE.
    #[inline(always)]
    pub fn mul_external<const REDUCE: REDUCEMOD>(&self, lhs: &Barrett<u64>, rhs: &u64) -> u64 {
        let mut r: u64 = *rhs;
        self.mul_external_assign::<REDUCE>(lhs, &mut r);
        r
    }

    #[inline(always)]
    pub fn mul_external_assign<const REDUCE: REDUCEMOD>(&self, lhs: &Barrett<u64>, rhs: &mut u64) {
        let t: u64 = ((*lhs.quotient() as u128 * *rhs as u128) >> 64) as _;
        *rhs = (rhs.wrapping_mul(*lhs.value())).wrapping_sub(self.q.wrapping_mul(t));
        self.reduce_assign::<REDUCE>(rhs);
    }
}
