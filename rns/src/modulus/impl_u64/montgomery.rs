use crate::modulus::barrett::BarrettPrecomp;
use crate::modulus::montgomery::{Montgomery, MontgomeryPrecomp};
use crate::modulus::ReduceOnce;
use crate::modulus::{REDUCEMOD, ONCE};

/// MontgomeryPrecomp is a set of methods implemented for MontgomeryPrecomp<u64>
/// enabling Montgomery arithmetic over u64 values.
impl MontgomeryPrecomp<u64> {
    /// Returns an new instance of MontgomeryPrecomp<u64>.
    /// Panics if q is even.
    #[inline(always)]
    pub fn new(q: u64) -> MontgomeryPrecomp<u64> {
        assert!(q & 1 != 0, "invalid argument: gcd(q={}, radix=2^64) != 1", q);
        // q^(2^63 - 1) = q^-1 mod 2^64
        let mut q_inv: u64 = 1;
        let mut q_pow: u64 = q;
        for _i in 0..63 {
            q_inv = q_inv.wrapping_mul(q_pow);
            q_pow = q_pow.wrapping_mul(q_pow);
        }
        let mut precomp = Self {
            q,
            two_q: q << 1,
            four_q: q << 2,
            barrett: BarrettPrecomp::new(q),
            q_inv,
            one: 0,
            minus_one: 0,
        };

        precomp.one = precomp.prepare::<ONCE>(1);
        precomp.minus_one = q - precomp.one;

        precomp
    }

    /// Returns 2^64 mod q as a Montgomery<u64>.
    #[inline(always)]
    pub fn one(&self) -> Montgomery<u64> {
        self.one
    }

    /// Returns (q-1) * 2^64 mod q as a Montgomery<u64>.
    #[inline(always)]
    pub fn minus_one(&self) -> Montgomery<u64> {
        self.minus_one
    }

    #[inline(always)]
    pub fn reduce<const REDUCE: REDUCEMOD>(&self, x: u64) -> u64 {
        let mut r: u64 = x;
        self.reduce_assign::<REDUCE>(&mut r);
        r
    }

    #[inline(always)]
    pub fn reduce_assign<const REDUCE: REDUCEMOD>(&self, x: &mut u64) {
        self.barrett.reduce_assign::<REDUCE>(x)
    }

    /// Returns lhs * 2^64 mod q as a Montgomery<u64>.
    #[inline(always)]
    pub fn prepare<const REDUCE: REDUCEMOD>(&self, lhs: u64) -> Montgomery<u64> {
        let mut rhs: u64 = 0;
        self.prepare_assign::<REDUCE>(lhs, &mut rhs);
        rhs
    }

    /// Assigns lhs * 2^64 mod q to rhs, with lhs < q.
    /// Output is in [0, 2q-1] before the reduction selected by REDUCE.
    #[inline(always)]
    pub fn prepare_assign<const REDUCE: REDUCEMOD>(&self, lhs: u64, rhs: &mut Montgomery<u64>) {
        let mhi: u64 = ((lhs as u128 * *self.barrett.value_lo() as u128) >> 64) as u64;
        *rhs = (lhs.wrapping_mul(*self.barrett.value_hi()).wrapping_add(mhi))
            .wrapping_mul(self.q)
            .wrapping_neg();
        self.reduce_assign::<REDUCE>(rhs);
    }

    /// Returns lhs * (2^64)^-1 mod q as a u64.
    #[inline(always)]
    pub fn unprepare<const REDUCE: REDUCEMOD>(&self, lhs: Montgomery<u64>) -> u64 {
        let mut rhs: u64 = 0u64;
        self.unprepare_assign::<REDUCE>(lhs, &mut rhs);
        rhs
    }

    /// Assigns lhs * (2^64)^-1 mod q to rhs.
    /// Output is in [1, q] before the reduction selected by REDUCE.
    #[inline(always)]
    pub fn unprepare_assign<const REDUCE: REDUCEMOD>(&self, lhs: Montgomery<u64>, rhs: &mut u64) {
        let r: u64 = ((self.q as u128 * lhs.wrapping_mul(self.q_inv) as u128) >> 64) as u64;
        *rhs = self.reduce::<REDUCE>(self.q - r);
    }

    /// Returns lhs * rhs * (2^{64})^-1 mod q.
    #[inline(always)]
    pub fn mul_external<const REDUCE: REDUCEMOD>(&self, lhs: Montgomery<u64>, rhs: u64) -> u64 {
        let mut r: u64 = rhs;
        self.mul_external_assign::<REDUCE>(lhs, &mut r);
        r
    }

    /// Assigns lhs * rhs * (2^{64})^-1 mod q to rhs.
    /// Requires lhs * rhs < q * 2^64; output is in [1, 2q-1] before
    /// the reduction selected by REDUCE.
    #[inline(always)]
    pub fn mul_external_assign<const REDUCE: REDUCEMOD>(&self, lhs: Montgomery<u64>, rhs: &mut u64) {
        let m: u128 = lhs as u128 * *rhs as u128;
        let (mlo, mhi) = (m as u64, (m >> 64) as u64);
        let hhi: u64 = ((self.q as u128 * mlo.wrapping_mul(self.q_inv) as u128) >> 64) as u64;
        *rhs = self.reduce::<REDUCE>(mhi.wrapping_sub(hhi).wrapping_add(self.q));
    }

    /// Returns lhs * rhs * (2^{64})^-1 mod q.
    #[inline(always)]
    pub fn mul_internal<const REDUCE: REDUCEMOD>(
        &self,
        lhs: Montgomery<u64>,
        rhs: Montgomery<u64>,
    ) -> Montgomery<u64> {
        self.mul_external::<REDUCE>(lhs, rhs)
    }

    /// Assigns lhs * rhs * (2^{64})^-1 mod q to rhs.
    #[inline(always)]
    pub fn mul_internal_assign<const REDUCE: REDUCEMOD>(
        &self,
        lhs: Montgomery<u64>,
        rhs: &mut Montgomery<u64>,
    ) {
        self.mul_external_assign::<REDUCE>(lhs, rhs);
    }

    /// Assigns lhs + rhs - q if (lhs + rhs) >= q to rhs.
    #[inline(always)]
    pub fn add_internal_reduce_once_assign(&self, lhs: Montgomery<u64>, rhs: &mut Montgomery<u64>) {
        *rhs += lhs;
        rhs.reduce_once_assign(self.q);
    }

    /// Returns (x^exponent) * 2^64 mod q.
    #[inline(always)]
    pub fn pow(&self, x: Montgomery<u64>, exponent: u64) -> Montgomery<u64> {
        let mut y: Montgomery<u64> = self.one();
        let mut x_mut: Montgomery<u64> = x;
        let mut i: u64 = exponent;
        while i > 0 {
            if i & 1 == 1 {
                self.mul_internal_assign::<ONCE>(x_mut, &mut y);
            }
            self.mul_internal_assign::<ONCE>(x_mut, &mut x_mut);
            i >>= 1;
        }

        y.reduce_once_assign(self.q);
        y
    }
}
