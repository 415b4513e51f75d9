use crate::dft::ntt::Table;
use crate::error::{Error, Result};
use crate::modulus::barrett::Barrett;
use crate::modulus::montgomery::Montgomery;
use crate::modulus::prime::Prime;
use crate::modulus::VectorOperations;
use crate::modulus::{BARRETT, REDUCEMOD};
use crate::poly::Poly;
use crate::ring::Ring;
use crate::CHUNK;
use num_bigint::BigInt;
use num_integer::Integer;

impl Ring<u64> {
    /// Returns Z_q[X]/(X^n+1).
    /// Fails if n is not a power of two greater than one, if q is not
    /// a prime or if q != 1 mod 2n.
    pub fn new(n: usize, q: u64) -> Result<Self> {
        if n < 2 || n & (n - 1) != 0 {
            return Err(Error::InvalidRingDegree(n));
        }
        let prime: Prime<u64> = Prime::<u64>::new(q)?;
        Ok(Self {
            n,
            modulus: prime.clone(),
            dft: Box::new(Table::<u64>::new(prime, (2 * n) as u64)?),
        })
    }

    /// Returns 5^k mod 2n, or -5^k mod 2n if conjugate is set.
    /// k is taken modulo n/2, the order of 5 in (Z/2nZ)^*.
    pub fn galois_element(&self, k: i64, conjugate: bool) -> u64 {
        let two_n: u64 = self.cyclotomic_order();
        let mask: u64 = two_n - 1;
        let order: i64 = (self.n >> 1).max(1) as i64;
        let mut exponent: u64 = k.rem_euclid(order) as u64;
        let mut base: u64 = 5;
        let mut gal_el: u64 = 1;
        while exponent > 0 {
            if exponent & 1 == 1 {
                gal_el = gal_el.wrapping_mul(base) & mask;
            }
            base = base.wrapping_mul(base) & mask;
            exponent >>= 1;
        }
        if conjugate {
            two_n - gal_el
        } else {
            gal_el
        }
    }

    /// Writes coeffs[i] mod q at a[i * step].
    pub fn from_bigint(&self, coeffs: &[BigInt], step: usize, a: &mut Poly<u64>) {
        assert!(
            step > 0 && step <= a.n(),
            "invalid step: step={} not in [1, a.n()={}]",
            step,
            a.n()
        );
        assert!(
            coeffs.len() <= a.n() / step,
            "invalid coeffs: coeffs.len()={} > a.n()/step={}",
            coeffs.len(),
            a.n() / step
        );
        a.0.iter_mut()
            .step_by(step)
            .zip(coeffs.iter())
            .for_each(|(v, c)| *v = self.bigint_mod_q(c));
    }

    /// Writes x mod q on every coefficient, x given in [-q/2, q/2] or [0, q).
    pub fn from_i64(&self, coeffs: &[i64], a: &mut Poly<u64>) {
        assert!(
            coeffs.len() == a.n(),
            "invalid coeffs: coeffs.len()={} != a.n()={}",
            coeffs.len(),
            a.n()
        );
        let q: i64 = self.modulus.q as i64;
        a.0.iter_mut()
            .zip(coeffs.iter())
            .for_each(|(v, c)| *v = c.rem_euclid(q) as u64);
    }
}

impl Ring<u64> {
    pub fn ntt_inplace<const LAZY: bool>(&self, poly: &mut Poly<u64>) {
        match LAZY {
            true => self.dft.forward_inplace_lazy(&mut poly.0),
            false => self.dft.forward_inplace(&mut poly.0),
        }
    }

    pub fn intt_inplace<const LAZY: bool>(&self, poly: &mut Poly<u64>) {
        match LAZY {
            true => self.dft.backward_inplace_lazy(&mut poly.0),
            false => self.dft.backward_inplace(&mut poly.0),
        }
    }

    pub fn ntt<const LAZY: bool>(&self, poly_in: &Poly<u64>, poly_out: &mut Poly<u64>) {
        poly_out.0.copy_from_slice(&poly_in.0);
        self.ntt_inplace::<LAZY>(poly_out);
    }

    pub fn intt<const LAZY: bool>(&self, poly_in: &Poly<u64>, poly_out: &mut Poly<u64>) {
        poly_out.0.copy_from_slice(&poly_in.0);
        self.intt_inplace::<LAZY>(poly_out);
    }

    /// Forward NTT with Montgomery twiddle multiplications.
    pub fn ntt_montgomery_inplace(&self, poly: &mut Poly<u64>) {
        self.dft.forward_inplace_montgomery(&mut poly.0)
    }

    /// Inverse NTT with Montgomery twiddle multiplications.
    pub fn intt_montgomery_inplace(&self, poly: &mut Poly<u64>) {
        self.dft.backward_inplace_montgomery(&mut poly.0)
    }
}

impl Ring<u64> {
    #[inline(always)]
    pub fn reduce_inplace<const REDUCE: REDUCEMOD>(&self, a: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        self.modulus.va_reduce_into_va::<CHUNK, REDUCE>(&mut a.0);
    }

    #[inline(always)]
    pub fn reduce<const REDUCE: REDUCEMOD>(&self, a: &Poly<u64>, b: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        self.modulus.va_reduce_into_vb::<CHUNK, REDUCE>(&a.0, &mut b.0);
    }

    #[inline(always)]
    pub fn add_inplace<const REDUCE: REDUCEMOD>(&self, a: &Poly<u64>, b: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        self.modulus
            .va_add_vb_into_vb::<CHUNK, REDUCE>(&a.0, &mut b.0);
    }

    #[inline(always)]
    pub fn add<const REDUCE: REDUCEMOD>(&self, a: &Poly<u64>, b: &Poly<u64>, c: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        debug_assert!(c.n() == self.n(), "c.n()={} != n={}", c.n(), self.n());
        self.modulus
            .va_add_vb_into_vc::<CHUNK, REDUCE>(&a.0, &b.0, &mut c.0);
    }

    #[inline(always)]
    pub fn add_scalar_inplace<const REDUCE: REDUCEMOD>(&self, b: &u64, a: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        self.modulus.va_add_sb_into_va::<CHUNK, REDUCE>(b, &mut a.0);
    }

    #[inline(always)]
    pub fn add_scalar<const REDUCE: REDUCEMOD>(&self, a: &Poly<u64>, b: &u64, c: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(c.n() == self.n(), "c.n()={} != n={}", c.n(), self.n());
        self.modulus
            .va_add_sb_into_vc::<CHUNK, REDUCE>(&a.0, b, &mut c.0);
    }

    /// c <- a + BRANGE*q - b.
    #[inline(always)]
    pub fn sub<const BRANGE: u8, const REDUCE: REDUCEMOD>(
        &self,
        a: &Poly<u64>,
        b: &Poly<u64>,
        c: &mut Poly<u64>,
    ) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        debug_assert!(c.n() == self.n(), "c.n()={} != n={}", c.n(), self.n());
        self.modulus
            .va_sub_vb_into_vc::<CHUNK, BRANGE, REDUCE>(&a.0, &b.0, &mut c.0);
    }

    /// b <- b + ARANGE*q - a.
    #[inline(always)]
    pub fn sub_inplace<const ARANGE: u8, const REDUCE: REDUCEMOD>(
        &self,
        a: &Poly<u64>,
        b: &mut Poly<u64>,
    ) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        self.modulus
            .va_sub_vb_into_va::<CHUNK, ARANGE, REDUCE>(&a.0, &mut b.0);
    }

    #[inline(always)]
    pub fn neg<const ARANGE: u8, const REDUCE: REDUCEMOD>(&self, a: &Poly<u64>, b: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        self.modulus
            .va_neg_into_vb::<CHUNK, ARANGE, REDUCE>(&a.0, &mut b.0);
    }

    #[inline(always)]
    pub fn neg_inplace<const ARANGE: u8, const REDUCE: REDUCEMOD>(&self, a: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        self.modulus.va_neg_into_va::<CHUNK, ARANGE, REDUCE>(&mut a.0);
    }

    #[inline(always)]
    pub fn prepare_montgomery<const REDUCE: REDUCEMOD>(
        &self,
        a: &Poly<u64>,
        b: &mut Poly<Montgomery<u64>>,
    ) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        self.modulus
            .va_prepare_montgomery_into_vb::<CHUNK, REDUCE>(&a.0, &mut b.0);
    }

    #[inline(always)]
    pub fn prepare_montgomery_inplace<const REDUCE: REDUCEMOD>(&self, a: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        self.modulus
            .va_prepare_montgomery_into_va::<CHUNK, REDUCE>(&mut a.0);
    }

    #[inline(always)]
    pub fn unprepare_montgomery_inplace<const REDUCE: REDUCEMOD>(&self, a: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        self.modulus
            .va_unprepare_montgomery_into_va::<CHUNK, REDUCE>(&mut a.0);
    }

    #[inline(always)]
    pub fn mul_montgomery_external<const REDUCE: REDUCEMOD>(
        &self,
        a: &Poly<Montgomery<u64>>,
        b: &Poly<u64>,
        c: &mut Poly<u64>,
    ) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        debug_assert!(c.n() == self.n(), "c.n()={} != n={}", c.n(), self.n());
        self.modulus
            .va_mul_vb_montgomery_into_vc::<CHUNK, REDUCE>(&a.0, &b.0, &mut c.0);
    }

    /// c <- c + a * b.
    #[inline(always)]
    pub fn mul_montgomery_external_add<const REDUCE1: REDUCEMOD, const REDUCE2: REDUCEMOD>(
        &self,
        a: &Poly<Montgomery<u64>>,
        b: &Poly<u64>,
        c: &mut Poly<u64>,
    ) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        debug_assert!(c.n() == self.n(), "c.n()={} != n={}", c.n(), self.n());
        self.modulus
            .va_mul_vb_montgomery_add_vc_into_vc::<CHUNK, REDUCE1, REDUCE2>(&a.0, &b.0, &mut c.0);
    }

    #[inline(always)]
    pub fn mul_montgomery_external_inplace<const REDUCE: REDUCEMOD>(
        &self,
        a: &Poly<Montgomery<u64>>,
        b: &mut Poly<u64>,
    ) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        self.modulus
            .va_mul_vb_montgomery_into_va::<CHUNK, REDUCE>(&a.0, &mut b.0);
    }

    #[inline(always)]
    pub fn mul_scalar<const REDUCE: REDUCEMOD>(&self, a: &Poly<u64>, b: &u64, c: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(c.n() == self.n(), "c.n()={} != n={}", c.n(), self.n());
        let b_barrett: Barrett<u64> = self
            .modulus
            .barrett
            .prepare(self.modulus.barrett.reduce::<BARRETT>(b));
        self.modulus
            .va_mul_sb_barrett_into_vc::<CHUNK, REDUCE>(&a.0, &b_barrett, &mut c.0);
    }

    #[inline(always)]
    pub fn mul_scalar_inplace<const REDUCE: REDUCEMOD>(&self, b: &u64, a: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        let b_barrett: Barrett<u64> = self
            .modulus
            .barrett
            .prepare(self.modulus.barrett.reduce::<BARRETT>(b));
        self.modulus
            .va_mul_sb_barrett_into_va::<CHUNK, REDUCE>(&b_barrett, &mut a.0);
    }

    /// c <- a * b, for an arbitrary big integer b.
    pub fn mul_scalar_bigint<const REDUCE: REDUCEMOD>(
        &self,
        a: &Poly<u64>,
        b: &BigInt,
        c: &mut Poly<u64>,
    ) {
        let b_barrett: Barrett<u64> = self.modulus.barrett.prepare(self.bigint_mod_q(b));
        self.mul_scalar_barrett::<REDUCE>(a, &b_barrett, c);
    }

    pub fn mul_scalar_bigint_inplace<const REDUCE: REDUCEMOD>(&self, b: &BigInt, a: &mut Poly<u64>) {
        let b_barrett: Barrett<u64> = self.modulus.barrett.prepare(self.bigint_mod_q(b));
        self.mul_scalar_barrett_inplace::<REDUCE>(&b_barrett, a);
    }

    /// Returns b mod q in [0, q).
    fn bigint_mod_q(&self, b: &BigInt) -> u64 {
        let (_, digits) = b.mod_floor(&BigInt::from(self.modulus.q)).to_u64_digits();
        digits.first().copied().unwrap_or(0)
    }

    #[inline(always)]
    pub fn mul_scalar_barrett_inplace<const REDUCE: REDUCEMOD>(
        &self,
        b: &Barrett<u64>,
        a: &mut Poly<u64>,
    ) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        self.modulus
            .va_mul_sb_barrett_into_va::<CHUNK, REDUCE>(b, &mut a.0);
    }

    #[inline(always)]
    pub fn mul_scalar_barrett<const REDUCE: REDUCEMOD>(
        &self,
        a: &Poly<u64>,
        b: &Barrett<u64>,
        c: &mut Poly<u64>,
    ) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(c.n() == self.n(), "c.n()={} != n={}", c.n(), self.n());
        self.modulus
            .va_mul_sb_barrett_into_vc::<CHUNK, REDUCE>(&a.0, b, &mut c.0);
    }

    /// d <- (a + BRANGE*q - b) * c.
    #[inline(always)]
    pub fn a_sub_b_mul_c_scalar_barrett<const BRANGE: u8, const REDUCE: REDUCEMOD>(
        &self,
        a: &Poly<u64>,
        b: &Poly<u64>,
        c: &Barrett<u64>,
        d: &mut Poly<u64>,
    ) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        debug_assert!(d.n() == self.n(), "d.n()={} != n={}", d.n(), self.n());
        self.modulus
            .va_sub_vb_mul_sc_barrett_into_vd::<CHUNK, BRANGE, REDUCE>(&a.0, &b.0, c, &mut d.0);
    }

    /// a <- (a + BRANGE*q - b) * c.
    #[inline(always)]
    pub fn a_sub_b_mul_c_scalar_barrett_inplace<const BRANGE: u8, const REDUCE: REDUCEMOD>(
        &self,
        b: &Poly<u64>,
        c: &Barrett<u64>,
        a: &mut Poly<u64>,
    ) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        self.modulus
            .va_sub_vb_mul_sc_barrett_into_va::<CHUNK, BRANGE, REDUCE>(&b.0, c, &mut a.0);
    }
}
