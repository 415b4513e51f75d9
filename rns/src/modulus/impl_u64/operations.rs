use crate::modulus::barrett::Barrett;
use crate::modulus::montgomery::Montgomery;
use crate::modulus::prime::Prime;
use crate::modulus::{ScalarOperations, VectorOperations};
use crate::modulus::{REDUCEMOD, NONE};
use crate::{apply_sv, apply_v, apply_vsv, apply_vv, apply_vvsv, apply_vvv};

impl Prime<u64> {
    /// Returns RANGE * q.
    #[inline(always)]
    fn range<const RANGE: u8>(&self) -> u64 {
        match RANGE {
            1 => self.q,
            2 => self.two_q,
            4 => self.four_q,
            _ => unreachable!("invalid RANGE argument: must be 1, 2 or 4"),
        }
    }
}

impl ScalarOperations<u64> for Prime<u64> {
    /// Applies a modular reduction on x based on REDUCE:
    /// - NONE: no modular reduction.
    /// - ONCE: subtracts q if x >= q.
    /// - TWICE: subtracts 2q if x >= 2q.
    /// - FOURTIMES: subtracts 4q if x >= 4q.
    /// - BARRETT: maps x to x mod q using Barrett reduction.
    /// - BARRETTLAZY: maps x to x mod q using Barrett reduction with values in [0, 2q-1].
    #[inline(always)]
    fn sa_reduce_into_sa<const REDUCE: REDUCEMOD>(&self, a: &mut u64) {
        self.barrett.reduce_assign::<REDUCE>(a);
    }

    #[inline(always)]
    fn sa_reduce_into_sb<const REDUCE: REDUCEMOD>(&self, a: &u64, b: &mut u64) {
        *b = self.barrett.reduce::<REDUCE>(a);
    }

    #[inline(always)]
    fn sa_add_sb_into_sc<const REDUCE: REDUCEMOD>(&self, a: &u64, b: &u64, c: &mut u64) {
        *c = a.wrapping_add(*b);
        self.sa_reduce_into_sa::<REDUCE>(c);
    }

    #[inline(always)]
    fn sa_add_sb_into_sb<const REDUCE: REDUCEMOD>(&self, a: &u64, b: &mut u64) {
        *b = a.wrapping_add(*b);
        self.sa_reduce_into_sa::<REDUCE>(b);
    }

    #[inline(always)]
    fn sa_sub_sb_into_sc<const SBRANGE: u8, const REDUCE: REDUCEMOD>(&self, a: &u64, b: &u64, c: &mut u64) {
        *c = a.wrapping_add(self.range::<SBRANGE>().wrapping_sub(*b));
        self.sa_reduce_into_sa::<REDUCE>(c);
    }

    #[inline(always)]
    fn sa_sub_sb_into_sb<const SBRANGE: u8, const REDUCE: REDUCEMOD>(&self, a: &u64, b: &mut u64) {
        *b = a.wrapping_add(self.range::<SBRANGE>().wrapping_sub(*b));
        self.sa_reduce_into_sa::<REDUCE>(b);
    }

    #[inline(always)]
    fn sa_sub_sb_into_sa<const SBRANGE: u8, const REDUCE: REDUCEMOD>(&self, b: &u64, a: &mut u64) {
        *a = a.wrapping_add(self.range::<SBRANGE>().wrapping_sub(*b));
        self.sa_reduce_into_sa::<REDUCE>(a);
    }

    #[inline(always)]
    fn sa_neg_into_sa<const SARANGE: u8, const REDUCE: REDUCEMOD>(&self, a: &mut u64) {
        *a = self.range::<SARANGE>().wrapping_sub(*a);
        self.sa_reduce_into_sa::<REDUCE>(a)
    }

    #[inline(always)]
    fn sa_neg_into_sb<const SARANGE: u8, const REDUCE: REDUCEMOD>(&self, a: &u64, b: &mut u64) {
        *b = self.range::<SARANGE>().wrapping_sub(*a);
        self.sa_reduce_into_sa::<REDUCE>(b)
    }

    #[inline(always)]
    fn sa_prepare_montgomery_into_sa<const REDUCE: REDUCEMOD>(&self, a: &mut Montgomery<u64>) {
        let x: u64 = *a;
        self.montgomery.prepare_assign::<REDUCE>(x, a);
    }

    #[inline(always)]
    fn sa_prepare_montgomery_into_sb<const REDUCE: REDUCEMOD>(&self, a: &u64, b: &mut Montgomery<u64>) {
        self.montgomery.prepare_assign::<REDUCE>(*a, b);
    }

    #[inline(always)]
    fn sa_unprepare_montgomery_into_sa<const REDUCE: REDUCEMOD>(&self, a: &mut Montgomery<u64>) {
        let x: u64 = *a;
        self.montgomery.unprepare_assign::<REDUCE>(x, a);
    }

    #[inline(always)]
    fn sa_mul_sb_montgomery_into_sc<const REDUCE: REDUCEMOD>(
        &self,
        a: &Montgomery<u64>,
        b: &u64,
        c: &mut u64,
    ) {
        *c = self.montgomery.mul_external::<REDUCE>(*a, *b);
    }

    #[inline(always)]
    fn sa_mul_sb_montgomery_add_sc_into_sc<const REDUCE1: REDUCEMOD, const REDUCE2: REDUCEMOD>(
        &self,
        a: &Montgomery<u64>,
        b: &u64,
        c: &mut u64,
    ) {
        *c += self.montgomery.mul_external::<REDUCE1>(*a, *b);
        self.sa_reduce_into_sa::<REDUCE2>(c);
    }

    #[inline(always)]
    fn sa_mul_sb_montgomery_into_sa<const REDUCE: REDUCEMOD>(&self, b: &Montgomery<u64>, a: &mut u64) {
        self.montgomery.mul_external_assign::<REDUCE>(*b, a);
    }

    #[inline(always)]
    fn sa_mul_sb_barrett_into_sc<const REDUCE: REDUCEMOD>(&self, a: &u64, b: &Barrett<u64>, c: &mut u64) {
        *c = self.barrett.mul_external::<REDUCE>(b, a);
    }

    #[inline(always)]
    fn sa_mul_sb_barrett_into_sa<const REDUCE: REDUCEMOD>(&self, b: &Barrett<u64>, a: &mut u64) {
        self.barrett.mul_external_assign::<REDUCE>(b, a);
    }

    #[inline(always)]
    fn sa_sub_sb_mul_sc_barrett_into_sd<const SBRANGE: u8, const REDUCE: REDUCEMOD>(
        &self,
        a: &u64,
        b: &u64,
        c: &Barrett<u64>,
        d: &mut u64,
    ) {
        self.sa_sub_sb_into_sc::<SBRANGE, NONE>(a, b, d);
        self.barrett.mul_external_assign::<REDUCE>(c, d);
    }

    #[inline(always)]
    fn sa_sub_sb_mul_sc_barrett_into_sa<const SBRANGE: u8, const REDUCE: REDUCEMOD>(
        &self,
        b: &u64,
        c: &Barrett<u64>,
        a: &mut u64,
    ) {
        self.sa_sub_sb_into_sa::<SBRANGE, NONE>(b, a);
        self.barrett.mul_external_assign::<REDUCE>(c, a);
    }
}

impl VectorOperations<u64> for Prime<u64> {
    #[inline(always)]
    fn va_reduce_into_va<const CHUNK: usize, const REDUCE: REDUCEMOD>(&self, a: &mut [u64]) {
        apply_v!(self, Self::sa_reduce_into_sa::<REDUCE>, a, CHUNK);
    }

    #[inline(always)]
    fn va_reduce_into_vb<const CHUNK: usize, const REDUCE: REDUCEMOD>(&self, a: &[u64], b: &mut [u64]) {
        apply_vv!(self, Self::sa_reduce_into_sb::<REDUCE>, a, b, CHUNK);
    }

    #[inline(always)]
    fn va_add_vb_into_vc<const CHUNK: usize, const REDUCE: REDUCEMOD>(
        &self,
        a: &[u64],
        b: &[u64],
        c: &mut [u64],
    ) {
        apply_vvv!(self, Self::sa_add_sb_into_sc::<REDUCE>, a, b, c, CHUNK);
    }

    #[inline(always)]
    fn va_add_vb_into_vb<const CHUNK: usize, const REDUCE: REDUCEMOD>(&self, a: &[u64], b: &mut [u64]) {
        apply_vv!(self, Self::sa_add_sb_into_sb::<REDUCE>, a, b, CHUNK);
    }

    #[inline(always)]
    fn va_add_sb_into_vc<const CHUNK: usize, const REDUCE: REDUCEMOD>(
        &self,
        a: &[u64],
        b: &u64,
        c: &mut [u64],
    ) {
        apply_vsv!(self, Self::sa_add_sb_into_sc::<REDUCE>, a, b, c, CHUNK);
    }

    #[inline(always)]
    fn va_add_sb_into_va<const CHUNK: usize, const REDUCE: REDUCEMOD>(&self, b: &u64, a: &mut [u64]) {
        apply_sv!(self, Self::sa_add_sb_into_sb::<REDUCE>, b, a, CHUNK);
    }

    #[inline(always)]
    fn va_sub_vb_into_vc<const CHUNK: usize, const VBRANGE: u8, const REDUCE: REDUCEMOD>(
        &self,
        a: &[u64],
        b: &[u64],
        c: &mut [u64],
    ) {
        apply_vvv!(self, Self::sa_sub_sb_into_sc::<VBRANGE, REDUCE>, a, b, c, CHUNK);
    }

    #[inline(always)]
    fn va_sub_vb_into_vb<const CHUNK: usize, const VBRANGE: u8, const REDUCE: REDUCEMOD>(
        &self,
        a: &[u64],
        b: &mut [u64],
    ) {
        apply_vv!(self, Self::sa_sub_sb_into_sb::<VBRANGE, REDUCE>, a, b, CHUNK);
    }

    #[inline(always)]
    fn va_sub_vb_into_va<const CHUNK: usize, const VBRANGE: u8, const REDUCE: REDUCEMOD>(
        &self,
        b: &[u64],
        a: &mut [u64],
    ) {
        apply_vv!(self, Self::sa_sub_sb_into_sa::<VBRANGE, REDUCE>, b, a, CHUNK);
    }

    #[inline(always)]
    fn va_neg_into_va<const CHUNK: usize, const VARANGE: u8, const REDUCE: REDUCEMOD>(&self, a: &mut [u64]) {
        apply_v!(self, Self::sa_neg_into_sa::<VARANGE, REDUCE>, a, CHUNK);
    }

    #[inline(always)]
    fn va_neg_into_vb<const CHUNK: usize, const VARANGE: u8, const REDUCE: REDUCEMOD>(
        &self,
        a: &[u64],
        b: &mut [u64],
    ) {
        apply_vv!(self, Self::sa_neg_into_sb::<VARANGE, REDUCE>, a, b, CHUNK);
    }

    #[inline(always)]
    fn va_prepare_montgomery_into_va<const CHUNK: usize, const REDUCE: REDUCEMOD>(
        &self,
        a: &mut [Montgomery<u64>],
    ) {
        apply_v!(self, Self::sa_prepare_montgomery_into_sa::<REDUCE>, a, CHUNK);
    }

    #[inline(always)]
    fn va_prepare_montgomery_into_vb<const CHUNK: usize, const REDUCE: REDUCEMOD>(
        &self,
        a: &[u64],
        b: &mut [Montgomery<u64>],
    ) {
        apply_vv!(self, Self::sa_prepare_montgomery_into_sb::<REDUCE>, a, b, CHUNK);
    }

    #[inline(always)]
    fn va_unprepare_montgomery_into_va<const CHUNK: usize, const REDUCE: REDUCEMOD>(
        &self,
        a: &mut [Montgomery<u64>],
    ) {
        apply_v!(self, Self::sa_unprepare_montgomery_into_sa::<REDUCE>, a, CHUNK);
    }

    #[inline(always)]
    fn va_mul_vb_montgomery_into_vc<const CHUNK: usize, const REDUCE: REDUCEMOD>(
        &self,
        a: &[Montgomery<u64>],
        b: &[u64],
        c: &mut [u64],
    ) {
        apply_vvv!(self, Self::sa_mul_sb_montgomery_into_sc::<REDUCE>, a, b, c, CHUNK);
    }

    #[inline(always)]
    fn va_mul_vb_montgomery_add_vc_into_vc<
        const CHUNK: usize,
        const REDUCE1: REDUCEMOD,
        const REDUCE2: REDUCEMOD,
    >(
        &self,
        a: &[Montgomery<u64>],
        b: &[u64],
        c: &mut [u64],
    ) {
        apply_vvv!(
            self,
            Self::sa_mul_sb_montgomery_add_sc_into_sc::<REDUCE1, REDUCE2>,
            a,
            b,
            c,
            CHUNK
        );
    }

    #[inline(always)]
    fn va_mul_vb_montgomery_into_va<const CHUNK: usize, const REDUCE: REDUCEMOD>(
        &self,
        b: &[Montgomery<u64>],
        a: &mut [u64],
    ) {
        apply_vv!(self, Self::sa_mul_sb_montgomery_into_sa::<REDUCE>, b, a, CHUNK);
    }

    #[inline(always)]
    fn va_mul_sb_barrett_into_va<const CHUNK: usize, const REDUCE: REDUCEMOD>(
        &self,
        b: &Barrett<u64>,
        a: &mut [u64],
    ) {
        apply_sv!(self, Self::sa_mul_sb_barrett_into_sa::<REDUCE>, b, a, CHUNK);
    }

    #[inline(always)]
    fn va_mul_sb_barrett_into_vc<const CHUNK: usize, const REDUCE: REDUCEMOD>(
        &self,
        a: &[u64],
        b: &Barrett<u64>,
        c: &mut [u64],
    ) {
        apply_vsv!(self, Self::sa_mul_sb_barrett_into_sc::<REDUCE>, a, b, c, CHUNK);
    }

    #[inline(always)]
    fn va_sub_vb_mul_sc_barrett_into_vd<const CHUNK: usize, const VBRANGE: u8, const REDUCE: REDUCEMOD>(
        &self,
        a: &[u64],
        b: &[u64],
        c: &Barrett<u64>,
        d: &mut [u64],
    ) {
        apply_vvsv!(
            self,
            Self::sa_sub_sb_mul_sc_barrett_into_sd::<VBRANGE, REDUCE>,
            a,
            b,
            c,
            d,
            CHUNK
        );
    }

    #[inline(always)]
    fn va_sub_vb_mul_sc_barrett_into_va<const CHUNK: usize, const VBRANGE: u8, const REDUCE: REDUCEMOD>(
        &self,
        b: &[u64],
        c: &Barrett<u64>,
        a: &mut [u64],
    ) {
        apply_vsv!(
            self,
            Self::sa_sub_sb_mul_sc_barrett_into_sa::<VBRANGE, REDUCE>,
            b,
            c,
            a,
            CHUNK
        );
    }
}
