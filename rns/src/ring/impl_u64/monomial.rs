use crate::modulus::montgomery::Montgomery;
use crate::modulus::ONCE;
use crate::poly::{Poly, PolyRNS};
use crate::ring::{Ring, RingRNS};

impl Ring<u64> {
    /// a <- a * X^k mod X^n+1, for any k (taken modulo 2n).
    /// If NTT is set, a is expected in the NTT domain.
    pub fn mul_by_monomial_inplace<const NTT: bool>(&self, k: i64, a: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        if NTT {
            let x_k: Poly<Montgomery<u64>> = self.monomial_ntt(k);
            self.mul_montgomery_external_inplace::<ONCE>(&x_k, a);
        } else {
            self.shift_negacyclic(k, a);
        }
    }

    /// b <- a * X^k mod X^n+1.
    pub fn mul_by_monomial<const NTT: bool>(&self, a: &Poly<u64>, k: i64, b: &mut Poly<u64>) {
        b.copy_from(a);
        self.mul_by_monomial_inplace::<NTT>(k, b);
    }

    /// X^k -> X^(k+i), with X^n = -1.
    fn shift_negacyclic(&self, k: i64, a: &mut Poly<u64>) {
        let n: usize = self.n();
        let mut k: usize = k.rem_euclid(2 * n as i64) as usize;
        let q: u64 = self.modulus.q;
        let neg = |x: &mut u64| {
            if *x != 0 {
                *x = q - *x
            }
        };
        if k >= n {
            a.0.iter_mut().for_each(neg);
            k -= n;
        }
        a.0.rotate_right(k);
        a.0[..k].iter_mut().for_each(neg);
    }

    /// Returns X^k in the NTT domain and in Montgomery form.
    fn monomial_ntt(&self, k: i64) -> Poly<Montgomery<u64>> {
        let mut x_k: Poly<u64> = self.new_poly();
        x_k.0[0] = 1;
        self.shift_negacyclic(k, &mut x_k);
        self.ntt_inplace::<false>(&mut x_k);
        self.prepare_montgomery_inplace::<ONCE>(&mut x_k);
        x_k
    }
}

impl RingRNS<u64> {
    pub fn mul_by_monomial_inplace<const NTT: bool>(&self, k: i64, a: &mut PolyRNS<u64>) {
        assert!(
            a.level() >= self.level(),
            "a.level()={} < self.level()={}",
            a.level(),
            self.level()
        );
        self.0
            .iter()
            .enumerate()
            .for_each(|(i, ring)| ring.mul_by_monomial_inplace::<NTT>(k, a.at_mut(i)));
    }

    pub fn mul_by_monomial<const NTT: bool>(&self, a: &PolyRNS<u64>, k: i64, b: &mut PolyRNS<u64>) {
        assert!(
            a.level() >= self.level(),
            "a.level()={} < self.level()={}",
            a.level(),
            self.level()
        );
        assert!(
            b.level() >= self.level(),
            "b.level()={} < self.level()={}",
            b.level(),
            self.level()
        );
        self.0
            .iter()
            .enumerate()
            .for_each(|(i, ring)| ring.mul_by_monomial::<NTT>(a.at(i), k, b.at_mut(i)));
        b.is_ntt = a.is_ntt;
        b.is_montgomery = a.is_montgomery;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sampling::source::Source;

    #[test]
    fn negacyclic_shift() {
        let ring: Ring<u64> = Ring::new(4, 17).unwrap();
        let a: Poly<u64> = Poly(vec![1, 2, 0, 4]);
        let mut b: Poly<u64> = ring.new_poly();

        ring.mul_by_monomial::<false>(&a, 1, &mut b);
        assert_eq!(b.0, vec![13, 1, 2, 0]);
        ring.mul_by_monomial::<false>(&a, 4, &mut b);
        assert_eq!(b.0, vec![16, 15, 0, 13]);
        ring.mul_by_monomial::<false>(&a, -1, &mut b);
        assert_eq!(b.0, vec![2, 0, 4, 16]);
        ring.mul_by_monomial::<false>(&a, 8, &mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn monomial_products_compose() {
        let ring: RingRNS<u64> =
            RingRNS::new(32, vec![0x1fffffffffe00001, 0x1fffffffffc80001]).unwrap();
        let mut source: Source = Source::new([3u8; 32]);
        let mut a: PolyRNS<u64> = ring.new_polyrns();
        ring.fill_uniform(&mut source, &mut a);

        let mut want: PolyRNS<u64> = ring.new_polyrns();
        ring.mul_by_monomial::<false>(&a, 9, &mut want);
        let mut have: PolyRNS<u64> = ring.new_polyrns();
        ring.mul_by_monomial::<false>(&a, 1, &mut have);
        ring.mul_by_monomial_inplace::<false>(8, &mut have);
        assert_eq!(want, have);

        ring.mul_by_monomial_inplace::<false>(-9, &mut have);
        assert_eq!(a, have);

        // X^(n+5) = -X^5, in both domains
        let mut a_ntt: PolyRNS<u64> = ring.new_polyrns();
        ring.ntt::<false>(&a, &mut a_ntt);
        ring.mul_by_monomial_inplace::<true>(32 + 5, &mut a_ntt);
        ring.intt_inplace::<false>(&mut a_ntt);
        ring.mul_by_monomial::<false>(&a, 32 + 5, &mut want);
        assert_eq!(want.polys, a_ntt.polys);
    }
}
