use crate::automorphism::AutoPerm;
use crate::modulus::WordOps;
use crate::poly::{Poly, PolyRNS};
use crate::ring::{Ring, RingRNS};

impl Ring<u64> {
    /// b <- a(X^gal_el).
    /// If NTT is set, a is expected in the NTT domain (bit-reversed order).
    pub fn automorphism<const NTT: bool>(&self, a: &Poly<u64>, gal_el: u64, b: &mut Poly<u64>) {
        debug_assert!(
            a.n() == b.n(),
            "invalid inputs: a.n() = {} != b.n() = {}",
            a.n(),
            b.n()
        );
        assert!(
            gal_el & 1 == 1,
            "invalid gal_el={}: not coprime with 2n={}",
            gal_el,
            self.cyclotomic_order()
        );

        let n: usize = self.n();
        let log_n: usize = self.log_n();
        let mask: usize = 2 * n - 1;
        let g: usize = gal_el as usize & mask;
        let b_vec: &mut Vec<u64> = &mut b.0;
        let a_vec: &Vec<u64> = &a.0;

        if NTT {
            b_vec.iter_mut().enumerate().for_each(|(j, bj)| {
                let j_rev: usize = 2 * j.reverse_bits_msb(log_n as u32) + 1;
                let idx: usize = ((g * j_rev) & mask) >> 1;
                *bj = a_vec[idx.reverse_bits_msb(log_n as u32)];
            });
        } else {
            let q: u64 = self.modulus.q();
            a_vec.iter().enumerate().for_each(|(i, ai)| {
                let gal_el_i: usize = (i * g) & mask;
                let i_out: usize = gal_el_i & (n - 1);
                if gal_el_i >> log_n == 1 && *ai != 0 {
                    b_vec[i_out] = q - ai
                } else {
                    b_vec[i_out] = *ai
                }
            });
        }
    }

    /// b <- a(X^gal_el) using a precomputed table.
    pub fn automorphism_from_perm<const NTT: bool>(
        &self,
        a: &Poly<u64>,
        perm: &AutoPerm,
        b: &mut Poly<u64>,
    ) {
        debug_assert!(
            a.n() == b.n(),
            "invalid inputs: a.n() = {} != b.n() = {}",
            a.n(),
            b.n()
        );
        assert!(
            perm.ntt == NTT,
            "invalid perm: built for ntt={} but applied with NTT={}",
            perm.ntt,
            NTT
        );

        let b_vec: &mut Vec<u64> = &mut b.0;
        let a_vec: &Vec<u64> = &a.0;

        if NTT {
            b_vec
                .iter_mut()
                .zip(perm.permutation.iter())
                .for_each(|(bj, idx)| *bj = a_vec[*idx]);
        } else {
            let mask: usize = self.n() - 1;
            let q: u64 = self.modulus.q();
            a_vec
                .iter()
                .zip(perm.permutation.iter())
                .for_each(|(ai, idx)| {
                    let negate: bool = idx >> (usize::BITS - 1) == 1 && *ai != 0;
                    b_vec[idx & mask] = if negate { q - ai } else { *ai };
                });
        }
    }
}

impl RingRNS<u64> {
    pub fn automorphism<const NTT: bool>(&self, a: &PolyRNS<u64>, gal_el: u64, b: &mut PolyRNS<u64>) {
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
            .for_each(|(i, ring)| ring.automorphism::<NTT>(a.at(i), gal_el, b.at_mut(i)));
        b.is_ntt = a.is_ntt;
        b.is_montgomery = a.is_montgomery;
    }

    pub fn automorphism_from_perm<const NTT: bool>(
        &self,
        a: &PolyRNS<u64>,
        perm: &AutoPerm,
        b: &mut PolyRNS<u64>,
    ) {
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
            .for_each(|(i, ring)| ring.automorphism_from_perm::<NTT>(a.at(i), perm, b.at_mut(i)));
        b.is_ntt = a.is_ntt;
        b.is_montgomery = a.is_montgomery;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coefficient_automorphism_maps_zero_to_zero() {
        let ring: Ring<u64> = Ring::new(4, 17).unwrap();
        let a: Poly<u64> = Poly(vec![0, 0, 3, 5]);
        let mut b: Poly<u64> = ring.new_poly();
        // X^2 -> X^10 = X^2, X^3 -> X^15 = -X^3
        ring.automorphism::<false>(&a, 5, &mut b);
        assert_eq!(b.0, vec![0, 0, 3, 12]);

        let perm: AutoPerm = AutoPerm::new::<false>(4, 5);
        let mut c: Poly<u64> = ring.new_poly();
        ring.automorphism_from_perm::<false>(&a, &perm, &mut c);
        assert_eq!(b, c);
    }

    #[test]
    fn inverse_galois_element_undoes_automorphism() {
        let ring: Ring<u64> = Ring::new(16, 97).unwrap();
        let a: Poly<u64> = Poly((0..16u64).map(|i| (7 * i + 1) % 97).collect());
        let (g, g_inv) = (ring.galois_element(3, false), ring.galois_element(-3, false));
        let mut b: Poly<u64> = ring.new_poly();
        let mut c: Poly<u64> = ring.new_poly();
        ring.automorphism::<false>(&a, g, &mut b);
        ring.automorphism::<false>(&b, g_inv, &mut c);
        assert_eq!(a, c);
    }
}
