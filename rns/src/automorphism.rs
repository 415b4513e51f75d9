use crate::modulus::WordOps;
use fnv::FnvHashMap;

/// Precomputed automorphisms, keyed by Galois element.
#[derive(Default)]
pub struct AutoPermMap(FnvHashMap<u64, AutoPerm>);

impl AutoPermMap {
    pub fn new() -> Self {
        Self(FnvHashMap::default())
    }

    pub fn insert(&mut self, perm: AutoPerm) {
        self.0.insert(perm.gal_el, perm);
    }

    /// Precomputes the automorphism X -> X^gal_el of degree n if absent
    /// and returns gal_el.
    pub fn gen<const NTT: bool>(&mut self, n: usize, gal_el: u64) -> u64 {
        self.0
            .entry(gal_el)
            .or_insert_with(|| AutoPerm::new::<NTT>(n, gal_el));
        gal_el
    }

    pub fn get(&self, gal_el: &u64) -> Option<&AutoPerm> {
        self.0.get(gal_el)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AutoPerm {
    pub gal_el: u64,
    pub ntt: bool,
    pub permutation: Vec<usize>,
}

impl AutoPerm {
    /// Returns a lookup table for the automorphism X^{i} -> X^{i * gal_el mod 2n}.
    ///
    /// In the NTT domain the table is a gather: out[j] = in[permutation[j]].
    /// In the coefficient domain permutation[i] is the destination of
    /// coefficient i, with the top bit set if it must be negated.
    ///
    /// Panics if n is not a power of two or if gal_el is even.
    pub fn new<const NTT: bool>(n: usize, gal_el: u64) -> Self {
        assert!(n & (n - 1) == 0, "invalid n={}: not a power-of-two", n);
        assert!(
            gal_el & 1 == 1,
            "invalid gal_el={}: not coprime with 2n={}",
            gal_el,
            2 * n
        );

        let log_n: usize = n.log2();
        let mask: usize = (2 * n) - 1;
        let g: usize = gal_el as usize & mask;

        let permutation: Vec<usize> = if NTT {
            (0..n)
                .map(|j| {
                    let j_rev: usize = 2 * j.reverse_bits_msb(log_n as u32) + 1;
                    let idx: usize = ((g * j_rev) & mask) >> 1;
                    idx.reverse_bits_msb(log_n as u32)
                })
                .collect()
        } else {
            (0..n)
                .map(|i| {
                    let gal_el_i: usize = (i * g) & mask;
                    let sign: usize = gal_el_i >> log_n;
                    (gal_el_i & (n - 1)) | (sign << (usize::BITS - 1))
                })
                .collect()
        };

        Self {
            gal_el,
            ntt: NTT,
            permutation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ntt_permutation_is_bijective() {
        let n: usize = 64;
        for gal_el in [3u64, 5, 25, 127] {
            let perm: AutoPerm = AutoPerm::new::<true>(n, gal_el);
            let mut seen: Vec<usize> = perm.permutation.clone();
            seen.sort();
            assert_eq!(seen, (0..n).collect::<Vec<usize>>());
        }
    }

    #[test]
    fn coefficient_permutation_signs() {
        // X -> X^5 in Z[X]/(X^4+1): X^1 -> X^5 = -X, X^2 -> X^10 = X^2, X^3 -> X^15 = -X^3
        let perm: AutoPerm = AutoPerm::new::<false>(4, 5);
        let top: usize = 1 << (usize::BITS - 1);
        assert_eq!(perm.permutation, vec![0, 1 | top, 2, 3 | top]);
    }

    #[test]
    fn map_generates_once() {
        let mut map: AutoPermMap = AutoPermMap::new();
        assert_eq!(map.gen::<true>(16, 5), 5);
        assert_eq!(map.gen::<true>(16, 5), 5);
        assert_eq!(map.gen::<true>(16, 31), 31);
        assert_eq!(map.len(), 2);
        assert!(map.get(&5).is_some());
        assert!(map.get(&7).is_none());
    }
}
