use crate::dft::DFT;
use crate::error::{Error, Result};
use crate::modulus::barrett::Barrett;
use crate::modulus::montgomery::Montgomery;
use crate::modulus::prime::Prime;
use crate::modulus::ReduceOnce;
use crate::modulus::WordOps;
use crate::modulus::{NONE, ONCE};
use itertools::izip;

/// A twiddle factor in both Shoup (Barrett) and Montgomery form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Twiddle(Barrett<u64>, Montgomery<u64>);

pub struct Table<O> {
    prime: Prime<O>,
    n: usize,
    psi: O,
    psi_forward_rev: Vec<Twiddle>,
    psi_backward_rev: Vec<Twiddle>,
    n_inv: Twiddle,
    // psi^-1 * n^-1, twiddle of the fused last backward layer
    psi_n_inv: Twiddle,
    q: O,
    two_q: O,
    four_q: O,
}

impl Table<u64> {
    /// Builds the tables of the negacyclic NTT of size nth_root/2 modulo prime.
    pub fn new(prime: Prime<u64>, nth_root: u64) -> Result<Table<u64>> {
        if nth_root < 4 || nth_root & (nth_root - 1) != 0 {
            return Err(Error::InvalidRingDegree((nth_root >> 1) as usize));
        }

        let psi: u64 = prime.primitive_nth_root(nth_root)?;

        let psi_mont: Montgomery<u64> = prime.montgomery.prepare::<ONCE>(psi);
        let psi_inv_mont: Montgomery<u64> = prime.montgomery.pow(psi_mont, prime.phi - 1);

        let n: usize = (nth_root >> 1) as usize;
        let log_n: u32 = n.log2() as _;

        let one: Twiddle = Self::twiddle(&prime, 1);
        let mut psi_forward_rev: Vec<Twiddle> = vec![one; n];
        let mut psi_backward_rev: Vec<Twiddle> = vec![one; n];

        let mut powers_forward: u64 = 1u64;
        let mut powers_backward: u64 = 1u64;

        for i in 1..n {
            let i_rev: usize = i.reverse_bits_msb(log_n);

            prime
                .montgomery
                .mul_external_assign::<ONCE>(psi_mont, &mut powers_forward);
            prime
                .montgomery
                .mul_external_assign::<ONCE>(psi_inv_mont, &mut powers_backward);

            psi_forward_rev[i_rev] = Self::twiddle(&prime, powers_forward);
            psi_backward_rev[i_rev] = Self::twiddle(&prime, powers_backward);
        }

        let n_inv: u64 = prime.inv(n as u64);
        let psi_n_inv: u64 = prime.barrett.mul_reduce::<ONCE>(n_inv, psi_backward_rev[1].0 .0);

        let q: u64 = prime.q();

        Ok(Self {
            n_inv: Self::twiddle(&prime, n_inv),
            psi_n_inv: Self::twiddle(&prime, psi_n_inv),
            prime,
            n,
            psi,
            psi_forward_rev,
            psi_backward_rev,
            q,
            two_q: q << 1,
            four_q: q << 2,
        })
    }

    fn twiddle(prime: &Prime<u64>, x: u64) -> Twiddle {
        Twiddle(
            prime.barrett.prepare(x),
            prime.montgomery.prepare::<ONCE>(x),
        )
    }

    pub fn n(&self) -> usize {
        self.n
    }

    /// Returns the primitive 2n-th root of unity the table is built on.
    pub fn psi(&self) -> u64 {
        self.psi
    }

    pub fn prime(&self) -> &Prime<u64> {
        &self.prime
    }

    #[inline(always)]
    fn mul_twiddle<const MONTGOMERY: bool, const REDUCE: u8>(&self, t: &Twiddle, x: u64) -> u64 {
        if MONTGOMERY {
            self.prime.montgomery.mul_external::<REDUCE>(t.1, x)
        } else {
            self.prime.barrett.mul_external::<REDUCE>(&t.0, &x)
        }
    }
}

impl DFT<u64> for Table<u64> {
    fn forward_inplace(&self, a: &mut [u64]) {
        self.forward_inplace_core::<false, false>(a)
    }

    fn forward_inplace_lazy(&self, a: &mut [u64]) {
        self.forward_inplace_core::<true, false>(a)
    }

    fn backward_inplace(&self, a: &mut [u64]) {
        self.backward_inplace_core::<false, false>(a)
    }

    fn backward_inplace_lazy(&self, a: &mut [u64]) {
        self.backward_inplace_core::<true, false>(a)
    }

    fn forward_inplace_montgomery(&self, a: &mut [u64]) {
        self.forward_inplace_core::<false, true>(a)
    }

    fn backward_inplace_montgomery(&self, a: &mut [u64]) {
        self.backward_inplace_core::<false, true>(a)
    }
}

impl Table<u64> {
    /// Cooley-Tukey decimation in time, bit-reversed output order.
    pub fn forward_inplace_core<const LAZY: bool, const MONTGOMERY: bool>(&self, a: &mut [u64]) {
        assert!(
            a.len() == self.n,
            "invalid a.len()={} != n={}",
            a.len(),
            self.n
        );

        let log_n: usize = self.n.log2();

        for layer in 0..log_n {
            let (m, size) = (1 << layer, 1 << (log_n - layer - 1));
            let t: usize = 2 * size;
            if layer == log_n - 1 {
                izip!(a.chunks_exact_mut(2), &self.psi_forward_rev[m..]).for_each(|(a, psi)| {
                    let (a, b) = a.split_at_mut(1);
                    self.dit_inplace::<false, MONTGOMERY>(&mut a[0], &mut b[0], psi);
                    if !LAZY {
                        a[0].reduce_once_assign(self.q);
                        b[0].reduce_once_assign(self.q);
                    }
                });
            } else if size >= 8 {
                izip!(a.chunks_exact_mut(t), &self.psi_forward_rev[m..]).for_each(|(a, psi)| {
                    let (a, b) = a.split_at_mut(size);
                    izip!(a.chunks_exact_mut(8), b.chunks_exact_mut(8)).for_each(|(a, b)| {
                        self.dit_inplace::<true, MONTGOMERY>(&mut a[0], &mut b[0], psi);
                        self.dit_inplace::<true, MONTGOMERY>(&mut a[1], &mut b[1], psi);
                        self.dit_inplace::<true, MONTGOMERY>(&mut a[2], &mut b[2], psi);
                        self.dit_inplace::<true, MONTGOMERY>(&mut a[3], &mut b[3], psi);
                        self.dit_inplace::<true, MONTGOMERY>(&mut a[4], &mut b[4], psi);
                        self.dit_inplace::<true, MONTGOMERY>(&mut a[5], &mut b[5], psi);
                        self.dit_inplace::<true, MONTGOMERY>(&mut a[6], &mut b[6], psi);
                        self.dit_inplace::<true, MONTGOMERY>(&mut a[7], &mut b[7], psi);
                    });
                });
            } else {
                izip!(a.chunks_exact_mut(t), &self.psi_forward_rev[m..]).for_each(|(a, psi)| {
                    let (a, b) = a.split_at_mut(size);
                    izip!(a, b).for_each(|(a, b)| self.dit_inplace::<true, MONTGOMERY>(a, b, psi));
                });
            }
        }

        debug_assert!(
            a.iter().all(|x| *x < self.two_q),
            "forward_inplace_core output not in [0, 2q)"
        );
    }

    /// (a, b) <- (a + b*psi, a - b*psi), inputs in [0, 4q).
    /// Outputs are in [0, 4q) if LAZY else in [0, 2q).
    #[inline(always)]
    fn dit_inplace<const LAZY: bool, const MONTGOMERY: bool>(
        &self,
        a: &mut u64,
        b: &mut u64,
        psi: &Twiddle,
    ) {
        debug_assert!(*a < self.four_q, "a:{} 4q:{}", a, self.four_q);
        debug_assert!(*b < self.four_q, "b:{} 4q:{}", b, self.four_q);
        a.reduce_once_assign(self.two_q);
        let bt: u64 = self.mul_twiddle::<MONTGOMERY, NONE>(psi, *b);
        *b = *a + self.two_q - bt;
        *a += bt;
        if !LAZY {
            a.reduce_once_assign(self.two_q);
            b.reduce_once_assign(self.two_q);
        }
    }

    /// Gentleman-Sande decimation in frequency, bit-reversed input order.
    /// The scaling by n^-1 is merged in the last layer.
    pub fn backward_inplace_core<const LAZY: bool, const MONTGOMERY: bool>(&self, a: &mut [u64]) {
        assert!(
            a.len() == self.n,
            "invalid a.len()={} != n={}",
            a.len(),
            self.n
        );

        let log_n: usize = self.n.log2();

        for layer in (0..log_n).rev() {
            let (m, size) = (1 << layer, 1 << (log_n - layer - 1));
            let t: usize = 2 * size;
            if layer == 0 {
                let (a, b) = a.split_at_mut(size);
                izip!(a, b).for_each(|(a, b)| self.dif_last_inplace::<LAZY, MONTGOMERY>(a, b));
            } else if size >= 8 {
                izip!(a.chunks_exact_mut(t), &self.psi_backward_rev[m..]).for_each(|(a, psi)| {
                    let (a, b) = a.split_at_mut(size);
                    izip!(a.chunks_exact_mut(8), b.chunks_exact_mut(8)).for_each(|(a, b)| {
                        self.dif_inplace::<MONTGOMERY>(&mut a[0], &mut b[0], psi);
                        self.dif_inplace::<MONTGOMERY>(&mut a[1], &mut b[1], psi);
                        self.dif_inplace::<MONTGOMERY>(&mut a[2], &mut b[2], psi);
                        self.dif_inplace::<MONTGOMERY>(&mut a[3], &mut b[3], psi);
                        self.dif_inplace::<MONTGOMERY>(&mut a[4], &mut b[4], psi);
                        self.dif_inplace::<MONTGOMERY>(&mut a[5], &mut b[5], psi);
                        self.dif_inplace::<MONTGOMERY>(&mut a[6], &mut b[6], psi);
                        self.dif_inplace::<MONTGOMERY>(&mut a[7], &mut b[7], psi);
                    });
                });
            } else {
                izip!(a.chunks_exact_mut(t), &self.psi_backward_rev[m..]).for_each(|(a, psi)| {
                    let (a, b) = a.split_at_mut(size);
                    izip!(a, b).for_each(|(a, b)| self.dif_inplace::<MONTGOMERY>(a, b, psi));
                });
            }
        }
    }

    /// (a, b) <- (a + b, (a - b)*psi), inputs and outputs in [0, 2q).
    #[inline(always)]
    fn dif_inplace<const MONTGOMERY: bool>(&self, a: &mut u64, b: &mut u64, psi: &Twiddle) {
        debug_assert!(*a < self.two_q, "a:{} 2q:{}", a, self.two_q);
        debug_assert!(*b < self.two_q, "b:{} 2q:{}", b, self.two_q);
        let d: u64 = self.mul_twiddle::<MONTGOMERY, NONE>(psi, *a + self.two_q - *b);
        *a += *b;
        a.reduce_once_assign(self.two_q);
        *b = d;
    }

    /// (a, b) <- ((a + b)*n^-1, (a - b)*psi*n^-1).
    #[inline(always)]
    fn dif_last_inplace<const LAZY: bool, const MONTGOMERY: bool>(&self, a: &mut u64, b: &mut u64) {
        debug_assert!(*a < self.two_q, "a:{} 2q:{}", a, self.two_q);
        debug_assert!(*b < self.two_q, "b:{} 2q:{}", b, self.two_q);
        let (sum, diff) = (*a + *b, *a + self.two_q - *b);
        if LAZY {
            *a = self.mul_twiddle::<MONTGOMERY, NONE>(&self.n_inv, sum);
            *b = self.mul_twiddle::<MONTGOMERY, NONE>(&self.psi_n_inv, diff);
        } else {
            *a = self.mul_twiddle::<MONTGOMERY, ONCE>(&self.n_inv, sum);
            *b = self.mul_twiddle::<MONTGOMERY, ONCE>(&self.psi_n_inv, diff);
        }
    }
}
