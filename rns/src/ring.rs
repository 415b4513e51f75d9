pub mod impl_u64;

use crate::dft::DFT;
use crate::modulus::prime::Prime;
use crate::modulus::WordOps;
use crate::poly::{Poly, PolyRNS};
use std::sync::Arc;

/// Z_q[X]/(X^n+1) for a single NTT-friendly prime q.
pub struct Ring<O> {
    pub n: usize,
    pub modulus: Prime<O>,
    pub dft: Box<dyn DFT<O>>,
}

impl<O> Ring<O> {
    pub fn log_n(&self) -> usize {
        self.n().log2()
    }

    pub fn n(&self) -> usize {
        self.n
    }

    /// Returns 2n.
    pub fn cyclotomic_order(&self) -> u64 {
        (self.n << 1) as u64
    }

    pub fn new_poly(&self) -> Poly<u64> {
        Poly::<u64>::new(self.n())
    }
}

/// Z_Q[X]/(X^n+1) with Q the product of the limb moduli.
/// Limbs are shared, so that sub-rings at lower levels are cheap to build.
#[derive(Clone)]
pub struct RingRNS<O>(pub Vec<Arc<Ring<O>>>);

impl<O> RingRNS<O> {
    pub fn log_n(&self) -> usize {
        self.n().log2()
    }

    pub fn n(&self) -> usize {
        self.0[0].n()
    }

    pub fn new_polyrns(&self) -> PolyRNS<u64> {
        PolyRNS::<u64>::new(self.n(), self.level())
    }

    pub fn new_poly(&self) -> Poly<u64> {
        Poly::<u64>::new(self.n())
    }

    pub fn max_level(&self) -> usize {
        self.0.len() - 1
    }

    pub fn level(&self) -> usize {
        self.0.len() - 1
    }

    /// Returns the ring made of the first level+1 limbs.
    /// Panics if level > self.level().
    pub fn at_level_unchecked(&self, level: usize) -> RingRNS<O> {
        assert!(
            level <= self.level(),
            "invalid argument level: level={} > self.level()={}",
            level,
            self.level()
        );
        RingRNS(self.0[..level + 1].to_vec())
    }
}
