use crate::error::{Error, Result};
use crate::poly_qp::RingQP;
use fnv::FnvHashMap;
use rns::modulus::prime_generator::NTTFriendlyPrimesGenerator;
use rns::modulus::MAX_MODULUS_BITS;
use rns::ring::RingRNS;
use std::sync::Arc;
use tracing::debug;

pub const DEFAULT_SIGMA: f64 = 3.2;
pub use rns::MAX_LOG_N;

/// User facing description of a parameter set.
#[derive(Clone, Debug, PartialEq)]
pub struct ParametersLiteral {
    pub log_n: usize,
    /// ciphertext moduli q_0, ..., q_L
    pub q: Vec<u64>,
    /// key-switching moduli p_0, ..., p_K
    pub p: Vec<u64>,
    /// standard deviation of the error distribution
    pub sigma: f64,
    /// errors are resampled until their magnitude is at most noise_bound
    pub noise_bound: f64,
    /// Hamming weight of the secret, or 0 for a uniform ternary secret
    pub h: usize,
}

impl ParametersLiteral {
    /// Draws NTT-friendly primes of the requested bit sizes for Q and P.
    /// Primes of the same size are taken in order from a shared generator,
    /// so that Q and P never share a modulus.
    pub fn from_bit_sizes(
        log_n: usize,
        log_q: &[u64],
        log_p: &[u64],
        sigma: f64,
        h: usize,
    ) -> Result<Self> {
        check_log_n(log_n)?;
        let nth_root: u64 = 2 << log_n;
        let mut generators: FnvHashMap<u64, NTTFriendlyPrimesGenerator> = FnvHashMap::default();
        let mut next = |bit_size: u64| -> Result<u64> {
            if bit_size > MAX_MODULUS_BITS as u64 || (1u64 << bit_size) <= nth_root {
                return Err(Error::InvalidParameters(format!(
                    "no {}-bit NTT-friendly primes for n={}",
                    bit_size,
                    1 << log_n
                )));
            }
            let generator = generators
                .entry(bit_size)
                .or_insert_with(|| NTTFriendlyPrimesGenerator::new(bit_size, nth_root));
            Ok(generator.next_alternating_prime()?.q)
        };
        let q: Vec<u64> = log_q.iter().map(|b| next(*b)).collect::<Result<_>>()?;
        let p: Vec<u64> = log_p.iter().map(|b| next(*b)).collect::<Result<_>>()?;
        Ok(Self {
            log_n,
            q,
            p,
            sigma,
            noise_bound: 6.0 * sigma,
            h,
        })
    }
}

fn check_log_n(log_n: usize) -> Result<()> {
    if log_n == 0 || log_n > MAX_LOG_N {
        return Err(Error::InvalidParameters(format!(
            "log_n={} not in [1, {}]",
            log_n, MAX_LOG_N
        )));
    }
    Ok(())
}

/// Immutable parameter set. Cloning shares the rings.
#[derive(Clone)]
pub struct Parameters {
    log_n: usize,
    ring_q: Arc<RingRNS<u64>>,
    ring_p: Arc<RingRNS<u64>>,
    sigma: f64,
    noise_bound: f64,
    h: usize,
}

impl Parameters {
    pub fn new(literal: &ParametersLiteral) -> Result<Self> {
        if literal.sigma <= 0.0 || literal.sigma.is_nan() {
            return Err(Error::InvalidParameters(format!(
                "sigma={} must be positive",
                literal.sigma
            )));
        }
        if literal.noise_bound < literal.sigma {
            return Err(Error::InvalidParameters(format!(
                "noise_bound={} < sigma={}",
                literal.noise_bound, literal.sigma
            )));
        }
        check_log_n(literal.log_n)?;
        let n: usize = 1 << literal.log_n;
        if literal.h > n {
            return Err(Error::InvalidParameters(format!(
                "hamming weight h={} > n={}",
                literal.h, n
            )));
        }
        if literal.p.len() > u8::MAX as usize || literal.q.len() > u8::MAX as usize {
            return Err(Error::InvalidParameters(
                "at most 255 moduli per chain".to_string(),
            ));
        }
        if let Some(p) = literal.p.iter().find(|p| literal.q.contains(p)) {
            return Err(rns::Error::OverlappingBases(*p).into());
        }

        let ring_q: RingRNS<u64> = RingRNS::new(n, literal.q.clone())?;
        let ring_p: RingRNS<u64> = RingRNS::new(n, literal.p.clone())?;

        debug!(
            log_n = literal.log_n,
            level_q = ring_q.level(),
            level_p = ring_p.level(),
            sigma = literal.sigma,
            "new Parameters"
        );

        Ok(Self {
            log_n: literal.log_n,
            ring_q: Arc::new(ring_q),
            ring_p: Arc::new(ring_p),
            sigma: literal.sigma,
            noise_bound: literal.noise_bound,
            h: literal.h,
        })
    }

    pub fn n(&self) -> usize {
        1 << self.log_n
    }

    pub fn log_n(&self) -> usize {
        self.log_n
    }

    pub fn ring_q(&self) -> &Arc<RingRNS<u64>> {
        &self.ring_q
    }

    pub fn ring_p(&self) -> &Arc<RingRNS<u64>> {
        &self.ring_p
    }

    pub fn ring_qp(&self) -> RingQP {
        RingQP {
            ring_q: self.ring_q.clone(),
            ring_p: self.ring_p.clone(),
        }
    }

    /// Returns the level of the full Q chain.
    pub fn max_level(&self) -> usize {
        self.ring_q.level()
    }

    pub fn max_level_p(&self) -> usize {
        self.ring_p.level()
    }

    /// Number of limbs of P, which is also the number of limbs per digit.
    pub fn alpha(&self) -> usize {
        self.ring_p.level() + 1
    }

    /// Number of digits of the decomposition at the given level of Q.
    pub fn beta(&self, level: usize) -> usize {
        (level + 1).div_ceil(self.alpha())
    }

    pub fn max_beta(&self) -> usize {
        self.beta(self.max_level())
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn noise_bound(&self) -> f64 {
        self.noise_bound
    }

    pub fn h(&self) -> usize {
        self.h
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal() -> ParametersLiteral {
        ParametersLiteral {
            log_n: 4,
            q: vec![0x1fffffffffe00001, 0x1fffffffffc80001, 0x1fffffffffb40001],
            p: vec![0x1fffffffff500001, 0x1fffffffff420001],
            sigma: DEFAULT_SIGMA,
            noise_bound: 19.2,
            h: 8,
        }
    }

    #[test]
    fn digits() {
        let params: Parameters = Parameters::new(&literal()).unwrap();
        assert_eq!(params.n(), 16);
        assert_eq!(params.alpha(), 2);
        assert_eq!(params.beta(0), 1);
        assert_eq!(params.beta(1), 1);
        assert_eq!(params.beta(2), 2);
        assert_eq!(params.max_beta(), 2);
    }

    #[test]
    fn from_bit_sizes_is_disjoint() {
        let literal: ParametersLiteral =
            ParametersLiteral::from_bit_sizes(5, &[50, 40, 40], &[50, 50], DEFAULT_SIGMA, 0)
                .unwrap();
        let mut all: Vec<u64> = [literal.q.clone(), literal.p.clone()].concat();
        assert!(all.iter().all(|q| q % 64 == 1));
        all.sort();
        all.dedup();
        assert_eq!(all.len(), 5);
        assert!(Parameters::new(&literal).is_ok());
    }

    #[test]
    fn invalid_parameters() {
        let mut overlapping: ParametersLiteral = literal();
        overlapping.p[0] = overlapping.q[1];
        assert!(matches!(
            Parameters::new(&overlapping),
            Err(Error::Rns(rns::Error::OverlappingBases(_)))
        ));

        let mut bad_sigma: ParametersLiteral = literal();
        bad_sigma.sigma = 0.0;
        assert!(matches!(
            Parameters::new(&bad_sigma),
            Err(Error::InvalidParameters(_))
        ));

        let mut empty_p: ParametersLiteral = literal();
        empty_p.p.clear();
        assert!(matches!(
            Parameters::new(&empty_p),
            Err(Error::Rns(rns::Error::EmptyModuli))
        ));
    }
}
