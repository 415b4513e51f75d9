use crate::source::Source;
use rand::{Rng, RngCore};
use rand_distr::{Distribution as _, Normal, NormalError};

/// Integer noise distributions used for secrets and errors.
#[derive(Clone, Copy, Debug)]
pub enum Distribution {
    /// Uniform over {-1, 0, 1} with P[x != 0] = p.
    Ternary(f64),
    /// Uniform over {-1, 0, 1}^n with exactly `h` non-zero entries.
    TernaryHw(usize),
    /// Rounded Gaussian, resampled until |x| <= bound.
    Gaussian { normal: Normal<f64>, bound: f64 },
}

impl Distribution {
    pub fn gaussian(sigma: f64, bound: f64) -> Result<Self, NormalError> {
        Ok(Distribution::Gaussian {
            normal: Normal::new(0.0, sigma)?,
            bound,
        })
    }

    /// Fills `out` with independent samples.
    pub fn sample_into(&self, source: &mut Source, out: &mut [i64]) {
        match self {
            Distribution::Ternary(p) => out.iter_mut().for_each(|x| *x = source.next_ternary(*p)),
            Distribution::TernaryHw(h) => {
                let n: usize = out.len();
                assert!(*h <= n, "invalid hamming weight: h={} > n={}", h, n);
                out.fill(0);
                let mut idx: Vec<usize> = (0..n).collect();
                // partial Fisher-Yates over the first h slots
                (0..*h).for_each(|i| {
                    let j: usize = source.random_range(i..n);
                    idx.swap(i, j);
                    out[idx[i]] = if source.next_u32() & 1 == 1 { 1 } else { -1 };
                });
            }
            Distribution::Gaussian { normal, bound } => out.iter_mut().for_each(|x| {
                let mut v: f64 = normal.sample(source);
                while v.abs() > *bound {
                    v = normal.sample(source);
                }
                *x = v.round() as i64;
            }),
        }
    }
}
