use crate::modulus::WordOps;
use crate::poly::{Poly, PolyRNS};
use crate::ring::{Ring, RingRNS};
use sampling::distributions::Distribution;
use sampling::source::Source;

impl Ring<u64> {
    pub fn fill_uniform(&self, source: &mut Source, a: &mut Poly<u64>) {
        let max: u64 = self.modulus.q;
        let mask: u64 = max.mask();
        a.0.iter_mut()
            .for_each(|a| *a = source.next_u64n(max, mask));
    }

    /// Samples from dist and writes the result modulo q.
    pub fn fill_dist(&self, source: &mut Source, dist: &Distribution, a: &mut Poly<u64>) {
        let mut values: Vec<i64> = vec![0; a.n()];
        dist.sample_into(source, &mut values);
        self.from_i64(&values, a);
    }
}

impl RingRNS<u64> {
    pub fn fill_uniform(&self, source: &mut Source, a: &mut PolyRNS<u64>) {
        self.0
            .iter()
            .enumerate()
            .for_each(|(i, r)| r.fill_uniform(source, a.at_mut(i)));
    }

    /// Samples one small integer polynomial from dist and writes it on every limb.
    pub fn fill_dist(&self, source: &mut Source, dist: &Distribution, a: &mut PolyRNS<u64>) {
        let mut values: Vec<i64> = vec![0; a.n()];
        dist.sample_into(source, &mut values);
        self.from_i64(&values, a);
    }

    /// Writes the small integer polynomial coeffs on every limb of a.
    pub fn from_i64(&self, coeffs: &[i64], a: &mut PolyRNS<u64>) {
        assert!(
            a.level() >= self.level(),
            "a.level()={} < self.level()={}",
            a.level(),
            self.level()
        );
        self.0
            .iter()
            .enumerate()
            .for_each(|(i, r)| r.from_i64(coeffs, a.at_mut(i)));
        a.is_ntt = false;
        a.is_montgomery = false;
    }

    pub fn fill_ternary(&self, source: &mut Source, p: f64, a: &mut PolyRNS<u64>) {
        self.fill_dist(source, &Distribution::Ternary(p), a)
    }

    /// Rounded Gaussian of standard deviation sigma, resampled until |x| <= bound.
    ///
    /// # Panics
    ///
    /// Panics if sigma is negative or NaN. Use [RingRNS::fill_dist] with a
    /// distribution built by [Distribution::gaussian] to handle the error.
    pub fn fill_normal(&self, source: &mut Source, sigma: f64, bound: f64, a: &mut PolyRNS<u64>) {
        let dist: Distribution = Distribution::gaussian(sigma, bound)
            .unwrap_or_else(|err| panic!("invalid sigma={}: {}", sigma, err));
        self.fill_dist(source, &dist, a)
    }
}
