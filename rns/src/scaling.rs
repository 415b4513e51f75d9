use crate::error::{Error, Result};
use crate::modulus::barrett::{Barrett, BarrettPrecomp};
use crate::modulus::{ReduceOnce, MAX_MODULUS_BITS, ONCE};
use crate::poly::{Poly, PolyRNS};
use crate::ring::RingRNS;
use num_integer::Integer;
use tracing::{debug, instrument};

/// Scales polynomials of Z_Q[X]/(X^n+1) down to Z_t[X]/(X^n+1):
/// a -> round(t * a / Q) mod t.
///
/// With y_i = [a_i * t * (Q/q_i)^-1]_{q_i} and v = round(sum_i y_i / q_i),
/// sum_i y_i * (Q/q_i) - v * Q is the centered residue r of t * a modulo Q,
/// and round(t * a / Q) = (t * a - r) / Q = v - sum_i y_i * [q_i^-1]_t mod t.
/// v is estimated with floating point arithmetic, as in
/// [RnsConverter](crate::basis_extension::RnsConverter).
pub struct RnsScaler {
    ring: RingRNS<u64>,
    t: BarrettPrecomp<u64>,
    /// [t * (Q/q_i)^-1]_{q_i}
    t_q_hat_inv: Vec<Barrett<u64>>,
    /// [q_i^-1]_t
    q_inv_mod_t: Vec<u64>,
    /// 1/q_i
    q_inv: Vec<f64>,
}

impl RnsScaler {
    /// Fails with [Error::InvalidScalingModulus] if t is even, smaller than 3,
    /// larger than 2^61 or not coprime with Q.
    pub fn new(ring: &RingRNS<u64>, t: u64) -> Result<Self> {
        if t < 3 || t & 1 == 0 || u64::BITS - t.leading_zeros() > MAX_MODULUS_BITS {
            return Err(Error::InvalidScalingModulus(t));
        }

        let q_inv_mod_t: Vec<u64> = ring
            .0
            .iter()
            .map(|r| {
                let qi: i128 = (r.modulus.q % t) as i128;
                let egcd = qi.extended_gcd(&(t as i128));
                if egcd.gcd != 1 {
                    return Err(Error::InvalidScalingModulus(t));
                }
                Ok(egcd.x.rem_euclid(t as i128) as u64)
            })
            .collect::<Result<_>>()?;

        let t_q_hat_inv: Vec<Barrett<u64>> = ring
            .0
            .iter()
            .enumerate()
            .map(|(i, ri)| {
                let prime = &ri.modulus;
                let q_hat: u64 = ring
                    .0
                    .iter()
                    .enumerate()
                    .filter(|(k, _)| *k != i)
                    .fold(1u64, |acc, (_, rk)| {
                        prime.barrett.mul_reduce::<ONCE>(
                            acc,
                            prime.barrett.reduce_u128(rk.modulus.q as u128),
                        )
                    });
                let t_mod_qi: u64 = prime.barrett.reduce_u128(t as u128);
                prime
                    .barrett
                    .prepare(prime.barrett.mul_reduce::<ONCE>(prime.inv(q_hat), t_mod_qi))
            })
            .collect();

        let q_inv: Vec<f64> = ring.0.iter().map(|r| 1.0 / r.modulus.q as f64).collect();

        debug!(t, level = ring.level(), "new RnsScaler");
        Ok(Self {
            ring: ring.clone(),
            t: BarrettPrecomp::new(t),
            t_q_hat_inv,
            q_inv_mod_t,
            q_inv,
        })
    }

    pub fn t(&self) -> u64 {
        self.t.q
    }

    /// b <- round(t * a / Q) mod t, for a in the coefficient domain with
    /// reduced limbs.
    #[instrument(skip_all)]
    pub fn div_by_q_over_t_rounded(&self, a: &PolyRNS<u64>, b: &mut Poly<u64>) {
        let level: usize = self.ring.level();
        assert!(
            a.level() >= level,
            "a.level()={} < self.level()={}",
            a.level(),
            level
        );
        assert!(!a.is_ntt, "invalid argument a: NTT domain");
        assert!(
            b.n() == a.n(),
            "invalid argument b: b.n()={} != a.n()={}",
            b.n(),
            a.n()
        );

        let t: u64 = self.t.q;
        b.0.iter_mut().enumerate().for_each(|(c, bc)| {
            let mut v: f64 = 0.0;
            let mut acc: u128 = 0;
            self.ring.0.iter().enumerate().for_each(|(i, ri)| {
                let y: u64 = ri
                    .modulus
                    .barrett
                    .mul_external::<ONCE>(&self.t_q_hat_inv[i], &a.at(i).0[c]);
                v += y as f64 * self.q_inv[i];
                acc += self
                    .t
                    .reduce_u128(y as u128 * self.q_inv_mod_t[i] as u128) as u128;
            });
            let v: u64 = self.t.reduce_u128(v.round() as u128);
            let s: u64 = self.t.reduce_u128(acc);
            *bc = (v + t - s).reduce_once(t);
        });
    }
}
