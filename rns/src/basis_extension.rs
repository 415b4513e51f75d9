use crate::error::{check_level, Error, Result};
use crate::modulus::barrett::Barrett;
use crate::modulus::ONCE;
use crate::poly::{Poly, PolyRNS};
use crate::ring::{Ring, RingRNS};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Basis conversion modes.
pub type CONVERSION = u8;
/// Returns x + e*Q for some 0 <= e < #limbs of Q.
pub const FAST: CONVERSION = 0;
/// Returns x in [0, Q).
pub const EXACT: CONVERSION = 1;
/// Returns x centered in [-Q/2, Q/2).
pub const CENTERED: CONVERSION = 2;

/// Converts polynomials from the basis Q = prod q_i to the basis P = prod p_j.
///
/// With y_i = [x * (Q/q_i)^-1]_{q_i}, x = sum_i y_i * (Q/q_i) - v * Q where
/// v = floor(sum_i y_i / q_i). The exact and centered modes estimate v with
/// floating point arithmetic, which is exact unless x lies within about
/// 2^-50 * Q of the boundary of the selected interval.
pub struct RnsConverter {
    from: Vec<Arc<Ring<u64>>>,
    to: Vec<Arc<Ring<u64>>>,
    /// [(Q/q_i)^-1]_{q_i}
    q_hat_inv: Vec<Barrett<u64>>,
    /// [Q/q_i]_{p_j}, indexed [j][i]
    q_hat_mod_p: Vec<Vec<u64>>,
    /// [Q]_{p_j}
    q_mod_p: Vec<Barrett<u64>>,
    /// 1/q_i
    q_inv: Vec<f64>,
}

impl RnsConverter {
    /// Precomputes the conversion constants from the limbs `from` to the limbs `to`.
    /// The two lists must be made of pairwise coprime moduli.
    pub fn new(from: &[Arc<Ring<u64>>], to: &[Arc<Ring<u64>>]) -> Self {
        assert!(!from.is_empty(), "invalid argument from: empty basis");

        let q_hat_inv: Vec<Barrett<u64>> = from
            .iter()
            .enumerate()
            .map(|(i, ri)| {
                let prime = &ri.modulus;
                let q_hat: u64 = from
                    .iter()
                    .enumerate()
                    .filter(|(k, _)| *k != i)
                    .fold(1u64, |acc, (_, rk)| {
                        prime.barrett.mul_reduce::<ONCE>(
                            acc,
                            prime.barrett.reduce_u128(rk.modulus.q as u128),
                        )
                    });
                prime.barrett.prepare(prime.inv(q_hat))
            })
            .collect();

        let q_hat_mod_p: Vec<Vec<u64>> = to
            .iter()
            .map(|rj| {
                let barrett = &rj.modulus.barrett;
                (0..from.len())
                    .map(|i| {
                        from.iter()
                            .enumerate()
                            .filter(|(k, _)| *k != i)
                            .fold(1u64, |acc, (_, rk)| {
                                barrett.mul_reduce::<ONCE>(
                                    acc,
                                    barrett.reduce_u128(rk.modulus.q as u128),
                                )
                            })
                    })
                    .collect()
            })
            .collect();

        let q_mod_p: Vec<Barrett<u64>> = to
            .iter()
            .map(|rj| {
                let barrett = &rj.modulus.barrett;
                let q_mod_pj: u64 = from.iter().fold(1u64, |acc, rk| {
                    barrett.mul_reduce::<ONCE>(acc, barrett.reduce_u128(rk.modulus.q as u128))
                });
                barrett.prepare(q_mod_pj)
            })
            .collect();

        let q_inv: Vec<f64> = from.iter().map(|r| 1.0 / r.modulus.q as f64).collect();

        Self {
            from: from.to_vec(),
            to: to.to_vec(),
            q_hat_inv,
            q_hat_mod_p,
            q_mod_p,
            q_inv,
        }
    }

    pub fn from_len(&self) -> usize {
        self.from.len()
    }

    pub fn to_len(&self) -> usize {
        self.to.len()
    }

    /// Converts the limbs a (one per modulus of the source basis, reduced) and
    /// writes the result on the pairs (j, b_j) of b, where j indexes the target basis.
    pub fn convert<'a, const MODE: CONVERSION>(
        &self,
        a: &[Poly<u64>],
        b: impl IntoIterator<Item = (usize, &'a mut Poly<u64>)>,
    ) {
        let k: usize = self.from.len();
        assert!(
            a.len() >= k,
            "invalid argument a: a.len()={} < #limbs={}",
            a.len(),
            k
        );
        let n: usize = a[0].n();

        // y[i * n + c] = [a_i[c] * (Q/q_i)^-1]_{q_i}
        let mut y: Vec<u64> = vec![0u64; k * n];
        y.chunks_exact_mut(n)
            .zip(a.iter())
            .zip(self.from.iter().zip(self.q_hat_inv.iter()))
            .for_each(|((yi, ai), (ri, q_hat_inv_i))| {
                let barrett = &ri.modulus.barrett;
                yi.iter_mut().zip(ai.0.iter()).for_each(|(y, x)| {
                    *y = barrett.mul_external::<ONCE>(q_hat_inv_i, x);
                });
            });

        let v: Vec<u64> = match MODE {
            FAST => Vec::new(),
            EXACT | CENTERED => (0..n)
                .map(|c| {
                    let s: f64 = self
                        .q_inv
                        .iter()
                        .enumerate()
                        .map(|(i, q_inv_i)| y[i * n + c] as f64 * q_inv_i)
                        .sum();
                    if MODE == EXACT {
                        s.floor() as u64
                    } else {
                        s.round() as u64
                    }
                })
                .collect(),
            _ => unreachable!("invalid MODE argument"),
        };

        b.into_iter().for_each(|(j, bj)| {
            assert!(
                j < self.to.len(),
                "invalid index j={} >= #target limbs={}",
                j,
                self.to.len()
            );
            debug_assert!(bj.n() == n, "bj.n()={} != n={}", bj.n(), n);
            let prime = &self.to[j].modulus;
            let barrett = &prime.barrett;
            let q_hat_mod_pj: &[u64] = &self.q_hat_mod_p[j];
            bj.0.iter_mut().enumerate().for_each(|(c, bjc)| {
                let mut acc: u128 = 0;
                q_hat_mod_pj
                    .iter()
                    .enumerate()
                    .for_each(|(i, q_hat)| acc += y[i * n + c] as u128 * *q_hat as u128);
                *bjc = barrett.reduce_u128(acc);
            });
            if MODE != FAST {
                let q_mod_pj: &Barrett<u64> = &self.q_mod_p[j];
                bj.0.iter_mut().zip(v.iter()).for_each(|(bjc, vc)| {
                    let t: u64 = barrett.mul_external::<ONCE>(q_mod_pj, vc);
                    *bjc = barrett.reduce::<ONCE>(&(*bjc + prime.q - t));
                });
            }
        });
    }
}

/// Moves polynomials between two disjoint RNS bases Q and P.
pub struct BasisExtender {
    ring_q: RingRNS<u64>,
    ring_p: RingRNS<u64>,
    /// converter from Q at level l to all of P, indexed by l
    q_to_p: Vec<RnsConverter>,
    /// converter from P at level l to all of Q, indexed by l
    p_to_q: Vec<RnsConverter>,
    /// [(prod_{k<=l} p_k)^-1]_{q_i}, indexed [l][i]
    p_inv_mod_q: Vec<Vec<Barrett<u64>>>,
}

impl BasisExtender {
    /// Precomputes the conversions between ring_q and ring_p at every level.
    pub fn new(ring_q: &RingRNS<u64>, ring_p: &RingRNS<u64>) -> Result<Self> {
        if ring_q.n() != ring_p.n() {
            return Err(Error::DegreeMismatch(ring_q.n(), ring_p.n()));
        }
        let moduli_q: Vec<u64> = ring_q.moduli();
        if let Some(p) = ring_p.moduli().into_iter().find(|p| moduli_q.contains(p)) {
            return Err(Error::OverlappingBases(p));
        }

        let q_to_p: Vec<RnsConverter> = (0..ring_q.level() + 1)
            .map(|l| RnsConverter::new(&ring_q.0[..l + 1], &ring_p.0))
            .collect();
        let p_to_q: Vec<RnsConverter> = (0..ring_p.level() + 1)
            .map(|l| RnsConverter::new(&ring_p.0[..l + 1], &ring_q.0))
            .collect();

        let mut p_inv_mod_q: Vec<Vec<Barrett<u64>>> = Vec::with_capacity(ring_p.level() + 1);
        let mut p_mod_q: Vec<u64> = vec![1u64; ring_q.level() + 1];
        ring_p.0.iter().for_each(|rp| {
            p_inv_mod_q.push(
                ring_q
                    .0
                    .iter()
                    .zip(p_mod_q.iter_mut())
                    .map(|(rq, p_mod_qi)| {
                        let prime = &rq.modulus;
                        *p_mod_qi = prime.barrett.mul_reduce::<ONCE>(
                            *p_mod_qi,
                            prime.barrett.reduce_u128(rp.modulus.q as u128),
                        );
                        prime.barrett.prepare(prime.inv(*p_mod_qi))
                    })
                    .collect(),
            );
        });

        debug!(
            n = ring_q.n(),
            level_q = ring_q.level(),
            level_p = ring_p.level(),
            "new BasisExtender"
        );

        Ok(Self {
            ring_q: ring_q.clone(),
            ring_p: ring_p.clone(),
            q_to_p,
            p_to_q,
            p_inv_mod_q,
        })
    }

    pub fn ring_q(&self) -> &RingRNS<u64> {
        &self.ring_q
    }

    pub fn ring_p(&self) -> &RingRNS<u64> {
        &self.ring_p
    }

    fn check_levels(
        &self,
        level_q: usize,
        level_p: usize,
        limbs_q: usize,
        limbs_p: usize,
    ) -> Result<()> {
        check_level(level_q, self.ring_q.level().min(limbs_q))?;
        check_level(level_p, self.ring_p.level().min(limbs_p))
    }

    /// Writes on the first level_p+1 limbs of b_p the extension of the first
    /// level_q+1 limbs of a_q. a_q must be in the coefficient domain.
    #[instrument(skip_all)]
    pub fn mod_up_q_to_p<const MODE: CONVERSION>(
        &self,
        level_q: usize,
        level_p: usize,
        a_q: &PolyRNS<u64>,
        b_p: &mut PolyRNS<u64>,
    ) -> Result<()> {
        self.check_levels(level_q, level_p, a_q.level(), b_p.level())?;
        self.q_to_p[level_q].convert::<MODE>(
            &a_q.polys[..level_q + 1],
            b_p.polys[..level_p + 1].iter_mut().enumerate(),
        );
        b_p.is_ntt = false;
        b_p.is_montgomery = false;
        Ok(())
    }

    /// Writes on the first level_q+1 limbs of b_q the extension of the first
    /// level_p+1 limbs of a_p. a_p must be in the coefficient domain.
    #[instrument(skip_all)]
    pub fn mod_up_p_to_q<const MODE: CONVERSION>(
        &self,
        level_p: usize,
        level_q: usize,
        a_p: &PolyRNS<u64>,
        b_q: &mut PolyRNS<u64>,
    ) -> Result<()> {
        self.check_levels(level_q, level_p, b_q.level(), a_p.level())?;
        self.p_to_q[level_p].convert::<MODE>(
            &a_p.polys[..level_p + 1],
            b_q.polys[..level_q + 1].iter_mut().enumerate(),
        );
        b_q.is_ntt = false;
        b_q.is_montgomery = false;
        Ok(())
    }

    /// Writes on the first level_q+1 limbs of b_q the value round((a_q, a_p) / P),
    /// with P the product of the first level_p+1 limbs of P.
    /// Inputs and output are in the coefficient domain.
    #[instrument(skip_all)]
    pub fn mod_down_qp_to_q(
        &self,
        level_q: usize,
        level_p: usize,
        a_q: &PolyRNS<u64>,
        a_p: &PolyRNS<u64>,
        buf_q: &mut PolyRNS<u64>,
        b_q: &mut PolyRNS<u64>,
    ) -> Result<()> {
        self.check_levels(level_q, level_p, a_q.level(), a_p.level())?;
        self.check_levels(level_q, level_p, b_q.level().min(buf_q.level()), a_p.level())?;

        self.p_to_q[level_p].convert::<CENTERED>(
            &a_p.polys[..level_p + 1],
            buf_q.polys[..level_q + 1].iter_mut().enumerate(),
        );

        let p_inv: &[Barrett<u64>] = &self.p_inv_mod_q[level_p];
        self.ring_q.0[..level_q + 1]
            .iter()
            .enumerate()
            .for_each(|(i, r)| {
                r.a_sub_b_mul_c_scalar_barrett::<1, ONCE>(
                    a_q.at(i),
                    buf_q.at(i),
                    &p_inv[i],
                    b_q.at_mut(i),
                )
            });
        b_q.is_ntt = false;
        b_q.is_montgomery = false;
        Ok(())
    }

    /// Same as [BasisExtender::mod_down_qp_to_q] with a_q, a_p and b_q in the NTT domain.
    /// a_q must be reduced and a_p is left untouched.
    #[instrument(skip_all)]
    #[allow(clippy::too_many_arguments)]
    pub fn mod_down_qp_to_q_ntt(
        &self,
        level_q: usize,
        level_p: usize,
        a_q: &PolyRNS<u64>,
        a_p: &PolyRNS<u64>,
        buf_q: &mut PolyRNS<u64>,
        buf_p: &mut PolyRNS<u64>,
        b_q: &mut PolyRNS<u64>,
    ) -> Result<()> {
        self.check_levels(level_q, level_p, a_q.level(), a_p.level())?;
        self.check_levels(
            level_q,
            level_p,
            b_q.level().min(buf_q.level()),
            buf_p.level(),
        )?;

        self.ring_p.0[..level_p + 1]
            .iter()
            .enumerate()
            .for_each(|(i, r)| r.intt::<false>(a_p.at(i), buf_p.at_mut(i)));

        self.p_to_q[level_p].convert::<CENTERED>(
            &buf_p.polys[..level_p + 1],
            buf_q.polys[..level_q + 1].iter_mut().enumerate(),
        );

        let p_inv: &[Barrett<u64>] = &self.p_inv_mod_q[level_p];
        self.ring_q.0[..level_q + 1]
            .iter()
            .enumerate()
            .for_each(|(i, r)| {
                // lazy NTT leaves buf_q in [0, 2q)
                r.ntt_inplace::<true>(buf_q.at_mut(i));
                r.a_sub_b_mul_c_scalar_barrett::<2, ONCE>(
                    a_q.at(i),
                    buf_q.at(i),
                    &p_inv[i],
                    b_q.at_mut(i),
                )
            });
        b_q.is_ntt = true;
        b_q.is_montgomery = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::num_bigint::Div;
    use num_bigint::BigInt;
    use num_integer::Integer;

    const Q: [u64; 2] = [0x1fffffffffe00001, 0x1fffffffffc80001];
    const P: [u64; 1] = [0x1fffffffffb40001];
    const N: usize = 32;

    fn rings() -> (RingRNS<u64>, RingRNS<u64>) {
        (
            RingRNS::new(N, Q.to_vec()).unwrap(),
            RingRNS::new(N, P.to_vec()).unwrap(),
        )
    }

    fn random_coeffs(modulus: &BigInt, seed: u64) -> Vec<BigInt> {
        // large odd multiplier spreads the values over [0, modulus)
        let step: BigInt = modulus / BigInt::from(N as u64 + 3) + BigInt::from(seed | 1);
        (0..N as u64)
            .map(|i| (&step * BigInt::from(i + 1) + BigInt::from(i) * BigInt::from(seed)).mod_floor(modulus))
            .collect()
    }

    fn check_extension<const MODE: CONVERSION>(seed: u64) {
        let (ring_q, ring_p) = rings();
        let extender: BasisExtender = BasisExtender::new(&ring_q, &ring_p).unwrap();
        let q_big: BigInt = ring_q.modulus();
        let p_big: BigInt = ring_p.modulus();

        let coeffs: Vec<BigInt> = random_coeffs(&q_big, seed);
        let mut a_q: PolyRNS<u64> = ring_q.new_polyrns();
        ring_q.from_bigint_inplace(&coeffs, 1, &mut a_q);

        let mut b_p: PolyRNS<u64> = ring_p.new_polyrns();
        extender
            .mod_up_q_to_p::<MODE>(ring_q.level(), ring_p.level(), &a_q, &mut b_p)
            .unwrap();

        let p0: u64 = P[0];
        coeffs.iter().zip(b_p.at(0).0.iter()).for_each(|(x, y)| {
            let got: BigInt = BigInt::from(*y);
            match MODE {
                FAST => {
                    let diff: BigInt = (&got - x).mod_floor(&p_big);
                    let ok: bool = (0..Q.len() as u64)
                        .any(|e| (BigInt::from(e) * &q_big).mod_floor(&p_big) == diff);
                    assert!(ok, "x={} got={}", x, got);
                }
                EXACT => assert_eq!(got, x.mod_floor(&BigInt::from(p0))),
                CENTERED => {
                    let centered: BigInt = if x > &(&q_big >> 1) {
                        x - &q_big
                    } else {
                        x.clone()
                    };
                    assert_eq!(got, centered.mod_floor(&BigInt::from(p0)))
                }
                _ => unreachable!(),
            }
        });
    }

    #[test]
    fn mod_up_fast() {
        check_extension::<FAST>(7);
    }

    #[test]
    fn mod_up_exact() {
        check_extension::<EXACT>(11);
        check_extension::<EXACT>(0x9e3779b97f4a7c15);
    }

    #[test]
    fn mod_up_centered() {
        check_extension::<CENTERED>(13);
        check_extension::<CENTERED>(0x243f6a8885a308d3);
    }

    #[test]
    fn mod_up_p_to_q_small_values() {
        let (ring_q, ring_p) = rings();
        let extender: BasisExtender = BasisExtender::new(&ring_q, &ring_p).unwrap();
        let values: Vec<i64> = (0..N as i64).map(|i| i * 1001 - 16000).collect();
        let mut a_p: PolyRNS<u64> = ring_p.new_polyrns();
        ring_p.from_i64(&values, &mut a_p);
        let mut b_q: PolyRNS<u64> = ring_q.new_polyrns();
        extender
            .mod_up_p_to_q::<CENTERED>(0, ring_q.level(), &a_p, &mut b_q)
            .unwrap();
        let mut want: PolyRNS<u64> = ring_q.new_polyrns();
        ring_q.from_i64(&values, &mut want);
        assert_eq!(b_q, want);
    }

    #[test]
    fn mod_down_rounds() {
        let (ring_q, ring_p) = rings();
        let extender: BasisExtender = BasisExtender::new(&ring_q, &ring_p).unwrap();
        let ring_qp: RingRNS<u64> = RingRNS::new(N, [Q.to_vec(), P.to_vec()].concat()).unwrap();
        let qp_big: BigInt = ring_qp.modulus();
        let p_big: BigInt = ring_p.modulus();
        let q_big: BigInt = ring_q.modulus();

        let coeffs: Vec<BigInt> = random_coeffs(&qp_big, 5);
        let mut a_qp: PolyRNS<u64> = ring_qp.new_polyrns();
        ring_qp.from_bigint_inplace(&coeffs, 1, &mut a_qp);
        let a_q: PolyRNS<u64> = PolyRNS {
            polys: a_qp.polys[..2].to_vec(),
            is_ntt: false,
            is_montgomery: false,
        };
        let a_p: PolyRNS<u64> = PolyRNS {
            polys: a_qp.polys[2..].to_vec(),
            is_ntt: false,
            is_montgomery: false,
        };

        let mut buf_q: PolyRNS<u64> = ring_q.new_polyrns();
        let mut b_q: PolyRNS<u64> = ring_q.new_polyrns();
        extender
            .mod_down_qp_to_q(1, 0, &a_q, &a_p, &mut buf_q, &mut b_q)
            .unwrap();

        let mut got: Vec<BigInt> = vec![BigInt::from(0); N];
        ring_q.to_bigint_inplace(&b_q, 1, &mut got);
        coeffs.iter().zip(got.iter()).for_each(|(x, y)| {
            let centered: BigInt = if x > &(&qp_big >> 1) {
                x - &qp_big
            } else {
                x.clone()
            };
            let want: BigInt = centered.div_round(&p_big).mod_floor(&q_big);
            assert_eq!(y.mod_floor(&q_big), want);
        });

        // NTT domain
        let mut a_q_ntt: PolyRNS<u64> = a_q.clone();
        let mut a_p_ntt: PolyRNS<u64> = a_p.clone();
        ring_q.ntt_inplace::<false>(&mut a_q_ntt);
        ring_p.ntt_inplace::<false>(&mut a_p_ntt);
        let mut buf_p: PolyRNS<u64> = ring_p.new_polyrns();
        let mut c_q: PolyRNS<u64> = ring_q.new_polyrns();
        extender
            .mod_down_qp_to_q_ntt(1, 0, &a_q_ntt, &a_p_ntt, &mut buf_q, &mut buf_p, &mut c_q)
            .unwrap();
        assert!(c_q.is_ntt);
        ring_q.intt_inplace::<false>(&mut c_q);
        assert_eq!(c_q.polys, b_q.polys);
    }

    #[test]
    fn construction_errors() {
        let (ring_q, ring_p) = rings();
        assert_eq!(
            BasisExtender::new(&ring_q, &ring_q).err(),
            Some(Error::OverlappingBases(Q[0]))
        );
        let ring_p_small: RingRNS<u64> = RingRNS::new(16, P.to_vec()).unwrap();
        assert_eq!(
            BasisExtender::new(&ring_q, &ring_p_small).err(),
            Some(Error::DegreeMismatch(N, 16))
        );
        let extender: BasisExtender = BasisExtender::new(&ring_q, &ring_p).unwrap();
        let a_q: PolyRNS<u64> = ring_q.new_polyrns();
        let mut b_p: PolyRNS<u64> = ring_p.new_polyrns();
        assert_eq!(
            extender.mod_up_q_to_p::<EXACT>(2, 0, &a_q, &mut b_p),
            Err(Error::LevelOutOfRange { level: 2, max: 1 })
        );
    }
}
