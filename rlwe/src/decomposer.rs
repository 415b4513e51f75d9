use crate::error::Result;
use crate::poly_qp::PolyQP;
use rns::basis_extension::{RnsConverter, CENTERED};
use rns::poly::PolyRNS;
use rns::ring::{Ring, RingRNS};
use rns::check_level;
use std::sync::Arc;
use tracing::instrument;

/// The digits of a polynomial of Q, one PolyQP per digit, in the NTT domain.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct DecomposedPoly(pub Vec<PolyQP>);

/// RNS gadget decomposition of Q.
///
/// Digit i groups the limbs [i*alpha, (i+1)*alpha) of Q, with alpha the
/// number of limbs of P. The i-th digit of a is [a]_{Q_i} centered in
/// [-Q_i/2, Q_i/2) and extended to every limb of Q and P.
pub struct Decomposer {
    ring_q: Arc<RingRNS<u64>>,
    ring_p: Arc<RingRNS<u64>>,
    /// converter from the first len+1 limbs of digit i to Q||P, indexed [i][len]
    converters: Vec<Vec<RnsConverter>>,
}

impl Decomposer {
    pub fn new(ring_q: &Arc<RingRNS<u64>>, ring_p: &Arc<RingRNS<u64>>) -> Self {
        let alpha: usize = ring_p.level() + 1;
        let limbs_q: usize = ring_q.level() + 1;
        let to: Vec<Arc<Ring<u64>>> = ring_q.0.iter().chain(ring_p.0.iter()).cloned().collect();
        let converters: Vec<Vec<RnsConverter>> = (0..limbs_q.div_ceil(alpha))
            .map(|i| {
                let start: usize = i * alpha;
                let end: usize = (start + alpha).min(limbs_q);
                (start + 1..end + 1)
                    .map(|group_end| RnsConverter::new(&ring_q.0[start..group_end], &to))
                    .collect()
            })
            .collect();
        Self {
            ring_q: ring_q.clone(),
            ring_p: ring_p.clone(),
            converters,
        }
    }

    pub fn alpha(&self) -> usize {
        self.ring_p.level() + 1
    }

    /// Number of digits at level_q.
    pub fn beta(&self, level_q: usize) -> usize {
        (level_q + 1).div_ceil(self.alpha())
    }

    /// Writes on out the digit of a at level_q, on level_q+1 limbs of Q and level_p+1 limbs of P.
    /// a_ntt and a_coeff are the same polynomial in the NTT and in the coefficient domain.
    #[instrument(skip_all)]
    pub fn decompose(
        &self,
        level_q: usize,
        level_p: usize,
        digit: usize,
        a_ntt: &PolyRNS<u64>,
        a_coeff: &PolyRNS<u64>,
        out: &mut PolyQP,
    ) -> Result<()> {
        check_level(
            level_q,
            self.ring_q
                .level()
                .min(a_ntt.level())
                .min(a_coeff.level())
                .min(out.level_q()),
        )?;
        check_level(level_p, self.ring_p.level().min(out.level_p()))?;
        assert!(
            digit < self.beta(level_q),
            "invalid argument digit: digit={} >= beta={}",
            digit,
            self.beta(level_q)
        );

        let limbs_q: usize = self.ring_q.level() + 1;
        let start: usize = digit * self.alpha();
        let end: usize = (start + self.alpha()).min(level_q + 1);
        let in_group = |j: usize| j >= start && j < end;

        let targets = out.q.polys[..level_q + 1]
            .iter_mut()
            .enumerate()
            .filter(|(j, _)| !in_group(*j))
            .chain(
                out.p.polys[..level_p + 1]
                    .iter_mut()
                    .enumerate()
                    .map(|(j, p)| (j + limbs_q, p)),
            );
        self.converters[digit][end - start - 1]
            .convert::<CENTERED>(&a_coeff.polys[start..end], targets);

        self.ring_q.0[..level_q + 1]
            .iter()
            .zip(out.q.polys.iter_mut())
            .enumerate()
            .for_each(|(j, (ring, poly))| {
                if in_group(j) {
                    poly.copy_from(a_ntt.at(j));
                } else {
                    ring.ntt_inplace::<false>(poly);
                }
            });
        self.ring_p.0[..level_p + 1]
            .iter()
            .zip(out.p.polys.iter_mut())
            .for_each(|(ring, poly)| ring.ntt_inplace::<false>(poly));

        out.q.is_ntt = true;
        out.q.is_montgomery = false;
        out.p.is_ntt = true;
        out.p.is_montgomery = false;
        Ok(())
    }

    /// Returns every digit of a at level_q.
    pub fn decompose_all(
        &self,
        level_q: usize,
        level_p: usize,
        a_ntt: &PolyRNS<u64>,
        a_coeff: &PolyRNS<u64>,
    ) -> Result<DecomposedPoly> {
        let n: usize = self.ring_q.n();
        (0..self.beta(level_q))
            .map(|digit| {
                let mut out: PolyQP = PolyQP {
                    q: PolyRNS::new(n, level_q),
                    p: PolyRNS::new(n, level_p),
                };
                self.decompose(level_q, level_p, digit, a_ntt, a_coeff, &mut out)?;
                Ok(out)
            })
            .collect::<Result<Vec<PolyQP>>>()
            .map(DecomposedPoly)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use num_bigint::BigInt;
    use num_integer::Integer;
    use sampling::source::Source;

    const Q: [u64; 3] = [0x1fffffffffe00001, 0x1fffffffffc80001, 0x1fffffffffb40001];
    const P: [u64; 2] = [0x1fffffffff500001, 0x1fffffffff420001];
    const N: usize = 16;

    fn decomposer() -> Decomposer {
        Decomposer::new(
            &Arc::new(RingRNS::new(N, Q.to_vec()).unwrap()),
            &Arc::new(RingRNS::new(N, P.to_vec()).unwrap()),
        )
    }

    fn coeffs_of(ring: &RingRNS<u64>, a: &PolyRNS<u64>) -> Vec<BigInt> {
        let mut a_coeff: PolyRNS<u64> = a.clone();
        if a.is_ntt {
            ring.intt_inplace::<false>(&mut a_coeff);
        }
        let mut coeffs: Vec<BigInt> = vec![BigInt::from(0); N];
        ring.to_bigint_inplace(&a_coeff, 1, &mut coeffs);
        coeffs
    }

    #[test]
    fn digits_are_centered_and_reconstruct() {
        let decomposer: Decomposer = decomposer();
        let ring_q: &RingRNS<u64> = &decomposer.ring_q;
        let mut source: Source = Source::new([5u8; 32]);

        for level_q in 0..Q.len() {
            let ring: RingRNS<u64> = ring_q.at_level(level_q).unwrap();
            let mut a_coeff: PolyRNS<u64> = ring.new_polyrns();
            ring.fill_uniform(&mut source, &mut a_coeff);
            let mut a_ntt: PolyRNS<u64> = ring.new_polyrns();
            ring.ntt::<false>(&a_coeff, &mut a_ntt);

            let digits: DecomposedPoly = decomposer
                .decompose_all(level_q, 1, &a_ntt, &a_coeff)
                .unwrap();
            assert_eq!(digits.0.len(), decomposer.beta(level_q));

            let q_big: BigInt = ring.modulus();
            let a_big: Vec<BigInt> = coeffs_of(&ring, &a_coeff);
            let mut sum: Vec<BigInt> = vec![BigInt::from(0); N];

            digits.0.iter().enumerate().for_each(|(i, d)| {
                let start: usize = 2 * i;
                let end: usize = (start + 2).min(level_q + 1);
                let group: RingRNS<u64> = RingRNS(ring.0[start..end].to_vec());
                let q_i: BigInt = group.modulus();
                let q_i_half: BigInt = &q_i >> 1;

                // the digit is the same integer on every limb of Q and P
                let d_q: Vec<BigInt> = coeffs_of(&ring, &d.q);
                let d_p: Vec<BigInt> = coeffs_of(&decomposer.ring_p, &d.p);
                let p_big: BigInt = decomposer.ring_p.modulus();
                d_q.iter()
                    .zip(d_p.iter())
                    .for_each(|(x, y)| assert_eq!(x.mod_floor(&p_big), y.mod_floor(&p_big)));

                let q_hat: BigInt = &q_big / &q_i;
                let q_hat_inv: BigInt = q_hat
                    .extended_gcd(&q_i)
                    .x
                    .mod_floor(&q_i);
                d_q.iter().zip(a_big.iter()).zip(sum.iter_mut()).for_each(|((d, a), s)| {
                    assert!(*d >= -&q_i_half && *d <= q_i_half);
                    assert_eq!(d.mod_floor(&q_i), a.mod_floor(&q_i));
                    *s += d * &q_hat * &q_hat_inv;
                });
            });

            sum.iter()
                .zip(a_big.iter())
                .for_each(|(s, a)| assert_eq!(s.mod_floor(&q_big), a.mod_floor(&q_big)));
        }
    }

    #[test]
    fn level_out_of_range() {
        let decomposer: Decomposer = decomposer();
        let a: PolyRNS<u64> = PolyRNS::new(N, 1);
        let mut out: PolyQP = PolyQP {
            q: PolyRNS::new(N, 2),
            p: PolyRNS::new(N, 1),
        };
        assert!(matches!(
            decomposer.decompose(2, 1, 0, &a, &a, &mut out),
            Err(Error::Rns(rns::Error::LevelOutOfRange { level: 2, max: 1 }))
        ));
    }
}
