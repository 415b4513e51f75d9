use crate::error::{check_level, Error, Result};
use crate::modulus::barrett::Barrett;
use crate::modulus::montgomery::Montgomery;
use crate::modulus::{ONCE, REDUCEMOD};
use crate::poly::PolyRNS;
use crate::ring::{Ring, RingRNS};
use num_bigint::BigInt;
use std::sync::Arc;
use tracing::debug;

impl RingRNS<u64> {
    /// Returns the RNS ring of degree n over the given chain of primes.
    pub fn new(n: usize, moduli: Vec<u64>) -> Result<Self> {
        if moduli.is_empty() {
            return Err(Error::EmptyModuli);
        }
        let rings: Vec<Arc<Ring<u64>>> = moduli
            .into_iter()
            .map(|q| Ring::new(n, q).map(Arc::new))
            .collect::<Result<_>>()?;
        let ring: RingRNS<u64> = Self::from_rings(rings)?;
        debug!(n, level = ring.level(), "new RingRNS");
        Ok(ring)
    }

    /// Returns the RNS ring made of the given limbs.
    /// Fails if the limbs have different degrees or share a modulus.
    pub fn from_rings(rings: Vec<Arc<Ring<u64>>>) -> Result<Self> {
        let first: &Arc<Ring<u64>> = rings.first().ok_or(Error::EmptyModuli)?;
        let n: usize = first.n();
        for (i, ring) in rings.iter().enumerate() {
            if ring.n() != n {
                return Err(Error::DegreeMismatch(n, ring.n()));
            }
            if rings[..i]
                .iter()
                .any(|other| other.modulus.q == ring.modulus.q)
            {
                return Err(Error::DuplicateModulus(ring.modulus.q));
            }
        }
        Ok(RingRNS(rings))
    }

    /// Returns the ring made of the first level+1 limbs.
    pub fn at_level(&self, level: usize) -> Result<RingRNS<u64>> {
        check_level(level, self.level())?;
        Ok(self.at_level_unchecked(level))
    }

    pub fn moduli(&self) -> Vec<u64> {
        self.0.iter().map(|r| r.modulus.q).collect()
    }

    /// Returns Q = prod q_i.
    pub fn modulus(&self) -> BigInt {
        let mut modulus = BigInt::from(1);
        self.0
            .iter()
            .for_each(|r| modulus *= BigInt::from(r.modulus.q));
        modulus
    }

    pub fn cyclotomic_order(&self) -> u64 {
        self.0[0].cyclotomic_order()
    }

    pub fn galois_element(&self, k: i64, conjugate: bool) -> u64 {
        self.0[0].galois_element(k, conjugate)
    }

    /// Returns [q_level^-1]_{q_i} for i < level.
    pub fn rescaling_constant(&self) -> Vec<Barrett<u64>> {
        let level = self.level();
        let q_scale: u64 = self.0[level].modulus.q;
        (0..level)
            .map(|i| {
                let prime = &self.0[i].modulus;
                prime
                    .barrett
                    .prepare(prime.inv(prime.barrett.reduce_u128(q_scale as u128)))
            })
            .collect()
    }

    /// Writes coeffs[j] mod q_i at a.at(i)[j * step] for every limb of the ring.
    pub fn from_bigint_inplace(&self, coeffs: &[BigInt], step: usize, a: &mut PolyRNS<u64>) {
        let level = self.level();
        assert!(
            level <= a.level(),
            "invalid level: level={} > a.level()={}",
            level,
            a.level()
        );
        (0..level + 1).for_each(|i| self.0[i].from_bigint(coeffs, step, a.at_mut(i)));
    }

    /// Reconstructs the coefficients a[j * step] of a from its limbs, centered in (-Q/2, Q/2].
    pub fn to_bigint_inplace(&self, a: &PolyRNS<u64>, step: usize, coeffs: &mut [BigInt]) {
        assert!(
            step > 0 && step <= a.n(),
            "invalid step: step={} not in [1, a.n()={}]",
            step,
            a.n()
        );
        assert!(
            coeffs.len() <= a.n() / step,
            "invalid coeffs: coeffs.len()={} > a.n()/step={}",
            coeffs.len(),
            a.n() / step
        );
        assert!(
            self.level() <= a.level(),
            "invalid level: self.level()={} > a.level()={}",
            self.level(),
            a.level()
        );

        let q_big: BigInt = self.modulus();
        let q_big_half: BigInt = &q_big >> 1;

        // (Q/q_i) * [(Q/q_i)^-1]_{q_i}
        let inv_crt: Vec<BigInt> = self
            .0
            .iter()
            .enumerate()
            .map(|(i, r)| {
                let prime = &r.modulus;
                let q_hat_mod_qi: u64 = self
                    .0
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| *j != i)
                    .fold(1u64, |acc, (_, rj)| {
                        prime
                            .barrett
                            .mul_reduce::<ONCE>(acc, prime.barrett.reduce_u128(rj.modulus.q as u128))
                    });
                (&q_big / BigInt::from(prime.q)) * BigInt::from(prime.inv(q_hat_mod_qi))
            })
            .collect();

        coeffs.iter_mut().enumerate().for_each(|(i, c)| {
            let j: usize = i * step;
            *c = BigInt::from(0);
            (0..self.level() + 1).for_each(|k| {
                *c += BigInt::from(a.at(k).0[j]) * &inv_crt[k];
            });
            *c %= &q_big;
            if *c > q_big_half {
                *c -= &q_big;
            }
        });
    }
}

impl RingRNS<u64> {
    pub fn ntt_inplace<const LAZY: bool>(&self, a: &mut PolyRNS<u64>) {
        self.0
            .iter()
            .enumerate()
            .for_each(|(i, ring)| ring.ntt_inplace::<LAZY>(a.at_mut(i)));
        a.is_ntt = true;
    }

    pub fn intt_inplace<const LAZY: bool>(&self, a: &mut PolyRNS<u64>) {
        self.0
            .iter()
            .enumerate()
            .for_each(|(i, ring)| ring.intt_inplace::<LAZY>(a.at_mut(i)));
        a.is_ntt = false;
    }

    pub fn ntt<const LAZY: bool>(&self, a: &PolyRNS<u64>, b: &mut PolyRNS<u64>) {
        self.0
            .iter()
            .enumerate()
            .for_each(|(i, ring)| ring.ntt::<LAZY>(a.at(i), b.at_mut(i)));
        b.is_ntt = true;
        b.is_montgomery = a.is_montgomery;
    }

    pub fn intt<const LAZY: bool>(&self, a: &PolyRNS<u64>, b: &mut PolyRNS<u64>) {
        self.0
            .iter()
            .enumerate()
            .for_each(|(i, ring)| ring.intt::<LAZY>(a.at(i), b.at_mut(i)));
        b.is_ntt = false;
        b.is_montgomery = a.is_montgomery;
    }

    pub fn ntt_montgomery_inplace(&self, a: &mut PolyRNS<u64>) {
        self.0
            .iter()
            .enumerate()
            .for_each(|(i, ring)| ring.ntt_montgomery_inplace(a.at_mut(i)));
        a.is_ntt = true;
    }

    pub fn intt_montgomery_inplace(&self, a: &mut PolyRNS<u64>) {
        self.0
            .iter()
            .enumerate()
            .for_each(|(i, ring)| ring.intt_montgomery_inplace(a.at_mut(i)));
        a.is_ntt = false;
    }
}

impl RingRNS<u64> {
    #[inline(always)]
    pub fn reduce_inplace<const REDUCE: REDUCEMOD>(&self, a: &mut PolyRNS<u64>) {
        assert!(
            a.level() >= self.level(),
            "a.level()={} < self.level()={}",
            a.level(),
            self.level()
        );
        self.0
            .iter()
            .enumerate()
            .for_each(|(i, ring)| ring.reduce_inplace::<REDUCE>(a.at_mut(i)));
    }

    #[inline(always)]
    pub fn add<const REDUCE: REDUCEMOD>(
        &self,
        a: &PolyRNS<u64>,
        b: &PolyRNS<u64>,
        c: &mut PolyRNS<u64>,
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
        assert!(
            c.level() >= self.level(),
            "c.level()={} < self.level()={}",
            c.level(),
            self.level()
        );
        self.0
            .iter()
            .enumerate()
            .for_each(|(i, ring)| ring.add::<REDUCE>(a.at(i), b.at(i), c.at_mut(i)));
        c.is_ntt = a.is_ntt;
    }

    #[inline(always)]
    pub fn add_inplace<const REDUCE: REDUCEMOD>(&self, a: &PolyRNS<u64>, b: &mut PolyRNS<u64>) {
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
            .for_each(|(i, ring)| ring.add_inplace::<REDUCE>(a.at(i), b.at_mut(i)));
    }

    /// Adds the integer b to every coefficient of a.
    #[inline(always)]
    pub fn add_scalar_inplace<const REDUCE: REDUCEMOD>(&self, b: &u64, a: &mut PolyRNS<u64>) {
        assert!(
            a.level() >= self.level(),
            "a.level()={} < self.level()={}",
            a.level(),
            self.level()
        );
        self.0.iter().enumerate().for_each(|(i, ring)| {
            let b_i: u64 = ring.modulus.barrett.reduce_u128(*b as u128);
            ring.add_scalar_inplace::<REDUCE>(&b_i, a.at_mut(i))
        });
    }

    /// c <- a + BRANGE*q - b.
    #[inline(always)]
    pub fn sub<const BRANGE: u8, const REDUCE: REDUCEMOD>(
        &self,
        a: &PolyRNS<u64>,
        b: &PolyRNS<u64>,
        c: &mut PolyRNS<u64>,
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
        assert!(
            c.level() >= self.level(),
            "c.level()={} < self.level()={}",
            c.level(),
            self.level()
        );
        self.0
            .iter()
            .enumerate()
            .for_each(|(i, ring)| ring.sub::<BRANGE, REDUCE>(a.at(i), b.at(i), c.at_mut(i)));
        c.is_ntt = a.is_ntt;
    }

    /// b <- b + ARANGE*q - a.
    #[inline(always)]
    pub fn sub_inplace<const ARANGE: u8, const REDUCE: REDUCEMOD>(
        &self,
        a: &PolyRNS<u64>,
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
            .for_each(|(i, ring)| ring.sub_inplace::<ARANGE, REDUCE>(a.at(i), b.at_mut(i)));
    }

    #[inline(always)]
    pub fn neg<const ARANGE: u8, const REDUCE: REDUCEMOD>(
        &self,
        a: &PolyRNS<u64>,
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
            .for_each(|(i, ring)| ring.neg::<ARANGE, REDUCE>(a.at(i), b.at_mut(i)));
        b.is_ntt = a.is_ntt;
    }

    #[inline(always)]
    pub fn neg_inplace<const ARANGE: u8, const REDUCE: REDUCEMOD>(&self, a: &mut PolyRNS<u64>) {
        assert!(
            a.level() >= self.level(),
            "a.level()={} < self.level()={}",
            a.level(),
            self.level()
        );
        self.0
            .iter()
            .enumerate()
            .for_each(|(i, ring)| ring.neg_inplace::<ARANGE, REDUCE>(a.at_mut(i)));
    }

    #[inline(always)]
    pub fn prepare_montgomery<const REDUCE: REDUCEMOD>(
        &self,
        a: &PolyRNS<u64>,
        b: &mut PolyRNS<Montgomery<u64>>,
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
            .for_each(|(i, ring)| ring.prepare_montgomery::<REDUCE>(a.at(i), b.at_mut(i)));
        b.is_ntt = a.is_ntt;
        b.is_montgomery = true;
    }

    #[inline(always)]
    pub fn prepare_montgomery_inplace<const REDUCE: REDUCEMOD>(&self, a: &mut PolyRNS<u64>) {
        assert!(
            a.level() >= self.level(),
            "a.level()={} < self.level()={}",
            a.level(),
            self.level()
        );
        self.0
            .iter()
            .enumerate()
            .for_each(|(i, ring)| ring.prepare_montgomery_inplace::<REDUCE>(a.at_mut(i)));
        a.is_montgomery = true;
    }

    #[inline(always)]
    pub fn unprepare_montgomery_inplace<const REDUCE: REDUCEMOD>(&self, a: &mut PolyRNS<u64>) {
        assert!(
            a.level() >= self.level(),
            "a.level()={} < self.level()={}",
            a.level(),
            self.level()
        );
        self.0
            .iter()
            .enumerate()
            .for_each(|(i, ring)| ring.unprepare_montgomery_inplace::<REDUCE>(a.at_mut(i)));
        a.is_montgomery = false;
    }

    #[inline(always)]
    pub fn mul_montgomery_external<const REDUCE: REDUCEMOD>(
        &self,
        a: &PolyRNS<Montgomery<u64>>,
        b: &PolyRNS<u64>,
        c: &mut PolyRNS<u64>,
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
        assert!(
            c.level() >= self.level(),
            "c.level()={} < self.level()={}",
            c.level(),
            self.level()
        );
        self.0.iter().enumerate().for_each(|(i, ring)| {
            ring.mul_montgomery_external::<REDUCE>(a.at(i), b.at(i), c.at_mut(i))
        });
        c.is_ntt = b.is_ntt;
        c.is_montgomery = b.is_montgomery;
    }

    /// c <- c + a * b.
    #[inline(always)]
    pub fn mul_montgomery_external_add<const REDUCE1: REDUCEMOD, const REDUCE2: REDUCEMOD>(
        &self,
        a: &PolyRNS<Montgomery<u64>>,
        b: &PolyRNS<u64>,
        c: &mut PolyRNS<u64>,
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
        assert!(
            c.level() >= self.level(),
            "c.level()={} < self.level()={}",
            c.level(),
            self.level()
        );
        self.0.iter().enumerate().for_each(|(i, ring)| {
            ring.mul_montgomery_external_add::<REDUCE1, REDUCE2>(a.at(i), b.at(i), c.at_mut(i))
        });
    }

    #[inline(always)]
    pub fn mul_montgomery_external_inplace<const REDUCE: REDUCEMOD>(
        &self,
        a: &PolyRNS<Montgomery<u64>>,
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
        self.0.iter().enumerate().for_each(|(i, ring)| {
            ring.mul_montgomery_external_inplace::<REDUCE>(a.at(i), b.at_mut(i))
        });
    }

    #[inline(always)]
    pub fn mul_scalar<const REDUCE: REDUCEMOD>(
        &self,
        a: &PolyRNS<u64>,
        b: &u64,
        c: &mut PolyRNS<u64>,
    ) {
        assert!(
            a.level() >= self.level(),
            "a.level()={} < self.level()={}",
            a.level(),
            self.level()
        );
        assert!(
            c.level() >= self.level(),
            "c.level()={} < self.level()={}",
            c.level(),
            self.level()
        );
        self.0
            .iter()
            .enumerate()
            .for_each(|(i, ring)| ring.mul_scalar::<REDUCE>(a.at(i), b, c.at_mut(i)));
        c.is_ntt = a.is_ntt;
    }

    #[inline(always)]
    pub fn mul_scalar_inplace<const REDUCE: REDUCEMOD>(&self, b: &u64, a: &mut PolyRNS<u64>) {
        assert!(
            a.level() >= self.level(),
            "a.level()={} < self.level()={}",
            a.level(),
            self.level()
        );
        self.0
            .iter()
            .enumerate()
            .for_each(|(i, ring)| ring.mul_scalar_inplace::<REDUCE>(b, a.at_mut(i)));
    }

    /// c <- a * b, for an arbitrary big integer b.
    pub fn mul_scalar_bigint<const REDUCE: REDUCEMOD>(
        &self,
        a: &PolyRNS<u64>,
        b: &BigInt,
        c: &mut PolyRNS<u64>,
    ) {
        assert!(
            a.level() >= self.level(),
            "a.level()={} < self.level()={}",
            a.level(),
            self.level()
        );
        assert!(
            c.level() >= self.level(),
            "c.level()={} < self.level()={}",
            c.level(),
            self.level()
        );
        self.0
            .iter()
            .enumerate()
            .for_each(|(i, ring)| ring.mul_scalar_bigint::<REDUCE>(a.at(i), b, c.at_mut(i)));
        c.is_ntt = a.is_ntt;
    }

    pub fn mul_scalar_bigint_inplace<const REDUCE: REDUCEMOD>(&self, b: &BigInt, a: &mut PolyRNS<u64>) {
        assert!(
            a.level() >= self.level(),
            "a.level()={} < self.level()={}",
            a.level(),
            self.level()
        );
        self.0
            .iter()
            .enumerate()
            .for_each(|(i, ring)| ring.mul_scalar_bigint_inplace::<REDUCE>(b, a.at_mut(i)));
    }

    /// Multiplies limb i of a by b[i].
    #[inline(always)]
    pub fn mul_scalar_barrett_inplace<const REDUCE: REDUCEMOD>(
        &self,
        b: &[Barrett<u64>],
        a: &mut PolyRNS<u64>,
    ) {
        assert!(
            a.level() >= self.level(),
            "a.level()={} < self.level()={}",
            a.level(),
            self.level()
        );
        assert!(
            b.len() > self.level(),
            "b.len()={} <= self.level()={}",
            b.len(),
            self.level()
        );
        self.0
            .iter()
            .enumerate()
            .for_each(|(i, ring)| ring.mul_scalar_barrett_inplace::<REDUCE>(&b[i], a.at_mut(i)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modulus::BARRETT;
    use num_integer::Integer;
    use sampling::source::Source;

    const MODULI: [u64; 3] = [0x1fffffffffe00001, 0x1fffffffffc80001, 0x1fffffffffb40001];

    #[test]
    fn construction_errors() {
        assert_eq!(
            RingRNS::new(16, vec![]).err(),
            Some(Error::EmptyModuli)
        );
        assert_eq!(
            RingRNS::new(16, vec![MODULI[0], MODULI[1], MODULI[0]]).err(),
            Some(Error::DuplicateModulus(MODULI[0]))
        );
        assert_eq!(
            RingRNS::new(24, MODULI.to_vec()).err(),
            Some(Error::InvalidRingDegree(24))
        );

        let r16: Arc<Ring<u64>> = Arc::new(Ring::new(16, MODULI[0]).unwrap());
        let r32: Arc<Ring<u64>> = Arc::new(Ring::new(32, MODULI[1]).unwrap());
        assert_eq!(
            RingRNS::from_rings(vec![r16, r32]).err(),
            Some(Error::DegreeMismatch(16, 32))
        );
    }

    #[test]
    fn levels() {
        let ring: RingRNS<u64> = RingRNS::new(16, MODULI.to_vec()).unwrap();
        assert_eq!(ring.level(), 2);
        assert_eq!(ring.at_level(1).unwrap().moduli(), MODULI[..2].to_vec());
        assert_eq!(
            ring.at_level(3).err(),
            Some(Error::LevelOutOfRange { level: 3, max: 2 })
        );
    }

    #[test]
    fn bigint_round_trip() {
        let ring: RingRNS<u64> = RingRNS::new(16, MODULI.to_vec()).unwrap();
        let q_big: BigInt = ring.modulus();
        let half: BigInt = &q_big >> 1;
        let coeffs: Vec<BigInt> = (0..16i64)
            .map(|i| match i % 4 {
                0 => BigInt::from(i * 1_000_003),
                1 => -BigInt::from(i),
                2 => half.clone() - i,
                _ => -(half.clone() - i),
            })
            .collect();

        let mut a: PolyRNS<u64> = ring.new_polyrns();
        ring.from_bigint_inplace(&coeffs, 1, &mut a);
        let mut have: Vec<BigInt> = vec![BigInt::from(0); 16];
        ring.to_bigint_inplace(&a, 1, &mut have);
        assert_eq!(coeffs, have);
    }

    #[test]
    fn mul_scalar_bigint_matches_two_scalars() {
        let ring: RingRNS<u64> = RingRNS::new(16, MODULI.to_vec()).unwrap();
        let mut source: Source = Source::new([5u8; 32]);
        let mut a: PolyRNS<u64> = ring.new_polyrns();
        ring.fill_uniform(&mut source, &mut a);

        let (x, y): (u64, u64) = (0x1fffffffffffffff, 0x0123456789abcdef);
        let mut want: PolyRNS<u64> = ring.new_polyrns();
        ring.mul_scalar::<ONCE>(&a, &x, &mut want);
        ring.mul_scalar_inplace::<ONCE>(&y, &mut want);

        let mut have: PolyRNS<u64> = ring.new_polyrns();
        ring.mul_scalar_bigint::<ONCE>(&a, &(BigInt::from(x) * BigInt::from(y)), &mut have);
        assert_eq!(want, have);

        // negative scalars multiply by their residue
        let mut neg: PolyRNS<u64> = a.clone();
        ring.mul_scalar_bigint_inplace::<ONCE>(&(-(ring.modulus() * 3i32) - 1), &mut neg);
        ring.add_inplace::<ONCE>(&a, &mut neg);
        assert!(neg.polys.iter().all(|p| p.0.iter().all(|x| *x == 0)));

        let coeffs_a: Vec<BigInt> = {
            let mut c: Vec<BigInt> = vec![BigInt::from(0); 16];
            ring.to_bigint_inplace(&a, 1, &mut c);
            c
        };
        let scalar: BigInt = BigInt::from(3) << 200;
        ring.mul_scalar_bigint::<ONCE>(&a, &scalar, &mut have);
        let mut coeffs: Vec<BigInt> = vec![BigInt::from(0); 16];
        ring.to_bigint_inplace(&have, 1, &mut coeffs);
        let q_big: BigInt = ring.modulus();
        coeffs.iter().zip(coeffs_a.iter()).for_each(|(c, a)| {
            assert_eq!(c.mod_floor(&q_big), (a * &scalar).mod_floor(&q_big))
        });
    }

    #[test]
    fn lazy_additions_then_reduce() {
        let ring: RingRNS<u64> = RingRNS::new(16, MODULI.to_vec()).unwrap();
        let mut a: PolyRNS<u64> = ring.new_polyrns();
        a.set_all(&(MODULI[2] - 1));
        let mut acc: PolyRNS<u64> = ring.new_polyrns();
        (0..5).for_each(|_| ring.add_inplace::<{ crate::modulus::NONE }>(&a, &mut acc));
        ring.reduce_inplace::<BARRETT>(&mut acc);
        for (i, q) in MODULI.iter().enumerate() {
            let want: u64 = ((5 * (MODULI[2] - 1) as u128) % *q as u128) as u64;
            assert!(acc.at(i).0.iter().all(|x| *x == want));
        }
    }

    #[test]
    #[should_panic(expected = "invalid step")]
    fn to_bigint_zero_step_panics() {
        let ring: RingRNS<u64> = RingRNS::new(16, MODULI.to_vec()).unwrap();
        let a: PolyRNS<u64> = ring.new_polyrns();
        let mut coeffs: Vec<BigInt> = vec![BigInt::from(0); 1];
        ring.to_bigint_inplace(&a, 0, &mut coeffs);
    }

    #[test]
    #[should_panic]
    fn operand_below_ring_level_panics() {
        let ring: RingRNS<u64> = RingRNS::new(16, MODULI.to_vec()).unwrap();
        let a: PolyRNS<u64> = ring.at_level(1).unwrap().new_polyrns();
        let mut b: PolyRNS<u64> = ring.new_polyrns();
        ring.add_inplace::<ONCE>(&a, &mut b);
    }
}
