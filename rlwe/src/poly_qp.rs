use rns::modulus::REDUCEMOD;
use rns::poly::PolyRNS;
use rns::ring::RingRNS;
use rns::serialization::{ReaderFrom, WriterTo};
use sampling::source::Source;
use std::sync::Arc;

/// A polynomial over QP, stored as its limbs over Q and over P.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct PolyQP {
    pub q: PolyRNS<u64>,
    pub p: PolyRNS<u64>,
}

impl PolyQP {
    pub fn n(&self) -> usize {
        self.q.n()
    }

    pub fn level_q(&self) -> usize {
        self.q.level()
    }

    pub fn level_p(&self) -> usize {
        self.p.level()
    }

    pub fn copy(&mut self, other: &PolyQP) {
        self.q.copy(&other.q);
        self.p.copy(&other.p);
    }

    pub fn zero(&mut self) {
        self.q.zero();
        self.p.zero();
    }
}

/// Z_QP[X]/(X^n+1), as the pair of rings over Q and P.
/// Level arguments select the first level_q+1 limbs of Q and level_p+1 limbs of P.
#[derive(Clone)]
pub struct RingQP {
    pub ring_q: Arc<RingRNS<u64>>,
    pub ring_p: Arc<RingRNS<u64>>,
}

impl RingQP {
    pub fn n(&self) -> usize {
        self.ring_q.n()
    }

    pub fn new_poly(&self) -> PolyQP {
        PolyQP {
            q: self.ring_q.new_polyrns(),
            p: self.ring_p.new_polyrns(),
        }
    }

    pub fn new_poly_at_level(&self, level_q: usize, level_p: usize) -> PolyQP {
        PolyQP {
            q: PolyRNS::new(self.n(), level_q),
            p: PolyRNS::new(self.n(), level_p),
        }
    }

    fn at_level(&self, level_q: usize, level_p: usize) -> (RingRNS<u64>, RingRNS<u64>) {
        (
            self.ring_q.at_level_unchecked(level_q),
            self.ring_p.at_level_unchecked(level_p),
        )
    }

    /// Writes the small integer polynomial coeffs on every limb of Q and P.
    pub fn from_i64(&self, coeffs: &[i64], a: &mut PolyQP) {
        self.ring_q.from_i64(coeffs, &mut a.q);
        self.ring_p.from_i64(coeffs, &mut a.p);
    }

    /// Fills a with uniform values, marked as NTT evaluations.
    pub fn fill_uniform(&self, source: &mut Source, a: &mut PolyQP) {
        self.ring_q.fill_uniform(source, &mut a.q);
        self.ring_p.fill_uniform(source, &mut a.p);
        a.q.is_ntt = true;
        a.p.is_ntt = true;
    }

    pub fn ntt_inplace<const LAZY: bool>(&self, level_q: usize, level_p: usize, a: &mut PolyQP) {
        let (ring_q, ring_p) = self.at_level(level_q, level_p);
        ring_q.ntt_inplace::<LAZY>(&mut a.q);
        ring_p.ntt_inplace::<LAZY>(&mut a.p);
    }

    pub fn intt_inplace<const LAZY: bool>(&self, level_q: usize, level_p: usize, a: &mut PolyQP) {
        let (ring_q, ring_p) = self.at_level(level_q, level_p);
        ring_q.intt_inplace::<LAZY>(&mut a.q);
        ring_p.intt_inplace::<LAZY>(&mut a.p);
    }

    pub fn reduce_inplace<const REDUCE: REDUCEMOD>(
        &self,
        level_q: usize,
        level_p: usize,
        a: &mut PolyQP,
    ) {
        let (ring_q, ring_p) = self.at_level(level_q, level_p);
        ring_q.reduce_inplace::<REDUCE>(&mut a.q);
        ring_p.reduce_inplace::<REDUCE>(&mut a.p);
    }

    pub fn add_inplace<const REDUCE: REDUCEMOD>(
        &self,
        level_q: usize,
        level_p: usize,
        a: &PolyQP,
        b: &mut PolyQP,
    ) {
        let (ring_q, ring_p) = self.at_level(level_q, level_p);
        ring_q.add_inplace::<REDUCE>(&a.q, &mut b.q);
        ring_p.add_inplace::<REDUCE>(&a.p, &mut b.p);
    }

    /// b <- b - a, with a reduced.
    pub fn sub_inplace<const REDUCE: REDUCEMOD>(
        &self,
        level_q: usize,
        level_p: usize,
        a: &PolyQP,
        b: &mut PolyQP,
    ) {
        let (ring_q, ring_p) = self.at_level(level_q, level_p);
        ring_q.sub_inplace::<1, REDUCE>(&a.q, &mut b.q);
        ring_p.sub_inplace::<1, REDUCE>(&a.p, &mut b.p);
    }

    pub fn prepare_montgomery_inplace<const REDUCE: REDUCEMOD>(
        &self,
        level_q: usize,
        level_p: usize,
        a: &mut PolyQP,
    ) {
        let (ring_q, ring_p) = self.at_level(level_q, level_p);
        ring_q.prepare_montgomery_inplace::<REDUCE>(&mut a.q);
        ring_p.prepare_montgomery_inplace::<REDUCE>(&mut a.p);
    }

    pub fn unprepare_montgomery_inplace<const REDUCE: REDUCEMOD>(
        &self,
        level_q: usize,
        level_p: usize,
        a: &mut PolyQP,
    ) {
        let (ring_q, ring_p) = self.at_level(level_q, level_p);
        ring_q.unprepare_montgomery_inplace::<REDUCE>(&mut a.q);
        ring_p.unprepare_montgomery_inplace::<REDUCE>(&mut a.p);
    }

    /// b <- a(X^gal_el), with a in the NTT domain.
    pub fn automorphism_ntt(&self, a: &PolyQP, gal_el: u64, b: &mut PolyQP) {
        self.ring_q.automorphism::<true>(&a.q, gal_el, &mut b.q);
        self.ring_p.automorphism::<true>(&a.p, gal_el, &mut b.p);
    }

    /// c <- a * b, with a in Montgomery form.
    pub fn mul_montgomery_external<const REDUCE: REDUCEMOD>(
        &self,
        level_q: usize,
        level_p: usize,
        a: &PolyQP,
        b: &PolyQP,
        c: &mut PolyQP,
    ) {
        let (ring_q, ring_p) = self.at_level(level_q, level_p);
        ring_q.mul_montgomery_external::<REDUCE>(&a.q, &b.q, &mut c.q);
        ring_p.mul_montgomery_external::<REDUCE>(&a.p, &b.p, &mut c.p);
    }

    /// c <- c + a * b, with a in Montgomery form.
    pub fn mul_montgomery_external_add<const REDUCE1: REDUCEMOD, const REDUCE2: REDUCEMOD>(
        &self,
        level_q: usize,
        level_p: usize,
        a: &PolyQP,
        b: &PolyQP,
        c: &mut PolyQP,
    ) {
        let (ring_q, ring_p) = self.at_level(level_q, level_p);
        ring_q.mul_montgomery_external_add::<REDUCE1, REDUCE2>(&a.q, &b.q, &mut c.q);
        ring_p.mul_montgomery_external_add::<REDUCE1, REDUCE2>(&a.p, &b.p, &mut c.p);
    }
}

impl WriterTo for PolyQP {
    fn write_to<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
        self.q.write_to(writer)?;
        self.p.write_to(writer)
    }
}

impl ReaderFrom for PolyQP {
    fn read_from<R: std::io::Read>(&mut self, reader: &mut R) -> std::io::Result<()> {
        self.q.read_from(reader)?;
        self.p.read_from(reader)?;
        if self.q.n() != self.p.n() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("q.n()={} != p.n()={}", self.q.n(), self.p.n()),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rns::modulus::{BARRETT, NONE, ONCE};

    fn ring_qp() -> RingQP {
        RingQP {
            ring_q: Arc::new(RingRNS::new(16, vec![0x1fffffffffe00001, 0x1fffffffffc80001]).unwrap()),
            ring_p: Arc::new(RingRNS::new(16, vec![0x1fffffffffb40001]).unwrap()),
        }
    }

    #[test]
    fn lazy_accumulation_matches_reduced() {
        let ring: RingQP = ring_qp();
        let mut a: PolyQP = ring.new_poly();
        let mut b: PolyQP = ring.new_poly();
        a.q.polys
            .iter_mut()
            .chain(a.p.polys.iter_mut())
            .for_each(|p| p.0.iter_mut().enumerate().for_each(|(i, x)| *x = 3 * i as u64 + 1));
        b.q.polys
            .iter_mut()
            .chain(b.p.polys.iter_mut())
            .for_each(|p| p.0.iter_mut().enumerate().for_each(|(i, x)| *x = 5 * i as u64 + 2));
        ring.prepare_montgomery_inplace::<ONCE>(1, 0, &mut a);

        let mut lazy: PolyQP = ring.new_poly();
        let mut reduced: PolyQP = ring.new_poly();
        ring.mul_montgomery_external::<ONCE>(1, 0, &a, &b, &mut lazy);
        ring.mul_montgomery_external::<ONCE>(1, 0, &a, &b, &mut reduced);
        (0..6).for_each(|_| {
            ring.mul_montgomery_external_add::<ONCE, NONE>(1, 0, &a, &b, &mut lazy);
            ring.mul_montgomery_external_add::<ONCE, ONCE>(1, 0, &a, &b, &mut reduced);
        });
        ring.reduce_inplace::<BARRETT>(1, 0, &mut lazy);
        assert_eq!(lazy, reduced);
        // 7 * (3i+1) * (5i+2)
        assert_eq!(reduced.p.at(0).0[1], 7 * 4 * 7);
    }

    #[test]
    fn serialization_round_trip() {
        let ring: RingQP = ring_qp();
        let mut a: PolyQP = ring.new_poly();
        a.q.at_mut(1).0[3] = 42;
        a.p.at_mut(0).0[15] = 7;
        a.q.is_ntt = true;
        let mut bytes: Vec<u8> = Vec::new();
        a.write_to(&mut bytes).unwrap();
        let mut b: PolyQP = PolyQP::default();
        b.read_from(&mut bytes.as_slice()).unwrap();
        assert_eq!(a, b);
    }
}
