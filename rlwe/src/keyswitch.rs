use crate::decomposer::Decomposer;
use crate::error::{Error, Result};
use crate::keys::{RelinearizationKey, RotationKeySet, SwitchingKey};
use crate::operand::{Ciphertext, Element};
use crate::parameters::Parameters;
use crate::poly_qp::{PolyQP, RingQP};
use rns::basis_extension::BasisExtender;
use rns::check_level;
use rns::modulus::{BARRETT, NONE, ONCE};
use rns::poly::PolyRNS;
use rns::ring::RingRNS;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Number of lazy digit products that fit in a u64 accumulator for moduli
/// below 2^61, starting from a reduced value.
const LAZY_DIGITS: usize = 7;

/// Scratch space of a [KeySwitcher], allocated at the maximum levels.
pub struct KeySwitchPool {
    c_coeff: PolyRNS<u64>,
    c_ntt: PolyRNS<u64>,
    digit: PolyQP,
    acc0: PolyQP,
    acc1: PolyQP,
    buf_q: PolyRNS<u64>,
    buf_p: PolyRNS<u64>,
    out0: PolyRNS<u64>,
    out1: PolyRNS<u64>,
    ks0: PolyRNS<u64>,
    ks1: PolyRNS<u64>,
    rot0: PolyRNS<u64>,
    rot1: PolyRNS<u64>,
}

impl KeySwitchPool {
    fn new(params: &Parameters) -> Self {
        let ring: RingQP = params.ring_qp();
        let ring_q: &RingRNS<u64> = params.ring_q();
        let ring_p: &RingRNS<u64> = params.ring_p();
        Self {
            c_coeff: ring_q.new_polyrns(),
            c_ntt: ring_q.new_polyrns(),
            digit: ring.new_poly(),
            acc0: ring.new_poly(),
            acc1: ring.new_poly(),
            buf_q: ring_q.new_polyrns(),
            buf_p: ring_p.new_polyrns(),
            out0: ring_q.new_polyrns(),
            out1: ring_q.new_polyrns(),
            ks0: ring_q.new_polyrns(),
            ks1: ring_q.new_polyrns(),
            rot0: ring_q.new_polyrns(),
            rot1: ring_q.new_polyrns(),
        }
    }
}

/// Re-encrypts polynomials and ciphertexts under a different secret.
/// Tables are shared between shallow copies, the pool is not.
pub struct KeySwitcher {
    params: Parameters,
    ring: RingQP,
    decomposer: Arc<Decomposer>,
    extender: Arc<BasisExtender>,
    pool: KeySwitchPool,
}

impl KeySwitcher {
    pub fn new(params: &Parameters) -> Result<Self> {
        let extender: BasisExtender = BasisExtender::new(params.ring_q(), params.ring_p())?;
        let decomposer: Decomposer = Decomposer::new(params.ring_q(), params.ring_p());
        debug!(
            n = params.n(),
            level_q = params.max_level(),
            level_p = params.max_level_p(),
            digits = params.max_beta(),
            "new KeySwitcher"
        );
        Ok(Self {
            params: params.clone(),
            ring: params.ring_qp(),
            decomposer: Arc::new(decomposer),
            extender: Arc::new(extender),
            pool: KeySwitchPool::new(params),
        })
    }

    /// Returns a key switcher sharing the precomputed tables of self, with its own pool.
    pub fn shallow_copy(&self) -> Self {
        Self {
            params: self.params.clone(),
            ring: self.ring.clone(),
            decomposer: self.decomposer.clone(),
            extender: self.extender.clone(),
            pool: KeySwitchPool::new(&self.params),
        }
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    pub fn decomposer(&self) -> &Decomposer {
        &self.decomposer
    }

    fn check_degree(&self, n: usize) -> Result<()> {
        if n != self.params.n() {
            return Err(Error::DegreeMismatch {
                expected: self.params.n(),
                got: n,
            });
        }
        Ok(())
    }

    fn check_key(&self, level: usize, key: &SwitchingKey) -> Result<()> {
        let required: usize = self.params.beta(level);
        if key.digits() < required {
            return Err(Error::NotEnoughDigits {
                available: key.digits(),
                required,
                level,
            });
        }
        self.check_degree(key.n())?;
        let level_p: usize = self.params.max_level_p();
        key.value[..required].iter().flatten().try_for_each(|k| {
            check_level(level, k.level_q())?;
            check_level(level_p, k.level_p())
        })?;
        Ok(())
    }

    /// Writes on (out0, out1) the pair (sum_i d_i * k0_i, sum_i d_i * k1_i) / P,
    /// where d_i are the digits of c at level. Outputs are in the domain of c
    /// and are truncated to level.
    /// Nothing is written if an error is returned.
    #[instrument(skip_all)]
    pub fn switch_keys(
        &mut self,
        level: usize,
        c: &PolyRNS<u64>,
        key: &SwitchingKey,
        out0: &mut PolyRNS<u64>,
        out1: &mut PolyRNS<u64>,
    ) -> Result<()> {
        self.check_degree(c.n())?;
        self.check_degree(out0.n())?;
        self.check_degree(out1.n())?;
        check_level(level, self.params.max_level().min(c.level()))?;
        check_level(level, out0.level().min(out1.level()))?;
        self.check_key(level, key)?;

        let level_p: usize = self.params.max_level_p();
        let ring_q: RingRNS<u64> = self.params.ring_q().at_level_unchecked(level);
        let pool: &mut KeySwitchPool = &mut self.pool;

        if c.is_ntt {
            pool.c_ntt.copy_level(level, c);
            ring_q.intt::<false>(c, &mut pool.c_coeff);
        } else {
            pool.c_coeff.copy_level(level, c);
            ring_q.ntt::<false>(c, &mut pool.c_ntt);
        }

        for (i, key_i) in key.value[..self.params.beta(level)].iter().enumerate() {
            self.decomposer.decompose(
                level,
                level_p,
                i,
                &pool.c_ntt,
                &pool.c_coeff,
                &mut pool.digit,
            )?;
            if i == 0 {
                self.ring.mul_montgomery_external::<ONCE>(
                    level,
                    level_p,
                    &key_i[0],
                    &pool.digit,
                    &mut pool.acc0,
                );
                self.ring.mul_montgomery_external::<ONCE>(
                    level,
                    level_p,
                    &key_i[1],
                    &pool.digit,
                    &mut pool.acc1,
                );
            } else {
                self.ring.mul_montgomery_external_add::<ONCE, NONE>(
                    level,
                    level_p,
                    &key_i[0],
                    &pool.digit,
                    &mut pool.acc0,
                );
                self.ring.mul_montgomery_external_add::<ONCE, NONE>(
                    level,
                    level_p,
                    &key_i[1],
                    &pool.digit,
                    &mut pool.acc1,
                );
            }
            if (i + 1) % LAZY_DIGITS == 0 {
                self.ring
                    .reduce_inplace::<BARRETT>(level, level_p, &mut pool.acc0);
                self.ring
                    .reduce_inplace::<BARRETT>(level, level_p, &mut pool.acc1);
            }
        }
        self.ring
            .reduce_inplace::<BARRETT>(level, level_p, &mut pool.acc0);
        self.ring
            .reduce_inplace::<BARRETT>(level, level_p, &mut pool.acc1);

        self.extender.mod_down_qp_to_q_ntt(
            level,
            level_p,
            &pool.acc0.q,
            &pool.acc0.p,
            &mut pool.buf_q,
            &mut pool.buf_p,
            &mut pool.out0,
        )?;
        self.extender.mod_down_qp_to_q_ntt(
            level,
            level_p,
            &pool.acc1.q,
            &pool.acc1.p,
            &mut pool.buf_q,
            &mut pool.buf_p,
            &mut pool.out1,
        )?;

        if c.is_ntt {
            out0.copy_level(level, &pool.out0);
            out1.copy_level(level, &pool.out1);
        } else {
            ring_q.intt::<false>(&pool.out0, out0);
            ring_q.intt::<false>(&pool.out1, out1);
        }
        out0.truncate(level);
        out1.truncate(level);
        Ok(())
    }

    /// Runs switch_keys on c into the pool buffers ks0 and ks1.
    fn switch_keys_into_pool(
        &mut self,
        level: usize,
        c: &PolyRNS<u64>,
        key: &SwitchingKey,
    ) -> Result<()> {
        let mut ks0: PolyRNS<u64> = std::mem::take(&mut self.pool.ks0);
        let mut ks1: PolyRNS<u64> = std::mem::take(&mut self.pool.ks1);
        ks0.resize(self.params.max_level());
        ks1.resize(self.params.max_level());
        let result: Result<()> = self.switch_keys(level, c, key, &mut ks0, &mut ks1);
        self.pool.ks0 = ks0;
        self.pool.ks1 = ks1;
        result
    }

    fn check_ciphertexts(&self, ct: &Ciphertext, degree: usize, out: &Ciphertext) -> Result<()> {
        if ct.degree() != degree {
            return Err(Error::CiphertextDegree {
                expected: degree,
                got: ct.degree(),
            });
        }
        if out.degree() != 1 {
            return Err(Error::CiphertextDegree {
                expected: 1,
                got: out.degree(),
            });
        }
        self.check_degree(ct.n())?;
        self.check_degree(out.n())
    }

    /// Writes on out the ciphertext ct = (c0, c1) re-encrypted with key,
    /// at the level and in the domain of ct.
    #[instrument(skip_all)]
    pub fn switch_ciphertext(
        &mut self,
        ct: &Ciphertext,
        key: &SwitchingKey,
        out: &mut Ciphertext,
    ) -> Result<()> {
        self.check_ciphertexts(ct, 1, out)?;
        let level: usize = ct.level();
        self.switch_keys_into_pool(level, ct.at(1), key)?;

        let ring_q: RingRNS<u64> = self.params.ring_q().at_level_unchecked(level);
        out.value.iter_mut().for_each(|p| p.resize(level));
        ring_q.add::<ONCE>(ct.at(0), &self.pool.ks0, out.at_mut(0));
        out.at_mut(1).copy_level(level, &self.pool.ks1);
        out.set_ntt(ct.is_ntt());
        Ok(())
    }

    /// Writes on out the degree 1 ciphertext with the same phase as the
    /// degree 2 ciphertext ct, whose last component is switched from s^2 to s.
    #[instrument(skip_all)]
    pub fn relinearize(
        &mut self,
        ct: &Ciphertext,
        rlk: &RelinearizationKey,
        out: &mut Ciphertext,
    ) -> Result<()> {
        self.check_ciphertexts(ct, 2, out)?;
        let level: usize = ct.level();
        self.switch_keys_into_pool(level, ct.at(2), &rlk.0)?;

        let ring_q: RingRNS<u64> = self.params.ring_q().at_level_unchecked(level);
        out.value.iter_mut().for_each(|p| p.resize(level));
        ring_q.add::<ONCE>(ct.at(0), &self.pool.ks0, out.at_mut(0));
        ring_q.add::<ONCE>(ct.at(1), &self.pool.ks1, out.at_mut(1));
        out.set_ntt(ct.is_ntt());
        Ok(())
    }

    /// Writes on out an encryption under s of ct(X^gal_el).
    #[instrument(skip_all)]
    pub fn automorphism(
        &mut self,
        ct: &Ciphertext,
        gal_el: u64,
        keys: &RotationKeySet,
        out: &mut Ciphertext,
    ) -> Result<()> {
        let key: &SwitchingKey = keys.get(gal_el)?;
        self.check_ciphertexts(ct, 1, out)?;
        let level: usize = ct.level();
        let ring_q: RingRNS<u64> = self.params.ring_q().at_level_unchecked(level);

        let mut rot0: PolyRNS<u64> = std::mem::take(&mut self.pool.rot0);
        let mut rot1: PolyRNS<u64> = std::mem::take(&mut self.pool.rot1);
        if ct.is_ntt() {
            ring_q.automorphism::<true>(ct.at(0), gal_el, &mut rot0);
            ring_q.automorphism::<true>(ct.at(1), gal_el, &mut rot1);
        } else {
            ring_q.automorphism::<false>(ct.at(0), gal_el, &mut rot0);
            ring_q.automorphism::<false>(ct.at(1), gal_el, &mut rot1);
        }
        let result: Result<()> = self.switch_keys_into_pool(level, &rot1, key);
        if result.is_ok() {
            out.value.iter_mut().for_each(|p| p.resize(level));
            ring_q.add::<ONCE>(&rot0, &self.pool.ks0, out.at_mut(0));
            out.at_mut(1).copy_level(level, &self.pool.ks1);
            out.set_ntt(ct.is_ntt());
        }
        self.pool.rot0 = rot0;
        self.pool.rot1 = rot1;
        result
    }
}
