use crate::error::{Error, Result};
use crate::keys::{PublicKey, RelinearizationKey, RotationKeySet, SecretKey, SwitchingKey};
use crate::parameters::Parameters;
use crate::poly_qp::{PolyQP, RingQP};
use rns::modulus::barrett::BarrettPrecomp;
use rns::modulus::ONCE;
use sampling::distributions::Distribution;
use sampling::source::Source;
use tracing::{debug, instrument};

/// Generates secrets and switching keys for a parameter set.
pub struct KeyGenerator {
    params: Parameters,
    ring: RingQP,
    secret: Distribution,
    error: Distribution,
    /// [P]_{q_i}
    p_mod_q: Vec<u64>,
}

impl KeyGenerator {
    pub fn new(params: &Parameters) -> Result<Self> {
        let secret: Distribution = if params.h() == 0 {
            Distribution::Ternary(2.0 / 3.0)
        } else {
            Distribution::TernaryHw(params.h())
        };
        let error: Distribution = Distribution::gaussian(params.sigma(), params.noise_bound())
            .map_err(|err| Error::InvalidParameters(err.to_string()))?;

        let moduli_p: Vec<u64> = params.ring_p().moduli();
        let p_mod_q: Vec<u64> = params
            .ring_q()
            .0
            .iter()
            .map(|r| {
                let barrett: &BarrettPrecomp<u64> = &r.modulus.barrett;
                moduli_p.iter().fold(1u64, |acc, p| {
                    barrett.mul_reduce::<ONCE>(acc, barrett.reduce_u128(*p as u128))
                })
            })
            .collect();

        debug!(
            n = params.n(),
            digits = params.max_beta(),
            h = params.h(),
            "new KeyGenerator"
        );

        Ok(Self {
            params: params.clone(),
            ring: params.ring_qp(),
            secret,
            error,
            p_mod_q,
        })
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    /// Samples a ternary secret, of Hamming weight h if h > 0.
    pub fn gen_secret_key(&self, source: &mut Source) -> SecretKey {
        let mut coeffs: Vec<i64> = vec![0; self.params.n()];
        self.secret.sample_into(source, &mut coeffs);
        let mut value: PolyQP = self.ring.new_poly();
        self.ring.from_i64(&coeffs, &mut value);
        let (level_q, level_p) = (self.params.max_level(), self.params.max_level_p());
        self.ring.ntt_inplace::<false>(level_q, level_p, &mut value);
        self.ring
            .prepare_montgomery_inplace::<ONCE>(level_q, level_p, &mut value);
        SecretKey { value }
    }

    /// Returns pk = (-a*s + e, a) over QP, with a uniform.
    pub fn gen_public_key(&self, sk: &SecretKey, source: &mut Source) -> PublicKey {
        let (level_q, level_p) = (self.params.max_level(), self.params.max_level_p());
        let mut coeffs: Vec<i64> = vec![0; self.params.n()];
        let mut pk0: PolyQP = self.ring.new_poly();
        let mut pk1: PolyQP = self.ring.new_poly();
        let mut tmp: PolyQP = self.ring.new_poly();

        self.error.sample_into(source, &mut coeffs);
        self.ring.from_i64(&coeffs, &mut pk0);
        self.ring.ntt_inplace::<false>(level_q, level_p, &mut pk0);

        self.ring.fill_uniform(source, &mut pk1);
        self.ring
            .mul_montgomery_external::<ONCE>(level_q, level_p, &sk.value, &pk1, &mut tmp);
        self.ring.sub_inplace::<ONCE>(level_q, level_p, &tmp, &mut pk0);

        self.ring
            .prepare_montgomery_inplace::<ONCE>(level_q, level_p, &mut pk0);
        self.ring
            .prepare_montgomery_inplace::<ONCE>(level_q, level_p, &mut pk1);
        PublicKey { value: [pk0, pk1] }
    }

    pub fn gen_key_pair(&self, source: &mut Source) -> (SecretKey, PublicKey) {
        let sk: SecretKey = self.gen_secret_key(source);
        let pk: PublicKey = self.gen_public_key(&sk, source);
        (sk, pk)
    }

    /// Returns a key switching ciphertexts under sk_in to ciphertexts under sk_out.
    pub fn gen_switching_key(
        &self,
        sk_in: &SecretKey,
        sk_out: &SecretKey,
        source: &mut Source,
    ) -> SwitchingKey {
        self.gen_switching_key_from_poly(&sk_in.value, sk_out, source)
    }

    /// Returns the key switching s^2 to s.
    pub fn gen_relinearization_key(&self, sk: &SecretKey, source: &mut Source) -> RelinearizationKey {
        let (level_q, level_p) = (self.params.max_level(), self.params.max_level_p());
        let mut s: PolyQP = sk.value.clone();
        self.ring
            .unprepare_montgomery_inplace::<ONCE>(level_q, level_p, &mut s);
        let mut s2: PolyQP = self.ring.new_poly();
        self.ring
            .mul_montgomery_external::<ONCE>(level_q, level_p, &sk.value, &s, &mut s2);
        self.ring
            .prepare_montgomery_inplace::<ONCE>(level_q, level_p, &mut s2);
        RelinearizationKey(self.gen_switching_key_from_poly(&s2, sk, source))
    }

    /// Returns, for each Galois element g, the key switching s(X^g) to s.
    #[instrument(skip_all)]
    pub fn gen_rotation_keys(
        &self,
        sk: &SecretKey,
        gal_els: &[u64],
        source: &mut Source,
    ) -> RotationKeySet {
        let mut keys: RotationKeySet = RotationKeySet::default();
        let mut sk_in: PolyQP = self.ring.new_poly();
        gal_els.iter().for_each(|gal_el| {
            if !keys.contains(*gal_el) {
                self.ring.automorphism_ntt(&sk.value, *gal_el, &mut sk_in);
                keys.insert(
                    *gal_el,
                    self.gen_switching_key_from_poly(&sk_in, sk, source),
                );
            }
        });
        debug!(keys = keys.len(), "generated rotation keys");
        keys
    }

    /// Row i is (-a_i * s_out + e_i + w_i * s_in, a_i) with a_i uniform.
    /// Modulo q_j, w_i is [P]_{q_j} if q_j belongs to digit i and 0 otherwise.
    /// Modulo p_j, w_i is 0.
    fn gen_switching_key_from_poly(
        &self,
        sk_in: &PolyQP,
        sk_out: &SecretKey,
        source: &mut Source,
    ) -> SwitchingKey {
        let (level_q, level_p) = (self.params.max_level(), self.params.max_level_p());
        let alpha: usize = self.params.alpha();
        let ring_q = self.params.ring_q();

        let mut s_in: PolyQP = sk_in.clone();
        self.ring
            .unprepare_montgomery_inplace::<ONCE>(level_q, level_p, &mut s_in);

        let mut coeffs: Vec<i64> = vec![0; self.params.n()];
        let mut tmp: PolyQP = self.ring.new_poly();

        let value: Vec<[PolyQP; 2]> = (0..self.params.max_beta())
            .map(|i| {
                let mut k0: PolyQP = self.ring.new_poly();
                let mut k1: PolyQP = self.ring.new_poly();

                self.error.sample_into(source, &mut coeffs);
                self.ring.from_i64(&coeffs, &mut k0);
                self.ring.ntt_inplace::<false>(level_q, level_p, &mut k0);

                let start: usize = i * alpha;
                let end: usize = ((i + 1) * alpha).min(level_q + 1);
                (start..end).for_each(|j| {
                    let ring = &ring_q.0[j];
                    ring.mul_scalar::<ONCE>(s_in.q.at(j), &self.p_mod_q[j], tmp.q.at_mut(j));
                    ring.add_inplace::<ONCE>(tmp.q.at(j), k0.q.at_mut(j));
                });

                self.ring.fill_uniform(source, &mut k1);
                self.ring
                    .mul_montgomery_external::<ONCE>(level_q, level_p, &sk_out.value, &k1, &mut tmp);
                self.ring.sub_inplace::<ONCE>(level_q, level_p, &tmp, &mut k0);

                self.ring
                    .prepare_montgomery_inplace::<ONCE>(level_q, level_p, &mut k0);
                self.ring
                    .prepare_montgomery_inplace::<ONCE>(level_q, level_p, &mut k1);
                [k0, k1]
            })
            .collect();

        SwitchingKey { value }
    }
}
