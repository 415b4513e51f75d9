use crate::error::{Error, Result};
use crate::keys::{PublicKey, SecretKey};
use crate::operand::{Ciphertext, Element, Plaintext};
use crate::parameters::Parameters;
use crate::poly_qp::{PolyQP, RingQP};
use rns::basis_extension::BasisExtender;
use rns::modulus::ONCE;
use rns::poly::PolyRNS;
use rns::ring::RingRNS;
use sampling::distributions::Distribution;
use sampling::source::Source;
use std::sync::Arc;
use tracing::debug;

enum EncryptionKey {
    Secret(SecretKey),
    Public {
        pk: PublicKey,
        extender: Arc<BasisExtender>,
    },
}

/// RLWE encryption under a secret or a public key.
pub struct Encryptor {
    params: Parameters,
    key: EncryptionKey,
    error: Distribution,
}

impl Encryptor {
    pub fn new(params: &Parameters, sk: &SecretKey) -> Result<Self> {
        check_degree(params, sk.n())?;
        Ok(Self {
            params: params.clone(),
            key: EncryptionKey::Secret(sk.clone()),
            error: error_distribution(params)?,
        })
    }

    pub fn new_public(params: &Parameters, pk: &PublicKey) -> Result<Self> {
        check_degree(params, pk.n())?;
        let extender: BasisExtender = BasisExtender::new(params.ring_q(), params.ring_p())?;
        debug!(n = params.n(), "new public key Encryptor");
        Ok(Self {
            params: params.clone(),
            key: EncryptionKey::Public {
                pk: pk.clone(),
                extender: Arc::new(extender),
            },
            error: error_distribution(params)?,
        })
    }

    /// Writes on ct an encryption of pt at the level of ct, in the NTT domain.
    /// If pt is None, encrypts zero.
    ///
    /// Under a secret key, ct = (-a*s + e + m, a) with a uniform.
    /// Under a public key, ct = (u*pk0 + e0, u*pk1 + e1) / P + (m, 0) with
    /// u ternary and e0, e1 sampled over QP.
    pub fn encrypt(
        &self,
        pt: Option<&Plaintext>,
        ct: &mut Ciphertext,
        source: &mut Source,
    ) -> Result<()> {
        if ct.degree() != 1 {
            return Err(Error::CiphertextDegree {
                expected: 1,
                got: ct.degree(),
            });
        }
        if ct.n() != self.params.n() {
            return Err(Error::DegreeMismatch {
                expected: self.params.n(),
                got: ct.n(),
            });
        }
        let level: usize = ct.level();
        let ring: RingRNS<u64> = self.params.ring_q().at_level(level)?;
        if let Some(pt) = pt {
            rns::check_level(level, pt.level())?;
        }

        match &self.key {
            EncryptionKey::Secret(sk) => self.encrypt_sk(&ring, sk, pt, ct, source),
            EncryptionKey::Public { pk, extender } => {
                self.encrypt_pk(&ring, pk, extender, pt, ct, source)
            }
        }
    }

    fn encrypt_sk(
        &self,
        ring: &RingRNS<u64>,
        sk: &SecretKey,
        pt: Option<&Plaintext>,
        ct: &mut Ciphertext,
        source: &mut Source,
    ) -> Result<()> {
        let mut tmp: PolyRNS<u64> = ring.new_polyrns();
        let (c0, c1) = ct.value.split_at_mut(1);
        let (c0, c1) = (&mut c0[0], &mut c1[0]);

        ring.fill_uniform(source, c1);
        c1.is_ntt = true;
        c1.is_montgomery = false;

        let mut coeffs: Vec<i64> = vec![0; self.params.n()];
        self.error.sample_into(source, &mut coeffs);
        ring.from_i64(&coeffs, c0);
        match pt {
            Some(pt) if pt.value.is_ntt => {
                ring.ntt_inplace::<false>(c0);
                ring.add_inplace::<ONCE>(&pt.value, c0);
            }
            Some(pt) => {
                ring.add_inplace::<ONCE>(&pt.value, c0);
                ring.ntt_inplace::<false>(c0);
            }
            None => ring.ntt_inplace::<false>(c0),
        }

        ring.mul_montgomery_external::<ONCE>(&sk.value.q, c1, &mut tmp);
        ring.sub_inplace::<1, ONCE>(&tmp, c0);
        Ok(())
    }

    fn encrypt_pk(
        &self,
        ring: &RingRNS<u64>,
        pk: &PublicKey,
        extender: &BasisExtender,
        pt: Option<&Plaintext>,
        ct: &mut Ciphertext,
        source: &mut Source,
    ) -> Result<()> {
        let (level, level_p) = (ring.level(), self.params.max_level_p());
        let ring_qp: RingQP = self.params.ring_qp();
        let mut coeffs: Vec<i64> = vec![0; self.params.n()];

        let mut u: PolyQP = ring_qp.new_poly();
        Distribution::Ternary(0.5).sample_into(source, &mut coeffs);
        ring_qp.from_i64(&coeffs, &mut u);
        ring_qp.ntt_inplace::<false>(level, level_p, &mut u);

        let mut e: PolyQP = ring_qp.new_poly();
        let mut acc: PolyQP = ring_qp.new_poly();
        let mut buf_q: PolyRNS<u64> = self.params.ring_q().new_polyrns();
        let mut buf_p: PolyRNS<u64> = self.params.ring_p().new_polyrns();
        ct.value.iter_mut().zip(pk.value.iter()).try_for_each(|(c, pk_i)| {
            ring_qp.mul_montgomery_external::<ONCE>(level, level_p, pk_i, &u, &mut acc);
            self.error.sample_into(source, &mut coeffs);
            ring_qp.from_i64(&coeffs, &mut e);
            ring_qp.ntt_inplace::<false>(level, level_p, &mut e);
            ring_qp.add_inplace::<ONCE>(level, level_p, &e, &mut acc);
            extender.mod_down_qp_to_q_ntt(
                level,
                level_p,
                &acc.q,
                &acc.p,
                &mut buf_q,
                &mut buf_p,
                c,
            )
        })?;

        let c0: &mut PolyRNS<u64> = &mut ct.value[0];
        match pt {
            Some(pt) if pt.value.is_ntt => ring.add_inplace::<ONCE>(&pt.value, c0),
            Some(pt) => {
                let mut m: PolyRNS<u64> = ring.new_polyrns();
                ring.ntt::<false>(&pt.value, &mut m);
                ring.add_inplace::<ONCE>(&m, c0);
            }
            None => {}
        }
        ct.value.iter_mut().for_each(|c| {
            c.is_ntt = true;
            c.is_montgomery = false;
        });
        Ok(())
    }
}

fn check_degree(params: &Parameters, n: usize) -> Result<()> {
    if n != params.n() {
        return Err(Error::DegreeMismatch {
            expected: params.n(),
            got: n,
        });
    }
    Ok(())
}

fn error_distribution(params: &Parameters) -> Result<Distribution> {
    Distribution::gaussian(params.sigma(), params.noise_bound())
        .map_err(|err| Error::InvalidParameters(err.to_string()))
}
