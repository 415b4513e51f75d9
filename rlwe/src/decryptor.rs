use crate::error::{Error, Result};
use crate::keys::SecretKey;
use crate::operand::{Ciphertext, Element, Plaintext};
use crate::parameters::Parameters;
use rns::modulus::ONCE;
use rns::poly::PolyRNS;
use rns::ring::RingRNS;

pub struct Decryptor {
    params: Parameters,
    sk: SecretKey,
}

impl Decryptor {
    pub fn new(params: &Parameters, sk: &SecretKey) -> Result<Self> {
        if sk.n() != params.n() {
            return Err(Error::DegreeMismatch {
                expected: params.n(),
                got: sk.n(),
            });
        }
        Ok(Self {
            params: params.clone(),
            sk: sk.clone(),
        })
    }

    /// Writes on pt the phase sum_i c_i * s^i, in the coefficient domain,
    /// at the level of ct.
    pub fn decrypt(&self, ct: &Ciphertext, pt: &mut Plaintext) -> Result<()> {
        if ct.n() != self.params.n() {
            return Err(Error::DegreeMismatch {
                expected: self.params.n(),
                got: ct.n(),
            });
        }
        let level: usize = ct.level();
        let ring: RingRNS<u64> = self.params.ring_q().at_level(level)?;

        let mut c_ntt: PolyRNS<u64> = ring.new_polyrns();
        let mut acc: PolyRNS<u64> = ring.new_polyrns();
        ct.value.iter().rev().enumerate().for_each(|(i, c)| {
            let c: &PolyRNS<u64> = if c.is_ntt {
                c
            } else {
                ring.ntt::<false>(c, &mut c_ntt);
                &c_ntt
            };
            if i == 0 {
                acc.copy_level(level, c);
            } else {
                // Horner step: acc <- acc * s + c
                ring.mul_montgomery_external_inplace::<ONCE>(&self.sk.value.q, &mut acc);
                ring.add_inplace::<ONCE>(c, &mut acc);
            }
        });
        ring.intt_inplace::<false>(&mut acc);
        acc.is_montgomery = false;
        pt.value = acc;
        Ok(())
    }
}
