use num_bigint::BigInt;
use rlwe::decryptor::Decryptor;
use rlwe::encryptor::Encryptor;
use rlwe::keygen::KeyGenerator;
use rlwe::keys::{PublicKey, RelinearizationKey, RotationKeySet, SecretKey, SwitchingKey};
use rlwe::keyswitch::KeySwitcher;
use rlwe::operand::{Ciphertext, Element, Plaintext};
use rlwe::parameters::{Parameters, ParametersLiteral, DEFAULT_SIGMA};
use rlwe::Error;
use rns::modulus::ONCE;
use rns::ring::RingRNS;
use sampling::source::Source;

const LOG_N: usize = 6;

#[test]
fn keyswitch() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    let params: Parameters = Parameters::new(&ParametersLiteral {
        log_n: LOG_N,
        q: vec![
            0x1fffffffffe00001,
            0x1fffffffffc80001,
            0x1fffffffffb40001,
            0x1fffffffff500001,
            0x1fffffffff420001,
        ],
        p: vec![0x1fffffffff380001, 0x1fffffffff000001],
        sigma: DEFAULT_SIGMA,
        noise_bound: 6.0 * DEFAULT_SIGMA,
        h: 1 << (LOG_N - 1),
    })
    .unwrap();
    let mut ctx: Context = Context::new(&params);

    for level in [params.max_level(), 2, 0] {
        for ntt in [true, false] {
            sub_test(
                &format!("test_switch_ciphertext::<level:{}, ntt:{}>", level, ntt),
                || test_switch_ciphertext(&mut ctx, level, ntt),
            );
        }
        sub_test(&format!("test_public_key_encryption::<level:{}>", level), || {
            test_public_key_encryption(&mut ctx, level)
        });
        sub_test(&format!("test_relinearize::<level:{}>", level), || {
            test_relinearize(&mut ctx, level)
        });
        sub_test(&format!("test_automorphism::<level:{}>", level), || {
            test_automorphism(&mut ctx, level)
        });
    }
    sub_test("test_missing_rotation_key", || test_missing_rotation_key(&mut ctx));
    sub_test("test_not_enough_digits", || test_not_enough_digits(&mut ctx));
    sub_test("test_degree_mismatch", || test_degree_mismatch(&mut ctx));
    sub_test("test_shallow_copy", || test_shallow_copy(&mut ctx));
    sub_test("test_switch_keys_output_level", || {
        test_switch_keys_output_level(&mut ctx)
    });
}

fn sub_test<F: FnOnce()>(name: &str, f: F) {
    println!("Running {}", name);
    f();
}

struct Context {
    params: Parameters,
    source: Source,
    sk0: SecretKey,
    sk1: SecretKey,
    swk: SwitchingKey,
    rlk: RelinearizationKey,
    rtks: RotationKeySet,
    gal_els: Vec<u64>,
    switcher: KeySwitcher,
}

impl Context {
    fn new(params: &Parameters) -> Self {
        let mut source: Source = Source::new([7u8; 32]);
        let keygen: KeyGenerator = KeyGenerator::new(params).unwrap();
        let sk0: SecretKey = keygen.gen_secret_key(&mut source);
        let sk1: SecretKey = keygen.gen_secret_key(&mut source);
        let swk: SwitchingKey = keygen.gen_switching_key(&sk0, &sk1, &mut source);
        let rlk: RelinearizationKey = keygen.gen_relinearization_key(&sk1, &mut source);
        let ring_q = params.ring_q();
        let gal_els: Vec<u64> = vec![
            ring_q.galois_element(1, false),
            ring_q.galois_element(-3, false),
            ring_q.galois_element(0, true),
        ];
        let rtks: RotationKeySet = keygen.gen_rotation_keys(&sk1, &gal_els, &mut source);
        Self {
            params: params.clone(),
            source,
            sk0,
            sk1,
            swk,
            rlk,
            rtks,
            gal_els,
            switcher: KeySwitcher::new(params).unwrap(),
        }
    }

    /// Returns a fresh encryption of a uniform message under sk at level.
    fn encrypt(&mut self, sk: &SecretKey, level: usize) -> Ciphertext {
        let ring: RingRNS<u64> = self.params.ring_q().at_level(level).unwrap();
        let mut pt: Plaintext = self.params.new_plaintext(level);
        ring.fill_uniform(&mut self.source, &mut pt.value);
        let mut ct: Ciphertext = self.params.new_ciphertext(1, level);
        Encryptor::new(&self.params, sk)
            .unwrap()
            .encrypt(Some(&pt), &mut ct, &mut self.source)
            .unwrap();
        ct
    }

    fn phase(&self, sk: &SecretKey, ct: &Ciphertext) -> Plaintext {
        let mut pt: Plaintext = Plaintext::default();
        Decryptor::new(&self.params, sk)
            .unwrap()
            .decrypt(ct, &mut pt)
            .unwrap();
        pt
    }

    /// Returns log2 of the largest coefficient of want - have, centered.
    fn noise(&self, want: &Plaintext, have: &Plaintext) -> u64 {
        let level: usize = want.level();
        let ring: RingRNS<u64> = self.params.ring_q().at_level(level).unwrap();
        let mut diff: Plaintext = self.params.new_plaintext(level);
        ring.sub::<1, ONCE>(&want.value, &have.value, &mut diff.value);
        let mut coeffs: Vec<BigInt> = vec![BigInt::from(0); self.params.n()];
        ring.to_bigint_inplace(&diff.value, 1, &mut coeffs);
        coeffs.iter().map(|c| c.bits()).max().unwrap_or(0)
    }

    fn assert_noise(&self, want: &Plaintext, have: &Plaintext) {
        let noise: u64 = self.noise(want, have);
        assert!(
            noise < (LOG_N + 10) as u64,
            "log2(noise)={} >= {}",
            noise,
            LOG_N + 10
        );
    }
}

fn to_coefficients(ctx: &Context, ct: &mut Ciphertext) {
    let ring: RingRNS<u64> = ctx.params.ring_q().at_level(ct.level()).unwrap();
    ct.value
        .iter_mut()
        .for_each(|c| ring.intt_inplace::<false>(c));
}

fn test_switch_ciphertext(ctx: &mut Context, level: usize, ntt: bool) {
    let sk0: SecretKey = ctx.sk0.clone();
    let mut ct: Ciphertext = ctx.encrypt(&sk0, level);
    if !ntt {
        to_coefficients(ctx, &mut ct);
    }
    let want: Plaintext = ctx.phase(&ctx.sk0, &ct);

    let mut out: Ciphertext = ctx.params.new_ciphertext(1, ctx.params.max_level());
    ctx.switcher
        .switch_ciphertext(&ct, &ctx.swk, &mut out)
        .unwrap();
    assert_eq!(out.level(), level);
    assert_eq!(out.is_ntt(), ntt);

    let have: Plaintext = ctx.phase(&ctx.sk1, &out);
    ctx.assert_noise(&want, &have);
}

fn test_relinearize(ctx: &mut Context, level: usize) {
    let sk1: SecretKey = ctx.sk1.clone();
    let ct: Ciphertext = ctx.encrypt(&sk1, level);
    let ring: RingRNS<u64> = ctx.params.ring_q().at_level(level).unwrap();
    let mut ct2: Ciphertext = ctx.params.new_ciphertext(2, level);
    ct2.at_mut(0).copy(ct.at(0));
    ct2.at_mut(1).copy(ct.at(1));
    ring.fill_uniform(&mut ctx.source, ct2.at_mut(2));
    ct2.set_ntt(true);
    let want: Plaintext = ctx.phase(&ctx.sk1, &ct2);

    let mut out: Ciphertext = ctx.params.new_ciphertext(1, level);
    ctx.switcher.relinearize(&ct2, &ctx.rlk, &mut out).unwrap();
    assert_eq!(out.degree(), 1);

    let have: Plaintext = ctx.phase(&ctx.sk1, &out);
    ctx.assert_noise(&want, &have);

    assert!(matches!(
        ctx.switcher.relinearize(&ct, &ctx.rlk, &mut out),
        Err(Error::CiphertextDegree {
            expected: 2,
            got: 1
        })
    ));
}

fn test_automorphism(ctx: &mut Context, level: usize) {
    let sk1: SecretKey = ctx.sk1.clone();
    let ct: Ciphertext = ctx.encrypt(&sk1, level);
    let phase: Plaintext = ctx.phase(&ctx.sk1, &ct);
    let ring: RingRNS<u64> = ctx.params.ring_q().at_level(level).unwrap();

    for gal_el in ctx.gal_els.clone() {
        let mut want: Plaintext = ctx.params.new_plaintext(level);
        ring.automorphism::<false>(&phase.value, gal_el, &mut want.value);

        let mut out: Ciphertext = ctx.params.new_ciphertext(1, level);
        ctx.switcher
            .automorphism(&ct, gal_el, &ctx.rtks, &mut out)
            .unwrap();
        let have: Plaintext = ctx.phase(&ctx.sk1, &out);
        ctx.assert_noise(&want, &have);
    }
}

fn test_missing_rotation_key(ctx: &mut Context) {
    let sk1: SecretKey = ctx.sk1.clone();
    let ct: Ciphertext = ctx.encrypt(&sk1, 1);
    let gal_el: u64 = ctx.params.ring_q().galois_element(5, false);
    assert!(!ctx.rtks.contains(gal_el));

    let mut out: Ciphertext = ctx.params.new_ciphertext(1, 1);
    let before: Ciphertext = out.clone();
    assert!(matches!(
        ctx.switcher.automorphism(&ct, gal_el, &ctx.rtks, &mut out),
        Err(Error::KeyNotAvailable { gal_el: g }) if g == gal_el
    ));
    assert_eq!(out, before);
}

fn test_not_enough_digits(ctx: &mut Context) {
    let mut swk: SwitchingKey = ctx.swk.clone();
    swk.value.truncate(1);

    let sk0: SecretKey = ctx.sk0.clone();
    let ct: Ciphertext = ctx.encrypt(&sk0, ctx.params.max_level());
    let mut out: Ciphertext = ctx.params.new_ciphertext(1, ctx.params.max_level());
    let before: Ciphertext = out.clone();
    assert!(matches!(
        ctx.switcher.switch_ciphertext(&ct, &swk, &mut out),
        Err(Error::NotEnoughDigits {
            available: 1,
            required: 3,
            ..
        })
    ));
    assert_eq!(out, before);

    // a single digit covers the first alpha limbs
    let ct: Ciphertext = ctx.encrypt(&sk0, 1);
    let want: Plaintext = ctx.phase(&ctx.sk0, &ct);
    ctx.switcher.switch_ciphertext(&ct, &swk, &mut out).unwrap();
    let have: Plaintext = ctx.phase(&ctx.sk1, &out);
    ctx.assert_noise(&want, &have);
}

fn test_public_key_encryption(ctx: &mut Context, level: usize) {
    let keygen: KeyGenerator = KeyGenerator::new(&ctx.params).unwrap();
    let pk: PublicKey = keygen.gen_public_key(&ctx.sk0, &mut ctx.source);
    let encryptor: Encryptor = Encryptor::new_public(&ctx.params, &pk).unwrap();
    let ring: RingRNS<u64> = ctx.params.ring_q().at_level(level).unwrap();

    for ntt in [false, true] {
        let mut want: Plaintext = ctx.params.new_plaintext(level);
        ring.fill_uniform(&mut ctx.source, &mut want.value);
        want.value.is_ntt = false;
        let mut pt: Plaintext = want.clone();
        if ntt {
            ring.ntt_inplace::<false>(&mut pt.value);
        }
        let mut ct: Ciphertext = ctx.params.new_ciphertext(1, level);
        encryptor.encrypt(Some(&pt), &mut ct, &mut ctx.source).unwrap();
        assert!(ct.value.iter().all(|c| c.is_ntt && !c.is_montgomery));

        let have: Plaintext = ctx.phase(&ctx.sk0, &ct);
        ctx.assert_noise(&want, &have);
    }

    let mut ct: Ciphertext = ctx.params.new_ciphertext(1, level);
    encryptor.encrypt(None, &mut ct, &mut ctx.source).unwrap();
    let zero: Plaintext = ctx.params.new_plaintext(level);
    let have: Plaintext = ctx.phase(&ctx.sk0, &ct);
    ctx.assert_noise(&zero, &have);

    let small: PublicKey = PublicKey {
        value: [
            rlwe::poly_qp::PolyQP {
                q: rns::poly::PolyRNS::new(ctx.params.n() >> 1, 0),
                p: rns::poly::PolyRNS::new(ctx.params.n() >> 1, 0),
            },
            Default::default(),
        ],
    };
    assert!(matches!(
        Encryptor::new_public(&ctx.params, &small),
        Err(Error::DegreeMismatch { .. })
    ));
}

fn test_degree_mismatch(ctx: &mut Context) {
    let sk0: SecretKey = ctx.sk0.clone();
    let ct: Ciphertext = ctx.encrypt(&sk0, 0);
    let mut small: Ciphertext = Ciphertext {
        value: vec![rns::poly::PolyRNS::new(ctx.params.n() >> 1, 0); 2],
    };
    assert!(matches!(
        ctx.switcher.switch_ciphertext(&ct, &ctx.swk, &mut small),
        Err(Error::DegreeMismatch { .. })
    ));

    let mut out0: rns::poly::PolyRNS<u64> = ctx.params.ring_q().new_polyrns();
    let mut out1: rns::poly::PolyRNS<u64> = ctx.params.ring_q().new_polyrns();
    assert!(matches!(
        ctx.switcher
            .switch_keys(ctx.params.max_level(), ct.at(1), &ctx.swk, &mut out0, &mut out1),
        Err(Error::Rns(rns::Error::LevelOutOfRange { .. }))
    ));
}

fn test_shallow_copy(ctx: &mut Context) {
    let sk0: SecretKey = ctx.sk0.clone();
    let ct: Ciphertext = ctx.encrypt(&sk0, 3);
    let mut copy: KeySwitcher = ctx.switcher.shallow_copy();

    let mut out: Ciphertext = ctx.params.new_ciphertext(1, 3);
    let mut out_copy: Ciphertext = ctx.params.new_ciphertext(1, 3);
    ctx.switcher
        .switch_ciphertext(&ct, &ctx.swk, &mut out)
        .unwrap();
    copy.switch_ciphertext(&ct, &ctx.swk, &mut out_copy)
        .unwrap();
    assert_eq!(out, out_copy);
}

fn test_switch_keys_output_level(ctx: &mut Context) {
    let sk0: SecretKey = ctx.sk0.clone();
    let ct: Ciphertext = ctx.encrypt(&sk0, 2);

    let mut out0: rns::poly::PolyRNS<u64> = ctx.params.ring_q().new_polyrns();
    let mut out1: rns::poly::PolyRNS<u64> = ctx.params.ring_q().new_polyrns();
    out0.set_all(&1);
    out1.set_all(&1);
    ctx.switcher
        .switch_keys(2, ct.at(1), &ctx.swk, &mut out0, &mut out1)
        .unwrap();
    assert_eq!(out0.level(), 2);
    assert_eq!(out1.level(), 2);
    assert!(out0.is_ntt && out1.is_ntt);

    let mut out: Ciphertext = ctx.params.new_ciphertext(1, ctx.params.max_level());
    ctx.switcher
        .switch_ciphertext(&ct, &ctx.swk, &mut out)
        .unwrap();
    assert_eq!(out.at(1), &out1);

    // the pool buffers are restored to the maximum level
    let ct: Ciphertext = ctx.encrypt(&sk0, ctx.params.max_level());
    let want: Plaintext = ctx.phase(&ctx.sk0, &ct);
    ctx.switcher
        .switch_ciphertext(&ct, &ctx.swk, &mut out)
        .unwrap();
    let have: Plaintext = ctx.phase(&ctx.sk1, &out);
    ctx.assert_noise(&want, &have);
}
