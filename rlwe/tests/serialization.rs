use rlwe::keygen::KeyGenerator;
use rlwe::keys::{PublicKey, RelinearizationKey, RotationKeySet, SecretKey, SwitchingKey};
use rlwe::parameters::{Parameters, ParametersLiteral, DEFAULT_SIGMA};
use rns::serialization::{ReaderFrom, WriterTo};
use sampling::source::Source;
use std::io::ErrorKind;

#[test]
fn serialization() {
    let params: Parameters = Parameters::new(&ParametersLiteral {
        log_n: 4,
        q: vec![0x1fffffffffe00001, 0x1fffffffffc80001, 0x1fffffffffb40001],
        p: vec![0x1fffffffff500001],
        sigma: DEFAULT_SIGMA,
        noise_bound: 6.0 * DEFAULT_SIGMA,
        h: 0,
    })
    .unwrap();
    let keygen: KeyGenerator = KeyGenerator::new(&params).unwrap();
    let mut source: Source = Source::new([9u8; 32]);
    let sk: SecretKey = keygen.gen_secret_key(&mut source);

    sub_test("test_secret_key", || test_round_trip(&sk));
    sub_test("test_public_key", || {
        let pk: PublicKey = keygen.gen_public_key(&sk, &mut source);
        test_round_trip(&pk);

        let mut bytes: Vec<u8> = Vec::new();
        pk.value[0].write_to(&mut bytes).unwrap();
        let mut half: rlwe::poly_qp::PolyQP = Default::default();
        half.q = rns::poly::PolyRNS::new(params.n() >> 1, 0);
        half.p = rns::poly::PolyRNS::new(params.n() >> 1, 0);
        half.write_to(&mut bytes).unwrap();
        let err = PublicKey::default()
            .read_from(&mut bytes.as_slice())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    });
    sub_test("test_relinearization_key", || {
        let rlk: RelinearizationKey = keygen.gen_relinearization_key(&sk, &mut source);
        assert_eq!(rlk.0.digits(), 3);
        test_round_trip(&rlk)
    });
    sub_test("test_rotation_keys", || {
        let gal_els: Vec<u64> = (1..4)
            .map(|k| params.ring_q().galois_element(k, false))
            .collect();
        let rtks: RotationKeySet = keygen.gen_rotation_keys(&sk, &gal_els, &mut source);
        test_round_trip(&rtks)
    });
    sub_test("test_empty_switching_key", || {
        let mut bytes: Vec<u8> = Vec::new();
        let err = SwitchingKey::default().write_to(&mut bytes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        let err = SwitchingKey::default()
            .read_from(&mut [0u8].as_slice())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    });
}

fn sub_test<F: FnOnce()>(name: &str, f: F) {
    println!("Running {}", name);
    f();
}

/// Checks that a written value reads back identically and that any
/// truncation of its encoding fails.
fn test_round_trip<T: WriterTo + ReaderFrom + Default + PartialEq + std::fmt::Debug>(value: &T) {
    let mut bytes: Vec<u8> = Vec::new();
    value.write_to(&mut bytes).unwrap();

    let mut other: T = T::default();
    other.read_from(&mut bytes.as_slice()).unwrap();
    assert_eq!(value, &other);

    for cut in [1, 9, bytes.len() / 2] {
        let mut truncated: T = T::default();
        let err = truncated
            .read_from(&mut &bytes[..bytes.len() - cut])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
    }
}
