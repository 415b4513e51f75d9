use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rlwe::keygen::KeyGenerator;
use rlwe::keys::{SecretKey, SwitchingKey};
use rlwe::keyswitch::KeySwitcher;
use rlwe::parameters::{Parameters, ParametersLiteral, DEFAULT_SIGMA};
use rns::poly::PolyRNS;
use sampling::source::Source;

fn switch_keys(c: &mut Criterion) {
    fn runner(params: Parameters) -> Box<dyn FnMut()> {
        let mut source: Source = Source::new([0u8; 32]);
        let keygen: KeyGenerator = KeyGenerator::new(&params).unwrap();
        let sk_in: SecretKey = keygen.gen_secret_key(&mut source);
        let sk_out: SecretKey = keygen.gen_secret_key(&mut source);
        let key: SwitchingKey = keygen.gen_switching_key(&sk_in, &sk_out, &mut source);
        let mut switcher: KeySwitcher = KeySwitcher::new(&params).unwrap();

        let ring_q = params.ring_q();
        let mut a: PolyRNS<u64> = ring_q.new_polyrns();
        ring_q.fill_uniform(&mut source, &mut a);
        a.is_ntt = true;
        let mut out0: PolyRNS<u64> = ring_q.new_polyrns();
        let mut out1: PolyRNS<u64> = ring_q.new_polyrns();
        let level: usize = params.max_level();
        Box::new(move || {
            switcher
                .switch_keys(level, &a, &key, &mut out0, &mut out1)
                .unwrap();
        })
    }

    let mut b: criterion::BenchmarkGroup<'_, criterion::measurement::WallTime> =
        c.benchmark_group("switch_keys");
    for log_n in 12..16 {
        for (log_q, log_p) in [(vec![55u64; 4], vec![61u64; 1]), (vec![55u64; 8], vec![61u64; 2])] {
            let literal: ParametersLiteral =
                ParametersLiteral::from_bit_sizes(log_n, &log_q, &log_p, DEFAULT_SIGMA, 0).unwrap();
            let params: Parameters = Parameters::new(&literal).unwrap();
            let id = BenchmarkId::new(
                format!("#Q={} #P={}", log_q.len(), log_p.len()),
                1 << log_n,
            );
            let mut runner = runner(params);
            b.bench_with_input(id, &(), |b, _| b.iter(&mut runner));
        }
    }
}

criterion_group!(benches, switch_keys);
criterion_main!(benches);
