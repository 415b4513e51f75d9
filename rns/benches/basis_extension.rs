use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rns::basis_extension::{BasisExtender, CENTERED, EXACT, FAST};
use rns::poly::PolyRNS;
use rns::ring::RingRNS;
use sampling::source::Source;

const Q: [u64; 4] = [
    0x1fffffffffe00001,
    0x1fffffffffc80001,
    0x1fffffffffb40001,
    0x1fffffffff500001,
];
const P: [u64; 2] = [0x1fffffffff380001, 0x1fffffffff420001];

fn mod_up(c: &mut Criterion) {
    fn runner<const MODE: u8>(ring_q: RingRNS<u64>, ring_p: RingRNS<u64>) -> Box<dyn FnMut()> {
        let extender: BasisExtender = BasisExtender::new(&ring_q, &ring_p).unwrap();
        let mut source: Source = Source::new([0u8; 32]);
        let mut a_q: PolyRNS<u64> = ring_q.new_polyrns();
        ring_q.fill_uniform(&mut source, &mut a_q);
        let mut b_p: PolyRNS<u64> = ring_p.new_polyrns();
        let (level_q, level_p) = (ring_q.level(), ring_p.level());
        Box::new(move || {
            extender
                .mod_up_q_to_p::<MODE>(level_q, level_p, &a_q, &mut b_p)
                .unwrap();
        })
    }

    let mut b: criterion::BenchmarkGroup<'_, criterion::measurement::WallTime> =
        c.benchmark_group("mod_up_q_to_p");
    for log_n in 11..16 {
        let n: usize = 1 << log_n;
        let rings = || {
            (
                RingRNS::new(n, Q.to_vec()).unwrap(),
                RingRNS::new(n, P.to_vec()).unwrap(),
            )
        };
        let runners: [(&str, Box<dyn FnMut()>); 3] = [
            ("FAST", {
                let (q, p) = rings();
                runner::<FAST>(q, p)
            }),
            ("EXACT", {
                let (q, p) = rings();
                runner::<EXACT>(q, p)
            }),
            ("CENTERED", {
                let (q, p) = rings();
                runner::<CENTERED>(q, p)
            }),
        ];
        for (name, mut runner) in runners {
            let id = BenchmarkId::new(name, n);
            b.bench_with_input(id, &(), |b, _| b.iter(&mut runner));
        }
    }
}

fn mod_down_ntt(c: &mut Criterion) {
    fn runner(ring_q: RingRNS<u64>, ring_p: RingRNS<u64>) -> Box<dyn FnMut()> {
        let extender: BasisExtender = BasisExtender::new(&ring_q, &ring_p).unwrap();
        let mut source: Source = Source::new([0u8; 32]);
        let mut a_q: PolyRNS<u64> = ring_q.new_polyrns();
        let mut a_p: PolyRNS<u64> = ring_p.new_polyrns();
        ring_q.fill_uniform(&mut source, &mut a_q);
        ring_p.fill_uniform(&mut source, &mut a_p);
        let mut buf_q: PolyRNS<u64> = ring_q.new_polyrns();
        let mut buf_p: PolyRNS<u64> = ring_p.new_polyrns();
        let mut b_q: PolyRNS<u64> = ring_q.new_polyrns();
        let (level_q, level_p) = (ring_q.level(), ring_p.level());
        Box::new(move || {
            extender
                .mod_down_qp_to_q_ntt(
                    level_q, level_p, &a_q, &a_p, &mut buf_q, &mut buf_p, &mut b_q,
                )
                .unwrap();
        })
    }

    let mut b: criterion::BenchmarkGroup<'_, criterion::measurement::WallTime> =
        c.benchmark_group("mod_down_qp_to_q_ntt");
    for log_n in 11..16 {
        let n: usize = 1 << log_n;
        let mut runner = runner(
            RingRNS::new(n, Q.to_vec()).unwrap(),
            RingRNS::new(n, P.to_vec()).unwrap(),
        );
        let id = BenchmarkId::new("QP->Q", n);
        b.bench_with_input(id, &(), |b, _| b.iter(&mut runner));
    }
}

criterion_group!(benches, mod_up, mod_down_ntt);
criterion_main!(benches);
