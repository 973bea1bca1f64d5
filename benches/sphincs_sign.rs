use crate::bench_utils::{format_size, BENCH_SETS};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::OsRng;
use rand::RngCore;
use sphincs_core::SphincsPlus;

mod bench_utils;

static ALG_NAME: &str = "sign";

fn sign_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("SPHINCS+_{}", ALG_NAME));
    group.sample_size(10);

    let mut message = [0u8; 1024];
    OsRng.fill_bytes(&mut message);

    for (name, params) in BENCH_SETS {
        let sphincs = SphincsPlus::new(params);
        let (_, sk) = sphincs.keygen().unwrap();
        let signer = sphincs.signer(&sk).unwrap();

        group.bench_function(BenchmarkId::new("deterministic", name), |b| {
            b.iter(|| {
                black_box(signer.sign(black_box(&message)));
            });
        });
        group.bench_function(BenchmarkId::new("randomized", name), |b| {
            b.iter(|| {
                black_box(signer.sign_with_rng(black_box(&message), &mut OsRng).unwrap());
            });
        });
        println!(
            "Signature size of SPHINCS+ {}: {}",
            name,
            format_size(params.signature_bytes())
        );
    }

    group.finish();
}

criterion_group!(benches, sign_benchmarks);
criterion_main!(benches);
