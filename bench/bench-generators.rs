use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use randomness::jkiss::JKiss;
use randomness::mt::MersenneTwister;
use randomness::{Generator, Registry, Seed, UBig};

pub fn bench_deterministic(c: &mut Criterion) {
    let seed = Seed::from(12345u64);

    let mut jkiss = JKiss::from_seed(&seed);
    c.bench_function("jkiss next_u32", |b| b.iter(|| jkiss.next_u32()));
    c.bench_function("jkiss below_u64 1000", |b| {
        b.iter(|| jkiss.below_u64(black_box(1000)))
    });

    let mut mt = MersenneTwister::from_seed(&seed);
    c.bench_function("mt next_u32", |b| b.iter(|| mt.next_u32()));
    let wide = (UBig::from(1u8) << 256) - UBig::from(189u8);
    c.bench_function("mt below 256 bits", |b| b.iter(|| mt.below(black_box(&wide))));
}

pub fn bench_system(c: &mut Criterion) {
    let registry = Registry::global();
    for name in ["urandom", "system", "rdrand"] {
        let Ok(provider) = registry.select_name(name) else {
            continue;
        };
        let Ok(mut rng) = provider.construct(None) else {
            continue;
        };
        c.bench_function(&format!("{name} getbits 12"), |b| {
            b.iter(|| rng.getbits(black_box(12)))
        });
    }
}

criterion_group!(benches, bench_deterministic, bench_system);
criterion_main!(benches);
