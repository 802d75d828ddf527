use std::hint::black_box;

use buddyvault::{decode_key, encode_key};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

fn bench_keys(c: &mut Criterion) {
    let mut group = c.benchmark_group("storage_key");
    let names = [
        ("ascii_short", "alice".to_string()),
        ("ascii_long", "x".repeat(64)),
        ("unicode", "Ünïcødé-用户".to_string()),
    ];

    for (label, name) in &names {
        let key = encode_key(name);
        group.bench_with_input(BenchmarkId::new("encode", label), name, |b, name| {
            b.iter(|| black_box(encode_key(black_box(name))))
        });
        group.bench_with_input(BenchmarkId::new("decode", label), &key, |b, key| {
            b.iter(|| black_box(decode_key(black_box(key.as_str())).unwrap()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_keys);
criterion_main!(benches);
