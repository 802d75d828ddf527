use std::hint::black_box;

use buddyvault::{
    decode,
    engine::codec::{read_varint, write_varint},
    encode, Buddy, BuddyList, BuddyListSettings, BuddyVariable, Object, Record, Value,
};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

// ============================================================================
// Test data
// ============================================================================

/// Record of `buddies` contacts and a handful of offline variables.
fn create_record_value(buddies: usize) -> Value {
    let mut list = BuddyList::new("owner");
    let policy = BuddyListSettings {
        allow_offline_variables: true,
        max_buddy_list_size: buddies,
    };
    for i in 0..buddies {
        list.add_buddy(
            Buddy::new(format!("buddy_{i}")).blocked(i % 7 == 0),
            &policy,
        )
        .unwrap();
    }
    for i in 0..8 {
        list.set_variable(BuddyVariable::new(
            format!("$var_{i}"),
            Value::Object(Object::new().with("level", i as i64).with("ratio", 0.5)),
        ));
    }
    Record::from_list(&list, &policy).to_value()
}

fn create_nested_value(depth: usize) -> Value {
    let mut v = Value::from("leaf");
    for _ in 0..depth {
        v = Value::Array(vec![v, Value::Int(1)]);
    }
    v
}

// ============================================================================
// Benchmarks
// ============================================================================

fn bench_encode_record(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_record");
    for buddies in [10usize, 100, 1_000] {
        let value = create_record_value(buddies);
        let size = encode(&value).unwrap().len();
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(buddies), &value, |b, v| {
            b.iter(|| black_box(encode(black_box(v)).unwrap()))
        });
    }
    group.finish();
}

fn bench_decode_record(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_record");
    for buddies in [10usize, 100, 1_000] {
        let bytes = encode(&create_record_value(buddies)).unwrap();
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(buddies), &bytes, |b, bytes| {
            b.iter(|| black_box(decode(black_box(bytes)).unwrap()))
        });
    }
    group.finish();
}

fn bench_nested(c: &mut Criterion) {
    let value = create_nested_value(256);
    let bytes = encode(&value).unwrap();
    c.bench_function("encode nested 256", |b| {
        b.iter(|| black_box(encode(black_box(&value)).unwrap()))
    });
    c.bench_function("decode nested 256", |b| {
        b.iter(|| black_box(decode(black_box(&bytes)).unwrap()))
    });
}

fn bench_varint(c: &mut Criterion) {
    let mut group = c.benchmark_group("varint");
    for (name, value) in [("1_byte", 127u32), ("3_bytes", 16_384), ("5_bytes", u32::MAX)] {
        let mut encoded = Vec::new();
        write_varint(&mut encoded, value).unwrap();

        group.bench_with_input(BenchmarkId::new("write", name), &value, |b, &value| {
            let mut buf = Vec::with_capacity(5);
            b.iter(|| {
                buf.clear();
                write_varint(black_box(&mut buf), black_box(value)).unwrap();
            })
        });
        group.bench_with_input(BenchmarkId::new("read", name), &encoded, |b, encoded| {
            b.iter(|| read_varint(&mut black_box(encoded.as_slice())).unwrap())
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_encode_record,
    bench_decode_record,
    bench_nested,
    bench_varint
);
criterion_main!(benches);
