//! Benchmarks for token signing and verification

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::{json, Value};
use tollgate_core::{AppPolicy, HmacCodec, HmacKey, SessionClaim, TokenCodec, UserData};

fn bench_hmac_operations(c: &mut Criterion) {
    let key = HmacKey::new("a]".repeat(32)).unwrap();
    let data_sizes = [32, 128, 512, 2048];

    let mut group = c.benchmark_group("hmac_sign");

    for size in data_sizes {
        let data: Vec<u8> = (0..size).map(|i| (i % 256) as u8).collect();

        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            b.iter(|| key.sign(black_box(data)));
        });
    }

    group.finish();

    let mut group = c.benchmark_group("hmac_verify");

    for size in data_sizes {
        let data: Vec<u8> = (0..size).map(|i| (i % 256) as u8).collect();
        let signature = key.sign(&data);

        group.bench_with_input(
            BenchmarkId::from_parameter(size),
            &(data.clone(), signature),
            |b, (data, sig)| {
                b.iter(|| key.verify(black_box(data), black_box(sig)));
            },
        );
    }

    group.finish();
}

fn bench_codec(c: &mut Criterion) {
    let codec = HmacCodec::from_secret("a]".repeat(32)).unwrap();

    // Payload sizes: empty, small profile, a few dozen fields
    let payloads: Vec<(&str, Value)> = vec![
        ("null", Value::Null),
        ("profile", json!({"profile": "admin"})),
        (
            "wide",
            Value::Object((0..32).map(|i| (format!("field_{i}"), json!(i))).collect()),
        ),
    ];

    let mut group = c.benchmark_group("codec");

    for (name, payload) in payloads {
        let claim = SessionClaim::issue(
            "bench",
            UserData::new("mobileApp1", "341", payload),
            &AppPolicy::default(),
            chrono::Utc::now(),
        );
        let token = codec.serialize(&claim).unwrap();

        group.bench_with_input(BenchmarkId::new("serialize", name), &claim, |b, claim| {
            b.iter(|| codec.serialize(black_box(claim)));
        });

        group.bench_with_input(BenchmarkId::new("deserialize", name), &token, |b, token| {
            b.iter(|| codec.deserialize(black_box(token)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_hmac_operations, bench_codec);
criterion_main!(benches);
