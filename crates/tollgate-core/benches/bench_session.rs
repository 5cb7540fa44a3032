//! Benchmarks for the per-request validation path

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::json;
use tollgate_core::{
    AppPolicy, ExemptPaths, ManualClock, MemoryExchange, SessionLifecycle, TollgateConfig,
};

fn lifecycle(clock: Arc<ManualClock>) -> SessionLifecycle {
    let config = TollgateConfig::new("bench", "a]".repeat(32))
        .with_default_policy(AppPolicy::new(
            Duration::from_secs(5 * 60),
            Duration::from_secs(8 * 60 * 60),
        ))
        .with_exempt_paths(ExemptPaths::new(["/login", "/health", "/metrics"]));
    SessionLifecycle::from_config(&config)
        .unwrap()
        .with_clock(clock)
}

fn bench_validate(c: &mut Criterion) {
    let start = Utc::now();
    let clock = Arc::new(ManualClock::new(start));
    let lifecycle = lifecycle(clock.clone());

    let mut login = MemoryExchange::new("/login");
    lifecycle
        .issue(&mut login, "mobileApp1", "341", json!({"profile": "admin"}))
        .unwrap();
    let request = login.next_request("/api/profile");

    let mut group = c.benchmark_group("validate");

    group.bench_function("issue", |b| {
        b.iter(|| {
            let mut exchange = MemoryExchange::new("/login");
            let data = json!({"profile": "admin"});
            lifecycle.issue(&mut exchange, black_box("mobileApp1"), "341", data)
        });
    });

    group.bench_function("exempt", |b| {
        b.iter(|| lifecycle.validate(&mut MemoryExchange::new(black_box("/health"))));
    });

    group.bench_function("access_alive", |b| {
        clock.set(start);
        b.iter(|| lifecycle.validate(black_box(&mut request.clone())));
    });

    group.bench_function("refresh", |b| {
        clock.set(start + chrono::Duration::minutes(6));
        b.iter(|| lifecycle.validate(black_box(&mut request.clone())));
    });

    group.bench_function("refresh_expired", |b| {
        clock.set(start + chrono::Duration::hours(9));
        b.iter(|| lifecycle.validate(black_box(&mut request.clone())));
    });

    group.finish();
}

criterion_group!(benches, bench_validate);
criterion_main!(benches);
