use core_sim::{SeededSource, SimConfig};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use runtime::engine::DashboardEngine;
use time::OffsetDateTime;

const BENCH_POLLS: u64 = 1_000;

fn seeded_engine(now: OffsetDateTime) -> DashboardEngine {
    let rng = Box::new(SeededSource::new(7));
    DashboardEngine::new(SimConfig::default(), rng, now)
        .expect("default config is valid")
}

fn bench_poll_throughput(c: &mut Criterion) {
    let now = OffsetDateTime::now_utc();

    let mut group = c.benchmark_group("poll_throughput");
    group.throughput(Throughput::Elements(BENCH_POLLS));

    group.bench_function(BenchmarkId::new("poll", BENCH_POLLS), |b| {
        b.iter(|| {
            let mut engine = seeded_engine(now);
            for _ in 0..BENCH_POLLS {
                let _ = engine.poll(now);
            }
        });
    });

    group.bench_function("snapshot", |b| {
        let mut engine = seeded_engine(now);
        engine.poll(now);
        b.iter(|| engine.snapshot().expect("snapshot formats"));
    });

    group.finish();
}

criterion_group!(benches, bench_poll_throughput);
criterion_main!(benches);
