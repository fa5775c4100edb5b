use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use g1pinning::{CriticalPin, HoldConfig, NativeRegion, Recorder, ReleaseMode, try_hold};
use std::hint::black_box;

fn benchmark_pin_release(c: &mut Criterion) {
    let mut group = c.benchmark_group("hold_overhead/pin_release");

    for size in [0usize, 4 * 1024, 1024 * 1024, 16 * 1024 * 1024] {
        let data = vec![0u8; size];
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_with_input(BenchmarkId::new("best_effort", size), &data, |b, data| {
            let host = NativeRegion::best_effort(data);
            b.iter(|| {
                let pin = CriticalPin::acquire(&host, ReleaseMode::Abort);
                black_box(&pin);
            });
        });

        group.bench_with_input(BenchmarkId::new("recorded", size), &data, |b, data| {
            let host = Recorder::new(NativeRegion::best_effort(data));
            b.iter(|| {
                let pin = CriticalPin::acquire(&host, ReleaseMode::Abort);
                black_box(&pin);
            });
        });
    }

    group.finish();
}

fn benchmark_zero_hold(c: &mut Criterion) {
    let mut group = c.benchmark_group("hold_overhead/zero_ms");
    let config = HoldConfig::default();
    let data = vec![0u8; 64 * 1024];

    group.bench_function("try_hold", |b| {
        let host = NativeRegion::best_effort(&data);
        b.iter(|| black_box(try_hold(&host, black_box(0), &config)));
    });

    group.bench_function("try_hold_negative", |b| {
        let host = NativeRegion::best_effort(&data);
        b.iter(|| black_box(try_hold(&host, black_box(-1), &config)));
    });

    group.finish();
}

criterion_group!(benches, benchmark_pin_release, benchmark_zero_hold);
criterion_main!(benches);
