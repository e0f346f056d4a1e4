/*!
 * Tick Queue Benchmarks
 *
 * Drain throughput for flat and nested deferred-task workloads, and
 * listener fan-out cost
 */

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use process_core::events::EventEmitter;
use process_core::scheduler::TickScheduler;
use serde_json::json;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

fn bench_flat_drain(c: &mut Criterion) {
    let mut group = c.benchmark_group("flat_drain");

    for size in [100usize, 1_000, 10_000] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                let scheduler = TickScheduler::new();
                let counter = Arc::new(AtomicU64::new(0));
                for _ in 0..size {
                    let counter = counter.clone();
                    scheduler
                        .enqueue(move || {
                            counter.fetch_add(1, Ordering::Relaxed);
                            Ok(())
                        })
                        .unwrap();
                }
                black_box(scheduler.drain().unwrap());
            });
        });
    }

    group.finish();
}

fn bench_nested_drain(c: &mut Criterion) {
    fn chain(scheduler: TickScheduler, remaining: usize) {
        let next = scheduler.clone();
        scheduler
            .enqueue(move || {
                if remaining > 1 {
                    chain(next, remaining - 1);
                }
                Ok(())
            })
            .unwrap();
    }

    let mut group = c.benchmark_group("nested_drain");

    for depth in [100usize, 1_000] {
        group.throughput(Throughput::Elements(depth as u64));
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, &depth| {
            b.iter(|| {
                let scheduler = TickScheduler::new();
                chain(scheduler.clone(), depth);
                black_box(scheduler.drain().unwrap());
            });
        });
    }

    group.finish();
}

fn bench_emit_fanout(c: &mut Criterion) {
    let mut group = c.benchmark_group("emit_fanout");

    for listeners in [1usize, 10, 100] {
        let emitter = EventEmitter::new();
        for _ in 0..listeners {
            emitter.on("tick", |args| {
                black_box(args);
                Ok(())
            });
        }
        let args = [json!(0)];

        group.bench_with_input(
            BenchmarkId::from_parameter(listeners),
            &listeners,
            |b, _| {
                b.iter(|| black_box(emitter.emit("tick", &args).unwrap()));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_flat_drain, bench_nested_drain, bench_emit_fanout);
criterion_main!(benches);
